use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::span::{Span, Spanned};

/// Every compilation unit handed over by the front-end for one validation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Program {
    #[serde(default)]
    pub units: Vec<CompilationUnit>,
}

impl Program {
    pub fn new(units: Vec<CompilationUnit>) -> Self {
        Self { units }
    }

    /// Append the units of another program, keeping their order.
    pub fn merge(&mut self, other: Program) {
        self.units.extend(other.units);
    }
}

/// One source file's worth of resolved declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilationUnit {
    /// Path relative to the source root. Derived from the first type when absent.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub types: Vec<Spanned<TypeDecl>>,
    /// Original source text, used only for rendering.
    #[serde(default)]
    pub source: Option<String>,
}

impl CompilationUnit {
    pub fn new(types: Vec<Spanned<TypeDecl>>) -> Self {
        Self { path: None, types, source: None }
    }

    /// Display path of the unit, e.g. `test/Foo.java` for `test.Foo`.
    pub fn path(&self) -> String {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match self.types.first() {
            Some(ty) => path_for_type(&ty.node.name),
            None => "<unknown>".to_string(),
        }
    }
}

/// `test.Foo` → `test/Foo.java`. Nested types (`Outer$Inner`) live in the outer file.
pub fn path_for_type(qualified_name: &str) -> String {
    let top_level = qualified_name.split('$').next().unwrap_or(qualified_name);
    format!("{}.java", top_level.replace('.', "/"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// Fully qualified name.
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub superclass: Option<String>,
    /// Implemented interfaces for a class, extended interfaces for an interface.
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub methods: Vec<Spanned<MethodDecl>>,
}

impl TypeDecl {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self { kind: TypeKind::Interface, ..Self::class(name) }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn method(mut self, line: u32, method: MethodDecl) -> Self {
        self.methods.push(Spanned::new(method, Span::line(line)));
        self
    }

    pub fn at(self, line: u32) -> Spanned<Self> {
        Spanned::new(self, Span::line(line))
    }

    /// Method declared here with the given erased signature.
    pub fn find_method(&self, key: &ErasedSignature) -> Option<&Spanned<MethodDecl>> {
        self.methods.iter().find(|m| m.node.erased_signature() == *key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default = "TypeRef::void")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: TypeRef::void(),
            annotations: Vec::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = TypeRef::new(ty);
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Name plus erased parameter types; what Java override matching looks at.
    pub fn erased_signature(&self) -> ErasedSignature {
        ErasedSignature {
            name: self.name.clone(),
            params: self.params.iter().map(|p| p.ty.erased()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: TypeRef::new(ty), annotations: Vec::new() }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A resolved type as written in a signature, e.g. `java.lang.Class<?>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(ty: impl Into<String>) -> Self {
        Self(ty.into())
    }

    pub fn void() -> Self {
        Self("void".to_string())
    }

    /// The type with every generic argument list removed: `Map<K, List<V>>[]` → `Map[]`.
    pub fn erased(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut depth = 0usize;
        for c in self.0.chars() {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                c if depth == 0 && !c.is_whitespace() => out.push(c),
                _ => {}
            }
        }
        out
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErasedSignature {
    pub name: String,
    pub params: Vec<String>,
}

impl std::fmt::Display for ErasedSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// An annotation use with its resolved qualified name and member values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn marker(name: impl Into<String>) -> Self {
        Self { name: name.into(), values: BTreeMap::new() }
    }

    pub fn with(mut self, member: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(member.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationValue {
    /// A class literal, `String.class`, by qualified name.
    Class(String),
    Str(String),
    Int(i64),
    Bool(bool),
    Array(Vec<AnnotationValue>),
}
