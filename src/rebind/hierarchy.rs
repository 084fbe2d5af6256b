use std::collections::{HashMap, HashSet};

use crate::diagnostics::CompileError;
use crate::model::ast::{MethodDecl, Program, TypeDecl};
use crate::span::Spanned;

/// A method declaration together with where it lives.
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'p> {
    /// Index of the declaring compilation unit in the program.
    pub unit: usize,
    pub owner: &'p TypeDecl,
    pub method: &'p Spanned<MethodDecl>,
}

impl MethodRef<'_> {
    pub fn describe(&self) -> String {
        format!("{}.{}", self.owner.name, self.method.node.erased_signature())
    }
}

/// An overridden declaration and the inheritance branch it was reached through.
#[derive(Debug, Clone, Copy)]
pub struct Ancestor<'p> {
    /// Index of the direct supertype of the overriding type that leads here:
    /// the superclass first, then each directly implemented interface.
    pub branch: usize,
    pub decl: MethodRef<'p>,
}

/// Finds the declarations a method overrides.
pub trait AncestorLookup<'p> {
    /// Every supertype declaration with the same erased signature as `method`,
    /// annotated or not. Grouped by branch; within a branch nearest first
    /// (superclasses innermost first, then interfaces in declaration order).
    /// Each supertype appears at most once.
    fn find_overridden_declarations(&self, method: &MethodRef<'p>) -> Vec<Ancestor<'p>>;
}

#[derive(Debug, Clone, Copy)]
struct TypeEntry<'p> {
    unit: usize,
    decl: &'p TypeDecl,
}

/// Index over every type declared in a program.
///
/// Supertypes that are not part of the program (library classes such as
/// `java.lang.Object`) are treated as declaring nothing.
#[derive(Debug)]
pub struct TypeHierarchy<'p> {
    types: HashMap<&'p str, TypeEntry<'p>>,
}

impl<'p> TypeHierarchy<'p> {
    pub fn build(program: &'p Program) -> Result<Self, CompileError> {
        let mut types = HashMap::new();
        for (unit, cu) in program.units.iter().enumerate() {
            for ty in &cu.types {
                let name = ty.node.name.as_str();
                if types.insert(name, TypeEntry { unit, decl: &ty.node }).is_some() {
                    return Err(CompileError::model(format!(
                        "type '{name}' is declared more than once"
                    )));
                }
            }
        }
        Ok(Self { types })
    }

    /// Supertypes of `ty` split by the direct supertype they are reached through.
    /// A type shared by several branches belongs to the first one.
    fn branches_of(&self, ty: &'p TypeDecl) -> Vec<Vec<TypeEntry<'p>>> {
        let mut visited: HashSet<&'p str> = HashSet::new();
        visited.insert(ty.name.as_str());

        let mut branches = Vec::new();
        for name in ty.superclass.iter().chain(&ty.interfaces) {
            if !visited.insert(name.as_str()) {
                continue;
            }
            let Some(entry) = self.types.get(name.as_str()) else {
                tracing::trace!(ty = %ty.name, supertype = %name, "supertype outside the program");
                continue;
            };
            let mut branch = vec![*entry];
            self.supertypes_of(entry.decl, &mut visited, &mut branch);
            branches.push(branch);
        }
        branches
    }

    /// Proper supertypes of `ty` in walk order, skipping anything already visited.
    fn supertypes_of(
        &self,
        ty: &'p TypeDecl,
        visited: &mut HashSet<&'p str>,
        out: &mut Vec<TypeEntry<'p>>,
    ) {
        let mut classes = Vec::new();
        let mut next = ty.superclass.as_deref();
        while let Some(name) = next {
            if !visited.insert(name) {
                tracing::trace!(ty = %ty.name, superclass = name, "superclass already visited");
                break;
            }
            match self.types.get(name) {
                Some(entry) => {
                    classes.push(*entry);
                    next = entry.decl.superclass.as_deref();
                }
                None => {
                    tracing::trace!(superclass = name, "superclass outside the program");
                    break;
                }
            }
        }

        out.extend(classes.iter().copied());
        self.visit_interfaces(&ty.interfaces, visited, out);
        for class in &classes {
            self.visit_interfaces(&class.decl.interfaces, visited, out);
        }
    }

    fn visit_interfaces(
        &self,
        names: &'p [String],
        visited: &mut HashSet<&'p str>,
        out: &mut Vec<TypeEntry<'p>>,
    ) {
        for name in names {
            if !visited.insert(name.as_str()) {
                continue;
            }
            if let Some(entry) = self.types.get(name.as_str()) {
                out.push(*entry);
                self.visit_interfaces(&entry.decl.interfaces, visited, out);
            }
        }
    }
}

impl<'p> AncestorLookup<'p> for TypeHierarchy<'p> {
    fn find_overridden_declarations(&self, method: &MethodRef<'p>) -> Vec<Ancestor<'p>> {
        let key = method.method.node.erased_signature();
        let mut found = Vec::new();
        for (branch, entries) in self.branches_of(method.owner).into_iter().enumerate() {
            for entry in entries {
                if let Some(m) = entry.decl.find_method(&key) {
                    let decl = MethodRef { unit: entry.unit, owner: entry.decl, method: m };
                    found.push(Ancestor { branch, decl });
                }
            }
        }
        found
    }
}
