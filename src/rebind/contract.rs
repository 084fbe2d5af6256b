use serde::Serialize;

use crate::model::ast::{ErasedSignature, MethodDecl, TypeRef};

/// Canonical description of one method's rebind semantics.
///
/// Built once per method by the extractor; everything downstream works on this
/// value and never looks at raw annotations again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebindContract {
    /// Qualified name of the declaring class or interface.
    pub owner: String,
    pub signature: MethodSignature,
    pub type_source: TypeSource,
    /// One entry per method parameter, in declaration order.
    pub param_roles: Vec<ParamRole>,
    /// Diagnostics only; never compared.
    pub location: SourceLocation,
}

/// Name, parameter types and return type. Used for identity and override
/// matching only, never for the rebind rules themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
}

impl MethodSignature {
    pub fn of(method: &MethodDecl) -> Self {
        Self {
            name: method.name.clone(),
            params: method.params.iter().map(|p| p.ty.clone()).collect(),
            return_type: method.return_type.clone(),
        }
    }

    pub fn erased(&self) -> ErasedSignature {
        ErasedSignature {
            name: self.name.clone(),
            params: self.params.iter().map(TypeRef::erased).collect(),
        }
    }
}

/// Where the target type of the rebinding comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSource {
    /// Given directly on the rebind annotation.
    ExplicitType { class: String },
    /// Supplied at the call site through the type-carrier parameter.
    ParameterSupplied { index: usize },
    Unspecified,
}

impl TypeSource {
    pub fn describe(&self) -> String {
        match self {
            TypeSource::ExplicitType { class } => format!("explicit type {class}"),
            TypeSource::ParameterSupplied { index } => format!("type parameter #{}", index + 1),
            TypeSource::Unspecified => "unspecified type".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    Plain,
    TypeCarrier,
    RebindParam,
}

impl std::fmt::Display for ParamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ParamRole::Plain => "plain",
            ParamRole::TypeCarrier => "type carrier",
            ParamRole::RebindParam => "rebind param",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}
