use thiserror::Error;

use crate::diagnostics::{MISSING_TYPE, TOO_MANY_TYPE_PARAMS, TYPE_PARAM_ALREADY_DEFINED};
use crate::model::ast::{MethodDecl, TypeDecl};
use crate::span::Spanned;
use super::annotations::{AnnotationAccessor, ParamMarker};
use super::contract::{MethodSignature, ParamRole, RebindContract, SourceLocation, TypeSource};

/// Annotation usage that contradicts itself within one method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("{}", TOO_MANY_TYPE_PARAMS)]
    TooManyTypeParams { positions: Vec<usize> },

    #[error("{}", TYPE_PARAM_ALREADY_DEFINED)]
    TypeParamAlreadyDefined { class: String, index: usize },

    #[error("{}", MISSING_TYPE)]
    MissingType,
}

/// Build the rebind contract of `method`, declared in `owner` inside the unit at `file`.
///
/// Every construction error of the method is returned, in a fixed order. Only
/// meaningful for methods the accessor reports as participating; a method
/// without the rebind annotation is read as if annotated without a type.
pub fn extract_contract<A: AnnotationAccessor + ?Sized>(
    owner: &TypeDecl,
    method: &Spanned<MethodDecl>,
    file: &str,
    accessor: &A,
) -> Result<RebindContract, Vec<ConstructionError>> {
    let m = &method.node;

    let param_roles: Vec<ParamRole> = m
        .params
        .iter()
        .map(|p| match accessor.param_marker_of(p) {
            Some(ParamMarker::Type) => ParamRole::TypeCarrier,
            Some(ParamMarker::Param) => ParamRole::RebindParam,
            None => ParamRole::Plain,
        })
        .collect();

    let carriers: Vec<usize> = param_roles
        .iter()
        .enumerate()
        .filter(|(_, role)| **role == ParamRole::TypeCarrier)
        .map(|(i, _)| i)
        .collect();
    let explicit = accessor.rebind_annotation_of(m).and_then(|a| a.explicit_type);

    let mut errors = Vec::new();
    if carriers.len() > 1 {
        errors.push(ConstructionError::TooManyTypeParams { positions: carriers.clone() });
    }
    if let (Some(class), Some(&index)) = (&explicit, carriers.first()) {
        errors.push(ConstructionError::TypeParamAlreadyDefined { class: class.clone(), index });
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let type_source = match (explicit, carriers.first()) {
        (Some(class), _) => TypeSource::ExplicitType { class },
        (None, Some(&index)) => TypeSource::ParameterSupplied { index },
        (None, None) => TypeSource::Unspecified,
    };

    let contract = RebindContract {
        owner: owner.name.clone(),
        signature: MethodSignature::of(m),
        type_source,
        param_roles,
        location: SourceLocation { file: file.to_string(), line: method.span.line },
    };
    tracing::trace!(
        owner = %contract.owner,
        method = %contract.signature.name,
        source = %contract.type_source.describe(),
        "built rebind contract"
    );
    Ok(contract)
}
