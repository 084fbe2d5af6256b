use crate::config::AnnotationNames;
use crate::model::ast::{Annotation, AnnotationValue, MethodDecl, Param};

/// The data of a rebind annotation found on a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebindAnnotation {
    /// Qualified class name given as the explicit target type, if any.
    pub explicit_type: Option<String>,
}

/// Marker on a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMarker {
    Type,
    Param,
}

/// Reads the rebind annotation family off declarations.
pub trait AnnotationAccessor {
    fn rebind_annotation_of(&self, method: &MethodDecl) -> Option<RebindAnnotation>;

    /// A parameter carrying both markers reports `Type`.
    fn param_marker_of(&self, param: &Param) -> Option<ParamMarker>;

    /// Whether the method takes part in the rebind protocol: annotated itself, or
    /// opted in by marking one of its parameters.
    fn participates(&self, method: &MethodDecl) -> bool {
        self.rebind_annotation_of(method).is_some()
            || method.params.iter().any(|p| self.param_marker_of(p).is_some())
    }
}

/// Accessor matching annotations by their configured qualified names.
#[derive(Debug, Clone, Default)]
pub struct NamedAnnotations {
    names: AnnotationNames,
}

impl NamedAnnotations {
    pub fn new(names: AnnotationNames) -> Self {
        Self { names }
    }

    fn find<'a>(annotations: &'a [Annotation], name: &str) -> Option<&'a Annotation> {
        annotations.iter().find(|a| a.name == name)
    }

    fn explicit_type(&self, annotation: &Annotation) -> Option<String> {
        let class = match annotation.values.get(&self.names.type_member)? {
            AnnotationValue::Class(class) => class,
            other => {
                tracing::trace!(value = ?other, "ignoring non-class rebind type value");
                return None;
            }
        };
        if self.names.default_type.as_deref() == Some(class.as_str()) {
            return None;
        }
        Some(class.clone())
    }
}

impl AnnotationAccessor for NamedAnnotations {
    fn rebind_annotation_of(&self, method: &MethodDecl) -> Option<RebindAnnotation> {
        let annotation = Self::find(&method.annotations, &self.names.rebind)?;
        Some(RebindAnnotation { explicit_type: self.explicit_type(annotation) })
    }

    fn param_marker_of(&self, param: &Param) -> Option<ParamMarker> {
        if Self::find(&param.annotations, &self.names.type_param).is_some() {
            Some(ParamMarker::Type)
        } else if Self::find(&param.annotations, &self.names.rebind_param).is_some() {
            Some(ParamMarker::Param)
        } else {
            None
        }
    }
}
