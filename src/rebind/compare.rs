use super::contract::{ParamRole, RebindContract, TypeSource};

/// One way in which an overriding contract departs from the overridden one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    TypeSource { child: TypeSource, ancestor: TypeSource },
    ParamCount { child: usize, ancestor: usize },
    ParamRole { index: usize, child: ParamRole, ancestor: ParamRole },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::TypeSource { child, ancestor } => write!(
                f,
                "type comes from {} but the overridden method uses {}",
                child.describe(),
                ancestor.describe()
            ),
            Mismatch::ParamCount { child, ancestor } => {
                write!(f, "{child} parameters where the overridden method has {ancestor}")
            }
            Mismatch::ParamRole { index, child, ancestor } => write!(
                f,
                "parameter {} is {child} but {ancestor} in the overridden method",
                index + 1
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    Incompatible(Vec<Mismatch>),
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }
}

/// Both contracts take their type the same way. Carrier positions are left to
/// the per-parameter comparison.
fn same_type_source(child: &TypeSource, ancestor: &TypeSource) -> bool {
    match (child, ancestor) {
        (TypeSource::ExplicitType { class: a }, TypeSource::ExplicitType { class: b }) => a == b,
        (TypeSource::ParameterSupplied { .. }, TypeSource::ParameterSupplied { .. }) => true,
        (TypeSource::Unspecified, TypeSource::Unspecified) => true,
        _ => false,
    }
}

/// Decide whether `child` may override `ancestor` under the rebind rules.
/// Names, owners and locations never take part.
pub fn compare(child: &RebindContract, ancestor: &RebindContract) -> Compatibility {
    let mut mismatches = Vec::new();

    if !same_type_source(&child.type_source, &ancestor.type_source) {
        mismatches.push(Mismatch::TypeSource {
            child: child.type_source.clone(),
            ancestor: ancestor.type_source.clone(),
        });
    }

    if child.param_roles.len() != ancestor.param_roles.len() {
        mismatches.push(Mismatch::ParamCount {
            child: child.param_roles.len(),
            ancestor: ancestor.param_roles.len(),
        });
    }

    for (index, (c, a)) in child.param_roles.iter().zip(&ancestor.param_roles).enumerate() {
        if c != a {
            mismatches.push(Mismatch::ParamRole { index, child: *c, ancestor: *a });
        }
    }

    if mismatches.is_empty() {
        Compatibility::Compatible
    } else {
        Compatibility::Incompatible(mismatches)
    }
}
