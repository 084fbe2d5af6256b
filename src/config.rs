use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::CompileError;

pub const CONFIG_FILE: &str = "rebind.toml";

pub const DEFAULT_REBIND: &str = "com.google.gwt.core.shared.Rebind";
pub const DEFAULT_TYPE_PARAM: &str = "com.google.gwt.core.shared.Rebind.Type";
pub const DEFAULT_REBIND_PARAM: &str = "com.google.gwt.core.shared.Rebind.Param";
pub const DEFAULT_TYPE_MEMBER: &str = "type";

/// Qualified names of the rebind annotation family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationNames {
    pub rebind: String,
    pub type_param: String,
    pub rebind_param: String,
    /// Member of the rebind annotation holding the explicit type.
    pub type_member: String,
    /// Explicit type value that stands for "not given" (an annotation default).
    pub default_type: Option<String>,
}

impl Default for AnnotationNames {
    fn default() -> Self {
        Self {
            rebind: DEFAULT_REBIND.to_string(),
            type_param: DEFAULT_TYPE_PARAM.to_string(),
            rebind_param: DEFAULT_REBIND_PARAM.to_string(),
            type_member: DEFAULT_TYPE_MEMBER.to_string(),
            default_type: None,
        }
    }
}

/// What to do with a rebind annotation that names no type at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnspecifiedPolicy {
    #[default]
    Allow,
    Deny,
    /// Legal on a declaration that overrides nothing, an error on an override.
    DenyOnOverride,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub unspecified: UnspecifiedPolicy,
    pub parallel: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { unspecified: UnspecifiedPolicy::Allow, parallel: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub annotations: AnnotationNames,
    pub validation: ValidationOptions,
}

// ---- TOML deserialization types ----

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    annotations: Option<TomlAnnotations>,
    validation: Option<TomlValidation>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlAnnotations {
    rebind: Option<String>,
    type_param: Option<String>,
    rebind_param: Option<String>,
    type_member: Option<String>,
    default_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlValidation {
    unspecified: Option<UnspecifiedPolicy>,
    parallel: Option<bool>,
}

impl ValidatorConfig {
    /// Parse a `rebind.toml` body. `path` is only used for error messages.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, CompileError> {
        let raw: TomlConfig = toml::from_str(text)
            .map_err(|e| CompileError::config(e.to_string(), path.to_path_buf()))?;

        let mut config = ValidatorConfig::default();
        if let Some(ann) = raw.annotations {
            let names = &mut config.annotations;
            for (key, value, slot) in [
                ("rebind", ann.rebind, &mut names.rebind),
                ("type_param", ann.type_param, &mut names.type_param),
                ("rebind_param", ann.rebind_param, &mut names.rebind_param),
                ("type_member", ann.type_member, &mut names.type_member),
            ] {
                if let Some(value) = value {
                    if value.trim().is_empty() {
                        return Err(CompileError::config(
                            format!("annotations.{key} must not be empty"),
                            path.to_path_buf(),
                        ));
                    }
                    *slot = value;
                }
            }
            names.default_type = ann.default_type;
        }
        if let Some(val) = raw.validation {
            if let Some(policy) = val.unspecified {
                config.validation.unspecified = policy;
            }
            if let Some(parallel) = val.parallel {
                config.validation.parallel = parallel;
            }
        }

        let names = &config.annotations;
        if names.type_param == names.rebind_param {
            return Err(CompileError::config(
                format!(
                    "annotations.type_param and annotations.rebind_param are both '{}'",
                    names.type_param
                ),
                path.to_path_buf(),
            ));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let text = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Load the nearest `rebind.toml` above `start_dir`, or the defaults if there is none.
    pub fn discover(start_dir: &Path) -> Result<Self, CompileError> {
        match find_config_walk(start_dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

fn find_config_walk(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        // Stop at the repository root
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}
