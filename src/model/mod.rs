//! Resolved declaration model supplied by the external front-end.
//!
//! The front-end (parser + type resolver) dumps each compilation unit's
//! type and method declarations as JSON; nothing here looks at Java text.

pub mod ast;

use std::path::Path;

use crate::diagnostics::CompileError;
use ast::Program;

/// Parse a program model from its JSON form. `origin` names the input in errors.
pub fn parse_program(json: &str, origin: &str) -> Result<Program, CompileError> {
    serde_json::from_str(json)
        .map_err(|e| CompileError::model(format!("{origin}: invalid declaration model: {e}")))
}

/// Read and parse a program model file.
pub fn load_program(path: &Path) -> Result<Program, CompileError> {
    let json = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
    parse_program(&json, &path.display().to_string())
}

/// Load several model files into one program so the type lattice spans all of them.
pub fn load_programs<P: AsRef<Path>>(paths: &[P]) -> Result<Program, CompileError> {
    let mut program = Program::default();
    for path in paths {
        program.merge(load_program(path.as_ref())?);
    }
    Ok(program)
}
