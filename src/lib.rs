pub mod span;
pub mod diagnostics;
pub mod model;
pub mod config;
pub mod rebind;
pub mod tracing_config;

use config::ValidatorConfig;
use diagnostics::{CompileError, render_failure};
use model::ast::Program;
use rebind::contract::RebindContract;
use rebind::{ProgramReport, Validator};

/// Validate every unit of an already loaded program.
pub fn check_program(
    program: &Program,
    config: &ValidatorConfig,
) -> Result<ProgramReport, CompileError> {
    let validator = Validator::new(program, config)?;
    Ok(validator.validate_program())
}

/// Contracts of every well-formed rebind method in the program.
pub fn contracts_of(
    program: &Program,
    config: &ValidatorConfig,
) -> Result<Vec<RebindContract>, CompileError> {
    let validator = Validator::new(program, config)?;
    Ok(validator.contracts())
}

/// Text for every failed unit of `report`, using the unit's source text for
/// snippets when the model carries it.
pub fn render_report(program: &Program, report: &ProgramReport, color: bool) -> String {
    let mut out = String::new();
    for (unit, outcome) in program.units.iter().zip(&report.outcomes) {
        if let Err(failure) = outcome {
            out.push_str(&render_failure(failure, unit.source.as_deref(), color));
        }
    }
    out
}
