#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rebindc::config::{DEFAULT_REBIND, DEFAULT_REBIND_PARAM, DEFAULT_TYPE_PARAM, ValidatorConfig};
use rebindc::diagnostics::UnitFailure;
use rebindc::model::ast::{Annotation, AnnotationValue, CompilationUnit, Param, Program, TypeDecl};
use rebindc::rebind::ProgramReport;

pub fn rebindc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rebindc"))
}

/// `@Rebind`
pub fn rebind() -> Annotation {
    Annotation::marker(DEFAULT_REBIND)
}

/// `@Rebind(type = <class>.class)`
pub fn rebind_type(class: &str) -> Annotation {
    rebind().with("type", AnnotationValue::Class(class.to_string()))
}

/// `@Rebind.Type Class<?> <name>`
pub fn type_param(name: &str) -> Param {
    Param::new(name, "java.lang.Class<?>").annotated(Annotation::marker(DEFAULT_TYPE_PARAM))
}

/// `@Rebind.Param <ty> <name>`
pub fn rebind_param(name: &str, ty: &str) -> Param {
    Param::new(name, ty).annotated(Annotation::marker(DEFAULT_REBIND_PARAM))
}

/// One unit holding `ty`, declared at `line`.
pub fn unit(ty: TypeDecl, line: u32) -> CompilationUnit {
    CompilationUnit::new(vec![ty.at(line)])
}

pub fn check(program: &Program) -> ProgramReport {
    check_with(program, &ValidatorConfig::default())
}

pub fn check_with(program: &Program, config: &ValidatorConfig) -> ProgramReport {
    rebindc::check_program(program, config).unwrap()
}

/// The only failed unit of the report.
pub fn single_failure(report: &ProgramReport) -> &UnitFailure {
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1, "expected exactly one failed unit, got {failures:?}");
    failures[0]
}

/// Assert exactly one unit failed, at `path`, with exactly these `(line, message)` diagnostics.
pub fn assert_fails_with(report: &ProgramReport, path: &str, expected: &[(u32, &str)]) {
    let failure = single_failure(report);
    assert_eq!(failure.path, path);
    let actual: Vec<(u32, &str)> =
        failure.diagnostics.iter().map(|d| (d.line(), d.message.as_str())).collect();
    assert_eq!(actual, expected);
}

/// A scratch directory that stops `rebind.toml` discovery at its root.
pub fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    dir
}

pub fn write_model(dir: &Path, name: &str, program: &Program) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(program).unwrap()).unwrap();
    path
}

/// Run `rebindc <args>` inside `dir`.
pub fn run_in(dir: &Path, args: &[&str]) -> Output {
    rebindc().current_dir(dir).args(args).output().unwrap()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
