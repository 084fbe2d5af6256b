pub mod line_index;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::span::Span;
use line_index::LineIndex;

pub const TOO_MANY_TYPE_PARAMS: &str = "Too much type parameters";
pub const TYPE_PARAM_ALREADY_DEFINED: &str =
    "Type parameter already defined in rebind annotation";
pub const MISSING_TYPE: &str = "Rebind annotation must define a type";
pub const OVERRIDE_MUST_CONFORM: &str =
    "Overriding method must conform to the rebinding method signature";

/// Failures of the tool itself, as opposed to problems found in the checked program.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model error: {msg}")]
    Model { msg: String },

    #[error("Config error in '{}': {msg}", path.display())]
    Config { msg: String, path: PathBuf },
}

impl CompileError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model { msg: msg.into() }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }
}

/// Every finding of this pass blocks code generation, so there is a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// A problem found in one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Path of the compilation unit, relative to the source root.
    pub unit: String,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(unit: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            unit: unit.into(),
            span,
            message: message.into(),
        }
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.span.line, self.message)
    }
}

/// Accumulates the diagnostics of a single compilation unit.
#[derive(Debug)]
pub struct DiagnosticCollector {
    unit: String,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into(), diagnostics: Vec::new() }
    }

    pub fn error(&mut self, span: Span, message: impl Into<String>) {
        let diag = Diagnostic::error(self.unit.clone(), span, message);
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        !self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics ordered by source position; ties keep insertion order.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| d.span);
        self.diagnostics
    }

    /// Close the unit: clean if no error was collected, a failure otherwise.
    pub fn finish(self, methods_checked: usize) -> Result<UnitReport, UnitFailure> {
        if self.has_errors() {
            let path = self.unit.clone();
            Err(UnitFailure { path, diagnostics: self.into_sorted() })
        } else {
            Ok(UnitReport { path: self.unit, methods_checked })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Clean,
    Failed,
}

/// A unit that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    pub path: String,
    pub methods_checked: usize,
}

/// A unit whose code generation must be aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Errors in '{path}'")]
pub struct UnitFailure {
    pub path: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitFailure {
    /// Plain report: the `Errors in '...'` header, then one `Line N: ...` per diagnostic.
    pub fn render(&self) -> String {
        let mut out = format!("{self}\n");
        for diag in &self.diagnostics {
            out.push_str(&format!("  {diag}\n"));
        }
        out
    }
}

/// Render one diagnostic against the unit's source with ariadne.
pub fn render_diagnostic(source: &str, diag: &Diagnostic, color: bool) -> String {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let index = LineIndex::new(source);
    let range = index.line_range(diag.span.line);
    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
    };
    let mut buf = Vec::new();
    let written = Report::build(kind, (), range.start)
        .with_config(Config::default().with_color(color))
        .with_message(format!("in '{}'", diag.unit))
        .with_label(Label::new(range).with_message(&diag.message))
        .finish()
        .write(Source::from(source), &mut buf);
    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => format!("{diag}\n"),
    }
}

/// Render a failed unit, with source snippets when the source text is known.
pub fn render_failure(failure: &UnitFailure, source: Option<&str>, color: bool) -> String {
    match source {
        Some(src) => {
            let mut out = format!("{failure}\n");
            for diag in &failure.diagnostics {
                out.push_str(&render_diagnostic(src, diag, color));
            }
            out
        }
        None => failure.render(),
    }
}
