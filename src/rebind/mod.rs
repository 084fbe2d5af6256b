//! Rebinding signature validation.
//!
//! For every method of a compilation unit that takes part in the rebind
//! protocol: build its contract (construction rules), find the rebind-annotated
//! declarations it overrides, and require its contract to match each of them.
//! All diagnostics of a unit are collected before its verdict is decided.

pub mod annotations;
pub mod compare;
pub mod contract;
pub mod extract;
pub mod hierarchy;
pub mod walker;

use crate::config::{UnspecifiedPolicy, ValidationOptions, ValidatorConfig};
use crate::diagnostics::{
    CompileError, Diagnostic, DiagnosticCollector, OVERRIDE_MUST_CONFORM, UnitFailure, UnitReport,
    Verdict,
};
use crate::model::ast::Program;
use annotations::{AnnotationAccessor, NamedAnnotations};
use compare::{Compatibility, compare};
use contract::{RebindContract, TypeSource};
use extract::{ConstructionError, extract_contract};
use hierarchy::{AncestorLookup, MethodRef, TypeHierarchy};
use walker::OverrideWalker;

/// Outcome of one compilation unit: clean, or a failure that must stop code
/// generation for that unit.
pub type UnitOutcome = Result<UnitReport, UnitFailure>;

/// Outcomes of every unit of a program, in input order.
#[derive(Debug, Clone)]
pub struct ProgramReport {
    pub outcomes: Vec<UnitOutcome>,
}

impl ProgramReport {
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &UnitFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn verdicts(&self) -> Vec<(&str, Verdict)> {
        self.outcomes
            .iter()
            .map(|o| match o {
                Ok(report) => (report.path.as_str(), Verdict::Clean),
                Err(failure) => (failure.path.as_str(), Verdict::Failed),
            })
            .collect()
    }

    /// Every diagnostic, grouped by unit in input order, then by line.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.failures().flat_map(|f| f.diagnostics.iter()).collect()
    }
}

fn unit_methods(program: &Program, unit: usize) -> impl Iterator<Item = MethodRef<'_>> {
    program.units[unit].types.iter().flat_map(move |ty| {
        ty.node.methods.iter().map(move |method| MethodRef { unit, owner: &ty.node, method })
    })
}

pub struct Validator<'p, L = TypeHierarchy<'p>, A = NamedAnnotations> {
    program: &'p Program,
    paths: Vec<String>,
    lookup: L,
    annotations: A,
    options: ValidationOptions,
}

impl<'p> Validator<'p> {
    /// Validator over `program` using its own type lattice and the configured annotation names.
    pub fn new(program: &'p Program, config: &ValidatorConfig) -> Result<Self, CompileError> {
        let lookup = TypeHierarchy::build(program)?;
        let annotations = NamedAnnotations::new(config.annotations.clone());
        Ok(Self::with_capabilities(program, lookup, annotations, config.validation.clone()))
    }
}

impl<'p, L, A> Validator<'p, L, A>
where
    L: AncestorLookup<'p>,
    A: AnnotationAccessor,
{
    pub fn with_capabilities(
        program: &'p Program,
        lookup: L,
        annotations: A,
        options: ValidationOptions,
    ) -> Self {
        let paths = program.units.iter().map(|u| u.path()).collect();
        Self { program, paths, lookup, annotations, options }
    }

    fn contract_of(
        &self,
        method: &MethodRef<'p>,
    ) -> Result<RebindContract, Vec<ConstructionError>> {
        extract_contract(method.owner, method.method, &self.paths[method.unit], &self.annotations)
    }

    fn rejects_unspecified(&self, overrides: bool) -> bool {
        match self.options.unspecified {
            UnspecifiedPolicy::Allow => false,
            UnspecifiedPolicy::Deny => true,
            UnspecifiedPolicy::DenyOnOverride => overrides,
        }
    }

    /// Validate the unit at index `unit` of the program.
    pub fn validate_unit(&self, unit: usize) -> UnitOutcome {
        let path = &self.paths[unit];
        let _span = tracing::debug_span!("validate_unit", unit = %path).entered();

        let walker = OverrideWalker::new(&self.lookup, &self.annotations);
        let mut collector = DiagnosticCollector::new(path.clone());
        let mut checked = 0;

        for method in unit_methods(self.program, unit) {
            if !self.annotations.participates(&method.method.node) {
                continue;
            }
            checked += 1;
            let span = method.method.span;

            // No contract means no override checks for this method
            let contract = match self.contract_of(&method) {
                Ok(contract) => contract,
                Err(errors) => {
                    for err in errors {
                        collector.error(span, err.to_string());
                    }
                    continue;
                }
            };

            let ancestors = walker.nearest_annotated_ancestors(&method);
            if contract.type_source == TypeSource::Unspecified
                && self.rejects_unspecified(!ancestors.is_empty())
            {
                collector.error(span, ConstructionError::MissingType.to_string());
                continue;
            }

            // One error per incompatible pair, however many fields differ
            for ancestor in &ancestors {
                let Ok(ancestor_contract) = self.contract_of(ancestor) else {
                    tracing::trace!(ancestor = %ancestor.describe(), "ancestor has no contract");
                    continue;
                };
                let compatibility = compare(&contract, &ancestor_contract);
                if let Compatibility::Incompatible(mismatches) = compatibility {
                    for mismatch in &mismatches {
                        tracing::trace!(
                            method = %method.describe(),
                            ancestor = %ancestor.describe(),
                            %mismatch,
                            "rebind contract mismatch"
                        );
                    }
                    collector.error(span, OVERRIDE_MUST_CONFORM);
                }
            }
        }

        let errors = collector.len();
        let outcome = collector.finish(checked);
        tracing::debug!(unit = %path, checked, errors, clean = outcome.is_ok(), "validated unit");
        outcome
    }

    /// Contracts of every participating method whose annotations are well formed.
    pub fn contracts(&self) -> Vec<RebindContract> {
        (0..self.program.units.len())
            .flat_map(|unit| unit_methods(self.program, unit))
            .filter(|m| self.annotations.participates(&m.method.node))
            .filter_map(|m| self.contract_of(&m).ok())
            .collect()
    }
}

impl<'p, L, A> Validator<'p, L, A>
where
    L: AncestorLookup<'p> + Sync,
    A: AnnotationAccessor + Sync,
{
    /// Validate every unit. A failing unit never stops the others.
    pub fn validate_program(&self) -> ProgramReport {
        let count = self.program.units.len();
        let outcomes: Vec<UnitOutcome> = if self.options.parallel && count > 1 {
            use rayon::prelude::*;
            (0..count).into_par_iter().map(|unit| self.validate_unit(unit)).collect()
        } else {
            (0..count).map(|unit| self.validate_unit(unit)).collect()
        };
        ProgramReport { outcomes }
    }
}
