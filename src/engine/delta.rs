use super::syntax;
use crate::events::{Diagnostic, ResourceDiagnostics, ResourceKey, Severity};
use std::collections::HashMap;

/// Where the tracker reads the current diagnostics of a resource from. Reads
/// happen while a batch is processed, never ahead of time.
pub trait DiagnosticSource {
    fn diagnostics(&self, key: &ResourceKey) -> Vec<Diagnostic>;
}

impl DiagnosticSource for HashMap<ResourceKey, Vec<Diagnostic>> {
    fn diagnostics(&self, key: &ResourceKey) -> Vec<Diagnostic> {
        self.get(key).cloned().unwrap_or_default()
    }
}

impl DiagnosticSource for [ResourceDiagnostics] {
    fn diagnostics(&self, key: &ResourceKey) -> Vec<Diagnostic> {
        self.iter()
            .rev()
            .find(|resource| &resource.uri == key)
            .map(|resource| resource.diagnostics.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDelta {
    pub max_new_errors: u32,
    pub max_new_warnings: u32,
    pub any_fix: bool,
    pub all_new_errors_syntax: bool,
    pub victories: Vec<ResourceKey>,
}

#[derive(Debug, Default)]
pub struct DeltaTracker {
    errors: HashMap<ResourceKey, u32>,
    warnings: HashMap<ResourceKey, u32>,
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self, key: &ResourceKey) -> Option<u32> {
        self.errors.get(key).copied()
    }

    pub fn warning_count(&self, key: &ResourceKey) -> Option<u32> {
        self.warnings.get(key).copied()
    }

    pub fn total_errors(&self) -> u32 {
        self.errors.values().sum()
    }

    pub fn apply<S>(&mut self, batch: &[ResourceKey], source: &S) -> BatchDelta
    where
        S: DiagnosticSource + ?Sized,
    {
        let mut delta = BatchDelta::default();
        let mut grown_errors: Vec<Diagnostic> = Vec::new();

        for key in batch {
            let diagnostics = source.diagnostics(key);
            let errors: Vec<&Diagnostic> = diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .collect();
            let current_errors = errors.len() as u32;
            let current_warnings = diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Warning)
                .count() as u32;

            let previous_errors = self.error_count(key).unwrap_or(0);
            if current_errors > previous_errors {
                delta.max_new_errors = delta.max_new_errors.max(current_errors - previous_errors);
                grown_errors.extend(errors.into_iter().cloned());
            }
            if current_errors < previous_errors {
                delta.any_fix = true;
                if current_errors == 0 {
                    delta.victories.push(key.clone());
                }
            }

            let previous_warnings = self.warning_count(key).unwrap_or(0);
            if current_warnings > previous_warnings {
                delta.max_new_warnings = delta
                    .max_new_warnings
                    .max(current_warnings - previous_warnings);
            }

            store(&mut self.errors, key, current_errors);
            store(&mut self.warnings, key, current_warnings);
        }

        delta.all_new_errors_syntax = syntax::all_syntax(&grown_errors);
        delta
    }
}

fn store(counts: &mut HashMap<ResourceKey, u32>, key: &ResourceKey, count: u32) {
    if count == 0 {
        counts.remove(key);
    } else {
        counts.insert(key.clone(), count);
    }
}
