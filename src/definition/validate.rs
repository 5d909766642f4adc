use std::collections::HashSet;

use crate::{
    definition::model::Definition,
    foundation::{error::ValidationIssue, report::ValidationReport},
};

impl Definition {
    /// Run every invariant check and collect all findings.
    ///
    /// Pure: the cached validity is left alone. See [`Definition::is_definition_valid`] for the
    /// caching form.
    pub fn validation_report(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let input_set: HashSet<&str> = self.inputs.iter().map(String::as_str).collect();
        report_duplicates(self.inputs.iter().map(String::as_str), &mut report, |name| {
            ValidationIssue::DuplicateName { name }
        });

        let (feature_names, had_duplicate) = self.features.feature_names();
        if had_duplicate {
            report_duplicates(feature_names.iter().copied(), &mut report, |name| {
                ValidationIssue::DuplicateName { name }
            });
        }
        for name in &feature_names {
            if input_set.contains(name) {
                report.issue(ValidationIssue::NameCollision {
                    name: (*name).to_string(),
                });
            }
        }

        let known: HashSet<&str> = input_set
            .iter()
            .copied()
            .chain(feature_names.iter().copied())
            .collect();
        for feature in self.features.iter() {
            feature.check(&known, &mut report);
        }

        if self.outputs.is_empty() {
            report.issue(ValidationIssue::NoOutputs);
        }
        for (output, source) in &self.outputs {
            if !known.contains(source.as_str()) {
                report.issue(ValidationIssue::UnresolvedOutput {
                    output: output.clone(),
                    source_name: source.clone(),
                });
            }
        }

        report_duplicates(self.null_outputs.iter().map(String::as_str), &mut report, |name| {
            ValidationIssue::DuplicateNullOutput { name }
        });
        let mut conflicts = HashSet::new();
        for name in &self.null_outputs {
            if self.outputs.contains_key(name) && conflicts.insert(name.as_str()) {
                report.issue(ValidationIssue::NullOutputConflict { name: name.clone() });
            }
        }

        report
    }
}

// One issue per repeated name, however often it repeats.
fn report_duplicates<'a>(
    names: impl Iterator<Item = &'a str>,
    report: &mut ValidationReport,
    issue: impl Fn(String) -> ValidationIssue,
) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            report.issue(issue(name.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/definition/validate.rs"]
mod tests;
