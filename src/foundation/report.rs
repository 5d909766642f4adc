use crate::foundation::error::{ValidationErrors, ValidationIssue, ValidationWarning};

/// Everything one validation pass found: invariant violations plus non-fatal warnings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    /// Broken invariants; any entry makes the subject invalid.
    pub issues: Vec<ValidationIssue>,
    /// Findings that are logged but never flip validity.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Return `true` when no invariant is broken.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub(crate) fn warn(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Emit every finding through `tracing`.
    pub(crate) fn log(&self, context: &str, warn: bool) {
        for issue in &self.issues {
            tracing::error!(definition = context, "{issue}");
        }
        if warn {
            for warning in &self.warnings {
                tracing::warn!(definition = context, "{warning}");
            }
        }
    }

    /// Convert into a `Result`, dropping warnings.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        ValidationErrors {
            errors: self.issues,
        }
        .into_result()
    }
}
