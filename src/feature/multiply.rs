use crate::foundation::{error::ValidationIssue, report::ValidationReport};

/// Product of two or more referenced values.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiplyFeature {
    /// Feature name, unique within the owning definition.
    pub name: String,
    /// Referenced input/feature names, in order. Repeats are allowed (`a * a`).
    pub inputs: Vec<String>,
}

impl MultiplyFeature {
    /// Build a multiply over `inputs`.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Referenced names.
    pub fn inputs(&self) -> Vec<&str> {
        self.inputs.iter().map(String::as_str).collect()
    }

    pub(crate) fn check(&self, report: &mut ValidationReport) {
        if self.inputs.len() < 2 {
            report.issue(ValidationIssue::InsufficientInputs {
                feature: self.name.clone(),
                expected: "expected at least 2",
                found: self.inputs.len(),
            });
        }
    }
}
