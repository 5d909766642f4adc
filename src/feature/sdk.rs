use crate::{
    curve::key::{CurveKey, keys_are_ordered, sort_keys},
    foundation::{error::ValidationIssue, report::ValidationReport},
};

/// Set-driven-key: a piecewise-linear curve driven by one referenced value.
#[derive(Clone, Debug, PartialEq)]
pub struct SdkFeature {
    /// Feature name, unique within the owning definition.
    pub name: String,
    /// Referenced names; valid SDKs have exactly one.
    pub inputs: Vec<String>,
    /// Curve keys, ascending by `in_val`.
    pub keys: Vec<CurveKey>,
}

impl SdkFeature {
    /// Build an SDK driven by `input`. Keys are sorted by `in_val`.
    pub fn new(name: impl Into<String>, input: impl Into<String>, keys: Vec<CurveKey>) -> Self {
        Self::with_inputs(name, vec![input.into()], keys)
    }

    /// Build from an arbitrary input list (load paths may carry the wrong count).
    pub fn with_inputs(
        name: impl Into<String>,
        inputs: Vec<String>,
        mut keys: Vec<CurveKey>,
    ) -> Self {
        sort_keys(&mut keys);
        Self {
            name: name.into(),
            inputs,
            keys,
        }
    }

    /// The driving name, when exactly one is referenced.
    pub fn input(&self) -> Option<&str> {
        match self.inputs.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Referenced names.
    pub fn inputs(&self) -> Vec<&str> {
        self.inputs.iter().map(String::as_str).collect()
    }

    pub(crate) fn check(&self, report: &mut ValidationReport) {
        if self.inputs.len() != 1 {
            report.issue(ValidationIssue::InsufficientInputs {
                feature: self.name.clone(),
                expected: "expected exactly 1",
                found: self.inputs.len(),
            });
        }
        if self.keys.len() < 2 {
            report.issue(ValidationIssue::InsufficientKeys {
                feature: self.name.clone(),
                found: self.keys.len(),
            });
        } else if !keys_are_ordered(&self.keys) {
            report.issue(ValidationIssue::UnorderedKeys {
                feature: self.name.clone(),
            });
        }
    }
}
