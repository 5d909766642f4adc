use std::collections::BTreeMap;

use crate::foundation::{
    error::{ValidationIssue, ValidationWarning},
    report::ValidationReport,
};

/// Optional clamp applied to a weighted sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Range {
    /// Minimum result, if clamped from below.
    pub lower_bound: Option<f64>,
    /// Maximum result, if clamped from above.
    pub upper_bound: Option<f64>,
}

impl Range {
    /// No clamping on either side.
    pub const UNBOUNDED: Self = Self {
        lower_bound: None,
        upper_bound: None,
    };

    /// Return `true` when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.lower_bound.is_none() && self.upper_bound.is_none()
    }

    /// Clamp `v` into the configured bounds.
    pub fn apply(&self, v: f64) -> f64 {
        let v = self.lower_bound.map_or(v, |lo| v.max(lo));
        self.upper_bound.map_or(v, |hi| v.min(hi))
    }
}

/// `clamp(sum(weight * value))` over two or more referenced values.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedSumFeature {
    /// Feature name, unique within the owning definition.
    pub name: String,
    /// Referenced name -> weight.
    pub weights: BTreeMap<String, f64>,
    /// Clamp applied to the total.
    pub range: Range,
}

impl WeightedSumFeature {
    /// Build an unclamped weighted sum. Repeated names have their weights added.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        weights: impl IntoIterator<Item = (S, f64)>,
    ) -> Self {
        let mut map = BTreeMap::new();
        for (input, w) in weights {
            *map.entry(input.into()).or_insert(0.0) += w;
        }
        Self {
            name: name.into(),
            weights: map,
            range: Range::UNBOUNDED,
        }
    }

    /// Same feature with a clamp range.
    pub fn with_range(mut self, lower_bound: Option<f64>, upper_bound: Option<f64>) -> Self {
        self.range = Range {
            lower_bound,
            upper_bound,
        };
        self
    }

    /// Referenced names.
    pub fn inputs(&self) -> Vec<&str> {
        self.weights.keys().map(String::as_str).collect()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    pub(crate) fn check(&self, report: &mut ValidationReport) {
        if self.weights.len() < 2 {
            report.issue(ValidationIssue::InsufficientInputs {
                feature: self.name.clone(),
                expected: "expected at least 2",
                found: self.weights.len(),
            });
        }

        if let (Some(lower), Some(upper)) = (self.range.lower_bound, self.range.upper_bound) {
            if lower > upper {
                report.issue(ValidationIssue::InvalidRange {
                    feature: self.name.clone(),
                    lower,
                    upper,
                });
            }
        }

        if self.range.is_unbounded() {
            let total = self.total_weight();
            if !(-1.0..=1.0).contains(&total) {
                report.warn(ValidationWarning::UnclampedWeightTotal {
                    feature: self.name.clone(),
                    total,
                });
            }
        }
    }
}
