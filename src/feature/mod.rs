//! Feature variants: the named scalar computations a definition is built from.

pub(crate) mod multiply;
pub(crate) mod registry;
pub(crate) mod sdk;
pub(crate) mod weighted_sum;

use std::collections::HashSet;

use crate::foundation::{error::ValidationIssue, report::ValidationReport};

pub use multiply::MultiplyFeature;
pub use sdk::SdkFeature;
pub use weighted_sum::{Range, WeightedSumFeature};

/// Variant tag of a [`Feature`]; doubles as the wire `type` discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Product of the referenced values.
    Multiply,
    /// Optionally clamped weighted sum of the referenced values.
    WeightedSum,
    /// Piecewise-linear curve applied to one referenced value.
    Sdk,
}

impl FeatureKind {
    /// Wire discriminator for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multiply => "multiply",
            Self::WeightedSum => "weighted_sum",
            Self::Sdk => "sdk",
        }
    }

    /// Parse a wire discriminator.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "multiply" => Some(Self::Multiply),
            "weighted_sum" => Some(Self::WeightedSum),
            "sdk" => Some(Self::Sdk),
            _ => None,
        }
    }
}

/// Owned feature of any variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Feature {
    /// See [`MultiplyFeature`].
    Multiply(MultiplyFeature),
    /// See [`WeightedSumFeature`].
    WeightedSum(WeightedSumFeature),
    /// See [`SdkFeature`].
    Sdk(SdkFeature),
}

impl Feature {
    /// Borrow as a [`FeatureRef`].
    pub fn as_feature_ref(&self) -> FeatureRef<'_> {
        match self {
            Self::Multiply(f) => FeatureRef::Multiply(f),
            Self::WeightedSum(f) => FeatureRef::WeightedSum(f),
            Self::Sdk(f) => FeatureRef::Sdk(f),
        }
    }

    /// Feature name.
    pub fn name(&self) -> &str {
        self.as_feature_ref().name()
    }

    /// Variant tag.
    pub fn kind(&self) -> FeatureKind {
        self.as_feature_ref().kind()
    }

    /// Names this feature reads from, in declaration order.
    pub fn inputs(&self) -> Vec<&str> {
        self.as_feature_ref().inputs()
    }

    /// Check the local invariants against the names legal in the owning definition.
    pub fn is_valid(&self, known: &HashSet<&str>) -> bool {
        self.as_feature_ref().is_valid(known)
    }
}

impl From<MultiplyFeature> for Feature {
    fn from(f: MultiplyFeature) -> Self {
        Self::Multiply(f)
    }
}

impl From<WeightedSumFeature> for Feature {
    fn from(f: WeightedSumFeature) -> Self {
        Self::WeightedSum(f)
    }
}

impl From<SdkFeature> for Feature {
    fn from(f: SdkFeature) -> Self {
        Self::Sdk(f)
    }
}

/// Borrowed feature of any variant, as returned by lookups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeatureRef<'a> {
    /// See [`MultiplyFeature`].
    Multiply(&'a MultiplyFeature),
    /// See [`WeightedSumFeature`].
    WeightedSum(&'a WeightedSumFeature),
    /// See [`SdkFeature`].
    Sdk(&'a SdkFeature),
}

impl<'a> FeatureRef<'a> {
    /// Feature name.
    pub fn name(self) -> &'a str {
        match self {
            Self::Multiply(f) => &f.name,
            Self::WeightedSum(f) => &f.name,
            Self::Sdk(f) => &f.name,
        }
    }

    /// Variant tag.
    pub fn kind(self) -> FeatureKind {
        match self {
            Self::Multiply(_) => FeatureKind::Multiply,
            Self::WeightedSum(_) => FeatureKind::WeightedSum,
            Self::Sdk(_) => FeatureKind::Sdk,
        }
    }

    /// Names this feature reads from.
    pub fn inputs(self) -> Vec<&'a str> {
        match self {
            Self::Multiply(f) => f.inputs(),
            Self::WeightedSum(f) => f.inputs(),
            Self::Sdk(f) => f.inputs(),
        }
    }

    /// Check the local invariants, discarding the findings.
    pub fn is_valid(self, known: &HashSet<&str>) -> bool {
        let mut report = ValidationReport::default();
        self.check(known, &mut report);
        report.is_valid()
    }

    /// Append this feature's findings to `report`.
    pub(crate) fn check(self, known: &HashSet<&str>, report: &mut ValidationReport) {
        check_references(self.name(), &self.inputs(), known, report);
        match self {
            Self::Multiply(f) => f.check(report),
            Self::WeightedSum(f) => f.check(report),
            Self::Sdk(f) => f.check(report),
        }
    }

    /// Clone into an owned [`Feature`].
    pub fn to_owned_feature(self) -> Feature {
        match self {
            Self::Multiply(f) => Feature::Multiply(f.clone()),
            Self::WeightedSum(f) => Feature::WeightedSum(f.clone()),
            Self::Sdk(f) => Feature::Sdk(f.clone()),
        }
    }
}

// Self-reference and resolution checks shared by every variant.
fn check_references(
    name: &str,
    inputs: &[&str],
    known: &HashSet<&str>,
    report: &mut ValidationReport,
) {
    if inputs.contains(&name) {
        report.issue(ValidationIssue::SelfReference {
            feature: name.to_string(),
        });
    }
    for input in inputs {
        if !known.contains(input) {
            report.issue(ValidationIssue::UnresolvedReference {
                feature: name.to_string(),
                reference: (*input).to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/feature/mod.rs"]
mod tests;
