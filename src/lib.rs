//! Rigbake compiles layered rig-remapping graphs.
//!
//! A rig is described by a chain of [`Definition`]s. Each layer declares named inputs, a set of
//! scalar features computed from them, and the outputs the next layer consumes. Baking
//! collapses the chain into one equivalent definition that reads only the first layer's inputs.
//!
//! # Pipeline overview
//!
//! 1. **Load**: JSON wire payload -> [`Definition`] (each section loads independently)
//! 2. **Validate**: [`Definition::validation_report`] collects every broken invariant
//! 3. **Link**: [`LinkedDefinitions`] orders definitions held in a [`DefinitionStore`]
//! 4. **Bake**: [`LinkedDefinitions::bake`] flattens the layers:
//!    - nested multiplies are merged
//!    - unclamped weighted sums have their coefficients multiplied through
//!    - stacked curves are composed into one curve
//!
//! Baking is deterministic. It reports every failure as a value and never panics on malformed
//! input.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bake;
mod curve;
mod definition;
mod feature;
mod foundation;

pub use bake::linked::{BakeSummary, DefinitionId, DefinitionStore, LinkedDefinitions};
pub use bake::opts::BakeOpts;
pub use curve::key::{CurveKey, sample_curve};
pub use definition::model::{Definition, Validity};
pub use definition::observer::{SubscriptionId, ValidityEvent};
pub use definition::wire::{DefinitionDef, FeatureDef, ParamsDef};
pub use feature::registry::FeatureDefinitions;
pub use feature::{
    Feature, FeatureKind, FeatureRef, MultiplyFeature, Range, SdkFeature, WeightedSumFeature,
};
pub use foundation::error::{
    BakeError, BakeErrors, LoadError, LoadErrors, RigError, RigResult, ValidationErrors,
    ValidationIssue, ValidationWarning,
};
pub use foundation::report::ValidationReport;
