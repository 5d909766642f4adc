use std::fmt;

/// Convenience result type used across rigbake.
pub type RigResult<T> = Result<T, RigError>;

/// Top-level error taxonomy used by the public APIs.
#[derive(thiserror::Error, Debug)]
pub enum RigError {
    /// A definition payload could not be loaded.
    #[error("load error: {0}")]
    Load(#[from] LoadErrors),

    /// A definition (or a chain of definitions) breaks a graph invariant.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Baking a chain of definitions failed.
    #[error("bake error: {0}")]
    Bake(#[from] BakeErrors),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RigError {
    /// Build a [`RigError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// One problem found while reading a wire payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// A required field is absent.
    #[error("{section}: missing field '{field}'")]
    MissingField {
        /// Payload section (`inputs`, `features.<name>`, ...).
        section: String,
        /// Missing field name.
        field: String,
    },

    /// A field holds the wrong JSON type.
    #[error("{section}: field '{field}' must be {expected}")]
    WrongType {
        /// Payload section.
        section: String,
        /// Offending field name.
        field: String,
        /// Human readable expected type.
        expected: &'static str,
    },

    /// The `type` discriminator of a feature is not one of the known variants.
    #[error("feature '{feature}': unrecognized type '{kind}'")]
    UnknownFeatureType {
        /// Feature name.
        feature: String,
        /// Discriminator found in the payload.
        kind: String,
    },

    /// Parallel arrays of a feature payload differ in length.
    #[error("feature '{feature}': '{field}' has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Feature name.
        feature: String,
        /// Offending field.
        field: &'static str,
        /// Expected entry count.
        expected: usize,
        /// Entry count found.
        found: usize,
    },

    /// A feature shares its name with an input and was dropped from the graph.
    #[error("feature '{name}' collides with an input of the same name and was dropped")]
    NameCollision {
        /// Colliding name.
        name: String,
    },

    /// The payload is not parseable JSON at all.
    #[error("invalid json: {0}")]
    Json(String),
}

/// One broken invariant found while validating a definition.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// A name is declared more than once in a namespace.
    #[error("name '{name}' is declared more than once")]
    DuplicateName {
        /// Duplicated name.
        name: String,
    },

    /// A feature lists itself among its inputs.
    #[error("feature '{feature}' references itself")]
    SelfReference {
        /// Feature name.
        feature: String,
    },

    /// A feature references a name that is neither an input nor a feature.
    #[error("feature '{feature}' references unknown name '{reference}'")]
    UnresolvedReference {
        /// Feature name.
        feature: String,
        /// Unknown referenced name.
        reference: String,
    },

    /// A feature references too few (or too many) names for its variant.
    #[error("feature '{feature}' references {found} names, {expected}")]
    InsufficientInputs {
        /// Feature name.
        feature: String,
        /// Requirement, e.g. "expected at least 2".
        expected: &'static str,
        /// Number of names found.
        found: usize,
    },

    /// An SDK curve has fewer than two keys.
    #[error("sdk feature '{feature}' has {found} keys, expected at least 2")]
    InsufficientKeys {
        /// Feature name.
        feature: String,
        /// Number of keys found.
        found: usize,
    },

    /// SDK keys are not ascending, or the boundary keys share an `in` value.
    #[error("sdk feature '{feature}' keys are not ascending by input value")]
    UnorderedKeys {
        /// Feature name.
        feature: String,
    },

    /// A clamp range has `lower > upper`.
    #[error("weighted sum '{feature}' has range min {lower} greater than max {upper}")]
    InvalidRange {
        /// Feature name.
        feature: String,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },

    /// A feature has the same name as an input.
    #[error("feature '{name}' has the same name as an input")]
    NameCollision {
        /// Colliding name.
        name: String,
    },

    /// The definition declares no outputs.
    #[error("definition has no outputs")]
    NoOutputs,

    /// An output's source is neither an input nor a feature.
    #[error("output '{output}' has unknown source '{source_name}'")]
    UnresolvedOutput {
        /// Output name.
        output: String,
        /// Unknown source name.
        source_name: String,
    },

    /// A null output is listed more than once.
    #[error("null output '{name}' is listed more than once")]
    DuplicateNullOutput {
        /// Duplicated name.
        name: String,
    },

    /// A null output is also a regular output.
    #[error("null output '{name}' is also declared as an output")]
    NullOutputConflict {
        /// Conflicting name.
        name: String,
    },

    /// An input of a downstream layer has no matching output or null output upstream.
    #[error("input '{name}' of layer {layer} is not provided by the previous layer")]
    UnconnectedInput {
        /// Downstream layer index (always > 0).
        layer: usize,
        /// Input name.
        name: String,
    },
}

/// Non-fatal finding reported alongside validation; never flips validity.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A weighted sum without clamp bounds whose total weight leaves [-1, 1].
    #[error("weighted sum '{feature}' has total weight {total} and no clamp range")]
    UnclampedWeightTotal {
        /// Feature name.
        feature: String,
        /// Sum of the feature's weights.
        total: f64,
    },
}

/// One failure raised while baking a chain of definitions.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BakeError {
    /// Fewer than two source definitions were linked.
    #[error("baking needs at least 2 source definitions, found {found}")]
    TooFewSourceLayers {
        /// Number of linked definitions.
        found: usize,
    },

    /// A linked definition id does not exist in the store.
    #[error("source definition {index} is not present in the store")]
    UnknownDefinition {
        /// Position in the linked chain.
        index: usize,
    },

    /// A source definition fails validation.
    #[error("source definition {index} is invalid")]
    InvalidSourceLayer {
        /// Position in the linked chain.
        index: usize,
    },

    /// A layer input has no output or null output upstream.
    #[error("input '{name}' of layer {layer} has no matching output upstream")]
    MissingLayerConnection {
        /// Downstream layer index.
        layer: usize,
        /// Input name.
        name: String,
    },

    /// A name is neither an input nor a feature of its layer.
    #[error("'{name}' is neither an input nor a feature of layer {layer}")]
    UnresolvedName {
        /// Unknown name.
        name: String,
        /// Layer searched.
        layer: usize,
    },

    /// A baked leaf does not name an input of the first layer.
    #[error("baked leaf '{name}' is not an input of the first layer")]
    LeafNotBaseInput {
        /// Leaf name.
        name: String,
    },

    /// Composing two SDK curves failed.
    #[error("could not compose curves for sdk feature '{feature}' at layer {layer}")]
    CurveCompositionFailure {
        /// Outer SDK feature name.
        feature: String,
        /// Layer of the outer feature.
        layer: usize,
    },

    /// A `(name, layer)` pair was reached again while still being resolved.
    #[error("cycle detected at '{name}' in layer {layer}")]
    CycleDetected {
        /// Name being revisited.
        name: String,
        /// Layer being revisited.
        layer: usize,
    },

    /// Resolution recursed past the configured depth limit.
    #[error("recursion deeper than {limit} while resolving '{name}' in layer {layer}")]
    DepthLimitExceeded {
        /// Name being resolved.
        name: String,
        /// Layer being resolved.
        layer: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Not every requested output could be baked.
    #[error("baked {baked} of {requested} requested outputs")]
    OutputCountMismatch {
        /// Outputs requested by the last layer.
        requested: usize,
        /// Outputs successfully baked.
        baked: usize,
    },
}

macro_rules! error_list {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            /// Findings in discovery order.
            pub errors: Vec<$item>,
        }

        impl $name {
            /// Return `true` when nothing was recorded.
            pub fn is_empty(&self) -> bool {
                self.errors.is_empty()
            }

            /// Number of recorded findings.
            pub fn len(&self) -> usize {
                self.errors.len()
            }

            pub(crate) fn push(&mut self, e: $item) {
                self.errors.push(e);
            }

            pub(crate) fn into_result(self) -> Result<(), Self> {
                if self.errors.is_empty() {
                    Ok(())
                } else {
                    Err(self)
                }
            }
        }

        impl From<$item> for $name {
            fn from(e: $item) -> Self {
                Self { errors: vec![e] }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for (i, e) in self.errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{e}")?;
                }
                Ok(())
            }
        }

        impl std::error::Error for $name {}
    };
}

error_list!(
    /// All load failures collected from one payload.
    LoadErrors,
    LoadError
);
error_list!(
    /// All invariant violations collected from one validation pass.
    ValidationErrors,
    ValidationIssue
);
error_list!(
    /// All failures collected from one bake.
    BakeErrors,
    BakeError
);

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
