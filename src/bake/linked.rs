use crate::{
    bake::{baker::bake_layers, opts::BakeOpts},
    definition::model::Definition,
    foundation::error::{BakeError, BakeErrors, ValidationErrors, ValidationIssue},
};

/// Index of a definition inside a [`DefinitionStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(pub usize);

/// Arena owning every definition; layers refer to it by [`DefinitionId`].
#[derive(Clone, Debug, Default)]
pub struct DefinitionStore {
    defs: Vec<Definition>,
}

impl DefinitionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `def` and return its id.
    pub fn insert(&mut self, def: Definition) -> DefinitionId {
        self.defs.push(def);
        DefinitionId(self.defs.len() - 1)
    }

    /// Definition for `id`, if it exists.
    pub fn get(&self, id: DefinitionId) -> Option<&Definition> {
        self.defs.get(id.0)
    }

    /// Mutable definition for `id`, if it exists.
    pub fn get_mut(&mut self, id: DefinitionId) -> Option<&mut Definition> {
        self.defs.get_mut(id.0)
    }

    /// Number of stored definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Return `true` when the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Every stored definition with its id.
    pub fn iter(&self) -> impl Iterator<Item = (DefinitionId, &Definition)> {
        self.defs.iter().enumerate().map(|(i, d)| (DefinitionId(i), d))
    }
}

/// Result of a successful bake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BakeSummary {
    /// Outputs the last layer asked for.
    pub requested_outputs: usize,
    /// Outputs that resolved to a baked node.
    pub baked_outputs: Vec<String>,
    /// Outputs that resolved to an upstream null output.
    pub null_outputs: Vec<String>,
    /// Features registered in the baked definition.
    pub feature_count: usize,
    /// Whether the baked definition passed validation.
    pub baked_valid: bool,
}

/// Ordered rig layers plus the flat definition baked from them.
#[derive(Clone, Debug, Default)]
pub struct LinkedDefinitions {
    /// Layers, first layer first.
    pub source_definitions: Vec<DefinitionId>,
    baked_definition: Option<Definition>,
}

impl LinkedDefinitions {
    /// Link `source_definitions` in order. Nothing is baked yet.
    pub fn new(source_definitions: impl IntoIterator<Item = DefinitionId>) -> Self {
        Self {
            source_definitions: source_definitions.into_iter().collect(),
            baked_definition: None,
        }
    }

    /// The last successful bake, if any.
    pub fn baked_definition(&self) -> Option<&Definition> {
        self.baked_definition.as_ref()
    }

    /// Check that every input of each layer after the first is an output or null output of
    /// the layer before it.
    pub fn validate_links(&self, store: &DefinitionStore) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (layer, name) in self.unconnected_inputs(store) {
            errors.push(ValidationIssue::UnconnectedInput { layer, name });
        }
        errors.into_result()
    }

    // (downstream layer, input) pairs with no output or null output upstream.
    fn unconnected_inputs(&self, store: &DefinitionStore) -> Vec<(usize, String)> {
        let mut missing = Vec::new();
        for (layer, pair) in self.source_definitions.windows(2).enumerate() {
            let (Some(upstream), Some(downstream)) = (store.get(pair[0]), store.get(pair[1])) else {
                continue;
            };
            for name in downstream.inputs() {
                if !upstream.outputs().contains_key(name) && !upstream.is_null_output(name) {
                    missing.push((layer + 1, name.clone()));
                }
            }
        }
        missing
    }

    /// Flatten the layers into one definition over the first layer's inputs.
    ///
    /// Source layers are validated first (reusing their cached validity). On failure every
    /// finding is returned and the previous baked definition stays in place.
    #[tracing::instrument(skip(self, store, opts), fields(layers = self.source_definitions.len()))]
    pub fn bake(
        &mut self,
        store: &mut DefinitionStore,
        opts: &BakeOpts,
    ) -> Result<BakeSummary, BakeErrors> {
        if self.source_definitions.len() < 2 {
            return Err(BakeError::TooFewSourceLayers {
                found: self.source_definitions.len(),
            }
            .into());
        }

        let mut errors = BakeErrors::default();
        for (index, &id) in self.source_definitions.iter().enumerate() {
            match store.get_mut(id) {
                None => errors.push(BakeError::UnknownDefinition { index }),
                Some(def) => {
                    if !def.is_definition_valid(true, false) {
                        errors.push(BakeError::InvalidSourceLayer { index });
                    }
                }
            }
        }
        errors.clone().into_result()?;

        for (layer, name) in self.unconnected_inputs(store) {
            errors.push(BakeError::MissingLayerConnection { layer, name });
        }
        errors.into_result()?;

        let layers: Vec<&Definition> = self
            .source_definitions
            .iter()
            .filter_map(|&id| store.get(id))
            .collect();
        let outcome = bake_layers(&layers, *opts).inspect_err(|e| {
            tracing::error!(errors = e.len(), "bake failed");
        })?;

        let mut baked = outcome.definition;
        let baked_valid = baked.is_definition_valid(true, true);
        if !baked_valid {
            tracing::warn!("baked definition does not validate");
        }

        let summary = BakeSummary {
            requested_outputs: outcome.requested,
            baked_outputs: outcome.baked_outputs,
            null_outputs: outcome.null_outputs,
            feature_count: baked.features().len(),
            baked_valid,
        };
        tracing::debug!(
            outputs = summary.baked_outputs.len(),
            features = summary.feature_count,
            "bake complete"
        );
        self.baked_definition = Some(baked);
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/linked.rs"]
mod tests;
