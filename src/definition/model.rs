use std::{collections::BTreeMap, path::Path};

use anyhow::Context as _;
use serde_json::Value;

use crate::{
    definition::{
        observer::{Observers, SubscriptionId, ValidityEvent},
        wire::{self, DefinitionDef, FeatureDef},
    },
    feature::{Feature, FeatureRef, registry::FeatureDefinitions},
    foundation::error::{LoadError, LoadErrors, RigError, RigResult},
};

/// Cached outcome of the last validation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Validity {
    /// Edited since the last pass (or never validated).
    #[default]
    Stale,
    /// Last pass found no broken invariant.
    Valid,
    /// Last pass found at least one broken invariant.
    Invalid,
}

/// One rig layer: inputs, the features computed from them, and the named outputs.
#[derive(Clone, Debug, Default)]
pub struct Definition {
    pub(crate) inputs: Vec<String>,
    pub(crate) features: FeatureDefinitions,
    pub(crate) outputs: BTreeMap<String, String>,
    pub(crate) null_outputs: Vec<String>,
    validity: Validity,
    observers: Observers,
}

impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        // Feature order inside the typed lists is not significant.
        self.inputs == other.inputs
            && features_by_name(&self.features) == features_by_name(&other.features)
            && self.outputs == other.outputs
            && self.null_outputs == other.null_outputs
    }
}

impl Definition {
    /// Empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Input names, in declaration order.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Feature registry.
    pub fn features(&self) -> &FeatureDefinitions {
        &self.features
    }

    /// Output name -> source name.
    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    /// Outputs a downstream layer is allowed to find missing.
    pub fn null_outputs(&self) -> &[String] {
        &self.null_outputs
    }

    /// Cached validation state.
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Return `true` when `name` is a declared input.
    pub fn is_input(&self, name: &str) -> bool {
        self.inputs.iter().any(|i| i == name)
    }

    /// Return `true` when `name` is a declared null output.
    pub fn is_null_output(&self, name: &str) -> bool {
        self.null_outputs.iter().any(|n| n == name)
    }

    // ---- loading ----

    /// Load every section of a wire payload.
    ///
    /// Sections load independently: a broken section is reported and the others still load.
    pub fn load_value(&mut self, value: &Value) -> Result<(), LoadErrors> {
        let Some(obj) = value.as_object() else {
            return Err(LoadError::WrongType {
                section: "definition".to_string(),
                field: "definition".to_string(),
                expected: "an object",
            }
            .into());
        };

        let mut errors = LoadErrors::default();
        let inputs = section(obj, "inputs", true, &mut errors);
        let features = section(obj, "features", true, &mut errors);
        let outputs = section(obj, "outputs", true, &mut errors);
        let null_outputs = section(obj, "null_outputs", false, &mut errors);

        if let Some(v) = inputs {
            collect(&mut errors, self.load_inputs(v));
        }
        if let Some(v) = features {
            collect(&mut errors, self.load_features(v));
        }
        if let Some(v) = outputs {
            collect(&mut errors, self.load_outputs(v));
        }
        if let Some(v) = null_outputs {
            collect(&mut errors, self.load_null_outputs(v));
        }

        for e in &errors.errors {
            tracing::error!("{e}");
        }
        errors.into_result()
    }

    /// Replace the inputs from the `inputs` section.
    pub fn load_inputs(&mut self, value: &Value) -> Result<(), LoadErrors> {
        let inputs = wire::parse_inputs(value)?;
        self.inputs = inputs;
        self.invalidate();
        Ok(())
    }

    /// Replace the features from the `features` section.
    ///
    /// Features that fail to parse are skipped; a feature named like an input is dropped.
    pub fn load_features(&mut self, value: &Value) -> Result<(), LoadErrors> {
        let Some(obj) = value.as_object() else {
            return Err(LoadError::WrongType {
                section: "features".to_string(),
                field: "features".to_string(),
                expected: "an object",
            }
            .into());
        };

        let mut errors = LoadErrors::default();
        let mut features = FeatureDefinitions::default();
        for (name, payload) in obj {
            if self.is_input(name) {
                errors.push(LoadError::NameCollision { name: name.clone() });
                continue;
            }
            if let Err(e) = features.add_from_payload(name, payload) {
                errors.errors.extend(e.errors);
            }
        }
        self.features = features;
        self.invalidate();
        errors.into_result()
    }

    /// Replace the outputs from the `outputs` section.
    pub fn load_outputs(&mut self, value: &Value) -> Result<(), LoadErrors> {
        let outputs = wire::parse_outputs(value)?;
        self.outputs = outputs;
        self.invalidate();
        Ok(())
    }

    /// Replace the null outputs from the optional `null_outputs` section.
    pub fn load_null_outputs(&mut self, value: &Value) -> Result<(), LoadErrors> {
        let null_outputs = wire::parse_null_outputs(value)?;
        self.null_outputs = null_outputs;
        self.invalidate();
        Ok(())
    }

    /// Load a definition, failing if any section fails.
    pub fn from_value(value: &Value) -> RigResult<Self> {
        let mut def = Self::new();
        def.load_value(value)?;
        Ok(def)
    }

    /// Parse and load a JSON document.
    pub fn from_json_str(s: &str) -> RigResult<Self> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| LoadErrors::from(LoadError::Json(e.to_string())))?;
        Self::from_value(&value)
    }

    /// Read, parse and load a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> RigResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read definition '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    // ---- export ----

    /// Wire representation of this definition.
    pub fn to_def(&self) -> DefinitionDef {
        DefinitionDef {
            inputs: self.inputs.clone(),
            features: self
                .features
                .iter()
                .map(|f| (f.name().to_string(), FeatureDef::from_feature(f)))
                .collect(),
            outputs: self.outputs.clone(),
            null_outputs: self.null_outputs.clone(),
        }
    }

    /// Wire representation as a JSON value.
    pub fn to_value(&self) -> RigResult<Value> {
        serde_json::to_value(self.to_def()).map_err(|e| RigError::serde(e.to_string()))
    }

    /// Wire representation as pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> RigResult<String> {
        serde_json::to_string_pretty(&self.to_def()).map_err(|e| RigError::serde(e.to_string()))
    }

    // ---- edits ----

    /// Declare an input. Returns `false` if it already exists.
    pub fn add_input(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.is_input(&name) {
            return false;
        }
        self.inputs.push(name);
        self.invalidate();
        true
    }

    /// Remove an input. Returns `false` if it was not declared.
    pub fn remove_input(&mut self, name: &str) -> bool {
        let before = self.inputs.len();
        self.inputs.retain(|i| i != name);
        let removed = self.inputs.len() != before;
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Add a feature to the registry.
    pub fn add_feature(&mut self, feature: impl Into<Feature>) {
        self.features.add(feature);
        self.invalidate();
    }

    /// Remove a feature by name.
    pub fn remove_feature(&mut self, name: &str) -> Option<Feature> {
        let removed = self.features.remove(name);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    /// Map output `name` to `source`, returning the previous source.
    pub fn set_output(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<String> {
        let prev = self.outputs.insert(name.into(), source.into());
        self.invalidate();
        prev
    }

    /// Remove an output, returning its source.
    pub fn remove_output(&mut self, name: &str) -> Option<String> {
        let prev = self.outputs.remove(name);
        if prev.is_some() {
            self.invalidate();
        }
        prev
    }

    /// Append a null output. Repeats are kept so validation can report them.
    pub fn add_null_output(&mut self, name: impl Into<String>) {
        self.null_outputs.push(name.into());
        self.invalidate();
    }

    /// Remove every occurrence of a null output.
    pub fn remove_null_output(&mut self, name: &str) -> bool {
        let before = self.null_outputs.len();
        self.null_outputs.retain(|n| n != name);
        let removed = self.null_outputs.len() != before;
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Drop every input, feature, output and null output.
    pub fn clear(&mut self) {
        self.inputs.clear();
        self.features.clear();
        self.outputs.clear();
        self.null_outputs.clear();
        self.invalidate();
    }

    // ---- validity cache ----

    /// Mark the cached validity stale so the next query recomputes it.
    pub fn invalidate(&mut self) {
        self.set_validity(Validity::Stale);
    }

    /// Record an externally decided validity (e.g. a host that validated elsewhere).
    pub fn set_definition_valid(&mut self, valid: bool) {
        self.set_validity(if valid {
            Validity::Valid
        } else {
            Validity::Invalid
        });
    }

    /// Validity as seen by subscribers: only `Valid` counts.
    pub fn is_marked_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    /// Check all invariants, reusing the cached result unless it is stale or `force` is set.
    ///
    /// With `warn`, findings are logged through `tracing`.
    pub fn is_definition_valid(&mut self, warn: bool, force: bool) -> bool {
        if !force && self.validity != Validity::Stale {
            return self.is_marked_valid();
        }
        let report = self.validation_report();
        report.log("definition", warn);
        let valid = report.is_valid();
        self.set_definition_valid(valid);
        valid
    }

    /// Force a validation pass, update the cache and notify subscribers on change.
    pub fn validate(&mut self) -> bool {
        self.is_definition_valid(true, true)
    }

    /// Register a callback fired whenever the observable validity flips.
    pub fn subscribe(&mut self, f: impl FnMut(&ValidityEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(f)
    }

    /// Remove a callback. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    fn set_validity(&mut self, validity: Validity) {
        let was_valid = self.is_marked_valid();
        self.validity = validity;
        self.observers.notify(was_valid, self.is_marked_valid());
    }
}

fn features_by_name(features: &FeatureDefinitions) -> Vec<FeatureRef<'_>> {
    let mut v: Vec<_> = features.iter().collect();
    v.sort_by(|a, b| a.name().cmp(b.name()));
    v
}

fn section<'a>(
    obj: &'a serde_json::Map<String, Value>,
    key: &str,
    required: bool,
    errors: &mut LoadErrors,
) -> Option<&'a Value> {
    let v = obj.get(key);
    if v.is_none() && required {
        errors.push(LoadError::MissingField {
            section: "definition".to_string(),
            field: key.to_string(),
        });
    }
    v
}

fn collect(errors: &mut LoadErrors, result: Result<(), LoadErrors>) {
    if let Err(e) = result {
        errors.errors.extend(e.errors);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/definition/model.rs"]
mod tests;
