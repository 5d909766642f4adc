use std::collections::HashSet;

use crate::{
    definition::wire,
    feature::{Feature, FeatureKind, FeatureRef, MultiplyFeature, SdkFeature, WeightedSumFeature},
    foundation::error::LoadErrors,
};

/// Per-definition feature registry: three typed lists sharing one name namespace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureDefinitions {
    /// Multiply features, in load order.
    pub multiply: Vec<MultiplyFeature>,
    /// Weighted-sum features, in load order.
    pub weighted_sum: Vec<WeightedSumFeature>,
    /// SDK features, in load order.
    pub sdk: Vec<SdkFeature>,
}

impl FeatureDefinitions {
    /// Append a feature to the list matching its variant.
    pub fn add(&mut self, feature: impl Into<Feature>) {
        match feature.into() {
            Feature::Multiply(f) => self.multiply.push(f),
            Feature::WeightedSum(f) => self.weighted_sum.push(f),
            Feature::Sdk(f) => self.sdk.push(f),
        }
    }

    /// Parse one wire feature object (`{"type": .., "input_features": .., "params": ..}`) and
    /// append it. Nothing is appended on failure.
    pub fn add_from_payload(
        &mut self,
        name: &str,
        payload: &serde_json::Value,
    ) -> Result<FeatureKind, LoadErrors> {
        let feature = wire::parse_feature(name, payload)?;
        let kind = feature.kind();
        self.add(feature);
        Ok(kind)
    }

    /// Every feature name across the three lists, plus whether any name repeats.
    pub fn feature_names(&self) -> (Vec<&str>, bool) {
        let names: Vec<&str> = self.iter().map(FeatureRef::name).collect();
        let mut seen = HashSet::with_capacity(names.len());
        let had_duplicate = names.iter().any(|n| !seen.insert(*n));
        (names, had_duplicate)
    }

    /// Look a feature up by name across all three lists.
    pub fn find(&self, name: &str) -> Option<FeatureRef<'_>> {
        self.iter().find(|f| f.name() == name)
    }

    /// Return `true` when some feature is called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Remove the first feature called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Feature> {
        if let Some(i) = self.multiply.iter().position(|f| f.name == name) {
            return Some(Feature::Multiply(self.multiply.remove(i)));
        }
        if let Some(i) = self.weighted_sum.iter().position(|f| f.name == name) {
            return Some(Feature::WeightedSum(self.weighted_sum.remove(i)));
        }
        if let Some(i) = self.sdk.iter().position(|f| f.name == name) {
            return Some(Feature::Sdk(self.sdk.remove(i)));
        }
        None
    }

    /// Iterate multiply, then weighted-sum, then SDK features.
    pub fn iter(&self) -> impl Iterator<Item = FeatureRef<'_>> {
        self.multiply
            .iter()
            .map(FeatureRef::Multiply)
            .chain(self.weighted_sum.iter().map(FeatureRef::WeightedSum))
            .chain(self.sdk.iter().map(FeatureRef::Sdk))
    }

    /// Total number of features.
    pub fn len(&self) -> usize {
        self.multiply.len() + self.weighted_sum.len() + self.sdk.len()
    }

    /// Return `true` when no feature is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn clear(&mut self) {
        self.multiply.clear();
        self.weighted_sum.clear();
        self.sdk.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/feature/registry.rs"]
mod tests;
