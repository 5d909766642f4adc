use std::collections::{HashMap, HashSet};

use crate::{
    bake::{
        keys::bake_keys,
        node::{BakedNode, NodeId},
        opts::BakeOpts,
    },
    definition::model::Definition,
    feature::{FeatureRef, MultiplyFeature, SdkFeature, WeightedSumFeature},
    foundation::error::{BakeError, BakeErrors},
};

/// Why a name produced no baked node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Missing {
    /// Absent through a declared null output; callers may drop it.
    Tolerated,
    /// Broken pipeline; the failure has been recorded in the baker's errors.
    Error,
}

type Resolved = Result<NodeId, Missing>;

/// What the last layer's outputs resolved to.
#[derive(Debug)]
pub(crate) struct BakeOutcome {
    pub(crate) definition: Definition,
    pub(crate) requested: usize,
    pub(crate) baked_outputs: Vec<String>,
    pub(crate) null_outputs: Vec<String>,
}

/// Recursive resolver over `(name, layer)` pairs.
pub(crate) struct Baker<'a> {
    layers: &'a [&'a Definition],
    opts: BakeOpts,
    nodes: Vec<BakedNode>,
    memo: HashMap<(&'a str, usize), Resolved>,
    in_progress: HashSet<(&'a str, usize)>,
    errors: BakeErrors,
}

impl<'a> Baker<'a> {
    pub(crate) fn new(layers: &'a [&'a Definition], opts: BakeOpts) -> Self {
        Self {
            layers,
            opts,
            nodes: Vec::new(),
            memo: HashMap::new(),
            in_progress: HashSet::new(),
            errors: BakeErrors::default(),
        }
    }

    /// Resolve `name` as seen from `layer` into a baked node.
    pub(crate) fn resolve(&mut self, name: &'a str, layer: usize, depth: usize) -> Resolved {
        if depth > self.opts.max_depth {
            self.errors.push(BakeError::DepthLimitExceeded {
                name: name.to_string(),
                layer,
                limit: self.opts.max_depth,
            });
            return Err(Missing::Error);
        }
        if self.opts.memoize {
            if let Some(hit) = self.memo.get(&(name, layer)) {
                return *hit;
            }
        }
        if !self.in_progress.insert((name, layer)) {
            self.errors.push(BakeError::CycleDetected {
                name: name.to_string(),
                layer,
            });
            return Err(Missing::Error);
        }

        let resolved = self.resolve_uncached(name, layer, depth);

        self.in_progress.remove(&(name, layer));
        if self.opts.memoize {
            self.memo.insert((name, layer), resolved);
        }
        resolved
    }

    fn resolve_uncached(&mut self, name: &'a str, layer: usize, depth: usize) -> Resolved {
        let def: &'a Definition = self.layers[layer];

        if def.is_input(name) {
            if layer == 0 {
                return Ok(self.push(BakedNode::Leaf {
                    name: name.to_string(),
                }));
            }
            let upstream: &'a Definition = self.layers[layer - 1];
            if let Some(source) = upstream.outputs.get(name) {
                return self.resolve(source, layer - 1, depth + 1);
            }
            if upstream.is_null_output(name) {
                tracing::debug!(name, layer, "input provided by a null output");
                return Err(Missing::Tolerated);
            }
            self.errors.push(BakeError::MissingLayerConnection {
                layer,
                name: name.to_string(),
            });
            return Err(Missing::Error);
        }

        match def.features.find(name) {
            Some(FeatureRef::Multiply(f)) => self.bake_multiply(f, layer, depth),
            Some(FeatureRef::WeightedSum(f)) => self.bake_weighted_sum(f, layer, depth),
            Some(FeatureRef::Sdk(f)) => self.bake_sdk(f, layer, depth),
            None => {
                self.errors.push(BakeError::UnresolvedName {
                    name: name.to_string(),
                    layer,
                });
                Err(Missing::Error)
            }
        }
    }

    // Nested multiplies are inlined; a tolerated-missing factor makes the product missing.
    fn bake_multiply(&mut self, f: &'a MultiplyFeature, layer: usize, depth: usize) -> Resolved {
        let mut inputs = Vec::with_capacity(f.inputs.len());
        let mut failed = false;
        let mut tolerated = false;

        for sub in &f.inputs {
            match self.resolve(sub, layer, depth + 1) {
                Ok(id) => match &self.nodes[id] {
                    BakedNode::Multiply {
                        inputs: sub_inputs, ..
                    } => inputs.extend(sub_inputs.iter().copied()),
                    _ => inputs.push(id),
                },
                Err(Missing::Error) => failed = true,
                Err(Missing::Tolerated) => tolerated = true,
            }
        }

        if failed {
            return Err(Missing::Error);
        }
        if tolerated {
            return Err(Missing::Tolerated);
        }
        Ok(self.push(BakedNode::Multiply {
            name: f.name.clone(),
            layer,
            inputs,
        }))
    }

    // Unclamped weighted-sum children are inlined with their coefficients multiplied through.
    // Coefficients reaching the same node along several paths are added.
    fn bake_weighted_sum(
        &mut self,
        f: &'a WeightedSumFeature,
        layer: usize,
        depth: usize,
    ) -> Resolved {
        let mut terms = Terms::default();
        let mut failed = false;

        for (sub, &weight) in &f.weights {
            match self.resolve(sub, layer, depth + 1) {
                Ok(id) => {
                    let inlined = match &self.nodes[id] {
                        BakedNode::WeightedSum {
                            weights: sub_weights,
                            range,
                            ..
                        } if range.is_unbounded() => Some(sub_weights.clone()),
                        _ => None,
                    };
                    match inlined {
                        Some(sub_weights) => {
                            for (leaf, sub_weight) in sub_weights {
                                terms.add(&self.nodes, leaf, weight * sub_weight);
                            }
                        }
                        None => terms.add(&self.nodes, id, weight),
                    }
                }
                Err(Missing::Error) => failed = true,
                Err(Missing::Tolerated) => {}
            }
        }

        if failed {
            return Err(Missing::Error);
        }
        if terms.weights.is_empty() {
            return Err(Missing::Tolerated);
        }
        Ok(self.push(BakedNode::WeightedSum {
            name: f.name.clone(),
            layer,
            weights: terms.weights,
            range: f.range,
        }))
    }

    // An SDK over another SDK collapses into one curve on the inner curve's input.
    fn bake_sdk(&mut self, f: &'a SdkFeature, layer: usize, depth: usize) -> Resolved {
        let Some(sub) = f.input() else {
            self.errors.push(BakeError::InvalidSourceLayer { index: layer });
            return Err(Missing::Error);
        };
        let id = self.resolve(sub, layer, depth + 1)?;

        let inner = match &self.nodes[id] {
            BakedNode::Sdk { input, keys, .. } => Some((*input, keys.clone())),
            _ => None,
        };
        let (input, keys) = match inner {
            Some((inner_input, inner_keys)) => match bake_keys(&inner_keys, &f.keys) {
                Some(keys) if keys.len() >= 2 => (inner_input, keys),
                _ => {
                    self.errors.push(BakeError::CurveCompositionFailure {
                        feature: f.name.clone(),
                        layer,
                    });
                    return Err(Missing::Error);
                }
            },
            None => (id, f.keys.clone()),
        };

        Ok(self.push(BakedNode::Sdk {
            name: f.name.clone(),
            layer,
            input,
            keys,
        }))
    }

    fn push(&mut self, node: BakedNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Resolve every output of the last layer and assemble the flat definition.
    pub(crate) fn bake_outputs(mut self) -> Result<BakeOutcome, BakeErrors> {
        let last = self.layers.len() - 1;
        let last_def: &'a Definition = self.layers[last];

        let mut resolved = Vec::<(&'a str, NodeId)>::new();
        let mut null_outputs = Vec::<String>::new();
        for (output, source) in &last_def.outputs {
            match self.resolve(source, last, 0) {
                Ok(id) => resolved.push((output.as_str(), id)),
                Err(Missing::Tolerated) => {
                    tracing::warn!(output = output.as_str(), "output resolves to a null output");
                    null_outputs.push(output.clone());
                }
                Err(Missing::Error) => {
                    tracing::error!(output = output.as_str(), "output could not be baked");
                }
            }
        }

        let requested = last_def.outputs.len();
        let baked = resolved.len() + null_outputs.len();
        if baked != requested {
            self.errors.push(BakeError::OutputCountMismatch { requested, baked });
        }

        let mut definition = Definition::new();
        let mut registered = HashSet::new();
        for &(_, id) in &resolved {
            self.register(id, &mut registered, &mut definition);
        }
        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let mut baked_outputs = Vec::with_capacity(resolved.len());
        for (output, id) in resolved {
            definition.set_output(output, self.nodes[id].baked_name());
            baked_outputs.push(output.to_string());
        }
        for name in null_outputs.iter().chain(&last_def.null_outputs) {
            if !definition.outputs.contains_key(name) && !definition.is_null_output(name) {
                definition.add_null_output(name.clone());
            }
        }

        Ok(BakeOutcome {
            definition,
            requested,
            baked_outputs,
            null_outputs,
        })
    }

    // Children first, so every feature is added after the names it reads.
    fn register(&mut self, id: NodeId, registered: &mut HashSet<String>, out: &mut Definition) {
        let baked_name = self.nodes[id].baked_name();
        if registered.contains(&baked_name) {
            return;
        }
        registered.insert(baked_name.clone());
        for child in self.nodes[id].children() {
            self.register(child, registered, out);
        }

        let nodes = &self.nodes;
        let name_of = |id: NodeId| nodes[id].baked_name();
        match &nodes[id] {
            BakedNode::Leaf { name } => {
                if self.layers[0].is_input(name) {
                    out.add_input(name.clone());
                } else {
                    self.errors.push(BakeError::LeafNotBaseInput { name: name.clone() });
                }
            }
            BakedNode::Multiply { inputs, .. } => {
                let names: Vec<String> = inputs.iter().map(|&i| name_of(i)).collect();
                out.add_feature(MultiplyFeature::new(baked_name, names));
            }
            BakedNode::WeightedSum { weights, range, .. } => {
                let feature = WeightedSumFeature::new(
                    baked_name,
                    weights.iter().map(|&(i, w)| (name_of(i), w)),
                )
                .with_range(range.lower_bound, range.upper_bound);
                out.add_feature(feature);
            }
            BakedNode::Sdk { input, keys, .. } => {
                out.add_feature(SdkFeature::new(baked_name, name_of(*input), keys.clone()));
            }
        }
    }
}

/// Ordered coefficient list keyed by baked name.
#[derive(Default)]
struct Terms {
    weights: Vec<(NodeId, f64)>,
    index: HashMap<String, usize>,
}

impl Terms {
    fn add(&mut self, nodes: &[BakedNode], id: NodeId, weight: f64) {
        let key = nodes[id].baked_name();
        match self.index.get(&key) {
            Some(&slot) => self.weights[slot].1 += weight,
            None => {
                self.index.insert(key, self.weights.len());
                self.weights.push((id, weight));
            }
        }
    }
}

/// Bake `layers` (first layer first) into one definition.
pub(crate) fn bake_layers(
    layers: &[&Definition],
    opts: BakeOpts,
) -> Result<BakeOutcome, BakeErrors> {
    Baker::new(layers, opts).bake_outputs()
}

#[cfg(test)]
#[path = "../../tests/unit/bake/baker.rs"]
mod tests;
