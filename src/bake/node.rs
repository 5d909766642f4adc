use crate::{curve::key::CurveKey, feature::Range};

/// Index of a node in the baker's node arena.
pub(crate) type NodeId = usize;

/// A resolved, already flattened piece of the baked graph.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum BakedNode {
    /// An input of the first layer.
    Leaf { name: String },
    Multiply {
        name: String,
        layer: usize,
        inputs: Vec<NodeId>,
    },
    WeightedSum {
        name: String,
        layer: usize,
        weights: Vec<(NodeId, f64)>,
        range: Range,
    },
    Sdk {
        name: String,
        layer: usize,
        input: NodeId,
        keys: Vec<CurveKey>,
    },
}

impl BakedNode {
    /// Name used in the baked definition: leaves keep their input name, features are
    /// suffixed with their layer so equal names from different layers stay distinct.
    pub(crate) fn baked_name(&self) -> String {
        match self {
            Self::Leaf { name } => name.clone(),
            Self::Multiply { name, layer, .. }
            | Self::WeightedSum { name, layer, .. }
            | Self::Sdk { name, layer, .. } => format!("{name}:{layer}"),
        }
    }

    /// Nodes this one reads from.
    pub(crate) fn children(&self) -> Vec<NodeId> {
        match self {
            Self::Leaf { .. } => Vec::new(),
            Self::Multiply { inputs, .. } => inputs.clone(),
            Self::WeightedSum { weights, .. } => weights.iter().map(|(id, _)| *id).collect(),
            Self::Sdk { input, .. } => vec![*input],
        }
    }
}
