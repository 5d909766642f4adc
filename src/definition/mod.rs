//! Definitions: one rig layer's inputs, features and outputs, with a cached validity flag.

pub(crate) mod model;
pub(crate) mod observer;
pub(crate) mod validate;
pub(crate) mod wire;
