//! Flattening of layered definitions into one definition over the first layer's inputs.

pub(crate) mod baker;
pub(crate) mod keys;
pub(crate) mod linked;
pub(crate) mod node;
pub(crate) mod opts;
