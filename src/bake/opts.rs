/// Knobs for [`LinkedDefinitions::bake`](crate::LinkedDefinitions::bake).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BakeOpts {
    /// Reuse the baked node for a `(name, layer)` pair instead of rebuilding it at every
    /// occurrence. The output is identical either way.
    pub memoize: bool,
    /// Deepest recursion allowed while resolving a name before the bake fails.
    pub max_depth: usize,
}

impl Default for BakeOpts {
    fn default() -> Self {
        Self {
            memoize: true,
            max_depth: 256,
        }
    }
}
