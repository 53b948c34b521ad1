use seam_core::{Result, Tensor};

/// Base trait for model-like objects.
///
/// Beyond `forward`, a module exposes its direct children by name. That is
/// the hook the compatibility layer uses: architectures are recognized by
/// the presence of specific named submodules with specific attributes, not
/// by concrete type, so wrapping code stays decoupled from model crates.
pub trait Module: Send + Sync {
    /// Forward pass.
    fn forward(&self, input: &Tensor) -> Result<Tensor>;

    /// Look up a direct child by name. Default: no children.
    fn submodule(&self, _name: &str) -> Option<&dyn Module> {
        None
    }

    /// Names of direct children, in declaration order.
    fn submodule_names(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// The feature width a normalization layer declares over its last
    /// dimension, if this module declares one.
    fn declared_width(&self) -> Option<usize> {
        None
    }

    /// All trainable parameters. Default: none.
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }
}
