//! # seam-nn
//!
//! The "model-like object" contract the shim inspects, plus the concrete
//! layers hosts build target models from.
//!
//! [`Module`] exposes named-submodule introspection (`submodule`,
//! `submodule_names`, `declared_width`) so architecture families can be
//! identified by structural markers rather than type identity.

pub mod layer_norm;
pub mod linear;
pub mod module;
pub mod module_list;

pub use layer_norm::LayerNorm;
pub use linear::Linear;
pub use module::Module;
pub use module_list::ModuleList;
