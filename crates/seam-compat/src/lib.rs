//! # seam-compat
//!
//! Runtime compatibility shim for diffusion inference pipelines.
//!
//! Repairs conditioning-tensor width mismatches between a pipeline's text
//! encoder and a target model's expected input width, without touching
//! either side's weights, and adapts tensor rank for a tiling call path
//! written against rank-4 images.
//!
//! The pieces:
//! - [`signature`] — detects the targeted architecture family by its
//!   structural markers and resolves the expected conditioning width
//! - [`projection`] — deterministic, bias-free repair transforms
//! - [`cache`] — process-wide get-or-build store keyed by
//!   (source, target, device, precision)
//! - [`intercept`] — [`ConditioningRepair`], the wrapper around a model
//!   invocation path
//! - [`tiling`] — [`RankAdapter`], the independent rank-5 → rank-4 adapter
//! - [`install`] — one-shot process-wide installation and the
//!   registration helpers
//!
//! # Usage
//!
//! ```
//! use seam_compat::{install, CallArgs};
//!
//! // Once at startup; idempotent, never aborts the host.
//! install::install();
//!
//! // Wrap the invocation path at model-registration time.
//! let invoke = install::patch_model_fn(
//!     |model: &dyn seam_nn::Module, args: CallArgs| model.forward(args.positional(0).unwrap()),
//! );
//! ```
//!
//! Repairs are structural: a wider conditioning tensor is truncated, a
//! narrower one zero-padded. This keeps the pipeline running on shape
//! mismatch; it does not claim the coordinates are semantically aligned.

pub mod cache;
pub mod install;
pub mod intercept;
pub mod projection;
pub mod signature;
pub mod tiling;

pub use cache::{ProjectionCache, ProjectionKey};
pub use install::{install, is_installed, patch_model_fn, patch_tile_fn};
pub use intercept::{CallArgs, ConditioningRepair, ModelFn};
pub use projection::Projection;
pub use tiling::{RankAdapter, TileFn, TileRequest};
