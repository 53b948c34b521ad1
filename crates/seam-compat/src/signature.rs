//! Structural detection of the dual-stream image transformer family.
//!
//! The targeted architecture is recognized by the presence of four named
//! submodules, not by concrete type: a text normalization layer declaring
//! its width, text and image embedding layers, and a transformer block
//! list. Detection is a pure predicate over `Module` introspection and can
//! never fail — a missing marker simply means "not a match".

use seam_nn::Module;

/// Text-conditioning normalization submodule; its declared width is the
/// model's expected conditioning width.
pub const TEXT_NORM: &str = "txt_norm";
/// Text-embedding input projection submodule.
pub const TEXT_EMBED: &str = "txt_in";
/// Image-embedding input projection submodule.
pub const IMAGE_EMBED: &str = "img_in";
/// Transformer block-list submodule.
pub const BLOCKS: &str = "transformer_blocks";

/// Whether `model` is an instance of the targeted architecture family.
///
/// All four structural markers must be present. This predicate scopes the
/// call interceptor to exactly one family, so wrapping an unrelated model
/// (a VAE, a text encoder) stays a pure pass-through.
pub fn is_dual_stream_transformer(model: &dyn Module) -> bool {
    expected_text_width(model).is_some()
        && model.submodule(TEXT_EMBED).is_some()
        && model.submodule(IMAGE_EMBED).is_some()
        && model.submodule(BLOCKS).is_some()
}

/// The conditioning width the model expects, read from its text
/// normalization submodule. `None` means the width cannot be determined
/// and the caller must pass through unchanged.
pub fn expected_text_width(model: &dyn Module) -> Option<usize> {
    model.submodule(TEXT_NORM)?.declared_width()
}
