//! Deterministic, weight-free repair transforms.
//!
//! A `Projection` reconciles two mismatched feature widths with a bias-free
//! linear map whose weight is a rectangular identity. It is a structural
//! compatibility patch, not a learned remap: it assumes the first
//! `min(source, target)` coordinates of the two representations line up,
//! which nothing verifies. Truncation drops information; padding fills the
//! extra coordinates with zeros.

use seam_core::{DType, Device, Result, Tensor};

/// A fixed linear map from `source` width to `target` width, bound to one
/// device and one precision.
///
/// Construction is a pure function of the four fields: the same inputs
/// always yield bit-identical weights.
pub struct Projection {
    weight: Tensor,
    source: usize,
    target: usize,
}

impl Projection {
    /// Build the repair transform for a (source, target) width pair.
    ///
    /// `source > target`: truncating identity, keeps the first `target`
    /// coordinates. `source < target`: identity block in the first `source`
    /// output rows, zeros elsewhere. Both reduce to `eye(target, source)`.
    /// No bias in either case.
    pub fn build(source: usize, target: usize, device: Device, dtype: DType) -> Self {
        let weight = Tensor::eye(target, source).placed(device, dtype);
        Self {
            weight,
            source,
            target,
        }
    }

    /// Source feature width.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Target feature width.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Device this transform is bound to.
    pub fn device(&self) -> Device {
        self.weight.device()
    }

    /// Precision this transform is bound to.
    pub fn dtype(&self) -> DType {
        self.weight.dtype()
    }

    /// Apply the transform along the last dimension; every other dimension
    /// is untouched. The input's last dimension must equal `source`.
    pub fn apply(&self, input: &Tensor) -> Result<Tensor> {
        input.project(&self.weight)
    }
}

impl std::fmt::Debug for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Projection({} -> {}, {}, {})",
            self.source,
            self.target,
            self.weight.device(),
            self.weight.dtype(),
        )
    }
}
