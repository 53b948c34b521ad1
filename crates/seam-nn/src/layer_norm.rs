//! Layer Normalization over the last dimension.
//!
//! `y = (x - mean) / sqrt(var + eps) * gamma + beta`
//!
//! A `LayerNorm` declares the width it normalizes, which is what the
//! compatibility layer reads to learn a model's expected conditioning
//! width (`Module::declared_width`).

use seam_core::{Result, SeamError, Tensor};

use crate::module::Module;

/// Layer Normalization over the last dimension.
pub struct LayerNorm {
    normalized_shape: usize,
    eps: f32,
    gamma: Tensor,
    beta: Tensor,
}

impl LayerNorm {
    /// Create a new LayerNorm layer.
    pub fn new(normalized_shape: usize, eps: f32) -> Self {
        Self {
            normalized_shape,
            eps,
            gamma: Tensor::ones(&[normalized_shape]),
            beta: Tensor::zeros(&[normalized_shape]),
        }
    }

    /// Create with default eps (1e-5).
    pub fn default_new(normalized_shape: usize) -> Self {
        Self::new(normalized_shape, 1e-5)
    }

    /// The width this layer normalizes over.
    pub fn normalized_shape(&self) -> usize {
        self.normalized_shape
    }

    /// Epsilon value.
    pub fn eps(&self) -> f32 {
        self.eps
    }
}

impl Module for LayerNorm {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let dims = input.shape().dims().to_vec();
        let last_dim = input.width().ok_or_else(|| {
            SeamError::Unsupported("LayerNorm: scalar input".into())
        })?;
        if last_dim != self.normalized_shape {
            return Err(SeamError::ShapeMismatch {
                expected: vec![self.normalized_shape],
                got: vec![last_dim],
            });
        }

        let slice = input.as_slice();
        let gamma = self.gamma.as_slice();
        let beta = self.beta.as_slice();
        let rows = input.numel() / last_dim;
        let mut result = vec![0.0f32; input.numel()];

        for r in 0..rows {
            let start = r * last_dim;
            let row = &slice[start..start + last_dim];

            let mean: f32 = row.iter().sum::<f32>() / last_dim as f32;
            let var: f32 =
                row.iter().map(|&x| (x - mean) * (x - mean)).sum::<f32>() / last_dim as f32;
            let inv_std = 1.0 / (var + self.eps).sqrt();

            for i in 0..last_dim {
                result[start + i] = (row[i] - mean) * inv_std * gamma[i] + beta[i];
            }
        }

        Ok(Tensor::from_f32(&result, &dims).placed(input.device(), input.dtype()))
    }

    fn declared_width(&self) -> Option<usize> {
        Some(self.normalized_shape)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.gamma, &self.beta]
    }
}
