//! Tensor operations the shim needs: last-dim projection, 2-D matmul,
//! squeeze, unsqueeze.

use crate::error::SeamError;
use crate::shape::Shape;
use crate::tensor::Tensor;
use crate::Result;

impl Tensor {
    /// Contract the last dimension with a `[out, in]` weight matrix:
    /// `y[..., o] = Σ_i x[..., i] * w[o, i]`.
    ///
    /// Every leading dimension is untouched; only the feature width changes
    /// from `in` to `out`. The result keeps this tensor's placement tags.
    pub fn project(&self, weight: &Tensor) -> Result<Tensor> {
        let w_dims = weight.shape().dims();
        if w_dims.len() != 2 {
            return Err(SeamError::ShapeMismatch {
                expected: vec![0, 0],
                got: w_dims.to_vec(),
            });
        }
        let (out_w, in_w) = (w_dims[0], w_dims[1]);

        let width = self.width().ok_or(SeamError::InvalidAxis {
            axis: 0,
            rank: 0,
        })?;
        if width != in_w {
            return Err(SeamError::ShapeMismatch {
                expected: vec![in_w],
                got: vec![width],
            });
        }

        // Leading-dim product, not numel / in_w: in_w may be 0.
        let dims = self.shape().dims();
        let rows: usize = dims[..dims.len() - 1].iter().product();
        let x = self.as_slice();
        let w = weight.as_slice();
        let mut out = vec![0.0f32; rows * out_w];

        for r in 0..rows {
            let row = &x[r * in_w..(r + 1) * in_w];
            for o in 0..out_w {
                let w_row = &w[o * in_w..(o + 1) * in_w];
                let mut acc = 0.0f32;
                for i in 0..in_w {
                    acc += row[i] * w_row[i];
                }
                out[r * out_w + o] = acc;
            }
        }

        let mut out_dims = self.shape().dims().to_vec();
        *out_dims.last_mut().expect("checked: rank >= 1") = out_w;
        Ok(self.like_self(out, Shape::from(out_dims)))
    }

    /// Matrix multiplication `[M, K] @ [K, N] → [M, N]`.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor> {
        let a_dims = self.shape().dims();
        let b_dims = other.shape().dims();
        if a_dims.len() != 2 || b_dims.len() != 2 || a_dims[1] != b_dims[0] {
            return Err(SeamError::ShapeMismatch {
                expected: a_dims.to_vec(),
                got: b_dims.to_vec(),
            });
        }

        let (m, k, n) = (a_dims[0], a_dims[1], b_dims[1]);
        let a = self.as_slice();
        let b = other.as_slice();
        let mut out = vec![0.0f32; m * n];

        for i in 0..m {
            for p in 0..k {
                let a_ip = a[i * k + p];
                if a_ip == 0.0 {
                    continue;
                }
                for j in 0..n {
                    out[i * n + j] += a_ip * b[p * n + j];
                }
            }
        }

        Ok(self.like_self(out, Shape::new(&[m, n])))
    }

    /// Remove a singleton axis. The buffer is shared, only the shape changes.
    pub fn squeeze(&self, axis: usize) -> Result<Tensor> {
        let rank = self.rank();
        let size = self.shape().dim(axis).ok_or(SeamError::InvalidAxis { axis, rank })?;
        let shape = self
            .shape()
            .squeezed(axis)
            .ok_or(SeamError::NonSingletonAxis { axis, size })?;
        self.reshape(shape.dims())
    }

    /// Insert a singleton axis. The buffer is shared, only the shape changes.
    pub fn unsqueeze(&self, axis: usize) -> Result<Tensor> {
        let rank = self.rank();
        let shape = self
            .shape()
            .unsqueezed(axis)
            .ok_or(SeamError::InvalidAxis { axis, rank })?;
        self.reshape(shape.dims())
    }
}
