//! Rank adaptation for the tiling call path.
//!
//! Tiling code written for rank-4 image tensors `[N, C, H, W]` receives
//! rank-5 video-style tensors `[N, C, F, H, W]` from the targeted models.
//! When the frame dimension is a singleton, [`RankAdapter`] collapses it
//! for the delegate call and restores it on the way out. A non-singleton
//! frame dimension cannot be collapsed safely; the adapter warns and
//! delegates the original tensor unchanged.
//!
//! This path is independent of the conditioning repair: a host without a
//! tiling stage simply never constructs an adapter.

use seam_core::{Result, Tensor};

/// Position of the frame axis in `[N, C, F, H, W]` tensors.
const FRAME_AXIS: usize = 2;

/// A tiling invocation request carrying the tensor to tile.
#[derive(Default)]
pub struct TileRequest {
    /// The tensor under the tiling path's fixed input key, when present.
    pub input: Option<Tensor>,
}

impl TileRequest {
    /// Request carrying an input tensor.
    pub fn with_input(input: Tensor) -> Self {
        Self { input: Some(input) }
    }
}

/// A tiling invocation path.
pub trait TileFn: Send + Sync {
    fn invoke(&self, request: TileRequest) -> Result<Tensor>;
}

impl<F> TileFn for F
where
    F: Fn(TileRequest) -> Result<Tensor> + Send + Sync,
{
    fn invoke(&self, request: TileRequest) -> Result<Tensor> {
        self(request)
    }
}

/// Wrapper that adapts rank-5 singleton-frame inputs to rank-4 delegates.
pub struct RankAdapter<F> {
    inner: F,
}

impl<F: TileFn> RankAdapter<F> {
    /// Wrap a tiling invocation path.
    pub fn wrap(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: TileFn> TileFn for RankAdapter<F> {
    fn invoke(&self, mut request: TileRequest) -> Result<Tensor> {
        let Some(input) = request.input.as_ref() else {
            return self.inner.invoke(request);
        };
        if input.rank() != 5 {
            return self.inner.invoke(request);
        }

        let frames = input.shape().dims()[FRAME_AXIS];
        if frames != 1 {
            tracing::warn!(
                "rank-5 input {} has {} frames; cannot safely collapse, passing through",
                input.shape(),
                frames,
            );
            return self.inner.invoke(request);
        }

        let squeezed = input.squeeze(FRAME_AXIS)?;
        tracing::debug!(
            "collapsed tiling input {} to rank-4 {}",
            input.shape(),
            squeezed.shape(),
        );
        request.input = Some(squeezed);

        let result = self.inner.invoke(request)?;
        if result.rank() == 4 {
            result.unsqueeze(FRAME_AXIS)
        } else {
            Ok(result)
        }
    }
}
