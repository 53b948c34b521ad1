use std::fmt;
use std::sync::Arc;

use crate::device::Device;
use crate::dtype::DType;
use crate::error::SeamError;
use crate::shape::Shape;
use crate::Result;

/// A contiguous multi-dimensional array with placement tags.
///
/// The numeric buffer is always host f32 and reference-counted, so clones
/// and reshapes share data. `device` and `dtype` record where and at what
/// precision the producing framework holds the tensor; the shim carries
/// them into projection cache keys but never converts the buffer itself.
///
/// # Examples
///
/// ```
/// use seam_core::Tensor;
///
/// let t = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
/// assert_eq!(t.shape().dims(), &[2, 2]);
/// assert_eq!(t.width(), Some(2));
/// ```
#[derive(Clone)]
pub struct Tensor {
    data: Arc<Vec<f32>>,
    shape: Shape,
    dtype: DType,
    device: Device,
}

impl Tensor {
    /// Create a tensor from f32 data with the given shape.
    pub fn from_f32(data: &[f32], shape: &[usize]) -> Self {
        let s = Shape::new(shape);
        assert_eq!(
            s.numel(),
            data.len(),
            "shape {:?} requires {} elements, got {}",
            shape,
            s.numel(),
            data.len()
        );
        Self {
            data: Arc::new(data.to_vec()),
            shape: s,
            dtype: DType::F32,
            device: Device::Cpu,
        }
    }

    /// Create a tensor of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        let s = Shape::new(shape);
        Self {
            data: Arc::new(vec![0.0; s.numel()]),
            shape: s,
            dtype: DType::F32,
            device: Device::Cpu,
        }
    }

    /// Create a tensor of ones.
    pub fn ones(shape: &[usize]) -> Self {
        let s = Shape::new(shape);
        Self {
            data: Arc::new(vec![1.0; s.numel()]),
            shape: s,
            dtype: DType::F32,
            device: Device::Cpu,
        }
    }

    /// Rectangular identity matrix of shape `[rows, cols]`.
    ///
    /// `eye(r, c)[i][j]` is 1 where `i == j`, else 0. For `r < c` this is a
    /// truncating identity; for `r > c` an identity block over zero padding.
    pub fn eye(rows: usize, cols: usize) -> Self {
        let mut data = vec![0.0f32; rows * cols];
        for i in 0..rows.min(cols) {
            data[i * cols + i] = 1.0;
        }
        Self {
            data: Arc::new(data),
            shape: Shape::new(&[rows, cols]),
            dtype: DType::F32,
            device: Device::Cpu,
        }
    }

    /// Retag this tensor with the placement the host declares for it.
    ///
    /// Shares the buffer; only the tags change.
    pub fn placed(&self, device: Device, dtype: DType) -> Tensor {
        Tensor {
            data: Arc::clone(&self.data),
            shape: self.shape.clone(),
            dtype,
            device,
        }
    }

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Feature width: size of the last dimension.
    pub fn width(&self) -> Option<usize> {
        self.shape.width()
    }

    /// Declared precision tag.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Declared placement tag.
    pub fn device(&self) -> Device {
        self.device
    }

    /// The underlying f32 buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// View the same buffer under a new shape with equal element count.
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Tensor> {
        let s = Shape::new(new_shape);
        if s.numel() != self.numel() {
            return Err(SeamError::InvalidReshape {
                numel: self.numel(),
                shape: new_shape.to_vec(),
            });
        }
        Ok(Tensor {
            data: Arc::clone(&self.data),
            shape: s,
            dtype: self.dtype,
            device: self.device,
        })
    }

    /// Rebuild with the same tags but a new buffer and shape.
    ///
    /// Used by ops that produce fresh data while preserving where the host
    /// believes the tensor lives.
    pub(crate) fn like_self(&self, data: Vec<f32>, shape: Shape) -> Tensor {
        debug_assert_eq!(data.len(), shape.numel());
        Tensor {
            data: Arc::new(data),
            shape,
            dtype: self.dtype,
            device: self.device,
        }
    }

    /// Whether two tensors share one buffer.
    pub fn same_buffer(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={}, dtype={}, device={})",
            self.shape, self.dtype, self.device,
        )
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numel() <= 16 {
            write!(f, "tensor({:?}, shape={})", self.data.as_slice(), self.shape)
        } else {
            write!(
                f,
                "tensor([{:.4}, ..., {:.4}], shape={})",
                self.data[0],
                self.data[self.numel() - 1],
                self.shape
            )
        }
    }
}
