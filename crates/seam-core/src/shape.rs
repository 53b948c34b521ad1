use smallvec::SmallVec;
use std::fmt;

/// Tensor shape with stack-allocated storage for ≤5 dimensions.
///
/// The tiling path carries rank-5 video-style tensors `[N, C, F, H, W]`,
/// so the inline capacity covers every shape the shim touches.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; 5]>,
}

impl Shape {
    /// Create a new shape from dimensions.
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
        }
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (1 for a scalar).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Size of a specific dimension.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// Size of the last dimension — the feature width.
    pub fn width(&self) -> Option<usize> {
        self.dims.last().copied()
    }

    /// Shape with the given singleton axis removed.
    ///
    /// Returns `None` when the axis is out of range or not of size 1.
    pub fn squeezed(&self, axis: usize) -> Option<Shape> {
        if *self.dims.get(axis)? != 1 {
            return None;
        }
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Some(Shape { dims })
    }

    /// Shape with a singleton axis inserted at `axis` (may equal the rank,
    /// appending a trailing dimension).
    pub fn unsqueezed(&self, axis: usize) -> Option<Shape> {
        if axis > self.dims.len() {
            return None;
        }
        let mut dims = self.dims.clone();
        dims.insert(axis, 1);
        Some(Shape { dims })
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape {
            dims: SmallVec::from_vec(dims),
        }
    }
}
