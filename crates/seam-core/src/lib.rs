//! # seam-core
//!
//! Minimal tensor substrate for the Seam compatibility shim.
//!
//! Provides a contiguous, f32-backed `Tensor` with:
//! - `Device` and `DType` placement tags (carried into cache keys)
//! - Reference-counted buffers (cheap clones, shared data)
//! - The small op set the shim needs: `project`, `matmul`, `reshape`,
//!   `squeeze`, `unsqueeze`

pub mod device;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod shape;
pub mod tensor;

pub use device::Device;
pub use dtype::DType;
pub use error::SeamError;
pub use shape::Shape;
pub use tensor::Tensor;

pub type Result<T> = std::result::Result<T, SeamError>;
