use std::fmt;

/// Where the producing framework holds a tensor.
///
/// Seam never executes on a GPU; the device is a placement tag carried
/// through projection cache keys so repairs built for one placement are
/// never served to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// Host CPU.
    #[default]
    Cpu,
    /// CUDA GPU with device index.
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(idx) => write!(f, "cuda:{idx}"),
        }
    }
}
