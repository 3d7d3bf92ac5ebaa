use glam::UVec2;
use thiserror::Error;

use crate::CameraHandle;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "out of memory while allocating `{label}` \
         (requested {requested} bytes, {available} bytes available)"
    )]
    OutOfMemory {
        label: String,
        requested: usize,
        available: usize,
    },

    #[error("device is not supported: {reason}")]
    UnsupportedDevice { reason: String },

    #[error("couldn't read `{label}` back from the device: {reason}")]
    Readback { label: String, reason: String },

    #[error("invalid viewport size: {size}")]
    InvalidViewport { size: UVec2 },

    #[error("camera does not exist: {0:?}")]
    UnknownCamera(CameraHandle),

    #[error("{what} has size {actual}, but the camera expects {expected}")]
    SizeMismatch {
        what: &'static str,
        expected: UVec2,
        actual: UVec2,
    },
}
