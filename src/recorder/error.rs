//! Recording errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Recorder is already recording")]
    AlreadyRecording,

    #[error("Recorder is not recording")]
    NotRecording,

    #[error("Buffer size must be greater than zero")]
    InvalidBufferSize,

    #[error("Frame at offset {offset} needs {needed} bytes, only {available} available")]
    FrameOutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Failed to start refill worker: {0}")]
    Worker(#[from] std::io::Error),
}

pub type RecordingResult<T> = Result<T, RecordingError>;
