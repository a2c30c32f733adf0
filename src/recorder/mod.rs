//! Take recording
//!
//! This module implements the recording pipeline:
//! - BufferPool of reusable frame buffers, kept topped up by a RefillWorker
//! - TakeRecorder to collect frames for the take in progress
//! - assemble() to join a finished session into a single take

pub mod assembler;
pub mod buffer_pool;
pub mod coordinator;
pub mod error;
pub mod refill;
pub mod state;

pub use assembler::assemble;
pub use buffer_pool::{BufferPool, PoolStats};
pub use coordinator::{RecorderState, RecordingEvent, TakeRecorder};
pub use error::{RecordingError, RecordingResult};
pub use refill::RefillWorker;
pub use state::{take_name, PoolConfig, RecordingSession, RecordingState};
