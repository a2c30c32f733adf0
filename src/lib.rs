//! Face Take Recorder - buffered take recording for facial capture streams.
//!
//! Frames arriving from a remote face-tracking device are copied into pooled
//! buffers while a take is recording, then joined into a single stream and
//! appended to a take store for later playback.

pub mod capture;
pub mod project;
pub mod recorder;
pub mod utils;

pub use capture::{BlendShapeMappings, StreamConfig, StreamSettings};
pub use project::{Take, TakeStore};
pub use recorder::{PoolConfig, RecorderState, RecordingError, RecordingEvent, TakeRecorder};
pub use utils::{AppError, AppResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to debug output for this crate. Does
/// nothing if a global subscriber is already set.
pub fn init_logging() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "face_take_recorder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("Face Take Recorder v{}", env!("CARGO_PKG_VERSION"));
    }
}
