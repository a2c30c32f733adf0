//! Recording state management
//!
//! Defines the recording state machine, pool tuning, and the in-flight
//! session a take is assembled from.

use crate::capture::{BlendShapeMappings, StreamSettings};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current state of the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No take in progress
    Idle,
    /// Collecting frames for a take
    Recording,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Buffer pool tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfig {
    /// Queue depth below which the refill worker adds buffers
    pub low_water_mark: usize,

    /// Buffers added per refill cycle
    pub refill_batch: usize,

    /// Refill worker poll period in milliseconds
    pub refill_interval_ms: u64,
}

impl PoolConfig {
    /// Poll period, never shorter than 1 ms
    pub fn refill_interval(&self) -> Duration {
        Duration::from_millis(self.refill_interval_ms.max(1))
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            low_water_mark: 32,
            refill_batch: 6,
            refill_interval_ms: 1,
        }
    }
}

/// Name for a take started at `time`, e.g. `2026_10_19_14_05-Take03`
pub fn take_name(time: DateTime<Local>, take_number: u32) -> String {
    format!("{}-Take{:02}", time.format("%Y_%m_%d_%H_%M"), take_number)
}

/// Frames collected between start and stop of one take
#[derive(Debug)]
pub struct RecordingSession {
    /// Take name
    pub name: String,

    /// Size in bytes of every frame
    pub buffer_size: usize,

    /// Location/blend-shape mapping in effect when the take started
    pub mappings: BlendShapeMappings,

    /// When the take started
    pub started_at: DateTime<Utc>,

    /// Pooled frame buffers in arrival order
    pub frames: Vec<Vec<u8>>,
}

impl RecordingSession {
    /// Create a session named after the current local time
    pub fn new(settings: &dyn StreamSettings, take_number: u32) -> Self {
        Self::named(take_name(Local::now(), take_number), settings)
    }

    pub fn named(name: String, settings: &dyn StreamSettings) -> Self {
        Self {
            name,
            buffer_size: settings.buffer_size(),
            mappings: BlendShapeMappings::from_settings(settings),
            started_at: Utc::now(),
            frames: Vec::new(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether stopping this session should produce a take
    pub fn is_saveable(&self) -> bool {
        !self.name.is_empty() && !self.frames.is_empty()
    }
}
