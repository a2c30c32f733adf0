//! Take schema definitions
//!
//! The persisted form of recorded takes and the file that holds them.

use crate::capture::default_locations;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Meta Types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMeta {
    pub version: String,
    pub format: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for StoreMeta {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "takes-v1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Take
// =============================================================================

/// One completed recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Take {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,

    /// Size in bytes of each frame in `record_stream`
    pub buffer_size: usize,

    #[serde(default)]
    pub locations: Vec<String>,

    /// Blend-shape name per location; may be shorter than `locations`
    #[serde(default)]
    pub blend_shape_names: Vec<String>,

    /// Frames concatenated in arrival order
    #[serde(default)]
    pub record_stream: Vec<u8>,
}

impl Take {
    pub fn frame_count(&self) -> usize {
        if self.buffer_size == 0 {
            return 0;
        }
        self.record_stream.len() / self.buffer_size
    }

    /// Bytes of frame `index`
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        if index >= self.frame_count() {
            return None;
        }
        let start = index * self.buffer_size;
        self.record_stream.get(start..start + self.buffer_size)
    }

    /// Frames in playback order
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // chunks_exact panics on zero
        self.record_stream
            .chunks_exact(self.buffer_size.max(1))
            .take(self.frame_count())
    }

    /// Replace the location list with the stock ARKit locations
    pub fn use_default_locations(&mut self) {
        self.locations = default_locations();
    }
}

// =============================================================================
// File
// =============================================================================

/// On-disk layout of a take store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackDataFile {
    pub meta: StoreMeta,
    #[serde(default)]
    pub takes: Vec<Take>,
}
