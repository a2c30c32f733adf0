//! Capture stream description
//!
//! The device transport lives with the host; this module only describes the
//! frames it delivers.

pub mod traits;

pub use traits::{
    default_locations, BlendShapeMappings, StreamConfig, StreamSettings, DEFAULT_LOCATIONS,
};
