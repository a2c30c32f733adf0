//! Capture stream definitions
//!
//! Describes the shape of the frames a remote capture device delivers and
//! how its blend-shape locations map to rig blend-shape names.

use serde::{Deserialize, Serialize};

/// Blend-shape locations reported by an ARKit face tracker, in stream order.
pub const DEFAULT_LOCATIONS: [&str; 52] = [
    "browDown_L",
    "browDown_R",
    "browInnerUp",
    "browOuterUp_L",
    "browOuterUp_R",
    "cheekPuff",
    "cheekSquint_L",
    "cheekSquint_R",
    "eyeBlink_L",
    "eyeBlink_R",
    "eyeLookDown_L",
    "eyeLookDown_R",
    "eyeLookIn_L",
    "eyeLookIn_R",
    "eyeLookOut_L",
    "eyeLookOut_R",
    "eyeLookUp_L",
    "eyeLookUp_R",
    "eyeSquint_L",
    "eyeSquint_R",
    "eyeWide_L",
    "eyeWide_R",
    "jawForward",
    "jawLeft",
    "jawOpen",
    "jawRight",
    "mouthClose",
    "mouthDimple_L",
    "mouthDimple_R",
    "mouthFrown_L",
    "mouthFrown_R",
    "mouthFunnel",
    "mouthLeft",
    "mouthLowerDown_L",
    "mouthLowerDown_R",
    "mouthPress_L",
    "mouthPress_R",
    "mouthPucker",
    "mouthRight",
    "mouthRollLower",
    "mouthRollUpper",
    "mouthShrugLower",
    "mouthShrugUpper",
    "mouthSmile_L",
    "mouthSmile_R",
    "mouthStretch_L",
    "mouthStretch_R",
    "mouthUpperUp_L",
    "mouthUpperUp_R",
    "noseSneer_L",
    "noseSneer_R",
    "tongueOut",
];

/// Owned copy of [`DEFAULT_LOCATIONS`]
pub fn default_locations() -> Vec<String> {
    DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect()
}

/// Settings describing an incoming capture stream.
///
/// Hosts may implement this on their own settings objects; [`StreamConfig`]
/// is the stock implementation.
pub trait StreamSettings: Send + Sync {
    /// Size in bytes of one frame
    fn buffer_size(&self) -> usize;

    /// Location identifiers carried by each frame, in stream order
    fn locations(&self) -> &[String];

    /// Rig blend-shape names, parallel to `locations`. May be shorter.
    fn blend_shape_names(&self) -> &[String] {
        &[]
    }
}

/// Concrete stream settings loaded from host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfig {
    /// Size in bytes of one frame
    pub buffer_size: usize,

    /// Location identifiers in stream order
    #[serde(default)]
    pub locations: Vec<String>,

    /// Rig blend-shape names per location (may be shorter than `locations`)
    #[serde(default)]
    pub blend_shape_names: Vec<String>,
}

impl StreamConfig {
    /// Settings for `buffer_size`-byte frames using the default locations
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            locations: default_locations(),
            blend_shape_names: Vec::new(),
        }
    }
}

impl StreamSettings for StreamConfig {
    fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn locations(&self) -> &[String] {
        &self.locations
    }

    fn blend_shape_names(&self) -> &[String] {
        &self.blend_shape_names
    }
}

/// Location identifier to blend-shape name mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendShapeMappings {
    pub location_identifiers: Vec<String>,
    pub blend_shape_names: Vec<String>,
}

impl BlendShapeMappings {
    /// Snapshot the mapping carried by a settings object
    pub fn from_settings(settings: &dyn StreamSettings) -> Self {
        Self {
            location_identifiers: settings.locations().to_vec(),
            blend_shape_names: settings.blend_shape_names().to_vec(),
        }
    }

    /// Each location paired with its blend-shape name, if one is assigned.
    ///
    /// Trailing locations without a name yield `None`.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.location_identifiers
            .iter()
            .enumerate()
            .map(|(i, location)| {
                let name = self.blend_shape_names.get(i).map(String::as_str);
                (location.as_str(), name)
            })
    }

    /// Blend-shape name for a location, if mapped
    pub fn name_for(&self, location: &str) -> Option<&str> {
        self.pairs()
            .find(|(loc, _)| *loc == location)
            .and_then(|(_, name)| name)
    }
}
