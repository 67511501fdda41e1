//! Hand Pose Types and Estimator Capability
//!
//! A [`HandPose`] is one frame's detected set of hand landmarks in video pixel
//! space. Poses are ephemeral: recomputed every frame and never stored beyond
//! the iteration that produced them.
//!
//! The estimator itself is an external capability ([`PoseEstimator`]). The
//! tracking loop only ever asks it for the hands visible in the current frame
//! of a [`VideoSource`](crate::mapping::VideoSource).

mod detector;
mod keypoints;

pub use detector::{DetectorConfig, HandPoseModel, ModelVariant, RuntimeBackend};
pub use keypoints::KeypointId;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::VideoSource;

/// Pose estimation error
#[derive(Error, Debug)]
pub enum EstimationError {
    /// The inference backend failed on this frame
    #[error("Hand pose inference failed: {0}")]
    Inference(String),

    /// The video source could not provide a frame
    #[error("Video source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Which hand the detector believes it saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    /// Left hand
    Left,
    /// Right hand
    Right,
}

/// A single landmark in video pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Horizontal position (video pixels)
    pub x: f64,
    /// Vertical position (video pixels)
    pub y: f64,
    /// Relative depth, if the model provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Per-keypoint confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Schema name reported by the detector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Keypoint {
    /// Create an unnamed keypoint
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            score: None,
            name: None,
        }
    }

    /// Create a keypoint carrying its schema name
    pub fn named(id: KeypointId, x: f64, y: f64) -> Self {
        Self {
            name: Some(id.name().to_string()),
            ..Self::new(x, y)
        }
    }

    /// Euclidean distance to another keypoint in video pixels
    pub fn distance_to(&self, other: &Keypoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One detected hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    /// Landmarks, in schema order when unnamed
    pub keypoints: Vec<Keypoint>,
    /// Detected handedness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
    /// Overall detection confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl HandPose {
    /// Create a pose from keypoints
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            handedness: None,
            score: None,
        }
    }

    /// Look up a keypoint by identity
    ///
    /// Named keypoints are matched by name. A pose without names is treated
    /// as positional and indexed by the schema order.
    pub fn keypoint(&self, id: KeypointId) -> Option<&Keypoint> {
        let has_names = self.keypoints.iter().any(|k| k.name.is_some());
        if has_names {
            self.keypoints
                .iter()
                .find(|k| k.name.as_deref() == Some(id.name()))
        } else {
            self.keypoints.get(id.index())
        }
    }
}

/// Hand pose estimator capability
///
/// Implementations wrap a loaded detector. They read the current frame from
/// the source directly and may return zero or more hands; the tracking loop
/// only acts on the first.
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Estimate hands in the source's current frame
    async fn estimate_hands(
        &self,
        source: &dyn VideoSource,
    ) -> Result<Vec<HandPose>, EstimationError>;
}
