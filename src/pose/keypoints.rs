//! Hand keypoint schema
//!
//! The 21-point hand landmark layout used by the MediaPipe Hands family of
//! detectors. Estimators report keypoints either with names
//! (`"index_finger_tip"`) or positionally; [`KeypointId`] resolves both.

use serde::{Deserialize, Serialize};

/// Anatomical identity of a hand keypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypointId {
    /// Wrist (0)
    Wrist,
    /// Thumb carpometacarpal joint (1)
    ThumbCmc,
    /// Thumb metacarpophalangeal joint (2)
    ThumbMcp,
    /// Thumb interphalangeal joint (3)
    ThumbIp,
    /// Thumb tip (4)
    ThumbTip,
    /// Index finger knuckle (MCP, 5)
    IndexFingerMcp,
    /// Index finger middle joint (PIP, 6)
    IndexFingerPip,
    /// Index finger end joint (DIP, 7)
    IndexFingerDip,
    /// Index fingertip (8)
    IndexFingerTip,
    /// Middle finger knuckle (MCP, 9)
    MiddleFingerMcp,
    /// Middle finger middle joint (PIP, 10)
    MiddleFingerPip,
    /// Middle finger end joint (DIP, 11)
    MiddleFingerDip,
    /// Middle fingertip (12)
    MiddleFingerTip,
    /// Ring finger knuckle (MCP, 13)
    RingFingerMcp,
    /// Ring finger middle joint (PIP, 14)
    RingFingerPip,
    /// Ring finger end joint (DIP, 15)
    RingFingerDip,
    /// Ring fingertip (16)
    RingFingerTip,
    /// Pinky finger knuckle (MCP, 17)
    PinkyFingerMcp,
    /// Pinky finger middle joint (PIP, 18)
    PinkyFingerPip,
    /// Pinky finger end joint (DIP, 19)
    PinkyFingerDip,
    /// Pinky fingertip (20)
    PinkyFingerTip,
}

impl KeypointId {
    /// Number of keypoints in the schema
    pub const COUNT: usize = 21;

    /// All keypoints in schema order
    pub const ALL: [KeypointId; Self::COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexFingerMcp,
        Self::IndexFingerPip,
        Self::IndexFingerDip,
        Self::IndexFingerTip,
        Self::MiddleFingerMcp,
        Self::MiddleFingerPip,
        Self::MiddleFingerDip,
        Self::MiddleFingerTip,
        Self::RingFingerMcp,
        Self::RingFingerPip,
        Self::RingFingerDip,
        Self::RingFingerTip,
        Self::PinkyFingerMcp,
        Self::PinkyFingerPip,
        Self::PinkyFingerDip,
        Self::PinkyFingerTip,
    ];

    /// Position of this keypoint in the detector's output array
    pub fn index(self) -> usize {
        self as usize
    }

    /// Keypoint for a positional index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Name reported by the detector for this keypoint
    pub fn name(self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb_cmc",
            Self::ThumbMcp => "thumb_mcp",
            Self::ThumbIp => "thumb_ip",
            Self::ThumbTip => "thumb_tip",
            Self::IndexFingerMcp => "index_finger_mcp",
            Self::IndexFingerPip => "index_finger_pip",
            Self::IndexFingerDip => "index_finger_dip",
            Self::IndexFingerTip => "index_finger_tip",
            Self::MiddleFingerMcp => "middle_finger_mcp",
            Self::MiddleFingerPip => "middle_finger_pip",
            Self::MiddleFingerDip => "middle_finger_dip",
            Self::MiddleFingerTip => "middle_finger_tip",
            Self::RingFingerMcp => "ring_finger_mcp",
            Self::RingFingerPip => "ring_finger_pip",
            Self::RingFingerDip => "ring_finger_dip",
            Self::RingFingerTip => "ring_finger_tip",
            Self::PinkyFingerMcp => "pinky_finger_mcp",
            Self::PinkyFingerPip => "pinky_finger_pip",
            Self::PinkyFingerDip => "pinky_finger_dip",
            Self::PinkyFingerTip => "pinky_finger_tip",
        }
    }

    /// Whether this keypoint is a fingertip
    pub fn is_fingertip(self) -> bool {
        matches!(
            self,
            Self::ThumbTip
                | Self::IndexFingerTip
                | Self::MiddleFingerTip
                | Self::RingFingerTip
                | Self::PinkyFingerTip
        )
    }
}

impl std::fmt::Display for KeypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for KeypointId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == s)
            .ok_or_else(|| format!("Unknown keypoint: {}", s))
    }
}
