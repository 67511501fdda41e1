//! Detector construction parameters

use serde::{Deserialize, Serialize};

/// Hand pose model family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HandPoseModel {
    /// MediaPipe Hands (21 keypoints)
    #[default]
    MediapipeHands,
}

/// Model size/accuracy tradeoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Lightweight model, suited to per-frame use on the main thread
    #[default]
    Lite,
    /// Full model, more accurate and slower
    Full,
}

/// Inference runtime backend for the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeBackend {
    /// TensorFlow.js runtime
    #[default]
    Tfjs,
    /// MediaPipe solution runtime
    Mediapipe,
}

impl std::fmt::Display for RuntimeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tfjs => write!(f, "tfjs"),
            Self::Mediapipe => write!(f, "mediapipe"),
        }
    }
}

/// Parameters for constructing a hand pose detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Model family
    #[serde(default)]
    pub model: HandPoseModel,

    /// Model variant
    #[serde(default)]
    pub model_type: ModelVariant,

    /// Maximum number of hands tracked per frame
    #[serde(default = "default_max_hands")]
    pub max_hands: u32,

    /// Runtime backend
    #[serde(default)]
    pub runtime: RuntimeBackend,
}

fn default_max_hands() -> u32 {
    1
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: HandPoseModel::default(),
            model_type: ModelVariant::default(),
            max_hands: default_max_hands(),
            runtime: RuntimeBackend::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detector_is_single_lite_hand() {
        let config = DetectorConfig::default();
        assert_eq!(config.model, HandPoseModel::MediapipeHands);
        assert_eq!(config.model_type, ModelVariant::Lite);
        assert_eq!(config.max_hands, 1);
        assert_eq!(config.runtime, RuntimeBackend::Tfjs);
    }

    #[test]
    fn test_detector_config_from_toml() {
        let config: DetectorConfig = toml::from_str(
            r#"
            model_type = "full"
            runtime = "mediapipe"
            "#,
        )
        .unwrap();
        assert_eq!(config.model_type, ModelVariant::Full);
        assert_eq!(config.runtime, RuntimeBackend::Mediapipe);
        assert_eq!(config.max_hands, 1);
    }
}
