//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::mapping::{RenderRect, VideoGeometry};

/// Video geometry used by the replay host
///
/// A live host reads these from the camera stream and page layout; the
/// trace replay binary has neither, so they come from config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Camera frame width (pixels)
    #[serde(default = "default_video_width")]
    pub width: u32,

    /// Camera frame height (pixels)
    #[serde(default = "default_video_height")]
    pub height: u32,

    /// Where the video is drawn on the page (page pixels)
    #[serde(default = "default_render_rect")]
    pub render: RenderRect,
}

fn default_video_width() -> u32 {
    640
}
fn default_video_height() -> u32 {
    480
}
fn default_render_rect() -> RenderRect {
    RenderRect::new(0.0, 0.0, 640.0, 480.0)
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: default_video_width(),
            height: default_video_height(),
            render: default_render_rect(),
        }
    }
}

impl VideoConfig {
    /// Geometry snapshot for the mapper
    pub fn geometry(&self) -> VideoGeometry {
        VideoGeometry::new(self.width, self.height, self.render)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files (None = console only)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}
