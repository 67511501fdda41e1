//! Video → Page Coordinate Mapping
//!
//! Landmarks arrive in the video frame's native pixel space. The pointer and
//! click targets live in page space. This module converts between the two,
//! accounting for the rendered size of the video element and for mirroring.
//!
//! # Transformation
//!
//! ```text
//! video px (x, y)
//!   └─> scale by render.width / video_width, render.height / video_height
//!       └─> mirror horizontally (optional)
//!           └─> offset by render.left, render.top
//!               └─> page px
//! ```
//!
//! The video element can move or resize between frames (page reflow), so the
//! geometry is re-read from the [`VideoSource`] on every frame rather than
//! cached.

mod coordinates;

pub use coordinates::{map_to_page, PagePoint, RenderRect, VideoGeometry};

use thiserror::Error;

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

/// Coordinate mapping error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// The stream has not produced frames yet (zero dimensions)
    #[error("Video not ready: {width}x{height}")]
    VideoNotReady {
        /// Reported video width
        width: u32,
        /// Reported video height
        height: u32,
    },
}

/// Continuously updating camera frame source
///
/// Owned by the host. The tracking loop only reads its geometry; the pose
/// estimator reads frames from it directly.
pub trait VideoSource: Send + Sync {
    /// Current frame dimensions and on-page render rectangle
    fn geometry(&self) -> VideoGeometry;
}
