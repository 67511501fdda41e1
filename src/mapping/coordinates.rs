//! Coordinate Transformation
//!
//! Pure video-pixel to page-pixel transformation with horizontal mirroring.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{MappingError, Result};

/// On-page rectangle the video is rendered into (page pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderRect {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Drawn width
    pub width: f64,
    /// Drawn height
    pub height: f64,
}

impl RenderRect {
    /// Create a render rectangle
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Check if a page point is within this rectangle
    pub fn contains(&self, point: PagePoint) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}

/// Video frame dimensions together with where the frame is drawn
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoGeometry {
    /// Native frame width (pixels), zero until the stream plays
    pub video_width: u32,
    /// Native frame height (pixels), zero until the stream plays
    pub video_height: u32,
    /// Render rectangle in page coordinates
    pub render: RenderRect,
}

impl VideoGeometry {
    /// Create geometry from frame size and render rectangle
    pub fn new(video_width: u32, video_height: u32, render: RenderRect) -> Self {
        Self {
            video_width,
            video_height,
            render,
        }
    }

    /// Whether the stream has reported usable dimensions
    pub fn is_ready(&self) -> bool {
        self.video_width > 0 && self.video_height > 0
    }

    /// Video → page scale factors
    pub fn scale(&self) -> Result<(f64, f64)> {
        if !self.is_ready() {
            return Err(MappingError::VideoNotReady {
                width: self.video_width,
                height: self.video_height,
            });
        }

        Ok((
            self.render.width / self.video_width as f64,
            self.render.height / self.video_height as f64,
        ))
    }
}

/// A point in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PagePoint {
    /// Horizontal position (page pixels)
    pub x: f64,
    /// Vertical position (page pixels)
    pub y: f64,
}

impl PagePoint {
    /// Create a page point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for PagePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Map a video-pixel position to page coordinates
///
/// Mirroring flips horizontally within the render rectangle; the vertical
/// axis is never mirrored. Fails with [`MappingError::VideoNotReady`] while
/// the video reports zero dimensions.
pub fn map_to_page(x: f64, y: f64, geometry: &VideoGeometry, mirror: bool) -> Result<PagePoint> {
    let (scale_x, scale_y) = geometry.scale()?;
    let render = &geometry.render;

    let page_x = if mirror {
        render.left + (render.width - x * scale_x)
    } else {
        render.left + x * scale_x
    };
    let page_y = render.top + y * scale_y;

    trace!(
        "Mapped video ({:.1}, {:.1}) -> page ({:.1}, {:.1}) mirror={}",
        x,
        y,
        page_x,
        page_y,
        mirror
    );

    Ok(PagePoint::new(page_x, page_y))
}
