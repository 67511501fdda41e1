//! Host Adapters
//!
//! Implementations of the host capabilities for running a session outside a
//! browser page: pose traces replayed from disk, a fixed video geometry, and
//! log-backed click and marker output.
//!
//! ```text
//! TrackingSession
//!   ├─> ReplayRuntime ──> ReplayEstimator (trace.jsonl)
//!   ├─> StaticVideoSource
//!   ├─> LogIndicatorSurface
//!   └─> LogClickSink
//! ```

mod replay;

pub use replay::{load_trace, parse_trace, ReplayEstimator, ReplayRuntime, TraceError};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::indicator::IndicatorSurface;
use crate::mapping::{PagePoint, RenderRect, VideoGeometry, VideoSource};
use crate::tracking::{ClickError, ClickSink};

/// Video source with fixed geometry
#[derive(Debug, Clone, Copy)]
pub struct StaticVideoSource {
    geometry: VideoGeometry,
}

impl StaticVideoSource {
    /// Create a source reporting `geometry` for every frame
    pub fn new(geometry: VideoGeometry) -> Self {
        Self { geometry }
    }
}

impl VideoSource for StaticVideoSource {
    fn geometry(&self) -> VideoGeometry {
        self.geometry
    }
}

/// Click sink that logs clicks and remembers where they landed
///
/// Clicks outside `page` have no target element and are rejected.
#[derive(Debug)]
pub struct LogClickSink {
    page: RenderRect,
    clicks: Mutex<Vec<PagePoint>>,
}

impl LogClickSink {
    /// Create a sink for a page of the given bounds
    pub fn new(page: RenderRect) -> Self {
        Self {
            page,
            clicks: Mutex::new(Vec::new()),
        }
    }

    /// Positions clicked so far
    pub fn clicks(&self) -> Vec<PagePoint> {
        self.clicks.lock().clone()
    }
}

#[async_trait]
impl ClickSink for LogClickSink {
    async fn click_at(&self, position: PagePoint) -> Result<(), ClickError> {
        if !self.page.contains(position) {
            return Err(ClickError::NoTarget(position));
        }

        info!("Click at {}", position);
        self.clicks.lock().push(position);
        Ok(())
    }
}

/// Marker surface that writes marker updates to the log
#[derive(Debug, Default)]
pub struct LogIndicatorSurface;

impl IndicatorSurface for LogIndicatorSurface {
    fn attach(&self) {
        debug!("Marker attached");
    }

    fn detach(&self) {
        debug!("Marker detached");
    }

    fn set_visible(&self, visible: bool) {
        debug!("Marker visible={}", visible);
    }

    fn set_position(&self, position: PagePoint) {
        trace!("Marker at {}", position);
    }

    fn set_click_style(&self, active: bool) {
        debug!("Marker click style={}", active);
    }
}
