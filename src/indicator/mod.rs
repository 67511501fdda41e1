//! Pointer Indicator
//!
//! A single visual marker that follows the tracked fingertip and flashes
//! when a click is synthesized. The marker is purely feedback: it is layered
//! above page content and must never intercept pointer events, otherwise a
//! synthesized click would hit the marker instead of the page element under
//! it.
//!
//! # Architecture
//!
//! ```text
//! TrackingSession
//!   └─> PointerIndicator (state, flash timer)
//!       └─> IndicatorSurface (host: DOM element, overlay window, log)
//! ```
//!
//! # Click Flash
//!
//! `flash_click()` switches the marker to its click style immediately and
//! reverts after [`DEFAULT_FLASH_DURATION_MS`]. A flash that arrives while
//! another is pending restarts the revert timer; flashes never stack.

mod marker;

pub use marker::{IndicatorConfig, IndicatorState, PointerIndicator};

use crate::mapping::PagePoint;

/// Default click flash duration (ms)
pub const DEFAULT_FLASH_DURATION_MS: u64 = 300;

/// Default marker diameter (page pixels)
pub const DEFAULT_MARKER_SIZE_PX: u32 = 20;

/// Host-side rendering of the pointer marker
///
/// Implementations must render the marker without capturing pointer events
/// (e.g. `pointer-events: none` for a DOM element) and must not call back
/// into the [`PointerIndicator`].
pub trait IndicatorSurface: Send + Sync {
    /// Create the marker element
    fn attach(&self);

    /// Remove the marker element
    fn detach(&self);

    /// Show or hide the marker
    fn set_visible(&self, visible: bool);

    /// Move the marker so it is centred on `position`
    fn set_position(&self, position: PagePoint);

    /// Switch between the normal and the click style
    fn set_click_style(&self, active: bool);
}
