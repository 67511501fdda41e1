//! Gesture Tracking Loop
//!
//! The [`TrackingSession`] owns everything for one controlled page: the model
//! provisioner, the pointer indicator, settings and statistics. Sessions are
//! plain values, so independent sessions can coexist (one per tab, or many in
//! a test).
//!
//! # Frame Pipeline
//!
//! ```text
//! FrameClock::next_frame()
//!   └─> PoseEstimator::estimate_hands(video)
//!       ├─ error ──────────────> skip frame (indicator untouched)
//!       ├─ no hand ────────────> hide indicator
//!       └─ first hand
//!           ├─ no index tip ───> hide indicator
//!           └─ map_to_page(index tip, video geometry, mirror)
//!               ├─ not ready ──> hide indicator
//!               └─ show indicator
//!                   └─ is_click_gesture(index tip, middle tip)
//!                       └─ ClickTrigger ──> ClickSink::click_at + flash
//! ```
//!
//! # Scheduling and Cancellation
//!
//! The loop is a single spawned task that suspends on the host's
//! [`FrameClock`] between iterations, so it follows the host's refresh
//! cadence instead of a fixed timer. `stop()` cancels the loop's token and
//! hides the indicator. An estimation already in flight is allowed to finish;
//! its result is discarded.

mod clock;
mod session;
mod stats;

pub use clock::IntervalFrameClock;
pub use session::{FrameOutcome, SessionConfig, SessionHost, TrackingSession, TrackingSettings};
pub use stats::{StatsSnapshot, TrackingStats};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::{ClickPolicy, PINCH_THRESHOLD_PX};
use crate::mapping::PagePoint;
use crate::provision::ProvisionError;

/// Default loop cadence when the host has no native frame callback (Hz)
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Tracking session error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// The hand pose model could not be provisioned
    #[error("Hand pose model unavailable ({load_attempts} failed runtime load attempts): {source}")]
    ModelUnavailable {
        /// Failed runtime load attempts in the provisioning sequence
        load_attempts: u32,
        /// Stage of provisioning that failed
        #[source]
        source: ProvisionError,
    },

    /// `stop()` was called while `start()` was still provisioning
    #[error("Tracking stopped before startup completed")]
    StoppedDuringStartup,
}

/// Click synthesis error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClickError {
    /// Nothing on the page at the target position
    #[error("No element at {0}")]
    NoTarget(PagePoint),

    /// The host failed to deliver the click
    #[error("Click dispatch failed: {0}")]
    Dispatch(String),
}

/// Delivers synthesized clicks to the page
///
/// The target is whatever element occupies `position` at dispatch time; no
/// element reference is retained between frames.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickSink: Send + Sync {
    /// Click at a page position
    async fn click_at(&self, position: PagePoint) -> Result<(), ClickError>;
}

/// Host display refresh signal
///
/// `next_frame` resolves once per display refresh. Hosts that stop
/// refreshing while hidden should stop resolving too, which pauses tracking.
#[async_trait]
pub trait FrameClock: Send + Sync {
    /// Wait for the next display refresh
    async fn next_frame(&self);
}

/// Tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Mirror the video horizontally (selfie view)
    #[serde(default = "default_true")]
    pub mirror: bool,

    /// When a held pinch produces clicks
    #[serde(default)]
    pub click_policy: ClickPolicy,

    /// Fingertip distance below which a pinch is recognized (video pixels)
    #[serde(default = "default_pinch_threshold")]
    pub pinch_threshold_px: f64,

    /// Fallback frame rate for [`IntervalFrameClock`] (Hz)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

fn default_true() -> bool {
    true
}
fn default_pinch_threshold() -> f64 {
    PINCH_THRESHOLD_PX
}
fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            mirror: default_true(),
            click_policy: ClickPolicy::default(),
            pinch_threshold_px: default_pinch_threshold(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl TrackingConfig {
    /// Runtime-adjustable subset of this configuration
    pub fn settings(&self) -> TrackingSettings {
        TrackingSettings {
            mirror: self.mirror,
            click_policy: self.click_policy,
        }
    }
}
