//! Per-session tracking statistics

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by the tracking loop
#[derive(Debug, Default)]
pub struct TrackingStats {
    frames: AtomicU64,
    hand_frames: AtomicU64,
    estimation_errors: AtomicU64,
    clicks: AtomicU64,
    click_errors: AtomicU64,
}

/// Point-in-time copy of [`TrackingStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Frames the loop processed (including skipped ones)
    pub frames: u64,
    /// Frames where the pointer was shown
    pub hand_frames: u64,
    /// Frames skipped due to estimator errors
    pub estimation_errors: u64,
    /// Clicks delivered
    pub clicks: u64,
    /// Clicks the host failed to deliver
    pub click_errors: u64,
}

impl StatsSnapshot {
    /// Fraction of frames where the pointer was shown
    pub fn detection_rate(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.hand_frames as f64 / self.frames as f64
        }
    }
}

impl TrackingStats {
    pub(crate) fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hand(&self) {
        self.hand_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_estimation_error(&self) {
        self.estimation_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_click(&self) {
        self.clicks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_click_error(&self) {
        self.click_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames: self.frames.load(Ordering::Relaxed),
            hand_frames: self.hand_frames.load(Ordering::Relaxed),
            estimation_errors: self.estimation_errors.load(Ordering::Relaxed),
            clicks: self.clicks.load(Ordering::Relaxed),
            click_errors: self.click_errors.load(Ordering::Relaxed),
        }
    }
}
