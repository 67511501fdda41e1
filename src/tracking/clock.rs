//! Interval-driven frame clock
//!
//! For hosts without a native per-refresh callback. Ticks at a fixed rate
//! while the page is visible and stops ticking while it is hidden, so a
//! backgrounded page does not keep running inference.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::debug;

use super::FrameClock;

/// Fixed-rate [`FrameClock`] gated on page visibility
pub struct IntervalFrameClock {
    period: Duration,
    interval: Mutex<Option<Interval>>,
    visible: watch::Receiver<bool>,
}

impl IntervalFrameClock {
    /// Create an always-visible clock
    pub fn new(frame_rate: u32) -> Self {
        let (_tx, rx) = watch::channel(true);
        Self::with_visibility(frame_rate, rx)
    }

    /// Create a clock that pauses while `visible` is false
    pub fn with_visibility(frame_rate: u32, visible: watch::Receiver<bool>) -> Self {
        let period = Duration::from_nanos(1_000_000_000 / frame_rate.max(1) as u64);
        debug!("Frame clock period: {:?}", period);

        Self {
            period,
            interval: Mutex::new(None),
            visible,
        }
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl FrameClock for IntervalFrameClock {
    async fn next_frame(&self) {
        let mut visible = self.visible.clone();
        // A dropped sender means nobody reports visibility any more
        let _ = visible.wait_for(|v| *v).await;

        let mut guard = self.interval.lock().await;
        let interval = guard.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        interval.tick().await;
    }
}
