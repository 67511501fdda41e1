//! Tracking session lifecycle and per-frame step

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, trace, warn, Instrument};
use uuid::Uuid;

use super::stats::{StatsSnapshot, TrackingStats};
use super::{ClickSink, FrameClock, TrackingConfig, TrackingError};
use crate::gesture::{is_click_gesture, ClickPolicy, ClickTrigger};
use crate::indicator::{IndicatorConfig, IndicatorSurface, PointerIndicator};
use crate::mapping::{map_to_page, PagePoint, VideoSource};
use crate::pose::{KeypointId, PoseEstimator};
use crate::provision::{InferenceRuntime, ModelProvisioner, ProvisioningConfig};

/// Settings the host may change while tracking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSettings {
    /// Mirror the video horizontally
    pub mirror: bool,
    /// When a held pinch produces clicks
    pub click_policy: ClickPolicy,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        TrackingConfig::default().settings()
    }
}

/// Configuration for one session
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Tracking loop configuration
    pub tracking: TrackingConfig,
    /// Model provisioning configuration
    pub provisioning: ProvisioningConfig,
    /// Pointer marker configuration
    pub indicator: IndicatorConfig,
}

/// Host capabilities a session drives
#[derive(Clone)]
pub struct SessionHost {
    /// Inference runtime loader
    pub runtime: Arc<dyn InferenceRuntime>,
    /// Camera frame source
    pub video: Arc<dyn VideoSource>,
    /// Pointer marker rendering
    pub surface: Arc<dyn IndicatorSurface>,
    /// Click delivery
    pub clicks: Arc<dyn ClickSink>,
    /// Display refresh signal
    pub clock: Arc<dyn FrameClock>,
}

/// Result of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Estimator failed; nothing was updated
    Skipped,
    /// Session stopped while the frame was in flight; result dropped
    Discarded,
    /// No hand in the frame
    NoHand,
    /// A hand without a resolvable index fingertip
    NoFingertip,
    /// The video has no usable dimensions yet
    VideoNotReady,
    /// Pointer shown at `position`
    Pointer {
        /// Mapped page position of the index fingertip
        position: PagePoint,
        /// Whether a click was fired this frame
        clicked: bool,
    },
}

enum Lifecycle {
    Idle,
    Starting { generation: u64 },
    Tracking { cancel: CancellationToken },
}

struct SessionInner {
    id: Uuid,
    provisioner: ModelProvisioner,
    indicator: PointerIndicator,
    video: Arc<dyn VideoSource>,
    clicks: Arc<dyn ClickSink>,
    clock: Arc<dyn FrameClock>,
    pinch_threshold: f64,
    settings: RwLock<TrackingSettings>,
    trigger: Mutex<ClickTrigger>,
    lifecycle: Mutex<Lifecycle>,
    generation: AtomicU64,
    last_pointer: Mutex<Option<PagePoint>>,
    stats: TrackingStats,
}

/// One hand-controlled page
///
/// Cheap to clone; clones control the same session.
#[derive(Clone)]
pub struct TrackingSession {
    inner: Arc<SessionInner>,
}

impl TrackingSession {
    /// Create an idle session
    pub fn new(host: SessionHost, config: SessionConfig) -> Self {
        let settings = config.tracking.settings();
        let id = Uuid::new_v4();

        debug!(
            "Creating tracking session {}: mirror={}, click_policy={}, pinch_threshold={}px",
            id, settings.mirror, settings.click_policy, config.tracking.pinch_threshold_px
        );

        Self {
            inner: Arc::new(SessionInner {
                id,
                provisioner: ModelProvisioner::new(host.runtime, config.provisioning),
                indicator: PointerIndicator::new(host.surface, &config.indicator),
                video: host.video,
                clicks: host.clicks,
                clock: host.clock,
                pinch_threshold: config.tracking.pinch_threshold_px,
                settings: RwLock::new(settings),
                trigger: Mutex::new(ClickTrigger::new(settings.click_policy)),
                lifecycle: Mutex::new(Lifecycle::Idle),
                generation: AtomicU64::new(0),
                last_pointer: Mutex::new(None),
                stats: TrackingStats::default(),
            }),
        }
    }

    /// Start tracking
    ///
    /// Attaches the pointer marker, provisions the model and spawns the
    /// frame loop. Calling this while already tracking (or starting) is a
    /// no-op. Provisioning failure leaves the session idle so the caller can
    /// retry later.
    pub async fn start(&self) -> Result<(), TrackingError> {
        let generation = {
            let mut lifecycle = self.inner.lifecycle.lock();
            if !matches!(*lifecycle, Lifecycle::Idle) {
                debug!("Session {} already tracking, start ignored", self.inner.id);
                return Ok(());
            }
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *lifecycle = Lifecycle::Starting { generation };
            generation
        };

        info!("Starting hand tracking session {}", self.inner.id);
        self.inner.indicator.attach();

        let provisioned = self.inner.provisioner.provision().await;
        let load_attempts = self.inner.provisioner.load_attempts();

        let mut lifecycle = self.inner.lifecycle.lock();
        // A stop(), possibly followed by another start(), superseded this call
        let current = matches!(*lifecycle, Lifecycle::Starting { generation: g } if g == generation);
        if !current {
            info!("Session {} stopped during startup", self.inner.id);
            return Err(TrackingError::StoppedDuringStartup);
        }

        let detector = match provisioned {
            Ok(detector) => detector,
            Err(source) => {
                *lifecycle = Lifecycle::Idle;
                error!(
                    "Hand tracking not started: model unavailable ({} failed load attempts): {}",
                    load_attempts, source
                );
                return Err(TrackingError::ModelUnavailable {
                    load_attempts,
                    source,
                });
            }
        };

        let cancel = CancellationToken::new();
        let span = info_span!("tracking_session", id = %self.inner.id);
        tokio::spawn(
            run_loop(Arc::clone(&self.inner), detector, cancel.clone()).instrument(span),
        );
        *lifecycle = Lifecycle::Tracking { cancel };

        info!("Hand tracking started");
        Ok(())
    }

    /// Stop tracking and hide the pointer
    ///
    /// The cached detector is kept so a later `start()` is quick.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.inner.lifecycle.lock(), Lifecycle::Idle);

        match previous {
            Lifecycle::Tracking { cancel } => {
                cancel.cancel();
                info!("Hand tracking stopped");
            }
            Lifecycle::Starting { .. } => info!("Hand tracking start cancelled"),
            Lifecycle::Idle => debug!("Session {} not tracking, stop ignored", self.inner.id),
        }

        self.inner.trigger.lock().reset();
        self.inner.indicator.hide();
    }

    /// Apply new host settings
    pub fn update_settings(&self, settings: TrackingSettings) {
        let previous = std::mem::replace(&mut *self.inner.settings.write(), settings);
        if previous != settings {
            info!(
                "Tracking settings updated: mirror={}, click_policy={}",
                settings.mirror, settings.click_policy
            );
        }
        self.inner.trigger.lock().set_policy(settings.click_policy);
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Whether the frame loop is running
    pub fn is_tracking(&self) -> bool {
        matches!(*self.inner.lifecycle.lock(), Lifecycle::Tracking { .. })
    }

    /// Whether a detector is loaded
    pub fn model_ready(&self) -> bool {
        self.inner.provisioner.model_ready()
    }

    /// Failed runtime load attempts in the last provisioning sequence
    pub fn load_attempts(&self) -> u32 {
        self.inner.provisioner.load_attempts()
    }

    /// Last page position the pointer was shown at
    pub fn last_pointer(&self) -> Option<PagePoint> {
        *self.inner.last_pointer.lock()
    }

    /// Current settings
    pub fn settings(&self) -> TrackingSettings {
        *self.inner.settings.read()
    }

    /// Pointer marker
    pub fn indicator(&self) -> &PointerIndicator {
        &self.inner.indicator
    }

    /// Statistics snapshot
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }
}

impl std::fmt::Debug for TrackingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingSession")
            .field("id", &self.inner.id)
            .field("tracking", &self.is_tracking())
            .field("provisioner", &self.inner.provisioner)
            .field("settings", &self.settings())
            .finish()
    }
}

async fn run_loop(
    inner: Arc<SessionInner>,
    detector: Arc<dyn PoseEstimator>,
    cancel: CancellationToken,
) {
    debug!("Tracking loop running");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = inner.clock.next_frame() => {}
        }

        if cancel.is_cancelled() {
            break;
        }

        let outcome = inner.step(detector.as_ref(), &cancel).await;
        trace!("Frame outcome: {:?}", outcome);
    }

    let stats = inner.stats.snapshot();
    debug!(
        "Tracking loop exited: {} frames, {} with hand, {} clicks",
        stats.frames, stats.hand_frames, stats.clicks
    );
}

impl SessionInner {
    async fn step(&self, detector: &dyn PoseEstimator, cancel: &CancellationToken) -> FrameOutcome {
        self.stats.record_frame();

        let hands = match detector.estimate_hands(self.video.as_ref()).await {
            Ok(hands) => hands,
            Err(e) => {
                self.stats.record_estimation_error();
                warn!("Skipping frame: {}", e);
                return FrameOutcome::Skipped;
            }
        };

        if cancel.is_cancelled() {
            debug!("Discarding frame that finished after stop");
            return FrameOutcome::Discarded;
        }

        let Some(hand) = hands.first() else {
            self.lose_hand();
            return FrameOutcome::NoHand;
        };

        let Some(index_tip) = hand.keypoint(KeypointId::IndexFingerTip) else {
            self.lose_hand();
            return FrameOutcome::NoFingertip;
        };

        let settings = *self.settings.read();
        let geometry = self.video.geometry();
        let position = match map_to_page(index_tip.x, index_tip.y, &geometry, settings.mirror) {
            Ok(position) => position,
            Err(e) => {
                trace!("Pointer unavailable: {}", e);
                self.lose_hand();
                return FrameOutcome::VideoNotReady;
            }
        };

        self.indicator.show(position);
        if cancel.is_cancelled() {
            // stop() raced with show(); keep the pointer hidden
            self.indicator.hide();
            return FrameOutcome::Discarded;
        }
        *self.last_pointer.lock() = Some(position);
        self.stats.record_hand();

        let pinched = hand
            .keypoint(KeypointId::MiddleFingerTip)
            .is_some_and(|middle| is_click_gesture(index_tip, middle, self.pinch_threshold));
        let fire = self.trigger.lock().update(pinched);

        if fire {
            debug!("Pinch click at {}", position);
            match self.clicks.click_at(position).await {
                Ok(()) => self.stats.record_click(),
                Err(e) => {
                    self.stats.record_click_error();
                    warn!("Click at {} not delivered: {}", position, e);
                }
            }
            self.indicator.flash_click();
        }

        FrameOutcome::Pointer {
            position,
            clicked: fire,
        }
    }

    fn lose_hand(&self) {
        self.trigger.lock().reset();
        self.indicator.hide();
    }
}
