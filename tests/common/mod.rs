//! Test doubles for driving full tracking sessions

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

use hand_pointer::indicator::IndicatorSurface;
use hand_pointer::mapping::{PagePoint, RenderRect, VideoGeometry, VideoSource};
use hand_pointer::pose::{DetectorConfig, EstimationError, HandPose, Keypoint, KeypointId, PoseEstimator};
use hand_pointer::provision::{self, InferenceRuntime, ProvisionError};
use hand_pointer::tracking::{
    ClickError, ClickSink, FrameClock, SessionConfig, SessionHost, TrackingSession,
};

/// Frame clock that only advances when the test ticks it
pub struct ManualFrameClock {
    permits: Semaphore,
}

impl Default for ManualFrameClock {
    fn default() -> Self {
        Self {
            permits: Semaphore::new(0),
        }
    }
}

impl ManualFrameClock {
    pub fn tick(&self, frames: usize) {
        self.permits.add_permits(frames);
    }
}

#[async_trait]
impl FrameClock for ManualFrameClock {
    async fn next_frame(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

/// Holds one estimation open until released
#[derive(Default)]
pub struct EstimationGate {
    pub entered: Notify,
    pub release: Notify,
}

/// Estimator replaying queued frames, then reporting no hands
#[derive(Default)]
pub struct ScriptedEstimator {
    frames: Mutex<VecDeque<Vec<HandPose>>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<EstimationGate>>>,
}

impl ScriptedEstimator {
    pub fn push(&self, hands: Vec<HandPose>) {
        self.frames.lock().push_back(hands);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Block the next estimation on a gate
    pub fn gate_next(&self) -> Arc<EstimationGate> {
        let gate = Arc::new(EstimationGate::default());
        *self.gate.lock() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl PoseEstimator for ScriptedEstimator {
    async fn estimate_hands(
        &self,
        _source: &dyn VideoSource,
    ) -> Result<Vec<HandPose>, EstimationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        Ok(self.frames.lock().pop_front().unwrap_or_default())
    }
}

/// Runtime whose first `failures` loads fail
pub struct FakeRuntime {
    estimator: Arc<ScriptedEstimator>,
    failures: AtomicU32,
    present: AtomicBool,
    pub injections: AtomicU32,
    pub detectors_created: AtomicU32,
}

impl FakeRuntime {
    pub fn new(estimator: Arc<ScriptedEstimator>, failures: u32) -> Self {
        Self {
            estimator,
            failures: AtomicU32::new(failures),
            present: AtomicBool::new(false),
            injections: AtomicU32::new(0),
            detectors_created: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl InferenceRuntime for FakeRuntime {
    fn runtime_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    async fn inject_runtime(&self) -> provision::Result<()> {
        self.injections.fetch_add(1, Ordering::SeqCst);
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ProvisionError::RuntimeInjection("script error".into()));
        }
        self.present.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn initialize(&self) -> provision::Result<()> {
        Ok(())
    }

    fn detector_available(&self) -> bool {
        true
    }

    async fn load_detector_library(&self) -> provision::Result<()> {
        Ok(())
    }

    async fn create_detector(
        &self,
        _config: &DetectorConfig,
    ) -> provision::Result<Arc<dyn PoseEstimator>> {
        self.detectors_created.fetch_add(1, Ordering::SeqCst);
        Ok(self.estimator.clone())
    }
}

/// Marker surface recording what was done to it
#[derive(Default)]
pub struct RecordingSurface {
    pub attaches: AtomicU32,
    visible: AtomicBool,
    positions: Mutex<Vec<PagePoint>>,
}

impl RecordingSurface {
    pub fn visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn positions(&self) -> Vec<PagePoint> {
        self.positions.lock().clone()
    }
}

impl IndicatorSurface for RecordingSurface {
    fn attach(&self) {
        self.attaches.fetch_add(1, Ordering::SeqCst);
    }

    fn detach(&self) {}

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    fn set_position(&self, position: PagePoint) {
        self.positions.lock().push(position);
    }

    fn set_click_style(&self, _active: bool) {}
}

#[derive(Default)]
pub struct RecordingClicks {
    clicks: Mutex<Vec<PagePoint>>,
}

impl RecordingClicks {
    pub fn clicks(&self) -> Vec<PagePoint> {
        self.clicks.lock().clone()
    }
}

#[async_trait]
impl ClickSink for RecordingClicks {
    async fn click_at(&self, position: PagePoint) -> Result<(), ClickError> {
        self.clicks.lock().push(position);
        Ok(())
    }
}

pub struct FixedVideo(pub VideoGeometry);

impl VideoSource for FixedVideo {
    fn geometry(&self) -> VideoGeometry {
        self.0
    }
}

/// 640x480 video drawn at (100, 50) without scaling
pub fn test_geometry() -> VideoGeometry {
    VideoGeometry::new(640, 480, RenderRect::new(100.0, 50.0, 640.0, 480.0))
}

pub fn hand(index: (f64, f64), middle: (f64, f64)) -> HandPose {
    HandPose::new(vec![
        Keypoint::named(KeypointId::IndexFingerTip, index.0, index.1),
        Keypoint::named(KeypointId::MiddleFingerTip, middle.0, middle.1),
    ])
}

pub fn pinched_hand() -> HandPose {
    hand((200.0, 200.0), (205.0, 200.0))
}

pub fn open_hand() -> HandPose {
    hand((200.0, 200.0), (260.0, 200.0))
}

/// A session wired to recording doubles
pub struct Harness {
    pub session: TrackingSession,
    pub clock: Arc<ManualFrameClock>,
    pub estimator: Arc<ScriptedEstimator>,
    pub runtime: Arc<FakeRuntime>,
    pub surface: Arc<RecordingSurface>,
    pub clicks: Arc<RecordingClicks>,
}

impl Harness {
    pub fn new(runtime_failures: u32, configure: impl FnOnce(&mut SessionConfig)) -> Self {
        let clock = Arc::new(ManualFrameClock::default());
        let estimator = Arc::new(ScriptedEstimator::default());
        let runtime = Arc::new(FakeRuntime::new(estimator.clone(), runtime_failures));
        let surface = Arc::new(RecordingSurface::default());
        let clicks = Arc::new(RecordingClicks::default());

        let mut config = SessionConfig::default();
        config.tracking.mirror = false;
        configure(&mut config);

        let host = SessionHost {
            runtime: runtime.clone(),
            video: Arc::new(FixedVideo(test_geometry())),
            surface: surface.clone(),
            clicks: clicks.clone(),
            clock: clock.clone(),
        };

        Self {
            session: TrackingSession::new(host, config),
            clock,
            estimator,
            runtime,
            surface,
            clicks,
        }
    }

    /// Tick `frames` frames and wait until the loop has processed them
    pub async fn run_frames(&self, frames: usize) {
        let target = self.estimator.calls() + frames;
        self.clock.tick(frames);
        while self.estimator.calls() < target {
            tokio::task::yield_now().await;
        }
        self.settle().await;
    }

    /// Give spawned tasks a chance to run
    pub async fn settle(&self) {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }
}
