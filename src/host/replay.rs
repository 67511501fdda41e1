//! Recorded pose trace replay
//!
//! A trace is a JSON Lines file: each line is one frame, holding the JSON
//! array of hands the detector reported for that frame (`[]` for an empty
//! frame). Blank lines are skipped.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::mapping::VideoSource;
use crate::pose::{DetectorConfig, EstimationError, HandPose, PoseEstimator};
use crate::provision::{self, InferenceRuntime, ProvisionError};

/// Trace loading error
#[derive(Error, Debug)]
pub enum TraceError {
    /// The trace file could not be read
    #[error("Failed to read pose trace {path}: {source}")]
    Io {
        /// Trace path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A line is not a JSON array of hand poses
    #[error("Invalid pose trace at line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a trace from its text
pub fn parse_trace(content: &str) -> Result<Vec<Vec<HandPose>>, TraceError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| TraceError::Parse {
                line: i + 1,
                source,
            })
        })
        .collect()
}

/// Read and parse a trace file
pub fn load_trace(path: &Path) -> Result<Vec<Vec<HandPose>>, TraceError> {
    let content = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let frames = parse_trace(&content)?;
    info!("Loaded {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

/// [`PoseEstimator`] that replays recorded frames in order
///
/// After the last frame it keeps reporting no hands and flags itself as
/// drained.
pub struct ReplayEstimator {
    frames: Mutex<VecDeque<Vec<HandPose>>>,
    drained: watch::Sender<bool>,
}

impl ReplayEstimator {
    /// Create an estimator over recorded frames
    pub fn new(frames: Vec<Vec<HandPose>>) -> Self {
        let (drained, _) = watch::channel(frames.is_empty());
        Self {
            frames: Mutex::new(frames.into()),
            drained,
        }
    }

    /// Frames not yet replayed
    pub fn remaining(&self) -> usize {
        self.frames.lock().len()
    }

    /// Resolve once every recorded frame has been handed out
    pub async fn wait_drained(&self) {
        let mut rx = self.drained.subscribe();
        // The sender lives in self, so this cannot observe a closed channel
        let _ = rx.wait_for(|drained| *drained).await;
    }
}

#[async_trait]
impl PoseEstimator for ReplayEstimator {
    async fn estimate_hands(
        &self,
        source: &dyn VideoSource,
    ) -> Result<Vec<HandPose>, EstimationError> {
        if !source.geometry().is_ready() {
            return Err(EstimationError::SourceUnavailable(
                "video has no dimensions".to_string(),
            ));
        }

        let mut frames = self.frames.lock();
        let frame = frames.pop_front().unwrap_or_default();
        if frames.is_empty() {
            self.drained.send_if_modified(|drained| !std::mem::replace(drained, true));
        }
        Ok(frame)
    }
}

/// [`InferenceRuntime`] serving a [`ReplayEstimator`]
///
/// `failing_injections` makes the first N runtime loads fail, which exercises
/// the provisioner's retry path.
pub struct ReplayRuntime {
    estimator: Arc<ReplayEstimator>,
    failing_injections: AtomicU32,
    runtime_loaded: AtomicBool,
    detector_loaded: AtomicBool,
}

impl ReplayRuntime {
    /// Create a runtime around a replay estimator
    pub fn new(estimator: Arc<ReplayEstimator>, failing_injections: u32) -> Self {
        Self {
            estimator,
            failing_injections: AtomicU32::new(failing_injections),
            runtime_loaded: AtomicBool::new(false),
            detector_loaded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl InferenceRuntime for ReplayRuntime {
    fn runtime_present(&self) -> bool {
        self.runtime_loaded.load(Ordering::SeqCst)
    }

    async fn inject_runtime(&self) -> provision::Result<()> {
        let failing = self
            .failing_injections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            warn!("Simulated runtime load failure");
            return Err(ProvisionError::RuntimeInjection(
                "simulated load failure".to_string(),
            ));
        }

        self.runtime_loaded.store(true, Ordering::SeqCst);
        debug!("Replay runtime loaded");
        Ok(())
    }

    async fn initialize(&self) -> provision::Result<()> {
        Ok(())
    }

    fn detector_available(&self) -> bool {
        self.detector_loaded.load(Ordering::SeqCst)
    }

    async fn load_detector_library(&self) -> provision::Result<()> {
        self.detector_loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_detector(
        &self,
        config: &DetectorConfig,
    ) -> provision::Result<Arc<dyn PoseEstimator>> {
        debug!(
            "Creating replay detector ({:?} {:?} on {})",
            config.model, config.model_type, config.runtime
        );
        Ok(self.estimator.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{RenderRect, VideoGeometry};
    use crate::pose::KeypointId;
    use std::io::Write;

    struct Video(VideoGeometry);

    impl VideoSource for Video {
        fn geometry(&self) -> VideoGeometry {
            self.0
        }
    }

    fn ready_video() -> Video {
        Video(VideoGeometry::new(
            640,
            480,
            RenderRect::new(0.0, 0.0, 640.0, 480.0),
        ))
    }

    const TRACE: &str = r#"[{"keypoints":[{"x":1.0,"y":2.0,"name":"index_finger_tip"}]}]

[]
"#;

    #[test]
    fn test_parse_trace() {
        let frames = parse_trace(TRACE).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), 1);
        assert_eq!(
            frames[0][0].keypoint(KeypointId::IndexFingerTip).map(|k| k.y),
            Some(2.0)
        );
        assert!(frames[1].is_empty());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_trace("[]\n\n{not json}\n").unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_load_trace_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TRACE.as_bytes()).unwrap();
        assert_eq!(load_trace(file.path()).unwrap().len(), 2);

        let err = load_trace(Path::new("/nonexistent/trace.jsonl")).unwrap_err();
        assert!(matches!(err, TraceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_replay_drains_then_reports_no_hands() {
        let estimator = ReplayEstimator::new(parse_trace(TRACE).unwrap());
        let video = ready_video();

        assert_eq!(estimator.estimate_hands(&video).await.unwrap().len(), 1);
        assert_eq!(estimator.remaining(), 1);
        assert!(estimator.estimate_hands(&video).await.unwrap().is_empty());

        // Already drained, resolves immediately
        estimator.wait_drained().await;
        assert!(estimator.estimate_hands(&video).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replay_needs_video() {
        let estimator = ReplayEstimator::new(Vec::new());
        let video = Video(VideoGeometry::default());
        assert!(matches!(
            estimator.estimate_hands(&video).await,
            Err(EstimationError::SourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_runtime_simulated_failures() {
        let runtime = ReplayRuntime::new(Arc::new(ReplayEstimator::new(Vec::new())), 2);

        assert!(runtime.inject_runtime().await.is_err());
        assert!(runtime.inject_runtime().await.is_err());
        assert!(!runtime.runtime_present());
        runtime.inject_runtime().await.unwrap();
        assert!(runtime.runtime_present());

        assert!(!runtime.detector_available());
        runtime.load_detector_library().await.unwrap();
        assert!(runtime.detector_available());
    }
}
