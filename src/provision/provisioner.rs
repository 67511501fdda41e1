//! Bounded-retry model provisioner

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::{
    InferenceRuntime, ProvisionError, Result, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS,
    DEFAULT_SETTLE_DELAY_MS,
};
use crate::pose::{DetectorConfig, PoseEstimator};

/// Provisioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Maximum runtime load attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between failed runtime load attempts (ms)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Delay after the detector library loads, for late initialization (ms)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Detector construction parameters
    #[serde(default)]
    pub detector: DetectorConfig,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}
fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            detector: DetectorConfig::default(),
        }
    }
}

/// Loads and caches the hand pose detector
pub struct ModelProvisioner {
    runtime: Arc<dyn InferenceRuntime>,
    config: ProvisioningConfig,

    /// Cached detector, kept for the provisioner's lifetime
    detector: RwLock<Option<Arc<dyn PoseEstimator>>>,

    /// Failed runtime load attempts in the current sequence
    load_attempts: AtomicU32,

    /// Serializes provisioning sequences
    provisioning: Mutex<()>,
}

impl ModelProvisioner {
    /// Create a provisioner over a runtime loader
    pub fn new(runtime: Arc<dyn InferenceRuntime>, config: ProvisioningConfig) -> Self {
        Self {
            runtime,
            config,
            detector: RwLock::new(None),
            load_attempts: AtomicU32::new(0),
            provisioning: Mutex::new(()),
        }
    }

    /// Make sure a detector is loaded
    ///
    /// Returns `true` immediately, without side effects, if a detector is
    /// already cached. Failures are logged and reported as `false`.
    pub async fn ensure_ready(&self) -> bool {
        if self.model_ready() {
            return true;
        }

        match self.provision().await {
            Ok(_) => true,
            Err(e) => {
                error!("Hand pose model provisioning failed: {}", e);
                false
            }
        }
    }

    /// Load the detector, returning it or the reason it is unavailable
    pub async fn provision(&self) -> Result<Arc<dyn PoseEstimator>> {
        if let Some(detector) = self.detector() {
            return Ok(detector);
        }

        let _guard = self.provisioning.lock().await;

        // Another caller may have finished while we waited
        if let Some(detector) = self.detector() {
            return Ok(detector);
        }

        self.load_attempts.store(0, Ordering::Release);

        self.load_runtime().await?;

        self.runtime.initialize().await?;
        debug!("Inference runtime initialized");

        if !self.runtime.detector_available() {
            self.runtime.load_detector_library().await?;
            debug!(
                "Detector library loaded, settling for {}ms",
                self.config.settle_delay_ms
            );
            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        }

        if !self.runtime.detector_available() {
            return Err(ProvisionError::DetectorUnavailable);
        }

        let detector_config = &self.config.detector;
        let detector = self.runtime.create_detector(detector_config).await?;

        info!(
            "Hand pose detector ready: model={:?}, variant={:?}, max_hands={}, runtime={}",
            detector_config.model,
            detector_config.model_type,
            detector_config.max_hands,
            detector_config.runtime
        );

        *self.detector.write() = Some(Arc::clone(&detector));
        Ok(detector)
    }

    async fn load_runtime(&self) -> Result<()> {
        let max_attempts = self.config.max_attempts;

        loop {
            if self.runtime.runtime_present() {
                return Ok(());
            }

            let outcome = match self.runtime.inject_runtime().await {
                Ok(()) if self.runtime.runtime_present() => Ok(()),
                Ok(()) => Err(ProvisionError::RuntimeInjection(
                    "runtime reported loaded but is not present".to_string(),
                )),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => {
                    debug!("Inference runtime loaded");
                    return Ok(());
                }
                Err(e) => {
                    let attempts = self.load_attempts.fetch_add(1, Ordering::AcqRel) + 1;
                    warn!(
                        "Runtime load attempt {}/{} failed: {}",
                        attempts, max_attempts, e
                    );

                    if attempts >= max_attempts {
                        return Err(ProvisionError::RetriesExhausted { attempts });
                    }

                    tokio::time::sleep(Duration::from_millis(self.config.retry_backoff_ms)).await;
                }
            }
        }
    }

    /// Whether a detector is cached
    pub fn model_ready(&self) -> bool {
        self.detector.read().is_some()
    }

    /// Cached detector, if any
    pub fn detector(&self) -> Option<Arc<dyn PoseEstimator>> {
        self.detector.read().clone()
    }

    /// Failed runtime load attempts in the current or last sequence
    pub fn load_attempts(&self) -> u32 {
        self.load_attempts.load(Ordering::Acquire)
    }

    /// Provisioning configuration
    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }
}

impl std::fmt::Debug for ModelProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelProvisioner")
            .field("model_ready", &self.model_ready())
            .field("load_attempts", &self.load_attempts())
            .field("config", &self.config)
            .finish()
    }
}
