//! Hand Pose Model Provisioning
//!
//! Makes sure a hand pose detector is loaded before tracking begins. Loading
//! happens in two independently failing stages: the inference runtime, then
//! the detector library built on top of it.
//!
//! # Sequence
//!
//! ```text
//! ensure_ready()
//!   ├─> cached detector? ──────────────────────────> true
//!   ├─> runtime present?
//!   │     └─ no: inject (max_attempts, retry_backoff between failures)
//!   ├─> initialize runtime (ready handshake)
//!   ├─> detector library present?
//!   │     └─ no: load, then settle_delay
//!   ├─> detector still unavailable? ───────────────> false
//!   └─> create detector (model, lite, 1 hand, backend), cache ──> true
//! ```
//!
//! The runtime is an injected [`InferenceRuntime`] capability rather than
//! ambient global state, so tests substitute a double and hosts decide how
//! scripts or shared libraries are actually loaded.

mod provisioner;

pub use provisioner::{ModelProvisioner, ProvisioningConfig};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::pose::{DetectorConfig, PoseEstimator};

/// Default number of runtime load attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between failed runtime load attempts (ms)
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// Default delay after the detector library reports loaded (ms)
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

/// Result type for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Provisioning error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProvisionError {
    /// A single runtime load attempt failed
    #[error("Inference runtime injection failed: {0}")]
    RuntimeInjection(String),

    /// Every runtime load attempt failed
    #[error("Inference runtime unavailable after {attempts} attempts")]
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
    },

    /// The runtime loaded but its ready handshake failed
    #[error("Inference runtime initialization failed: {0}")]
    Initialization(String),

    /// The detector library failed to load
    #[error("Hand pose detector library failed to load: {0}")]
    DetectorLoad(String),

    /// The detector library is still missing after loading
    #[error("Hand pose detector unavailable after loading")]
    DetectorUnavailable,

    /// The detector constructor failed
    #[error("Hand pose detector creation failed: {0}")]
    DetectorCreation(String),
}

/// Loader for the inference runtime and hand pose detector
///
/// Each async method resolves once the corresponding load or error signal
/// has been observed.
#[async_trait]
pub trait InferenceRuntime: Send + Sync {
    /// Whether the inference runtime is already loaded
    fn runtime_present(&self) -> bool;

    /// Load the inference runtime
    async fn inject_runtime(&self) -> Result<()>;

    /// Ready handshake required before any model is constructed
    async fn initialize(&self) -> Result<()>;

    /// Whether the detector library is loaded and its constructor usable
    fn detector_available(&self) -> bool;

    /// Load the detector library
    async fn load_detector_library(&self) -> Result<()>;

    /// Construct a detector
    async fn create_detector(&self, config: &DetectorConfig) -> Result<Arc<dyn PoseEstimator>>;
}
