//! # hand-pointer
//!
//! Hand-gesture pointer control: a camera-tracked index fingertip drives an
//! on-page pointer marker, and pinching the index and middle fingertips
//! together clicks whatever lies under the marker.
//!
//! # Architecture
//!
//! ```text
//! TrackingSession
//!   ├─> ModelProvisioner (runtime load + retry, detector cache)
//!   ├─> tracking loop (one task per started session)
//!   │     ├─> PoseEstimator (hands in the current frame)
//!   │     ├─> map_to_page (video pixels → page pixels, mirroring)
//!   │     ├─> is_click_gesture + ClickTrigger (pinch → click)
//!   │     └─> ClickSink (host click delivery)
//!   └─> PointerIndicator (marker visibility, position, click flash)
//! ```
//!
//! # Host Capabilities
//!
//! Everything the session needs from its environment is injected through
//! traits: [`provision::InferenceRuntime`], [`pose::PoseEstimator`],
//! [`mapping::VideoSource`], [`indicator::IndicatorSurface`],
//! [`tracking::ClickSink`] and [`tracking::FrameClock`]. The [`host`] module
//! provides trace-replay and log-backed implementations used by the
//! `hand-pointer` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Configuration loading and validation
pub mod config;

/// Pinch gesture recognition and click triggering
pub mod gesture;

/// Trace replay and log-backed host adapters
pub mod host;

/// Pointer marker feedback
pub mod indicator;

/// Video to page coordinate mapping
pub mod mapping;

/// Hand pose types and the estimator capability
pub mod pose;

/// Inference runtime and detector provisioning
pub mod provision;

/// Tracking sessions and the per-frame loop
pub mod tracking;

/// Utility functions
pub mod utils;
