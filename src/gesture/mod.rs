//! Pinch Gesture Recognition
//!
//! A click is signalled by bringing the index and middle fingertips together.
//! Distance is measured in the video's native pixel space so the gesture does
//! not depend on how large the video happens to be rendered on the page.
//!
//! # Click Policies
//!
//! | Policy | Fires | Sustained pinch |
//! |--------|-------|-----------------|
//! | OnPinchStart | released → pinched transition | one click |
//! | EveryFrame | every pinched frame | one click per frame |
//!
//! Recognition itself ([`is_click_gesture`]) is stateless; the policy lives
//! in [`ClickTrigger`], which the tracking loop owns per session.

mod trigger;

pub use trigger::{ClickPolicy, ClickTrigger};

use crate::pose::Keypoint;

/// Default pinch threshold in video pixels
pub const PINCH_THRESHOLD_PX: f64 = 20.0;

/// Check whether two fingertips are close enough to count as a pinch
///
/// True iff the Euclidean distance is strictly below `threshold`.
pub fn is_click_gesture(a: &Keypoint, b: &Keypoint, threshold: f64) -> bool {
    a.distance_to(b) < threshold
}
