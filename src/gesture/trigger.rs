//! Click trigger policy

use serde::{Deserialize, Serialize};
use tracing::debug;

/// When a held pinch produces clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClickPolicy {
    /// Click once when the pinch closes
    #[default]
    OnPinchStart,

    /// Click on every frame the pinch is held
    EveryFrame,
}

impl std::fmt::Display for ClickPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnPinchStart => write!(f, "on_pinch_start"),
            Self::EveryFrame => write!(f, "every_frame"),
        }
    }
}

impl std::str::FromStr for ClickPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on_pinch_start" | "edge" | "once" => Ok(Self::OnPinchStart),
            "every_frame" | "repeat" | "level" => Ok(Self::EveryFrame),
            _ => Err(format!("Unknown click policy: {}", s)),
        }
    }
}

/// Turns per-frame pinch observations into click decisions
#[derive(Debug, Clone)]
pub struct ClickTrigger {
    policy: ClickPolicy,
    pinched: bool,
}

impl ClickTrigger {
    /// Create a trigger in the released state
    pub fn new(policy: ClickPolicy) -> Self {
        Self {
            policy,
            pinched: false,
        }
    }

    /// Feed one frame's pinch state, returning whether to click
    pub fn update(&mut self, pinched: bool) -> bool {
        let was_pinched = self.pinched;
        self.pinched = pinched;

        match self.policy {
            ClickPolicy::EveryFrame => pinched,
            ClickPolicy::OnPinchStart => pinched && !was_pinched,
        }
    }

    /// Forget the pinch state (hand lost)
    pub fn reset(&mut self) {
        self.pinched = false;
    }

    /// Whether the last observed frame was pinched
    pub fn is_pinched(&self) -> bool {
        self.pinched
    }

    /// Active policy
    pub fn policy(&self) -> ClickPolicy {
        self.policy
    }

    /// Change policy, keeping the current pinch state
    pub fn set_policy(&mut self, policy: ClickPolicy) {
        if policy != self.policy {
            debug!("Click policy changed: {} -> {}", self.policy, policy);
            self.policy = policy;
        }
    }
}

impl Default for ClickTrigger {
    fn default() -> Self {
        Self::new(ClickPolicy::default())
    }
}
