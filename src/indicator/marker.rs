//! Pointer marker state and click flash timer

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::{IndicatorSurface, DEFAULT_FLASH_DURATION_MS, DEFAULT_MARKER_SIZE_PX};
use crate::mapping::PagePoint;

/// Configuration for the pointer marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// How long the click style stays on after a click (ms)
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,

    /// Marker diameter (page pixels)
    #[serde(default = "default_size_px")]
    pub size_px: u32,
}

fn default_flash_duration_ms() -> u64 {
    DEFAULT_FLASH_DURATION_MS
}
fn default_size_px() -> u32 {
    DEFAULT_MARKER_SIZE_PX
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            flash_duration_ms: default_flash_duration_ms(),
            size_px: default_size_px(),
        }
    }
}

impl IndicatorConfig {
    /// Flash duration as a [`Duration`]
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }
}

/// Snapshot of the marker state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorState {
    /// Marker element exists on the surface
    pub attached: bool,
    /// Marker is shown
    pub visible: bool,
    /// Last position shown (meaningless while hidden)
    pub position: Option<PagePoint>,
    /// Click style currently applied
    pub click_flash_active: bool,
}

struct Shared {
    surface: Arc<dyn IndicatorSurface>,
    state: Mutex<IndicatorState>,
    /// Bumped on every flash; a revert only applies if no newer flash exists
    flash_generation: AtomicU64,
    flash_duration: Duration,
}

impl Shared {
    fn revert_flash(&self, generation: u64) {
        if self.flash_generation.load(Ordering::Acquire) != generation {
            trace!("Flash revert superseded (generation {})", generation);
            return;
        }

        let mut state = self.state.lock();
        if state.click_flash_active {
            state.click_flash_active = false;
            self.surface.set_click_style(false);
        }
    }
}

/// Owner of the single pointer marker
///
/// Cheap to clone; clones drive the same marker.
#[derive(Clone)]
pub struct PointerIndicator {
    shared: Arc<Shared>,
}

impl PointerIndicator {
    /// Create an indicator over a host surface
    pub fn new(surface: Arc<dyn IndicatorSurface>, config: &IndicatorConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                surface,
                state: Mutex::new(IndicatorState::default()),
                flash_generation: AtomicU64::new(0),
                flash_duration: config.flash_duration(),
            }),
        }
    }

    /// Create the marker element if it does not exist yet
    ///
    /// Returns `true` if the element was created by this call.
    pub fn attach(&self) -> bool {
        let mut state = self.shared.state.lock();
        Self::ensure_attached(&self.shared, &mut state)
    }

    /// Remove the marker element
    pub fn detach(&self) {
        let mut state = self.shared.state.lock();
        if state.attached {
            self.shared.surface.detach();
            *state = IndicatorState::default();
            debug!("Pointer indicator detached");
        }
    }

    /// Show the marker at a page position
    pub fn show(&self, position: PagePoint) {
        let mut state = self.shared.state.lock();
        Self::ensure_attached(&self.shared, &mut state);

        self.shared.surface.set_position(position);
        if !state.visible {
            self.shared.surface.set_visible(true);
            state.visible = true;
        }
        state.position = Some(position);
    }

    /// Hide the marker
    pub fn hide(&self) {
        let mut state = self.shared.state.lock();
        if state.visible {
            self.shared.surface.set_visible(false);
            state.visible = false;
        }
    }

    /// Apply the click style and schedule its revert
    pub fn flash_click(&self) {
        let generation = self.shared.flash_generation.fetch_add(1, Ordering::AcqRel) + 1;

        {
            let mut state = self.shared.state.lock();
            if !state.click_flash_active {
                self.shared.surface.set_click_style(true);
                state.click_flash_active = true;
            }
        }

        let shared = Arc::clone(&self.shared);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(shared.flash_duration).await;
                    shared.revert_flash(generation);
                });
            }
            Err(_) => {
                warn!("No async runtime for click flash timer, reverting immediately");
                shared.revert_flash(generation);
            }
        }
    }

    /// Whether the marker is currently shown
    pub fn is_visible(&self) -> bool {
        self.shared.state.lock().visible
    }

    /// Current marker state
    pub fn state(&self) -> IndicatorState {
        *self.shared.state.lock()
    }

    fn ensure_attached(shared: &Shared, state: &mut IndicatorState) -> bool {
        if state.attached {
            return false;
        }
        shared.surface.attach();
        state.attached = true;
        debug!("Pointer indicator attached");
        true
    }
}

impl std::fmt::Debug for PointerIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerIndicator")
            .field("state", &self.state())
            .field("flash_duration", &self.shared.flash_duration)
            .finish()
    }
}
