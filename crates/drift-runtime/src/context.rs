//! Explicit host state shared with systems

use crate::event_bus::EventBus;
use crate::frame_stats::FrameStats;
use crate::pointer::PointerState;

/// State owned by the host and handed to every system each frame.
///
/// Pointer position and frame statistics live here instead of in globals;
/// hosts update them through the event bus or the frame loop.
#[derive(Default)]
pub struct HostContext {
    pub pointer: PointerState,
    pub stats: FrameStats,
    pub events: EventBus,
}

impl HostContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose pointer trails the raw position by `factor` per frame
    pub fn with_pointer_smoothing(factor: f32) -> Self {
        Self {
            pointer: PointerState::with_smoothing(factor),
            ..Self::default()
        }
    }
}
