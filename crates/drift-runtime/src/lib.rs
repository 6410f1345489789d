//! Drift Runtime - Host frame loop infrastructure
//!
//! Provides the pieces a host UI uses to drive particle fields:
//! - `GameClock`: fixed-timestep accumulator so physics ticks at a steady rate
//! - `PointerState`: latest pointer position with optional smoothing
//! - `FrameStats`: frame-rate tracking and the reduced-motion flag
//! - `HostEvent` / `EventBus`: ordered lifecycle and pointer events
//! - `HostContext`: explicit state handed to every system
//! - `RuntimeSystem` / `FrameLoop`: systems ticked by an external scheduler
//! - `SharedSystem`: registers a system while the host keeps a handle to it

mod clock;
mod context;
mod event;
mod event_bus;
mod frame_loop;
mod frame_stats;
mod pointer;
mod system;

pub use clock::GameClock;
pub use context::HostContext;
pub use event::HostEvent;
pub use event_bus::EventBus;
pub use frame_loop::FrameLoop;
pub use frame_stats::FrameStats;
pub use pointer::PointerState;
pub use system::{RuntimeSystem, SharedSystem};
