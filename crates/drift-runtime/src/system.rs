//! Runtime system trait

use crate::context::HostContext;
use crate::event::HostEvent;
use drift_core::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// A system that can be ticked by the frame loop
///
/// Systems are updated in registration order. Fixed update runs at a constant
/// rate (simulation ticks), while update runs once per frame (rendering).
pub trait RuntimeSystem {
    /// Called once when the system is registered
    fn initialize(&mut self, ctx: &mut HostContext) -> Result<()>;

    /// Called for every host event, in push order, before the frame's ticks
    fn handle_event(&mut self, _ctx: &mut HostContext, _event: &HostEvent) -> Result<()> {
        Ok(())
    }

    /// Called at a fixed rate (e.g. 60Hz) for deterministic simulation
    fn fixed_update(&mut self, ctx: &mut HostContext, dt: f64) -> Result<()>;

    /// Called once per frame for variable-rate work
    fn update(&mut self, ctx: &mut HostContext, dt: f64) -> Result<()>;

    /// Called when the host is torn down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}

/// A system registered with a [`crate::FrameLoop`] while the host keeps a handle to it.
///
/// The loop owns its systems as trait objects; hosts that need to read a
/// system's state between frames register a `SharedSystem` and keep the `Rc`.
pub struct SharedSystem<T: RuntimeSystem> {
    name: String,
    inner: Rc<RefCell<T>>,
}

impl<T: RuntimeSystem> SharedSystem<T> {
    pub fn new(inner: Rc<RefCell<T>>) -> Self {
        let name = inner.borrow().name().to_string();
        Self { name, inner }
    }
}

impl<T: RuntimeSystem> RuntimeSystem for SharedSystem<T> {
    fn initialize(&mut self, ctx: &mut HostContext) -> Result<()> {
        self.inner.borrow_mut().initialize(ctx)
    }

    fn handle_event(&mut self, ctx: &mut HostContext, event: &HostEvent) -> Result<()> {
        self.inner.borrow_mut().handle_event(ctx, event)
    }

    fn fixed_update(&mut self, ctx: &mut HostContext, dt: f64) -> Result<()> {
        self.inner.borrow_mut().fixed_update(ctx, dt)
    }

    fn update(&mut self, ctx: &mut HostContext, dt: f64) -> Result<()> {
        self.inner.borrow_mut().update(ctx, dt)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.inner.borrow_mut().shutdown()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
