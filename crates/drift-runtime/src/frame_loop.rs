//! Host-owned frame loop

use crate::clock::GameClock;
use crate::context::HostContext;
use crate::event::HostEvent;
use crate::system::RuntimeSystem;
use drift_core::Result;

/// Drives registered systems once per display frame.
///
/// The host decides the cadence (a vsync callback, a timer, a headless loop)
/// and calls [`FrameLoop::frame`] or [`FrameLoop::frame_now`]. Each frame:
/// pending host events are applied in order, then every system gets as many
/// fixed ticks as the clock has accumulated, then one variable-rate update.
pub struct FrameLoop {
    clock: GameClock,
    context: HostContext,
    systems: Vec<Box<dyn RuntimeSystem>>,
}

impl FrameLoop {
    pub fn new(clock: GameClock, context: HostContext) -> Self {
        Self {
            clock,
            context,
            systems: Vec::new(),
        }
    }

    /// Register and initialize a system
    pub fn register(&mut self, mut system: Box<dyn RuntimeSystem>) -> Result<()> {
        system.initialize(&mut self.context)?;
        log::debug!("[runtime] registered system '{}'", system.name());
        self.systems.push(system);
        Ok(())
    }

    /// Queue a host event for the next frame
    pub fn push_event(&mut self, event: HostEvent) {
        self.context.events.push(event);
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut HostContext {
        &mut self.context
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Run one frame using wall-clock time
    pub fn frame_now(&mut self) -> Result<usize> {
        self.clock.tick();
        self.run_frame()
    }

    /// Run one frame that took `dt` seconds. Returns the number of fixed ticks run.
    pub fn frame(&mut self, dt: f64) -> Result<usize> {
        self.clock.advance(dt);
        self.run_frame()
    }

    fn run_frame(&mut self) -> Result<usize> {
        for event in self.context.events.drain() {
            match event {
                HostEvent::PointerMoved { x, y } => self.context.pointer.set(x, y),
                HostEvent::PointerLost => self.context.pointer.clear(),
                _ => {}
            }
            for system in &mut self.systems {
                system.handle_event(&mut self.context, &event)?;
            }
        }

        self.context.stats.record(self.clock.delta_time);
        self.context.pointer.tick();

        let mut ticks = 0;
        while self.clock.should_fixed_update() {
            let dt = self.clock.fixed_timestep;
            for system in &mut self.systems {
                system.fixed_update(&mut self.context, dt)?;
            }
            self.clock.consume_fixed_step();
            ticks += 1;
        }

        let dt = self.clock.delta_time;
        for system in &mut self.systems {
            system.update(&mut self.context, dt)?;
        }
        Ok(ticks)
    }

    /// Shut down every system in reverse registration order
    pub fn shutdown(&mut self) -> Result<()> {
        while let Some(mut system) = self.systems.pop() {
            system.shutdown()?;
            log::debug!("[runtime] shut down system '{}'", system.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Trace {
        events: Vec<HostEvent>,
        fixed: usize,
        updates: usize,
        shut_down: bool,
    }

    struct Recorder(Rc<RefCell<Trace>>);

    impl RuntimeSystem for Recorder {
        fn initialize(&mut self, _ctx: &mut HostContext) -> Result<()> {
            Ok(())
        }

        fn handle_event(&mut self, _ctx: &mut HostContext, event: &HostEvent) -> Result<()> {
            self.0.borrow_mut().events.push(event.clone());
            Ok(())
        }

        fn fixed_update(&mut self, _ctx: &mut HostContext, _dt: f64) -> Result<()> {
            self.0.borrow_mut().fixed += 1;
            Ok(())
        }

        fn update(&mut self, _ctx: &mut HostContext, _dt: f64) -> Result<()> {
            self.0.borrow_mut().updates += 1;
            Ok(())
        }

        fn shutdown(&mut self) -> Result<()> {
            self.0.borrow_mut().shut_down = true;
            Ok(())
        }

        fn name(&self) -> &str {
            "recorder"
        }
    }

    #[test]
    fn frame_applies_events_then_ticks() {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let mut frame_loop = FrameLoop::new(GameClock::new(), HostContext::new());
        frame_loop
            .register(Box::new(Recorder(trace.clone())))
            .unwrap();

        frame_loop.push_event(HostEvent::PointerMoved { x: 5.0, y: 6.0 });
        let ticks = frame_loop.frame(1.0 / 30.0).unwrap();

        assert_eq!(ticks, 2);
        let t = trace.borrow();
        assert_eq!(t.events.len(), 1);
        assert_eq!(t.fixed, 2);
        assert_eq!(t.updates, 1);
        drop(t);

        let pos = frame_loop.context().pointer.position().unwrap();
        assert_eq!((pos.x, pos.y), (5.0, 6.0));

        frame_loop.push_event(HostEvent::PointerLost);
        frame_loop.frame(1.0 / 60.0).unwrap();
        assert!(frame_loop.context().pointer.position().is_none());

        frame_loop.shutdown().unwrap();
        assert!(trace.borrow().shut_down);
    }

    #[test]
    fn slow_frames_flag_reduced_motion() {
        let mut frame_loop = FrameLoop::new(GameClock::new(), HostContext::new());
        frame_loop.frame(1.0 / 15.0).unwrap();
        assert!(frame_loop.context().stats.reduced_motion());
    }

    #[test]
    fn shared_system_stays_readable() {
        use crate::system::SharedSystem;

        let trace = Rc::new(RefCell::new(Trace::default()));
        let recorder = Rc::new(RefCell::new(Recorder(trace)));
        let mut frame_loop = FrameLoop::new(GameClock::new(), HostContext::new());
        frame_loop
            .register(Box::new(SharedSystem::new(recorder.clone())))
            .unwrap();
        frame_loop.frame(1.0 / 60.0).unwrap();

        assert_eq!(recorder.borrow().0.borrow().fixed, 1);
        assert_eq!(recorder.borrow().name(), "recorder");
    }
}
