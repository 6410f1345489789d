//! Routes host events to particle fields and drives them from the frame loop

use crate::field::ParticleField;
use crate::surface::DrawSurface;
use drift_core::{DriftError, FieldId, Result};
use drift_runtime::{HostContext, HostEvent, RuntimeSystem};
use glam::Vec2;

/// One registered field and its host-side binding state
pub struct FieldSlot<S: DrawSurface> {
    pub id: FieldId,
    pub name: String,
    /// Top-left corner of the field's container in host coordinates
    pub origin: Vec2,
    pub field: ParticleField<S>,
    hovered: bool,
    ticks_since_impulse: u32,
    last_impulse_at: Option<Vec2>,
}

/// The particle system: owns every field and implements RuntimeSystem.
///
/// Each fixed tick advances the active fields; each frame redraws the fields
/// whose entities changed since their last draw.
pub struct FieldSystem<S: DrawSurface> {
    slots: Vec<FieldSlot<S>>,
}

impl<S: DrawSurface> FieldSystem<S> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a field whose container sits at `origin`
    pub fn add_field(&mut self, name: impl Into<String>, origin: Vec2, field: ParticleField<S>) -> FieldId {
        let id = FieldId::new();
        self.slots.push(FieldSlot {
            id,
            name: name.into(),
            origin,
            field,
            hovered: false,
            ticks_since_impulse: 0,
            last_impulse_at: None,
        });
        id
    }

    /// Unregister a field, clearing its surface
    pub fn remove_field(&mut self, id: FieldId) -> Result<ParticleField<S>> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DriftError::UnknownField(id.to_string()))?;
        let mut slot = self.slots.remove(index);
        slot.field.clear();
        Ok(slot.field)
    }

    pub fn field(&self, id: FieldId) -> Option<&ParticleField<S>> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.field)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut ParticleField<S>> {
        self.slots.iter_mut().find(|s| s.id == id).map(|s| &mut s.field)
    }

    /// Look a field up by its registration name
    pub fn find(&self, name: &str) -> Option<FieldId> {
        self.slots.iter().find(|s| s.name == name).map(|s| s.id)
    }

    pub fn slots(&self) -> &[FieldSlot<S>] {
        &self.slots
    }

    pub fn field_count(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.field.is_active()).count()
    }

    pub fn total_entities(&self) -> usize {
        self.slots.iter().map(|s| s.field.entity_count()).sum()
    }

    fn slot_mut(&mut self, id: FieldId) -> Option<&mut FieldSlot<S>> {
        self.slots.iter_mut().find(|s| s.id == id)
    }
}

impl<S: DrawSurface> Default for FieldSystem<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DrawSurface> FieldSlot<S> {
    fn pointer_enter(&mut self, pointer: Option<Vec2>) {
        self.hovered = true;
        let field = &mut self.field;
        if field.config().has_impulse() {
            let at = pointer.unwrap_or(field.size() * 0.5);
            field.inject_impulse(at.x, at.y);
            self.ticks_since_impulse = 0;
            self.last_impulse_at = Some(at);
        } else {
            if field.entity_count() == 0 {
                field.init_ambient();
            }
            field.start();
        }
    }

    fn pointer_leave(&mut self) {
        self.hovered = false;
        let binding = self.field.config().binding;
        if binding.clear_on_leave {
            self.field.clear();
        } else if binding.stop_on_leave {
            self.field.stop();
        }
    }

    /// Re-inject while the pointer keeps moving inside the container
    fn retrigger(&mut self, pointer: Option<Vec2>) {
        let every = self.field.config().binding.retrigger_ticks;
        if !self.hovered || every == 0 {
            return;
        }
        self.ticks_since_impulse = self.ticks_since_impulse.saturating_add(1);
        let Some(at) = pointer else {
            return;
        };
        if self.ticks_since_impulse >= every && self.last_impulse_at != Some(at) {
            self.field.inject_impulse(at.x, at.y);
            self.ticks_since_impulse = 0;
            self.last_impulse_at = Some(at);
        }
    }
}

impl<S: DrawSurface> RuntimeSystem for FieldSystem<S> {
    fn initialize(&mut self, _ctx: &mut HostContext) -> Result<()> {
        for slot in &mut self.slots {
            let binding = slot.field.config().binding;
            if slot.field.config().has_ambient() {
                slot.field.init_ambient();
            }
            if binding.autostart {
                slot.field.start();
            }
        }
        if !self.slots.is_empty() {
            log::info!(
                "[particles] Registered {} field(s), {} active",
                self.slots.len(),
                self.active_count()
            );
        }
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut HostContext, event: &HostEvent) -> Result<()> {
        let Some(id) = event.field() else {
            return Ok(());
        };
        let Some(slot) = self.slot_mut(id) else {
            log::warn!("[particles] Ignoring {event:?}: no field {id}");
            return Ok(());
        };

        match *event {
            HostEvent::PointerEntered { .. } => {
                let pointer = ctx.pointer.relative_to(slot.origin);
                slot.pointer_enter(pointer);
            }
            HostEvent::PointerLeft { .. } => slot.pointer_leave(),
            HostEvent::Impulse { x, y, .. } => slot.field.inject_impulse(x, y),
            HostEvent::Resized { width, height, .. } => {
                slot.field.resize(width, height);
                if slot.field.config().has_ambient() {
                    slot.field.init_ambient();
                }
            }
            HostEvent::Start(_) => {
                slot.field.start();
            }
            HostEvent::Stop(_) => {
                slot.field.stop();
            }
            HostEvent::Clear(_) => slot.field.clear(),
            HostEvent::PointerMoved { .. } | HostEvent::PointerLost => {}
        }
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &mut HostContext, _dt: f64) -> Result<()> {
        let reduced_motion = ctx.stats.reduced_motion();
        for slot in &mut self.slots {
            let pointer = ctx.pointer.relative_to(slot.origin);
            slot.retrigger(pointer);
            if !slot.field.is_active() {
                continue;
            }
            slot.field.set_pointer(pointer);
            slot.field.set_reduced_motion(reduced_motion);
            slot.field.advance();
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut HostContext, _dt: f64) -> Result<()> {
        for slot in &mut self.slots {
            if slot.field.needs_render() {
                slot.field.render();
            }
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        for slot in &mut self.slots {
            slot.field.clear();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "particles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldState;
    use crate::particle::ParticleKind;
    use crate::presets::Preset;
    use crate::surface::RecordingSurface;
    use drift_runtime::{FrameLoop, GameClock, SharedSystem};
    use std::cell::RefCell;
    use std::rc::Rc;

    const TICK: f64 = 1.0 / 60.0;

    fn sized(preset: Preset, width: f32, height: f32) -> ParticleField<RecordingSurface> {
        let mut field = ParticleField::new(preset.config(), RecordingSurface::new(), 11);
        field.resize(width, height);
        field
    }

    fn host(system: FieldSystem<RecordingSurface>) -> (FrameLoop, Rc<RefCell<FieldSystem<RecordingSurface>>>) {
        host_with(system, HostContext::new())
    }

    fn host_with(
        system: FieldSystem<RecordingSurface>,
        context: HostContext,
    ) -> (FrameLoop, Rc<RefCell<FieldSystem<RecordingSurface>>>) {
        let shared = Rc::new(RefCell::new(system));
        let mut frame_loop = FrameLoop::new(GameClock::new(), context);
        frame_loop
            .register(Box::new(SharedSystem::new(shared.clone())))
            .unwrap();
        (frame_loop, shared)
    }

    #[test]
    fn autostart_fields_populate_on_register() {
        let mut system = FieldSystem::new();
        let hero = system.add_field("hero", Vec2::ZERO, sized(Preset::Ambient, 1500.0, 1000.0));
        let card = system.add_field("card", Vec2::ZERO, sized(Preset::Depth, 1200.0, 1000.0));
        let (_loop, shared) = host(system);

        let system = shared.borrow();
        assert!(system.field(hero).unwrap().is_active());
        assert_eq!(system.field(hero).unwrap().entity_count(), 100);
        // Depth cards wait for the pointer but are populated up front
        assert!(!system.field(card).unwrap().is_active());
        assert_eq!(system.field(card).unwrap().entity_count(), 100);
        assert_eq!(system.find("card"), Some(card));
    }

    #[test]
    fn hover_starts_and_leave_stops_depth_card() {
        let mut system = FieldSystem::new();
        let card = system.add_field("card", Vec2::new(100.0, 100.0), sized(Preset::Depth, 400.0, 300.0));
        let (mut frame_loop, shared) = host(system);

        frame_loop.push_event(HostEvent::PointerMoved { x: 150.0, y: 150.0 });
        frame_loop.push_event(HostEvent::PointerEntered { field: card });
        frame_loop.frame(TICK).unwrap();
        assert!(shared.borrow().field(card).unwrap().is_active());
        assert_eq!(shared.borrow().field(card).unwrap().ticks(), 1);

        frame_loop.push_event(HostEvent::PointerLeft { field: card });
        frame_loop.frame(TICK).unwrap();
        let system = shared.borrow();
        let field = system.field(card).unwrap();
        assert_eq!(field.state(), FieldState::Idle);
        assert_eq!(field.ticks(), 1);
        assert_eq!(field.entity_count(), 10);
    }

    #[test]
    fn water_injects_on_enter_and_retriggers_while_moving() {
        let mut system = FieldSystem::new();
        let card = system.add_field("card", Vec2::ZERO, sized(Preset::Water, 400.0, 300.0));
        let (mut frame_loop, shared) = host(system);

        frame_loop.push_event(HostEvent::PointerMoved { x: 50.0, y: 50.0 });
        frame_loop.push_event(HostEvent::PointerEntered { field: card });
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(card).unwrap().waves().len(), 1);

        // A still pointer never retriggers
        for _ in 0..20 {
            frame_loop.frame(TICK).unwrap();
        }
        assert_eq!(shared.borrow().field(card).unwrap().waves().len(), 1);

        // Moving inside re-injects on the next retrigger boundary
        frame_loop.push_event(HostEvent::PointerMoved { x: 60.0, y: 55.0 });
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(card).unwrap().waves().len(), 2);
        assert_eq!(
            shared.borrow().field(card).unwrap().count_kind(ParticleKind::Spark) % 30,
            0
        );
    }

    #[test]
    fn impulse_fields_drain_to_idle_and_stop_ticking() {
        let mut system = FieldSystem::new();
        let confetti = system.add_field("party", Vec2::ZERO, sized(Preset::Confetti, 800.0, 600.0));
        let (mut frame_loop, shared) = host(system);

        frame_loop.push_event(HostEvent::Impulse {
            field: confetti,
            x: 0.0,
            y: 0.0,
        });
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(confetti).unwrap().entity_count(), 80);

        for _ in 0..400 {
            frame_loop.frame(TICK).unwrap();
        }
        let system = shared.borrow();
        let field = system.field(confetti).unwrap();
        assert!(!field.is_active());
        assert_eq!(field.entity_count(), 0);
        let drained_at = field.ticks();
        drop(system);

        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(confetti).unwrap().ticks(), drained_at);
    }

    #[test]
    fn fields_see_the_smoothed_pointer() {
        let mut system = FieldSystem::new();
        let hero = system.add_field("hero", Vec2::new(10.0, 0.0), sized(Preset::Ambient, 300.0, 300.0));
        let (mut frame_loop, shared) = host_with(system, HostContext::with_pointer_smoothing(0.5));

        frame_loop.push_event(HostEvent::PointerMoved { x: 10.0, y: 0.0 });
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(hero).unwrap().pointer(), Some(Vec2::ZERO));

        frame_loop.push_event(HostEvent::PointerMoved { x: 110.0, y: 0.0 });
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(hero).unwrap().pointer(), Some(Vec2::new(50.0, 0.0)));

        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(hero).unwrap().pointer(), Some(Vec2::new(75.0, 0.0)));
    }

    #[test]
    fn repeated_start_steps_once_per_tick() {
        let mut system = FieldSystem::new();
        let hero = system.add_field("hero", Vec2::ZERO, sized(Preset::Ambient, 300.0, 300.0));
        let (mut frame_loop, shared) = host(system);

        for _ in 0..5 {
            frame_loop.push_event(HostEvent::Start(hero));
        }
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(hero).unwrap().ticks(), 1);
    }

    #[test]
    fn resize_repopulates_ambient_fields() {
        let mut system = FieldSystem::new();
        let hero = system.add_field("hero", Vec2::ZERO, sized(Preset::Ambient, 300.0, 300.0));
        let (mut frame_loop, shared) = host(system);
        assert_eq!(shared.borrow().field(hero).unwrap().entity_count(), 6);

        frame_loop.push_event(HostEvent::Resized {
            field: hero,
            width: 1500.0,
            height: 1000.0,
        });
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(hero).unwrap().entity_count(), 100);
    }

    #[test]
    fn unknown_field_is_skipped() {
        let (mut frame_loop, _shared) = host(FieldSystem::new());
        frame_loop.push_event(HostEvent::Clear(FieldId::from_raw(u64::MAX)));
        assert!(frame_loop.frame(TICK).is_ok());
    }

    #[test]
    fn stop_and_clear_events() {
        let mut system = FieldSystem::new();
        let hero = system.add_field("hero", Vec2::ZERO, sized(Preset::Ambient, 300.0, 300.0));
        let (mut frame_loop, shared) = host(system);

        frame_loop.push_event(HostEvent::Stop(hero));
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(hero).unwrap().ticks(), 0);
        assert_eq!(shared.borrow().field(hero).unwrap().entity_count(), 6);

        frame_loop.push_event(HostEvent::Clear(hero));
        frame_loop.frame(TICK).unwrap();
        assert_eq!(shared.borrow().field(hero).unwrap().entity_count(), 0);

        frame_loop.shutdown().unwrap();
        let removed = shared.borrow_mut().remove_field(hero).unwrap();
        assert!(removed.particles().is_empty());
        assert!(shared.borrow_mut().remove_field(hero).is_err());
    }

    #[test]
    fn frames_render_only_changed_fields() {
        let mut system = FieldSystem::new();
        let hero = system.add_field("hero", Vec2::ZERO, sized(Preset::Ambient, 300.0, 300.0));
        let (mut frame_loop, shared) = host(system);

        frame_loop.frame(TICK).unwrap();
        let clears = shared.borrow().field(hero).unwrap().surface().unwrap().totals().clears;
        assert_eq!(clears, 1);

        frame_loop.push_event(HostEvent::Stop(hero));
        frame_loop.frame(TICK).unwrap();
        frame_loop.frame(TICK).unwrap();
        let clears = shared.borrow().field(hero).unwrap().surface().unwrap().totals().clears;
        assert_eq!(clears, 1);
    }
}
