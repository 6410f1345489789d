//! Pointer position tracking

use glam::Vec2;

/// Latest pointer position reported by the host.
///
/// Positions are in host (page) coordinates. Fields read the position relative
/// to their own container through [`PointerState::relative_to`]. With
/// smoothing enabled the reported position eases toward the raw pointer by a
/// fixed fraction per frame, the way a trailing cursor dot follows the mouse.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Raw position from the most recent move event
    target: Option<Vec2>,
    /// Eased position (only tracked when smoothing is on)
    smoothed: Option<Vec2>,
    /// Fraction of the remaining distance covered per frame, in (0, 1]
    smoothing: Option<f32>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer that trails the raw position by `factor` per frame
    pub fn with_smoothing(factor: f32) -> Self {
        Self {
            smoothing: Some(factor.clamp(f32::EPSILON, 1.0)),
            ..Self::default()
        }
    }

    /// Record a pointer move
    pub fn set(&mut self, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        self.target = Some(pos);
        if self.smoothed.is_none() {
            self.smoothed = Some(pos);
        }
    }

    /// Pointer left the page: no position until the next move
    pub fn clear(&mut self) {
        self.target = None;
        self.smoothed = None;
    }

    /// Ease the smoothed position toward the raw one. Call once per frame.
    pub fn tick(&mut self) {
        let (Some(factor), Some(target), Some(current)) =
            (self.smoothing, self.target, self.smoothed)
        else {
            return;
        };
        self.smoothed = Some(current + (target - current) * factor);
    }

    /// Current pointer position, smoothed if smoothing is enabled
    pub fn position(&self) -> Option<Vec2> {
        if self.smoothing.is_some() {
            self.smoothed
        } else {
            self.target
        }
    }

    /// Raw position from the last move event
    pub fn raw_position(&self) -> Option<Vec2> {
        self.target
    }

    /// Position relative to a container whose top-left corner is at `origin`
    pub fn relative_to(&self, origin: Vec2) -> Option<Vec2> {
        self.position().map(|p| p - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_pointer_has_no_position() {
        let pointer = PointerState::new();
        assert!(pointer.position().is_none());
        assert!(pointer.relative_to(Vec2::ZERO).is_none());
    }

    #[test]
    fn raw_pointer_reports_latest_move() {
        let mut pointer = PointerState::new();
        pointer.set(10.0, 20.0);
        pointer.set(30.0, 40.0);
        assert_eq!(pointer.position(), Some(Vec2::new(30.0, 40.0)));
        assert_eq!(
            pointer.relative_to(Vec2::new(10.0, 10.0)),
            Some(Vec2::new(20.0, 30.0))
        );
        pointer.clear();
        assert!(pointer.position().is_none());
    }

    #[test]
    fn smoothing_eases_toward_target() {
        let mut pointer = PointerState::with_smoothing(0.15);
        pointer.set(0.0, 0.0);
        pointer.set(100.0, 0.0);
        pointer.tick();
        let p = pointer.position().unwrap();
        assert!((p.x - 15.0).abs() < 1e-4);
        pointer.tick();
        let p = pointer.position().unwrap();
        assert!((p.x - 27.75).abs() < 1e-4);
        assert_eq!(pointer.raw_position(), Some(Vec2::new(100.0, 0.0)));
    }
}
