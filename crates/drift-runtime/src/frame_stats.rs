//! Frame-rate tracking

/// Frame rate below which hosts should shed optional rendering work
pub const DEFAULT_FPS_FLOOR: f64 = 30.0;

/// Instantaneous frame rate and the derived reduced-motion flag
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Frames per second measured from the last frame delta
    pub fps: f64,
    /// Frames recorded so far
    pub frames: u64,
    /// FPS threshold for `reduced_motion`
    pub fps_floor: f64,
    reduced_motion: bool,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frames: 0,
            fps_floor: DEFAULT_FPS_FLOOR,
            reduced_motion: false,
        }
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that took `dt` seconds. Returns true if the
    /// reduced-motion flag flipped.
    pub fn record(&mut self, dt: f64) -> bool {
        self.frames += 1;
        if dt <= 0.0 {
            return false;
        }
        self.fps = 1.0 / dt;
        let reduced = self.fps < self.fps_floor;
        let changed = reduced != self.reduced_motion;
        if changed {
            log::debug!(
                "[runtime] reduced motion {} at {:.1} fps",
                if reduced { "on" } else { "off" },
                self.fps
            );
        }
        self.reduced_motion = reduced;
        changed
    }

    /// True while the host renders below the FPS floor
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_frames_enable_reduced_motion() {
        let mut stats = FrameStats::new();
        assert!(!stats.reduced_motion());

        assert!(!stats.record(1.0 / 60.0));
        assert!(!stats.reduced_motion());

        assert!(stats.record(1.0 / 20.0));
        assert!(stats.reduced_motion());
        assert!((stats.fps - 20.0).abs() < 1e-9);

        assert!(stats.record(1.0 / 45.0));
        assert!(!stats.reduced_motion());
        assert_eq!(stats.frames, 3);
    }

    #[test]
    fn zero_delta_keeps_previous_rate() {
        let mut stats = FrameStats::new();
        stats.record(1.0 / 20.0);
        assert!(!stats.record(0.0));
        assert!(stats.reduced_motion());
    }
}
