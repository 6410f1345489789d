//! Scalar falloff and interpolation helpers used by the tick and render passes

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Perspective scale for a depth coordinate: `100 / (100 + depth)`
pub fn perspective_scale(depth: f32) -> f32 {
    100.0 / (100.0 + depth)
}

/// `1 - distance / threshold`, the proximity weight for links and forces.
/// Zero at or beyond the threshold.
pub fn proximity(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 || distance >= threshold {
        0.0
    } else {
        1.0 - distance / threshold
    }
}

/// Oscillating alpha multiplier in [0, 1] for a phase
pub fn pulse(phase: f32) -> f32 {
    0.5 + 0.5 * phase.sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_f32_endpoints() {
        assert!((lerp_f32(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn perspective_scale_range() {
        assert_eq!(perspective_scale(0.0), 1.0);
        assert_eq!(perspective_scale(100.0), 0.5);
    }

    #[test]
    fn proximity_falls_to_zero() {
        assert!((proximity(50.0, 100.0) - 0.5).abs() < 1e-6);
        assert_eq!(proximity(100.0, 100.0), 0.0);
        assert_eq!(proximity(150.0, 100.0), 0.0);
        assert_eq!(proximity(0.0, 0.0), 0.0);
    }

    #[test]
    fn pulse_bounds() {
        for i in 0..64 {
            let p = pulse(i as f32 * 0.3);
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
