//! Drawing surface abstraction

use drift_core::Color;
use glam::Vec2;

/// Two-stop radial gradient: `inner` at the center, `outer` at the rim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub inner: Color,
    pub outer: Color,
}

impl RadialGradient {
    /// Solid center fading to fully transparent at the rim
    pub fn fade_out(color: Color) -> Self {
        Self {
            inner: color,
            outer: color.with_alpha(0.0),
        }
    }

    /// Color at normalized distance `t` in [0, 1] from the center
    pub fn sample(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Color::new(
            mix(self.inner.r, self.outer.r),
            mix(self.inner.g, self.outer.g),
            mix(self.inner.b, self.outer.b),
            mix(self.inner.a, self.outer.a),
        )
    }
}

/// The four primitives a field draws with.
///
/// Coordinates are logical pixels with the origin at the top-left corner.
pub trait DrawSurface {
    /// Match the host container's box size
    fn resize(&mut self, width: u32, height: u32);

    /// Erase a rectangle to transparent
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Filled disc shaded by a radial gradient
    fn fill_radial_circle(&mut self, center: Vec2, radius: f32, gradient: RadialGradient);

    /// Straight line segment
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);

    /// Ellipse outline
    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color, width: f32);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        gradient: RadialGradient,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        color: Color,
        width: f32,
    },
}

/// Running totals of draw calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct DrawCounts {
    pub clears: u64,
    pub circles: u64,
    pub lines: u64,
    pub ellipses: u64,
}

/// Surface that records draw calls instead of rasterizing them.
///
/// Headless hosts use it to count work; tests inspect the command list.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    /// Keep every command (otherwise only totals are tracked)
    keep_commands: bool,
    commands: Vec<DrawCommand>,
    totals: DrawCounts,
}

impl RecordingSurface {
    /// Surface that keeps the full command list
    pub fn new() -> Self {
        Self {
            keep_commands: true,
            ..Self::default()
        }
    }

    /// Surface that only counts draw calls
    pub fn counting() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the commands recorded so far, leaving the list empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn totals(&self) -> DrawCounts {
        self.totals
    }

    fn record(&mut self, command: DrawCommand) {
        if self.keep_commands {
            self.commands.push(command);
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.totals.clears += 1;
        self.record(DrawCommand::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_radial_circle(&mut self, center: Vec2, radius: f32, gradient: RadialGradient) {
        self.totals.circles += 1;
        self.record(DrawCommand::Circle {
            center,
            radius,
            gradient,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.totals.lines += 1;
        self.record(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color, width: f32) {
        self.totals.ellipses += 1;
        self.record(DrawCommand::Ellipse {
            center,
            radii,
            color,
            width,
        });
    }
}
