use bevy::prelude::*;

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Per-update frame clock driving transitions.
///
/// With a fixed timestep every update advances by exactly that amount, which
/// keeps headless runs and tests reproducible. Without one the clock follows
/// Bevy's [`Time`] resource when present.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct FrameClock {
    fixed_dt: Option<f32>,
    delta: f32,
    elapsed: f64,
    frames: u64,
}

impl FrameClock {
    /// Clock following the engine's delta time.
    pub const fn new() -> Self {
        Self {
            fixed_dt: None,
            delta: 0.0,
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Clock advancing by `dt` seconds every frame.
    pub const fn fixed(dt: f32) -> Self {
        Self {
            fixed_dt: Some(dt),
            delta: 0.0,
            elapsed: 0.0,
            frames: 0,
        }
    }

    pub const fn fixed_dt(&self) -> Option<f32> {
        self.fixed_dt
    }

    /// Seconds elapsed during the current frame.
    pub const fn delta(&self) -> f32 {
        self.delta
    }

    /// Total seconds elapsed.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of frames advanced.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance by one frame. `engine_dt` is ignored when a fixed timestep is set.
    pub fn advance(&mut self, engine_dt: f32) {
        self.delta = self.fixed_dt.unwrap_or(engine_dt).max(0.0);
        self.elapsed += f64::from(self.delta);
        self.frames += 1;
    }

    pub fn reset(&mut self) {
        self.delta = 0.0;
        self.elapsed = 0.0;
        self.frames = 0;
    }
}

/// System advancing [`FrameClock`] at the start of each update.
#[allow(clippy::needless_pass_by_value)]
pub fn advance_frame_clock(mut clock: ResMut<FrameClock>, time: Option<Res<Time>>) {
    let engine_dt = time.map_or(0.0, |t| t.delta_secs());
    clock.advance(engine_dt);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_is_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.frames(), 0);
        assert!(clock.delta().abs() < f32::EPSILON);
        assert!(clock.fixed_dt().is_none());
    }

    #[test]
    fn fixed_clock_ignores_engine_dt() {
        let mut clock = FrameClock::fixed(0.02);
        clock.advance(1.0);
        clock.advance(0.5);
        assert!((clock.delta() - 0.02).abs() < f32::EPSILON);
        assert!((clock.elapsed() - 0.04).abs() < 1e-6);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn engine_clock_follows_engine_dt() {
        let mut clock = FrameClock::new();
        clock.advance(0.25);
        assert!((clock.delta() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn negative_dt_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(-1.0);
        assert!(clock.delta().abs() < f32::EPSILON);
    }

    #[test]
    fn reset_keeps_fixed_step() {
        let mut clock = FrameClock::fixed(0.1);
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.frames(), 0);
        assert_eq!(clock.fixed_dt(), Some(0.1));
    }

    #[test]
    fn system_advances_clock_without_time_resource() {
        let mut app = App::new();
        app.insert_resource(FrameClock::fixed(0.5));
        app.add_systems(Update, advance_frame_clock);
        app.update();
        app.update();
        let clock = app.world().resource::<FrameClock>();
        assert_eq!(clock.frames(), 2);
        assert!((clock.elapsed() - 1.0).abs() < 1e-9);
    }
}
