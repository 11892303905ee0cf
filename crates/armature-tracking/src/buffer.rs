//! Tracking input buffer.
//!
//! [`TrackingBuffer`] holds the latest sample from whichever device or
//! script feeds the rig; [`HandednessSwitch`] holds the user's hand
//! preference. Both are read once per frame when building
//! [`TrackedFrame`](armature_core::types::TrackedFrame).

use bevy::prelude::*;

use armature_core::types::{FrameInput, Handedness};

use crate::sample::TrackingSample;
use crate::source::TrackingSource;

// ---------------------------------------------------------------------------
// TrackingBuffer
// ---------------------------------------------------------------------------

/// Resource holding the latest tracking sample.
///
/// External code (device callbacks, network input, replay) writes here
/// with [`push`](Self::push). Until the first sample arrives the tracked
/// frame stays at its default.
///
/// # Example
///
/// ```
/// use armature_tracking::{TrackingBuffer, TrackingSample};
///
/// let mut buffer = TrackingBuffer::new();
/// assert!(buffer.latest().is_none());
/// buffer.push(TrackingSample::default());
/// assert_eq!(buffer.samples_received(), 1);
/// ```
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct TrackingBuffer {
    latest: Option<TrackingSample>,
    samples_received: u64,
}

impl TrackingBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest sample.
    pub fn push(&mut self, sample: TrackingSample) {
        self.latest = Some(sample);
        self.samples_received += 1;
    }

    #[must_use]
    pub const fn latest(&self) -> Option<&TrackingSample> {
        self.latest.as_ref()
    }

    #[must_use]
    pub const fn samples_received(&self) -> u64 {
        self.samples_received
    }

    /// Forget the latest sample.
    pub fn clear(&mut self) {
        self.latest = None;
    }

    /// Solver input from the latest sample, if any.
    #[must_use]
    pub fn frame(&self, handedness: Handedness) -> Option<FrameInput> {
        self.latest.map(|s| s.to_frame(handedness))
    }
}

// ---------------------------------------------------------------------------
// HandednessSwitch
// ---------------------------------------------------------------------------

/// User preference for the dominant hand, read every frame.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandednessSwitch {
    pub is_left_handed: bool,
}

impl HandednessSwitch {
    #[must_use]
    pub const fn left() -> Self {
        Self {
            is_left_handed: true,
        }
    }

    #[must_use]
    pub const fn handedness(self) -> Handedness {
        Handedness::from_left_flag(self.is_left_handed)
    }
}

// ---------------------------------------------------------------------------
// ActiveTrackingSource
// ---------------------------------------------------------------------------

/// Source polled into the [`TrackingBuffer`] every frame.
#[derive(Resource)]
pub struct ActiveTrackingSource(pub Box<dyn TrackingSource>);

impl ActiveTrackingSource {
    pub fn new(source: impl TrackingSource + 'static) -> Self {
        Self(Box::new(source))
    }
}

impl std::fmt::Debug for ActiveTrackingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ActiveTrackingSource")
            .field(&self.0.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    use crate::source::StaticTracking;

    #[test]
    fn buffer_default_empty() {
        let buffer = TrackingBuffer::new();
        assert!(buffer.latest().is_none());
        assert_eq!(buffer.samples_received(), 0);
        assert!(buffer.frame(Handedness::Right).is_none());
    }

    #[test]
    fn buffer_keeps_latest() {
        let mut buffer = TrackingBuffer::new();
        buffer.push(TrackingSample::default().with_head_position(Vector3::new(0.0, 1.0, 0.0)));
        buffer.push(TrackingSample::default().with_head_position(Vector3::new(0.0, 2.0, 0.0)));
        assert_eq!(buffer.samples_received(), 2);
        let frame = buffer.frame(Handedness::Left).unwrap();
        assert!((frame.head_position.y - 2.0).abs() < f32::EPSILON);
        assert_eq!(frame.handedness, Handedness::Left);
    }

    #[test]
    fn buffer_clear_keeps_count() {
        let mut buffer = TrackingBuffer::new();
        buffer.push(TrackingSample::default());
        buffer.clear();
        assert!(buffer.latest().is_none());
        assert_eq!(buffer.samples_received(), 1);
    }

    #[test]
    fn handedness_switch() {
        assert_eq!(HandednessSwitch::default().handedness(), Handedness::Right);
        assert_eq!(HandednessSwitch::left().handedness(), Handedness::Left);
    }

    #[test]
    fn active_source_debug_shows_name() {
        let source = ActiveTrackingSource::new(StaticTracking::default());
        assert_eq!(format!("{source:?}"), r#"ActiveTrackingSource("static")"#);
    }
}
