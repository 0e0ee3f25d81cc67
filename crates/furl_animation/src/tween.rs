//! Offset tweens
//!
//! An [`OffsetTween`] is the ephemeral animation target of a snap: it exists
//! only while the header (or content) settles toward an offset. The tween is
//! a pure function of elapsed time; whoever owns it advances the clock and
//! applies the returned value.

use crate::easing::Easing;

/// Upper bound for any snap or fling-settle animation
pub const MAX_OFFSET_ANIMATION_DURATION_MS: u32 = 600;

/// Duration of an offset animation covering `distance` pixels
///
/// With a fling velocity (px/s) the duration follows the velocity,
/// otherwise it is proportional to the distance relative to the header
/// height. Either way it never exceeds [`MAX_OFFSET_ANIMATION_DURATION_MS`].
pub fn offset_animation_duration(distance: i32, velocity: f32, header_height: i32) -> u32 {
    let distance = distance.unsigned_abs() as f32;
    let velocity = velocity.abs();

    let duration = if velocity > 0.0 {
        3 * (1000.0 * (distance / velocity)).round() as i64
    } else {
        let distance_ratio = if header_height > 0 {
            distance / header_height as f32
        } else {
            0.0
        };
        ((distance_ratio + 1.0) * 150.0) as i64
    };

    duration.clamp(0, MAX_OFFSET_ANIMATION_DURATION_MS as i64) as u32
}

/// Animation of an integer offset from one value to another
#[derive(Clone, Debug, PartialEq)]
pub struct OffsetTween {
    from: i32,
    to: i32,
    duration_ms: u32,
    elapsed_ms: f32,
    easing: Easing,
}

impl OffsetTween {
    /// Create a tween; durations above the cap are clamped
    pub fn new(from: i32, to: i32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.min(MAX_OFFSET_ANIMATION_DURATION_MS),
            elapsed_ms: 0.0,
            easing,
        }
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> i32 {
        self.to
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Offset at a given elapsed time
    ///
    /// Intermediate values truncate toward zero; the final value is exactly `to`.
    pub fn value_at(&self, elapsed_ms: f32) -> i32 {
        if self.duration_ms == 0 || elapsed_ms >= self.duration_ms as f32 {
            return self.to;
        }
        if elapsed_ms <= 0.0 {
            return self.from;
        }

        let progress = elapsed_ms / self.duration_ms as f32;
        let eased = self.easing.apply(progress);
        (self.from as f32 + eased * (self.to - self.from) as f32) as i32
    }

    /// Current offset
    pub fn value(&self) -> i32 {
        self.value_at(self.elapsed_ms)
    }

    /// Advance the tween by delta time (in milliseconds) and return the new offset
    pub fn advance(&mut self, dt_ms: f32) -> i32 {
        if dt_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms as f32);
        }
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_driven_duration() {
        // 100px at 1000px/s -> 3 * 100ms
        assert_eq!(offset_animation_duration(100, 1000.0, 250), 300);
        // Sign of the velocity does not matter
        assert_eq!(offset_animation_duration(100, -1000.0, 250), 300);
        assert_eq!(offset_animation_duration(-40, 4000.0, 250), 30);
    }

    #[test]
    fn test_distance_proportional_duration() {
        // (125 / 250 + 1) * 150
        assert_eq!(offset_animation_duration(125, 0.0, 250), 225);
        assert_eq!(offset_animation_duration(0, 0.0, 250), 150);
    }

    #[test]
    fn test_duration_is_capped() {
        assert_eq!(
            offset_animation_duration(100, 0.001, 250),
            MAX_OFFSET_ANIMATION_DURATION_MS
        );
        assert_eq!(
            offset_animation_duration(10_000, 0.0, 10),
            MAX_OFFSET_ANIMATION_DURATION_MS
        );
    }

    #[test]
    fn test_zero_header_height_does_not_divide() {
        assert_eq!(offset_animation_duration(80, 0.0, 0), 150);
    }

    #[test]
    fn test_tween_reaches_target_exactly() {
        let mut tween = OffsetTween::new(-40, 0, 200, Easing::default());
        assert_eq!(tween.value(), -40);

        let mid = tween.advance(100.0);
        assert!(mid > -40 && mid < 0, "mid={mid}");
        assert!(!tween.is_finished());

        assert_eq!(tween.advance(150.0), 0);
        assert!(tween.is_finished());
        assert_eq!(tween.elapsed_ms(), 200.0);
    }

    #[test]
    fn test_tween_is_monotonic() {
        let mut tween = OffsetTween::new(-60, -100, 300, Easing::default());
        let mut last = tween.value();
        while !tween.is_finished() {
            let value = tween.advance(16.0);
            assert!(value <= last);
            last = value;
        }
        assert_eq!(last, -100);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let tween = OffsetTween::new(5, -5, 0, Easing::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), -5);
    }

    #[test]
    fn test_duration_clamped_on_construction() {
        let tween = OffsetTween::new(0, -100, 5_000, Easing::Linear);
        assert_eq!(tween.duration_ms(), MAX_OFFSET_ANIMATION_DURATION_MS);
    }

    #[test]
    fn test_linear_truncates_toward_zero() {
        let tween = OffsetTween::new(0, -10, 300, Easing::Linear);
        // 100/300 * -10 = -3.33 -> -3
        assert_eq!(tween.value_at(100.0), -3);
    }
}
