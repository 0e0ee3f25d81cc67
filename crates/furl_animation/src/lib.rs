//! Furl Animation
//!
//! Time-based offset animation for snapping a collapsing header.
//!
//! # Features
//!
//! - **Easing**: Interpolation curves, including the decelerate curve used for snaps
//! - **Offset tweens**: Integer offset animation as a pure function of elapsed time
//! - **Duration policy**: Velocity-driven or distance-proportional, capped at 600 ms

pub mod easing;
pub mod tween;

pub use easing::Easing;
pub use tween::{offset_animation_duration, OffsetTween, MAX_OFFSET_ANIMATION_DURATION_MS};
