//! Sun/moon axis orientation.
//!
//! Both lights hang off one shared axis. The sun points along the axis and
//! the moon is mounted half a turn around it, so a single pitch drives both.
//! During the day the pitch sweeps 180..360 degrees between sunrise and
//! sunset; at night it sweeps 0..180 between sunset and the next sunrise.

use bevy::prelude::*;

use crate::clock::{DayWindow, Phase, HOURS_PER_DAY};

/// Pitch offset of the moon light relative to the axis, in degrees.
pub const MOON_RELATIVE_PITCH: f32 = 180.0;

/// Linear remap of `value` from `input` to `output` without clamping.
pub fn map_range_unclamped(input: (f32, f32), output: (f32, f32), value: f32) -> f32 {
    let span = input.1 - input.0;
    let t = if span.abs() > f32::EPSILON {
        (value - input.0) / span
    } else {
        0.0
    };
    output.0 + (output.1 - output.0) * t
}

/// Axis pitch in degrees for the given time and phase.
pub fn compute_axis_pitch(time: f32, phase: Phase, window: &DayWindow) -> f32 {
    match phase {
        Phase::Day => map_range_unclamped((window.start, window.end), (180.0, 360.0), time),
        Phase::Night => {
            let night = (window.end, HOURS_PER_DAY + window.start);
            if time > window.end {
                map_range_unclamped(night, (0.0, 180.0), time)
            } else if time >= window.midday() {
                // Sunset fired up to one step early: continue the day sweep
                map_range_unclamped(night, (0.0, 180.0), time) + 360.0
            } else {
                // Early morning, after the wrap
                map_range_unclamped(night, (0.0, 180.0), HOURS_PER_DAY + time)
            }
        }
    }
}

/// World rotation of the sun/moon axis, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisRotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl AxisRotation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self {
            pitch,
            yaw,
            roll: 0.0,
        }
    }

    /// Rotation for the current time, with a fixed yaw.
    pub fn at(time: f32, phase: Phase, window: &DayWindow, yaw: f32) -> Self {
        Self::new(compute_axis_pitch(time, phase, window), yaw)
    }

    /// Yaw around Y, then pitch around the local X axis, then roll.
    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    /// Rotation of the moon light relative to the axis.
    pub fn moon_offset() -> Quat {
        Quat::from_rotation_x(MOON_RELATIVE_PITCH.to_radians())
    }

    /// Direction the sun light travels in world space.
    pub fn sun_direction(&self) -> Vec3 {
        self.to_quat() * Vec3::NEG_Z
    }

    /// Direction the moon light travels in world space.
    pub fn moon_direction(&self) -> Vec3 {
        (self.to_quat() * Self::moon_offset()) * Vec3::NEG_Z
    }
}
