//! Keyframe curves with cubic interpolation.
//!
//! [`Curve`] stores `(time, value)` keys sorted by time and evaluates them
//! with a cubic Bezier segment between each pair of keys. Tangents are
//! recomputed automatically whenever a key is added:
//! - interior keys use the slope between their neighbours
//! - the first and last key are flat
//!
//! Queries outside the key range extrapolate linearly along the boundary
//! tangent, so every real input has a defined value.
//!
//! [`ColorCurve`] bundles four such curves to map a scalar onto a color.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Two keys closer than this are treated as the same key.
pub const KEY_TIME_TOLERANCE: f32 = 1.0e-4;

/// Stable identifier of a key, valid for the lifetime of its curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyHandle(u32);

/// A single control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
    /// Slope used when arriving at this key from the previous one.
    pub arrive_tangent: f32,
    /// Slope used when leaving this key towards the next one.
    pub leave_tangent: f32,
    handle: KeyHandle,
}

/// Keyframe curve with cubic interpolation and linear extrapolation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<[f32; 2]>", into = "Vec<[f32; 2]>")]
pub struct Curve {
    keys: Vec<CurveKey>,
    next_handle: u32,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from unsorted `(time, value)` pairs.
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        let mut curve = Self::new();
        for &(time, value) in points {
            curve.add_or_update_key(time, value);
        }
        curve
    }

    /// Insert a key, or overwrite the value of the key already at `time`.
    pub fn add_or_update_key(&mut self, time: f32, value: f32) -> KeyHandle {
        if let Some(key) = self
            .keys
            .iter_mut()
            .find(|k| (k.time - time).abs() <= KEY_TIME_TOLERANCE)
        {
            key.value = value;
            let handle = key.handle;
            self.auto_set_tangents();
            return handle;
        }

        let handle = KeyHandle(self.next_handle);
        self.next_handle += 1;

        let index = self.keys.partition_point(|k| k.time < time);
        self.keys.insert(
            index,
            CurveKey {
                time,
                value,
                arrive_tangent: 0.0,
                leave_tangent: 0.0,
                handle,
            },
        );
        self.auto_set_tangents();
        handle
    }

    /// Look up a key by handle.
    pub fn key(&self, handle: KeyHandle) -> Option<&CurveKey> {
        self.keys.iter().find(|k| k.handle == handle)
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Time range covered by the keys, if any.
    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((self.keys.first()?.time, self.keys.last()?.time))
    }

    /// Evaluate the curve at any time. An empty curve evaluates to zero.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };

        if time <= first.time {
            return first.value - first.leave_tangent * (first.time - time);
        }
        if time >= last.time {
            return last.value + last.arrive_tangent * (time - last.time);
        }

        // first.time < time < last.time, so 1 <= upper < len
        let upper = self.keys.partition_point(|k| k.time <= time);
        let a = &self.keys[upper - 1];
        let b = &self.keys[upper];

        let span = b.time - a.time;
        let alpha = (time - a.time) / span;
        let p1 = a.value + a.leave_tangent * span / 3.0;
        let p2 = b.value - b.arrive_tangent * span / 3.0;
        bezier(a.value, p1, p2, b.value, alpha)
    }

    fn auto_set_tangents(&mut self) {
        let count = self.keys.len();
        for i in 0..count {
            let tangent = if i == 0 || i == count - 1 {
                0.0
            } else {
                let prev = self.keys[i - 1];
                let next = self.keys[i + 1];
                (next.value - prev.value) / (next.time - prev.time).max(KEY_TIME_TOLERANCE)
            };
            let key = &mut self.keys[i];
            key.arrive_tangent = tangent;
            key.leave_tangent = tangent;
        }
    }
}

impl From<Vec<[f32; 2]>> for Curve {
    fn from(points: Vec<[f32; 2]>) -> Self {
        let mut curve = Curve::new();
        for [time, value] in points {
            curve.add_or_update_key(time, value);
        }
        curve
    }
}

impl From<Curve> for Vec<[f32; 2]> {
    fn from(curve: Curve) -> Self {
        curve.keys.iter().map(|k| [k.time, k.value]).collect()
    }
}

/// Cubic Bezier through `p0` and `p3` with inner control points `p1`, `p2`.
fn bezier(p0: f32, p1: f32, p2: f32, p3: f32, alpha: f32) -> f32 {
    let inv = 1.0 - alpha;
    p0 * inv * inv * inv
        + 3.0 * p1 * alpha * inv * inv
        + 3.0 * p2 * alpha * alpha * inv
        + p3 * alpha * alpha * alpha
}

/// Four curves (red, green, blue, alpha) sampled together.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ColorCurve {
    pub red: Curve,
    pub green: Curve,
    pub blue: Curve,
    #[serde(default)]
    pub alpha: Curve,
}

impl ColorCurve {
    /// Build a color curve from `(input, color)` keys.
    pub fn from_keys(keys: &[(f32, LinearRgba)]) -> Self {
        let mut curve = Self::default();
        for &(input, color) in keys {
            curve.add_key(input, color);
        }
        curve
    }

    pub fn add_key(&mut self, input: f32, color: LinearRgba) {
        self.red.add_or_update_key(input, color.red);
        self.green.add_or_update_key(input, color.green);
        self.blue.add_or_update_key(input, color.blue);
        self.alpha.add_or_update_key(input, color.alpha);
    }

    /// Evaluate without clamping. A curve with no alpha keys is opaque.
    pub fn evaluate(&self, input: f32) -> LinearRgba {
        let alpha = if self.alpha.is_empty() {
            1.0
        } else {
            self.alpha.evaluate(input)
        };
        LinearRgba::new(
            self.red.evaluate(input),
            self.green.evaluate(input),
            self.blue.evaluate(input),
            alpha,
        )
    }

    /// Evaluate with every channel clamped to `[0, 1]`.
    pub fn evaluate_clamped(&self, input: f32) -> LinearRgba {
        let c = self.evaluate(input);
        LinearRgba::new(
            c.red.clamp(0.0, 1.0),
            c.green.clamp(0.0, 1.0),
            c.blue.clamp(0.0, 1.0),
            c.alpha.clamp(0.0, 1.0),
        )
    }
}
