//! The synthetic "how high is the sun" curve.
//!
//! Not astronomy: a cubic curve over the 24 hour clock that peaks at
//! midday, sits at the horizon value at sunrise and sunset, and bottoms out
//! at solar midnight. The sky color curves are sampled with its output.
//!
//! Keys at 0 and 24 carry the same value so the curve meets itself across
//! midnight. That value is a linear extrapolation along the night arc,
//! which keeps the wrap seam close to the cubic shape either side of it.

use crate::clock::{DayWindow, HOURS_PER_DAY};
use crate::curve::Curve;
use crate::orientation::map_range_unclamped;

/// Sun height at solar midnight.
pub const SOLAR_MIDNIGHT_HEIGHT: f32 = -3.0;

/// Sun height at sunrise and sunset.
pub const HORIZON_HEIGHT: f32 = -0.5;

/// Sun height at midday.
pub const MIDDAY_HEIGHT: f32 = 1.0;

/// Value duplicated at 0 and 24 hours.
pub fn wrap_boundary_height(window: &DayWindow) -> f32 {
    let midnight = window.solar_midnight();
    if midnight > HOURS_PER_DAY {
        map_range_unclamped((window.end, midnight), (0.0, SOLAR_MIDNIGHT_HEIGHT), HOURS_PER_DAY)
    } else {
        map_range_unclamped(
            (midnight, HOURS_PER_DAY + window.start),
            (SOLAR_MIDNIGHT_HEIGHT, 0.0),
            HOURS_PER_DAY,
        )
    }
}

/// Clock time of the solar midnight key, folded into `[0, 24]`.
pub fn solar_midnight_key_time(window: &DayWindow) -> f32 {
    let midnight = window.solar_midnight();
    if midnight > HOURS_PER_DAY {
        midnight - HOURS_PER_DAY
    } else {
        midnight
    }
}

/// Build the sun-height curve for a day window.
///
/// Keys: both wrap boundaries, solar midnight, sunrise, midday and sunset.
/// When solar midnight falls exactly on 24 it shares the boundary key.
pub fn build_sun_height_curve(window: &DayWindow) -> Curve {
    let boundary = wrap_boundary_height(window);

    let mut curve = Curve::new();
    curve.add_or_update_key(HOURS_PER_DAY, boundary);
    curve.add_or_update_key(0.0, boundary);
    curve.add_or_update_key(solar_midnight_key_time(window), SOLAR_MIDNIGHT_HEIGHT);
    curve.add_or_update_key(window.start, HORIZON_HEIGHT);
    curve.add_or_update_key(window.midday(), MIDDAY_HEIGHT);
    curve.add_or_update_key(window.end, HORIZON_HEIGHT);
    curve
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f32, end: f32) -> DayWindow {
        DayWindow::new(start, end).unwrap()
    }

    #[test]
    fn test_anchor_values_are_exact() {
        for w in [window(6.0, 18.0), window(5.0, 20.0), window(7.0, 16.0), window(6.5, 22.0)] {
            let curve = build_sun_height_curve(&w);
            assert_eq!(curve.evaluate(w.start), HORIZON_HEIGHT, "{:?}", w);
            assert_eq!(curve.evaluate(w.end), HORIZON_HEIGHT, "{:?}", w);
            assert_eq!(curve.evaluate(w.midday()), MIDDAY_HEIGHT, "{:?}", w);
            assert_eq!(
                curve.evaluate(solar_midnight_key_time(&w)),
                SOLAR_MIDNIGHT_HEIGHT,
                "{:?}",
                w
            );
        }
    }

    #[test]
    fn test_symmetric_window_merges_midnight_key() {
        let w = window(6.0, 18.0);
        let curve = build_sun_height_curve(&w);

        assert_eq!(wrap_boundary_height(&w), SOLAR_MIDNIGHT_HEIGHT);
        assert_eq!(curve.len(), 5);
        assert_eq!(curve.evaluate(0.0), -3.0);
        assert_eq!(curve.evaluate(12.0), 1.0);
    }

    #[test]
    fn test_midnight_after_wrap() {
        // Night centred at 0.5: boundary sits on the evening slope
        let w = window(7.0, 18.0);
        assert_eq!(w.solar_midnight(), 24.5);
        assert_eq!(solar_midnight_key_time(&w), 0.5);

        let expected = -3.0 * (24.0 - 18.0) / (24.5 - 18.0);
        assert!((wrap_boundary_height(&w) - expected).abs() < 1e-5);

        let curve = build_sun_height_curve(&w);
        assert_eq!(curve.len(), 6);
        let times: Vec<f32> = curve.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 7.0, 12.5, 18.0, 24.0]);
    }

    #[test]
    fn test_midnight_before_wrap() {
        // Night centred at 23.5: boundary sits on the morning slope
        let w = window(5.0, 18.0);
        assert_eq!(solar_midnight_key_time(&w), 23.5);

        let expected = -3.0 + 3.0 * (24.0 - 23.5) / (29.0 - 23.5);
        assert!((wrap_boundary_height(&w) - expected).abs() < 1e-5);

        let curve = build_sun_height_curve(&w);
        assert_eq!(curve.len(), 6);
        assert_eq!(curve.evaluate(24.0), curve.evaluate(0.0));
    }

    #[test]
    fn test_curve_stays_in_range_over_the_day() {
        for w in [window(6.0, 18.0), window(5.0, 22.0), window(7.0, 16.0)] {
            let curve = build_sun_height_curve(&w);
            for i in 0..=2400 {
                let t = i as f32 / 100.0;
                let h = curve.evaluate(t);
                assert!((-3.05..=1.05).contains(&h), "h={} at t={} in {:?}", h, t, w);
            }
        }
    }

    #[test]
    fn test_daylight_is_above_horizon() {
        let w = window(6.0, 18.0);
        let curve = build_sun_height_curve(&w);
        for i in 1..120 {
            let t = 6.0 + i as f32 * 0.1;
            assert!(curve.evaluate(t) > HORIZON_HEIGHT, "t={}", t);
        }
    }

    #[test]
    fn test_wrap_seam_is_continuous() {
        for w in [window(7.0, 18.0), window(5.0, 18.0), window(6.0, 18.0)] {
            let curve = build_sun_height_curve(&w);
            let before = curve.evaluate(23.999);
            let after = curve.evaluate(0.001);
            assert!((before - after).abs() < 0.01, "{:?}: {} vs {}", w, before, after);
        }
    }
}
