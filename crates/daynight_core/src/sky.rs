//! Sky material parameter pipeline.
//!
//! Each tick the sun-height curve is sampled at the current time, the three
//! color curves are sampled at that height, and the results are written to
//! the sky material together with a horizon falloff derived from the
//! height.

use bevy::prelude::*;

use crate::clock::DayWindow;
use crate::config::{NightSettings, SkyColorCurves, SkySettings};
use crate::curve::{ColorCurve, Curve};
use crate::sinks::MaterialParameterSink;
use crate::sun_height::build_sun_height_curve;

/// Material parameter names.
pub mod params {
    pub const HORIZON_COLOR: &str = "HorizonColor";
    pub const ZENITH_COLOR: &str = "ZenithColor";
    pub const CLOUD_COLOR: &str = "CloudColor";
    pub const HORIZON_FALLOFF: &str = "HorizonFalloff";
    pub const SUN_HEIGHT: &str = "SunHeight";
    pub const CLOUD_OPACITY: &str = "CloudOpacity";
    pub const CLOUD_SPEED: &str = "CloudSpeed";
    pub const STARS_BRIGHTNESS: &str = "StarsBrightness";
    pub const MOON_BRIGHTNESS: &str = "MoonBrightness";
    pub const MOON_SCALE: &str = "MoonScale";
    pub const MOON_ROTATION: &str = "MoonRotation";
    pub const MOON_COLOR: &str = "MoonColor";
}

/// Falloff at the horizon when the sun is at height zero.
const MIN_HORIZON_FALLOFF: f32 = 3.0;
/// Falloff reached at `|sun height| == 1`.
const MAX_HORIZON_FALLOFF: f32 = 7.0;

/// `lerp(3, 7, |sun_height|)`, unclamped like the height itself.
pub fn horizon_falloff(sun_height: f32) -> f32 {
    MIN_HORIZON_FALLOFF + (MAX_HORIZON_FALLOFF - MIN_HORIZON_FALLOFF) * sun_height.abs()
}

/// Values derived from the curves at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkySample {
    pub sun_height: f32,
    pub horizon_color: LinearRgba,
    pub zenith_color: LinearRgba,
    pub cloud_color: LinearRgba,
    pub horizon_falloff: f32,
}

impl SkySample {
    pub fn write_to(&self, sink: &mut dyn MaterialParameterSink) {
        sink.set_vector(params::HORIZON_COLOR, self.horizon_color);
        sink.set_vector(params::ZENITH_COLOR, self.zenith_color);
        sink.set_vector(params::CLOUD_COLOR, self.cloud_color);
        sink.set_scalar(params::HORIZON_FALLOFF, self.horizon_falloff);
        sink.set_scalar(params::SUN_HEIGHT, self.sun_height);
    }
}

/// The three color curves, all present.
#[derive(Clone, Debug)]
struct SkyPalette {
    horizon: ColorCurve,
    zenith: ColorCurve,
    cloud: ColorCurve,
}

/// Sun-height curve plus the color curves sampled by it.
#[derive(Clone, Debug)]
pub struct SkyPipeline {
    sun_height: Curve,
    palette: Option<SkyPalette>,
    missing: Vec<&'static str>,
}

impl SkyPipeline {
    pub fn new(window: &DayWindow, curves: &SkyColorCurves) -> Self {
        let palette = match (&curves.horizon, &curves.zenith, &curves.cloud) {
            (Some(horizon), Some(zenith), Some(cloud)) => Some(SkyPalette {
                horizon: horizon.clone(),
                zenith: zenith.clone(),
                cloud: cloud.clone(),
            }),
            _ => None,
        };
        Self {
            sun_height: build_sun_height_curve(window),
            palette,
            missing: curves.missing(),
        }
    }

    /// Rebuild the sun-height curve for a new day window.
    pub fn rebuild(&mut self, window: &DayWindow) {
        self.sun_height = build_sun_height_curve(window);
    }

    /// Whether all color curves are present.
    pub fn has_palette(&self) -> bool {
        self.palette.is_some()
    }

    /// Names of the missing color curves.
    pub fn missing_curves(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn sun_height_curve(&self) -> &Curve {
        &self.sun_height
    }

    pub fn sun_height(&self, time: f32) -> f32 {
        self.sun_height.evaluate(time)
    }

    /// Sample everything at `time`. `None` without a full palette.
    pub fn sample(&self, time: f32) -> Option<SkySample> {
        let palette = self.palette.as_ref()?;
        let sun_height = self.sun_height(time);
        Some(SkySample {
            sun_height,
            horizon_color: palette.horizon.evaluate_clamped(sun_height),
            zenith_color: palette.zenith.evaluate_clamped(sun_height),
            cloud_color: palette.cloud.evaluate_clamped(sun_height),
            horizon_falloff: horizon_falloff(sun_height),
        })
    }

    /// Parameters that only change with the configuration.
    pub fn write_static(
        sky: &SkySettings,
        night: &NightSettings,
        sink: &mut dyn MaterialParameterSink,
    ) {
        sink.set_scalar(params::CLOUD_OPACITY, sky.cloud_opacity);
        sink.set_scalar(params::CLOUD_SPEED, sky.cloud_speed);
        sink.set_scalar(params::STARS_BRIGHTNESS, sky.stars_brightness);
        sink.set_scalar(params::MOON_BRIGHTNESS, night.moon_brightness);
        sink.set_scalar(params::MOON_SCALE, night.moon_scale);
        sink.set_scalar(params::MOON_ROTATION, night.moon_rotation);
        sink.set_vector(params::MOON_COLOR, night.moon_color.to_linear());
    }
}
