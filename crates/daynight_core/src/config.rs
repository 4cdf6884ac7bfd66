//! Configuration for the day/night cycle.
//!
//! One value object holds every tunable: the clock, the day and night
//! light setups, the static sky parameters and the three sky color curves.
//! It is validated once when the cycle is built.
//!
//! Configs can be loaded from JSON. Every section is optional and falls
//! back to its defaults:
//!
//! ```ignore
//! let config = DayNightConfig::from_json_str(r#"{ "time": { "time": 20.0 } }"#)?;
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clock::{pick_rate, CycleSpeed, DayWindow, HOURS_PER_DAY};
use crate::curve::ColorCurve;
use crate::error::{DayNightError, DayNightResult};

/// Upper bound of the custom cycle length, in real minutes.
pub const MAX_CUSTOM_MINUTES: f32 = 60.0;

/// 8-bit sRGB color, as authored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub const WHITE: Rgb8 = Rgb8(255, 255, 255);

    pub fn to_linear(self) -> LinearRgba {
        Color::srgb_u8(self.0, self.1, self.2).to_linear()
    }
}

/// Clock settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    /// Initial time of day in hours, `[0, 24]`.
    pub time: f32,
    /// Initial day counter.
    pub day: u32,
    /// Sunrise, `[5, 7]`.
    pub start_day_time: f32,
    /// Sunset, `[16, 22]`.
    pub end_day_time: f32,
    pub cycle_speed: CycleSpeed,
    /// Length of a full cycle in real minutes when `cycle_speed` is
    /// `Custom`. Zero freezes the clock.
    pub custom_cycle_minutes: f32,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            time: 12.0,
            day: 0,
            start_day_time: 6.0,
            end_day_time: 18.0,
            cycle_speed: CycleSpeed::FiveMinutes,
            custom_cycle_minutes: 0.4,
        }
    }
}

impl TimeSettings {
    pub fn window(&self) -> DayWindow {
        DayWindow {
            start: self.start_day_time,
            end: self.end_day_time,
        }
    }

    /// Hours advanced per real second.
    pub fn rate(&self) -> f32 {
        pick_rate(self.cycle_speed, self.custom_cycle_minutes)
    }
}

/// Sun light and daytime atmosphere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySettings {
    pub sun_intensity: f32,
    pub sun_source_angle: f32,
    /// Yaw of the sun/moon axis in degrees.
    pub sun_yaw: f32,
    pub sun_temperature: f32,
    pub sun_color: Rgb8,
    pub rayleigh_scattering: Rgb8,
}

impl Default for DaySettings {
    fn default() -> Self {
        Self {
            sun_intensity: 5.0,
            sun_source_angle: 5.0,
            sun_yaw: 5.0,
            sun_temperature: 6000.0,
            sun_color: Rgb8::WHITE,
            rayleigh_scattering: Rgb8(99, 129, 204),
        }
    }
}

/// Moon light, moon disc and nighttime atmosphere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightSettings {
    pub moon_intensity: f32,
    /// Brightness of the moon disc in the sky material.
    pub moon_brightness: f32,
    pub moon_scale: f32,
    pub moon_rotation: f32,
    pub moon_temperature: f32,
    pub multi_scattering: f32,
    /// Color of the moon disc.
    pub moon_color: Rgb8,
    pub moon_light_color: Rgb8,
    pub rayleigh_scattering: Rgb8,
}

impl Default for NightSettings {
    fn default() -> Self {
        Self {
            moon_intensity: 1.0,
            moon_brightness: 0.1,
            moon_scale: 0.1,
            moon_rotation: 0.0,
            moon_temperature: 9000.0,
            multi_scattering: 0.5,
            moon_color: Rgb8::WHITE,
            moon_light_color: Rgb8(77, 96, 119),
            rayleigh_scattering: Rgb8(63, 76, 161),
        }
    }
}

/// Static sky material parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkySettings {
    pub cloud_speed: f32,
    pub cloud_opacity: f32,
    pub stars_brightness: f32,
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            cloud_speed: 0.1,
            cloud_opacity: 0.7,
            stars_brightness: 0.1,
        }
    }
}

/// Externally authored curves mapping sun height to sky colors.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyColorCurves {
    pub horizon: Option<ColorCurve>,
    pub zenith: Option<ColorCurve>,
    pub cloud: Option<ColorCurve>,
}

impl SkyColorCurves {
    /// Names of the curves that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("horizon", self.horizon.is_none()),
            ("zenith", self.zenith.is_none()),
            ("cloud", self.cloud.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Earth-like palette: deep blue night, orange horizon at dusk, pale
    /// blue noon.
    pub fn clear_sky() -> Self {
        let night = -3.0;
        let dusk = -0.5;
        let noon = 1.0;
        Self {
            horizon: Some(ColorCurve::from_keys(&[
                (night, LinearRgba::new(0.005, 0.008, 0.02, 1.0)),
                (-1.0, LinearRgba::new(0.05, 0.04, 0.08, 1.0)),
                (dusk, LinearRgba::new(0.9, 0.35, 0.12, 1.0)),
                (0.0, LinearRgba::new(0.85, 0.6, 0.45, 1.0)),
                (noon, LinearRgba::new(0.6, 0.75, 0.9, 1.0)),
            ])),
            zenith: Some(ColorCurve::from_keys(&[
                (night, LinearRgba::new(0.0, 0.002, 0.01, 1.0)),
                (dusk, LinearRgba::new(0.08, 0.1, 0.3, 1.0)),
                (noon, LinearRgba::new(0.1, 0.3, 0.8, 1.0)),
            ])),
            cloud: Some(ColorCurve::from_keys(&[
                (night, LinearRgba::new(0.02, 0.02, 0.04, 1.0)),
                (dusk, LinearRgba::new(0.8, 0.45, 0.3, 1.0)),
                (noon, LinearRgba::new(1.0, 1.0, 1.0, 1.0)),
            ])),
        }
    }
}

/// Every tunable of the cycle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    pub time: TimeSettings,
    pub day: DaySettings,
    pub night: NightSettings,
    pub sky: SkySettings,
    pub curves: SkyColorCurves,
}

impl DayNightConfig {
    /// Default settings with the clear sky palette.
    pub fn clear_sky() -> Self {
        Self::default().with_color_curves(SkyColorCurves::clear_sky())
    }

    pub fn with_time(mut self, time: f32) -> Self {
        self.time.time = time;
        self
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.time.day = day;
        self
    }

    pub fn with_day_window(mut self, start: f32, end: f32) -> Self {
        self.time.start_day_time = start;
        self.time.end_day_time = end;
        self
    }

    pub fn with_speed(mut self, speed: CycleSpeed) -> Self {
        self.time.cycle_speed = speed;
        self
    }

    /// Custom cycle length in real minutes.
    pub fn with_custom_minutes(mut self, minutes: f32) -> Self {
        self.time.cycle_speed = CycleSpeed::Custom;
        self.time.custom_cycle_minutes = minutes;
        self
    }

    pub fn with_color_curves(mut self, curves: SkyColorCurves) -> Self {
        self.curves = curves;
        self
    }

    pub fn window(&self) -> DayWindow {
        self.time.window()
    }

    /// Check ranges and ordering. Missing curves are not an error here;
    /// they only disable the animated sky.
    pub fn validate(&self) -> DayNightResult<()> {
        self.window().validate()?;

        let t = &self.time;
        if !(0.0..=HOURS_PER_DAY).contains(&t.time) {
            return Err(DayNightError::InvalidConfig(format!(
                "time {} is outside [0, 24]",
                t.time
            )));
        }
        if t.cycle_speed == CycleSpeed::Custom
            && !(0.0..=MAX_CUSTOM_MINUTES).contains(&t.custom_cycle_minutes)
        {
            return Err(DayNightError::InvalidConfig(format!(
                "custom cycle length {} is outside [0, {}] minutes",
                t.custom_cycle_minutes, MAX_CUSTOM_MINUTES
            )));
        }

        let non_negative = [
            ("sun_intensity", self.day.sun_intensity),
            ("sun_source_angle", self.day.sun_source_angle),
            ("sun_temperature", self.day.sun_temperature),
            ("moon_intensity", self.night.moon_intensity),
            ("moon_brightness", self.night.moon_brightness),
            ("moon_scale", self.night.moon_scale),
            ("moon_temperature", self.night.moon_temperature),
            ("multi_scattering", self.night.multi_scattering),
            ("cloud_speed", self.sky.cloud_speed),
            ("cloud_opacity", self.sky.cloud_opacity),
            ("stars_brightness", self.sky.stars_brightness),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| !(*v >= 0.0)) {
            return Err(DayNightError::InvalidConfig(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }

        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

/// Errors that can occur while loading a config.
#[derive(Debug)]
pub enum ConfigError {
    /// File system error
    Io(std::io::Error),
    /// JSON syntax or shape error
    Json(String),
    /// Parsed but failed validation
    Invalid(DayNightError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<DayNightError> for ConfigError {
    fn from(e: DayNightError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Result type for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
