//! Day/night cycle core for Day/Night Studio.
//!
//! This crate provides:
//! - A wrapped 24 hour clock with a Day/Night state machine
//! - Transition events (day, night, new day) with listener subscriptions
//! - Sun/moon axis orientation from the time of day
//! - A curve-driven sky parameter pipeline (sun height plus color curves)
//! - Sink traits the cycle writes into, with recording implementations
//! - JSON configuration
//! - A Bevy plugin that applies the cycle to lights, clear color and fog

pub mod clock;
pub mod config;
pub mod curve;
pub mod error;
pub mod events;
pub mod orientation;
pub mod plugin;
pub mod sinks;
pub mod sky;
pub mod sun_height;
pub mod system;

pub use clock::{pick_rate, Clock, CycleSpeed, DayWindow, Phase, HOURS_PER_DAY};
pub use config::{
    ConfigError, ConfigResult, DayNightConfig, DaySettings, NightSettings, Rgb8,
    SkyColorCurves, SkySettings, TimeSettings,
};
pub use curve::{ColorCurve, Curve, CurveKey, KeyHandle};
pub use error::{DayNightError, DayNightResult};
pub use events::{PhaseEvent, PhaseEventBus, SubscriptionId};
pub use orientation::{compute_axis_pitch, map_range_unclamped, AxisRotation, MOON_RELATIVE_PITCH};
pub use plugin::{
    apply_axis_rotation, apply_celestial_lights, apply_sky_tint, forward_phase_events,
    kelvin_to_tint, tick_day_night_cycle, CelestialLight, DayNightCycle, DayNightPlugin,
    PhaseChanged, SunMoonAxis,
};
pub use sinks::{
    AtmosphereSink, AtmosphereState, AxisState, DiagnosticLog, DiagnosticSink, LightSink,
    LightState, LogDiagnostics, MaterialParameterSink, OrientationTarget, SceneRecorder,
    SceneSinks, Shared, SkyParameters,
};
pub use sky::{horizon_falloff, SkyPipeline, SkySample};
pub use sun_height::build_sun_height_curve;
pub use system::{DayNightSystem, SUGGESTED_TICK_INTERVAL};
