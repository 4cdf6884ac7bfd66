//! Narrow capability interfaces the cycle writes into.
//!
//! The cycle never touches render objects directly. A host hands it a
//! [`SceneSinks`] bundle at construction and applies whatever lands there
//! to its own lights, atmosphere and sky material. The recording types in
//! this module keep the last written values, and [`Shared`] lets a host
//! keep a read handle on a sink it gave away.

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::orientation::AxisRotation;

/// A directional light (sun or moon).
pub trait LightSink: Send + Sync {
    fn set_color(&mut self, color: LinearRgba);
    /// Color temperature in Kelvin.
    fn set_temperature(&mut self, kelvin: f32);
    fn set_intensity(&mut self, intensity: f32);
    fn set_visible(&mut self, visible: bool);
    /// Angular diameter of the light source in degrees.
    fn set_source_angle(&mut self, degrees: f32);
}

/// Atmospheric scattering settings.
pub trait AtmosphereSink: Send + Sync {
    fn set_rayleigh_scattering(&mut self, color: LinearRgba);
    fn set_multi_scattering_factor(&mut self, factor: f32);
}

/// Named parameters of the sky material.
pub trait MaterialParameterSink: Send + Sync {
    fn set_scalar(&mut self, name: &str, value: f32);
    fn set_vector(&mut self, name: &str, value: LinearRgba);
}

/// The shared sun/moon axis.
pub trait OrientationTarget: Send + Sync {
    fn set_rotation(&mut self, rotation: AxisRotation);
}

/// Where human-readable errors go.
pub trait DiagnosticSink: Send + Sync {
    fn report(&mut self, message: &str);
}

/// Last values written to a light.
#[derive(Clone, Debug, PartialEq)]
pub struct LightState {
    pub color: LinearRgba,
    pub temperature: f32,
    pub intensity: f32,
    pub visible: bool,
    pub source_angle: f32,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            color: LinearRgba::WHITE,
            temperature: 6500.0,
            intensity: 0.0,
            visible: false,
            source_angle: 0.5357,
        }
    }
}

impl LightSink for LightState {
    fn set_color(&mut self, color: LinearRgba) {
        self.color = color;
    }

    fn set_temperature(&mut self, kelvin: f32) {
        self.temperature = kelvin;
    }

    fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_source_angle(&mut self, degrees: f32) {
        self.source_angle = degrees;
    }
}

/// Last values written to the atmosphere.
#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereState {
    pub rayleigh_scattering: LinearRgba,
    pub multi_scattering_factor: f32,
}

impl Default for AtmosphereState {
    fn default() -> Self {
        Self {
            rayleigh_scattering: LinearRgba::BLACK,
            multi_scattering_factor: 1.0,
        }
    }
}

impl AtmosphereSink for AtmosphereState {
    fn set_rayleigh_scattering(&mut self, color: LinearRgba) {
        self.rayleigh_scattering = color;
    }

    fn set_multi_scattering_factor(&mut self, factor: f32) {
        self.multi_scattering_factor = factor;
    }
}

/// Named sky material parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkyParameters {
    pub scalars: HashMap<String, f32>,
    pub vectors: HashMap<String, LinearRgba>,
}

impl SkyParameters {
    pub fn scalar(&self, name: &str) -> Option<f32> {
        self.scalars.get(name).copied()
    }

    pub fn vector(&self, name: &str) -> Option<LinearRgba> {
        self.vectors.get(name).copied()
    }
}

impl MaterialParameterSink for SkyParameters {
    fn set_scalar(&mut self, name: &str, value: f32) {
        self.scalars.insert(name.to_string(), value);
    }

    fn set_vector(&mut self, name: &str, value: LinearRgba) {
        self.vectors.insert(name.to_string(), value);
    }
}

/// Last rotation written to the axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisState {
    pub rotation: AxisRotation,
}

impl OrientationTarget for AxisState {
    fn set_rotation(&mut self, rotation: AxisRotation) {
        self.rotation = rotation;
    }
}

/// Sends diagnostics to the log at error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn report(&mut self, message: &str) {
        error!("{}", message);
    }
}

/// Keeps every reported message, and logs it too.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    pub messages: Vec<String>,
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&mut self, message: &str) {
        error!("{}", message);
        self.messages.push(message.to_string());
    }
}

/// A sink shared between the cycle and its host.
#[derive(Debug, Default)]
pub struct Shared<T>(Arc<Mutex<T>>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(Mutex::new(value)))
    }

    /// Lock the inner value. A poisoned lock still yields the data; the
    /// sinks hold plain values that stay consistent across a panic.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Shared<T> {
    pub fn snapshot(&self) -> T {
        self.lock().clone()
    }
}

impl<T: LightSink> LightSink for Shared<T> {
    fn set_color(&mut self, color: LinearRgba) {
        self.lock().set_color(color);
    }

    fn set_temperature(&mut self, kelvin: f32) {
        self.lock().set_temperature(kelvin);
    }

    fn set_intensity(&mut self, intensity: f32) {
        self.lock().set_intensity(intensity);
    }

    fn set_visible(&mut self, visible: bool) {
        self.lock().set_visible(visible);
    }

    fn set_source_angle(&mut self, degrees: f32) {
        self.lock().set_source_angle(degrees);
    }
}

impl<T: AtmosphereSink> AtmosphereSink for Shared<T> {
    fn set_rayleigh_scattering(&mut self, color: LinearRgba) {
        self.lock().set_rayleigh_scattering(color);
    }

    fn set_multi_scattering_factor(&mut self, factor: f32) {
        self.lock().set_multi_scattering_factor(factor);
    }
}

impl<T: MaterialParameterSink> MaterialParameterSink for Shared<T> {
    fn set_scalar(&mut self, name: &str, value: f32) {
        self.lock().set_scalar(name, value);
    }

    fn set_vector(&mut self, name: &str, value: LinearRgba) {
        self.lock().set_vector(name, value);
    }
}

impl<T: OrientationTarget> OrientationTarget for Shared<T> {
    fn set_rotation(&mut self, rotation: AxisRotation) {
        self.lock().set_rotation(rotation);
    }
}

impl<T: DiagnosticSink> DiagnosticSink for Shared<T> {
    fn report(&mut self, message: &str) {
        self.lock().report(message);
    }
}

/// Everything the cycle writes into.
pub struct SceneSinks {
    pub sun: Box<dyn LightSink>,
    pub moon: Box<dyn LightSink>,
    pub atmosphere: Box<dyn AtmosphereSink>,
    pub axis: Box<dyn OrientationTarget>,
    /// `None` leaves the sky static.
    pub sky_material: Option<Box<dyn MaterialParameterSink>>,
    pub diagnostics: Box<dyn DiagnosticSink>,
}

impl SceneSinks {
    /// Sinks that drop everything except diagnostics, which are logged.
    pub fn detached() -> Self {
        Self {
            sun: Box::new(LightState::default()),
            moon: Box::new(LightState::default()),
            atmosphere: Box::new(AtmosphereState::default()),
            axis: Box::new(AxisState::default()),
            sky_material: Some(Box::new(SkyParameters::default())),
            diagnostics: Box::new(LogDiagnostics),
        }
    }
}

/// Read handles on a [`SceneSinks`] built from shared recording sinks.
#[derive(Clone, Debug, Default)]
pub struct SceneRecorder {
    pub sun: Shared<LightState>,
    pub moon: Shared<LightState>,
    pub atmosphere: Shared<AtmosphereState>,
    pub axis: Shared<AxisState>,
    pub sky: Shared<SkyParameters>,
    pub diagnostics: Shared<DiagnosticLog>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sinks writing into this recorder.
    pub fn sinks(&self) -> SceneSinks {
        self.sinks_with_material(true)
    }

    /// Sinks writing into this recorder, optionally without a sky material.
    pub fn sinks_with_material(&self, with_material: bool) -> SceneSinks {
        SceneSinks {
            sun: Box::new(self.sun.clone()),
            moon: Box::new(self.moon.clone()),
            atmosphere: Box::new(self.atmosphere.clone()),
            axis: Box::new(self.axis.clone()),
            sky_material: with_material
                .then(|| Box::new(self.sky.clone()) as Box<dyn MaterialParameterSink>),
            diagnostics: Box::new(self.diagnostics.clone()),
        }
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.lock().messages.clone()
    }
}
