//! The day/night cycle driver.
//!
//! [`DayNightSystem`] owns the clock, the sky pipeline and the sinks. The
//! host calls [`DayNightSystem::tick`] at a steady interval; everything
//! else (transition events, light swaps, axis rotation, sky sampling)
//! happens synchronously inside that call.
//!
//! # Example
//!
//! ```ignore
//! use daynight_core::{DayNightConfig, DayNightSystem, PhaseEvent, SceneRecorder};
//!
//! let recorder = SceneRecorder::new();
//! let mut cycle = DayNightSystem::new(DayNightConfig::clear_sky(), recorder.sinks())?;
//! cycle.subscribe(PhaseEvent::EnteredNight, |_| println!("spawn the wolves"));
//! cycle.tick(0.03);
//! ```

use bevy::prelude::*;

use crate::clock::{pick_rate, Clock, CycleSpeed, DayWindow, Phase, RATE_EPSILON};
use crate::config::{DayNightConfig, MAX_CUSTOM_MINUTES};
use crate::error::{DayNightError, DayNightResult};
use crate::events::{PhaseEvent, PhaseEventBus, SubscriptionId};
use crate::orientation::AxisRotation;
use crate::sinks::SceneSinks;
use crate::sky::{SkyPipeline, SkySample};

/// Suggested interval between ticks, in seconds.
pub const SUGGESTED_TICK_INTERVAL: f32 = 0.03;

/// Day/night state machine wired to its output sinks.
pub struct DayNightSystem {
    config: DayNightConfig,
    window: DayWindow,
    clock: Clock,
    /// Hours per real second.
    rate: f32,
    ticking: bool,
    sky: SkyPipeline,
    /// Sky sampling runs only when the palette and material are present.
    sky_valid: bool,
    sinks: SceneSinks,
    events: PhaseEventBus,
}

impl DayNightSystem {
    /// Validate the config and push the initial state into the sinks.
    ///
    /// Missing sky curves or material are reported but not fatal: the
    /// cycle runs with a static sky.
    pub fn new(config: DayNightConfig, mut sinks: SceneSinks) -> DayNightResult<Self> {
        if let Err(e) = config.validate() {
            sinks.diagnostics.report(&e.to_string());
            return Err(e);
        }

        let window = config.window();
        let rate = config.time.rate();
        let mut system = Self {
            clock: Clock::new(config.time.time, config.time.day, &window),
            sky: SkyPipeline::new(&window, &config.curves),
            ticking: rate.abs() > RATE_EPSILON,
            sky_valid: false,
            window,
            rate,
            config,
            sinks,
            events: PhaseEventBus::new(),
        };
        system.setup();

        info!(
            "Day/night cycle ready: {:.2}h on day {}, {:?}, {} h/s",
            system.clock.time(),
            system.clock.day(),
            system.clock.phase(),
            system.rate
        );
        Ok(system)
    }

    fn setup(&mut self) {
        self.apply_sun_settings();
        self.apply_moon_settings();
        self.apply_phase(self.clock.phase());
        self.update_orientation();
        self.setup_sky_material();
    }

    /// Advance the clock by `delta` real seconds.
    ///
    /// Runs at most one transition per call, then re-orients the lights and
    /// re-samples the sky. Does nothing while the clock is frozen.
    pub fn tick(&mut self, delta: f32) {
        if !self.ticking {
            return;
        }

        if let Some(event) = self.clock.advance(self.rate, delta, &self.window) {
            self.broadcast(event);
            match event {
                PhaseEvent::EnteredNight => self.apply_phase(Phase::Night),
                PhaseEvent::EnteredDay => self.apply_phase(Phase::Day),
                PhaseEvent::NewDay => debug!("Day {} began", self.clock.day()),
            }
        }

        self.update_orientation();
        self.update_sky();
    }

    /// Jump to `new_time` hours, `[0, 24]`.
    ///
    /// Jumping backwards counts as passing midnight. Events implied by the
    /// jump fire before the phase parameters are re-applied.
    pub fn set_time(&mut self, new_time: f32) -> DayNightResult<()> {
        let events = match self.clock.set_time(new_time, &self.window) {
            Ok(events) => events,
            Err(e) => return Err(self.report(e)),
        };

        for event in events {
            self.broadcast(event);
        }
        self.apply_phase(self.clock.phase());
        self.update_orientation();
        self.update_sky();
        Ok(())
    }

    /// Overwrite the day counter. Negative days are rejected.
    pub fn set_day(&mut self, new_day: i64) -> DayNightResult<()> {
        self.clock.set_day(new_day).map_err(|e| self.report(e))
    }

    /// Move sunrise and sunset. Rebuilds the sun-height curve and re-derives
    /// the phase without firing events.
    pub fn set_day_window(&mut self, start: f32, end: f32) -> DayNightResult<()> {
        let window = DayWindow::new(start, end).map_err(|e| self.report(e))?;

        self.window = window;
        self.config.time.start_day_time = start;
        self.config.time.end_day_time = end;
        self.sky.rebuild(&window);

        let phase = self.clock.resync_phase(&window);
        self.apply_phase(phase);
        self.update_orientation();
        self.update_sky();
        Ok(())
    }

    /// Pick a new cycle speed. A zero rate freezes the clock.
    pub fn set_speed(&mut self, speed: CycleSpeed, custom_minutes: f32) -> DayNightResult<()> {
        if speed == CycleSpeed::Custom && !(0.0..=MAX_CUSTOM_MINUTES).contains(&custom_minutes) {
            return Err(self.report(DayNightError::InvalidConfig(format!(
                "custom cycle length {} is outside [0, {}] minutes",
                custom_minutes, MAX_CUSTOM_MINUTES
            ))));
        }

        self.config.time.cycle_speed = speed;
        self.config.time.custom_cycle_minutes = custom_minutes;
        self.rate = pick_rate(speed, custom_minutes);
        self.ticking = self.rate.abs() > RATE_EPSILON;
        Ok(())
    }

    pub fn subscribe<F>(&mut self, event: PhaseEvent, listener: F) -> SubscriptionId
    where
        F: FnMut(PhaseEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(event, listener)
    }

    pub fn subscribe_all<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(PhaseEvent) + Send + Sync + 'static,
    {
        self.events.subscribe_all(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Current time of day in hours.
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    pub fn is_day(&self) -> bool {
        self.clock.is_day()
    }

    /// Hours advanced per real second.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// False when the rate is zero and ticks are skipped.
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// Whether the animated sky is active.
    pub fn sky_valid(&self) -> bool {
        self.sky_valid
    }

    pub fn window(&self) -> DayWindow {
        self.window
    }

    pub fn config(&self) -> &DayNightConfig {
        &self.config
    }

    /// Sun height at the current time.
    pub fn sun_height(&self) -> f32 {
        self.sky.sun_height(self.clock.time())
    }

    /// Sky sample at the current time, if the palette is complete.
    pub fn sky_sample(&self) -> Option<SkySample> {
        self.sky.sample(self.clock.time())
    }

    pub fn axis_rotation(&self) -> AxisRotation {
        AxisRotation::at(
            self.clock.time(),
            self.clock.phase(),
            &self.window,
            self.config.day.sun_yaw,
        )
    }

    fn broadcast(&mut self, event: PhaseEvent) {
        debug!("{:?} at {:.2}h", event, self.clock.time());
        self.events.broadcast(event);
    }

    fn report(&mut self, error: DayNightError) -> DayNightError {
        self.sinks.diagnostics.report(&error.to_string());
        error
    }

    /// Swap light visibility and atmosphere for the phase.
    fn apply_phase(&mut self, phase: Phase) {
        let atmosphere = &mut self.sinks.atmosphere;
        match phase {
            Phase::Day => {
                atmosphere.set_rayleigh_scattering(self.config.day.rayleigh_scattering.to_linear());
                atmosphere.set_multi_scattering_factor(1.0);
                self.sinks.sun.set_visible(true);
                self.sinks.moon.set_visible(false);
            }
            Phase::Night => {
                atmosphere
                    .set_rayleigh_scattering(self.config.night.rayleigh_scattering.to_linear());
                atmosphere.set_multi_scattering_factor(self.config.night.multi_scattering);
                self.sinks.moon.set_visible(true);
                self.sinks.sun.set_visible(false);
            }
        }
        self.clock.set_phase(phase);
    }

    fn apply_sun_settings(&mut self) {
        let day = &self.config.day;
        let sun = &mut self.sinks.sun;
        sun.set_color(day.sun_color.to_linear());
        sun.set_temperature(day.sun_temperature);
        sun.set_source_angle(day.sun_source_angle);
        sun.set_intensity(day.sun_intensity);
    }

    fn apply_moon_settings(&mut self) {
        let night = &self.config.night;
        let moon = &mut self.sinks.moon;
        moon.set_color(night.moon_light_color.to_linear());
        moon.set_temperature(night.moon_temperature);
        moon.set_intensity(night.moon_intensity);
    }

    fn update_orientation(&mut self) {
        let rotation = self.axis_rotation();
        self.sinks.axis.set_rotation(rotation);
    }

    fn setup_sky_material(&mut self) {
        if !self.sky.has_palette() {
            let missing = self.sky.missing_curves().to_vec();
            self.report(DayNightError::MissingCurves(missing));
        }
        if self.sinks.sky_material.is_none() {
            self.report(DayNightError::MissingSkyMaterial);
        }

        if let Some(material) = self.sinks.sky_material.as_deref_mut() {
            SkyPipeline::write_static(&self.config.sky, &self.config.night, material);
        }

        self.sky_valid = self.sky.has_palette() && self.sinks.sky_material.is_some();
        self.update_sky();
    }

    fn update_sky(&mut self) {
        if !self.sky_valid {
            return;
        }
        let Some(sample) = self.sky.sample(self.clock.time()) else {
            return;
        };
        if let Some(material) = self.sinks.sky_material.as_deref_mut() {
            sample.write_to(material);
        }
    }
}

impl std::fmt::Debug for DayNightSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayNightSystem")
            .field("clock", &self.clock)
            .field("window", &self.window)
            .field("rate", &self.rate)
            .field("ticking", &self.ticking)
            .field("sky_valid", &self.sky_valid)
            .field("events", &self.events)
            .finish()
    }
}
