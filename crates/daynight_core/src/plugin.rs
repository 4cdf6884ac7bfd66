//! Bevy integration.
//!
//! [`DayNightPlugin`] owns a [`DayNightSystem`] wired to recording sinks and
//! copies what lands in them onto the scene every frame:
//!
//! - entities tagged [`CelestialLight`] get their `DirectionalLight` color,
//!   illuminance and visibility
//! - entities tagged [`SunMoonAxis`] get the axis rotation
//! - `ClearColor` follows the zenith color, `DistanceFog` the horizon color
//!
//! Transitions are forwarded as [`PhaseChanged`] messages.
//!
//! # Example
//!
//! ```ignore
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(DayNightPlugin::new(DayNightConfig::clear_sky()))
//!     .run();
//! ```

use bevy::pbr::DistanceFog;
use bevy::prelude::*;

use crate::config::DayNightConfig;
use crate::error::DayNightResult;
use crate::events::PhaseEvent;
use crate::sinks::{SceneRecorder, Shared};
use crate::sky::params;
use crate::system::{DayNightSystem, SUGGESTED_TICK_INTERVAL};

/// Lux per unit of configured light intensity.
pub const ILLUMINANCE_PER_INTENSITY: f32 = 2000.0;

/// Sent once per day/night transition or new day.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChanged(pub PhaseEvent);

/// Which body a directional light represents.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CelestialLight {
    Sun,
    Moon,
}

/// The shared axis both lights hang from.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SunMoonAxis;

/// The running cycle and the values it last wrote.
#[derive(Resource)]
pub struct DayNightCycle {
    system: DayNightSystem,
    scene: SceneRecorder,
    pending: Shared<Vec<PhaseEvent>>,
    accumulator: f32,
}

impl DayNightCycle {
    pub fn new(config: DayNightConfig) -> DayNightResult<Self> {
        let scene = SceneRecorder::new();
        let mut system = DayNightSystem::new(config, scene.sinks())?;

        let pending = Shared::new(Vec::new());
        let queue = pending.clone();
        system.subscribe_all(move |event| queue.lock().push(event));

        Ok(Self {
            system,
            scene,
            pending,
            accumulator: 0.0,
        })
    }

    pub fn system(&self) -> &DayNightSystem {
        &self.system
    }

    /// Mutable access for setters and subscriptions.
    pub fn system_mut(&mut self) -> &mut DayNightSystem {
        &mut self.system
    }

    /// Values last written by the cycle.
    pub fn scene(&self) -> &SceneRecorder {
        &self.scene
    }

    /// Feed frame time and run every tick that fits. Returns the number of
    /// ticks run.
    pub fn advance(&mut self, delta: f32) -> u32 {
        if !self.system.is_ticking() {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += delta.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= SUGGESTED_TICK_INTERVAL {
            self.system.tick(SUGGESTED_TICK_INTERVAL);
            self.accumulator -= SUGGESTED_TICK_INTERVAL;
            ticks += 1;
        }
        ticks
    }

    /// Take the events fired since the last call.
    pub fn drain_events(&mut self) -> Vec<PhaseEvent> {
        std::mem::take(&mut *self.pending.lock())
    }
}

/// Blackbody tint for a color temperature, normalized so 6600 K is white.
pub fn kelvin_to_tint(kelvin: f32) -> LinearRgba {
    let t = kelvin.clamp(1000.0, 40000.0) / 100.0;

    let red = if t <= 66.0 {
        255.0
    } else {
        329.698_73 * (t - 60.0).powf(-0.133_204_76)
    };
    let green = if t <= 66.0 {
        99.470_8 * t.ln() - 161.119_57
    } else {
        288.122_17 * (t - 60.0).powf(-0.075_514_85)
    };
    let blue = if t >= 66.0 {
        255.0
    } else if t <= 19.0 {
        0.0
    } else {
        138.517_73 * (t - 10.0).ln() - 305.044_8
    };

    Color::srgb(
        red.clamp(0.0, 255.0) / 255.0,
        green.clamp(0.0, 255.0) / 255.0,
        blue.clamp(0.0, 255.0) / 255.0,
    )
    .to_linear()
}

/// System to tick the cycle at the suggested interval.
pub fn tick_day_night_cycle(time: Res<Time>, mut cycle: ResMut<DayNightCycle>) {
    cycle.advance(time.delta_secs());
}

/// System to forward queued transitions as messages.
pub fn forward_phase_events(
    mut cycle: ResMut<DayNightCycle>,
    mut messages: MessageWriter<PhaseChanged>,
) {
    for event in cycle.drain_events() {
        messages.write(PhaseChanged(event));
    }
}

/// System to copy light state onto tagged directional lights.
pub fn apply_celestial_lights(
    cycle: Res<DayNightCycle>,
    mut lights: Query<(&CelestialLight, &mut DirectionalLight, &mut Visibility)>,
) {
    if !cycle.is_changed() {
        return;
    }

    let sun = cycle.scene().sun.snapshot();
    let moon = cycle.scene().moon.snapshot();

    for (body, mut light, mut visibility) in &mut lights {
        let state = match body {
            CelestialLight::Sun => &sun,
            CelestialLight::Moon => &moon,
        };
        let tint = kelvin_to_tint(state.temperature);
        light.color = Color::LinearRgba(LinearRgba::new(
            state.color.red * tint.red,
            state.color.green * tint.green,
            state.color.blue * tint.blue,
            state.color.alpha,
        ));
        light.illuminance = state.intensity * ILLUMINANCE_PER_INTENSITY;
        *visibility = if state.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// System to rotate the sun/moon axis.
pub fn apply_axis_rotation(
    cycle: Res<DayNightCycle>,
    mut axes: Query<&mut Transform, With<SunMoonAxis>>,
) {
    if !cycle.is_changed() {
        return;
    }

    let rotation = cycle.scene().axis.snapshot().rotation.to_quat();
    for mut transform in &mut axes {
        transform.rotation = rotation;
    }
}

/// System to tint the clear color and fog from the sampled sky colors.
pub fn apply_sky_tint(
    cycle: Res<DayNightCycle>,
    clear_color: Option<ResMut<ClearColor>>,
    mut fogs: Query<&mut DistanceFog>,
) {
    if !cycle.is_changed() {
        return;
    }

    let sky = cycle.scene().sky.snapshot();
    if let (Some(zenith), Some(mut clear_color)) = (sky.vector(params::ZENITH_COLOR), clear_color) {
        clear_color.0 = Color::LinearRgba(zenith);
    }
    if let Some(horizon) = sky.vector(params::HORIZON_COLOR) {
        for mut fog in &mut fogs {
            fog.color = Color::LinearRgba(horizon);
        }
    }
}

/// Plugin that runs the day/night cycle.
pub struct DayNightPlugin {
    config: DayNightConfig,
}

impl DayNightPlugin {
    pub fn new(config: DayNightConfig) -> Self {
        Self { config }
    }
}

impl Default for DayNightPlugin {
    fn default() -> Self {
        Self::new(DayNightConfig::clear_sky())
    }
}

impl Plugin for DayNightPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PhaseChanged>();

        let cycle = match DayNightCycle::new(self.config.clone()) {
            Ok(cycle) => cycle,
            Err(e) => {
                error!("Day/night cycle disabled: {}", e);
                return;
            }
        };

        app.insert_resource(cycle).add_systems(
            Update,
            (
                tick_day_night_cycle,
                forward_phase_events,
                apply_celestial_lights,
                apply_axis_rotation,
                apply_sky_tint,
            )
                .chain(),
        );
    }
}
