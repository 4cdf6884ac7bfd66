//! Day/Night Studio demo.
//!
//! Runs the cycle over a small scene: a ground plane, a few cubes, a sun and
//! a moon hanging from one axis, and a camera with distance fog.
//!
//! Run with: `cargo run [-- config.json]`
//!
//! Keys:
//! - `N` jumps to the next hour
//! - `1`..`5` pick the 2/3/4/5/10 minute cycle

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use daynight_core::{
    CelestialLight, CycleSpeed, DayNightConfig, DayNightCycle, DayNightPlugin, PhaseChanged,
    PhaseEvent, SunMoonAxis, HOURS_PER_DAY,
};

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match DayNightConfig::load_json(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}, using the clear sky preset", path, e);
                DayNightConfig::clear_sky()
            }
        },
        None => DayNightConfig::clear_sky(),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: (1280, 720).into(),
                title: "Day/Night Studio".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(DayNightPlugin::new(config))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .add_systems(Startup, setup)
        .add_systems(Update, (keyboard_controls, log_phase_changes))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-12.0, 6.0, 18.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
        DistanceFog {
            color: Color::srgb(0.6, 0.7, 0.8),
            falloff: FogFalloff::Linear {
                start: 20.0,
                end: 120.0,
            },
            ..default()
        },
    ));

    // Moon hangs half a turn from the sun on the same axis
    commands
        .spawn((SunMoonAxis, Transform::default(), Visibility::default()))
        .with_children(|axis| {
            axis.spawn((
                CelestialLight::Sun,
                DirectionalLight {
                    shadows_enabled: true,
                    ..default()
                },
                Transform::default(),
            ));
            axis.spawn((
                CelestialLight::Moon,
                DirectionalLight::default(),
                Transform::from_rotation(Quat::from_rotation_x(std::f32::consts::PI)),
                Visibility::Hidden,
            ));
        });

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(80.0, 80.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.45, 0.25))),
    ));

    let cube = meshes.add(Cuboid::new(2.0, 2.0, 2.0));
    let stone = materials.add(Color::srgb(0.7, 0.68, 0.64));
    for (x, z) in [(-4.0, 0.0), (0.0, -3.0), (4.0, 2.0), (8.0, -10.0), (-10.0, -20.0)] {
        commands.spawn((
            Mesh3d(cube.clone()),
            MeshMaterial3d(stone.clone()),
            Transform::from_xyz(x, 1.0, z),
        ));
    }
}

fn keyboard_controls(keys: Res<ButtonInput<KeyCode>>, cycle: Option<ResMut<DayNightCycle>>) {
    let Some(mut cycle) = cycle else {
        return;
    };

    if keys.just_pressed(KeyCode::KeyN) {
        let next = (cycle.system().time().floor() + 1.0) % HOURS_PER_DAY;
        if let Err(e) = cycle.system_mut().set_time(next) {
            warn!("{}", e);
        }
    }

    let speeds = [
        (KeyCode::Digit1, CycleSpeed::TwoMinutes),
        (KeyCode::Digit2, CycleSpeed::ThreeMinutes),
        (KeyCode::Digit3, CycleSpeed::FourMinutes),
        (KeyCode::Digit4, CycleSpeed::FiveMinutes),
        (KeyCode::Digit5, CycleSpeed::TenMinutes),
    ];
    for (key, speed) in speeds {
        if keys.just_pressed(key) && cycle.system_mut().set_speed(speed, 0.0).is_ok() {
            info!("Cycle speed: {}", speed.label());
        }
    }
}

fn log_phase_changes(mut messages: MessageReader<PhaseChanged>, cycle: Option<Res<DayNightCycle>>) {
    let Some(cycle) = cycle else {
        return;
    };
    for PhaseChanged(event) in messages.read() {
        let system = cycle.system();
        match event {
            PhaseEvent::EnteredDay => info!("Sunrise on day {}", system.day()),
            PhaseEvent::EnteredNight => info!("Sunset on day {}", system.day()),
            PhaseEvent::NewDay => info!("Day {} begins", system.day()),
        }
    }
}
