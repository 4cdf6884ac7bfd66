use daynight_core::{
    build_sun_height_curve, CycleSpeed, DayNightConfig, DayNightError, DayNightSystem, DayWindow,
    Phase, PhaseEvent, SceneRecorder, SUGGESTED_TICK_INTERVAL,
};
use std::sync::{Arc, Mutex};

fn start(config: DayNightConfig) -> (DayNightSystem, SceneRecorder, Arc<Mutex<Vec<PhaseEvent>>>) {
    let recorder = SceneRecorder::new();
    let mut system = DayNightSystem::new(config, recorder.sinks()).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let log = events.clone();
    system.subscribe_all(move |e| log.lock().unwrap().push(e));

    (system, recorder, events)
}

fn count(events: &Arc<Mutex<Vec<PhaseEvent>>>, kind: PhaseEvent) -> usize {
    events.lock().unwrap().iter().filter(|e| **e == kind).count()
}

/// Smallest distance between two angles in degrees.
fn angle_gap(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[test]
fn test_noon_scenario() {
    let (system, recorder, _) = start(DayNightConfig::clear_sky());

    assert_eq!(system.phase(), Phase::Day);
    assert!((system.axis_rotation().pitch - 270.0).abs() < 1e-3);
    assert_eq!(system.sun_height(), 1.0);
    assert!((recorder.axis.snapshot().rotation.pitch - 270.0).abs() < 1e-3);
}

#[test]
fn test_sunset_fires_entered_night_once() {
    let config = DayNightConfig::clear_sky()
        .with_time(17.99)
        .with_speed(CycleSpeed::TwoMinutes);
    let (mut system, recorder, events) = start(config);

    // 0.2 h/s * 0.1 s = 0.02 h
    system.tick(0.1);
    assert!((system.time() - 18.01).abs() < 1e-4);
    assert!(!system.is_day());
    assert_eq!(*events.lock().unwrap(), vec![PhaseEvent::EnteredNight]);

    for _ in 0..20 {
        system.tick(SUGGESTED_TICK_INTERVAL);
    }
    assert_eq!(count(&events, PhaseEvent::EnteredNight), 1);
    assert!(recorder.moon.snapshot().visible);
}

#[test]
fn test_sunrise_fires_entered_day_once() {
    let config = DayNightConfig::clear_sky()
        .with_time(5.9)
        .with_speed(CycleSpeed::TwoMinutes);
    let (mut system, recorder, events) = start(config);

    for _ in 0..100 {
        system.tick(SUGGESTED_TICK_INTERVAL);
    }

    assert!(system.is_day());
    assert_eq!(*events.lock().unwrap(), vec![PhaseEvent::EnteredDay]);
    assert!(recorder.sun.snapshot().visible);
    assert!(!recorder.moon.snapshot().visible);
}

#[test]
fn test_midnight_resets_time_to_zero() {
    let config = DayNightConfig::clear_sky().with_time(23.9).with_day(4);
    let (mut system, _, events) = start(config);

    // 0.08 h/s * 2.5 s = 0.2 h
    system.tick(2.5);

    assert_eq!(system.day(), 5);
    assert_eq!(system.time(), 0.0);
    assert_eq!(*events.lock().unwrap(), vec![PhaseEvent::NewDay]);
}

#[test]
fn test_set_time_rollover_before_sunrise() {
    let (mut system, _, events) = start(DayNightConfig::clear_sky().with_time(10.0));

    system.set_time(5.0).unwrap();

    assert_eq!(system.day(), 1);
    assert_eq!(system.phase(), Phase::Night);
    assert_eq!(
        *events.lock().unwrap(),
        vec![PhaseEvent::EnteredDay, PhaseEvent::EnteredNight]
    );
}

#[test]
fn test_set_time_rollover_in_daylight() {
    let (mut system, _, events) = start(DayNightConfig::clear_sky().with_time(15.0));

    system.set_time(9.0).unwrap();

    assert_eq!(system.day(), 1);
    assert!(system.is_day());
    assert_eq!(*events.lock().unwrap(), vec![PhaseEvent::EnteredNight]);
}

#[test]
fn test_set_time_forward_jumps() {
    let (mut system, _, events) = start(DayNightConfig::clear_sky().with_time(3.0));

    system.set_time(8.0).unwrap();
    assert!(system.is_day());
    assert_eq!(*events.lock().unwrap(), vec![PhaseEvent::EnteredDay]);

    system.set_time(19.0).unwrap();
    assert!(!system.is_day());
    assert_eq!(
        *events.lock().unwrap(),
        vec![PhaseEvent::EnteredDay, PhaseEvent::EnteredNight]
    );
    assert_eq!(system.day(), 0);
}

#[test]
fn test_set_time_accepts_closed_range() {
    let (mut system, _, _) = start(DayNightConfig::clear_sky());
    for t in [0.0, 6.0, 12.0, 18.0, 24.0] {
        assert!(system.set_time(t).is_ok(), "t={}", t);
    }
}

#[test]
fn test_invalid_input_leaves_state_unchanged() {
    let (mut system, recorder, events) = start(DayNightConfig::clear_sky().with_time(14.0).with_day(2));

    for bad in [-0.1, 24.01, 100.0] {
        assert_eq!(system.set_time(bad), Err(DayNightError::InvalidTime(bad)));
    }
    assert_eq!(system.set_day(-1), Err(DayNightError::InvalidDay(-1)));

    assert_eq!(system.time(), 14.0);
    assert_eq!(system.day(), 2);
    assert!(system.is_day());
    assert!(events.lock().unwrap().is_empty());
    assert_eq!(recorder.diagnostics().len(), 4);

    system.set_day(9).unwrap();
    assert_eq!(system.day(), 9);
}

#[test]
fn test_time_never_goes_backwards() {
    let config = DayNightConfig::clear_sky()
        .with_time(0.5)
        .with_speed(CycleSpeed::TwoMinutes);
    let (mut system, _, _) = start(config);

    let deltas = [0.0, 0.016, 0.03, 0.05, 0.1, 0.001, 0.033];
    let mut previous = (system.day(), system.time());
    for i in 0..20_000 {
        system.tick(deltas[i % deltas.len()]);
        let now = (system.day(), system.time());
        assert!((0.0..=24.0).contains(&now.1));
        if now.0 == previous.0 {
            assert!(now.1 >= previous.1, "{:?} -> {:?}", previous, now);
        } else {
            assert_eq!(now, (previous.0 + 1, 0.0));
        }
        previous = now;
    }
    assert!(system.day() >= 1);
}

#[test]
fn test_pitch_is_continuous_when_phase_flips() {
    for (start_day, end_day) in [(6.0, 18.0), (5.0, 21.0), (7.0, 16.5)] {
        let config = DayNightConfig::clear_sky()
            .with_day_window(start_day, end_day)
            .with_time(start_day - 0.5)
            .with_speed(CycleSpeed::TwoMinutes);
        let (mut system, _, _) = start(config);

        let mut flips = 0;
        let mut phase = system.phase();
        let mut pitch = system.axis_rotation().pitch;
        // One full day at 0.006 h per tick
        for _ in 0..4000 {
            system.tick(SUGGESTED_TICK_INTERVAL);
            let next_pitch = system.axis_rotation().pitch;
            if system.phase() != phase {
                flips += 1;
                assert!(
                    angle_gap(pitch, next_pitch) < 0.5,
                    "window {}-{}: {} -> {} at {}",
                    start_day,
                    end_day,
                    pitch,
                    next_pitch,
                    system.time()
                );
            }
            phase = system.phase();
            pitch = next_pitch;
        }
        assert!(flips >= 2);
    }
}

#[test]
fn test_sun_height_anchors() {
    for window in [DayWindow::default(), DayWindow::new(5.5, 20.0).unwrap()] {
        let curve = build_sun_height_curve(&window);
        assert_eq!(curve.evaluate(window.start), -0.5);
        assert_eq!(curve.evaluate(window.end), -0.5);
        assert_eq!(curve.evaluate(window.midday()), 1.0);
    }
}

#[test]
fn test_listeners_run_in_subscription_order() {
    let config = DayNightConfig::clear_sky()
        .with_time(17.99)
        .with_speed(CycleSpeed::TwoMinutes);
    let recorder = SceneRecorder::new();
    let mut system = DayNightSystem::new(config, recorder.sinks()).unwrap();

    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let order = order.clone();
        system.subscribe(PhaseEvent::EnteredNight, move |_| order.lock().unwrap().push(name));
    }
    let ignored = order.clone();
    system.subscribe(PhaseEvent::EnteredDay, move |_| ignored.lock().unwrap().push("day"));

    system.tick(0.1);
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}
