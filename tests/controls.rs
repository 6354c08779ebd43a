use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use climate_panel::dial::{AngularGestureMapper, GuardedValueUpdater};
use climate_panel::slider::LinearGestureMapper;
use climate_panel::{
    AnimatedProgress, ClimateCommand, ClimateConfig, ClimateToggle, PanelLayout, SpringProfile,
    ValueRange,
};

fn stock_mapper() -> AngularGestureMapper {
    AngularGestureMapper::new(13.0, 5.0).unwrap()
}

#[test]
fn angular_progress_stays_in_unit_interval() {
    let mapper = stock_mapper();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..2000 {
        let dx = rng.random_range(-500.0..500.0);
        let dy = rng.random_range(-500.0..500.0);
        let p = mapper.progress(dx, dy);
        assert!((0.0..=1.0).contains(&p), "progress {p} for ({dx}, {dy})");
    }
    assert_eq!(mapper.progress(f64::NAN, 1.0), 0.0);
    assert_eq!(mapper.progress(1.0, f64::INFINITY), 0.0);
}

#[test]
fn angular_progress_landmarks() {
    let mapper = stock_mapper();
    let sweep = mapper.sweep_radians();
    assert!((sweep - 329f64.to_radians()).abs() < 1e-12);

    // 6 o'clock is the start of the travel
    assert_eq!(mapper.progress(0.0, 10.0), 0.0);
    // 9 o'clock, 12 o'clock, 3 o'clock
    assert!((mapper.progress(-10.0, 0.0) - (PI / 2.0) / sweep).abs() < 1e-12);
    assert!((mapper.progress(0.0, -10.0) - PI / sweep).abs() < 1e-12);
    assert!((mapper.progress(10.0, 0.0) - (1.5 * PI) / sweep).abs() < 1e-12);
    // Just left of 6 o'clock is the start of the sweep, just right of it is
    // the dead zone
    assert!(mapper.progress(-0.5, 10.0) < 0.02);
    assert_eq!(mapper.progress(0.5, 10.0), 1.0);
}

#[test]
fn handle_angle_inverts_progress() {
    let mapper = stock_mapper();
    for i in 1..=20 {
        let p = i as f64 / 20.0;
        let angle = mapper.handle_angle(p);
        let (dx, dy) = (angle.cos() * 100.0, angle.sin() * 100.0);
        assert!((mapper.progress(dx, dy) - p).abs() < 1e-9, "progress {p}");
    }
}

#[test]
fn range_round_trips_through_progress() {
    let range = ValueRange::new(40.0, 90.0).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..500 {
        let value = rng.random_range(40.0..=90.0);
        let back = range.from_progress(range.to_progress(value));
        assert!((back - value).abs() < 1e-9);
    }
    assert!(ValueRange::new(5.0, 5.0).is_err());
    assert!(ValueRange::new(f64::NAN, 5.0).is_err());
}

#[test]
fn guard_blocks_jumps_across_the_dead_zone() {
    let range = ValueRange::new(40.0, 90.0).unwrap();
    let guard = GuardedValueUpdater::new(range, 15.0).unwrap();

    let mut current = 89.0;
    assert!(!guard.apply(&mut current, 41.0));
    assert_eq!(current, 89.0);

    let mut current = 41.0;
    assert!(!guard.apply(&mut current, 88.0));
    assert_eq!(current, 41.0);

    let mut current = 70.0;
    assert!(guard.apply(&mut current, 41.0));
    assert_eq!(current, 41.0);

    let mut current = 60.0;
    assert!(guard.apply(&mut current, 89.5));
    assert_eq!(current, 89.5);
}

#[test]
fn snap_follows_throw_direction() {
    let mapper = LinearGestureMapper::new(5).unwrap();
    assert_eq!(mapper.snap(0.42, 1.0), 0.5);
    assert_eq!(mapper.snap(0.42, -1.0), 0.25);
    assert_eq!(mapper.snap(0.42, 0.0), 0.25);
    // Already on a step stays there either way
    assert_eq!(mapper.snap(0.75, 3.0), 0.75);
    assert_eq!(mapper.snap(0.75, -3.0), 0.75);
    assert_eq!(mapper.snap(1.0, 10.0), 1.0);
    assert_eq!(mapper.snap(0.0, -10.0), 0.0);
}

#[test]
fn snapped_progress_is_always_a_step() {
    let mapper = LinearGestureMapper::new(4).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..1000 {
        let p = rng.random_range(0.0..=1.0);
        let v = rng.random_range(-50.0..50.0);
        let snapped = mapper.snap(p, v);
        let index = mapper.step_index(snapped);
        assert!((mapper.step_progress(index) - snapped).abs() < 1e-12);
        assert!(index < mapper.steps());
    }
}

#[test]
fn drags_compose_away_from_the_ends() {
    let mapper = LinearGestureMapper::new(5).unwrap();
    let travel = 308.0;
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let a = rng.random_range(-60.0..60.0);
        let b = rng.random_range(-60.0..60.0);
        let stepwise = mapper.drag(mapper.drag(0.5, a, travel), b, travel);
        let at_once = mapper.drag(0.5, a + b, travel);
        assert!((stepwise - at_once).abs() < 1e-12);
    }
    assert_eq!(mapper.drag(0.9, 1000.0, travel), 1.0);
    assert_eq!(mapper.drag(0.1, -1000.0, travel), 0.0);
    assert_eq!(mapper.drag(0.3, 50.0, 0.0), 0.3);
}

#[test]
fn springs_settle_on_target() {
    for profile in [SpringProfile::SETTLED, SpringProfile::DRAGGING, SpringProfile::PRESS] {
        let mut spring = AnimatedProgress::new(0.0, profile, profile);
        spring.set_target(1.0);
        let mut frames = 0;
        while spring.tick(1.0 / 60.0, false) {
            frames += 1;
            assert!(frames < 600, "{profile:?} never settled");
        }
        assert_eq!(spring.current(), 1.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(spring.is_settled());
    }
}

#[test]
fn commands_drive_the_panel_state() {
    let mut controls = ClimateConfig::default().build_controls().unwrap();

    controls.apply(ClimateCommand::SetTemperature(65.0));
    controls.apply(ClimateCommand::SetFanStep(4));
    controls.apply(ClimateCommand::Toggle(ClimateToggle::Dry));
    controls.apply(ClimateCommand::SetToggle(ClimateToggle::AirConditioning, false));

    assert_eq!(controls.dial().temperature(), 65.0);
    assert_eq!(controls.fan().step(), 4);
    assert!(!controls.toggles().is_enabled(ClimateToggle::Dry));
    assert_eq!(controls.toggles().status_line(), "A/C is OFF");

    // Out of range requests clamp
    controls.apply(ClimateCommand::SetTemperature(200.0));
    assert_eq!(controls.dial().temperature(), 90.0);

    let mut frames = 0;
    while controls.on_frame_tick(1.0 / 60.0) {
        frames += 1;
        assert!(frames < 600);
    }
    assert_eq!(controls.dial().animated_temperature(), 90.0);
    assert_eq!(controls.fan().animated_progress(), 1.0);
}

#[test]
fn layout_hit_test_matches_control_positions() {
    let config = ClimateConfig::default();
    let layout = PanelLayout::new(config.window_width, config.window_height, &config);
    for button in &layout.buttons {
        let hit = layout.hit_test(button.cx as f64, button.cy as f64);
        assert_eq!(hit, Some(climate_panel::HitTarget::Toggle(button.toggle)));
    }
}
