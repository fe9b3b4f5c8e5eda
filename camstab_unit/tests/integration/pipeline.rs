//! Integration test: full per-axis pipeline through the loop driver.
//!
//! Each scenario publishes attitude, trim and settings on a `MemoryBus`,
//! advances a `ManualClock` by 10 ms and checks the commands written.

use camstab_common::stab::axis::Axis;
use camstab_common::stab::settings::{GimbalType, StabSettings, StabilizationMode, TrimInput};

use camstab_unit::bus::{ManualClock, MemoryBus};
use camstab_unit::config::UnitConfig;
use camstab_unit::cycle::{ControlLoop, TickReport};

const DT_MS: u32 = 10;

// ── Helpers ─────────────────────────────────────────────────────────

fn start(settings: StabSettings) -> (ControlLoop, MemoryBus, ManualClock) {
    let clock = ManualClock::new(1_000);
    let ctl = ControlLoop::activate(&UnitConfig::default(), &clock)
        .unwrap()
        .unwrap();
    (ctl, MemoryBus::new(settings), clock)
}

fn step(ctl: &mut ControlLoop, bus: &mut MemoryBus, clock: &ManualClock) -> TickReport {
    clock.advance(DT_MS);
    ctl.tick(bus, clock).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn roll_attitude_trim_end_to_end() {
    let mut settings = StabSettings::default();
    settings.roll.input = TrimInput::Accessory0;
    settings.roll.stabilization_mode = StabilizationMode::Attitude;
    settings.roll.input_range = 30.0;
    settings.roll.output_range = 45.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_trim(0, Some(0.5));
    bus.set_attitude(Axis::Roll, 0.0);

    let report = step(&mut ctl, &mut bus, &clock);

    assert_eq!(ctl.axis_state(Axis::Roll).trim.value(), 15.0);
    assert_close(report.commands[Axis::Roll.index()], 1.0 / 3.0);
    assert_close(bus.last_command(Axis::Roll).unwrap(), 1.0 / 3.0);
}

#[test]
fn full_scale_output_saturates() {
    let mut settings = StabSettings::default();
    settings.pitch.input = TrimInput::Accessory4;
    settings.pitch.input_range = 25.0;
    settings.pitch.output_range = 50.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_trim(4, Some(1.0));
    bus.set_attitude(Axis::Pitch, 25.0);

    let report = step(&mut ctl, &mut bus, &clock);

    assert_eq!(report.commands[Axis::Pitch.index()], 1.0);
    assert_eq!(ctl.stats().saturated_commands, 1);
}

#[test]
fn plain_pipeline_maps_attitude_to_command() {
    let (mut ctl, mut bus, clock) = start(StabSettings::default());
    bus.set_attitude(Axis::Roll, 5.0);
    bus.set_attitude(Axis::Pitch, -10.0);
    bus.set_attitude(Axis::Yaw, 40.0);

    let report = step(&mut ctl, &mut bus, &clock);

    // default output_range = 20
    assert_close(report.commands[0], 0.25);
    assert_close(report.commands[1], -0.5);
    assert_eq!(report.commands[2], 1.0);
}

#[test]
fn every_tick_reads_and_writes_each_axis_once() {
    let (mut ctl, mut bus, clock) = start(StabSettings::default());

    for tick in 1..=5u32 {
        step(&mut ctl, &mut bus, &clock);
        for axis in Axis::ALL {
            assert_eq!(bus.attitude_reads(axis), tick);
            assert_eq!(bus.command_count(axis), tick as usize);
        }
    }

    let order: Vec<Axis> = bus.commands().iter().take(3).map(|c| c.axis).collect();
    assert_eq!(order, Axis::ALL.to_vec());
}

#[test]
fn axis_lock_dead_zone_holds_trim() {
    let mut settings = StabSettings::default();
    settings.yaw.input = TrimInput::Accessory1;
    settings.yaw.stabilization_mode = StabilizationMode::AxisLock;
    settings.yaw.input_rate = 1.0;
    settings.yaw.max_axis_lock_rate = 0.5;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_trim(1, Some(0.3));

    for _ in 0..10 {
        let report = step(&mut ctl, &mut bus, &clock);
        assert_eq!(report.commands[Axis::Yaw.index()], 0.0);
    }
    assert_eq!(ctl.axis_state(Axis::Yaw).trim.value(), 0.0);
}

#[test]
fn axis_lock_integrates_until_bound() {
    let mut settings = StabSettings::default();
    settings.yaw.input = TrimInput::Accessory1;
    settings.yaw.stabilization_mode = StabilizationMode::AxisLock;
    settings.yaw.input_rate = 100.0;
    settings.yaw.max_axis_lock_rate = 0.5;
    settings.yaw.input_range = 2.0;
    settings.yaw.output_range = 20.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_trim(1, Some(0.8));

    // rate 80/s over 10 ms → +0.8 per tick, bounded at 2.0
    let expected = [0.8, 1.6, 2.0, 2.0];
    for trim in expected {
        let report = step(&mut ctl, &mut bus, &clock);
        assert_close(ctl.axis_state(Axis::Yaw).trim.value(), trim);
        assert_close(report.commands[Axis::Yaw.index()], trim / 20.0);
    }
}

#[test]
fn missing_trim_sample_holds_previous_trim() {
    let mut settings = StabSettings::default();
    settings.roll.input = TrimInput::Accessory2;
    settings.roll.input_range = 30.0;
    settings.roll.output_range = 60.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_trim(2, Some(0.5));
    step(&mut ctl, &mut bus, &clock);

    bus.set_trim(2, None);
    let report = step(&mut ctl, &mut bus, &clock);

    assert_eq!(ctl.axis_state(Axis::Roll).trim.value(), 15.0);
    assert_close(report.commands[Axis::Roll.index()], 0.25);
}

#[test]
fn attitude_filter_converges_through_loop() {
    let mut settings = StabSettings::default();
    settings.yaw.response_time_ms = 100.0;
    settings.yaw.output_range = 100.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_attitude(Axis::Yaw, 10.0);

    let mut last = 0.0;
    for _ in 0..100 {
        let report = step(&mut ctl, &mut bus, &clock);
        let command = report.commands[Axis::Yaw.index()];
        assert!(command >= last);
        last = command;
    }

    assert!((ctl.axis_state(Axis::Yaw).filter.value() - 10.0).abs() < 1e-3);
}

#[test]
fn serial_gimbal_scales_roll_feedforward() {
    let mut settings = StabSettings::default();
    settings.gimbal_type = GimbalType::YawRollPitch;
    settings.roll.feed_forward_gain = 1.0;
    settings.roll.max_accel_per_sec = 1e6;
    settings.roll.output_range = 100.0;
    settings.pitch.output_range = 40.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_attitude(Axis::Roll, 8.0);
    bus.set_attitude(Axis::Pitch, 10.0);

    let report = step(&mut ctl, &mut bus, &clock);

    // correction = (40 - 10) / 40 = 0.75 → acc = 6 → out = 8 + 6, decay clears acc
    assert_close(report.commands[Axis::Roll.index()], 0.14);
    assert_close(report.commands[Axis::Pitch.index()], 0.25);
    assert_eq!(ctl.axis_state(Axis::Roll).feedforward.accumulator(), 0.0);
}

#[test]
fn reversed_pitch_servo_keeps_roll_correction() {
    let mut settings = StabSettings::default();
    settings.gimbal_type = GimbalType::YawRollPitch;
    settings.roll.feed_forward_gain = 1.0;
    settings.roll.max_accel_per_sec = 1e6;
    settings.roll.output_range = 100.0;
    settings.pitch.output_range = -40.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_attitude(Axis::Roll, 8.0);
    bus.set_attitude(Axis::Pitch, 10.0);

    let report = step(&mut ctl, &mut bus, &clock);

    // Same roll command as the forward pitch servo; pitch itself is reversed.
    assert_close(report.commands[Axis::Roll.index()], 0.14);
    assert_close(report.commands[Axis::Pitch.index()], -0.25);
}

#[test]
fn generic_gimbal_applies_full_feedforward() {
    let mut settings = StabSettings::default();
    settings.roll.feed_forward_gain = 1.0;
    settings.roll.max_accel_per_sec = 1e6;
    settings.roll.output_range = 100.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_attitude(Axis::Roll, 8.0);
    bus.set_attitude(Axis::Pitch, 10.0);

    let report = step(&mut ctl, &mut bus, &clock);
    assert_close(report.commands[Axis::Roll.index()], 0.16);
}

#[test]
fn yaw_pitch_roll_gimbal_scales_pitch_feedforward() {
    let mut settings = StabSettings::default();
    settings.gimbal_type = GimbalType::YawPitchRoll;
    settings.pitch.feed_forward_gain = 2.0;
    settings.pitch.max_accel_per_sec = 1e6;
    settings.pitch.output_range = 100.0;
    settings.roll.output_range = 20.0;

    let (mut ctl, mut bus, clock) = start(settings);
    bus.set_attitude(Axis::Roll, -5.0);
    bus.set_attitude(Axis::Pitch, 4.0);

    let report = step(&mut ctl, &mut bus, &clock);

    // correction = (20 - 5) / 20 = 0.75 → acc = 4·2·0.75 = 6 → out = 10
    assert_close(report.commands[Axis::Pitch.index()], 0.1);
}

#[test]
fn feedforward_respects_acceleration_limit() {
    let mut settings = StabSettings::default();
    settings.roll.feed_forward_gain = 1.5;
    settings.roll.accel_time_ms = 40.0;
    settings.roll.decel_time_ms = 80.0;
    settings.roll.max_accel_per_sec = 100.0;
    settings.roll.output_range = 100.0;

    let (mut ctl, mut bus, clock) = start(settings);
    let max_step = 100.0 * DT_MS as f64 / 1000.0;

    let mut previous = 0.0;
    for tick in 0..60 {
        let attitude = if tick < 30 { 50.0 } else { -20.0 };
        bus.set_attitude(Axis::Roll, attitude);
        step(&mut ctl, &mut bus, &clock);

        let current = ctl.axis_state(Axis::Roll).feedforward.last_filtered();
        assert!((current - previous).abs() <= max_step + 1e-9);
        previous = current;
    }
}
