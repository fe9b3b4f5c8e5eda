//! Integration test: fatal settings halt the loop.
//!
//! A snapshot that fails validation must not produce any command, and the
//! loop must refuse every later tick without touching the bus.

use camstab_common::stab::axis::Axis;
use camstab_common::stab::settings::{SettingsError, StabSettings};

use camstab_unit::bus::{ManualClock, MemoryBus};
use camstab_unit::config::UnitConfig;
use camstab_unit::cycle::{ControlLoop, CycleError};

fn start() -> (ControlLoop, MemoryBus, ManualClock) {
    let clock = ManualClock::new(0);
    let ctl = ControlLoop::activate(&UnitConfig::default(), &clock)
        .unwrap()
        .unwrap();
    (ctl, MemoryBus::new(StabSettings::default()), clock)
}

#[test]
fn non_finite_setting_halts_before_reading_attitude() {
    let (mut ctl, mut bus, clock) = start();
    bus.settings_mut().pitch.feed_forward_gain = f64::NAN;

    clock.advance(10);
    let err = ctl.tick(&mut bus, &clock).unwrap_err();

    assert_eq!(
        err,
        CycleError::InvalidSettings(SettingsError::NonFinite {
            axis: Axis::Pitch,
            field: "feed_forward_gain",
        })
    );
    assert!(ctl.is_halted());
    assert!(bus.commands().is_empty());
    for axis in Axis::ALL {
        assert_eq!(bus.attitude_reads(axis), 0);
    }
}

#[test]
fn halt_mid_run_keeps_earlier_commands_only() {
    let (mut ctl, mut bus, clock) = start();
    bus.set_attitude(Axis::Roll, 4.0);

    for _ in 0..3 {
        clock.advance(10);
        ctl.tick(&mut bus, &clock).unwrap();
    }
    assert_eq!(bus.commands().len(), 9);

    bus.settings_mut().yaw.response_time_ms = -1.0;
    clock.advance(10);
    assert!(matches!(
        ctl.tick(&mut bus, &clock),
        Err(CycleError::InvalidSettings(SettingsError::Negative { axis: Axis::Yaw, .. }))
    ));
    assert_eq!(bus.commands().len(), 9);
    assert_eq!(ctl.stats().tick_count, 3);
}

#[test]
fn halted_loop_ignores_repaired_settings() {
    let (mut ctl, mut bus, clock) = start();
    bus.settings_mut().roll.output_range = 0.0;

    clock.advance(10);
    assert!(ctl.tick(&mut bus, &clock).is_err());

    bus.set_settings(StabSettings::default());
    bus.clear_records();
    for _ in 0..5 {
        clock.advance(10);
        assert_eq!(ctl.tick(&mut bus, &clock), Err(CycleError::Halted));
    }

    assert!(bus.commands().is_empty());
    for axis in Axis::ALL {
        assert_eq!(bus.attitude_reads(axis), 0);
    }
}

#[test]
fn reset_does_not_clear_halt() {
    let (mut ctl, mut bus, clock) = start();
    bus.settings_mut().roll.output_range = 0.0;
    clock.advance(10);
    assert!(ctl.tick(&mut bus, &clock).is_err());

    ctl.reset();
    assert!(ctl.is_halted());
    clock.advance(10);
    assert_eq!(ctl.tick(&mut bus, &clock), Err(CycleError::Halted));
}

#[test]
fn fresh_loop_recovers_after_halt() {
    let (mut ctl, mut bus, clock) = start();
    bus.settings_mut().roll.output_range = 0.0;
    clock.advance(10);
    assert!(ctl.tick(&mut bus, &clock).is_err());

    bus.set_settings(StabSettings::default());
    let mut ctl = ControlLoop::activate(&UnitConfig::default(), &clock)
        .unwrap()
        .unwrap();
    clock.advance(10);
    assert!(ctl.tick(&mut bus, &clock).is_ok());
    assert_eq!(bus.commands().len(), 3);
}

#[test]
fn disabled_module_never_ticks() {
    let clock = ManualClock::new(0);
    let config = UnitConfig {
        enabled: false,
        tick_period_ms: 10,
    };
    let mut host: Option<ControlLoop> = ControlLoop::activate(&config, &clock).unwrap();
    let mut bus = MemoryBus::new(StabSettings::default());

    for _ in 0..3 {
        clock.advance(10);
        if let Some(ctl) = host.as_mut() {
            ctl.tick(&mut bus, &clock).unwrap();
        }
    }

    assert!(host.is_none());
    assert!(bus.commands().is_empty());
}
