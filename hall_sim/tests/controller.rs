use glam::DVec2;
use hall_sim::carrier::Polarity;
use hall_sim::collision::{Cause, Termination};
use hall_sim::controller::{Command, SimulationController};
use hall_sim::{ConfigError, SimulationConfig};

const DT: f64 = 1.0 / 60.0;

/// Controller with the default conductor and the given field / current / carrier
pub fn controller(b: f64, i: f64, polarity: Polarity) -> SimulationController {
    let config = SimulationConfig::default()
        .with_magnetic_field(b)
        .with_current_factor(i)
        .with_polarity(polarity);
    SimulationController::new(config).unwrap()
}

/// Step until the current run terminates
pub fn run_to_termination(sim: &mut SimulationController, dt: f64) -> Termination {
    for _ in 0..100_000 {
        if let Some(termination) = sim.step(dt) {
            return termination;
        }
    }
    panic!("run never terminated");
}

// ==================================================================================
// Single runs
// ==================================================================================

#[test]
fn electron_deflected_to_top_wall() {
    // With y growing downward, a = -F/m sends electrons upward when B < 0
    let mut sim = controller(-2.0, 200.0, Polarity::Negative);
    let increment = sim.feedback().increment();
    let scale = sim.feedback().voltage_scale();

    let termination = run_to_termination(&mut sim, DT);
    let snap = sim.snapshot();

    assert_eq!(termination.cause, Cause::HitTop);
    assert_eq!(snap.top_count, increment);
    assert_eq!(snap.bottom_count, 0);
    assert_eq!(snap.hall_voltage, (0.0 - increment as f64) * scale * -1.0);
    assert!(snap.hall_voltage > 0.0);
    assert_eq!(snap.last_y_deflection, -200.0);
    assert!(snap.last_x_deflection > 0.0 && snap.last_x_deflection < 1000.0);
}

#[test]
fn electron_deflected_to_bottom_wall_at_default_field() {
    let mut sim = controller(2.0, 200.0, Polarity::Negative);
    let termination = run_to_termination(&mut sim, DT);
    let snap = sim.snapshot();

    assert_eq!(termination.cause, Cause::HitBottom);
    assert_eq!(snap.top_count, 0);
    assert_eq!(snap.bottom_count, 50);
    assert_eq!(snap.hall_voltage, 50.0 * 400.0 * -1.0);
    assert_eq!(snap.last_y_deflection, 200.0);
}

#[test]
fn carrier_resets_after_termination() {
    let mut sim = controller(2.0, 200.0, Polarity::Negative);
    run_to_termination(&mut sim, DT);

    assert_eq!(sim.carrier().position, sim.geometry().injection_point());
    assert_eq!(sim.carrier().velocity, DVec2::ZERO);
    assert!(!sim.is_paused());
}

#[test]
fn exits_straight_without_transverse_force() {
    let mut sim = controller(2.0, 200.0, Polarity::Negative);
    sim.apply(Command::AdjustField(-2.0));
    assert_eq!(sim.params().magnetic_field, 0.0);

    let termination = run_to_termination(&mut sim, DT);
    let snap = sim.snapshot();

    assert_eq!(termination.cause, Cause::ExitedRight);
    assert_eq!(snap.last_x_deflection, sim.geometry().width());
    assert!(snap.last_y_deflection.abs() < 1e-9);
    assert_eq!(snap.top_count, 0);
    assert_eq!(snap.bottom_count, 0);
    assert_eq!(snap.hall_voltage, 0.0);
}

#[test]
fn opposite_carriers_deflect_to_opposite_walls() {
    let mut electrons = controller(2.0, 200.0, Polarity::Negative);
    let mut holes = controller(2.0, 200.0, Polarity::Positive);

    let e = run_to_termination(&mut electrons, DT);
    let h = run_to_termination(&mut holes, DT);

    assert_eq!(e.cause, Cause::HitBottom);
    assert_eq!(h.cause, Cause::HitTop);
    assert_eq!(e.deflection.y, -h.deflection.y);
    // Hall voltage sign convention: both carrier types build the same V_H
    assert_eq!(
        electrons.feedback().hall_voltage(),
        holes.feedback().hall_voltage()
    );
}

// ==================================================================================
// Feedback loop
// ==================================================================================

#[test]
fn hall_voltage_grows_until_carriers_cross() {
    let mut sim = controller(2.0, 200.0, Polarity::Negative);
    let mut last = None;
    for _ in 0..3_000 {
        if let Some(t) = sim.step(DT) {
            last = Some(t);
        }
    }

    let snap = sim.snapshot();
    assert_eq!(snap.top_count, 0);
    assert_eq!(snap.bottom_count, 350);
    assert_eq!(snap.hall_voltage, 350.0 * 400.0 * -1.0);

    let last = last.unwrap();
    assert_eq!(last.cause, Cause::ExitedRight);
    assert_eq!(snap.last_x_deflection, 1000.0);
    assert!(snap.last_y_deflection > 0.0 && snap.last_y_deflection < 190.0);
}

#[test]
fn wall_strikes_report_nominal_y_for_any_dt() {
    for dt in [1.0 / 120.0, DT, 1.0 / 30.0, 0.1, 0.25] {
        for b in [2.0, -2.0, 5.0] {
            let mut sim = controller(b, 200.0, Polarity::Negative);
            let mut strikes = 0;
            for _ in 0..2_000 {
                let Some(t) = sim.step(dt) else { continue };
                let y = sim.last_run().y_deflection;
                match t.cause {
                    Cause::HitTop => {
                        strikes += 1;
                        assert_eq!(y, -200.0);
                    }
                    Cause::HitBottom => {
                        strikes += 1;
                        assert_eq!(y, 200.0);
                    }
                    Cause::ExitedRight => assert_eq!(sim.last_run().x_deflection, 1000.0),
                }
            }
            assert!(strikes > 0, "no wall strikes for dt {dt}, B {b}");
        }
    }
}

// ==================================================================================
// State machine
// ==================================================================================

#[test]
fn identical_inputs_give_identical_states() {
    let script = |frame: usize| match frame {
        100 => Some(Command::AdjustField(0.4)),
        400 => Some(Command::TogglePolarity),
        700 => Some(Command::AdjustCurrent(-50.0)),
        900 => Some(Command::Reset),
        1000 | 1100 => Some(Command::TogglePause),
        _ => None,
    };

    let mut a = SimulationController::new(SimulationConfig::default()).unwrap();
    let mut b = SimulationController::new(SimulationConfig::default()).unwrap();

    for frame in 0..2_000 {
        let dt = DT + (frame % 7) as f64 * 0.001;
        if let Some(command) = script(frame) {
            a.apply(command);
            b.apply(command);
        }
        let ta = a.step(dt);
        let tb = b.step(dt);

        assert_eq!(ta, tb);
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(
            a.snapshot().hall_voltage.to_bits(),
            b.snapshot().hall_voltage.to_bits()
        );
    }
}

#[test]
fn paused_steps_change_nothing() {
    let mut sim = SimulationController::new(SimulationConfig::default()).unwrap();
    for _ in 0..500 {
        sim.step(DT);
    }
    sim.apply(Command::TogglePause);
    assert!(sim.is_paused());

    let carrier = *sim.carrier();
    let feedback = *sim.feedback();
    let last_run = *sim.last_run();

    for _ in 0..1_000 {
        assert_eq!(sim.step(DT), None);
    }

    assert_eq!(*sim.carrier(), carrier);
    assert_eq!(*sim.feedback(), feedback);
    assert_eq!(*sim.last_run(), last_run);

    sim.apply(Command::TogglePause);
    assert!(!sim.is_paused());
}

#[test]
fn reset_twice_equals_reset_once() {
    let mut sim = SimulationController::new(SimulationConfig::default()).unwrap();
    for _ in 0..700 {
        sim.step(DT);
    }
    assert!(sim.feedback().total_count() > 0);

    sim.apply(Command::Reset);
    let once = sim.snapshot();
    sim.apply(Command::Reset);
    let twice = sim.snapshot();

    assert_eq!(once, twice);
    assert_eq!(twice.top_count, 0);
    assert_eq!(twice.bottom_count, 0);
    assert_eq!(twice.hall_voltage, 0.0);
    assert_eq!(twice.last_x_deflection, 0.0);
    assert_eq!(twice.last_y_deflection, 0.0);
    assert_eq!(twice.carrier_position, sim.geometry().injection_point());
    assert_eq!(twice.carrier_velocity, DVec2::ZERO);
}

#[test]
fn reset_keeps_run_mode_and_parameters() {
    let mut sim = SimulationController::new(SimulationConfig::default()).unwrap();
    sim.apply(Command::AdjustField(1.0));
    sim.apply(Command::TogglePause);
    sim.apply(Command::Reset);

    assert!(sim.is_paused());
    assert_eq!(sim.params().magnetic_field, 3.0);
    assert_eq!(sim.params().polarity, Polarity::Negative);
}

#[test]
fn polarity_toggle_flips_charge_and_clears_history() {
    let mut sim = SimulationController::new(SimulationConfig::default()).unwrap();
    for _ in 0..700 {
        sim.step(DT);
    }
    let charge = sim.carrier().charge;
    sim.apply(Command::TogglePause);

    sim.apply(Command::TogglePolarity);
    let snap = sim.snapshot();

    assert_eq!(snap.polarity, Polarity::Positive);
    assert_eq!(sim.carrier().charge, -charge);
    assert!(snap.paused);
    assert_eq!(snap.total_carriers, 0);
    assert_eq!(snap.hall_voltage, 0.0);
    assert_eq!(snap.last_x_deflection, 0.0);
    assert_eq!(snap.last_y_deflection, 0.0);
    assert_eq!(snap.carrier_position, sim.geometry().injection_point());

    sim.apply(Command::TogglePolarity);
    assert_eq!(sim.carrier().charge, charge);
}

#[test]
fn current_is_floored_and_field_is_unbounded() {
    let mut sim = SimulationController::new(SimulationConfig::default()).unwrap();
    sim.apply(Command::AdjustCurrent(-1_000.0));
    assert_eq!(sim.params().current_factor, 0.1);
    sim.apply(Command::AdjustCurrent(0.1));
    assert_eq!(sim.params().current_factor, 0.2);

    sim.apply(Command::AdjustField(-100.0));
    assert_eq!(sim.params().magnetic_field, -98.0);
    sim.apply(Command::AdjustField(10_000.0));
    assert_eq!(sim.params().magnetic_field, 9_902.0);
    assert!(!sim.is_paused());
}

#[test]
fn initial_current_below_floor_is_clamped() {
    let sim = controller(2.0, 0.0, Polarity::Negative);
    assert_eq!(sim.params().current_factor, 0.1);
}

#[test]
fn zero_and_negative_dt_do_not_move_the_carrier() {
    let mut sim = SimulationController::new(SimulationConfig::default()).unwrap();
    let start = sim.carrier().position;
    assert_eq!(sim.step(0.0), None);
    assert_eq!(sim.step(-1.0), None);
    assert_eq!(sim.step(f64::NAN), None);
    assert_eq!(sim.carrier().position, start);
    assert_eq!(sim.carrier().velocity.y, 0.0);
}

#[test]
fn invalid_geometry_is_rejected_at_startup() {
    let config = SimulationConfig {
        conductor_height: 8.0,
        ..SimulationConfig::default()
    };
    assert!(SimulationController::new(config).is_err());
}

#[test]
fn non_finite_scales_are_rejected_at_startup() {
    let config = SimulationConfig {
        force_scale: f64::NAN,
        ..SimulationConfig::default()
    };
    assert!(matches!(
        SimulationController::new(config),
        Err(ConfigError::InvalidForceScale(_))
    ));

    let config = SimulationConfig {
        charge_magnitude: 0.0,
        ..SimulationConfig::default()
    };
    assert!(matches!(
        SimulationController::new(config),
        Err(ConfigError::InvalidChargeMagnitude(_))
    ));
}
