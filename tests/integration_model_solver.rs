//! Integration tests: flux models driven end-to-end through the solvers
//!
//! These tests exercise the full pipeline (network builder, ratio evolution
//! kernel, solver, delta conversion) against properties that hold exactly or
//! analytically: conservation of mass-weighted ratios, convergence to the
//! mass-weighted mean, monotone approach from both sides, and isolation of
//! unconnected boxes.

mod common;

use common::{relative_error, two_box_scenario, weighted_total};
use isobox::model::{FluxModel, RatioEvolution, Standard};
use isobox::network::NetworkBuilder;
use isobox::scenarios::{iron_simple, zinc_turnover};
use isobox::solver::{
    EulerSolver, RK45Solver, RK4Solver, Scenario, Solver, SolverConfiguration,
};

// ====== Conservation ======

#[test]
fn test_total_isotope_content_is_conserved() {
    let scenario = two_box_scenario(2.0, -1.0, 5.0, 50.0, 1.5);
    let masses = nalgebra::DVector::from_vec(vec![5.0, 50.0]);

    let initial_total = weighted_total(&masses, &scenario.initial);

    let config = SolverConfiguration::time_evolution(100.0, 10_000);
    let result = RK4Solver::new().solve(&scenario, &config).unwrap();

    // Conservation is a linear invariant of the equations, so every
    // Runge-Kutta step preserves it to roundoff, not just to O(dt^4).
    for state in &result.trajectory {
        let total = weighted_total(&masses, state);
        assert!(relative_error(total, initial_total) < 1e-12);
    }
}

#[test]
fn test_zinc_network_conserves_under_rk45() {
    let model = zinc_turnover(12.0, 0.029).unwrap();
    let masses = model.network().masses().clone();
    let scenario = Scenario::new(Box::new(model));

    let initial_total = weighted_total(&masses, &scenario.initial);

    let config = SolverConfiguration::adaptive(18250.0, 100);
    let result = RK45Solver::new().solve(&scenario, &config).unwrap();

    let final_total = weighted_total(&masses, &result.final_state);
    // The adaptive pair is Runge-Kutta too; the invariant survives the
    // step-size changes.
    assert!(relative_error(final_total, initial_total) < 1e-10);
}

// ====== Equilibration ======

#[test]
fn test_two_boxes_converge_to_mass_weighted_mean() {
    // Equal masses, deltas +1 and 0: both boxes approach delta 0.5,
    // monotonically, each from its own side.
    let scenario = two_box_scenario(1.0, 0.0, 10.0, 10.0, 1.0);
    let standard = Standard::new(1.0).unwrap();

    let config = SolverConfiguration::time_evolution(200.0, 20_000);
    let result = RK4Solver::new().solve(&scenario, &config).unwrap();

    let deltas = result.delta_trajectory(standard);

    let final_delta = result.final_delta(standard);
    assert!((final_delta[0] - 0.5).abs() < 1e-6);
    assert!((final_delta[1] - 0.5).abs() < 1e-6);

    // Box a decays toward 0.5 from above, box b climbs from below
    for window in deltas.windows(2) {
        assert!(window[1][0] <= window[0][0] + 1e-12);
        assert!(window[1][1] >= window[0][1] - 1e-12);
    }
}

#[test]
fn test_equal_deltas_are_a_steady_state() {
    // Without fractionation a uniform composition never moves.
    let scenario = two_box_scenario(0.7, 0.7, 3.0, 25.0, 0.18);

    let config = SolverConfiguration::time_evolution(500.0, 5000);
    let result = RK4Solver::new().solve(&scenario, &config).unwrap();

    for state in &result.trajectory {
        assert!(relative_error(state[0], scenario.initial[0]) < 1e-13);
        assert!(relative_error(state[1], scenario.initial[1]) < 1e-13);
    }
}

#[test]
fn test_isolated_box_keeps_its_composition() {
    let network = NetworkBuilder::new()
        .add_box("a", 1.0, 10.0)
        .add_box("b", 0.0, 10.0)
        .add_box("lonely", 5.0, 2.0)
        .transfer("a", "b", 1.0)
        .transfer("b", "a", 1.0)
        .build()
        .unwrap();
    assert!(network.is_isolated(2));

    let standard = Standard::new(1.0).unwrap();
    let model = RatioEvolution::new(network, standard);
    let scenario = Scenario::new(Box::new(model));

    let config = SolverConfiguration::time_evolution(100.0, 10_000);
    let result = RK4Solver::new().solve(&scenario, &config).unwrap();

    let final_delta = result.final_delta(standard);
    assert!((final_delta[2] - 5.0).abs() < 1e-10);
}

// ====== Solver cross-checks ======

#[test]
fn test_rk45_matches_rk4_on_the_zinc_network() {
    let total_time = 1000.0;

    let model = zinc_turnover(12.0, 0.029).unwrap();
    let scenario = Scenario::new(Box::new(model));
    let config = SolverConfiguration::time_evolution(total_time, 100_000);
    let fixed = RK4Solver::new().solve(&scenario, &config).unwrap();

    let model = zinc_turnover(12.0, 0.029).unwrap();
    let scenario = Scenario::new(Box::new(model));
    let config = SolverConfiguration::adaptive_with_tolerances(total_time, 100, 1e-9, 1e-12);
    let adaptive = RK45Solver::new().solve(&scenario, &config).unwrap();

    for i in 0..fixed.final_state.len() {
        assert!(
            relative_error(adaptive.final_state[i], fixed.final_state[i]) < 1e-7,
            "box {} disagrees between RK4 and RK45",
            i
        );
    }
}

#[test]
fn test_euler_approaches_rk4_with_refinement() {
    let scenario = two_box_scenario(1.0, 0.0, 10.0, 10.0, 1.0);
    let config = SolverConfiguration::time_evolution(50.0, 200_000);
    let euler = EulerSolver::new().solve(&scenario, &config).unwrap();

    let scenario = two_box_scenario(1.0, 0.0, 10.0, 10.0, 1.0);
    let config = SolverConfiguration::time_evolution(50.0, 2000);
    let rk4 = RK4Solver::new().solve(&scenario, &config).unwrap();

    assert!(relative_error(euler.final_state[0], rk4.final_state[0]) < 1e-5);
}

// ====== Physiological scenarios ======

#[test]
fn test_zinc_turnover_over_fifty_years_flags_only_collection_boxes() {
    // Urine, feces and skin only receive flux, so their ratios climb without
    // bound and cross the drift threshold; that is the model speaking, not
    // the integrator. Every exchanging compartment equilibrates within a few
    // permil of the standard.
    let model = zinc_turnover(12.0, 0.029).unwrap();
    let standard = model.standard();
    let network = model.network();
    let collectors: Vec<usize> = ["urine", "feces", "skin"]
        .iter()
        .map(|name| network.index_of(name).unwrap())
        .collect();
    let exchanging: Vec<usize> = ["diet", "plasma", "RBC", "liver", "muscle", "bone", "kidney"]
        .iter()
        .map(|name| network.index_of(name).unwrap())
        .collect();
    let scenario = Scenario::new(Box::new(model));

    let config = SolverConfiguration::adaptive(18250.0, 100);
    let result = RK45Solver::new().solve(&scenario, &config).unwrap();

    assert_eq!(result.unstable_boxes(standard), collectors);

    let final_delta = result.final_delta(standard);
    for &i in &exchanging {
        assert!(final_delta[i].is_finite());
        assert!(final_delta[i].abs() < 10.0, "box {} ran away", i);
    }
}

#[test]
fn test_zinc_diet_box_barely_moves() {
    // The diet box's 1e12 mass makes it an effectively fixed source: its
    // ratio decays at F/M ~ 1.2e-11 per day, about -2e-4 permil over the
    // whole fifty-year run.
    let model = zinc_turnover(12.0, 0.029).unwrap();
    let standard = model.standard();
    let diet = model.network().index_of("diet").unwrap();
    let scenario = Scenario::new(Box::new(model));

    let config = SolverConfiguration::adaptive(18250.0, 50);
    let result = RK45Solver::new().solve(&scenario, &config).unwrap();

    let final_delta = result.final_delta(standard);
    assert!(final_delta[diet].abs() < 1e-3);
}

#[test]
fn test_iron_model_constructs_and_evaluates() {
    // The iron network is stiff (urine mass 1e-10), so only the kernel is
    // exercised here, not a long explicit integration.
    let model = iron_simple().unwrap();
    let ratio = model.initial_ratio();
    let rate = model.derivative(&ratio, 0.0);

    assert_eq!(rate.len(), 7);
    assert!(rate.iter().all(|r| r.is_finite()));
}

// ====== Validation surfaces ======

#[test]
fn test_invalid_network_is_rejected_before_solving() {
    let result = NetworkBuilder::new()
        .add_box("a", 0.0, 1.0)
        .transfer("a", "ghost", 1.0)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_solver_configuration_mismatch_is_reported() {
    let scenario = two_box_scenario(1.0, 0.0, 10.0, 10.0, 1.0);
    let config = SolverConfiguration::adaptive(10.0, 100);

    let err = EulerSolver::new().solve(&scenario, &config).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Forward Euler"));
    assert!(msg.contains("Adaptive"));
}

#[test]
fn test_round_trip_through_delta_notation() {
    let model = zinc_turnover(12.0, 0.029).unwrap();
    let standard = model.standard();
    let configured = model.network().deltas().clone();
    let scenario = Scenario::new(Box::new(model));

    let config = SolverConfiguration::time_evolution(10.0, 100);
    let result = RK4Solver::new().solve(&scenario, &config).unwrap();

    // The first trajectory point is the initial condition; converting it
    // back must reproduce the configured deltas.
    let deltas = result.delta_trajectory(standard);
    for i in 0..configured.len() {
        assert!((deltas[0][i] - configured[i]).abs() < 1e-9);
    }
}
