//! Dormand-Prince 4(5) adaptive numerical solver
//!
//! # Mathematical Background
//!
//! The Dormand-Prince method (RK45, `ode45` in many environments) is an
//! embedded Runge-Kutta pair: each step computes a fifth-order solution and
//! a fourth-order solution from the same seven stages. Their difference is a
//! free estimate of the local truncation error, which drives the step-size
//! controller:
//!
//! ```text
//! err   = ‖(y₅ - y₄) / (atol + rtol·max(|yₙ|, |yₙ₊₁|))‖_rms
//! h_new = h · clamp(0.9 · err^(-1/5), 0.2, 5.0)
//! ```
//!
//! A step is accepted when `err ≤ 1` and retried with the reduced step
//! otherwise. The pair has the FSAL property (First Same As Last): the
//! seventh stage of an accepted step is the first stage of the next, so an
//! accepted step costs six fresh derivative evaluations.
//!
//! # Characteristics
//!
//! - **Order**: fifth-order propagation, fourth-order error estimate
//! - **Stability**: the controller shrinks the step near stability limits
//!   instead of diverging
//! - **Complexity**: 6 derivative evaluations per accepted step
//!
//! # When to Use
//!
//! Box networks whose flux-to-mass ratios spread over several orders of
//! magnitude, such as a physiological model with a near-massless excretion
//! compartment next to a slow bone reservoir. A fixed step sized for the
//! fast box wastes millions of evaluations on the slow ones; the adaptive
//! controller takes large steps once the fast transient has decayed.

use log::info;
use nalgebra::DVector;

use crate::error::SimulationError;
use crate::solver::{
    validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
};

// =================================================================================================
// Dormand-Prince coefficients
// =================================================================================================

// Stage nodes
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

// Runge-Kutta matrix
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also the seventh stage row, giving FSAL)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between the fifth- and fourth-order weights; dotting the
// stages with these yields the local error estimate directly.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Step controller bounds
const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

// =================================================================================================
// RK45 Solver
// =================================================================================================

/// Dormand-Prince 4(5) adaptive solver
///
/// Integrates with an internally controlled step size and records the state
/// at the equally spaced output times requested by
/// [`SolverType::Adaptive`]. Internal steps are clipped so that every output
/// time is hit exactly, never interpolated.
///
/// # Algorithm
///
/// For each output interval:
///
/// 1. Propose a step `h` (clipped to the remaining interval)
/// 2. Evaluate the seven Dormand-Prince stages
/// 3. Estimate the local error against `atol + rtol·|y|`
/// 4. Accept and advance when `err ≤ 1`, otherwise retry with a smaller `h`
/// 5. Either way, rescale `h` by `clamp(0.9·err^(-1/5), 0.2, 5.0)`
///
/// # Failure Modes
///
/// - The accepted-plus-rejected step count exceeding `max_steps` aborts the
///   run with [`SimulationError::Integration`]; the budget caps runaway
///   step-halving on a hopeless problem.
/// - The step underflowing (`h` indistinguishable from zero next to the
///   current time) aborts likewise; it means the tolerance cannot be met,
///   usually because the state is about to blow up.
#[derive(Debug, Clone, Copy, Default)]
pub struct RK45Solver;

impl RK45Solver {
    /// Create a new Dormand-Prince solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use isobox::solver::{RK45Solver, Solver};
    ///
    /// let solver = RK45Solver::new();
    /// assert_eq!(solver.name(), "Dormand-Prince (RK45)");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for RK45Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SimulationError> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (total_time, output_points, rtol, atol, max_steps) = match &config.solver_type {
            SolverType::Adaptive {
                total_time,
                output_points,
                rtol,
                atol,
                max_steps,
            } => (*total_time, *output_points, *rtol, *atol, *max_steps),
            other => {
                return Err(SimulationError::UnsupportedConfiguration {
                    solver: self.name().to_string(),
                    requested: other.name().to_string(),
                });
            }
        };

        info!(
            "RK45: integrating `{}` over {} time units, {} output points, rtol {:e}, atol {:e}",
            scenario.model_name(),
            total_time,
            output_points,
            rtol,
            atol
        );

        // ====== Step 2: Setup ======

        let model = scenario.model.as_ref();
        let n = scenario.n_boxes();
        let dt_out = total_time / (output_points as f64);

        let mut t = 0.0_f64;
        let mut state: DVector<f64> = scenario.initial.clone();

        let mut time_points = Vec::with_capacity(output_points + 1);
        let mut trajectory = Vec::with_capacity(output_points + 1);
        time_points.push(0.0);
        trajectory.push(state.clone());

        // FSAL stage, carried across accepted steps
        let mut k1 = model.derivative(&state, t);

        // The first output interval bounds the initial guess; the controller
        // finds the right scale within a few steps either way.
        let mut h = dt_out / 10.0;

        let mut accepted: usize = 0;
        let mut rejected: usize = 0;
        let mut evaluations: usize = 1;

        // ====== Step 3: Adaptive Time Integration ======

        for point in 1..=output_points {
            // Output times computed directly from the index so the grid
            // stays exact; internal steps land on each one by clipping.
            let t_target = if point == output_points {
                total_time
            } else {
                (point as f64) * dt_out
            };

            loop {
                // Roundoff in t += h can leave t a hair short of the target;
                // treat anything within epsilon as arrived.
                let remaining = t_target - t;
                if remaining <= f64::EPSILON * t_target.abs().max(1.0) {
                    break;
                }

                if accepted + rejected >= max_steps {
                    return Err(SimulationError::integration(
                        t,
                        format!(
                            "step budget of {} exhausted ({} accepted, {} rejected); \
                             loosen tolerances or raise max_steps",
                            max_steps, accepted, rejected
                        ),
                    ));
                }

                // Clip so the step never overshoots the output time
                let h_step = h.min(remaining);
                if h_step <= f64::EPSILON * t.abs().max(1.0) {
                    return Err(SimulationError::integration(
                        t,
                        "step size underflow; the tolerance cannot be met at this state",
                    ));
                }

                // ====== Dormand-Prince stages ======

                let k2 = model.derivative(&(&state + &k1 * (A21 * h_step)), t + C2 * h_step);
                let k3 = model.derivative(
                    &(&state + &k1 * (A31 * h_step) + &k2 * (A32 * h_step)),
                    t + C3 * h_step,
                );
                let k4 = model.derivative(
                    &(&state + &k1 * (A41 * h_step) + &k2 * (A42 * h_step) + &k3 * (A43 * h_step)),
                    t + C4 * h_step,
                );
                let k5 = model.derivative(
                    &(&state
                        + &k1 * (A51 * h_step)
                        + &k2 * (A52 * h_step)
                        + &k3 * (A53 * h_step)
                        + &k4 * (A54 * h_step)),
                    t + C5 * h_step,
                );
                let k6 = model.derivative(
                    &(&state
                        + &k1 * (A61 * h_step)
                        + &k2 * (A62 * h_step)
                        + &k3 * (A63 * h_step)
                        + &k4 * (A64 * h_step)
                        + &k5 * (A65 * h_step)),
                    t + h_step,
                );

                // Fifth-order candidate (B2 and B7 are zero)
                let state_next = &state
                    + &k1 * (B1 * h_step)
                    + &k3 * (B3 * h_step)
                    + &k4 * (B4 * h_step)
                    + &k5 * (B5 * h_step)
                    + &k6 * (B6 * h_step);

                // FSAL stage doubles as the error term k7
                let k7 = model.derivative(&state_next, t + h_step);
                evaluations += 6;

                // ====== Error estimate ======

                // RMS of the componentwise error against mixed tolerance
                let mut err_sq = 0.0;
                for i in 0..n {
                    let e = h_step
                        * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i]
                            + E6 * k6[i]
                            + E7 * k7[i]);
                    let scale = atol + rtol * state[i].abs().max(state_next[i].abs());
                    err_sq += (e / scale) * (e / scale);
                }
                let err = (err_sq / n as f64).sqrt();

                // ====== Step control ======

                if err <= 1.0 {
                    t += h_step;
                    state = state_next;
                    k1 = k7;
                    accepted += 1;
                    validate_state(&state, t)?;
                } else {
                    rejected += 1;
                }

                let factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                h = h_step * factor;
            }

            // The clip above makes t land on t_target exactly
            t = t_target;
            time_points.push(t_target);
            trajectory.push(state.clone());
        }

        // ====== Step 4: Build Result ======

        let final_state = state;

        let mut result = SimulationResult::new(time_points, trajectory, final_state);

        result.add_metadata("solver", self.name());
        result.add_metadata("output points", &output_points.to_string());
        result.add_metadata("total time", &total_time.to_string());
        result.add_metadata("rtol", &rtol.to_string());
        result.add_metadata("atol", &atol.to_string());
        result.add_metadata("accepted steps", &accepted.to_string());
        result.add_metadata("rejected steps", &rejected.to_string());
        result.add_metadata("function evaluations", &evaluations.to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Dormand-Prince (RK45)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
