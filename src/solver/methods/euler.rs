//! Forward Euler numerical solver
//!
//! # Mathematical Background
//!
//! The Forward Euler method is the simplest explicit time-stepping scheme
//! for solving ordinary differential equations (ODEs):
//!
//! ```text
//! dy/dt = f(y, t)
//! ```
//!
//! The scheme approximates the solution at time t_{n+1} = t_n + dt using:
//!
//! ```text
//! y_{n+1} = y_n + dt * f(y_n, t_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: first-order accurate (error ~ O(dt))
//! - **Stability**: conditionally stable (requires small time steps)
//! - **Complexity**: 1 derivative evaluation per step
//! - **Memory**: O(1) beyond the stored trajectory
//!
//! # When to Use
//!
//! - Prototyping and convergence baselines
//! - Quick exploratory simulations on slow networks
//!
//! # When NOT to Use
//!
//! - Production runs → use [`RK4Solver`](super::RK4Solver) or
//!   [`RK45Solver`](super::RK45Solver)
//! - Networks with a fast box (small mass, large flux) → the stability
//!   limit dt < 2 * Mass / Flux forces impractically many steps; use the
//!   adaptive solver instead

use log::info;
use nalgebra::DVector;

use crate::error::SimulationError;
use crate::solver::{
    validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
};

// =================================================================================================
// Forward Euler Solver
// =================================================================================================

/// Forward Euler time-stepping solver
///
/// Implements the simplest explicit time integration scheme:
/// y_{n+1} = y_n + dt * f(y_n)
///
/// # Algorithm
///
/// 1. Start with the scenario's initial ratio vector y_0
/// 2. For each time step n = 0, 1, 2, ..., N-1:
///    - Compute the derivative: k = f(y_n, t_n)
///    - Update state: y_{n+1} = y_n + dt * k
///    - Store trajectory point, validate for NaN/Inf
/// 3. Return complete trajectory
///
/// # Stability
///
/// The method is **conditionally stable**. For the linear box-model
/// equations the fastest turnover rate λ_max ≈ max_i(Σ_j Flux[i][j] /
/// Mass[i]) bounds the step:
///
/// ```text
/// dt < 2 / λ_max
/// ```
///
/// # Error Analysis
///
/// - **Local truncation error**: O(dt²) per step
/// - **Global error**: O(dt) after T/dt steps
/// - **Convergence**: first-order convergence when refining dt
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    /// Create a new Forward Euler solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use isobox::solver::{EulerSolver, Solver};
    ///
    /// let solver = EulerSolver::new();
    /// assert_eq!(solver.name(), "Forward Euler");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SimulationError> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        // Forward Euler is dedicated to fixed-step time evolution

        let (total_time, time_steps) = match &config.solver_type {
            SolverType::TimeEvolution {
                total_time,
                time_steps,
            } => (*total_time, *time_steps),
            other => {
                return Err(SimulationError::UnsupportedConfiguration {
                    solver: self.name().to_string(),
                    requested: other.name().to_string(),
                });
            }
        };

        info!(
            "Forward Euler: integrating `{}` over {} time units in {} steps",
            scenario.model_name(),
            total_time,
            time_steps
        );

        // ====== Step 2: Setup ======

        // dt = T / N where T is total time and N is number of steps
        let dt = total_time / (time_steps as f64);

        let mut state: DVector<f64> = scenario.initial.clone();

        // Reserve exact capacity to avoid reallocation during integration
        let mut time_points = Vec::with_capacity(time_steps + 1);
        let mut trajectory = Vec::with_capacity(time_steps + 1);

        time_points.push(0.0);
        trajectory.push(state.clone());

        // ====== Step 3: Time Integration ======

        for step in 0..time_steps {
            let t = dt * step as f64;

            // Euler step: y_{n+1} = y_n + dt * f(y_n, t_n)
            let derivative = scenario.model.derivative(&state, t);
            state += derivative * dt;

            trajectory.push(state.clone());

            // Store time point: t_{n+1} = (step + 1) * dt
            // Calculated directly from the index rather than accumulated so
            // that the final time point is exactly total_time within machine
            // epsilon (t += dt drifts by ~n*eps over n steps).
            let t_next = (step as f64 + 1.0) * dt;
            time_points.push(t_next);

            validate_state(&state, t_next)?;
        }

        // ====== Step 4: Build Result ======

        let final_state = state;

        let mut result = SimulationResult::new(time_points, trajectory, final_state);

        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &time_steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("total time", &total_time.to_string());
        result.add_metadata("function evaluations", &time_steps.to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
