//! Runge-Kutta 4 (RK4) numerical solver
//!
//! # Mathematical Background
//!
//! The classical fourth-order Runge-Kutta method (RK4) is one of the most
//! widely used numerical integrators for ordinary differential equations:
//!
//! ```text
//! dy/dt = f(y, t)
//! ```
//!
//! The RK4 scheme uses a weighted average of four slope estimates:
//!
//! ```text
//! k₁ = f(yₙ, tₙ)
//! k₂ = f(yₙ + dt/2 * k₁, tₙ + dt/2)
//! k₃ = f(yₙ + dt/2 * k₂, tₙ + dt/2)
//! k₄ = f(yₙ + dt * k₃, tₙ + dt)
//!
//! yₙ₊₁ = yₙ + dt/6 * (k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: fourth-order accurate (error ~ O(dt⁴))
//! - **Stability**: better than Euler, allows ~2.78× larger steps
//! - **Complexity**: 4 derivative evaluations per step
//!
//! # Conservation
//!
//! The box-model equations carry an exact linear invariant: the
//! mass-weighted sum of rates is zero. Runge-Kutta methods preserve linear
//! invariants exactly, so the total isotope content of a closed network is
//! conserved to floating-point precision, step size regardless.
//!
//! # When to Use
//!
//! - Production runs at a known safe step size
//! - Non-stiff networks (no extreme flux-to-mass ratios)
//!
//! # When NOT to Use
//!
//! - Networks with a near-massless box → any practical fixed step is
//!   unstable; use [`RK45Solver`](super::RK45Solver)
//! - Need error control → use the adaptive solver

use log::info;
use nalgebra::DVector;

use crate::error::SimulationError;
use crate::solver::{
    validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Classical fourth-order Runge-Kutta solver
///
/// Implements the RK4 time integration scheme with four intermediate stages
/// per time step, providing fourth-order accuracy.
///
/// # Algorithm
///
/// For ODE system dy/dt = f(y, t):
///
/// 1. Start with initial state y₀
/// 2. For each time step n = 0, 1, 2, ..., N-1:
///    - **Stage 1**: k₁ = f(yₙ, tₙ), slope at the beginning of the interval
///    - **Stage 2**: k₂ = f(yₙ + dt/2·k₁, tₙ + dt/2), slope at the midpoint
///      predicted with k₁
///    - **Stage 3**: k₃ = f(yₙ + dt/2·k₂, tₙ + dt/2), slope at the midpoint
///      predicted with k₂
///    - **Stage 4**: k₄ = f(yₙ + dt·k₃, tₙ + dt), slope at the end
///    - **Update**: yₙ₊₁ = yₙ + dt/6·(k₁ + 2k₂ + 2k₃ + k₄)
/// 3. Return complete trajectory
///
/// # Error Analysis
///
/// - **Local truncation error**: O(dt⁵) per step
/// - **Global error**: O(dt⁴) after T/dt steps
/// - **Convergence**: halving dt reduces the error by a factor of 16
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    /// Create a new RK4 solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use isobox::solver::{RK4Solver, Solver};
    ///
    /// let solver = RK4Solver::new();
    /// assert_eq!(solver.name(), "Runge Kutta (RK4)");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for RK4Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SimulationError> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        // RK4 is dedicated to fixed-step time evolution

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
            "RK4: integrating `{}` over {} time units in {} steps",
            scenario.model_name(),
            total_time,
            time_steps
        );

        // ====== Step 2: Setup ======

        let dt = total_time / (time_steps as f64);

        let mut state: DVector<f64> = scenario.initial.clone();

        let mut time_points = Vec::with_capacity(time_steps + 1);
        let mut trajectory = Vec::with_capacity(time_steps + 1);

        time_points.push(0.0);
        trajectory.push(state.clone());

        // ====== Step 3: Time Integration ======

        let model = scenario.model.as_ref();

        for step in 0..time_steps {
            let t = (step as f64) * dt;

            // ====== RK4 Stages ======

            let k1 = model.derivative(&state, t);
            let k2 = model.derivative(&(&state + &k1 * (dt / 2.0)), t + dt / 2.0);
            let k3 = model.derivative(&(&state + &k2 * (dt / 2.0)), t + dt / 2.0);
            let k4 = model.derivative(&(&state + &k3 * dt), t + dt);

            // ====== RK4 Update ======

            // Simpson's rule weights: endpoints 1/6, midpoints 2/6
            let weighted_slope = k1 + k2 * 2.0 + k3 * 2.0 + k4;
            state += weighted_slope * (dt / 6.0);

            // ====== Storage ======

            trajectory.push(state.clone());

            // t_{n+1} computed directly from the index so the final time is
            // exactly total_time within machine epsilon
            let t_next = (step as f64 + 1.0) * dt;
            time_points.push(t_next);

            // ====== Validation ======

            validate_state(&state, t_next)?;
        }

        // ====== Step 4: Build Result ======

        let final_state = state;

        let mut result = SimulationResult::new(time_points, trajectory, final_state);

        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &time_steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("total time", &total_time.to_string());
        result.add_metadata("function evaluations", &(4 * time_steps).to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Runge Kutta (RK4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
