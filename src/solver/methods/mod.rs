//! Numerical methods for solving the ratio evolution equations
//!
//! This module contains concrete implementations of the
//! [`Solver`](crate::solver::Solver) trait.
//!
//! # Architecture
//!
//! The separation between abstract solver interface (`solver::traits`) and
//! concrete implementations (`solver::methods`) follows the Open-Closed
//! Principle:
//! - **Open** for extension: add new methods without modifying existing code
//! - **Closed** for modification: the `Solver` trait is stable
//!
//! # Available Methods
//!
//! ## Fixed-Step Explicit Methods
//!
//! Suitable when the turnover timescales of the network are known and the
//! step can be chosen accordingly.
//!
//! - **[`EulerSolver`]**: forward Euler
//!   - Order: first-order O(dt)
//!   - Cost: 1 derivative evaluation per step
//!   - Use: prototyping, convergence baselines
//!
//! - **[`RK4Solver`]**: classical fourth-order Runge–Kutta
//!   - Order: fourth-order O(dt⁴)
//!   - Cost: 4 derivative evaluations per step
//!   - Use: production runs at a known safe step size
//!
//! ## Adaptive Methods
//!
//! - **[`RK45Solver`]**: Dormand–Prince 4(5) embedded pair
//!   - Order: fifth-order propagation with fourth-order error estimate
//!   - Cost: 6 fresh derivative evaluations per attempted step
//!   - Use: long spans and networks whose flux-to-mass ratios spread over
//!     several orders of magnitude, where any fixed step is either wasteful
//!     or unstable
//!
//! # Example
//!
//! ```rust
//! use isobox::model::{RatioEvolution, Standard};
//! use isobox::network::NetworkBuilder;
//! use isobox::solver::{
//!     EulerSolver, RK4Solver, Scenario, Solver, SolverConfiguration,
//! };
//!
//! fn main() -> Result<(), isobox::error::SimulationError> {
//!     let network = NetworkBuilder::new()
//!         .add_box("a", 1.0, 10.0)
//!         .add_box("b", 0.0, 10.0)
//!         .transfer("a", "b", 1.0)
//!         .transfer("b", "a", 1.0)
//!         .build()?;
//!     let model = RatioEvolution::new(network, Standard::new(1.0)?);
//!     let scenario = Scenario::new(Box::new(model));
//!
//!     let configuration = SolverConfiguration::time_evolution(10.0, 1000);
//!
//!     let euler = EulerSolver::new();
//!     let coarse = euler.solve(&scenario, &configuration)?;
//!
//!     let rk4 = RK4Solver::new();
//!     let fine = rk4.solve(&scenario, &configuration)?;
//!
//!     assert_eq!(coarse.len(), fine.len());
//!     Ok(())
//! }
//! ```
//!
//! # Design Philosophy
//!
//! Each solver is:
//! - **Self-contained**: no shared mutable state
//! - **Stateless**: reusable across any number of simulations
//! - **Validated**: configuration and scenario are checked before the first
//!   step, the state after every accepted step

mod euler;
mod rk4;
mod rk45;

// Re-exports for convenience
pub use euler::EulerSolver;
pub use rk4::RK4Solver;
pub use rk45::RK45Solver;
