//! isobox: Isotopic Box-Model Simulation Framework
//!
//! A framework for simulating the isotopic evolution of a network of
//! exchanging reservoirs ("boxes"): metal turnover in the human body,
//! tracers between geochemical reservoirs, any system where mass moves
//! between compartments and fractionates on the way.
//!
//! # Architecture
//!
//! isobox is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Flux models define equations (what to solve)
//!    - Numerical solvers provide methods (how to solve)
//!
//! 2. **Extensibility and Type Safety**
//!    - Trait-based design for easy extension
//!    - Validated construction: a built [`network::BoxNetwork`] is
//!      integrable by contract
//!    - Stable API (v0.1.0+)
//!
//! # Quick Start
//!
//! ```rust
//! use isobox::model::{RatioEvolution, Standard};
//! use isobox::network::NetworkBuilder;
//! use isobox::solver::{RK4Solver, Scenario, Solver, SolverConfiguration};
//!
//! # fn main() -> Result<(), isobox::error::SimulationError> {
//! // 1. Describe the box network
//! let network = NetworkBuilder::new()
//!     .add_box("plasma", 0.0, 3.0)
//!     .add_box("bone", 0.48, 770.0)
//!     .transfer("plasma", "bone", 0.029)
//!     .transfer("bone", "plasma", 0.029)
//!     .fractionation("plasma", "bone", 1.0003)
//!     .build()?;
//!
//! // 2. Wrap it in a model and a scenario
//! let model = RatioEvolution::new(network, Standard::JMC_ZN);
//! let scenario = Scenario::new(Box::new(model));
//!
//! // 3. Configure and run a solver
//! let config = SolverConfiguration::time_evolution(365.0, 10_000);
//! let result = RK4Solver::new().solve(&scenario, &config)?;
//!
//! // 4. Read the answer back in delta notation
//! let final_delta = result.final_delta(Standard::JMC_ZN);
//! println!("plasma ends at {:.3} permil", final_delta[0]);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`network`]: box networks and their validating builder
//! - [`model`]: flux models (equations) and delta↔ratio conversions
//! - [`solver`]: numerical solvers (methods)
//! - [`scenarios`]: ready-made physiological networks
//! - [`error`]: the crate-wide error type

// Core modules
pub mod error;
pub mod model;
pub mod network;
pub mod scenarios;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use isobox::prelude::*;
    //! ```
    pub use crate::error::SimulationError;
    pub use crate::model::{FluxModel, RatioEvolution, Standard};
    pub use crate::network::{BoxNetwork, NetworkBuilder};
    pub use crate::solver::{
        EulerSolver, RK45Solver, RK4Solver, Scenario, SimulationResult, Solver,
        SolverConfiguration, SolverType,
    };
}
