//! Error taxonomy for box-model simulations
//!
//! Three failure classes cover the whole crate:
//!
//! - [`SimulationError::Configuration`]: the scenario description itself is
//!   invalid (dimension mismatch, unknown box name, non-positive mass, ...).
//!   Always raised *before* any integration step is taken.
//! - [`SimulationError::Integration`]: the numerical integration broke down
//!   (NaN/Inf state, step-size underflow, step budget exhausted). Carries the
//!   simulation time at which the failure was detected so a caller never
//!   receives a silently truncated or NaN-filled trajectory.
//! - [`SimulationError::UnsupportedConfiguration`]: a solver was handed a
//!   configuration variant it does not implement.
//!
//! Numerical *instability* (a box drifting by ≥ 1000 ‰) is deliberately not an
//! error: it is reported through
//! [`SimulationResult::unstable_boxes`](crate::solver::SimulationResult::unstable_boxes)
//! so that callers can distinguish runaway integrations from boxes that are
//! intentionally driven far from equilibrium.

use thiserror::Error;

/// Errors produced while building or integrating a box-model scenario.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The scenario description is invalid; raised before integration starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The numerical integration failed at simulation time `time`.
    #[error("integration failure at t = {time}: {reason}")]
    Integration {
        /// Simulation time at which the failure was detected.
        time: f64,
        /// Human-readable diagnosis (NaN detected, step underflow, ...).
        reason: String,
    },

    /// A solver received a configuration variant it cannot handle.
    #[error("solver `{solver}` does not support `{requested}` configuration")]
    UnsupportedConfiguration {
        /// Name of the solver that rejected the configuration.
        solver: String,
        /// Name of the rejected configuration variant.
        requested: String,
    },
}

impl SimulationError {
    /// Shorthand for a [`SimulationError::Configuration`].
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Shorthand for a [`SimulationError::Integration`].
    pub fn integration(time: f64, reason: impl Into<String>) -> Self {
        Self::Integration {
            time,
            reason: reason.into(),
        }
    }
}
