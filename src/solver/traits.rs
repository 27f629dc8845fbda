//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - Central enum [`SolverType`] defines the kind of numerical solution
//! - [`SolverConfiguration`] carries the type plus validation
//! - [`SimulationResult`] holds the trajectory plus metadata for
//!   extensibility
//!
//! # Stability Guarantee
//!
//! - [`Solver`] trait: STABLE since v0.1.0
//! - [`SolverType`] enum: EXTENSIBLE (new variants can be added)
//! - Core structures: STABLE (fields won't be removed)

use std::collections::HashMap;

use log::warn;
use nalgebra::DVector;

use crate::error::SimulationError;
use crate::model::convert::{self, Standard};
use crate::solver::Scenario;

// ============================================================================
// Central Solver Type Enumeration
// ============================================================================

/// Instability threshold in per-mil.
///
/// A box whose delta drifts from its starting value by at least this much
/// over a simulation has almost certainly left the regime where the
/// linearised delta↔ratio relationship means anything; deltas below
/// -1000 ‰ would even imply negative ratios. Crossing the threshold is
/// reported, not treated as an error: the trajectory is still returned in
/// full so the caller can inspect where things went wrong.
pub const INSTABILITY_THRESHOLD_PERMIL: f64 = 1000.0;

/// Type of numerical solution method.
///
/// Each variant carries the parameters specific to that solution type.
/// Fixed-step methods consume [`SolverType::TimeEvolution`]; the
/// step-controlled Dormand–Prince solver consumes [`SolverType::Adaptive`].
///
/// # Examples
///
/// ```rust
/// use isobox::solver::SolverType;
///
/// // Fixed-step time evolution
/// let solver_type = SolverType::TimeEvolution {
///     total_time: 100.0,
///     time_steps: 10_000,
/// };
/// assert!(solver_type.validate().is_ok());
///
/// // Adaptive integration with error control
/// let solver_type = SolverType::Adaptive {
///     total_time: 1000.0,
///     output_points: 500,
///     rtol: 1e-6,
///     atol: 1e-9,
///     max_steps: 100_000,
/// };
/// assert!(solver_type.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub enum SolverType {
    /// Fixed-step time evolution (ODE integration).
    ///
    /// Used by: Euler, Runge–Kutta 4.
    ///
    /// # Parameters
    /// - `total_time`: total simulated time span
    /// - `time_steps`: number of equal steps, so `dt = total_time / time_steps`
    TimeEvolution { total_time: f64, time_steps: usize },

    /// Adaptive time evolution with local error control.
    ///
    /// Used by: Dormand–Prince RK45.
    ///
    /// # Parameters
    /// - `total_time`: total simulated time span
    /// - `output_points`: number of equally spaced output intervals; the
    ///   result holds `output_points + 1` states including the initial one
    /// - `rtol`: relative error tolerance per step
    /// - `atol`: absolute error tolerance per step
    /// - `max_steps`: hard budget on internal steps, accepted or rejected
    Adaptive {
        total_time: f64,
        output_points: usize,
        rtol: f64,
        atol: f64,
        max_steps: usize,
    },
}

impl SolverType {
    /// Get name identifier.
    pub fn name(&self) -> &'static str {
        match self {
            SolverType::TimeEvolution { .. } => "TimeEvolution",
            SolverType::Adaptive { .. } => "Adaptive",
        }
    }

    /// Validate that parameters are numerically meaningful.
    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            SolverType::TimeEvolution {
                total_time,
                time_steps,
            } => {
                if !total_time.is_finite() || *total_time <= 0.0 {
                    return Err(SimulationError::config(format!(
                        "total time must be positive and finite, got {}",
                        total_time
                    )));
                }
                if *time_steps == 0 {
                    return Err(SimulationError::config(
                        "number of time steps must be greater than 0",
                    ));
                }
                Ok(())
            }
            SolverType::Adaptive {
                total_time,
                output_points,
                rtol,
                atol,
                max_steps,
            } => {
                if !total_time.is_finite() || *total_time <= 0.0 {
                    return Err(SimulationError::config(format!(
                        "total time must be positive and finite, got {}",
                        total_time
                    )));
                }
                if *output_points == 0 {
                    return Err(SimulationError::config(
                        "number of output points must be greater than 0",
                    ));
                }
                if !rtol.is_finite() || *rtol <= 0.0 {
                    return Err(SimulationError::config(format!(
                        "relative tolerance must be positive and finite, got {}",
                        rtol
                    )));
                }
                if !atol.is_finite() || *atol <= 0.0 {
                    return Err(SimulationError::config(format!(
                        "absolute tolerance must be positive and finite, got {}",
                        atol
                    )));
                }
                if *max_steps == 0 {
                    return Err(SimulationError::config(
                        "maximum step budget must be greater than 0",
                    ));
                }
                Ok(())
            }
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for a numerical solver.
///
/// Contains the [`SolverType`] which defines what kind of solution is
/// wanted. The factory methods cover the common cases; tolerances default to
/// values that suit the physiological box models shipped in
/// [`crate::scenarios`].
///
/// # Examples
///
/// ```rust
/// use isobox::solver::SolverConfiguration;
///
/// // Fixed-step configuration for Euler or RK4
/// let config = SolverConfiguration::time_evolution(100.0, 10_000);
/// assert!(config.validate().is_ok());
///
/// // Adaptive configuration for RK45 with default tolerances
/// let config = SolverConfiguration::adaptive(1000.0, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct SolverConfiguration {
    /// Type of solver and its parameters
    pub solver_type: SolverType,
}

impl SolverConfiguration {
    /// Default relative tolerance for adaptive integration.
    pub const DEFAULT_RTOL: f64 = 1e-6;

    /// Default absolute tolerance for adaptive integration.
    pub const DEFAULT_ATOL: f64 = 1e-9;

    /// Default internal step budget for adaptive integration.
    pub const DEFAULT_MAX_STEPS: usize = 100_000;

    /// Create a new configuration with a given solver type.
    pub fn new(solver_type: SolverType) -> Self {
        Self { solver_type }
    }

    /// Create a fixed-step time evolution configuration.
    pub fn time_evolution(total_time: f64, time_steps: usize) -> Self {
        Self::new(SolverType::TimeEvolution {
            total_time,
            time_steps,
        })
    }

    /// Create an adaptive configuration with default tolerances.
    pub fn adaptive(total_time: f64, output_points: usize) -> Self {
        Self::adaptive_with_tolerances(
            total_time,
            output_points,
            Self::DEFAULT_RTOL,
            Self::DEFAULT_ATOL,
        )
    }

    /// Create an adaptive configuration with explicit tolerances.
    pub fn adaptive_with_tolerances(
        total_time: f64,
        output_points: usize,
        rtol: f64,
        atol: f64,
    ) -> Self {
        Self::new(SolverType::Adaptive {
            total_time,
            output_points,
            rtol,
            atol,
            max_steps: Self::DEFAULT_MAX_STEPS,
        })
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.solver_type.validate()
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Stable interface implemented by every numerical solver.
///
/// A solver is stateless: the same instance can be reused for any number of
/// scenarios and configurations.
pub trait Solver {
    /// Integrate the scenario under the given configuration.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::Configuration`] when the configuration or the
    ///   scenario fails validation before the first step;
    /// - [`SimulationError::UnsupportedConfiguration`] when the configuration
    ///   variant does not match the solver;
    /// - [`SimulationError::Integration`] when the state goes NaN/Inf or the
    ///   step control breaks down mid-run.
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SimulationError>;

    /// Human-readable solver name (used for display and metadata).
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Complete output of one integration run.
///
/// The trajectory is stored in ratio space, exactly as integrated. Delta
/// views are derived on demand through [`SimulationResult::delta_trajectory`]
/// and [`SimulationResult::final_delta`] so the stored data stays the
/// solver's ground truth.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Output times, starting at 0 and ending at the configured total time.
    pub time_points: Vec<f64>,

    /// Per-output-time ratio vectors, aligned with `time_points`.
    pub trajectory: Vec<DVector<f64>>,

    /// Ratio vector at the final time (last trajectory element).
    pub final_state: DVector<f64>,

    /// Solver diagnostics: method name, step counts, tolerances.
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Create a result from the raw integration output.
    pub fn new(
        time_points: Vec<f64>,
        trajectory: Vec<DVector<f64>>,
        final_state: DVector<f64>,
    ) -> Self {
        Self {
            time_points,
            trajectory,
            final_state,
            metadata: HashMap::new(),
        }
    }

    /// Number of stored output points (including the initial condition).
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    /// Whether the result holds no output points.
    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// Attach a diagnostic key/value pair.
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Full trajectory converted to delta notation (‰) against `standard`.
    pub fn delta_trajectory(&self, standard: Standard) -> Vec<DVector<f64>> {
        convert::trajectory_to_delta(&self.trajectory, standard)
    }

    /// Final state converted to delta notation (‰) against `standard`.
    pub fn final_delta(&self, standard: Standard) -> DVector<f64> {
        self.final_state
            .map(|ratio| convert::ratio_to_delta(ratio, standard))
    }

    /// Indices of boxes whose delta drifted from its initial value by at
    /// least [`INSTABILITY_THRESHOLD_PERMIL`] anywhere along the trajectory.
    ///
    /// Logs a warning listing the flagged boxes when any are found. An empty
    /// vector means every box stayed within the physically sensible range.
    pub fn unstable_boxes(&self, standard: Standard) -> Vec<usize> {
        let Some(first) = self.trajectory.first() else {
            return Vec::new();
        };
        let initial_delta: DVector<f64> =
            first.map(|ratio| convert::ratio_to_delta(ratio, standard));

        let mut flagged = Vec::new();
        for i in 0..initial_delta.len() {
            let drifted = self.trajectory.iter().any(|state| {
                let delta = convert::ratio_to_delta(state[i], standard);
                (delta - initial_delta[i]).abs() >= INSTABILITY_THRESHOLD_PERMIL
            });
            if drifted {
                flagged.push(i);
            }
        }

        if !flagged.is_empty() {
            warn!(
                "numerical instability suspected: boxes {:?} drifted by more than {} permil",
                flagged, INSTABILITY_THRESHOLD_PERMIL
            );
        }

        flagged
    }
}

// =================================================================================================
// Tests
// =================================================================================================
