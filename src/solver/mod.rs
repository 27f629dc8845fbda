//! Numerical solvers
//!
//! This module provides the numerics side of the crate. A solver applies a
//! time-integration scheme to the equations provided by a
//! [`FluxModel`](crate::model::FluxModel) within a specific scenario.
//!
//! # Core Concepts
//!
//! The architecture separates concerns into three layers:
//!
//! 1. **Scenario** ([`Scenario`]) — WHAT to solve: the flux model plus its
//!    initial ratio vector.
//! 2. **Configuration** ([`SolverConfiguration`]) — HOW to solve: time span,
//!    output resolution, tolerances.
//! 3. **Solver** ([`Solver`] trait) — the numerical method itself,
//!    independent of the physics.
//!
//! The same scenario can be solved with different methods, and the same
//! method reused across scenarios, which keeps benchmarking and method
//! comparison trivial.
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver` trait, `SolverType`, `SolverConfiguration` and
//!   `SimulationResult`.
//! - **`scenario`**: problem definition and pre-integration validation.
//! - **Solver implementations** under `methods/`:
//!   - [`EulerSolver`]: forward Euler, first order, fixed step;
//!   - [`RK4Solver`]: classical Runge–Kutta, fourth order, fixed step;
//!   - [`RK45Solver`]: Dormand–Prince 4(5) with adaptive step-size control,
//!     the method of choice when turnover timescales are spread over
//!     several orders of magnitude.
//!
//! # Quick Start Example
//!
//! ```rust
//! use isobox::model::{RatioEvolution, Standard};
//! use isobox::network::NetworkBuilder;
//! use isobox::solver::{RK4Solver, Scenario, Solver, SolverConfiguration};
//!
//! let network = NetworkBuilder::new()
//!     .add_box("plasma", 0.0, 3.0)
//!     .add_box("rbc", 1.0, 25.0)
//!     .transfer("plasma", "rbc", 2.0)
//!     .transfer("rbc", "plasma", 2.0)
//!     .build()
//!     .unwrap();
//!
//! // 1. Create scenario (WHAT to solve)
//! let model = RatioEvolution::new(network, Standard::JMC_ZN);
//! let scenario = Scenario::new(Box::new(model));
//!
//! // 2. Create configuration (HOW to solve)
//! let config = SolverConfiguration::time_evolution(100.0, 10_000);
//!
//! // 3. Create solver and solve
//! let result = RK4Solver.solve(&scenario, &config).unwrap();
//!
//! // 4. Access results in delta notation
//! let final_delta = result.final_delta(Standard::JMC_ZN);
//! assert_eq!(final_delta.len(), 2);
//! ```
//!
//! # Error Handling
//!
//! All solver entry points return `Result<_, SimulationError>`:
//! configuration and scenario problems surface as
//! [`SimulationError::Configuration`] before the first step, NaN/Inf states
//! and step-control breakdowns as [`SimulationError::Integration`] with the
//! simulation time attached. A solver never returns a partial or NaN-filled
//! trajectory.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod scenario;
mod traits;

mod methods;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work off to Rayon is a numerical-execution concern,
// not a physics concern, so the knob lives here rather than next to the
// conversion code in model/convert.rs that consumes it.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (useful in benchmarks and tests) without requiring a mutex on every
// conversion call.  Relaxed ordering is sufficient: the value is a
// performance hint, not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of trajectory elements above which
/// [`trajectory_to_delta`](crate::model::convert::trajectory_to_delta)
/// switches to parallel iteration.
///
/// The crossover is set at 4 096 elements.  Below that point the overhead of
/// Rayon's thread-pool dispatch outweighs the per-element arithmetic; a
/// 10-box network needs a trajectory of several hundred timesteps before the
/// crossover is reached.
const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// Trajectory conversion uses sequential iteration when the trajectory holds
/// fewer elements than this value, and switches to Rayon when it holds
/// more — but only when the crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use isobox::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.  A zero-element threshold would force
/// parallel dispatch on every single-element conversion, which is never
/// the intended behaviour.
///
/// # Example
///
/// ```rust
/// use isobox::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds.  Prevents one test from leaking a modified
/// threshold value into the next.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring to any value (including
        // the original default) never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    SimulationResult, Solver, SolverConfiguration, SolverType, INSTABILITY_THRESHOLD_PERMIL,
};

pub use scenario::Scenario;

pub use methods::{EulerSolver, RK45Solver, RK4Solver};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::SimulationError;
use nalgebra::DVector;

/// Validate a ratio state vector for numerical issues.
///
/// Checks that the state does not contain NaN or Inf values, which would
/// indicate numerical instability or overflow in the integration.  Every
/// solver calls this after each accepted step, so a failure carries the
/// simulation time at which the state first went bad.
pub(crate) fn validate_state(state: &DVector<f64>, time: f64) -> Result<(), SimulationError> {
    for (i, &value) in state.iter().enumerate() {
        // NaN can arise from 0/0, Inf - Inf, or other undefined operations.
        if value.is_nan() {
            return Err(SimulationError::integration(
                time,
                format!(
                    "NaN detected in box {}; this indicates numerical instability, \
                     try reducing the time step or tightening tolerances",
                    i
                ),
            ));
        }

        // Inf indicates overflow, typically a step far beyond the stability
        // limit of an explicit method.
        if value.is_infinite() {
            return Err(SimulationError::integration(
                time,
                format!(
                    "infinity detected in box {}; this indicates numerical overflow, \
                     try reducing the time step or tightening tolerances",
                    i
                ),
            ));
        }
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The threshold is process-global state; tests that touch it must not
    // run concurrently with each other.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_get_and_set_threshold() {
        let _lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _guard = ThresholdGuard::save(512);
        assert_eq!(parallel_threshold(), 512);
    }

    #[test]
    #[should_panic(expected = "parallel threshold must be at least 1")]
    fn test_zero_threshold_panics() {
        set_parallel_threshold(0);
    }

    #[test]
    fn test_threshold_guard_restores_previous_value() {
        let _lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = parallel_threshold();
        {
            let _guard = ThresholdGuard::save(42);
            assert_eq!(parallel_threshold(), 42);
        }
        // Guard dropped — value must be back to what it was before.
        assert_eq!(parallel_threshold(), before);
    }

    #[test]
    fn test_threshold_is_visible_across_threads() {
        use std::thread;

        let _lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _guard = ThresholdGuard::save(1234);

        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(parallel_threshold))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1234);
        }
    }

    #[test]
    fn test_validate_state_accepts_finite_vectors() {
        let state = DVector::from_vec(vec![0.565, 0.566, 0.0]);
        assert!(validate_state(&state, 1.0).is_ok());
    }

    #[test]
    fn test_validate_state_rejects_nan_with_time() {
        let state = DVector::from_vec(vec![0.5, f64::NAN]);
        let err = validate_state(&state, 12.5).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("NaN"));
        assert!(msg.contains("box 1"));
        assert!(msg.contains("t = 12.5"));
    }

    #[test]
    fn test_validate_state_rejects_infinity() {
        let state = DVector::from_vec(vec![f64::INFINITY]);
        let err = validate_state(&state, 3.0).unwrap_err();
        assert!(err.to_string().contains("infinity"));
    }
}
