//! Delta↔ratio conversions and isotopic standards
//!
//! Delta notation expresses an isotopic composition as the parts-per-thousand
//! deviation of an absolute ratio from a reference standard:
//!
//! ```text
//! ratio = (delta / 1000 + 1) * standard
//! delta = (ratio / standard - 1) * 1000
//! ```
//!
//! Which standard applies is a calibration choice, not something the library
//! can guess: a zinc model reports against the JMC Lyon standard, an iron
//! model against IRMM-014. The [`Standard`] is therefore an explicit,
//! validated parameter of every model, with the two reference values used by
//! the physiological scenarios provided as associated constants.
//!
//! The division by 1000 happens *before* the `+ 1` — both transforms here are
//! each other's exact inverse and are round-trip tested.

use crate::error::SimulationError;
use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Reference isotopic ratio defining the zero point of delta notation.
///
/// Always strictly positive and finite.
///
/// # Example
///
/// ```rust
/// use isobox::model::Standard;
///
/// let standard = Standard::new(0.565203).unwrap();
/// assert_eq!(standard, Standard::JMC_ZN);
/// assert!(Standard::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standard(f64);

impl Standard {
    /// JMC Lyon ⁶⁶Zn/⁶⁴Zn reference ratio.
    pub const JMC_ZN: Standard = Standard(0.565203);

    /// IRMM-014 ⁵⁶Fe/⁵⁴Fe reference ratio.
    pub const IRMM_FE: Standard = Standard(0.0637);

    /// Create a standard from a reference ratio.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] when `ratio` is not
    /// strictly positive and finite.
    pub fn new(ratio: f64) -> Result<Self, SimulationError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(SimulationError::config(format!(
                "isotopic standard must be strictly positive and finite, got {}",
                ratio
            )));
        }
        Ok(Self(ratio))
    }

    /// The reference ratio value.
    pub fn ratio(self) -> f64 {
        self.0
    }
}

/// Convert one delta value (‰) to an absolute ratio.
#[inline]
pub fn delta_to_ratio(delta: f64, standard: Standard) -> f64 {
    (delta / 1e3 + 1.0) * standard.ratio()
}

/// Convert one absolute ratio back to delta notation (‰).
#[inline]
pub fn ratio_to_delta(ratio: f64, standard: Standard) -> f64 {
    (ratio / standard.ratio() - 1.0) * 1e3
}

/// Convert a per-box delta vector into the initial ratio vector handed to
/// the integrator.
pub fn initial_ratio(deltas: &DVector<f64>, standard: Standard) -> DVector<f64> {
    deltas.map(|delta| delta_to_ratio(delta, standard))
}

/// Convert a full ratio trajectory back to delta notation, elementwise
/// across every timestep and box.
///
/// With the `parallel` feature enabled, trajectories holding more elements
/// than [`crate::solver::parallel_threshold`] are converted across threads;
/// each timestep is independent, so the split is over timesteps.
pub fn trajectory_to_delta(trajectory: &[DVector<f64>], standard: Standard) -> Vec<DVector<f64>> {
    let elements: usize = trajectory.iter().map(|state| state.len()).sum();

    #[cfg(feature = "parallel")]
    if elements > crate::solver::parallel_threshold() {
        return trajectory
            .par_iter()
            .map(|state| state.map(|ratio| ratio_to_delta(ratio, standard)))
            .collect();
    }

    let _ = elements;
    trajectory
        .iter()
        .map(|state| state.map(|ratio| ratio_to_delta(ratio, standard)))
        .collect()
}
