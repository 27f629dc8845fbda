//! Simulation scenario definition
//!
//! A scenario combines a flux model with its initial ratio vector.

use nalgebra::DVector;

use crate::error::SimulationError;
use crate::model::FluxModel;

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - flux model (equations)
/// - initial ratio vector (starting condition)
///
/// # Design
///
/// The same scenario can be solved with different numerical methods.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust
/// use isobox::model::{FluxModel, RatioEvolution, Standard};
/// use isobox::network::NetworkBuilder;
/// use isobox::solver::Scenario;
///
/// let network = NetworkBuilder::new()
///     .add_box("a", 1.0, 10.0)
///     .add_box("b", 0.0, 10.0)
///     .transfer("a", "b", 1.0)
///     .transfer("b", "a", 1.0)
///     .build()
///     .unwrap();
/// let model = RatioEvolution::new(network, Standard::new(1.0).unwrap());
///
/// let scenario = Scenario::new(Box::new(model));
/// assert!(scenario.validate().is_ok());
/// assert_eq!(scenario.n_boxes(), 2);
/// ```
pub struct Scenario {
    /// Flux model (equations)
    pub model: Box<dyn FluxModel>,

    /// Initial ratio vector handed to the solver at t = 0
    pub initial: DVector<f64>,
}

impl Scenario {
    /// Create a scenario starting from the model's own initial ratios.
    pub fn new(model: Box<dyn FluxModel>) -> Self {
        let initial = model.initial_ratio();
        Self { model, initial }
    }

    /// Create a scenario with an explicit starting state, overriding the
    /// model's configured deltas. Useful for restarting from a previous
    /// result or probing perturbed initial conditions.
    pub fn with_initial(model: Box<dyn FluxModel>, initial: DVector<f64>) -> Self {
        Self { model, initial }
    }

    /// Verify scenario consistency before integration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] when the initial vector
    /// length does not match the model's box count, or when any initial
    /// ratio is non-finite or not strictly positive.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.initial.len() != self.model.n_boxes() {
            return Err(SimulationError::config(format!(
                "initial state has {} entries but the model has {} boxes",
                self.initial.len(),
                self.model.n_boxes()
            )));
        }
        for (i, &ratio) in self.initial.iter().enumerate() {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(SimulationError::config(format!(
                    "initial ratio of box {} must be strictly positive and finite, got {}",
                    i, ratio
                )));
            }
        }
        Ok(())
    }

    /// Get model name.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Number of boxes in the underlying model.
    pub fn n_boxes(&self) -> usize {
        self.model.n_boxes()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("model", &self.model_name())
            .field("boxes", &self.n_boxes())
            .field("initial", &self.initial)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
