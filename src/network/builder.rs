//! Builder for [`BoxNetwork`] with construction-time validation
//!
//! The builder collects boxes, transfers and fractionation factors in the
//! order the caller declares them, then checks the whole description at once
//! in [`NetworkBuilder::build`]. Every invariant violation is reported as a
//! [`SimulationError::Configuration`] *before* any integration can start.
//!
//! # Direction Convention
//!
//! A transfer is always a `(source, destination, magnitude)` triple with a
//! non-negative magnitude. Earlier model generations encoded "reverse
//! direction" as a negative flux value; the builder rejects that convention
//! outright — swap source and destination instead.

use super::BoxNetwork;
use crate::error::SimulationError;
use crate::network::IsotopeBox;
use nalgebra::{DMatrix, DVector};
use std::collections::HashSet;

/// One directed mass transfer between two named boxes.
#[derive(Debug, Clone, PartialEq)]
struct Transfer {
    source: String,
    destination: String,
    rate: f64,
}

/// One directed fractionation factor between two named boxes.
#[derive(Debug, Clone, PartialEq)]
struct Fractionation {
    source: String,
    destination: String,
    coefficient: f64,
}

/// Incremental builder for a validated [`BoxNetwork`].
///
/// # Example
///
/// ```rust
/// use isobox::network::NetworkBuilder;
///
/// let network = NetworkBuilder::new()
///     .add_box("diet", 0.0, 1e12)
///     .add_box("plasma", 0.0, 3.0)
///     .transfer("diet", "plasma", 1.3)
///     .fractionation("diet", "plasma", 1.00018)
///     .build()
///     .unwrap();
///
/// assert_eq!(network.flux_between("diet", "plasma"), Some(1.3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    boxes: Vec<IsotopeBox>,
    transfers: Vec<Transfer>,
    fractionations: Vec<Fractionation>,
}

impl NetworkBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a box. Declaration order fixes the canonical index.
    pub fn add_box(mut self, name: &str, delta: f64, mass: f64) -> Self {
        self.boxes.push(IsotopeBox {
            name: name.to_string(),
            delta,
            mass,
        });
        self
    }

    /// Declare a directed mass transfer `source → destination` at `rate`.
    ///
    /// Transfers not declared default to zero flux. Declaring the same pair
    /// twice accumulates the rates.
    pub fn transfer(mut self, source: &str, destination: &str, rate: f64) -> Self {
        self.transfers.push(Transfer {
            source: source.to_string(),
            destination: destination.to_string(),
            rate,
        });
        self
    }

    /// Declare the fractionation factor applied to the `source → destination`
    /// flux. Pairs not declared default to 1.0 (no fractionation).
    pub fn fractionation(mut self, source: &str, destination: &str, coefficient: f64) -> Self {
        self.fractionations.push(Fractionation {
            source: source.to_string(),
            destination: destination.to_string(),
            coefficient,
        });
        self
    }

    /// Validate the collected description and build the network.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] when:
    /// - no box was declared, or a box name is duplicated;
    /// - a box has a non-positive or non-finite mass, or a non-finite delta;
    /// - a transfer or fractionation references an unknown box name;
    /// - a transfer is a self-flux (`source == destination`);
    /// - a transfer rate is negative or non-finite;
    /// - a fractionation coefficient is non-positive or non-finite.
    pub fn build(self) -> Result<BoxNetwork, SimulationError> {
        if self.boxes.is_empty() {
            return Err(SimulationError::config("network has no boxes"));
        }

        let mut seen = HashSet::new();
        for b in &self.boxes {
            if !seen.insert(b.name.as_str()) {
                return Err(SimulationError::config(format!(
                    "duplicate box name `{}`",
                    b.name
                )));
            }
            if !b.mass.is_finite() || b.mass <= 0.0 {
                return Err(SimulationError::config(format!(
                    "mass of box `{}` must be strictly positive and finite, got {}",
                    b.name, b.mass
                )));
            }
            if !b.delta.is_finite() {
                return Err(SimulationError::config(format!(
                    "delta of box `{}` must be finite, got {}",
                    b.name, b.delta
                )));
            }
        }

        let n = self.boxes.len();
        let names: Vec<String> = self.boxes.iter().map(|b| b.name.clone()).collect();
        let deltas = DVector::from_iterator(n, self.boxes.iter().map(|b| b.delta));
        let masses = DVector::from_iterator(n, self.boxes.iter().map(|b| b.mass));

        let index_of = |name: &str| -> Result<usize, SimulationError> {
            names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| SimulationError::config(format!("unknown box name `{}`", name)))
        };

        let mut flux = DMatrix::zeros(n, n);
        for t in &self.transfers {
            if t.source == t.destination {
                return Err(SimulationError::config(format!(
                    "self-flux on box `{}` is not allowed",
                    t.source
                )));
            }
            if !t.rate.is_finite() || t.rate < 0.0 {
                return Err(SimulationError::config(format!(
                    "transfer `{}` -> `{}` must have a non-negative finite rate, got {} \
                     (swap source and destination to reverse direction)",
                    t.source, t.destination, t.rate
                )));
            }
            let i = index_of(&t.source)?;
            let j = index_of(&t.destination)?;
            flux[(i, j)] += t.rate;
        }

        let mut partition = DMatrix::from_element(n, n, 1.0);
        for f in &self.fractionations {
            if !f.coefficient.is_finite() || f.coefficient <= 0.0 {
                return Err(SimulationError::config(format!(
                    "fractionation `{}` -> `{}` must be strictly positive and finite, got {}",
                    f.source, f.destination, f.coefficient
                )));
            }
            let i = index_of(&f.source)?;
            let j = index_of(&f.destination)?;
            partition[(i, j)] = f.coefficient;
        }

        Ok(BoxNetwork::from_parts(names, deltas, masses, flux, partition))
    }
}
