//! Box networks: reservoirs, flux and partition-coefficient matrices
//!
//! A [`BoxNetwork`] is the complete, validated data model of one scenario:
//!
//! - an ordered set of named boxes (reservoirs), each with an initial delta
//!   value (‰ deviation from a standard) and a mass;
//! - a square flux matrix, `flux[(i, j)]` being the mass transfer rate from
//!   box `i` to box `j` (diagonal always zero — no self-flux);
//! - a square partition-coefficient matrix, `partition[(i, j)]` being the
//!   dimensionless fractionation factor applied to the `i → j` flux
//!   (defaults to 1.0 — no fractionation).
//!
//! # Canonical Index
//!
//! All three structures share a single name↔index mapping established once at
//! [`NetworkBuilder::build`] time and never reordered afterwards. Row `i` of
//! the flux matrix, entry `i` of the mass vector and entry `i` of the delta
//! vector always refer to the same box. Code must never re-derive ordering by
//! iterating over a map.
//!
//! # Immutability
//!
//! A built network is read-only for the lifetime of an integration run. When
//! scanning parameters, build a fresh network per combination instead of
//! mutating a shared one.
//!
//! # Example
//!
//! ```rust
//! use isobox::network::NetworkBuilder;
//!
//! let network = NetworkBuilder::new()
//!     .add_box("plasma", 0.0, 3.0)
//!     .add_box("rbc", 0.0, 25.0)
//!     .transfer("plasma", "rbc", 0.18)
//!     .transfer("rbc", "plasma", 0.18)
//!     .fractionation("plasma", "rbc", 1.00025)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(network.n_boxes(), 2);
//! assert_eq!(network.index_of("rbc"), Some(1));
//! ```

mod builder;

pub use builder::NetworkBuilder;

use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;

/// One named reservoir: initial delta (‰) and mass.
///
/// Masses must be strictly positive; a value as small as `1e-10` stands in
/// for "negligible reservoir", never a true zero (the kernel divides by it).
#[derive(Debug, Clone, PartialEq)]
pub struct IsotopeBox {
    /// Box name, unique within a network.
    pub name: String,
    /// Initial isotopic composition in delta notation (‰).
    pub delta: f64,
    /// Reservoir size, in any unit consistent with the flux rates.
    pub mass: f64,
}

/// Validated, immutable description of a flux-box scenario.
///
/// Construct through [`NetworkBuilder`]; a value of this type is guaranteed
/// to have consistent dimensions, strictly positive masses, a zero flux
/// diagonal and non-negative flux entries.
#[derive(Debug, Clone)]
pub struct BoxNetwork {
    names: Vec<String>,
    index: HashMap<String, usize>,
    deltas: DVector<f64>,
    masses: DVector<f64>,
    flux: DMatrix<f64>,
    partition: DMatrix<f64>,
}

impl BoxNetwork {
    /// Internal constructor; invariants are enforced by the builder.
    pub(crate) fn from_parts(
        names: Vec<String>,
        deltas: DVector<f64>,
        masses: DVector<f64>,
        flux: DMatrix<f64>,
        partition: DMatrix<f64>,
    ) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names,
            index,
            deltas,
            masses,
            flux,
            partition,
        }
    }

    /// Number of boxes N. Flux and partition matrices are N×N.
    pub fn n_boxes(&self) -> usize {
        self.names.len()
    }

    /// Box names in canonical order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Canonical index of a box name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Initial delta values (‰) in canonical order.
    pub fn deltas(&self) -> &DVector<f64> {
        &self.deltas
    }

    /// Box masses in canonical order.
    pub fn masses(&self) -> &DVector<f64> {
        &self.masses
    }

    /// The full flux matrix, `flux[(i, j)]` = rate from box `i` to box `j`.
    pub fn flux(&self) -> &DMatrix<f64> {
        &self.flux
    }

    /// The full partition-coefficient matrix.
    pub fn partition(&self) -> &DMatrix<f64> {
        &self.partition
    }

    /// Flux rate between two named boxes, if both names exist.
    pub fn flux_between(&self, source: &str, destination: &str) -> Option<f64> {
        let i = self.index_of(source)?;
        let j = self.index_of(destination)?;
        Some(self.flux[(i, j)])
    }

    /// True when box `i` exchanges no mass with any other box.
    ///
    /// Such a box has a constant ratio for the whole integration.
    pub fn is_isolated(&self, i: usize) -> bool {
        let n = self.n_boxes();
        (0..n).all(|j| self.flux[(i, j)] == 0.0 && self.flux[(j, i)] == 0.0)
    }
}
