//! Common utilities for integration tests

// Each test binary compiles this module but uses only a subset of it.
#![allow(dead_code)]

use isobox::model::{RatioEvolution, Standard};
use isobox::network::NetworkBuilder;
use isobox::solver::Scenario;
use nalgebra::DVector;

/// Relative error between a computed and a reference value.
pub fn relative_error(computed: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        computed.abs()
    } else {
        ((computed - reference) / reference).abs()
    }
}

/// Two boxes exchanging a symmetric flux with no fractionation, reported
/// against a unit standard so deltas and ratios stay easy to read.
///
/// The ratio difference decays analytically as exp(-lambda * t) with
/// lambda = flux * (1/mass_a + 1/mass_b), toward the mass-weighted mean.
pub fn two_box_scenario(
    delta_a: f64,
    delta_b: f64,
    mass_a: f64,
    mass_b: f64,
    flux: f64,
) -> Scenario {
    let network = NetworkBuilder::new()
        .add_box("a", delta_a, mass_a)
        .add_box("b", delta_b, mass_b)
        .transfer("a", "b", flux)
        .transfer("b", "a", flux)
        .build()
        .unwrap();
    let model = RatioEvolution::new(network, Standard::new(1.0).unwrap());
    Scenario::new(Box::new(model))
}

/// Mass-weighted total of a state vector, the quantity the equations
/// conserve exactly.
pub fn weighted_total(masses: &DVector<f64>, state: &DVector<f64>) -> f64 {
    (0..masses.len()).map(|i| masses[i] * state[i]).sum()
}
