//! Simple human iron turnover network
//!
//! Seven compartments: diet, plasma, red blood cells, liver, urine, feces
//! and menses. Fluxes are fixed literature values in mg/day and no edge
//! fractionates, so any delta evolution comes purely from mixing reservoirs
//! that start at different compositions. Deltas are reported against the
//! IRMM-014 ⁵⁶Fe/⁵⁴Fe standard.
//!
//! The urine compartment carries a token mass of 1e-10 mg against an influx
//! of 0.1 mg/day, giving it a turnover rate of order 1e9 per day. That makes
//! this network severely stiff: fixed-step explicit solvers need absurdly
//! small steps, and even [`RK45Solver`](crate::solver::RK45Solver) spends
//! its step budget resolving the urine box. Treat this model as a
//! construction and derivative fixture, or integrate it with the urine box
//! given a physical mass.

use crate::error::SimulationError;
use crate::model::{RatioEvolution, Standard};
use crate::network::NetworkBuilder;

/// Build the simple iron turnover model.
///
/// # Example
///
/// ```rust
/// use isobox::model::FluxModel;
/// use isobox::scenarios::iron_simple;
///
/// let model = iron_simple().unwrap();
/// assert_eq!(model.n_boxes(), 7);
/// ```
pub fn iron_simple() -> Result<RatioEvolution, SimulationError> {
    let network = NetworkBuilder::new()
        .add_box("diet", 1.0, 1e12)
        .add_box("plasma", 1.51, 3.0)
        .add_box("RBC", 2.74, 2.5e3)
        .add_box("liver", 1.35, 1e3)
        .add_box("urine", 1.0, 1e-10)
        .add_box("feces", 0.1, 1.0)
        .add_box("menses", 2.5, 1e-2)
        .transfer("diet", "plasma", 1.3)
        .transfer("plasma", "RBC", 24.4)
        .transfer("plasma", "liver", 5.0)
        .transfer("plasma", "urine", 0.1)
        .transfer("RBC", "plasma", 23.9)
        .transfer("RBC", "feces", 0.5)
        .transfer("liver", "plasma", 4.3)
        .transfer("liver", "feces", 0.7)
        .build()?;

    Ok(RatioEvolution::new(network, Standard::IRMM_FE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{convert, FluxModel};
    use approx::assert_relative_eq;

    #[test]
    fn test_network_shape() {
        let model = iron_simple().unwrap();
        let network = model.network();

        assert_eq!(network.n_boxes(), 7);
        assert_eq!(model.standard(), Standard::IRMM_FE);
        assert_relative_eq!(network.flux_between("plasma", "RBC").unwrap(), 24.4);
        assert_eq!(network.flux_between("RBC", "menses"), Some(0.0));
    }

    #[test]
    fn test_no_fractionation_anywhere() {
        let model = iron_simple().unwrap();
        let partition = model.network().partition();
        assert!(partition.iter().all(|&p| p == 1.0));
    }

    #[test]
    fn test_initial_ratios_match_deltas() {
        let model = iron_simple().unwrap();
        let network = model.network();
        let ratio = model.initial_ratio();

        let rbc = network.index_of("RBC").unwrap();
        assert_relative_eq!(
            ratio[rbc],
            convert::delta_to_ratio(2.74, Standard::IRMM_FE)
        );
    }

    #[test]
    fn test_urine_box_is_the_stiff_one() {
        // Influx 0.1 mg/day over a 1e-10 mg reservoir: the urine ratio moves
        // nine orders of magnitude faster than any other box.
        let model = iron_simple().unwrap();
        let network = model.network();
        let urine = network.index_of("urine").unwrap();

        let ratio = model.initial_ratio();
        let rate = model.derivative(&ratio, 0.0);

        let max_other = (0..network.n_boxes())
            .filter(|&i| i != urine)
            .map(|i| rate[i].abs())
            .fold(0.0_f64, f64::max);
        assert!(rate[urine].abs() > 1e6 * max_other);
    }

    #[test]
    fn test_mass_weighted_rates_sum_to_zero() {
        let model = iron_simple().unwrap();
        let masses = model.network().masses().clone();

        let ratio = model.initial_ratio();
        let rate = model.derivative(&ratio, 0.0);

        let total: f64 = (0..masses.len()).map(|i| masses[i] * rate[i]).sum();
        assert!((total / 1e12).abs() < 1e-15);
    }
}
