//! Human zinc turnover network
//!
//! Ten compartments: diet, plasma, red blood cells, liver, urine, feces,
//! muscle, bone, skin and kidney. The diet box is given an effectively
//! infinite mass so its isotopic composition stays fixed over the run, which
//! makes it a constant-delta source rather than a reservoir that drains.
//!
//! Masses are in milligrams of zinc, fluxes in milligrams per day, so time
//! is measured in days. The network is parameterised by the dietary intake
//! and the plasma↔bone exchange flux; the remaining plasma outfluxes scale
//! off those two. Deltas are reported against the JMC Lyon ⁶⁶Zn/⁶⁴Zn
//! standard, with bone starting at +0.48 ‰ and every other compartment at
//! the standard.

use crate::error::SimulationError;
use crate::model::{RatioEvolution, Standard};
use crate::network::NetworkBuilder;

// Plasma-to-tissue fractionation factors, per-mil-scale offsets from unity
// fitted to observed steady-state tissue deltas.
const COEFF_KU: f64 = 1.0 / 0.9998;
const COEFF_PRBC: f64 = 1.00025;
const COEFF_PS: f64 = 1.000275;
const COEFF_PM: f64 = 0.99986;
const COEFF_PB: f64 = 1.0003;
const COEFF_PL: f64 = 0.99939;
const COEFF_PD: f64 = 1.000;
const COEFF_DIET_PLASMA: f64 = 1.00018;

// Fraction of dietary zinc actually absorbed; the rest passes to feces.
const ABSORPTION: f64 = 0.33;

/// Build the zinc turnover model.
///
/// # Arguments
///
/// - `flux_diet`: dietary zinc intake in mg/day (physiological range is
///   roughly 7 to 17)
/// - `flux_bone`: plasma↔bone exchange flux in mg/day
///
/// # Errors
///
/// Returns [`SimulationError::Configuration`] when either flux is negative
/// or non-finite.
///
/// # Example
///
/// ```rust
/// use isobox::model::FluxModel;
/// use isobox::scenarios::zinc_turnover;
///
/// let model = zinc_turnover(12.0, 0.029).unwrap();
/// assert_eq!(model.n_boxes(), 10);
/// ```
pub fn zinc_turnover(flux_diet: f64, flux_bone: f64) -> Result<RatioEvolution, SimulationError> {
    let k = ABSORPTION;
    // Plasma turnover fluxes scale with intake relative to a 12 mg/day diet.
    let t = flux_diet / 12.0;

    let network = NetworkBuilder::new()
        .add_box("diet", 0.0, 1e12)
        .add_box("plasma", 0.0, 3.0)
        .add_box("RBC", 0.0, 25.0)
        .add_box("liver", 0.0, 130.0)
        .add_box("urine", 0.0, 10.0)
        .add_box("feces", 0.0, 10.0)
        .add_box("muscle", 0.0, 1500.0)
        .add_box("bone", 0.48, 770.0)
        .add_box("skin", 0.0, 160.0)
        .add_box("kidney", 0.0, 20.0)
        // Dietary intake splits between absorption and direct excretion
        .transfer("diet", "plasma", k * flux_diet)
        .transfer("diet", "feces", (1.0 - k) * flux_diet)
        // Plasma exchanges
        .transfer("plasma", "RBC", t * 0.18)
        .transfer("plasma", "liver", t * 2.64)
        .transfer("plasma", "feces", 0.75 * k * flux_diet)
        .transfer("plasma", "muscle", t * 0.0035)
        .transfer("plasma", "bone", flux_bone)
        .transfer("plasma", "skin", 0.125 * k * flux_diet)
        .transfer("plasma", "kidney", 0.625 * k * flux_diet)
        // Returns to plasma
        .transfer("RBC", "plasma", t * 0.18)
        .transfer("liver", "plasma", t * 2.64)
        .transfer("muscle", "plasma", t * 0.0035)
        .transfer("bone", "plasma", flux_bone)
        // Renal pathway
        .transfer("kidney", "plasma", 0.5 * k * flux_diet)
        .transfer("kidney", "urine", 0.125 * k * flux_diet)
        // Fractionation: each plasma-to-tissue factor is paired with its
        // reciprocal on the return flux
        .fractionation("diet", "plasma", COEFF_DIET_PLASMA)
        .fractionation("plasma", "RBC", COEFF_PRBC)
        .fractionation("RBC", "liver", 1.0 / COEFF_PRBC)
        .fractionation("plasma", "liver", COEFF_PL)
        .fractionation("liver", "plasma", 1.0 / COEFF_PL)
        .fractionation("plasma", "feces", COEFF_PD)
        .fractionation("plasma", "muscle", COEFF_PM)
        .fractionation("muscle", "plasma", 1.0 / COEFF_PM)
        .fractionation("plasma", "bone", COEFF_PB)
        .fractionation("bone", "plasma", 1.0 / COEFF_PB)
        .fractionation("plasma", "skin", COEFF_PS)
        .fractionation("plasma", "kidney", 1.0 / COEFF_KU)
        .fractionation("kidney", "plasma", COEFF_KU)
        .fractionation("kidney", "urine", COEFF_KU)
        .build()?;

    Ok(RatioEvolution::new(network, Standard::JMC_ZN))
}
