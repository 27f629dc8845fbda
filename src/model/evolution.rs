//! The mass-balance evolution kernel
//!
//! # Mathematical Background
//!
//! For every box `i`, isotope atoms leave toward every other box `j`
//! proportionally to the outgoing flux scaled by box `i`'s current ratio and
//! the `i → j` fractionation factor, and arrive from every box `j`
//! proportionally to `j`'s ratio, the `j → i` flux and the `j → i`
//! fractionation factor. Both sides are normalized by box `i`'s mass, so the
//! flux-to-mass ratio sets the turnover timescale:
//!
//! ```text
//! outflux_i = Σ_j Flux[i][j] / Mass[i] * Partcoeff[i][j] * ratio[i]
//! influx_i  = Σ_j Flux[j][i] / Mass[i] * Partcoeff[j][i] * ratio[j]
//! rate_i    = influx_i - outflux_i
//! ```
//!
//! The kernel only moves isotope between boxes, never creates or destroys
//! it: `Σ_i Mass[i] * rate_i == 0` identically, whatever the partition
//! coefficients. Integrators therefore conserve the total heavy-isotope mass
//! of a closed network to within their own tolerance.
//!
//! # Complexity
//!
//! O(N²) per evaluation — the double loop over box pairs is unavoidable for
//! a dense flux network. Zero flux entries (common: physiological networks
//! are sparse) are skipped without touching mass or partition values.

use crate::model::convert::{self, Standard};
use crate::model::FluxModel;
use crate::network::BoxNetwork;
use nalgebra::DVector;

/// Isotopic-ratio evolution over a validated [`BoxNetwork`].
///
/// This is the only numerical kernel of the crate; everything else is
/// configuration and integration machinery around it.
///
/// # Example
///
/// ```rust
/// use isobox::model::{FluxModel, RatioEvolution, Standard};
/// use isobox::network::NetworkBuilder;
///
/// let network = NetworkBuilder::new()
///     .add_box("a", 1.0, 10.0)
///     .add_box("b", 0.0, 10.0)
///     .transfer("a", "b", 1.0)
///     .transfer("b", "a", 1.0)
///     .build()
///     .unwrap();
///
/// let model = RatioEvolution::new(network, Standard::new(1.0).unwrap());
/// let ratio = model.initial_ratio();
/// let rate = model.derivative(&ratio, 0.0);
///
/// // Box a is heavier than b, so a loses and b gains.
/// assert!(rate[0] < 0.0);
/// assert!(rate[1] > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct RatioEvolution {
    network: BoxNetwork,
    standard: Standard,
}

impl RatioEvolution {
    /// Create the evolution model for a network, reporting against the
    /// given isotopic standard.
    pub fn new(network: BoxNetwork, standard: Standard) -> Self {
        Self { network, standard }
    }

    /// The underlying network.
    pub fn network(&self) -> &BoxNetwork {
        &self.network
    }

    /// The isotopic standard this model converts against.
    pub fn standard(&self) -> Standard {
        self.standard
    }
}

impl FluxModel for RatioEvolution {
    fn n_boxes(&self) -> usize {
        self.network.n_boxes()
    }

    fn derivative(&self, ratio: &DVector<f64>, _t: f64) -> DVector<f64> {
        let n = self.network.n_boxes();
        debug_assert_eq!(ratio.len(), n, "ratio vector length must match box count");

        let flux = self.network.flux();
        let partition = self.network.partition();
        let masses = self.network.masses();

        let mut rate = DVector::zeros(n);
        for i in 0..n {
            let mut outflux = 0.0;
            let mut influx = 0.0;
            for j in 0..n {
                let f_out = flux[(i, j)];
                if f_out != 0.0 {
                    outflux += f_out / masses[i] * partition[(i, j)] * ratio[i];
                }
                let f_in = flux[(j, i)];
                if f_in != 0.0 {
                    influx += f_in / masses[i] * partition[(j, i)] * ratio[j];
                }
            }
            rate[i] = influx - outflux;
        }
        rate
    }

    fn initial_ratio(&self) -> DVector<f64> {
        convert::initial_ratio(self.network.deltas(), self.standard)
    }

    fn name(&self) -> &str {
        "Isotopic ratio evolution"
    }

    fn description(&self) -> Option<&str> {
        Some("Linear flux-box mass balance with per-edge partition coefficients")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use approx::assert_relative_eq;

    fn symmetric_two_box() -> RatioEvolution {
        let network = NetworkBuilder::new()
            .add_box("a", 1.0, 10.0)
            .add_box("b", 0.0, 10.0)
            .transfer("a", "b", 1.0)
            .transfer("b", "a", 1.0)
            .build()
            .unwrap();
        RatioEvolution::new(network, Standard::new(1.0).unwrap())
    }

    #[test]
    fn test_system_is_autonomous() {
        let model = symmetric_two_box();
        let ratio = model.initial_ratio();
        let at_zero = model.derivative(&ratio, 0.0);
        let much_later = model.derivative(&ratio, 18250.0);
        assert_eq!(at_zero, much_later);
    }

    #[test]
    fn test_equal_ratios_are_a_fixed_point_without_fractionation() {
        let model = symmetric_two_box();
        let ratio = DVector::from_element(2, 1.0);
        let rate = model.derivative(&ratio, 0.0);
        assert_eq!(rate[0], 0.0);
        assert_eq!(rate[1], 0.0);
    }

    #[test]
    fn test_two_box_rates_against_hand_computation() {
        let model = symmetric_two_box();
        // deltas 1.0 and 0.0 with standard 1.0 give ratios 1.001 and 1.0.
        let ratio = model.initial_ratio();

        // rate_a = F/M * (r_b - r_a) = 0.1 * (1.0 - 1.001)
        let rate = model.derivative(&ratio, 0.0);
        assert_relative_eq!(rate[0], 0.1 * (1.0 - 1.001), epsilon = 1e-15);
        assert_relative_eq!(rate[1], 0.1 * (1.001 - 1.0), epsilon = 1e-15);
    }

    #[test]
    fn test_isolated_box_has_zero_rate() {
        let network = NetworkBuilder::new()
            .add_box("a", 3.0, 5.0)
            .add_box("b", -2.0, 7.0)
            .add_box("lonely", 10.0, 2.0)
            .transfer("a", "b", 0.4)
            .transfer("b", "a", 0.9)
            .build()
            .unwrap();
        let model = RatioEvolution::new(network, Standard::new(1.0).unwrap());

        let ratio = model.initial_ratio();
        let rate = model.derivative(&ratio, 0.0);
        assert_eq!(rate[2], 0.0);
    }

    #[test]
    fn test_mass_weighted_rate_sums_to_zero() {
        // Exact identity of the kernel, fractionation or not: the network
        // only moves isotope, it never creates or destroys it.
        let network = NetworkBuilder::new()
            .add_box("a", 1.5, 3.0)
            .add_box("b", -0.7, 25.0)
            .add_box("c", 0.2, 130.0)
            .transfer("a", "b", 0.18)
            .transfer("b", "a", 0.18)
            .transfer("a", "c", 2.64)
            .transfer("c", "a", 2.64)
            .transfer("b", "c", 0.05)
            .fractionation("a", "b", 1.00025)
            .fractionation("b", "a", 0.99975)
            .fractionation("a", "c", 0.99939)
            .build()
            .unwrap();
        let model = RatioEvolution::new(network.clone(), Standard::JMC_ZN);

        let ratio = model.initial_ratio();
        let rate = model.derivative(&ratio, 0.0);

        let total: f64 = (0..3).map(|i| network.masses()[i] * rate[i]).sum();
        assert_relative_eq!(total, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fractionation_shifts_the_fixed_point() {
        // With a partition coefficient > 1 on a → b, equal ratios are no
        // longer an equilibrium: b preferentially receives heavy isotope.
        let network = NetworkBuilder::new()
            .add_box("a", 0.0, 10.0)
            .add_box("b", 0.0, 10.0)
            .transfer("a", "b", 1.0)
            .transfer("b", "a", 1.0)
            .fractionation("a", "b", 1.0003)
            .build()
            .unwrap();
        let model = RatioEvolution::new(network, Standard::new(1.0).unwrap());

        let ratio = DVector::from_element(2, 1.0);
        let rate = model.derivative(&ratio, 0.0);
        assert!(rate[0] < 0.0);
        assert!(rate[1] > 0.0);
    }

    #[test]
    fn test_initial_ratio_uses_the_standard() {
        let network = NetworkBuilder::new()
            .add_box("bone", 0.48, 770.0)
            .build()
            .unwrap();
        let model = RatioEvolution::new(network, Standard::JMC_ZN);

        let ratio = model.initial_ratio();
        assert_relative_eq!(ratio[0], (0.48 / 1e3 + 1.0) * 0.565203);
    }
}
