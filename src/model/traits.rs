//! The flux-model trait: the ODE right-hand-side contract
//!
//! # Responsibility
//!
//! A [`FluxModel`] computes the physics equations of an isotopic system at a
//! given state. It does NOT solve them (that is the solver's job): the model
//! provides the "physics" (equations), the solver provides the "numerics"
//! (method to solve them).

use nalgebra::DVector;

/// Trait for isotopic flux models.
///
/// Implementors expose the right-hand side of the first-order ODE system
/// `dRatio/dt = f(ratio, t)` describing how the per-box isotopic ratio
/// vector evolves.
///
/// # Contract
///
/// - `derivative` is a pure function of its arguments and the model's fixed
///   matrices: no internal mutable state, no side effects. Solvers call it
///   with sub-stepped intermediate `t` and `ratio` values that never appear
///   in the output trajectory.
/// - The box-model systems in this crate are autonomous: `t` is accepted to
///   satisfy the generic integrator calling convention but does not enter
///   the computation.
/// - Input and output vectors both have length [`FluxModel::n_boxes`], in
///   the canonical box order fixed at model construction.
pub trait FluxModel: Send + Sync {
    /// Number of boxes N in the system. Solvers use this to size vectors.
    fn n_boxes(&self) -> usize;

    /// Evaluate `f(ratio, t)`: the instantaneous rate of change of each
    /// box's isotopic ratio.
    fn derivative(&self, ratio: &DVector<f64>, t: f64) -> DVector<f64>;

    /// Initial ratio vector, derived from the configured per-box deltas.
    fn initial_ratio(&self) -> DVector<f64>;

    /// Name of the model (used for display and logging).
    fn name(&self) -> &str;

    /// Optional longer description of the model.
    fn description(&self) -> Option<&str> {
        None
    }
}
