//! Isotopic flux models (the physics)
//!
//! This module defines the physics side of the crate, kept strictly separate
//! from the numerics in [`crate::solver`]:
//!
//! - [`FluxModel`]: the right-hand-side contract `f(ratio, t) -> dRatio/dt`
//!   that every model exposes to the solvers;
//! - [`RatioEvolution`]: the concrete mass-balance kernel over a
//!   [`BoxNetwork`](crate::network::BoxNetwork);
//! - [`Standard`] and the delta↔ratio conversions in [`convert`].
//!
//! A model only states the equations; it never integrates them. Solvers call
//! [`FluxModel::derivative`] as often as they like, at whatever intermediate
//! times and states their stepping scheme requires, so the method must be
//! pure and cheap.

mod evolution;
mod traits;

pub mod convert;

pub use convert::Standard;
pub use evolution::RatioEvolution;
pub use traits::FluxModel;
