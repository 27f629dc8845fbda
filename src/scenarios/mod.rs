//! Ready-made physiological box models
//!
//! Two published human metal-turnover networks, provided both as worked
//! examples and as realistic fixtures for benchmarks:
//!
//! - [`zinc_turnover`]: ten-compartment zinc metabolism reported against
//!   the JMC Lyon standard, parameterised by dietary intake and bone
//!   exchange flux;
//! - [`iron_simple`]: seven-compartment iron metabolism reported against
//!   IRMM-014, fixed fluxes and no fractionation.
//!
//! Both builders return a fully validated [`RatioEvolution`] ready to wrap
//! in a [`Scenario`](crate::solver::Scenario).

mod fe;
mod zn;

pub use fe::iron_simple;
pub use zn::zinc_turnover;
