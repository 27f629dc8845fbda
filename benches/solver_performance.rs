//! Performance benchmarks for the evolution kernel and the solvers
//!
//! # What We're Measuring
//!
//! 1. **Kernel cost**: one derivative evaluation is an O(N²) sweep over the
//!    flux matrix; this is the unit everything else multiplies.
//!
//! 2. **Solver comparison** on the same problem:
//!    - Euler: 1 evaluation per step
//!    - RK4: 4 evaluations per step, expect ~4× the Euler time
//!    - RK45: 6 evaluations per accepted step plus controller overhead,
//!      but free to take far fewer steps
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench --bench solver_performance
//!
//! # Only the kernel sweeps
//! cargo bench --bench solver_performance kernel
//!
//! # Only the solver comparison
//! cargo bench --bench solver_performance comparison
//! ```
//!
//! If the RK4/Euler ratio drifts far from 4.0, look for allocations in the
//! stage arithmetic before blaming the method.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use isobox::model::{FluxModel, RatioEvolution, Standard};
use isobox::network::NetworkBuilder;
use isobox::scenarios::zinc_turnover;
use isobox::solver::{
    EulerSolver, RK45Solver, RK4Solver, Scenario, Solver, SolverConfiguration,
};

// =================================================================================================
// Synthetic Networks
// =================================================================================================

/// Fully connected ring-heavy network of `n` boxes with mild fractionation.
///
/// Every box exchanges with its two ring neighbours plus a hub (box 0), so
/// the flux matrix has O(n) nonzero entries while staying n×n. That matches
/// the sparsity of physiological models at any size.
fn ring_model(n: usize) -> RatioEvolution {
    let mut builder = NetworkBuilder::new();
    for i in 0..n {
        let delta = if i % 3 == 0 { 0.5 } else { 0.0 };
        builder = builder.add_box(&format!("box{}", i), delta, 10.0 + i as f64);
    }
    for i in 0..n {
        let a = format!("box{}", i);
        let b = format!("box{}", (i + 1) % n);
        builder = builder.transfer(&a, &b, 0.3).transfer(&b, &a, 0.3);
        if i != 0 {
            builder = builder
                .transfer("box0", &a, 0.1)
                .transfer(&a, "box0", 0.1)
                .fractionation("box0", &a, 1.0002);
        }
    }
    let network = builder.build().expect("synthetic network is valid");
    RatioEvolution::new(network, Standard::new(1.0).expect("valid standard"))
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// One derivative evaluation across network sizes.
fn benchmark_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel derivative");

    for n in [10, 50, 100, 200].iter() {
        let model = ring_model(*n);
        let ratio = model.initial_ratio();

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| model.derivative(black_box(&ratio), black_box(0.0)));
        });
    }

    // The realistic fixture: ten boxes, published fluxes
    let model = zinc_turnover(12.0, 0.029).expect("valid parameters");
    let ratio = model.initial_ratio();
    group.bench_function("zinc turnover (10 boxes)", |b| {
        b.iter(|| model.derivative(black_box(&ratio), black_box(0.0)));
    });

    group.finish();
}

/// Fixed-step solvers on the zinc network, identical step counts.
fn benchmark_solver_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver comparison");

    let time_steps = 10_000;
    let total_time = 100.0;
    let config = SolverConfiguration::time_evolution(total_time, time_steps);

    {
        let scenario = Scenario::new(Box::new(
            zinc_turnover(12.0, 0.029).expect("valid parameters"),
        ));
        let solver = EulerSolver::new();
        group.bench_function(format!("Forward Euler {} steps", time_steps), |b| {
            b.iter(|| {
                solver
                    .solve(black_box(&scenario), black_box(&config))
                    .expect("solve succeeds")
            });
        });
    }

    {
        let scenario = Scenario::new(Box::new(
            zinc_turnover(12.0, 0.029).expect("valid parameters"),
        ));
        let solver = RK4Solver::new();
        group.bench_function(format!("Runge-Kutta 4 {} steps", time_steps), |b| {
            b.iter(|| {
                solver
                    .solve(black_box(&scenario), black_box(&config))
                    .expect("solve succeeds")
            });
        });
    }

    // The adaptive solver picks its own steps; same span and accuracy class
    {
        let scenario = Scenario::new(Box::new(
            zinc_turnover(12.0, 0.029).expect("valid parameters"),
        ));
        let adaptive = SolverConfiguration::adaptive(total_time, 100);
        let solver = RK45Solver::new();
        group.bench_function("Dormand-Prince adaptive", |b| {
            b.iter(|| {
                solver
                    .solve(black_box(&scenario), black_box(&adaptive))
                    .expect("solve succeeds")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_kernel, benchmark_solver_comparison);
criterion_main!(benches);
