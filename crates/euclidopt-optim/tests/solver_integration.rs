//! Integration tests for euclidopt-optim
//!
//! These tests verify that the solvers work correctly on standard problems
//! and that they agree with each other where their domains overlap.

use euclidopt_core::{
    cost_function::CostFunction,
    error::{OptimizerResult, Result},
    optimizer::{Optimizer, StoppingCriterion},
    types::{DMatrix, DVector},
};
use euclidopt_optim::{
    Bisection, BisectionConfig, ConjugateGradient, ConjugateGradientConfig, HookeJeeves,
    HookeJeevesConfig, IntervalHalving, IntervalHalvingConfig, TrustRegion, TrustRegionConfig,
    BFGS, BFGSConfig,
};

/// Distance to a fixed target: f(x) = 0.5 * ||x - target||^2
#[derive(Debug)]
struct ConvexQuadratic {
    target: DVector<f64>,
}

impl ConvexQuadratic {
    fn new(target: DVector<f64>) -> Self {
        Self { target }
    }
}

impl CostFunction<f64> for ConvexQuadratic {
    fn cost(&self, point: &DVector<f64>) -> Result<f64> {
        let diff = point - &self.target;
        Ok(0.5 * diff.dot(&diff))
    }

    fn gradient(&self, point: &DVector<f64>) -> Result<DVector<f64>> {
        Ok(point - &self.target)
    }

    fn hessian(&self, point: &DVector<f64>) -> Result<DMatrix<f64>> {
        Ok(DMatrix::identity(point.len(), point.len()))
    }
}

/// The classic banana-valley benchmark with minimum at (1, 1).
#[derive(Debug)]
struct Rosenbrock;

impl CostFunction<f64> for Rosenbrock {
    fn cost(&self, point: &DVector<f64>) -> Result<f64> {
        let (x, y) = (point[0], point[1]);
        Ok((1.0 - x).powi(2) + 100.0 * (y - x * x).powi(2))
    }

    fn gradient(&self, point: &DVector<f64>) -> Result<DVector<f64>> {
        let (x, y) = (point[0], point[1]);
        Ok(DVector::from_vec(vec![
            -2.0 * (1.0 - x) - 400.0 * x * (y - x * x),
            200.0 * (y - x * x),
        ]))
    }

    fn hessian(&self, point: &DVector<f64>) -> Result<DMatrix<f64>> {
        let (x, y) = (point[0], point[1]);
        Ok(DMatrix::from_row_slice(
            2,
            2,
            &[
                2.0 - 400.0 * (y - 3.0 * x * x),
                -400.0 * x,
                -400.0 * x,
                200.0,
            ],
        ))
    }
}

#[test]
fn test_trust_region_optimization() {
    let target = DVector::from_vec(vec![1.0, -2.0, 3.0, 0.0, 2.0]);
    let cost_fn = ConvexQuadratic::new(target.clone());

    let mut optimizer = TrustRegion::new(TrustRegionConfig::new());

    let x0 = DVector::zeros(5);
    let stopping_criterion = StoppingCriterion::new()
        .with_max_iterations(100)
        .with_gradient_tolerance(1e-6);

    let result = optimizer
        .optimize(&cost_fn, &x0, &stopping_criterion)
        .unwrap();

    assert!(result.converged);
    assert!(result.iterations <= 10, "Took {} iterations", result.iterations);
    let distance = (&result.point - &target).norm();
    assert!(distance < 1e-10, "Distance to target: {}", distance);
}

#[test]
fn test_bfgs_optimization() {
    let target = DVector::from_vec(vec![1.0, -2.0, 3.0, 0.0, 2.0]);
    let cost_fn = ConvexQuadratic::new(target.clone());

    let mut optimizer = BFGS::new(BFGSConfig::new());

    let x0 = DVector::zeros(5);
    let stopping_criterion = StoppingCriterion::new()
        .with_max_iterations(100)
        .with_gradient_tolerance(1e-6);

    let result = optimizer
        .optimize(&cost_fn, &x0, &stopping_criterion)
        .unwrap();

    // The unit step along the steepest descent direction lands exactly on
    // the target, so the very next gradient check terminates the run.
    assert!(result.converged);
    assert!(result.iterations <= 3, "Took {} iterations", result.iterations);
    let distance = (&result.point - &target).norm();
    assert!(distance < 1e-8, "Distance to target: {}", distance);
}

#[test]
fn test_hooke_jeeves_optimization() {
    let target = DVector::from_vec(vec![1.0, -2.0]);
    let cost_fn = ConvexQuadratic::new(target);

    let mut optimizer = HookeJeeves::new(HookeJeevesConfig::new());

    let x0 = DVector::zeros(2);
    let stopping_criterion = StoppingCriterion::new().with_max_iterations(1000);

    let result = optimizer
        .optimize(&cost_fn, &x0, &stopping_criterion)
        .unwrap();

    // The target sits on the integer grid explored by unit steps, so the
    // pattern search lands on it exactly.
    assert!(result.converged);
    assert_eq!(result.point[0], 1.0);
    assert_eq!(result.point[1], -2.0);
    assert_eq!(result.value, 0.0);
    assert!(result.iterations < 50, "Took {} iterations", result.iterations);
    assert!(result.gradient_norm.is_none());
}

#[test]
fn test_rosenbrock_descent() -> OptimizerResult<()> {
    let cost_fn = Rosenbrock;

    let mut bfgs = BFGS::new(BFGSConfig::new());
    let x0 = DVector::from_vec(vec![0.0, 0.0]);
    let stopping_criterion = StoppingCriterion::new()
        .with_max_iterations(500)
        .with_gradient_tolerance(1e-6);

    let bfgs_result = bfgs.optimize(&cost_fn, &x0, &stopping_criterion)?;
    println!(
        "BFGS: {} iterations, value {:.3e}",
        bfgs_result.iterations, bfgs_result.value
    );

    assert!(bfgs_result.converged, "BFGS should converge on Rosenbrock");
    let minimum = DVector::from_vec(vec![1.0, 1.0]);
    let distance = (&bfgs_result.point - &minimum).norm();
    assert!(distance < 1e-3, "Distance to the minimum: {}", distance);

    // A Cauchy point step is a scaled steepest descent step, so progress
    // along the Rosenbrock valley is slow; only descent is checked here.
    let start = DVector::from_vec(vec![-1.2, 1.0]);
    let initial_value = cost_fn.cost(&start)?;

    let mut trust_region = TrustRegion::new(TrustRegionConfig::new());
    let tr_criterion = StoppingCriterion::new().with_max_iterations(100);
    let tr_result = trust_region.optimize(&cost_fn, &start, &tr_criterion)?;
    println!(
        "Trust region: value {:.3e} after {} iterations",
        tr_result.value, tr_result.iterations
    );

    assert!(
        tr_result.value < initial_value,
        "Trust region should descend below the starting value {}",
        initial_value
    );
    assert!(tr_result.value.is_finite());

    Ok(())
}

#[test]
fn test_conjugate_gradient_matches_direct_solve() {
    // Tridiagonal SPD system with four distinct eigenvalues
    let a = DMatrix::from_row_slice(
        4,
        4,
        &[
            4.0, 1.0, 0.0, 0.0, //
            1.0, 4.0, 1.0, 0.0, //
            0.0, 1.0, 4.0, 1.0, //
            0.0, 0.0, 1.0, 4.0,
        ],
    );
    let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);

    let solver = ConjugateGradient::new(ConjugateGradientConfig::new().with_tolerance(1e-10));
    let result = solver.solve(&a, &b, &DVector::zeros(4)).unwrap();

    assert!(result.converged);
    assert!(
        result.iterations <= 4,
        "CG needs at most n iterations, took {}",
        result.iterations
    );
    assert!(result.residual_norm < 1e-10);

    let residual = (&a * &result.solution - &b).norm();
    assert!(residual < 1e-9, "Residual too large: {}", residual);
}

#[test]
fn test_bisection_agrees_with_interval_halving() {
    let objective = |x: f64| (x - 2.0).powi(2) + 1.0;
    let slope = |x: f64| 2.0 * (x - 2.0);

    let halving = IntervalHalving::new(IntervalHalvingConfig::new());
    let minimum = halving.minimize(objective, 0.0, 3.0).unwrap();

    let bisection = Bisection::new(BisectionConfig::new());
    let root = bisection.find_root(slope, 0.0, 3.0).unwrap();

    assert!(minimum.converged);
    assert!(root.converged);
    assert!(
        (root.root - minimum.minimizer).abs() < 1e-6,
        "Root of the derivative {} should match the minimizer {}",
        root.root,
        minimum.minimizer
    );
}

#[test]
fn test_fresh_solver_instances_are_deterministic() {
    let cost_fn = Rosenbrock;
    let x0 = DVector::from_vec(vec![0.0, 0.0]);
    let stopping_criterion = StoppingCriterion::new()
        .with_max_iterations(100)
        .with_gradient_tolerance(1e-6);

    let mut first = BFGS::new(BFGSConfig::new());
    let result1 = first.optimize(&cost_fn, &x0, &stopping_criterion).unwrap();

    let mut second = BFGS::new(BFGSConfig::new());
    let result2 = second.optimize(&cost_fn, &x0, &stopping_criterion).unwrap();

    // Same starting point, same configuration: the runs must be identical
    assert_eq!(result1.iterations, result2.iterations);
    assert_eq!(result1.point, result2.point);
    assert_eq!(result1.value.to_bits(), result2.value.to_bits());
}
