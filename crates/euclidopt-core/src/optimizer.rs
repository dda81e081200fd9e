//! Core optimizer traits and types.
//!
//! This module provides the foundational traits and types for implementing
//! optimization algorithms over Euclidean space. It defines the interface
//! that iterative optimizers implement, along with common structures for
//! optimization results and stopping criteria.
//!
//! # Key Components
//!
//! - **Optimizer trait**: Core interface for iterative optimization algorithms
//! - **OptimizationResult**: Encapsulates the result of an optimization run
//! - **StoppingCriterion**: Various conditions for terminating optimization
//! - **ConvergenceChecker**: Logic for checking convergence conditions

use crate::{
    cost_function::CostFunction,
    error::OptimizerResult,
    types::{DVector, Scalar},
};
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Result of an optimization run.
///
/// Contains the final point, objective value, and metadata about the
/// optimization process.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult<T>
where
    T: Scalar,
{
    /// The optimal point found by the optimizer
    pub point: DVector<T>,

    /// The objective value at the optimal point
    pub value: T,

    /// The gradient norm at the optimal point (if available)
    pub gradient_norm: Option<T>,

    /// Number of iterations performed
    pub iterations: usize,

    /// Number of function evaluations
    pub function_evaluations: usize,

    /// Number of gradient evaluations
    pub gradient_evaluations: usize,

    /// Total optimization time
    pub duration: Duration,

    /// Reason for termination
    pub termination_reason: TerminationReason,

    /// Whether the optimization converged successfully
    pub converged: bool,
}

impl<T> OptimizationResult<T>
where
    T: Scalar,
{
    /// Creates a new optimization result.
    pub fn new(
        point: DVector<T>,
        value: T,
        iterations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        let converged = matches!(
            termination_reason,
            TerminationReason::Converged | TerminationReason::TargetReached
        );

        Self {
            point,
            value,
            gradient_norm: None,
            iterations,
            function_evaluations: 0,
            gradient_evaluations: 0,
            duration,
            termination_reason,
            converged,
        }
    }

    /// Sets the gradient norm at the optimal point.
    pub fn with_gradient_norm(mut self, norm: T) -> Self {
        self.gradient_norm = Some(norm);
        self
    }

    /// Sets the function evaluation count.
    pub fn with_function_evaluations(mut self, count: usize) -> Self {
        self.function_evaluations = count;
        self
    }

    /// Sets the gradient evaluation count.
    pub fn with_gradient_evaluations(mut self, count: usize) -> Self {
        self.gradient_evaluations = count;
        self
    }
}

/// Reason for termination of the optimization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// Converged to a stationary point (gradient norm below tolerance)
    /// or to a step/interval size below tolerance for derivative-free methods
    Converged,
    /// Reached target objective value
    TargetReached,
    /// Maximum iterations reached
    MaxIterations,
    /// Maximum time exceeded
    MaxTime,
    /// Maximum function evaluations reached
    MaxFunctionEvaluations,
    /// User requested termination through a callback
    UserTerminated,
}

/// Stopping criteria for optimization algorithms.
///
/// Iteration-cap exhaustion is a normal, non-converged return, never an
/// error.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoppingCriterion<T>
where
    T: Scalar,
{
    /// Maximum number of iterations
    pub max_iterations: Option<usize>,

    /// Maximum optimization time
    pub max_time: Option<Duration>,

    /// Maximum number of function evaluations
    pub max_function_evaluations: Option<usize>,

    /// Gradient norm tolerance for convergence
    pub gradient_tolerance: Option<T>,

    /// Function value change tolerance
    pub function_tolerance: Option<T>,

    /// Point change tolerance
    pub point_tolerance: Option<T>,

    /// Target objective value (stop when reached)
    pub target_value: Option<T>,
}

impl<T> Default for StoppingCriterion<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            max_iterations: Some(100),
            max_time: None,
            max_function_evaluations: None,
            gradient_tolerance: Some(T::DEFAULT_GRADIENT_TOLERANCE),
            function_tolerance: None,
            point_tolerance: None,
            target_value: None,
        }
    }
}

impl<T> StoppingCriterion<T>
where
    T: Scalar,
{
    /// Creates a new stopping criterion with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = Some(max_iter);
        self
    }

    /// Sets the maximum optimization time.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Sets the maximum number of function evaluations.
    pub fn with_max_function_evaluations(mut self, max_evals: usize) -> Self {
        self.max_function_evaluations = Some(max_evals);
        self
    }

    /// Sets the gradient tolerance.
    pub fn with_gradient_tolerance(mut self, tol: T) -> Self {
        self.gradient_tolerance = Some(tol);
        self
    }

    /// Sets the function value change tolerance.
    pub fn with_function_tolerance(mut self, tol: T) -> Self {
        self.function_tolerance = Some(tol);
        self
    }

    /// Sets the point change tolerance.
    pub fn with_point_tolerance(mut self, tol: T) -> Self {
        self.point_tolerance = Some(tol);
        self
    }

    /// Sets the target objective value.
    pub fn with_target_value(mut self, target: T) -> Self {
        self.target_value = Some(target);
        self
    }
}

/// State information for optimization algorithms.
#[derive(Debug, Clone)]
pub struct OptimizerState<T>
where
    T: Scalar,
{
    /// Current point
    pub point: DVector<T>,

    /// Current objective value
    pub value: T,

    /// Current gradient (if available)
    pub gradient: Option<DVector<T>>,

    /// Gradient norm
    pub gradient_norm: Option<T>,

    /// Previous point
    pub previous_point: Option<DVector<T>>,

    /// Previous objective value
    pub previous_value: Option<T>,

    /// Current iteration number
    pub iteration: usize,

    /// Number of function evaluations so far
    pub function_evaluations: usize,

    /// Number of gradient evaluations so far
    pub gradient_evaluations: usize,

    /// Start time of optimization
    pub start_time: Instant,
}

impl<T> OptimizerState<T>
where
    T: Scalar,
{
    /// Creates a new optimizer state.
    pub fn new(point: DVector<T>, value: T) -> Self {
        Self {
            point,
            value,
            gradient: None,
            gradient_norm: None,
            previous_point: None,
            previous_value: None,
            iteration: 0,
            function_evaluations: 1,
            gradient_evaluations: 0,
            start_time: Instant::now(),
        }
    }

    /// Updates the state with a new point and value.
    pub fn update(&mut self, point: DVector<T>, value: T) {
        self.previous_point = Some(std::mem::replace(&mut self.point, point));
        self.previous_value = Some(self.value);
        self.value = value;
        self.iteration += 1;
        self.function_evaluations += 1;
    }

    /// Sets the current gradient.
    pub fn set_gradient(&mut self, gradient: DVector<T>, norm: T) {
        self.gradient = Some(gradient);
        self.gradient_norm = Some(norm);
        self.gradient_evaluations += 1;
    }

    /// Computes the change in objective value.
    pub fn value_change(&self) -> Option<T> {
        self.previous_value
            .map(|prev| <T as num_traits::Float>::abs(self.value - prev))
    }

    /// Computes the distance between current and previous points.
    pub fn point_change(&self) -> Option<T> {
        self.previous_point
            .as_ref()
            .map(|prev| (&self.point - prev).norm())
    }

    /// Gets the elapsed time since optimization started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Trait for iterative optimization algorithms.
///
/// This trait defines the interface that gradient-based and pattern-search
/// optimizers implement. Interval methods (root bracketing, interval
/// halving) have their own entry points since they operate on scalar
/// brackets rather than vector iterates.
pub trait Optimizer<T>: Debug
where
    T: Scalar,
{
    /// Returns the name of the optimizer.
    fn name(&self) -> &str;

    /// Minimizes the given cost function.
    ///
    /// # Arguments
    ///
    /// * `cost_fn` - The cost function to minimize
    /// * `initial_point` - Starting point for optimization
    /// * `stopping_criterion` - Conditions for terminating optimization
    ///
    /// # Returns
    ///
    /// An `OptimizationResult` containing the optimal point and metadata.
    fn optimize<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
    ) -> OptimizerResult<OptimizationResult<T>>;
}

/// Convergence checker for optimization algorithms.
pub struct ConvergenceChecker;

impl ConvergenceChecker {
    /// Checks if any stopping criterion has been met.
    ///
    /// # Arguments
    ///
    /// * `state` - Current optimizer state
    /// * `criterion` - Stopping criteria to check
    ///
    /// # Returns
    ///
    /// The termination reason if any criterion is met, otherwise None.
    pub fn check<T>(
        state: &OptimizerState<T>,
        criterion: &StoppingCriterion<T>,
    ) -> Option<TerminationReason>
    where
        T: Scalar,
    {
        // Check iteration limit
        if let Some(max_iter) = criterion.max_iterations {
            if state.iteration >= max_iter {
                return Some(TerminationReason::MaxIterations);
            }
        }

        // Check time limit
        if let Some(max_time) = criterion.max_time {
            if state.elapsed() >= max_time {
                return Some(TerminationReason::MaxTime);
            }
        }

        // Check function evaluation limit
        if let Some(max_evals) = criterion.max_function_evaluations {
            if state.function_evaluations >= max_evals {
                return Some(TerminationReason::MaxFunctionEvaluations);
            }
        }

        // Check gradient norm
        if let (Some(grad_norm), Some(grad_tol)) =
            (state.gradient_norm, criterion.gradient_tolerance)
        {
            if grad_norm < grad_tol {
                return Some(TerminationReason::Converged);
            }
        }

        // Check function value change
        if let (Some(val_change), Some(val_tol)) =
            (state.value_change(), criterion.function_tolerance)
        {
            if val_change < val_tol && state.iteration > 0 {
                return Some(TerminationReason::Converged);
            }
        }

        // Check point change
        if let (Some(point_change), Some(point_tol)) =
            (state.point_change(), criterion.point_tolerance)
        {
            if point_change < point_tol && state.iteration > 0 {
                return Some(TerminationReason::Converged);
            }
        }

        // Check target value
        if let Some(target) = criterion.target_value {
            if state.value <= target {
                return Some(TerminationReason::TargetReached);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_optimization_result() {
        let point = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let result = OptimizationResult::new(
            point.clone(),
            0.5,
            100,
            Duration::from_secs(1),
            TerminationReason::Converged,
        );

        assert_eq!(result.point, point);
        assert_eq!(result.value, 0.5);
        assert_eq!(result.iterations, 100);
        assert!(result.converged);
        assert_eq!(result.termination_reason, TerminationReason::Converged);
    }

    #[test]
    fn test_optimization_result_not_converged() {
        let point = DVector::from_vec(vec![1.0]);
        let result = OptimizationResult::new(
            point,
            0.5,
            100,
            Duration::from_secs(1),
            TerminationReason::MaxIterations,
        )
        .with_gradient_norm(0.25)
        .with_function_evaluations(101)
        .with_gradient_evaluations(100);

        assert!(!result.converged);
        assert_eq!(result.gradient_norm, Some(0.25));
        assert_eq!(result.function_evaluations, 101);
        assert_eq!(result.gradient_evaluations, 100);
    }

    #[test]
    fn test_stopping_criterion() {
        let criterion = StoppingCriterion::<f64>::new()
            .with_max_iterations(500)
            .with_gradient_tolerance(1e-8)
            .with_function_tolerance(1e-10);

        assert_eq!(criterion.max_iterations, Some(500));
        assert_eq!(criterion.gradient_tolerance, Some(1e-8));
        assert_eq!(criterion.function_tolerance, Some(1e-10));
    }

    #[test]
    fn test_stopping_criterion_defaults() {
        let criterion = StoppingCriterion::<f64>::default();

        assert_eq!(criterion.max_iterations, Some(100));
        assert_eq!(criterion.gradient_tolerance, Some(1e-5));
        assert_eq!(criterion.function_tolerance, None);
        assert_eq!(criterion.point_tolerance, None);
        assert_eq!(criterion.target_value, None);
    }

    #[test]
    fn test_optimizer_state() {
        let point = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let mut state = OptimizerState::new(point.clone(), 1.0);

        assert_eq!(state.iteration, 0);
        assert_eq!(state.function_evaluations, 1);
        assert_eq!(state.gradient_evaluations, 0);

        let new_point = DVector::from_vec(vec![0.9, 0.1, 0.0]);
        state.update(new_point.clone(), 0.9);

        assert_eq!(state.iteration, 1);
        assert_eq!(state.point, new_point);
        assert_eq!(state.value, 0.9);
        assert_eq!(state.previous_value, Some(1.0));
        assert!((state.value_change().unwrap() - 0.1f64).abs() < 1e-10);

        let change = state.point_change().unwrap();
        assert!((change - 0.1f64.hypot(0.1)).abs() < 1e-10);
    }

    #[test]
    fn test_convergence_checker_iterations() {
        let point = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let mut state = OptimizerState::<f64>::new(point, 1.0);
        state.iteration = 1000;

        let criterion = StoppingCriterion::new().with_max_iterations(1000);

        let result = ConvergenceChecker::check(&state, &criterion);
        assert_eq!(result, Some(TerminationReason::MaxIterations));
    }

    #[test]
    fn test_convergence_checker_gradient() {
        let point = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let mut state = OptimizerState::<f64>::new(point, 1.0);
        let gradient = DVector::from_vec(vec![1e-7, 0.0, 0.0]);
        state.set_gradient(gradient, 1e-7);

        let criterion = StoppingCriterion::new().with_gradient_tolerance(1e-6);

        let result = ConvergenceChecker::check(&state, &criterion);
        assert_eq!(result, Some(TerminationReason::Converged));
    }

    #[test]
    fn test_convergence_checker_target_value() {
        let point = DVector::from_vec(vec![1.0]);
        let state = OptimizerState::<f64>::new(point, 0.05);

        let criterion = StoppingCriterion::new()
            .with_max_iterations(1000)
            .with_target_value(0.1);

        let result = ConvergenceChecker::check(&state, &criterion);
        assert_eq!(result, Some(TerminationReason::TargetReached));
    }

    #[test]
    fn test_convergence_checker_max_time() {
        let point = DVector::from_vec(vec![1.0]);
        let state = OptimizerState::<f64>::new(point, 1.0);

        let criterion = StoppingCriterion::new().with_max_time(Duration::ZERO);

        let result = ConvergenceChecker::check(&state, &criterion);
        assert_eq!(result, Some(TerminationReason::MaxTime));
    }

    #[test]
    fn test_convergence_checker_point_change() {
        let point = DVector::from_vec(vec![1.0, 0.0]);
        let mut state = OptimizerState::<f64>::new(point.clone(), 1.0);

        // First iteration has no previous point, so no convergence
        let criterion = StoppingCriterion::<f64>::new()
            .with_max_iterations(1000)
            .with_point_tolerance(1e-6);
        assert_eq!(ConvergenceChecker::check(&state, &criterion), None);

        // A negligible move triggers the point tolerance
        let new_point = DVector::from_vec(vec![1.0 + 1e-9, 0.0]);
        state.update(new_point, 0.999_999_999);
        let result = ConvergenceChecker::check(&state, &criterion);
        assert_eq!(result, Some(TerminationReason::Converged));
    }

    #[test]
    fn test_convergence_checker_no_criteria_met() {
        let point = DVector::from_vec(vec![1.0]);
        let mut state = OptimizerState::<f64>::new(point, 1.0);
        state.set_gradient(DVector::from_vec(vec![0.5]), 0.5);

        let criterion = StoppingCriterion::new()
            .with_max_iterations(1000)
            .with_gradient_tolerance(1e-6);

        assert_eq!(ConvergenceChecker::check(&state, &criterion), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stopping_criterion_serde_roundtrip() {
        let criterion = StoppingCriterion::<f64>::new()
            .with_max_iterations(250)
            .with_gradient_tolerance(1e-7);

        let json = serde_json::to_string(&criterion).unwrap();
        let back: StoppingCriterion<f64> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.max_iterations, Some(250));
        assert_eq!(back.gradient_tolerance, Some(1e-7));
    }
}
