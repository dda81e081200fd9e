//! BFGS quasi-Newton optimizer.
//!
//! BFGS maintains a dense approximation of the inverse Hessian and
//! refines it from observed gradient differences, giving superlinear
//! local convergence without ever forming second derivatives.
//!
//! # Algorithm Overview
//!
//! With `H` the current inverse Hessian approximation, each iteration:
//!
//! ```text
//! d   = -H g                       search direction
//! α   = line search along d        backtracking Armijo, fixed fallback
//! s   = α d                        step taken
//! y   = g_new - g                  gradient difference
//! ρ   = 1 / (yᵀ s)
//! H   = (I - ρ s yᵀ) H (I - ρ y sᵀ) + ρ s sᵀ
//! ```
//!
//! The update is skipped whenever the curvature `yᵀ s` is not safely
//! positive, which keeps `H` positive definite.
//!
//! # References
//!
//! - Nocedal & Wright, "Numerical Optimization" (2006), chapter 6

use euclidopt_core::{
    callback::{CallbackInfo, NoOpCallback, OptimizationCallback},
    cost_function::CostFunction,
    error::{OptimizerError, OptimizerResult},
    line_search::{BacktrackingLineSearch, LineSearch, LineSearchParams},
    optimizer::{
        ConvergenceChecker, OptimizationResult, Optimizer, OptimizerState, StoppingCriterion,
        TerminationReason,
    },
    types::{DMatrix, DVector, Scalar},
};

use std::time::Instant;

/// Curvature below this threshold leaves the inverse Hessian untouched.
const MIN_CURVATURE: f64 = 1e-12;

/// Configuration for the BFGS optimizer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BFGSConfig<T: Scalar> {
    /// Parameters of the backtracking line search
    pub line_search_params: LineSearchParams<T>,
    /// Step taken along the search direction when the line search fails
    pub fallback_step_size: T,
}

impl<T: Scalar> Default for BFGSConfig<T> {
    fn default() -> Self {
        Self {
            line_search_params: LineSearchParams::default(),
            fallback_step_size: <T as Scalar>::from_f64(0.1),
        }
    }
}

impl<T: Scalar> BFGSConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the line search parameters.
    pub fn with_line_search_params(mut self, params: LineSearchParams<T>) -> Self {
        self.line_search_params = params;
        self
    }

    /// Sets the fallback step size.
    pub fn with_fallback_step_size(mut self, step: T) -> Self {
        self.fallback_step_size = step;
        self
    }

    fn validate(&self) -> OptimizerResult<()> {
        self.line_search_params.validate()?;
        if self.fallback_step_size <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "must be positive",
                "fallback_step_size",
                format!("{}", self.fallback_step_size),
            ));
        }
        Ok(())
    }
}

/// BFGS quasi-Newton optimizer.
///
/// # Examples
///
/// ```
/// use euclidopt_core::cost_function::QuadraticCost;
/// use euclidopt_core::optimizer::{Optimizer, StoppingCriterion};
/// use euclidopt_core::types::DVector;
/// use euclidopt_optim::{BFGS, BFGSConfig};
///
/// let cost = QuadraticCost::<f64>::simple(2);
/// let mut optimizer = BFGS::new(BFGSConfig::default());
/// let x0 = DVector::from_vec(vec![5.0, -3.0]);
///
/// let result = optimizer
///     .optimize(&cost, &x0, &StoppingCriterion::default())
///     .unwrap();
/// assert!(result.converged);
/// ```
#[derive(Debug, Clone)]
pub struct BFGS<T: Scalar> {
    config: BFGSConfig<T>,
    line_search: BacktrackingLineSearch,
}

impl<T: Scalar> BFGS<T> {
    /// Creates a new BFGS optimizer with the given configuration.
    pub fn new(config: BFGSConfig<T>) -> Self {
        Self {
            config,
            line_search: BacktrackingLineSearch::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BFGSConfig<T> {
        &self.config
    }

    /// Minimizes the cost function, invoking the callback at each iteration.
    pub fn optimize_with_callback<C, CB>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
        callback: &mut CB,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        C: CostFunction<T>,
        CB: OptimizationCallback<T>,
    {
        self.config.validate()?;

        let start_time = Instant::now();
        let n = initial_point.len();
        let initial_value = cost_fn.cost(initial_point)?;
        let mut state = OptimizerState::new(initial_point.clone(), initial_value);
        let mut h = DMatrix::<T>::identity(n, n);

        callback.on_optimization_start()?;

        let result = loop {
            let gradient = cost_fn.gradient(&state.point)?;
            let grad_norm = gradient.norm();
            state.set_gradient(gradient.clone(), grad_norm);

            if let Some(reason) = ConvergenceChecker::check(&state, stopping_criterion) {
                break OptimizationResult::new(
                    state.point.clone(),
                    state.value,
                    state.iteration,
                    start_time.elapsed(),
                    reason,
                )
                .with_gradient_norm(grad_norm)
                .with_function_evaluations(state.function_evaluations)
                .with_gradient_evaluations(state.gradient_evaluations);
            }

            let mut direction = -(&h * &gradient);
            if gradient.dot(&direction) >= T::zero() {
                // Stale curvature information can spoil the direction;
                // restart from steepest descent.
                h = DMatrix::identity(n, n);
                direction = -&gradient;
            }

            let (new_point, new_value, search_evals) = match self.line_search.search(
                cost_fn,
                &state.point,
                state.value,
                &gradient,
                &direction,
                &self.config.line_search_params,
            ) {
                Ok(ls) => (ls.new_point, ls.new_value, ls.function_evals),
                Err(OptimizerError::LineSearchFailed { iterations, .. }) => {
                    let point = &state.point + &direction * self.config.fallback_step_size;
                    let value = cost_fn.cost(&point)?;
                    (point, value, iterations + 1)
                }
                Err(OptimizerError::InvalidSearchDirection) => {
                    let point = &state.point + &direction * self.config.fallback_step_size;
                    let value = cost_fn.cost(&point)?;
                    (point, value, 1)
                }
                Err(other) => return Err(other),
            };

            let new_gradient = cost_fn.gradient(&new_point)?;
            state.gradient_evaluations += 1;

            let s = &new_point - &state.point;
            let y = &new_gradient - &gradient;
            let sy = s.dot(&y);

            if sy > <T as Scalar>::from_f64(MIN_CURVATURE) {
                let rho = T::one() / sy;
                let identity = DMatrix::<T>::identity(n, n);
                let left = &identity - (&s * y.transpose()) * rho;
                let right = &identity - (&y * s.transpose()) * rho;
                h = &left * &h * &right + (&s * s.transpose()) * rho;
            }

            state.function_evaluations += search_evals - 1;
            state.update(new_point, new_value);

            let info = CallbackInfo {
                state: state.clone(),
                elapsed: start_time.elapsed(),
                converged: false,
            };
            if !callback.on_iteration_end(&info)? {
                break OptimizationResult::new(
                    state.point.clone(),
                    state.value,
                    state.iteration,
                    start_time.elapsed(),
                    TerminationReason::UserTerminated,
                )
                .with_gradient_norm(new_gradient.norm())
                .with_function_evaluations(state.function_evaluations)
                .with_gradient_evaluations(state.gradient_evaluations);
            }
        };

        let info = CallbackInfo {
            state: state.clone(),
            elapsed: start_time.elapsed(),
            converged: result.converged,
        };
        callback.on_optimization_end(&info)?;

        Ok(result)
    }
}

impl<T: Scalar> Optimizer<T> for BFGS<T> {
    fn name(&self) -> &str {
        "BFGS"
    }

    fn optimize<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
    ) -> OptimizerResult<OptimizationResult<T>> {
        self.optimize_with_callback(cost_fn, initial_point, stopping_criterion, &mut NoOpCallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclidopt_core::cost_function::QuadraticCost;
    use euclidopt_core::error::Result;

    /// f(x, y) = (x - 2)^2 + 2 (y - 1)^2 with its analytic gradient.
    #[derive(Debug)]
    struct EllipticCost;

    impl CostFunction<f64> for EllipticCost {
        fn cost(&self, point: &DVector<f64>) -> Result<f64> {
            let (x, y) = (point[0], point[1]);
            Ok((x - 2.0).powi(2) + 2.0 * (y - 1.0).powi(2))
        }

        fn gradient(&self, point: &DVector<f64>) -> Result<DVector<f64>> {
            let (x, y) = (point[0], point[1]);
            Ok(DVector::from_vec(vec![2.0 * (x - 2.0), 4.0 * (y - 1.0)]))
        }
    }

    #[derive(Debug)]
    struct RosenbrockCost;

    impl CostFunction<f64> for RosenbrockCost {
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
    }

    /// Objective that is flat everywhere but reports a nonzero slope, so
    /// no step can satisfy the sufficient decrease condition.
    #[derive(Debug)]
    struct FlatCost;

    impl CostFunction<f64> for FlatCost {
        fn cost(&self, _point: &DVector<f64>) -> Result<f64> {
            Ok(0.0)
        }

        fn gradient(&self, _point: &DVector<f64>) -> Result<DVector<f64>> {
            Ok(DVector::from_element(1, 1.0))
        }
    }

    struct StopAfter {
        limit: usize,
        seen: usize,
    }

    impl OptimizationCallback<f64> for StopAfter {
        fn on_iteration_end(&mut self, _info: &CallbackInfo<f64>) -> Result<bool> {
            self.seen += 1;
            Ok(self.seen < self.limit)
        }
    }

    #[test]
    fn test_config_builders() {
        let params = LineSearchParams::backtracking();
        let config = BFGSConfig::<f64>::new()
            .with_line_search_params(params)
            .with_fallback_step_size(0.05);
        assert_eq!(config.fallback_step_size, 0.05);
        assert_eq!(config.line_search_params.max_iterations, 20);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cost = QuadraticCost::<f64>::simple(2);
        let x0 = DVector::zeros(2);

        let bad = BFGSConfig::default().with_fallback_step_size(0.0);
        let err = BFGS::new(bad)
            .optimize(&cost, &x0, &StoppingCriterion::default())
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_elliptic_bowl() {
        let mut optimizer = BFGS::new(BFGSConfig::default());
        let x0 = DVector::zeros(2);

        let result = optimizer
            .optimize(&EllipticCost, &x0, &StoppingCriterion::default())
            .unwrap();

        assert!(result.converged);
        assert!((result.point[0] - 2.0).abs() < 1e-4);
        assert!((result.point[1] - 1.0).abs() < 1e-4);
        assert!(result.value < 1e-8);
        assert!(result.gradient_norm.unwrap() < 1e-5);
    }

    #[test]
    fn test_rosenbrock_valley() {
        let mut optimizer = BFGS::new(BFGSConfig::default());
        let x0 = DVector::from_vec(vec![-1.2, 1.0]);
        let criterion = StoppingCriterion::default().with_max_iterations(500);

        let result = optimizer.optimize(&RosenbrockCost, &x0, &criterion).unwrap();

        assert!(result.converged, "stopped by {:?}", result.termination_reason);
        assert!((result.point[0] - 1.0).abs() < 1e-3);
        assert!((result.point[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_quadratic_high_dimensional() {
        let cost = QuadraticCost::<f64>::simple(5);
        let mut optimizer = BFGS::new(BFGSConfig::default());
        let x0 = DVector::from_element(5, 5.0);

        let result = optimizer
            .optimize(&cost, &x0, &StoppingCriterion::default())
            .unwrap();

        assert!(result.converged);
        assert!(result.point.norm() < 1e-4);
    }

    #[test]
    fn test_target_value_stops_run() {
        let mut optimizer = BFGS::new(BFGSConfig::default());
        let x0 = DVector::zeros(2);
        let criterion = StoppingCriterion::default().with_target_value(3.0);

        let result = optimizer.optimize(&EllipticCost, &x0, &criterion).unwrap();

        // The first step reaches f = 2 while the gradient norm is still 4,
        // so the target fires before the gradient tolerance can.
        assert!(result.converged);
        assert_eq!(result.termination_reason, TerminationReason::TargetReached);
        assert!(result.value <= 3.0);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_failed_line_search_takes_fallback_steps() {
        let mut optimizer = BFGS::new(BFGSConfig::default());
        let x0 = DVector::zeros(1);
        let criterion = StoppingCriterion::default().with_max_iterations(3);

        let result = optimizer.optimize(&FlatCost, &x0, &criterion).unwrap();

        // Each iteration falls back to a fixed step of 0.1 along -g.
        assert!(!result.converged);
        assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
        assert_eq!(result.iterations, 3);
        assert!((result.point[0] + 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_early_stop_reports_current_gradient() {
        let mut optimizer = BFGS::new(BFGSConfig::default());
        let x0 = DVector::zeros(2);
        let mut callback = StopAfter { limit: 1, seen: 0 };

        let result = optimizer
            .optimize_with_callback(
                &EllipticCost,
                &x0,
                &StoppingCriterion::default(),
                &mut callback,
            )
            .unwrap();

        // The first step backtracks once and lands on (2, 2), where the
        // gradient is (0, 4).
        assert_eq!(result.termination_reason, TerminationReason::UserTerminated);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.point, DVector::from_vec(vec![2.0, 2.0]));
        assert_eq!(result.gradient_norm, Some(4.0));
    }

    #[test]
    fn test_default_criterion_caps_iterations() {
        let mut optimizer = BFGS::new(BFGSConfig::default());
        let x0 = DVector::zeros(1);

        let result = optimizer
            .optimize(&FlatCost, &x0, &StoppingCriterion::default())
            .unwrap();

        // The shared stopping criterion supplies the iteration cap.
        assert!(!result.converged);
        assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
        assert_eq!(result.iterations, 100);
        assert!((result.point[0] + 10.0).abs() < 1e-9);
    }
}
