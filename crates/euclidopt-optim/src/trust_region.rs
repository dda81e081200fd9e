//! Trust region optimizer with a Cauchy point subproblem solver.
//!
//! Trust region methods minimize a local quadratic model of the objective
//! within a ball around the current iterate where the model is trusted to
//! be accurate. The ball radius adapts to how well the model predicts the
//! actual reduction, which makes the method robust far from a minimizer
//! while retaining fast local progress.
//!
//! # Algorithm Overview
//!
//! At each iteration, the trust region method:
//! 1. Evaluates the gradient and Hessian of the objective at the iterate
//! 2. Minimizes the quadratic model along the steepest descent direction,
//!    clipped to the trust region boundary (the Cauchy point)
//! 3. Evaluates the actual vs predicted reduction at the trial point
//! 4. Accepts the trial point only if the agreement is good enough
//! 5. Expands the radius after strong boundary steps, shrinks it after
//!    rejections
//!
//! # References
//!
//! - Conn et al., "Trust Region Methods" (2000)
//! - Nocedal & Wright, "Numerical Optimization" (2006)

use euclidopt_core::{
    callback::{CallbackInfo, NoOpCallback, OptimizationCallback},
    cost_function::CostFunction,
    error::{OptimizerError, OptimizerResult},
    optimizer::{
        ConvergenceChecker, OptimizationResult, Optimizer, OptimizerState, StoppingCriterion,
        TerminationReason,
    },
    types::{DMatrix, DVector, Scalar},
};

use approx::relative_eq;
use num_traits::Float;
use std::time::Instant;

/// Configuration for the Trust Region optimizer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrustRegionConfig<T: Scalar> {
    /// Initial trust region radius
    pub initial_radius: T,
    /// Maximum trust region radius
    pub max_radius: T,
    /// Ratio threshold for accepting a step (eta in the literature)
    pub acceptance_ratio: T,
    /// Ratio threshold for expanding the trust region (typically 0.75)
    pub increase_threshold: T,
    /// Factor for expanding the trust region radius (typically 2.0)
    pub increase_factor: T,
    /// Factor for shrinking the trust region radius after a rejection
    pub decrease_factor: T,
}

impl<T: Scalar> Default for TrustRegionConfig<T> {
    fn default() -> Self {
        Self {
            initial_radius: <T as Scalar>::from_f64(1.0),
            max_radius: <T as Scalar>::from_f64(10.0),
            acceptance_ratio: <T as Scalar>::from_f64(0.1),
            increase_threshold: <T as Scalar>::from_f64(0.75),
            increase_factor: <T as Scalar>::from_f64(2.0),
            decrease_factor: <T as Scalar>::from_f64(0.5),
        }
    }
}

impl<T: Scalar> TrustRegionConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial trust region radius.
    pub fn with_initial_radius(mut self, radius: T) -> Self {
        self.initial_radius = radius;
        self
    }

    /// Sets the maximum trust region radius.
    pub fn with_max_radius(mut self, radius: T) -> Self {
        self.max_radius = radius;
        self
    }

    /// Sets the acceptance ratio threshold.
    pub fn with_acceptance_ratio(mut self, ratio: T) -> Self {
        self.acceptance_ratio = ratio;
        self
    }

    /// Sets the expansion threshold.
    pub fn with_increase_threshold(mut self, threshold: T) -> Self {
        self.increase_threshold = threshold;
        self
    }

    /// Sets the expansion factor.
    pub fn with_increase_factor(mut self, factor: T) -> Self {
        self.increase_factor = factor;
        self
    }

    /// Sets the shrink factor.
    pub fn with_decrease_factor(mut self, factor: T) -> Self {
        self.decrease_factor = factor;
        self
    }

    fn validate(&self) -> OptimizerResult<()> {
        if self.initial_radius <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "must be positive",
                "initial_radius",
                format!("{}", self.initial_radius),
            ));
        }
        if self.max_radius < self.initial_radius {
            return Err(OptimizerError::invalid_configuration(
                "must be at least initial_radius",
                "max_radius",
                format!("{}", self.max_radius),
            ));
        }
        if self.acceptance_ratio <= T::zero() || self.acceptance_ratio >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "must be in (0, 1)",
                "acceptance_ratio",
                format!("{}", self.acceptance_ratio),
            ));
        }
        if self.increase_threshold <= self.acceptance_ratio || self.increase_threshold >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "must be in (acceptance_ratio, 1)",
                "increase_threshold",
                format!("{}", self.increase_threshold),
            ));
        }
        if self.increase_factor <= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "must be greater than 1",
                "increase_factor",
                format!("{}", self.increase_factor),
            ));
        }
        if self.decrease_factor <= T::zero() || self.decrease_factor >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "must be in (0, 1)",
                "decrease_factor",
                format!("{}", self.decrease_factor),
            ));
        }
        Ok(())
    }
}

/// Trust Region optimizer.
///
/// Uses the exact Hessian supplied by the cost function and the Cauchy
/// point as the subproblem solution. Directions of non-positive curvature
/// fall back to a steepest descent step to the trust region boundary, so
/// the method makes progress even on concave or flat regions.
///
/// # Examples
///
/// ```
/// use euclidopt_core::cost_function::QuadraticCost;
/// use euclidopt_core::optimizer::{Optimizer, StoppingCriterion};
/// use euclidopt_core::types::DVector;
/// use euclidopt_optim::{TrustRegion, TrustRegionConfig};
///
/// let cost = QuadraticCost::<f64>::simple(2);
/// let mut optimizer = TrustRegion::new(TrustRegionConfig::default());
/// let x0 = DVector::from_vec(vec![4.0, 3.0]);
///
/// let result = optimizer
///     .optimize(&cost, &x0, &StoppingCriterion::default())
///     .unwrap();
/// assert!(result.converged);
/// ```
#[derive(Debug, Clone)]
pub struct TrustRegion<T: Scalar> {
    config: TrustRegionConfig<T>,
}

impl<T: Scalar> TrustRegion<T> {
    /// Creates a new Trust Region optimizer with the given configuration.
    pub fn new(config: TrustRegionConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TrustRegionConfig<T> {
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
        let initial_value = cost_fn.cost(initial_point)?;
        let mut state = OptimizerState::new(initial_point.clone(), initial_value);
        let mut radius = self.config.initial_radius;

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

            let hessian = cost_fn.hessian(&state.point)?;
            let step = cauchy_step(&gradient, &hessian, radius);
            let step_norm = step.norm();

            let trial_point = &state.point + &step;
            let trial_value = cost_fn.cost(&trial_point)?;

            let hs = &hessian * &step;
            let predicted_reduction =
                -gradient.dot(&step) - step.dot(&hs) * <T as Scalar>::from_f64(0.5);

            // A vanishing predicted reduction makes the ratio meaningless,
            // so the step is rejected and the region shrinks.
            let ratio = if <T as Float>::abs(predicted_reduction) > T::EPSILON {
                (state.value - trial_value) / predicted_reduction
            } else {
                T::zero()
            };

            let accepted = ratio > self.config.acceptance_ratio;
            if accepted {
                state.update(trial_point, trial_value);
            } else {
                state.iteration += 1;
                state.function_evaluations += 1;
            }

            radius = self.updated_radius(radius, ratio, accepted, step_norm);

            let info = CallbackInfo {
                state: state.clone(),
                elapsed: start_time.elapsed(),
                converged: false,
            };
            if !callback.on_iteration_end(&info)? {
                // An accepted step leaves the loop-top gradient one iterate
                // behind the returned point.
                let final_norm = if accepted {
                    let final_gradient = cost_fn.gradient(&state.point)?;
                    let norm = final_gradient.norm();
                    state.set_gradient(final_gradient, norm);
                    norm
                } else {
                    grad_norm
                };
                break OptimizationResult::new(
                    state.point.clone(),
                    state.value,
                    state.iteration,
                    start_time.elapsed(),
                    TerminationReason::UserTerminated,
                )
                .with_gradient_norm(final_norm)
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

    /// Computes the radius for the next iteration.
    ///
    /// The region expands only after an accepted step that both agrees
    /// strongly with the model and reaches the boundary; it shrinks after
    /// every rejection and is otherwise left unchanged.
    fn updated_radius(&self, radius: T, ratio: T, accepted: bool, step_norm: T) -> T {
        if !accepted {
            return radius * self.config.decrease_factor;
        }
        let at_boundary = relative_eq!(step_norm, radius, epsilon = T::BOUNDARY_TOLERANCE);
        if ratio > self.config.increase_threshold && at_boundary {
            <T as Float>::min(radius * self.config.increase_factor, self.config.max_radius)
        } else {
            radius
        }
    }
}

/// Minimizes the quadratic model along the steepest descent direction
/// within the trust region.
///
/// For positive curvature along the gradient the unconstrained minimizer
/// is clipped to the boundary; for non-positive curvature the model
/// decreases all the way to the boundary, so the full boundary step is
/// taken. The returned step always satisfies `||p|| <= radius`.
fn cauchy_step<T: Scalar>(
    gradient: &DVector<T>,
    hessian: &DMatrix<T>,
    radius: T,
) -> DVector<T> {
    let grad_norm = gradient.norm();
    if grad_norm == T::zero() {
        return DVector::zeros(gradient.len());
    }

    let hg = hessian * gradient;
    let curvature = gradient.dot(&hg);

    let mut step = if curvature <= T::zero() {
        gradient * (-(radius / grad_norm))
    } else {
        let alpha = <T as Float>::min(gradient.norm_squared() / curvature, radius / grad_norm);
        gradient * (-alpha)
    };

    // Guard against rounding pushing the step past the boundary.
    let step_norm = step.norm();
    if step_norm > radius {
        step *= radius / step_norm;
    }
    step
}

impl<T: Scalar> Optimizer<T> for TrustRegion<T> {
    fn name(&self) -> &str {
        "Trust Region"
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
