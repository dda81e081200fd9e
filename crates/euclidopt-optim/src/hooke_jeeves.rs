//! Hooke-Jeeves pattern search optimizer.
//!
//! A derivative-free method that alternates two kinds of moves. The
//! exploratory move probes each coordinate in turn, keeping every change
//! that lowers the objective. When the walk finds a better point, a
//! pattern move doubles the displacement on the expectation that the same
//! direction keeps paying off; otherwise the probe step is shrunk. The
//! method stops once the probe step falls below the tolerance.
//!
//! # References
//!
//! - Hooke & Jeeves, "Direct Search Solution of Numerical and
//!   Statistical Problems" (1961)

use euclidopt_core::{
    callback::{CallbackInfo, NoOpCallback, OptimizationCallback},
    cost_function::CostFunction,
    error::{OptimizerError, OptimizerResult, Result},
    optimizer::{
        ConvergenceChecker, OptimizationResult, Optimizer, OptimizerState, StoppingCriterion,
        TerminationReason,
    },
    types::{DVector, Scalar},
};

use std::time::Instant;

/// Configuration for the Hooke-Jeeves optimizer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HookeJeevesConfig<T: Scalar> {
    /// Initial coordinate probe step
    pub initial_step: T,
    /// Factor applied to the step after a failed exploratory move
    pub step_reduction: T,
    /// Probe step below which the search is considered converged
    pub tolerance: T,
}

impl<T: Scalar> Default for HookeJeevesConfig<T> {
    fn default() -> Self {
        Self {
            initial_step: <T as Scalar>::from_f64(1.0),
            step_reduction: <T as Scalar>::from_f64(0.5),
            tolerance: T::DEFAULT_TOLERANCE,
        }
    }
}

impl<T: Scalar> HookeJeevesConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial probe step.
    pub fn with_initial_step(mut self, step: T) -> Self {
        self.initial_step = step;
        self
    }

    /// Sets the step reduction factor.
    pub fn with_step_reduction(mut self, factor: T) -> Self {
        self.step_reduction = factor;
        self
    }

    /// Sets the convergence tolerance on the probe step.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> OptimizerResult<()> {
        if self.initial_step <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "must be positive",
                "initial_step",
                format!("{}", self.initial_step),
            ));
        }
        if self.step_reduction <= T::zero() || self.step_reduction >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "must be in (0, 1)",
                "step_reduction",
                format!("{}", self.step_reduction),
            ));
        }
        if self.tolerance <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "must be positive",
                "tolerance",
                format!("{}", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// Hooke-Jeeves pattern search optimizer.
///
/// Uses only cost evaluations, so it applies to objectives without
/// usable derivatives. The iterate carries no gradient information and
/// gradient-based stopping criteria never fire for it.
///
/// # Examples
///
/// ```
/// use euclidopt_core::cost_function::QuadraticCost;
/// use euclidopt_core::optimizer::{Optimizer, StoppingCriterion};
/// use euclidopt_core::types::DVector;
/// use euclidopt_optim::{HookeJeeves, HookeJeevesConfig};
///
/// let cost = QuadraticCost::<f64>::simple(2);
/// let mut optimizer = HookeJeeves::new(HookeJeevesConfig::default());
/// let x0 = DVector::from_vec(vec![3.0, 4.0]);
///
/// let result = optimizer
///     .optimize(&cost, &x0, &StoppingCriterion::default())
///     .unwrap();
/// assert!(result.converged);
/// assert!(result.value < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct HookeJeeves<T: Scalar> {
    config: HookeJeevesConfig<T>,
}

impl<T: Scalar> HookeJeeves<T> {
    /// Creates a new Hooke-Jeeves optimizer with the given configuration.
    pub fn new(config: HookeJeevesConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HookeJeevesConfig<T> {
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
        let mut step_size = self.config.initial_step;

        callback.on_optimization_start()?;

        let result = loop {
            if let Some(reason) = ConvergenceChecker::check(&state, stopping_criterion) {
                break OptimizationResult::new(
                    state.point.clone(),
                    state.value,
                    state.iteration,
                    start_time.elapsed(),
                    reason,
                )
                .with_function_evaluations(state.function_evaluations);
            }

            if step_size < self.config.tolerance {
                break OptimizationResult::new(
                    state.point.clone(),
                    state.value,
                    state.iteration,
                    start_time.elapsed(),
                    TerminationReason::Converged,
                )
                .with_function_evaluations(state.function_evaluations);
            }

            let (probe, probe_value, evals) =
                exploratory_move(cost_fn, &state.point, state.value, step_size)?;
            state.function_evaluations += evals;

            if probe_value < state.value {
                // The pattern move doubles the successful displacement;
                // the cost of evaluating the accepted point is booked by
                // the state update.
                let pattern_point = &probe * <T as Scalar>::from_f64(2.0) - &state.point;
                let pattern_value = cost_fn.cost(&pattern_point)?;

                if pattern_value < probe_value {
                    state.update(pattern_point, pattern_value);
                } else {
                    state.update(probe, probe_value);
                }
            } else {
                step_size *= self.config.step_reduction;
                state.iteration += 1;
            }

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
                .with_function_evaluations(state.function_evaluations);
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

/// Probes each coordinate in turn with `+step` then `-step`, keeping
/// every change that improves on the best value seen along the walk.
///
/// Returns the final probe point, its value and the number of cost
/// evaluations spent.
fn exploratory_move<T, C>(
    cost_fn: &C,
    base: &DVector<T>,
    base_value: T,
    step: T,
) -> Result<(DVector<T>, T, usize)>
where
    T: Scalar,
    C: CostFunction<T>,
{
    let mut probe = base.clone();
    let mut best_value = base_value;
    let mut evals = 0;

    for i in 0..probe.len() {
        let original = probe[i];
        for sign in [T::one(), -T::one()] {
            probe[i] = original + sign * step;
            let trial = cost_fn.cost(&probe)?;
            evals += 1;
            if trial < best_value {
                best_value = trial;
                break;
            }
            probe[i] = original;
        }
    }

    Ok((probe, best_value, evals))
}

impl<T: Scalar> Optimizer<T> for HookeJeeves<T> {
    fn name(&self) -> &str {
        "Hooke-Jeeves"
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
