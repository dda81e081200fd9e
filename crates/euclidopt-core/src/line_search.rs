//! Line search algorithms for step size selection.
//!
//! This module implements line search strategies for determining step sizes
//! along search directions in Euclidean space. Given a point x, a descent
//! direction d and an objective f, a line search finds α > 0 such that
//! x + α·d makes sufficient progress.
//!
//! # Sufficient Decrease
//!
//! Progress is measured by the Armijo condition:
//!
//! f(x + α·d) ≤ f(x) + c₁ α ⟨grad f(x), d⟩
//!
//! where 0 < c₁ < 1 (typically 10⁻⁴). Backtracking starts from an initial
//! step and multiplies it by ρ ∈ (0, 1) until the condition holds or the
//! step underflows `min_step_size`.
//!
//! # Variants
//!
//! - **Backtracking**: robust Armijo-only search, suitable for gradient
//!   descent and quasi-Newton methods paired with a curvature safeguard.
//! - **Fixed step**: predetermined step size, no search. Useful for
//!   theoretical analysis and as a deterministic fallback.

use crate::{
    cost_function::CostFunction,
    error::{CoreError, OptimizerError, OptimizerResult, Result},
    types::{DVector, Scalar},
};
use std::fmt::Debug;

/// Result of a line search operation.
///
/// Contains the accepted step size, the new point and value, and the
/// number of function evaluations spent finding them.
#[derive(Debug, Clone)]
pub struct LineSearchResult<T>
where
    T: Scalar,
{
    /// The accepted step size α
    pub step_size: T,

    /// The new point x + α·d
    pub new_point: DVector<T>,

    /// The objective function value at the new point
    pub new_value: T,

    /// Number of objective function evaluations performed
    pub function_evals: usize,

    /// True if the search found a step satisfying its acceptance condition
    pub success: bool,
}

/// Tuning parameters for line search algorithms.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSearchParams<T>
where
    T: Scalar,
{
    /// Initial step size α₀ for line search start
    pub initial_step_size: T,

    /// Maximum allowable step size to prevent overshooting
    pub max_step_size: T,

    /// Minimum step size threshold before declaring line search failure
    pub min_step_size: T,

    /// Maximum number of line search iterations before termination
    pub max_iterations: usize,

    /// Armijo parameter c₁ ∈ (0,1) for the sufficient decrease condition
    pub c1: T,

    /// Backtracking reduction factor ρ ∈ (0,1) for step size reduction
    pub rho: T,
}

impl<T> Default for LineSearchParams<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            initial_step_size: T::one(),
            max_step_size: <T as Scalar>::from_f64(10.0),
            min_step_size: <T as Scalar>::from_f64(1e-10),
            max_iterations: 50,
            c1: <T as Scalar>::from_f64(1e-4),
            rho: <T as Scalar>::from_f64(0.5),
        }
    }
}

impl<T> LineSearchParams<T>
where
    T: Scalar,
{
    /// Validates line search parameters.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidParameter` if:
    /// - Step sizes violate positivity or ordering constraints
    /// - The Armijo constant does not satisfy 0 < c₁ < 1
    /// - The backtracking factor ρ is outside (0, 1)
    /// - Maximum iterations is zero
    pub fn validate(&self) -> Result<()> {
        if self.initial_step_size <= T::zero() {
            return Err(CoreError::invalid_parameter(
                "Initial step size must be positive",
            ));
        }

        if self.min_step_size <= T::zero() {
            return Err(CoreError::invalid_parameter(
                "Minimum step size must be positive",
            ));
        }

        if self.max_step_size <= self.min_step_size {
            return Err(CoreError::invalid_parameter(
                "Maximum step size must be greater than minimum step size",
            ));
        }

        if self.max_step_size > T::MAX_STEP_SIZE {
            return Err(CoreError::invalid_parameter(
                "Maximum step size exceeds the supported range",
            ));
        }

        if self.c1 <= T::zero() || self.c1 >= T::one() {
            return Err(CoreError::invalid_parameter(
                "Armijo constant c1 must be in (0, 1)",
            ));
        }

        if self.rho <= T::zero() || self.rho >= T::one() {
            return Err(CoreError::invalid_parameter(
                "Backtracking factor rho must be in (0, 1)",
            ));
        }

        if self.max_iterations == 0 {
            return Err(CoreError::invalid_parameter(
                "Maximum iterations must be at least 1",
            ));
        }

        Ok(())
    }

    /// Creates parameters for a robust first-order backtracking search.
    ///
    /// Uses a relaxed sufficient decrease constant (c₁ = 0.5) and a short
    /// iteration budget, which is enough for steepest-descent style methods.
    pub fn backtracking() -> Self {
        Self {
            c1: <T as Scalar>::from_f64(0.5),
            rho: <T as Scalar>::from_f64(0.5),
            max_iterations: 20,
            ..Self::default()
        }
    }
}

/// Trait for line search algorithms.
pub trait LineSearch<T>: Debug
where
    T: Scalar,
{
    /// Searches for an acceptable step size along a direction.
    ///
    /// # Arguments
    ///
    /// * `cost_fn` - The objective function
    /// * `point` - The current point x
    /// * `value` - The objective value f(x)
    /// * `gradient` - The gradient grad f(x)
    /// * `direction` - The search direction d
    /// * `params` - Line search parameters
    ///
    /// # Default Implementation
    ///
    /// Computes the directional derivative ⟨grad f(x), d⟩ and delegates to
    /// `search_with_deriv`.
    fn search<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        point: &DVector<T>,
        value: T,
        gradient: &DVector<T>,
        direction: &DVector<T>,
        params: &LineSearchParams<T>,
    ) -> OptimizerResult<LineSearchResult<T>> {
        let directional_deriv = gradient.dot(direction);
        self.search_with_deriv(cost_fn, point, value, directional_deriv, direction, params)
    }

    /// Searches with a precomputed directional derivative.
    fn search_with_deriv<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        point: &DVector<T>,
        value: T,
        directional_deriv: T,
        direction: &DVector<T>,
        params: &LineSearchParams<T>,
    ) -> OptimizerResult<LineSearchResult<T>>;

    /// Returns the name of the line search method.
    fn name(&self) -> &str;
}

/// Backtracking line search enforcing the Armijo condition.
///
/// Starts from `initial_step_size` and multiplies the step by `rho` until
/// sufficient decrease holds or the step underflows `min_step_size`.
///
/// # Examples
///
/// ```
/// use euclidopt_core::cost_function::QuadraticCost;
/// use euclidopt_core::line_search::{BacktrackingLineSearch, LineSearch, LineSearchParams};
/// use euclidopt_core::types::DVector;
///
/// let cost = QuadraticCost::<f64>::simple(2);
/// let point = DVector::from_vec(vec![1.0, 0.0]);
/// let gradient = point.clone();
/// let direction = -gradient.clone();
///
/// let mut line_search = BacktrackingLineSearch::new();
/// let result = line_search.search(
///     &cost,
///     &point,
///     0.5,
///     &gradient,
///     &direction,
///     &LineSearchParams::default(),
/// )?;
/// assert!(result.success);
/// # Ok::<(), euclidopt_core::error::OptimizerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackingLineSearch;

impl BacktrackingLineSearch {
    /// Creates a new backtracking line search.
    pub fn new() -> Self {
        Self
    }
}

impl<T> LineSearch<T> for BacktrackingLineSearch
where
    T: Scalar,
{
    fn search_with_deriv<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        point: &DVector<T>,
        value: T,
        directional_deriv: T,
        direction: &DVector<T>,
        params: &LineSearchParams<T>,
    ) -> OptimizerResult<LineSearchResult<T>> {
        if directional_deriv >= T::zero() {
            return Err(OptimizerError::InvalidSearchDirection);
        }

        let mut step_size = if params.initial_step_size > params.max_step_size {
            params.max_step_size
        } else {
            params.initial_step_size
        };
        let mut function_evals = 0;

        for _ in 0..params.max_iterations {
            let new_point = point + direction * step_size;
            let new_value = cost_fn.cost(&new_point)?;
            function_evals += 1;

            if new_value <= value + params.c1 * step_size * directional_deriv {
                return Ok(LineSearchResult {
                    step_size,
                    new_point,
                    new_value,
                    function_evals,
                    success: true,
                });
            }

            step_size *= params.rho;
            if step_size < params.min_step_size {
                break;
            }
        }

        Err(OptimizerError::line_search_failed(
            "sufficient decrease condition not satisfied",
            function_evals,
            step_size.to_f64(),
            value.to_f64(),
        ))
    }

    fn name(&self) -> &str {
        "Backtracking"
    }
}

/// Line search that always takes a fixed, predetermined step.
///
/// Takes the step unconditionally; the result reports the objective value
/// at the new point but no acceptance condition is checked.
#[derive(Debug, Clone)]
pub struct FixedStepSize<T>
where
    T: Scalar,
{
    step_size: T,
}

impl<T> FixedStepSize<T>
where
    T: Scalar,
{
    /// Creates a fixed step size search with the given step.
    pub fn new(step_size: T) -> Self {
        Self { step_size }
    }
}

impl<T> LineSearch<T> for FixedStepSize<T>
where
    T: Scalar,
{
    fn search_with_deriv<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        point: &DVector<T>,
        _value: T,
        _directional_deriv: T,
        direction: &DVector<T>,
        _params: &LineSearchParams<T>,
    ) -> OptimizerResult<LineSearchResult<T>> {
        let new_point = point + direction * self.step_size;
        let new_value = cost_fn.cost(&new_point)?;

        Ok(LineSearchResult {
            step_size: self.step_size,
            new_point,
            new_value,
            function_evals: 1,
            success: true,
        })
    }

    fn name(&self) -> &str {
        "FixedStepSize"
    }
}
