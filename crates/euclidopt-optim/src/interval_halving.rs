//! Interval halving method for univariate minimization.
//!
//! A derivative-free bracketing method for unimodal functions. Each
//! iteration compares the function at the midpoint and the two quarter
//! points of the bracket and discards the half (or both outer quarters)
//! that cannot contain the minimizer. The bracket width halves every
//! iteration regardless of which case fires.

use euclidopt_core::{
    error::{CoreError, Result},
    types::Scalar,
};

/// Configuration for the interval halving minimizer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalHalvingConfig<T: Scalar> {
    /// Bracket width below which the minimizer is considered resolved
    pub tolerance: T,
    /// Maximum number of halvings
    pub max_iterations: usize,
}

impl<T: Scalar> Default for IntervalHalvingConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::DEFAULT_TOLERANCE,
            max_iterations: 100,
        }
    }
}

impl<T: Scalar> IntervalHalvingConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bracket width tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.tolerance <= T::zero() {
            return Err(CoreError::invalid_parameter(
                "tolerance must be positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(CoreError::invalid_parameter(
                "max_iterations must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Result of an interval halving run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalHalvingResult<T> {
    /// Midpoint of the final bracket
    pub minimizer: T,
    /// Function value at the minimizer estimate
    pub value: T,
    /// Number of halvings performed
    pub iterations: usize,
    /// Whether the bracket width reached the tolerance
    pub converged: bool,
}

/// Interval halving minimizer for unimodal scalar functions.
///
/// # Examples
///
/// ```
/// use euclidopt_optim::{IntervalHalving, IntervalHalvingConfig};
///
/// let solver = IntervalHalving::new(IntervalHalvingConfig::default());
/// let result = solver
///     .minimize(|x: f64| (x - 2.0).powi(2) + 1.0, 0.0, 3.0)
///     .unwrap();
/// assert!((result.minimizer - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct IntervalHalving<T: Scalar> {
    config: IntervalHalvingConfig<T>,
}

impl<T: Scalar> IntervalHalving<T> {
    /// Creates a new interval halving solver with the given configuration.
    pub fn new(config: IntervalHalvingConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IntervalHalvingConfig<T> {
        &self.config
    }

    /// Minimizes `f` over the interval `[a, b]`.
    ///
    /// For a unimodal function the bracket contains the minimizer at every
    /// iteration, so the returned estimate is within half the final
    /// bracket width of it. Multimodal functions are narrowed down to one
    /// of their local minimizers.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInterval`] if `a >= b`.
    pub fn minimize<F>(&self, f: F, a: T, b: T) -> Result<IntervalHalvingResult<T>>
    where
        F: Fn(T) -> T,
    {
        self.config.validate()?;

        if a >= b {
            return Err(CoreError::invalid_interval(
                "interval is empty: require a < b",
            ));
        }

        let half = <T as Scalar>::from_f64(0.5);
        let mut a = a;
        let mut b = b;
        let mut iterations = 0;

        while b - a > self.config.tolerance && iterations < self.config.max_iterations {
            let mid = (a + b) * half;
            let x1 = (a + mid) * half;
            let x2 = (mid + b) * half;
            let f_mid = f(mid);

            if f(x1) < f_mid {
                b = mid;
            } else if f(x2) < f_mid {
                a = mid;
            } else {
                a = x1;
                b = x2;
            }
            iterations += 1;
        }

        let minimizer = (a + b) * half;
        Ok(IntervalHalvingResult {
            minimizer,
            value: f(minimizer),
            iterations,
            converged: b - a <= self.config.tolerance,
        })
    }
}
