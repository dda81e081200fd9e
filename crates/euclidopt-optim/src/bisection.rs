//! Bisection method for scalar root finding.
//!
//! Given a continuous function with opposite signs at the two ends of an
//! interval, bisection repeatedly halves the interval while keeping the
//! sign change inside it. The bracket width shrinks by a factor of two per
//! iteration, so the error bound is known in advance from the tolerance.

use euclidopt_core::{
    error::{CoreError, Result},
    types::Scalar,
};

use num_traits::Float;

/// Configuration for the bisection root finder.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BisectionConfig<T: Scalar> {
    /// Interval width below which the bracket is considered resolved
    pub tolerance: T,
    /// Maximum number of halvings
    pub max_iterations: usize,
}

impl<T: Scalar> Default for BisectionConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::DEFAULT_TOLERANCE,
            max_iterations: 100,
        }
    }
}

impl<T: Scalar> BisectionConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interval width tolerance.
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

/// Result of a bisection run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BisectionResult<T> {
    /// Midpoint of the final bracket
    pub root: T,
    /// Function value at the root estimate
    pub value: T,
    /// Number of halvings performed
    pub iterations: usize,
    /// Whether the bracket width reached the tolerance
    pub converged: bool,
}

/// Bisection root finder.
///
/// # Examples
///
/// ```
/// use euclidopt_optim::{Bisection, BisectionConfig};
///
/// let solver = Bisection::new(BisectionConfig::default());
/// let result = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
/// assert!((result.root - 2.0_f64.sqrt()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Bisection<T: Scalar> {
    config: BisectionConfig<T>,
}

impl<T: Scalar> Bisection<T> {
    /// Creates a new bisection solver with the given configuration.
    pub fn new(config: BisectionConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BisectionConfig<T> {
        &self.config
    }

    /// Finds a root of `f` in the interval `[a, b]`.
    ///
    /// Requires `a < b` and a sign change over the interval, i.e.
    /// `f(a) * f(b) < 0`. The bracket keeps the sign change at every
    /// iteration, so the returned root is within half the final bracket
    /// width of a true root.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInterval`] if the interval is empty or
    /// the function does not change sign over it.
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<BisectionResult<T>>
    where
        F: Fn(T) -> T,
    {
        self.config.validate()?;

        if a >= b {
            return Err(CoreError::invalid_interval(
                "interval is empty: require a < b",
            ));
        }

        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let fb = f(b);

        if fa * fb >= T::zero() {
            return Err(CoreError::invalid_interval(
                "function must change sign over the interval",
            ));
        }

        let half = <T as Scalar>::from_f64(0.5);
        let mut iterations = 0;

        while <T as Float>::abs(b - a) > self.config.tolerance
            && iterations < self.config.max_iterations
        {
            let mid = (a + b) * half;
            let f_mid = f(mid);

            if f_mid == T::zero() {
                return Ok(BisectionResult {
                    root: mid,
                    value: f_mid,
                    iterations: iterations + 1,
                    converged: true,
                });
            }

            if fa * f_mid < T::zero() {
                b = mid;
            } else {
                a = mid;
                fa = f_mid;
            }
            iterations += 1;
        }

        let root = (a + b) * half;
        Ok(BisectionResult {
            root,
            value: f(root),
            iterations,
            converged: <T as Float>::abs(b - a) <= self.config.tolerance,
        })
    }
}
