//! Conjugate gradient solver for symmetric positive definite linear systems.
//!
//! Solves `A x = b` iteratively using only matrix-vector products with `A`.
//! Residuals are mutually orthogonal and search directions are A-conjugate,
//! which in exact arithmetic terminates in at most `n` iterations for an
//! `n`-dimensional system. In floating point the solver runs until the
//! residual norm drops below the tolerance.
//!
//! # References
//!
//! - Hestenes & Stiefel, "Methods of Conjugate Gradients for Solving
//!   Linear Systems" (1952)
//! - Nocedal & Wright, "Numerical Optimization" (2006), chapter 5

use euclidopt_core::{
    error::{CoreError, Result},
    types::{DMatrix, DVector, Scalar},
};

use num_traits::Float;

/// Configuration for the conjugate gradient solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConjugateGradientConfig<T: Scalar> {
    /// Residual norm below which the system is considered solved
    pub tolerance: T,
    /// Maximum number of iterations
    pub max_iterations: usize,
}

impl<T: Scalar> Default for ConjugateGradientConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::DEFAULT_TOLERANCE,
            max_iterations: 1000,
        }
    }
}

impl<T: Scalar> ConjugateGradientConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the residual tolerance.
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

/// Result of a conjugate gradient solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConjugateGradientResult<T: Scalar> {
    /// Approximate solution of the linear system
    pub solution: DVector<T>,
    /// Norm of the final residual `b - A x`
    pub residual_norm: T,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the residual norm reached the tolerance
    pub converged: bool,
}

/// Conjugate gradient solver.
///
/// # Examples
///
/// ```
/// use euclidopt_core::types::{DMatrix, DVector};
/// use euclidopt_optim::{ConjugateGradient, ConjugateGradientConfig};
///
/// let a = DMatrix::<f64>::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 2.0]);
/// let b = DVector::from_vec(vec![1.0, 0.0]);
/// let x0 = DVector::zeros(2);
///
/// let solver = ConjugateGradient::new(ConjugateGradientConfig::default());
/// let result = solver.solve(&a, &b, &x0).unwrap();
/// assert!((result.solution[0] - 2.0 / 3.0).abs() < 1e-6);
/// assert!((result.solution[1] - 1.0 / 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ConjugateGradient<T: Scalar> {
    config: ConjugateGradientConfig<T>,
}

impl<T: Scalar> ConjugateGradient<T> {
    /// Creates a new conjugate gradient solver with the given configuration.
    pub fn new(config: ConjugateGradientConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConjugateGradientConfig<T> {
        &self.config
    }

    /// Solves `A x = b` starting from `x0`.
    ///
    /// `A` must be symmetric positive definite. Positive definiteness is
    /// not checked up front; a direction of non-positive curvature
    /// encountered during the iteration reports the violation instead.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DimensionMismatch`] if the operands disagree
    /// in size and [`CoreError::NumericalError`] if `A` turns out not to
    /// be positive definite.
    pub fn solve(
        &self,
        a: &DMatrix<T>,
        b: &DVector<T>,
        x0: &DVector<T>,
    ) -> Result<ConjugateGradientResult<T>> {
        self.config.validate()?;

        if a.nrows() != a.ncols() {
            return Err(CoreError::dimension_mismatch(
                "square system matrix",
                format!("{}x{}", a.nrows(), a.ncols()),
            ));
        }
        let n = a.nrows();
        if b.len() != n {
            return Err(CoreError::dimension_mismatch(
                format!("right-hand side of length {}", n),
                format!("{}", b.len()),
            ));
        }
        if x0.len() != n {
            return Err(CoreError::dimension_mismatch(
                format!("initial guess of length {}", n),
                format!("{}", x0.len()),
            ));
        }

        let mut x = x0.clone();
        let mut r = b - a * &x;
        let mut p = r.clone();
        let mut r_norm_sq = r.norm_squared();

        if <T as Float>::sqrt(r_norm_sq) < self.config.tolerance {
            return Ok(ConjugateGradientResult {
                solution: x,
                residual_norm: <T as Float>::sqrt(r_norm_sq),
                iterations: 0,
                converged: true,
            });
        }

        let mut iterations = 0;
        let mut converged = false;

        for _ in 0..self.config.max_iterations {
            let ap = a * &p;
            let curvature = p.dot(&ap);
            if curvature <= T::zero() {
                return Err(CoreError::numerical_error(
                    "system matrix is not positive definite",
                ));
            }

            let alpha = r_norm_sq / curvature;
            x += &p * alpha;
            r -= &ap * alpha;
            iterations += 1;

            let r_norm_sq_new = r.norm_squared();
            if <T as Float>::sqrt(r_norm_sq_new) < self.config.tolerance {
                r_norm_sq = r_norm_sq_new;
                converged = true;
                break;
            }

            let beta = r_norm_sq_new / r_norm_sq;
            p = &r + &p * beta;
            r_norm_sq = r_norm_sq_new;
        }

        Ok(ConjugateGradientResult {
            solution: x,
            residual_norm: <T as Float>::sqrt(r_norm_sq),
            iterations,
            converged,
        })
    }
}
