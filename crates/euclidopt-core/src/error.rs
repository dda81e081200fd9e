//! Error types for numerical optimization.
//!
//! This module defines the core error types used throughout the library
//! for cost-function evaluation and numerical computations.

use thiserror::Error;

/// Errors that can occur during core numerical operations.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// A parameter is outside its valid range.
    ///
    /// This error occurs when a caller-supplied value (tolerance, factor,
    /// starting point) fails validation.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid
        reason: String,
    },

    /// A search interval does not satisfy the method's precondition.
    ///
    /// This error occurs for interval methods when the bracket is empty or
    /// when the function does not change sign over it.
    #[error("Invalid interval: {reason}")]
    InvalidInterval {
        /// Description of why the interval is invalid
        reason: String,
    },

    /// Dimension mismatch between vectors or matrices.
    ///
    /// This error occurs when operations involve operands with incompatible
    /// dimensions.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Numerical instability detected.
    ///
    /// This error occurs when numerical operations become unstable,
    /// such as division by near-zero values or loss of precision.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Method or feature not implemented.
    ///
    /// This error is used for optional methods that are not implemented
    /// for a particular cost function.
    #[error("Feature not implemented: {feature}")]
    NotImplemented {
        /// Name of the unimplemented feature
        feature: String,
    },
}

impl CoreError {
    /// Create an InvalidParameter error with a custom reason.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create an InvalidInterval error with a custom reason.
    pub fn invalid_interval<S: Into<String>>(reason: S) -> Self {
        Self::InvalidInterval {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create a NotImplemented error for a specific feature.
    pub fn not_implemented<S: Into<String>>(feature: S) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }
}

/// Errors that can occur during optimization.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Line search failed to find an acceptable step.
    ///
    /// This error occurs when the line search algorithm cannot find
    /// a step size that satisfies the sufficient decrease conditions.
    #[error("Line search failed: {reason}")]
    LineSearchFailed {
        /// Description of why the line search failed
        reason: String,
        /// Number of iterations attempted
        iterations: usize,
        /// Last step size tried
        last_step_size: f64,
        /// Function value at the starting point
        initial_value: f64,
    },

    /// Invalid optimizer configuration.
    ///
    /// This error occurs when the optimizer is configured with invalid
    /// parameters (e.g., negative radius, zero shrink factor).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Propagated core error.
    ///
    /// This error wraps numerical errors that occur during optimization
    /// operations, typically raised by the cost function.
    #[error("Numerical operation failed: {0}")]
    CoreError(#[from] CoreError),

    /// Invalid search direction.
    ///
    /// This error occurs when the search direction is not a descent direction.
    #[error("Invalid search direction: not a descent direction")]
    InvalidSearchDirection,
}

impl OptimizerError {
    /// Create a LineSearchFailed error with detailed context.
    pub fn line_search_failed<S: Into<String>>(
        reason: S,
        iterations: usize,
        last_step_size: f64,
        initial_value: f64,
    ) -> Self {
        Self::LineSearchFailed {
            reason: reason.into(),
            iterations,
            last_step_size,
            initial_value,
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for operations that can produce CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
