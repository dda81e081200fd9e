//! Core abstractions for classical Euclidean optimization.
//!
//! This crate provides the foundational traits and types for optimization
//! over dense Euclidean points, including:
//!
//! - Scalar abstraction over `f32`/`f64` with library-wide tolerances
//! - Error types for numerical and configuration failures
//! - Cost function traits with finite-difference fallbacks
//! - Optimizer framework: results, stopping criteria, convergence checking
//! - Line search algorithms for step size selection
//! - Callbacks for observing and controlling optimization runs
//!
//! # Key Concepts
//!
//! ## Cost Functions
//!
//! A [`CostFunction`](cost_function::CostFunction) evaluates an objective
//! and, when available, its gradient and Hessian at a point. Derivatives
//! default to finite-difference approximations so that value-only
//! objectives work with every solver that does not require an exact
//! Hessian.
//!
//! ## Optimizer Framework
//!
//! Iterative solvers share one vocabulary: an
//! [`OptimizerState`](optimizer::OptimizerState) carries the iterate, a
//! [`StoppingCriterion`](optimizer::StoppingCriterion) declares the limits,
//! the [`ConvergenceChecker`](optimizer::ConvergenceChecker) turns state
//! plus limits into a [`TerminationReason`](optimizer::TerminationReason),
//! and an [`OptimizationResult`](optimizer::OptimizationResult) reports the
//! outcome, including whether the run converged.

pub mod callback;
pub mod cost_function;
pub mod error;
pub mod line_search;
pub mod optimizer;
pub mod types;

// Re-export commonly used error types at the crate root
pub use error::{CoreError, OptimizerError, OptimizerResult, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::callback::{CallbackInfo, NoOpCallback, OptimizationCallback};
    pub use crate::cost_function::{
        CostFunction, CountingCostFunction, DerivativeChecker, QuadraticCost,
    };
    pub use crate::error::{CoreError, OptimizerError, OptimizerResult, Result};
    pub use crate::line_search::{
        BacktrackingLineSearch, FixedStepSize, LineSearch, LineSearchParams, LineSearchResult,
    };
    pub use crate::optimizer::{
        ConvergenceChecker, OptimizationResult, Optimizer, OptimizerState, StoppingCriterion,
        TerminationReason,
    };
    pub use crate::types::{constants, DMatrix, DVector, SMatrix, SVector, Scalar};
}
