//! EuclidOpt Optimization - Classical optimization and root-finding algorithms.
//!
//! This crate provides concrete solvers for unconstrained problems on
//! Euclidean space: second-order and quasi-Newton descent methods, a
//! derivative-free pattern search, a linear system solver, and scalar
//! bracketing methods for root finding and univariate minimization.
//!
//! # Available Solvers
//!
//! - **Trust Region**: adaptive-radius second-order minimization with a
//!   Cauchy point subproblem solver
//! - **BFGS**: quasi-Newton minimization with a dense inverse Hessian
//!   approximation
//! - **Hooke-Jeeves**: derivative-free pattern search
//! - **Conjugate Gradient**: iterative solver for symmetric positive
//!   definite linear systems
//! - **Bisection**: scalar root bracketing
//! - **Interval Halving**: derivative-free univariate minimization
//!
//! # Examples
//!
//! ```rust
//! use euclidopt_core::cost_function::QuadraticCost;
//! use euclidopt_core::optimizer::{Optimizer, StoppingCriterion};
//! use euclidopt_core::types::DVector;
//! use euclidopt_optim::{TrustRegion, TrustRegionConfig};
//!
//! // Minimize f(x) = 0.5 ||x||^2 from (4, 3)
//! let cost = QuadraticCost::<f64>::simple(2);
//! let mut optimizer = TrustRegion::new(TrustRegionConfig::new());
//!
//! let stopping_criterion = StoppingCriterion::new()
//!     .with_max_iterations(1000)
//!     .with_gradient_tolerance(1e-6);
//!
//! let result = optimizer
//!     .optimize(&cost, &DVector::from_vec(vec![4.0, 3.0]), &stopping_criterion)
//!     .unwrap();
//! assert!(result.converged);
//! ```

pub mod trust_region;
pub mod bfgs;
pub mod hooke_jeeves;
pub mod conjugate_gradient;
pub mod bisection;
pub mod interval_halving;

// Re-export main solvers for convenience
pub use trust_region::{TrustRegion, TrustRegionConfig};
pub use bfgs::{BFGS, BFGSConfig};
pub use hooke_jeeves::{HookeJeeves, HookeJeevesConfig};
pub use conjugate_gradient::{ConjugateGradient, ConjugateGradientConfig, ConjugateGradientResult};
pub use bisection::{Bisection, BisectionConfig, BisectionResult};
pub use interval_halving::{IntervalHalving, IntervalHalvingConfig, IntervalHalvingResult};

// Re-export commonly used items from core
pub use euclidopt_core::{
    line_search::{BacktrackingLineSearch, LineSearchParams},
    optimizer::{OptimizationResult, Optimizer, StoppingCriterion, TerminationReason},
};
