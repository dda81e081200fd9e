//! EuclidOpt - Classical optimization in Rust.
//!
//! This crate bundles the optimization framework and the solver collection
//! behind a single dependency:
//!
//! - Trust-region minimization with an adaptive radius
//! - BFGS quasi-Newton minimization with backtracking line search
//! - Hooke-Jeeves derivative-free pattern search
//! - Conjugate gradient solution of symmetric positive definite systems
//! - Bisection root finding and interval halving minimization for scalar
//!   problems
//!
//! # Quick Start
//!
//! ```rust
//! use euclidopt::prelude::*;
//!
//! // Minimize f(x) = 0.5 ||x||^2 starting from (3, 4)
//! let cost = QuadraticCost::<f64>::simple(2);
//! let mut optimizer = BFGS::new(BFGSConfig::new());
//!
//! let stopping_criterion = StoppingCriterion::new()
//!     .with_max_iterations(100)
//!     .with_gradient_tolerance(1e-8);
//!
//! let result = optimizer
//!     .optimize(&cost, &DVector::from_vec(vec![3.0, 4.0]), &stopping_criterion)
//!     .unwrap();
//! assert!(result.converged);
//! ```
//!
//! # Crate Organization
//!
//! - [`core`]: cost functions, stopping criteria, line searches, callbacks
//! - [`optim`]: the solver implementations

pub use euclidopt_core as core;
pub use euclidopt_optim as optim;

// Re-export the linear algebra backend
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use euclidopt_core::prelude::*;
    pub use euclidopt_optim::{
        Bisection, BisectionConfig, BisectionResult, ConjugateGradient, ConjugateGradientConfig,
        ConjugateGradientResult, HookeJeeves, HookeJeevesConfig, IntervalHalving,
        IntervalHalvingConfig, IntervalHalvingResult, TrustRegion, TrustRegionConfig, BFGS,
        BFGSConfig,
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prelude_solves_quadratic() {
        let cost = QuadraticCost::<f64>::simple(3);
        let mut optimizer = TrustRegion::new(TrustRegionConfig::new());
        let stopping_criterion = StoppingCriterion::new()
            .with_max_iterations(100)
            .with_gradient_tolerance(1e-8);

        let result = optimizer
            .optimize(
                &cost,
                &DVector::from_vec(vec![1.0, 2.0, 2.0]),
                &stopping_criterion,
            )
            .unwrap();

        assert!(result.converged);
        assert_eq!(result.termination_reason, TerminationReason::Converged);
    }

    #[test]
    fn test_prelude_finds_root() {
        let solver = Bisection::new(BisectionConfig::new());
        let result = solver.find_root(|x: f64| x * x - 2.0, 1.0, 2.0).unwrap();

        assert!(result.converged);
        assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-6);
    }
}
