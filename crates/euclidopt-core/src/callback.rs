//! Callback support for optimization algorithms.
//!
//! This module provides traits and types for implementing callbacks that can
//! monitor and control the optimization process.

use crate::error::Result;
use crate::optimizer::OptimizerState;
use crate::types::Scalar;
use std::time::Duration;

/// Information passed to callbacks during optimization.
#[derive(Clone, Debug)]
pub struct CallbackInfo<T: Scalar> {
    /// Current optimization state
    pub state: OptimizerState<T>,

    /// Elapsed time since optimization start
    pub elapsed: Duration,

    /// Whether convergence has been achieved
    pub converged: bool,
}

/// Trait for optimization callbacks.
///
/// Callbacks allow monitoring and controlling the optimization process.
/// They can be used for recording iterates, progress reporting, early
/// stopping, etc.
pub trait OptimizationCallback<T: Scalar>: Send {
    /// Called at the start of optimization.
    fn on_optimization_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called at the end of each iteration.
    ///
    /// Returns `true` to continue optimization, `false` to stop early.
    fn on_iteration_end(&mut self, info: &CallbackInfo<T>) -> Result<bool> {
        let _ = info; // Unused by default
        Ok(true)
    }

    /// Called at the end of optimization.
    fn on_optimization_end(&mut self, info: &CallbackInfo<T>) -> Result<()> {
        let _ = info; // Unused by default
        Ok(())
    }
}

/// A no-op callback that does nothing.
pub struct NoOpCallback;

impl<T: Scalar> OptimizationCallback<T> for NoOpCallback {
    // Use default implementations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DVector;

    struct RecordingCallback {
        values: Vec<f64>,
    }

    impl OptimizationCallback<f64> for RecordingCallback {
        fn on_iteration_end(&mut self, info: &CallbackInfo<f64>) -> Result<bool> {
            self.values.push(info.state.value);
            // Stop after three recorded iterations
            Ok(self.values.len() < 3)
        }
    }

    #[test]
    fn test_noop_callback() {
        let mut callback = NoOpCallback;
        let state = OptimizerState::new(DVector::from_vec(vec![1.0]), 2.0);
        let info = CallbackInfo {
            state,
            elapsed: Duration::ZERO,
            converged: false,
        };

        assert!(
            <NoOpCallback as OptimizationCallback<f64>>::on_optimization_start(&mut callback)
                .is_ok()
        );
        assert!(callback.on_iteration_end(&info).unwrap());
        assert!(callback.on_optimization_end(&info).is_ok());
    }

    #[test]
    fn test_callback_early_stop_signal() {
        let mut callback = RecordingCallback { values: Vec::new() };
        let state = OptimizerState::new(DVector::from_vec(vec![1.0]), 2.0);
        let info = CallbackInfo {
            state,
            elapsed: Duration::ZERO,
            converged: false,
        };

        assert!(callback.on_iteration_end(&info).unwrap());
        assert!(callback.on_iteration_end(&info).unwrap());
        // Third call asks for early termination
        assert!(!callback.on_iteration_end(&info).unwrap());
        assert_eq!(callback.values, vec![2.0, 2.0, 2.0]);
    }
}
