//! Cost function interface for optimization algorithms.
//!
//! This module provides traits and utilities for defining cost functions
//! over dense Euclidean points. It supports various evaluation modes
//! including value-only, value with gradient, and second-order information
//! via the Hessian.
//!
//! # Design Philosophy
//!
//! The cost function interface is designed to be flexible and efficient:
//! - Support for different evaluation modes to avoid redundant computations
//! - Automatic finite difference approximations when derivatives aren't available
//! - Evaluation counting and derivative checking utilities for testing

use crate::{
    error::{CoreError, Result},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;

/// Trait for cost functions over Euclidean space.
///
/// This is the main trait that optimization algorithms use to evaluate
/// the objective function and its derivatives.
pub trait CostFunction<T>: Debug
where
    T: Scalar,
{
    /// Evaluates the cost function at a point.
    ///
    /// # Arguments
    ///
    /// * `point` - The evaluation point
    ///
    /// # Returns
    ///
    /// The cost function value at the point.
    fn cost(&self, point: &DVector<T>) -> Result<T>;

    /// Evaluates the cost and gradient at a point.
    ///
    /// # Arguments
    ///
    /// * `point` - The evaluation point
    ///
    /// # Returns
    ///
    /// A tuple of (cost, gradient).
    ///
    /// # Default Implementation
    ///
    /// Uses finite differences to approximate the gradient if not overridden.
    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        // Default: use finite differences
        let cost = self.cost(point)?;
        let gradient = self.gradient_fd(point)?;
        Ok((cost, gradient))
    }

    /// Computes only the gradient at a point.
    ///
    /// # Arguments
    ///
    /// * `point` - The evaluation point
    ///
    /// # Returns
    ///
    /// The gradient at the point.
    ///
    /// # Default Implementation
    ///
    /// Calls `cost_and_gradient` and discards the cost value.
    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.cost_and_gradient(point).map(|(_, grad)| grad)
    }

    /// Evaluates the Hessian matrix at a point.
    ///
    /// The Hessian is the matrix of second partial derivatives.
    ///
    /// # Arguments
    ///
    /// * `point` - The evaluation point
    ///
    /// # Returns
    ///
    /// The Hessian matrix at the point.
    ///
    /// # Default Implementation
    ///
    /// Returns `NotImplemented` error. Override for second-order methods.
    fn hessian(&self, _point: &DVector<T>) -> Result<DMatrix<T>> {
        Err(CoreError::not_implemented(
            "Hessian computation not implemented for this cost function",
        ))
    }

    /// Computes a Hessian-vector product.
    ///
    /// This computes H*v where H is the Hessian at the point and v is a
    /// direction vector. This can often be computed more efficiently than
    /// forming the full Hessian matrix.
    ///
    /// # Arguments
    ///
    /// * `point` - The evaluation point
    /// * `vector` - A direction vector
    ///
    /// # Returns
    ///
    /// The product H*v.
    ///
    /// # Default Implementation
    ///
    /// Uses finite differences on the gradient.
    fn hessian_vector_product(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> Result<DVector<T>> {
        // Use finite differences on the gradient
        let eps = <T as Float>::sqrt(T::epsilon());
        let norm = vector.norm();

        if norm < T::epsilon() {
            return Ok(DVector::zeros(point.len()));
        }

        let t = eps / norm;
        let perturbed = point + vector * t;

        let grad1 = self.gradient(point)?;
        let grad2 = self.gradient(&perturbed)?;

        Ok((grad2 - grad1) / t)
    }

    /// Computes the gradient using finite differences.
    ///
    /// This is a utility method for the default implementation of
    /// `cost_and_gradient`. It uses central differences for better accuracy.
    ///
    /// # Arguments
    ///
    /// * `point` - The evaluation point
    ///
    /// # Returns
    ///
    /// An approximation of the gradient.
    fn gradient_fd(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let n = point.len();
        let mut gradient = DVector::zeros(n);
        let h = <T as Float>::sqrt(T::epsilon());

        for i in 0..n {
            let mut e_i = DVector::zeros(n);
            e_i[i] = T::one();

            // Central difference
            let point_plus = point + &e_i * h;
            let point_minus = point - &e_i * h;

            let f_plus = self.cost(&point_plus)?;
            let f_minus = self.cost(&point_minus)?;

            gradient[i] = (f_plus - f_minus) / (h + h);
        }

        Ok(gradient)
    }
}

/// A simple quadratic cost function for testing.
///
/// Computes f(x) = 0.5 * x^T * A * x + b^T * x + c
#[derive(Debug, Clone)]
pub struct QuadraticCost<T>
where
    T: Scalar,
{
    /// The quadratic form matrix (should be symmetric)
    pub a: DMatrix<T>,
    /// The linear term
    pub b: DVector<T>,
    /// The constant term
    pub c: T,
}

impl<T> QuadraticCost<T>
where
    T: Scalar,
{
    /// Creates a new quadratic cost function.
    pub fn new(a: DMatrix<T>, b: DVector<T>, c: T) -> Self {
        Self { a, b, c }
    }

    /// Creates a simple quadratic with identity matrix: f(x) = 0.5 * ||x||^2
    pub fn simple(dim: usize) -> Self {
        Self {
            a: DMatrix::identity(dim, dim),
            b: DVector::zeros(dim),
            c: T::zero(),
        }
    }
}

impl<T> CostFunction<T> for QuadraticCost<T>
where
    T: Scalar,
{
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        let ax = &self.a * point;
        let quad_term = point.dot(&ax) * <T as Scalar>::from_f64(0.5);
        let linear_term = self.b.dot(point);
        Ok(quad_term + linear_term + self.c)
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let ax = &self.a * point;
        let cost = point.dot(&ax) * <T as Scalar>::from_f64(0.5) + self.b.dot(point) + self.c;
        let gradient = ax + &self.b;
        Ok((cost, gradient))
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        Ok(&self.a * point + &self.b)
    }

    fn hessian(&self, _point: &DVector<T>) -> Result<DMatrix<T>> {
        Ok(self.a.clone())
    }

    fn hessian_vector_product(
        &self,
        _point: &DVector<T>,
        vector: &DVector<T>,
    ) -> Result<DVector<T>> {
        Ok(&self.a * vector)
    }
}

/// Wrapper to count function evaluations for testing and debugging.
#[derive(Debug)]
pub struct CountingCostFunction<F, T>
where
    F: CostFunction<T>,
    T: Scalar,
{
    /// The underlying cost function
    pub inner: F,
    /// Number of cost evaluations
    pub cost_count: std::cell::RefCell<usize>,
    /// Number of gradient evaluations
    pub gradient_count: std::cell::RefCell<usize>,
    /// Number of Hessian evaluations
    pub hessian_count: std::cell::RefCell<usize>,
    _phantom: std::marker::PhantomData<T>,
}

impl<F, T> CountingCostFunction<F, T>
where
    F: CostFunction<T>,
    T: Scalar,
{
    /// Creates a new counting wrapper around a cost function.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cost_count: std::cell::RefCell::new(0),
            gradient_count: std::cell::RefCell::new(0),
            hessian_count: std::cell::RefCell::new(0),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Resets all counters to zero.
    pub fn reset_counts(&self) {
        *self.cost_count.borrow_mut() = 0;
        *self.gradient_count.borrow_mut() = 0;
        *self.hessian_count.borrow_mut() = 0;
    }

    /// Returns the current evaluation counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            *self.cost_count.borrow(),
            *self.gradient_count.borrow(),
            *self.hessian_count.borrow(),
        )
    }
}

impl<F, T> CostFunction<T> for CountingCostFunction<F, T>
where
    F: CostFunction<T>,
    T: Scalar,
{
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        *self.cost_count.borrow_mut() += 1;
        self.inner.cost(point)
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        *self.cost_count.borrow_mut() += 1;
        *self.gradient_count.borrow_mut() += 1;
        self.inner.cost_and_gradient(point)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        *self.gradient_count.borrow_mut() += 1;
        self.inner.gradient(point)
    }

    fn hessian(&self, point: &DVector<T>) -> Result<DMatrix<T>> {
        *self.hessian_count.borrow_mut() += 1;
        self.inner.hessian(point)
    }

    fn hessian_vector_product(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> Result<DVector<T>> {
        // Note: we don't count this separately as it may use gradient evaluations
        self.inner.hessian_vector_product(point, vector)
    }
}

/// Utilities for checking gradient and Hessian implementations.
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Checks if the gradient implementation matches finite differences.
    ///
    /// # Arguments
    ///
    /// * `cost_fn` - The cost function to check
    /// * `point` - Point at which to check the gradient
    /// * `tol` - Tolerance for the check
    ///
    /// # Returns
    ///
    /// A tuple of (passes, max_error) where passes indicates if the
    /// gradient is correct within tolerance, and max_error is the
    /// maximum component-wise error.
    pub fn check_gradient<T>(
        cost_fn: &impl CostFunction<T>,
        point: &DVector<T>,
        tol: T,
    ) -> Result<(bool, T)>
    where
        T: Scalar,
    {
        let analytical_grad = cost_fn.gradient(point)?;
        let fd_grad = cost_fn.gradient_fd(point)?;

        let diff = &analytical_grad - &fd_grad;
        let max_error = diff
            .iter()
            .map(|x| <T as Float>::abs(*x))
            .fold(T::zero(), |a, b| <T as Float>::max(a, b));

        Ok((max_error < tol, max_error))
    }

    /// Checks if the Hessian implementation matches finite differences.
    ///
    /// # Arguments
    ///
    /// * `cost_fn` - The cost function to check
    /// * `point` - Point at which to check the Hessian
    /// * `tol` - Tolerance for the check
    ///
    /// # Returns
    ///
    /// A tuple of (passes, max_error).
    pub fn check_hessian<T>(
        cost_fn: &impl CostFunction<T>,
        point: &DVector<T>,
        tol: T,
    ) -> Result<(bool, T)>
    where
        T: Scalar,
    {
        let hessian = cost_fn.hessian(point)?;
        let n = point.len();
        let h = <T as Float>::sqrt(T::epsilon());

        let mut max_error = T::zero();

        // Check Hessian using finite differences on the gradient
        for i in 0..n {
            let mut e_i = DVector::zeros(n);
            e_i[i] = T::one();

            let point_plus = point + &e_i * h;
            let point_minus = point - &e_i * h;

            let grad_plus = cost_fn.gradient(&point_plus)?;
            let grad_minus = cost_fn.gradient(&point_minus)?;

            let hessian_col_fd = (grad_plus - grad_minus) / (h + h);

            for j in 0..n {
                let error = <T as Float>::abs(hessian[(j, i)] - hessian_col_fd[j]);
                max_error = <T as Float>::max(max_error, error);
            }
        }

        Ok((max_error < tol, max_error))
    }

    /// Checks if the Hessian is symmetric.
    ///
    /// # Arguments
    ///
    /// * `cost_fn` - The cost function to check
    /// * `point` - Point at which to check the Hessian
    /// * `tol` - Tolerance for symmetry check
    ///
    /// # Returns
    ///
    /// A tuple of (is_symmetric, max_asymmetry).
    pub fn check_hessian_symmetry<T>(
        cost_fn: &impl CostFunction<T>,
        point: &DVector<T>,
        tol: T,
    ) -> Result<(bool, T)>
    where
        T: Scalar,
    {
        let hessian = cost_fn.hessian(point)?;
        let n = hessian.nrows();

        let mut max_asymmetry = T::zero();

        for i in 0..n {
            for j in i + 1..n {
                let asymmetry = <T as Float>::abs(hessian[(i, j)] - hessian[(j, i)]);
                max_asymmetry = <T as Float>::max(max_asymmetry, asymmetry);
            }
        }

        Ok((max_asymmetry < tol, max_asymmetry))
    }
}
