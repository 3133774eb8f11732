use rand::Rng;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Scalar type the network is computed over.
///
/// Besides the arithmetic operators, a field knows its identities, how to coerce
/// a non-negative integer count (batch sizes, pixel bytes), how to draw a uniform
/// sample from `[0, 1)`, and its natural exponential.
///
/// # Examples
/// ```
/// # use sgdnnet::algebra::Field;
/// assert_eq!(f64::one().div_count(4), 0.25);
/// assert_eq!(f64::zero().exponent(), 1.0);
/// ```
pub trait Field:
    Copy
    + PartialEq
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Coerces an integer count into the field.
    fn from_count(count: usize) -> Self;

    /// Natural exponential.
    fn exponent(self) -> Self;

    /// Uniform sample from `[0, 1)` drawn from the given generator.
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Uniform sample from `[0, 1)` drawn from the thread-local generator.
    fn random() -> Self {
        Self::sample(&mut rand::thread_rng())
    }

    /// Divides by a positive integer count.
    fn div_count(self, count: usize) -> Self {
        self / Self::from_count(count)
    }
}

impl Field for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_count(count: usize) -> Self {
        count as f64
    }

    fn exponent(self) -> Self {
        self.exp()
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<f64>()
    }
}

impl Field for f32 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_count(count: usize) -> Self {
        count as f32
    }

    fn exponent(self) -> Self {
        self.exp()
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<f32>()
    }
}
