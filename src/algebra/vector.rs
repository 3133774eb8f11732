use std::ops::Index;

use super::{Field, Matrix, SizeMismatch};

/// Fixed-length dense vector.
///
/// Every operation allocates a new result and leaves its operands untouched.
/// Binary operations require equal lengths and report `SizeMismatch` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    pub(super) values: Box<[T]>,
}

impl<T: Field> Vector<T> {
    /// Wraps the given values.
    ///
    /// # Examples
    /// ```
    /// # use sgdnnet::algebra::Vector;
    /// let v = Vector::new(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(v.len(), 3);
    /// ```
    pub fn new(values: Vec<T>) -> Self {
        Vector {
            values: values.into_boxed_slice(),
        }
    }

    /// Vector of `len` additive identities.
    pub fn zeros(len: usize) -> Self {
        Vector::new(vec![T::zero(); len])
    }

    /// Vector of `len` values drawn one by one from `generator`.
    pub fn random_with<G: FnMut() -> T>(len: usize, generator: &mut G) -> Self {
        Vector::new((0..len).map(|_| generator()).collect())
    }

    /// Same-length vector filled with the additive identity.
    pub fn zero_like(&self) -> Self {
        Vector::zeros(self.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values.into_vec()
    }

    /// Applies `f` to every element.
    pub fn map<F: FnMut(T) -> T>(&self, mut f: F) -> Self {
        Vector::new(self.values.iter().map(|&x| f(x)).collect())
    }

    /// Combines two vectors element by element.
    pub fn zip_with<F: FnMut(T, T) -> T>(
        &self,
        other: &Vector<T>,
        mut f: F,
    ) -> Result<Self, SizeMismatch> {
        SizeMismatch::check(self.len(), other.len())?;
        Ok(Vector::new(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }

    pub fn add(&self, other: &Vector<T>) -> Result<Self, SizeMismatch> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Vector<T>) -> Result<Self, SizeMismatch> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Multiplies every element by `s`.
    pub fn scale(&self, s: T) -> Self {
        self.map(|x| s * x)
    }

    /// Hadamard (element-wise) product.
    pub fn hadamard(&self, other: &Vector<T>) -> Result<Self, SizeMismatch> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Calculates scalar (dot) product of the two vectors.
    ///
    /// # Examples
    /// ```
    /// # use sgdnnet::algebra::Vector;
    /// let a = Vector::new(vec![1.0, 2.0, 3.0]);
    /// let b = Vector::new(vec![4.0, -5.0, 6.0]);
    /// assert_eq!(a.dot(&b).unwrap(), 12.0);
    /// ```
    pub fn dot(&self, other: &Vector<T>) -> Result<T, SizeMismatch> {
        SizeMismatch::check(self.len(), other.len())?;
        Ok(self
            .values
            .iter()
            .zip(other.values.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Outer product `self ⊗ other`: row `i`, column `j` is `self[i] * other[j]`.
    pub fn outer(&self, other: &Vector<T>) -> Matrix<T> {
        Matrix {
            rows: self.values.iter().map(|&a| other.scale(a)).collect(),
            cols: other.len(),
        }
    }

    /// Index of the largest element, first occurrence winning ties.
    /// `None` for an empty vector.
    pub fn argmax(&self) -> Option<usize> {
        let mut iter = self.values.iter().enumerate();
        let (mut best, mut max) = match iter.next() {
            Some((i, &x)) => (i, x),
            None => return None,
        };
        for (i, &x) in iter {
            if x > max {
                best = i;
                max = x;
            }
        }
        Some(best)
    }
}

impl<T: Field> From<Vec<T>> for Vector<T> {
    fn from(values: Vec<T>) -> Self {
        Vector::new(values)
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
