use super::{Field, ShapeError, SizeMismatch, Vector};

/// Dense row-major matrix.
///
/// Rows all have `cols` entries. The column count is stored separately so a
/// matrix without rows still has a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    pub(super) rows: Box<[Vector<T>]>,
    pub(super) cols: usize,
}

impl<T: Field> Matrix<T> {
    /// Builds a matrix from its rows.
    ///
    /// # Returns
    /// * `Ok(Matrix)` if all rows have the same length;
    /// * `Err(ShapeError::RaggedRow)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use sgdnnet::algebra::{Matrix, Vector};
    /// let m = Matrix::from_rows(vec![
    ///     vec![0.0, 1.0, 1.0],
    ///     vec![1.0, -1.0, 1.0],
    ///     vec![2.0, -3.0, 1.0],
    /// ])
    /// .unwrap();
    /// let v = Vector::new(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(m.mat_vec(&v).unwrap(), Vector::new(vec![5.0, 2.0, -1.0]));
    /// ```
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, ShapeError> {
        let cols = rows.first().map_or(0, |r| r.len());
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(ShapeError::RaggedRow {
                    row,
                    expected: cols,
                    got: values.len(),
                });
            }
        }
        Ok(Matrix {
            rows: rows.into_iter().map(Vector::new).collect(),
            cols,
        })
    }

    /// `rows x cols` matrix of additive identities.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows: (0..rows).map(|_| Vector::zeros(cols)).collect(),
            cols,
        }
    }

    /// `rows x cols` matrix filled row by row from `generator`.
    pub fn random_with<G: FnMut() -> T>(rows: usize, cols: usize, generator: &mut G) -> Self {
        Matrix {
            rows: (0..rows)
                .map(|_| Vector::random_with(cols, generator))
                .collect(),
            cols,
        }
    }

    /// Same-shaped matrix filled with the additive identity.
    pub fn zero_like(&self) -> Self {
        Matrix::zeros(self.rows.len(), self.cols)
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    pub fn row(&self, index: usize) -> &Vector<T> {
        &self.rows[index]
    }

    pub fn rows(&self) -> &[Vector<T>] {
        &self.rows
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows.iter().map(|r| r.as_slice().to_vec()).collect()
    }

    fn check_shape(&self, other: &Matrix<T>) -> Result<(), ShapeError> {
        if self.shape() != other.shape() {
            return Err(ShapeError::Dimensions {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        Ok(())
    }

    fn zip_rows<F>(&self, other: &Matrix<T>, f: F) -> Result<Self, ShapeError>
    where
        F: Fn(&Vector<T>, &Vector<T>) -> Result<Vector<T>, SizeMismatch>,
    {
        self.check_shape(other)?;
        let rows = self
            .rows
            .iter()
            .zip(other.rows.iter())
            .map(|(a, b)| f(a, b))
            .collect::<Result<_, _>>()?;
        Ok(Matrix {
            rows,
            cols: self.cols,
        })
    }

    pub fn add(&self, other: &Matrix<T>) -> Result<Self, ShapeError> {
        self.zip_rows(other, |a, b| a.add(b))
    }

    pub fn sub(&self, other: &Matrix<T>) -> Result<Self, ShapeError> {
        self.zip_rows(other, |a, b| a.sub(b))
    }

    pub fn scale(&self, s: T) -> Self {
        Matrix {
            rows: self.rows.iter().map(|r| r.scale(s)).collect(),
            cols: self.cols,
        }
    }

    /// Matrix-vector product; entry `i` is the dot product of row `i` and `v`.
    pub fn mat_vec(&self, v: &Vector<T>) -> Result<Vector<T>, ShapeError> {
        SizeMismatch::check(self.cols, v.len())?;
        let values = self
            .rows
            .iter()
            .map(|row| row.dot(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Vector::new(values))
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        let rows = (0..self.cols)
            .map(|j| Vector::new(self.rows.iter().map(|r| r[j]).collect()))
            .collect();
        Matrix {
            rows,
            cols: self.rows.len(),
        }
    }
}
