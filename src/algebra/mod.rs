//! Dense linear algebra over a generic scalar field

mod field;
mod matrix;
mod vector;

pub use field::*;
pub use matrix::*;
pub use vector::*;

use thiserror::Error;

/// Error structure for collections size mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected} values, but got {got}!")]
pub struct SizeMismatch {
    pub expected: usize,
    pub got: usize,
}

impl SizeMismatch {
    /// Returns `Ok(())` if sizes agree, `Err(SizeMismatch)` otherwise.
    pub fn check(expected: usize, got: usize) -> Result<(), SizeMismatch> {
        if expected == got {
            Ok(())
        } else {
            Err(SizeMismatch { expected, got })
        }
    }
}

/// Error structure for vector and matrix operations on incompatible shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("Expected vector of length {}, but got {}!", .0.expected, .0.got)]
    Length(SizeMismatch),
    #[error("Expected {expected} column(s) in row {row}, but got {got}!")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("Expected {}x{} matrix, but got {}x{}!", .expected.0, .expected.1, .got.0, .got.1)]
    Dimensions {
        expected: (usize, usize),
        got: (usize, usize),
    },
}

impl From<SizeMismatch> for ShapeError {
    fn from(err: SizeMismatch) -> Self {
        ShapeError::Length(err)
    }
}
