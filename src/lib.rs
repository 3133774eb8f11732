//! Feedforward neural network trained by stochastic gradient descent,
//! generic over the scalar field it computes in.

pub mod algebra;
pub mod feedforward;
pub mod mnist;

#[cfg(feature = "python")]
pub mod python_ffi;

pub use algebra::{Field, Matrix, Vector};
pub use feedforward::{Network, Sample, Trainer};
