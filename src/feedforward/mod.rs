//! Feedforward neural network with backpropagation-based gradient descent training

mod net;
mod sample;
mod trainer;

pub use net::*;
pub use sample::*;
pub use trainer::*;
