pub mod net;
pub mod trainer;

use pyo3::{prelude::*, wrap_pymodule};

use crate::feedforward::Sample;

#[pymodule]
fn feedforward(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<net::Net>()?;
    m.add_class::<trainer::Trainer>()?;
    Ok(())
}

pub fn construct_module(m: &PyModule) -> PyResult<()> {
    m.add_wrapped(wrap_pymodule!(feedforward))?;
    Ok(())
}

/// Converts Python `(inputs, desired_outputs)` pairs into samples.
pub(super) fn to_samples(samples: Vec<(Vec<f64>, Vec<f64>)>) -> Vec<Sample<f64>> {
    samples.into_iter().map(Sample::from).collect()
}
