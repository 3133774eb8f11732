use pyo3::prelude::*;

use super::to_samples;
use crate::algebra::{Matrix, ShapeError, SizeMismatch, Vector};
use crate::feedforward::{Gradient, Network, NewNetError, ProcessError, TrainError};
use crate::Impl_to_PyErr;

#[pyclass]
#[derive(Clone)]
pub struct Net {
    pub(super) net: Network<f64>,
}

type ExportedLayers = (Vec<Vec<f64>>, Vec<Vec<Vec<f64>>>);

fn export_layers(biases: &[Vector<f64>], weights: &[Matrix<f64>]) -> ExportedLayers {
    (
        biases.iter().map(|b| b.as_slice().to_vec()).collect(),
        weights.iter().map(Matrix::to_rows).collect(),
    )
}

#[pymethods]
impl Net {
    #[new]
    pub fn new(geometry: Vec<usize>) -> Result<Self, NewNetError> {
        Ok(Self {
            net: Network::new(&geometry)?,
        })
    }

    #[staticmethod]
    pub fn from_parts(
        geometry: Vec<usize>,
        biases: Vec<Vec<f64>>,
        weights: Vec<Vec<Vec<f64>>>,
    ) -> PyResult<Self> {
        let biases = biases.into_iter().map(Vector::new).collect();
        let weights = weights
            .into_iter()
            .map(Matrix::from_rows)
            .collect::<Result<_, ShapeError>>()?;
        Ok(Self {
            net: Network::from_parts(&geometry, biases, weights)?,
        })
    }

    pub fn geometry(&self) -> Vec<usize> {
        self.net.geometry().to_vec()
    }

    /// Returns `(geometry, biases, weights)`.
    pub fn export(&self) -> (Vec<usize>, Vec<Vec<f64>>, Vec<Vec<Vec<f64>>>) {
        let (geometry, biases, weights) = self.net.export();
        let (biases, weights) = export_layers(biases, weights);
        (geometry.to_vec(), biases, weights)
    }

    pub fn feed_forward(&self, inputs: Vec<f64>) -> Result<Vec<f64>, ProcessError> {
        Ok(self.net.feed_forward(&Vector::new(inputs))?.into_vec())
    }

    /// Returns `(bias_gradients, weight_gradients)`.
    pub fn backprop(
        &self,
        inputs: Vec<f64>,
        desired_outputs: Vec<f64>,
    ) -> Result<ExportedLayers, ProcessError> {
        let Gradient { biases, weights } = self
            .net
            .backprop(&Vector::new(inputs), &Vector::new(desired_outputs))?;
        Ok(export_layers(&biases, &weights))
    }

    pub fn update_mini_batch(
        &self,
        samples: Vec<(Vec<f64>, Vec<f64>)>,
        learning_rate: f64,
    ) -> Result<Net, TrainError> {
        Ok(Net {
            net: self
                .net
                .update_mini_batch(&to_samples(samples), learning_rate)?,
        })
    }

    /// Returns `(correct, total)`.
    pub fn evaluate(
        &self,
        samples: Vec<(Vec<f64>, Vec<f64>)>,
    ) -> Result<(usize, usize), ProcessError> {
        let evaluation = self.net.evaluate(&to_samples(samples))?;
        Ok((evaluation.correct, evaluation.total))
    }

    #[staticmethod]
    pub fn calc_cost(outputs: Vec<f64>, desired_outputs: Vec<f64>) -> Result<f64, SizeMismatch> {
        Ok(Network::calc_cost(
            &Vector::new(outputs),
            &Vector::new(desired_outputs),
        )?)
    }
}

Impl_to_PyErr!(for NewNetError, ProcessError, TrainError, ShapeError, SizeMismatch);
