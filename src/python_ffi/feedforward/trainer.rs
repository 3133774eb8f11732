use pyo3::prelude::*;

use super::{net::Net, to_samples};
use crate::feedforward::{TrainError, Trainer as InnerTrainer};

#[pyclass]
pub struct Trainer {
    pub(super) trainer: InnerTrainer<f64>,
}

/// `(epoch, batches, (correct, total) or None)`
type Report = (usize, usize, Option<(usize, usize)>);

#[pymethods]
impl Trainer {
    #[new]
    pub fn new(
        epochs: usize,
        mini_batch_size: usize,
        learning_rate: f64,
    ) -> Result<Self, TrainError> {
        Ok(Self {
            trainer: InnerTrainer::new(epochs, mini_batch_size, learning_rate)?,
        })
    }

    pub fn epochs(&self) -> usize {
        self.trainer.epochs()
    }

    pub fn mini_batch_size(&self) -> usize {
        self.trainer.mini_batch_size()
    }

    pub fn learning_rate(&self) -> f64 {
        self.trainer.learning_rate()
    }

    /// Trains a copy of `net`, returning the trained `Net` and a report per epoch.
    pub fn train(
        &self,
        net: PyRef<Net>,
        samples: Vec<(Vec<f64>, Vec<f64>)>,
        evaluation: Option<Vec<(Vec<f64>, Vec<f64>)>>,
    ) -> Result<(Net, Vec<Report>), TrainError> {
        let samples = to_samples(samples);
        let evaluation = evaluation.map(to_samples);
        let training = self
            .trainer
            .train(net.net.clone(), &samples, evaluation.as_deref())?;

        let reports = training
            .reports
            .iter()
            .map(|r| {
                (
                    r.epoch,
                    r.batches,
                    r.evaluation.map(|e| (e.correct, e.total)),
                )
            })
            .collect();

        Ok((
            Net {
                net: training.network,
            },
            reports,
        ))
    }
}
