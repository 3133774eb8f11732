use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use tracing::{info, warn};

use super::net::{Evaluation, Network, ProcessError};
use super::sample::Sample;
use crate::algebra::{Field, SizeMismatch};

/// Stochastic gradient descent trainer.
///
/// Holds the training configuration. Training procedure will look like this:
/// * Every epoch, the training samples are shuffled and split into mini-batches
/// of `mini_batch_size` samples. A final batch smaller than that is dropped.
/// * Every mini-batch is applied with `Network::update_mini_batch`, and the
/// resulting network is passed on to the next batch.
/// * If evaluation samples are given, the network is evaluated after every epoch.
///
/// The starting network is consumed; the trained one is returned inside `Training`
/// along with a report for every epoch.
///
/// # Examples
/// ```
/// # use sgdnnet::feedforward::{Network, Sample, Trainer};
/// let net = Network::<f64>::new(&[2, 4, 2]).unwrap();
/// let samples: Vec<Sample<f64>> = vec![
///     (vec![0.0, 1.0], vec![0.0, 1.0]).into(),
///     (vec![1.0, 0.0], vec![1.0, 0.0]).into(),
/// ];
/// let trainer = Trainer::new(3, 1, 0.5).unwrap();
/// let training = trainer.train(net, &samples, Some(&samples[..])).unwrap();
/// assert_eq!(training.reports.len(), 3);
/// assert_eq!(training.reports[0].batches, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trainer<T> {
    epochs: usize,
    mini_batch_size: usize,
    learning_rate: T,
}

/// What happened during one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochReport {
    pub epoch: usize,
    /// Number of mini-batch updates applied.
    pub batches: usize,
    pub evaluation: Option<Evaluation>,
}

/// Result of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct Training<T> {
    pub network: Network<T>,
    pub reports: Vec<EpochReport>,
}

impl<T: Field> Trainer<T> {
    /// Returns trainer for given configuration.
    ///
    /// # Returns
    /// * `Ok(Trainer)` if `mini_batch_size` is positive;
    /// * `Err(TrainError::ZeroBatchSize)` otherwise.
    pub fn new(epochs: usize, mini_batch_size: usize, learning_rate: T) -> Result<Self, TrainError> {
        if mini_batch_size == 0 {
            return Err(TrainError::ZeroBatchSize);
        }
        Ok(Trainer {
            epochs,
            mini_batch_size,
            learning_rate,
        })
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn mini_batch_size(&self) -> usize {
        self.mini_batch_size
    }

    pub fn learning_rate(&self) -> T {
        self.learning_rate
    }

    /// Trains `network`, shuffling with the thread-local generator.
    /// See `Trainer::train_with_rng`.
    pub fn train(
        &self,
        network: Network<T>,
        samples: &[Sample<T>],
        evaluation: Option<&[Sample<T>]>,
    ) -> Result<Training<T>, TrainError> {
        self.train_with_rng(network, samples, evaluation, &mut rand::thread_rng())
    }

    /// Trains `network` on `samples`, shuffling with `rng`.
    ///
    /// Every sample is checked against the network geometry before any training
    /// is done. Any error aborts the whole run.
    ///
    /// # Returns
    /// * `Ok(Training)` with the final network and a report per epoch;
    /// * `Err(TrainError)` if there are fewer samples than one mini-batch,
    /// or if some sample does not fit the network.
    pub fn train_with_rng<R: Rng + ?Sized>(
        &self,
        network: Network<T>,
        samples: &[Sample<T>],
        evaluation: Option<&[Sample<T>]>,
        rng: &mut R,
    ) -> Result<Training<T>, TrainError> {
        if samples.len() < self.mini_batch_size {
            return Err(TrainError::NotEnoughSamples {
                samples: samples.len(),
                mini_batch_size: self.mini_batch_size,
            });
        }
        check_samples(&network, samples)?;
        if let Some(evaluation) = evaluation {
            check_samples(&network, evaluation)?;
        }

        let dropped = samples.len() % self.mini_batch_size;
        if dropped > 0 {
            warn!(
                dropped,
                mini_batch_size = self.mini_batch_size,
                "Last partial mini-batch will be dropped every epoch"
            );
        }

        let mut indices: Vec<usize> = (0..samples.len()).collect();
        let mut reports = Vec::with_capacity(self.epochs);

        let network = (0..self.epochs).try_fold(network, |network, epoch| {
            indices.shuffle(rng);

            let (network, batches) = indices.chunks_exact(self.mini_batch_size).try_fold(
                (network, 0),
                |(network, batches), batch| {
                    let batch = batch.iter().map(|&i| &samples[i]);
                    let network = network.update_mini_batch(batch, self.learning_rate)?;
                    Ok::<_, TrainError>((network, batches + 1))
                },
            )?;

            let evaluation = match evaluation {
                Some(data) => Some(network.evaluate(data)?),
                None => None,
            };
            match evaluation {
                Some(Evaluation { correct, total }) => {
                    info!(epoch, correct, total, "Epoch {}: {} / {}", epoch, correct, total)
                }
                None => info!(epoch, "Epoch {} complete", epoch),
            }

            reports.push(EpochReport {
                epoch,
                batches,
                evaluation,
            });
            Ok::<_, TrainError>(network)
        })?;

        Ok(Training { network, reports })
    }
}

fn check_samples<T: Field>(network: &Network<T>, samples: &[Sample<T>]) -> Result<(), TrainError> {
    let inputs_len = network.geometry()[0];
    let outputs_len = network.output_size();

    for (index, sample) in samples.iter().enumerate() {
        if let Err(SizeMismatch { expected, got }) =
            SizeMismatch::check(inputs_len, sample.inputs.len())
        {
            return Err(TrainError::WrongSampleInputsCount {
                index,
                expected,
                got,
            });
        }
        if let Err(SizeMismatch { expected, got }) =
            SizeMismatch::check(outputs_len, sample.desired_outputs.len())
        {
            return Err(TrainError::WrongSampleDesiredOutputsCount {
                index,
                expected,
                got,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainError {
    #[error("Mini-batch size must be positive!")]
    ZeroBatchSize,
    #[error("Mini-batch size is {mini_batch_size}, but got only {samples} sample(s)!")]
    NotEnoughSamples {
        samples: usize,
        mini_batch_size: usize,
    },
    #[error("Mini-batch must contain at least one sample!")]
    EmptyBatch,
    #[error("Expected {expected} input(s), but samples[{index}] got {got}!")]
    WrongSampleInputsCount {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error("Expected {expected} desired output(s), but samples[{index}] got {got}!")]
    WrongSampleDesiredOutputsCount {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error(transparent)]
    Process(#[from] ProcessError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Vector;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn samples(count: usize) -> Vec<Sample<f64>> {
        (0..count)
            .map(|i| {
                let x = i as f64 / count as f64;
                Sample::from((vec![x, 1.0 - x], vec![x, 1.0 - x]))
            })
            .collect()
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert_eq!(Trainer::new(1, 0, 1.0).unwrap_err(), TrainError::ZeroBatchSize);
    }

    #[test]
    fn too_few_samples_are_rejected() {
        let net = Network::<f64>::new(&[2, 2]).unwrap();
        let trainer = Trainer::new(1, 5, 1.0).unwrap();
        assert_eq!(
            trainer.train(net, &samples(4), None).unwrap_err(),
            TrainError::NotEnoughSamples {
                samples: 4,
                mini_batch_size: 5
            }
        );
    }

    #[test]
    fn bad_sample_is_reported_before_training() {
        let net = Network::<f64>::new(&[2, 2]).unwrap();
        let mut data = samples(4);
        data[2].desired_outputs = Vector::zeros(3);
        let trainer = Trainer::new(1, 2, 1.0).unwrap();
        assert_eq!(
            trainer.train(net, &data, None).unwrap_err(),
            TrainError::WrongSampleDesiredOutputsCount {
                index: 2,
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn full_batch_runs_one_update_per_epoch() {
        let net = Network::<f64>::new(&[2, 3, 2]).unwrap();
        let data = samples(6);
        let trainer = Trainer::new(4, 6, 1.0).unwrap();
        let training = trainer.train(net, &data, None).unwrap();
        let batches: Vec<_> = training.reports.iter().map(|r| r.batches).collect();
        assert_eq!(batches, vec![1; 4]);
        assert!(training.reports.iter().all(|r| r.evaluation.is_none()));
    }

    #[test]
    fn full_batch_epoch_equals_single_update() {
        // Shuffling does not change the gradient sum of a batch holding every sample,
        // up to floating-point summation order.
        let net = Network::with_generator(&[2, 3, 2], || 0.25).unwrap();
        let data = samples(5);
        let expected = net.update_mini_batch(&data, 2.0).unwrap();
        let trainer = Trainer::new(1, 5, 2.0).unwrap();
        let trained = trainer.train(net, &data, None).unwrap().network;
        for (a, b) in trained.weights().iter().zip(expected.weights()) {
            for (ra, rb) in a.rows().iter().zip(b.rows()) {
                for (x, y) in ra.iter().zip(rb.iter()) {
                    approx::assert_relative_eq!(*x, *y, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn partial_batch_is_dropped() {
        let net = Network::<f64>::new(&[2, 2]).unwrap();
        let trainer = Trainer::new(2, 3, 1.0).unwrap();
        let training = trainer.train(net, &samples(7), None).unwrap();
        assert_eq!(training.reports[0].batches, 2);
        assert_eq!(training.reports[1].batches, 2);
    }

    #[test]
    fn zero_epochs_return_starting_network() {
        let net = Network::<f64>::new(&[2, 2]).unwrap();
        let trainer = Trainer::new(0, 1, 1.0).unwrap();
        let training = trainer.train(net.clone(), &samples(3), None).unwrap();
        assert_eq!(training.network, net);
        assert!(training.reports.is_empty());
    }

    #[test]
    fn seeded_training_is_reproducible() {
        let net = Network::with_generator(&[2, 4, 2], || 0.1).unwrap();
        let data = samples(10);
        let trainer = Trainer::new(3, 3, 0.5).unwrap();
        let first = trainer
            .train_with_rng(net.clone(), &data, Some(&data[..]), &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        let second = trainer
            .train_with_rng(net, &data, Some(&data[..]), &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.reports[2].evaluation.map(|e| e.total), Some(10));
    }
}
