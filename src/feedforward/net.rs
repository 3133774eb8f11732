use thiserror::Error;
use tracing::debug;

use super::sample::Sample;
use super::trainer::TrainError;
use crate::algebra::{Field, Matrix, ShapeError, SizeMismatch, Vector};

/// Neural network structure.
///
/// A network is an immutable snapshot of its parameters: training produces new
/// networks instead of changing this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Network<T> {
    /// The number of neurons in each layer, input layer included.
    pub(super) geometry: Box<[usize]>,

    /// Bias vector of every non-input layer: `biases[i]` has `geometry[i + 1]` values.
    pub(super) biases: Box<[Vector<T>]>,

    /// Weight matrix of every non-input layer:
    /// `weights[i]` is `geometry[i + 1]` rows by `geometry[i]` columns.
    pub(super) weights: Box<[Matrix<T>]>,
}

/// Per-layer cost gradients, aligned index for index with a network's
/// biases and weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient<T> {
    pub biases: Vec<Vector<T>>,
    pub weights: Vec<Matrix<T>>,
}

impl<T: Field> Gradient<T> {
    /// All-zero gradient shaped like the parameters of `network`.
    pub fn zero_like(network: &Network<T>) -> Self {
        Gradient {
            biases: network.biases.iter().map(Vector::zero_like).collect(),
            weights: network.weights.iter().map(Matrix::zero_like).collect(),
        }
    }

    /// Element-wise sum of two gradients.
    pub fn add(&self, other: &Gradient<T>) -> Result<Self, ShapeError> {
        SizeMismatch::check(self.biases.len(), other.biases.len())?;
        SizeMismatch::check(self.weights.len(), other.weights.len())?;
        let biases = self
            .biases
            .iter()
            .zip(other.biases.iter())
            .map(|(a, b)| a.add(b))
            .collect::<Result<_, _>>()?;
        let weights = self
            .weights
            .iter()
            .zip(other.weights.iter())
            .map(|(a, b)| a.add(b))
            .collect::<Result<_, _>>()?;
        Ok(Gradient { biases, weights })
    }
}

/// Classification accuracy over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl<T: Field> Network<T> {
    /// Returns network for given geometry, with every bias and weight drawn
    /// uniformly from `[0, 1)`.
    ///
    /// # Examples
    /// ```
    /// # use sgdnnet::feedforward::Network;
    /// let net = Network::<f64>::new(&[10, 20, 20, 3]).unwrap();
    /// assert_eq!(net.geometry(), &[10, 20, 20, 3]);
    /// ```
    pub fn new(geometry: &[usize]) -> Result<Self, NewNetError> {
        Network::with_generator(geometry, T::random)
    }

    /// Returns network for given geometry, taking every bias and then every
    /// weight from `generator`.
    ///
    /// Biases are drawn layer by layer; weights layer by layer, row by row.
    ///
    /// # Examples
    /// ```
    /// # use sgdnnet::algebra::Vector;
    /// # use sgdnnet::feedforward::Network;
    /// let net = Network::with_generator(&[4, 3, 2], || 0.0).unwrap();
    /// let outputs = net.feed_forward(&Vector::new(vec![1.0; 4])).unwrap();
    /// assert_eq!(outputs, Vector::new(vec![0.5, 0.5]));
    /// ```
    pub fn with_generator<G: FnMut() -> T>(
        geometry: &[usize],
        mut generator: G,
    ) -> Result<Self, NewNetError> {
        check_geometry(geometry)?;

        let biases = geometry[1..]
            .iter()
            .map(|&size| Vector::random_with(size, &mut generator))
            .collect();
        let weights = geometry
            .windows(2)
            .map(|pair| Matrix::random_with(pair[1], pair[0], &mut generator))
            .collect();

        debug!(?geometry, "Created network");

        Ok(Network {
            geometry: geometry.into(),
            biases,
            weights,
        })
    }

    /// Builds network from explicit parameters.
    ///
    /// # Returns
    /// * `Ok(Network)` if every bias and weight shape agrees with `geometry`;
    /// * `Err(NewNetError)` naming the first offending layer otherwise.
    pub fn from_parts(
        geometry: &[usize],
        biases: Vec<Vector<T>>,
        weights: Vec<Matrix<T>>,
    ) -> Result<Self, NewNetError> {
        check_geometry(geometry)?;

        let layers = geometry.len() - 1;
        SizeMismatch::check(layers, biases.len()).map_err(NewNetError::BadBiasCount)?;
        SizeMismatch::check(layers, weights.len()).map_err(NewNetError::BadWeightCount)?;

        for (i, (bias, weight)) in biases.iter().zip(weights.iter()).enumerate() {
            let layer = i + 1;
            SizeMismatch::check(geometry[layer], bias.len())
                .map_err(|mismatch| NewNetError::BadBias { layer, mismatch })?;

            let expected = (geometry[layer], geometry[i]);
            if weight.shape() != expected {
                return Err(NewNetError::BadWeights {
                    layer,
                    expected,
                    got: weight.shape(),
                });
            }
        }

        Ok(Network {
            geometry: geometry.into(),
            biases: biases.into_boxed_slice(),
            weights: weights.into_boxed_slice(),
        })
    }

    pub fn geometry(&self) -> &[usize] {
        &self.geometry
    }

    pub fn biases(&self) -> &[Vector<T>] {
        &self.biases
    }

    pub fn weights(&self) -> &[Matrix<T>] {
        &self.weights
    }

    /// Exports geometry and parameters from network.
    ///
    /// # Returns
    /// `(geometry, biases, weights)`.
    pub fn export(&self) -> (&[usize], &[Vector<T>], &[Matrix<T>]) {
        (&self.geometry, &self.biases, &self.weights)
    }

    /// Sigmoid function, element-wise.
    /// Implements the formula:
    /// `1 / (1 + exp(z))`.
    pub(super) fn sigmoid(z: &Vector<T>) -> Vector<T> {
        z.map(|x| T::one() / (T::one() + x.exponent()))
    }

    /// Sigmoid derivative, expressed in terms of sigmoid itself.
    /// Implements the formula:
    /// `-s * (1 - s)`.
    /// The sign is negative because this is the derivative of `1 / (1 + exp(z))`.
    pub(super) fn sigmoid_der_s(s: &Vector<T>) -> Vector<T> {
        s.map(|s| -(s * (T::one() - s)))
    }

    /// One layer step: `sigmoid(weights . activations + biases)`.
    fn activate(
        weights: &Matrix<T>,
        biases: &Vector<T>,
        activations: &Vector<T>,
    ) -> Result<Vector<T>, ShapeError> {
        let z = weights.mat_vec(activations)?.add(biases)?;
        Ok(Network::sigmoid(&z))
    }

    fn check_inputs(&self, inputs: &Vector<T>) -> Result<(), ProcessError> {
        SizeMismatch::check(self.geometry[0], inputs.len()).map_err(ProcessError::BadInputs)
    }

    fn check_desired_outputs(&self, desired_outputs: &Vector<T>) -> Result<(), ProcessError> {
        SizeMismatch::check(self.output_size(), desired_outputs.len())
            .map_err(ProcessError::BadDesiredOutputs)
    }

    pub(super) fn output_size(&self) -> usize {
        self.geometry[self.geometry.len() - 1]
    }

    /// Calculates output of the network using given input.
    ///
    /// # Returns
    /// * `Ok(Vector)` with activations of the output layer;
    /// * `Err(ProcessError)` if the inputs count is wrong.
    pub fn feed_forward(&self, inputs: &Vector<T>) -> Result<Vector<T>, ProcessError> {
        self.check_inputs(inputs)?;
        let outputs = self
            .weights
            .iter()
            .zip(self.biases.iter())
            .try_fold(inputs.clone(), |a, (w, b)| Network::activate(w, b, &a))?;
        Ok(outputs)
    }

    /// Calculates gradient of the quadratic cost `½‖outputs - desired_outputs‖²`
    /// for one sample, with respect to every bias and weight.
    ///
    /// Layers are walked from the output backwards over the stored activations,
    /// so `gradient.biases[i]` and `gradient.weights[i]` belong to
    /// `biases[i]` and `weights[i]`.
    pub fn backprop(
        &self,
        inputs: &Vector<T>,
        desired_outputs: &Vector<T>,
    ) -> Result<Gradient<T>, ProcessError> {
        self.check_inputs(inputs)?;
        self.check_desired_outputs(desired_outputs)?;

        let layers = self.weights.len();

        // activations[0] are the inputs, activations[i + 1] the outputs of layer i
        let mut activations = Vec::with_capacity(layers + 1);
        activations.push(inputs.clone());
        for (w, b) in self.weights.iter().zip(self.biases.iter()) {
            let next = Network::activate(w, b, &activations[activations.len() - 1])?;
            activations.push(next);
        }

        let mut bias_grads = Vec::with_capacity(layers);
        let mut weight_grads = Vec::with_capacity(layers);

        let error = activations[layers]
            .sub(desired_outputs)
            .map_err(ShapeError::from)?;
        let mut delta = error
            .hadamard(&Network::sigmoid_der_s(&activations[layers]))
            .map_err(ShapeError::from)?;

        for layer in (0..layers).rev() {
            weight_grads.push(delta.outer(&activations[layer]));
            if layer > 0 {
                let propagated = self.weights[layer].transpose().mat_vec(&delta)?;
                let next = propagated
                    .hadamard(&Network::sigmoid_der_s(&activations[layer]))
                    .map_err(ShapeError::from)?;
                bias_grads.push(std::mem::replace(&mut delta, next));
            } else {
                bias_grads.push(delta.clone());
            }
        }

        bias_grads.reverse();
        weight_grads.reverse();

        Ok(Gradient {
            biases: bias_grads,
            weights: weight_grads,
        })
    }

    /// Subtracts `rate * gradient` from every parameter, returning the new network.
    pub fn apply_gradient(&self, gradient: &Gradient<T>, rate: T) -> Result<Self, ShapeError> {
        SizeMismatch::check(self.biases.len(), gradient.biases.len())?;
        SizeMismatch::check(self.weights.len(), gradient.weights.len())?;

        let biases = self
            .biases
            .iter()
            .zip(gradient.biases.iter())
            .map(|(b, g)| b.sub(&g.scale(rate)))
            .collect::<Result<_, _>>()?;
        let weights = self
            .weights
            .iter()
            .zip(gradient.weights.iter())
            .map(|(w, g)| w.sub(&g.scale(rate)))
            .collect::<Result<_, _>>()?;

        Ok(Network {
            geometry: self.geometry.clone(),
            biases,
            weights,
        })
    }

    /// Performs one gradient descent step over a mini-batch.
    ///
    /// Sums the gradients of every sample and moves every parameter by
    /// `learning_rate / batch_size` times that sum. The batch must not be empty.
    ///
    /// # Examples
    /// ```
    /// # use sgdnnet::feedforward::{Network, Sample};
    /// let net = Network::with_generator(&[2, 3, 1], || 0.5).unwrap();
    /// let batch = vec![
    ///     Sample::from((vec![0.0, 1.0], vec![1.0])),
    ///     Sample::from((vec![1.0, 0.0], vec![0.0])),
    /// ];
    /// let trained = net.update_mini_batch(&batch, 3.0).unwrap();
    /// assert_ne!(trained, net);
    /// ```
    pub fn update_mini_batch<'a, I>(&self, batch: I, learning_rate: T) -> Result<Self, TrainError>
    where
        I: IntoIterator<Item = &'a Sample<T>>,
        T: 'a,
    {
        let mut sum = Gradient::zero_like(self);
        let mut count = 0;
        for sample in batch {
            let gradient = self.backprop(&sample.inputs, &sample.desired_outputs)?;
            sum = sum.add(&gradient).map_err(ProcessError::from)?;
            count += 1;
        }
        if count == 0 {
            return Err(TrainError::EmptyBatch);
        }

        debug!(batch_size = count, "Applying mini-batch gradient");

        let network = self
            .apply_gradient(&sum, learning_rate.div_count(count))
            .map_err(ProcessError::from)?;
        Ok(network)
    }

    /// Counts samples whose most activated output neuron matches the most
    /// activated desired output (first occurrence wins ties).
    pub fn evaluate<'a, I>(&self, samples: I) -> Result<Evaluation, ProcessError>
    where
        I: IntoIterator<Item = &'a Sample<T>>,
        T: 'a,
    {
        let mut evaluation = Evaluation {
            correct: 0,
            total: 0,
        };
        for sample in samples {
            self.check_desired_outputs(&sample.desired_outputs)?;
            let outputs = self.feed_forward(&sample.inputs)?;
            if outputs.argmax() == sample.desired_outputs.argmax() {
                evaluation.correct += 1;
            }
            evaluation.total += 1;
        }
        Ok(evaluation)
    }

    /// Calculates quadratic cost of an output values given the desired values.
    /// Implements the formula:
    /// `½‖outputs - desired_outputs‖²`
    ///
    /// # Examples
    /// ```
    /// # use sgdnnet::algebra::Vector;
    /// # use sgdnnet::feedforward::Network;
    /// let outputs = Vector::new(vec![10.0; 1000]);
    /// let desired_outputs = Vector::new(vec![10.25; 1000]);
    /// let cost = Network::calc_cost(&outputs, &desired_outputs).unwrap();
    /// assert_eq!(cost, 31.25);
    /// ```
    pub fn calc_cost(outputs: &Vector<T>, desired_outputs: &Vector<T>) -> Result<T, SizeMismatch> {
        let diff = outputs.sub(desired_outputs)?;
        Ok(diff.dot(&diff)?.div_count(2))
    }
}

fn check_geometry(geometry: &[usize]) -> Result<(), NewNetError> {
    if geometry.len() < 2 {
        return Err(NewNetError::BadGeometry(geometry.len()));
    }
    if let Some(layer) = geometry.iter().position(|&size| size == 0) {
        return Err(NewNetError::EmptyLayer(layer));
    }
    Ok(())
}

/// Error structure for `Network::new` and `Network::from_parts`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewNetError {
    #[error(
        "Net must have at least two layers (input and output), \
        but got geometry with len {0}!"
    )]
    BadGeometry(usize),
    #[error("Layer {0} of the geometry has no neurons!")]
    EmptyLayer(usize),
    #[error(
        "Expected {} bias vector(s) because of provided geometry, but got {}!",
        .0.expected, .0.got
    )]
    BadBiasCount(SizeMismatch),
    #[error(
        "Expected {} weight matrices because of provided geometry, but got {}!",
        .0.expected, .0.got
    )]
    BadWeightCount(SizeMismatch),
    #[error(
        "Expected {} biases in layer {layer}, but got {}!",
        .mismatch.expected, .mismatch.got
    )]
    BadBias { layer: usize, mismatch: SizeMismatch },
    #[error(
        "Expected {}x{} weights in layer {layer}, but got {}x{}!",
        .expected.0, .expected.1, .got.0, .got.1
    )]
    BadWeights {
        layer: usize,
        expected: (usize, usize),
        got: (usize, usize),
    },
}

/// Error structure for `Network::feed_forward`, `Network::backprop` and `Network::evaluate`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("Expected {} input(s), but got {}!", .0.expected, .0.got)]
    BadInputs(SizeMismatch),
    #[error("Expected {} desired output(s), but got {}!", .0.expected, .0.got)]
    BadDesiredOutputs(SizeMismatch),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
