//! # FeedForwardNetwork
//!
//! A fully connected network trained with plain back-propagation and momentum.
//! Every non-input layer uses the activation named by the genome.
//!
//! ## Example
//!
//! ```rust
//! use neurogen::data::{Dataset, Sample};
//! use neurogen::genome::Genome;
//! use neurogen::network::{FeedForwardNetwork, NetworkOptions, Trainable, TrainingOptions};
//! use neurogen::rng::RandomNumberGenerator;
//!
//! let data = Dataset::new(vec![
//!     Sample::new(vec![0.0], vec![1.0]),
//!     Sample::new(vec![1.0], vec![0.0]),
//! ])
//! .unwrap();
//!
//! let options = NetworkOptions::new(Genome::default(), data.sizes());
//! let mut network = FeedForwardNetwork::new(&options).unwrap();
//! network.initialize(&mut RandomNumberGenerator::from_seed(1));
//!
//! let training = TrainingOptions::builder().iterations(50).build();
//! let summary = network.train(&data, &training, &mut |_| {}).unwrap();
//! assert!(summary.error.is_finite());
//! ```

use std::time::Instant;

use super::{
    LayerState, NetworkOptions, NetworkState, Trainable, TrainingOptions, TrainingProgress,
    TrainingSummary,
};
use crate::{
    data::Dataset,
    error::{GeneticError, Result},
    genome::{Activation, Genome},
    rng::RandomNumberGenerator,
};

const INITIAL_WEIGHT_RANGE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct FeedForwardNetwork {
    input_size: usize,
    genome: Genome,
    /// Hidden layers followed by the output layer.
    layers: Vec<LayerState>,
    /// Previous weight changes, used for momentum.
    changes: Vec<Vec<Vec<f64>>>,
}

impl FeedForwardNetwork {
    fn from_layers(input_size: usize, genome: Genome, layers: Vec<LayerState>) -> Self {
        let changes = layers
            .iter()
            .map(|layer| vec![vec![0.0; layer.fan_in()]; layer.neurons()])
            .collect();
        Self {
            input_size,
            genome,
            layers,
            changes,
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Runs the network and compares each output with the genome's binary threshold.
    pub fn classify(&self, input: &[f64]) -> Result<Vec<bool>> {
        let threshold = self.genome.binary_thresh;
        Ok(self.run(input)?.into_iter().map(|v| v >= threshold).collect())
    }

    fn activate(&self, sum: f64) -> f64 {
        match self.genome.activation {
            Activation::Sigmoid => 1.0 / (1.0 + (-sum).exp()),
            Activation::Relu => sum.max(0.0),
            Activation::LeakyRelu => {
                if sum > 0.0 {
                    sum
                } else {
                    self.genome.leaky_relu_alpha * sum
                }
            }
            Activation::Tanh => sum.tanh(),
        }
    }

    /// Derivative of the activation, expressed through its output.
    fn derivative(&self, output: f64) -> f64 {
        match self.genome.activation {
            Activation::Sigmoid => output * (1.0 - output),
            Activation::Relu => {
                if output > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::LeakyRelu => {
                if output > 0.0 {
                    1.0
                } else {
                    self.genome.leaky_relu_alpha
                }
            }
            Activation::Tanh => 1.0 - output * output,
        }
    }

    /// Outputs of every layer, the input included.
    fn forward(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let mut outputs = Vec::with_capacity(self.layers.len() + 1);
        outputs.push(input.to_vec());
        for layer in &self.layers {
            let incoming = &outputs[outputs.len() - 1];
            let next: Vec<f64> = layer
                .weights
                .iter()
                .zip(&layer.biases)
                .map(|(row, bias)| {
                    let sum: f64 = row.iter().zip(incoming).map(|(w, x)| w * x).sum();
                    self.activate(sum + bias)
                })
                .collect();
            outputs.push(next);
        }
        outputs
    }

    fn pattern_error(outputs: &[f64], target: &[f64]) -> f64 {
        let sum: f64 = outputs
            .iter()
            .zip(target)
            .map(|(o, t)| (t - o).powi(2))
            .sum();
        sum / target.len() as f64
    }

    /// Trains on one sample and returns its error before the update.
    fn train_pattern(&mut self, input: &[f64], target: &[f64], options: &TrainingOptions) -> f64 {
        let outputs = self.forward(input);
        let last = self.layers.len();
        let error = Self::pattern_error(&outputs[last], target);

        let mut deltas: Vec<Vec<f64>> = vec![Vec::new(); last];
        for l in (0..last).rev() {
            let layer_out = &outputs[l + 1];
            let delta: Vec<f64> = (0..layer_out.len())
                .map(|n| {
                    let err = if l + 1 == last {
                        target[n] - layer_out[n]
                    } else {
                        let next = &self.layers[l + 1];
                        next.weights
                            .iter()
                            .zip(&deltas[l + 1])
                            .map(|(row, d)| row[n] * d)
                            .sum()
                    };
                    err * self.derivative(layer_out[n])
                })
                .collect();
            deltas[l] = delta;
        }

        for (l, delta) in deltas.iter().enumerate() {
            let incoming = &outputs[l];
            let layer = &mut self.layers[l];
            let changes = &mut self.changes[l];
            for (n, &d) in delta.iter().enumerate() {
                for (k, &x) in incoming.iter().enumerate() {
                    let change = options.learning_rate * d * x + options.momentum * changes[n][k];
                    changes[n][k] = change;
                    layer.weights[n][k] += change;
                }
                layer.biases[n] += options.learning_rate * d;
            }
        }

        error
    }

    fn measure_error(&self, data: &Dataset) -> f64 {
        let total: f64 = data
            .iter()
            .map(|sample| {
                let outputs = self.forward(&sample.input);
                Self::pattern_error(&outputs[outputs.len() - 1], &sample.output)
            })
            .sum();
        total / data.len() as f64
    }

    fn check_data(&self, data: &Dataset) -> Result<()> {
        let output_size = self.layers.last().map_or(0, LayerState::neurons);
        if data.input_size() != self.input_size || data.output_size() != output_size {
            return Err(GeneticError::TrainingFailure(format!(
                "network expects {}→{} but the data is {}→{}",
                self.input_size,
                output_size,
                data.input_size(),
                data.output_size()
            )));
        }
        Ok(())
    }
}

impl Trainable for FeedForwardNetwork {
    fn new(options: &NetworkOptions) -> Result<Self> {
        let sizes = options.layer_sizes();
        if sizes.iter().any(|&neurons| neurons == 0) {
            return Err(GeneticError::Configuration(format!(
                "every layer needs at least one neuron, got {:?}",
                sizes
            )));
        }
        let layers = sizes
            .windows(2)
            .map(|pair| LayerState::zeroed(pair[1], pair[0]))
            .collect();
        Ok(Self::from_layers(
            options.input_size,
            options.genome.clone(),
            layers,
        ))
    }

    fn initialize(&mut self, rng: &mut RandomNumberGenerator) {
        for layer in &mut self.layers {
            for row in &mut layer.weights {
                let fresh = rng.fetch_uniform(-INITIAL_WEIGHT_RANGE, INITIAL_WEIGHT_RANGE, row.len());
                row.iter_mut().zip(fresh).for_each(|(w, v)| *w = v);
            }
            let fresh = rng.fetch_uniform(
                -INITIAL_WEIGHT_RANGE,
                INITIAL_WEIGHT_RANGE,
                layer.biases.len(),
            );
            layer.biases.iter_mut().zip(fresh).for_each(|(b, v)| *b = v);
        }
        for change in self.changes.iter_mut().flatten() {
            change.iter_mut().for_each(|c| *c = 0.0);
        }
    }

    fn from_state(state: &NetworkState) -> Result<Self> {
        state.validate()?;
        let mut layers = state.hidden.clone();
        layers.push(state.output.clone());
        Ok(Self::from_layers(
            state.input_size,
            state.genome.clone(),
            layers,
        ))
    }

    fn to_state(&self) -> NetworkState {
        let (output, hidden) = match self.layers.split_last() {
            Some((output, hidden)) => (output.clone(), hidden.to_vec()),
            None => (LayerState::zeroed(0, 0), Vec::new()),
        };
        NetworkState {
            input_size: self.input_size,
            output_size: output.neurons(),
            genome: self.genome.clone(),
            hidden,
            output,
        }
    }

    fn train(
        &mut self,
        data: &Dataset,
        options: &TrainingOptions,
        callback: &mut dyn FnMut(&TrainingProgress),
    ) -> Result<TrainingSummary> {
        options.validate()?;
        self.check_data(data)?;

        let start = Instant::now();
        let mut iterations = 0;
        let mut error = f64::INFINITY;

        while iterations < options.iterations && error > options.error_thresh {
            if options.timeout.is_some_and(|limit| start.elapsed() >= limit) {
                break;
            }

            let total: f64 = data
                .iter()
                .map(|sample| self.train_pattern(&sample.input, &sample.output, options))
                .sum();
            error = total / data.len() as f64;
            iterations += 1;

            if !error.is_finite() {
                return Err(GeneticError::TrainingFailure(format!(
                    "error diverged to {} after {} iterations",
                    error, iterations
                )));
            }

            if options.callback_period > 0 && iterations % options.callback_period == 0 {
                callback(&TrainingProgress { iterations, error });
            }
        }

        if iterations == 0 {
            error = self.measure_error(data);
        }

        Ok(TrainingSummary { iterations, error })
    }

    fn run(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_size {
            return Err(GeneticError::Other(format!(
                "expected {} inputs, got {}",
                self.input_size,
                input.len()
            )));
        }
        if let Some(value) = input.iter().find(|v| !v.is_finite()) {
            return Err(GeneticError::InvalidNumericValue(format!(
                "network input contains {}",
                value
            )));
        }
        let mut outputs = self.forward(input);
        Ok(outputs.pop().unwrap_or_default())
    }
}
