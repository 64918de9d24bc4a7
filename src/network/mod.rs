//! # Trainable networks
//!
//! The evolution engine never looks inside a network while it trains. It only
//! needs to build one from a [`Genome`], initialize it, train it, and move its
//! parameters in and out as a [`NetworkState`]. The [`Trainable`] trait is that
//! boundary; [`FeedForwardNetwork`] is the implementation shipped with the crate.
//!
//! A `NetworkState` is what breeding operates on. Its hidden layers are the only
//! parameters that crossover and mutation touch; the output layer is carried
//! along unchanged.

pub mod feed_forward;

use std::time::Duration;

use crate::{
    data::{DataSizes, Dataset},
    error::{GeneticError, Result},
    genome::Genome,
    rng::RandomNumberGenerator,
};

pub use feed_forward::FeedForwardNetwork;

/// Everything needed to construct an untrained network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkOptions {
    pub genome: Genome,
    pub input_size: usize,
    pub output_size: usize,
}

impl NetworkOptions {
    pub fn new(genome: Genome, sizes: DataSizes) -> Self {
        Self {
            genome,
            input_size: sizes.input_size,
            output_size: sizes.output_size,
        }
    }

    /// Neuron count of every layer, input and output included.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.genome.hidden_layers.len() + 2);
        sizes.push(self.input_size);
        sizes.extend(&self.genome.hidden_layers);
        sizes.push(self.output_size);
        sizes
    }
}

/// Budget and learning parameters for one call to [`Trainable::train`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    /// Maximum passes over the training data.
    pub iterations: usize,
    /// Training stops once the error is at or below this value.
    pub error_thresh: f64,
    pub learning_rate: f64,
    pub momentum: f64,
    /// Iterations between progress callbacks. Zero disables them.
    pub callback_period: usize,
    /// Wall-clock budget. `None` means unlimited.
    pub timeout: Option<Duration>,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        TrainingOptionsBuilder::default().build()
    }
}

impl TrainingOptions {
    /// Returns a builder starting from the default options.
    pub fn builder() -> TrainingOptionsBuilder {
        TrainingOptionsBuilder::default()
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(GeneticError::Configuration(
                "Training iterations must be greater than zero".to_string(),
            ));
        }
        if !self.error_thresh.is_finite() || self.error_thresh < 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Training error threshold must be a non-negative number, got {}",
                self.error_thresh
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !self.momentum.is_finite() || self.momentum < 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Momentum must be a non-negative number, got {}",
                self.momentum
            )));
        }
        Ok(())
    }
}

/// Builder for `TrainingOptions`.
///
/// Unset fields take their defaults in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct TrainingOptionsBuilder {
    iterations: Option<usize>,
    error_thresh: Option<f64>,
    learning_rate: Option<f64>,
    momentum: Option<f64>,
    callback_period: Option<usize>,
    timeout: Option<Duration>,
}

impl TrainingOptionsBuilder {
    pub fn iterations(mut self, value: usize) -> Self {
        self.iterations = Some(value);
        self
    }

    pub fn error_thresh(mut self, value: f64) -> Self {
        self.error_thresh = Some(value);
        self
    }

    pub fn learning_rate(mut self, value: f64) -> Self {
        self.learning_rate = Some(value);
        self
    }

    pub fn momentum(mut self, value: f64) -> Self {
        self.momentum = Some(value);
        self
    }

    pub fn callback_period(mut self, value: usize) -> Self {
        self.callback_period = Some(value);
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    /// Builds the `TrainingOptions` instance. Validation happens in
    /// [`TrainingOptions::validate`].
    pub fn build(self) -> TrainingOptions {
        TrainingOptions {
            iterations: self.iterations.unwrap_or(20_000),
            error_thresh: self.error_thresh.unwrap_or(0.005),
            learning_rate: self.learning_rate.unwrap_or(0.3),
            momentum: self.momentum.unwrap_or(0.1),
            callback_period: self.callback_period.unwrap_or(10),
            timeout: self.timeout,
        }
    }
}

/// Reported to the training callback every `callback_period` iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingProgress {
    pub iterations: usize,
    pub error: f64,
}

/// Outcome of a finished training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSummary {
    pub iterations: usize,
    pub error: f64,
}

/// Weights and biases of one layer.
///
/// `weights[n]` holds the incoming weights of neuron `n`, one per neuron of the
/// previous layer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LayerState {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl LayerState {
    pub fn zeroed(neurons: usize, fan_in: usize) -> Self {
        Self {
            weights: vec![vec![0.0; fan_in]; neurons],
            biases: vec![0.0; neurons],
        }
    }

    pub fn neurons(&self) -> usize {
        self.biases.len()
    }

    /// Incoming connections per neuron.
    pub fn fan_in(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.iter().map(Vec::len).sum::<usize>() + self.biases.len()
    }

    fn check(&self, neurons: usize, fan_in: usize, name: &str) -> Result<()> {
        if self.biases.len() != neurons || self.weights.len() != neurons {
            return Err(GeneticError::InvalidState(format!(
                "{} has {} weight rows and {} biases, expected {}",
                name,
                self.weights.len(),
                self.biases.len(),
                neurons
            )));
        }
        if self.weights.iter().any(|row| row.len() != fan_in) {
            return Err(GeneticError::InvalidState(format!(
                "{} rows must have {} weights",
                name, fan_in
            )));
        }
        Ok(())
    }
}

/// Complete parameter state of a network.
///
/// This is the serialized form individuals carry between generations. The
/// genome is the only copy of the hyperparameters; hidden layer `i` has
/// `genome.hidden_layers[i]` neurons.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkState {
    pub input_size: usize,
    pub output_size: usize,
    pub genome: Genome,
    pub hidden: Vec<LayerState>,
    pub output: LayerState,
}

impl NetworkState {
    /// Checks that the layers agree with the genome and the data sizes.
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.output_size == 0 {
            return Err(GeneticError::InvalidState(
                "input and output sizes must be positive".to_string(),
            ));
        }
        if self.hidden.len() != self.genome.hidden_layers.len() {
            return Err(GeneticError::InvalidState(format!(
                "genome declares {} hidden layers but state has {}",
                self.genome.hidden_layers.len(),
                self.hidden.len()
            )));
        }

        let mut fan_in = self.input_size;
        for (index, (layer, &neurons)) in self
            .hidden
            .iter()
            .zip(&self.genome.hidden_layers)
            .enumerate()
        {
            if neurons == 0 {
                return Err(GeneticError::InvalidState(format!(
                    "hidden layer {} has no neurons",
                    index
                )));
            }
            layer.check(neurons, fan_in, &format!("hidden layer {}", index))?;
            fan_in = neurons;
        }
        self.output.check(self.output_size, fan_in, "output layer")
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.hidden
            .iter()
            .map(LayerState::parameter_count)
            .sum::<usize>()
            + self.output.parameter_count()
    }

    /// Serializes the state to JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a state from JSON produced by [`NetworkState::to_json`].
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }
}

/// A network the evolution loop can build, train and serialize.
///
/// Implementations must be `Send` so that a generation can be trained in parallel.
pub trait Trainable: Sized + Send {
    /// Builds an untrained network with every parameter at zero.
    fn new(options: &NetworkOptions) -> Result<Self>;

    /// Draws fresh random parameters.
    fn initialize(&mut self, rng: &mut RandomNumberGenerator);

    /// Rebuilds a network from a state produced by [`Trainable::to_state`].
    fn from_state(state: &NetworkState) -> Result<Self>;

    /// Snapshots every parameter and hyperparameter.
    fn to_state(&self) -> NetworkState;

    /// Trains until `options.iterations` are exhausted, the error reaches
    /// `options.error_thresh`, or `options.timeout` elapses.
    ///
    /// `callback` is invoked every `options.callback_period` iterations.
    fn train(
        &mut self,
        data: &Dataset,
        options: &TrainingOptions,
        callback: &mut dyn FnMut(&TrainingProgress),
    ) -> Result<TrainingSummary>;

    /// Runs inference on one input vector.
    fn run(&self, input: &[f64]) -> Result<Vec<f64>>;
}
