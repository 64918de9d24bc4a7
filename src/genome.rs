//! # Genome
//!
//! A [`Genome`] is the hyperparameter record of one network: the activation
//! kind, the binary threshold, the leaky ReLU slope and the shape of the hidden
//! layers. It carries no weights; those live in the trained
//! [`NetworkState`](crate::network::NetworkState).
//!
//! ## Example
//!
//! ```rust
//! use neurogen::genome::Genome;
//! use neurogen::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(3);
//! let genome = Genome::random(&mut rng, 3, 8);
//!
//! assert!((1..=3).contains(&genome.hidden_layers.len()));
//! assert!(genome.hidden_layers.iter().all(|&n| (1..=8).contains(&n)));
//! ```

use std::fmt;

use crate::rng::RandomNumberGenerator;

/// Activation functions a network can use.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    Sigmoid,
    Relu,
    LeakyRelu,
    Tanh,
}

impl Activation {
    /// Every activation, in a fixed order.
    pub const ALL: [Activation; 4] = [
        Activation::Sigmoid,
        Activation::Relu,
        Activation::LeakyRelu,
        Activation::Tanh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::Relu => "relu",
            Activation::LeakyRelu => "leaky-relu",
            Activation::Tanh => "tanh",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hyperparameters describing the structure and activation behaviour of a network.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    pub activation: Activation,
    /// Threshold used to turn outputs into binary decisions.
    pub binary_thresh: f64,
    /// Slope of the negative half of the leaky ReLU.
    pub leaky_relu_alpha: f64,
    /// Neuron count of every hidden layer, input side first.
    pub hidden_layers: Vec<usize>,
}

impl Genome {
    /// Draws a random genome whose hidden layers respect `max_layers` and `max_neurons`.
    ///
    /// Limits below one are treated as one.
    pub fn random(rng: &mut RandomNumberGenerator, max_layers: usize, max_neurons: usize) -> Self {
        let leaky_relu_alpha = rng.rand_float_rounded(0.001, 0.1, 4);
        let binary_thresh = rng.rand_float_rounded(0.001, 0.999, 4);
        let activation = Activation::ALL[rng.rand_int(0, Activation::ALL.len())];

        let layer_count = rng.rand_int_inclusive(1, max_layers.max(1));
        let hidden_layers = (0..layer_count)
            .map(|_| rng.rand_int_inclusive(1, max_neurons.max(1)))
            .collect();

        Self {
            activation,
            binary_thresh,
            leaky_relu_alpha,
            hidden_layers,
        }
    }

    /// Total number of hidden neurons.
    pub fn hidden_neurons(&self) -> usize {
        self.hidden_layers.iter().sum()
    }

    /// Whether the hidden layers respect the given limits.
    pub fn fits(&self, max_layers: usize, max_neurons: usize) -> bool {
        (1..=max_layers).contains(&self.hidden_layers.len())
            && self
                .hidden_layers
                .iter()
                .all(|&neurons| (1..=max_neurons).contains(&neurons))
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self {
            activation: Activation::Sigmoid,
            binary_thresh: 0.5,
            leaky_relu_alpha: 0.01,
            hidden_layers: vec![3],
        }
    }
}
