//! # Mutation
//!
//! Mutation perturbs a trained network state in proportion to its current values:
//! a selected weight or bias is multiplied by `1 + rate` or `1 - rate` on a fair
//! coin. Values that are exactly zero therefore stay zero.
//!
//! Hyperparameters change on every call. The activation is redrawn from a
//! distribution that strongly favours keeping the current one, and the binary
//! threshold and leaky ReLU slope are scaled by the same `1 ± rate` rule.
//!
//! Only hidden layers are touched. The output layer is left as trained.

use crate::{
    genome::{Activation, Genome},
    network::{LayerState, NetworkState},
    rng::RandomNumberGenerator,
    sequence::create_distribution,
};

/// Number of entries in the activation distribution.
const ACTIVATION_DISTRIBUTION_SIZE: usize = 100;

/// Mutates `state` in place with probability `rate` per weight and bias.
pub fn mutate(state: &mut NetworkState, rate: f64, rng: &mut RandomNumberGenerator) {
    for layer in &mut state.hidden {
        mutate_layer(layer, rate, rng);
    }
    mutate_genome(&mut state.genome, rate, rng);
}

fn mutate_layer(layer: &mut LayerState, rate: f64, rng: &mut RandomNumberGenerator) {
    // draw the selection first so only the chosen values are visited
    let weight_lookup: Vec<(usize, usize)> = layer
        .weights
        .iter()
        .enumerate()
        .flat_map(|(n, row)| (0..row.len()).map(move |k| (n, k)))
        .filter(|_| rng.probability(rate))
        .collect();
    for (n, k) in weight_lookup {
        let up = rng.coin();
        layer.weights[n][k] = scale(layer.weights[n][k], rate, up);
    }

    let bias_lookup: Vec<usize> = (0..layer.biases.len())
        .filter(|_| rng.probability(rate))
        .collect();
    for n in bias_lookup {
        let up = rng.coin();
        layer.biases[n] = scale(layer.biases[n], rate, up);
    }
}

/// Mutates the hyperparameters of a genome. The hidden layer shape is kept.
pub fn mutate_genome(genome: &mut Genome, rate: f64, rng: &mut RandomNumberGenerator) {
    genome.activation = mutate_activation(genome.activation, rate, rng);
    genome.binary_thresh = mutate_unit_value(genome.binary_thresh, rate, rng);
    genome.leaky_relu_alpha = mutate_unit_value(genome.leaky_relu_alpha, rate, rng);
}

/// Redraws the activation. The incumbent gets weight `len - rate`, every other
/// activation `rate / (len - 1)`.
pub fn mutate_activation(
    current: Activation,
    rate: f64,
    rng: &mut RandomNumberGenerator,
) -> Activation {
    let count = Activation::ALL.len();
    let mut items = Vec::with_capacity(count);
    items.push(current);
    items.extend(Activation::ALL.iter().copied().filter(|a| *a != current));

    let part = rate / (count - 1) as f64;
    let mut weights = vec![part; count];
    weights[0] = count as f64 - rate;

    let distribution = create_distribution(&items, &weights, ACTIVATION_DISTRIBUTION_SIZE);
    if distribution.is_empty() {
        return current;
    }
    distribution[rng.rand_int(0, distribution.len())]
}

/// Scales a value that must stay inside `(0, 1]`, flipping the direction when
/// the first choice would leave the range. The value is kept when both
/// directions leave it.
fn mutate_unit_value(value: f64, rate: f64, rng: &mut RandomNumberGenerator) -> f64 {
    let in_range = |v: f64| v > 0.0 && v <= 1.0;
    let up = rng.coin();
    let mutated = scale(value, rate, up);
    if in_range(mutated) {
        return mutated;
    }
    let flipped = scale(value, rate, !up);
    if in_range(flipped) {
        flipped
    } else {
        value
    }
}

fn scale(value: f64, rate: f64, up: bool) -> f64 {
    if up {
        value * (1.0 + rate)
    } else {
        value * (1.0 - rate)
    }
}
