//! # Breeding
//!
//! Breeding turns the elite of one generation into the population of the next.
//! The [`BreedStrategy`] trait is the seam; [`MixedStrategy`] mates elite pairs
//! and fills the remaining slots with freshly spawned networks.
//!
//! This module also holds the two operations every strategy builds on:
//! [`spawn`], which creates random untrained individuals, and [`mate`], which
//! crosses over the hidden layers of two network states.

pub mod mixed;

use std::fmt::Debug;

use crate::{
    data::DataSizes,
    error::Result,
    evolution::options::EvolutionOptions,
    genome::Genome,
    individual::{Individual, Population},
    network::{LayerState, NetworkOptions, NetworkState, Trainable},
    rng::RandomNumberGenerator,
    sequence::{crossover, quarter_pivots},
};

pub use mixed::MixedStrategy;

/// Strategy responsible for producing the next generation from the elite.
pub trait BreedStrategy<N: Trainable>
where
    Self: Debug + Clone + Send + Sync,
{
    /// Breeds a new population from `elite`.
    ///
    /// ## Errors
    ///
    /// This method can fail if:
    /// - The elite is empty but offspring have to be mated from it
    /// - A fresh network cannot be constructed
    fn breed(
        &self,
        elite: &[Individual],
        sizes: DataSizes,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population>;
}

/// Creates `size` initialized but untrained individuals with random genomes.
pub fn spawn<N: Trainable>(
    size: usize,
    sizes: DataSizes,
    max_layers: usize,
    max_neurons: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<Population> {
    (0..size)
        .map(|_| {
            let genome = Genome::random(rng, max_layers, max_neurons);
            let mut network = N::new(&NetworkOptions::new(genome, sizes))?;
            network.initialize(rng);
            Ok(Individual::new(network.to_state()))
        })
        .collect()
}

/// Crosses over the hidden layers two states share, in place.
///
/// Pivots sit at 25, 50 and 75 percent of the shorter weight and bias lengths.
/// Layers past the shallower network's depth are left alone, and every matrix
/// keeps its shape.
pub fn mate(a: &mut NetworkState, b: &mut NetworkState) {
    for (layer_a, layer_b) in a.hidden.iter_mut().zip(b.hidden.iter_mut()) {
        mate_layer(layer_a, layer_b);
    }
}

fn mate_layer(a: &mut LayerState, b: &mut LayerState) {
    if a.fan_in() == b.fan_in() {
        // rows have the same width, so whole neurons can change sides
        let rows = a.weights.len().min(b.weights.len());
        crossover(&mut a.weights, &mut b.weights, &quarter_pivots(rows));
    } else {
        for (row_a, row_b) in a.weights.iter_mut().zip(b.weights.iter_mut()) {
            let columns = row_a.len().min(row_b.len());
            crossover(row_a, row_b, &quarter_pivots(columns));
        }
    }

    let biases = a.biases.len().min(b.biases.len());
    crossover(&mut a.biases, &mut b.biases, &quarter_pivots(biases));
}
