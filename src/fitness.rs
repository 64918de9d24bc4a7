//! # Fitness
//!
//! Fitness rewards small networks. For hidden layers `n_1..n_k`:
//!
//! ```text
//! fitness = 1 - (Σ n_i / max_neurons) / max_layers
//! ```
//!
//! The score never feeds back into training. Populations are ordered by training
//! error first (ascending) and by fitness second (descending), so fitness only
//! decides between individuals that reached the same error.

use std::cmp::Ordering;

use crate::{evolution::EvolutionOptions, individual::Individual};

/// Scores a trained individual.
pub trait Challenge: Send + Sync {
    fn score(&self, individual: &Individual, options: &EvolutionOptions) -> f64;
}

/// Scores individuals by the structural formula of this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralChallenge;

impl Challenge for StructuralChallenge {
    fn score(&self, individual: &Individual, options: &EvolutionOptions) -> f64 {
        structural_fitness(
            individual.hidden_layers(),
            options.max_layers(),
            options.max_neurons(),
        )
    }
}

/// `1 - (Σ neurons / max_neurons) / max_layers`.
pub fn structural_fitness(hidden_layers: &[usize], max_layers: usize, max_neurons: usize) -> f64 {
    let max_layers = max_layers.max(1) as f64;
    let max_neurons = max_neurons.max(1) as f64;
    let layer_fitness: f64 = hidden_layers
        .iter()
        .map(|&neurons| neurons as f64 / max_neurons)
        .sum();
    1.0 - layer_fitness / max_layers
}

/// Error ascending, then fitness descending. NaN sorts last in both keys.
pub fn compare(a: &Individual, b: &Individual) -> Ordering {
    ascending_nan_last(a.error, b.error).then_with(|| ascending_nan_last(b.fitness, a.fitness))
}

/// Sorts a population best first.
pub fn sort_population(population: &mut [Individual]) {
    population.sort_by(compare);
}

fn ascending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        genome::Genome,
        network::{LayerState, NetworkState},
    };

    fn individual(hidden_layers: Vec<usize>, error: f64, fitness: f64) -> Individual {
        let hidden = hidden_layers
            .iter()
            .scan(1, |fan_in, &n| {
                let layer = LayerState::zeroed(n, *fan_in);
                *fan_in = n;
                Some(layer)
            })
            .collect();
        let last = *hidden_layers.last().unwrap_or(&1);
        Individual {
            state: NetworkState {
                input_size: 1,
                output_size: 1,
                genome: Genome {
                    hidden_layers,
                    ..Genome::default()
                },
                hidden,
                output: LayerState::zeroed(1, last),
            },
            error,
            fitness,
        }
    }

    #[test]
    fn test_structural_fitness() {
        assert_eq!(structural_fitness(&[4], 2, 4), 0.5);
        assert_eq!(structural_fitness(&[4, 4], 2, 4), 0.0);
        assert_eq!(structural_fitness(&[1, 2], 2, 4), 1.0 - 0.75 / 2.0);
    }

    #[test]
    fn test_smaller_networks_score_higher() {
        let options = EvolutionOptions::builder().max_layers(3).max_neurons(8).build();
        let small = individual(vec![2], 0.1, 0.0);
        let large = individual(vec![8, 8], 0.1, 0.0);
        let challenge = StructuralChallenge;
        assert!(challenge.score(&small, &options) > challenge.score(&large, &options));
    }

    #[test]
    fn test_sort_by_error_then_fitness() {
        let mut population = vec![
            individual(vec![1], 0.3, 0.9),
            individual(vec![1], 0.1, 0.2),
            individual(vec![1], 0.1, 0.8),
            individual(vec![1], f64::NAN, 1.0),
            individual(vec![1], 0.2, 0.5),
        ];
        sort_population(&mut population);

        let keys: Vec<(f64, f64)> = population
            .iter()
            .take(4)
            .map(|i| (i.error, i.fitness))
            .collect();
        assert_eq!(keys, vec![(0.1, 0.8), (0.1, 0.2), (0.2, 0.5), (0.3, 0.9)]);
        assert!(population[4].error.is_nan());
    }
}
