//! # MixedStrategy
//!
//! The `MixedStrategy` fills a share of the next generation with mated and
//! mutated offspring of the elite, and the rest with freshly spawned random
//! networks. [`EvolutionOptions::mix_rands`] sets the number of mating rounds,
//! each of which yields two children.
use super::{mate, spawn, BreedStrategy};
use crate::{
    data::DataSizes,
    error::{GeneticError, Result},
    evolution::options::EvolutionOptions,
    individual::{Individual, Population},
    mutation::mutate,
    network::Trainable,
    rng::RandomNumberGenerator,
};

/// Mates elite pairs and injects random individuals for diversity.
#[derive(Debug, Clone, Default)]
pub struct MixedStrategy {
    // No fields needed
}

impl MixedStrategy {
    /// Creates a new `MixedStrategy` instance.
    pub fn new() -> Self {
        Self {}
    }

    /// Number of mating rounds: `N - ceil(N - N * mix_rands)` for a population
    /// of `N`. Each round yields two children.
    pub fn mating_rounds(population_size: usize, mix_rands: f64) -> usize {
        let size = population_size as f64;
        let rands = (size - size * mix_rands).ceil();
        if !rands.is_finite() {
            return 0;
        }
        population_size - (rands.max(0.0) as usize).min(population_size)
    }
}

impl<N: Trainable> BreedStrategy<N> for MixedStrategy {
    /// Breeds exactly `options.effective_population_size()` individuals.
    ///
    /// Runs [`mating_rounds`](MixedStrategy::mating_rounds) rounds. Each draws
    /// two parents uniformly from `elite` with replacement, crosses clones of
    /// them over with [`mate`] and mutates both children with
    /// `options.mutation_rate()`. The children come first, truncated to the
    /// population size, and [`spawn`] fills the remaining slots.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneticError::EmptyPopulation`] if `elite` is empty while
    /// offspring have to be mated.
    fn breed(
        &self,
        elite: &[Individual],
        sizes: DataSizes,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let population_size = options.effective_population_size();
        let rounds = Self::mating_rounds(population_size, options.mix_rands());
        if rounds > 0 && elite.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut brood = Vec::with_capacity(2 * rounds + population_size);
        for _ in 0..rounds {
            let parent_a = &elite[rng.rand_int(0, elite.len())];
            let parent_b = &elite[rng.rand_int(0, elite.len())];

            let mut child_a = parent_a.state.clone();
            let mut child_b = parent_b.state.clone();
            mate(&mut child_a, &mut child_b);
            mutate(&mut child_a, options.mutation_rate(), rng);
            mutate(&mut child_b, options.mutation_rate(), rng);

            brood.push(Individual::new(child_a));
            brood.push(Individual::new(child_b));
        }
        brood.truncate(population_size);

        let fresh = spawn::<N>(
            population_size - brood.len(),
            sizes,
            options.max_layers(),
            options.max_neurons(),
            rng,
        )?;
        brood.extend(fresh);

        Ok(brood)
    }
}
