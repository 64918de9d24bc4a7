use std::{
    marker::PhantomData,
    panic::{catch_unwind, AssertUnwindSafe},
};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{
    cancel::CancellationToken,
    options::{EvolutionOptions, LogLevel},
    state::{EvolutionResult, EvolutionState, EvolutionStatus},
    Progress,
};
use crate::{
    breeding::{spawn, BreedStrategy, MixedStrategy},
    data::Dataset,
    error::{GeneticError, OptionExt, Result},
    fitness::{sort_population, Challenge, StructuralChallenge},
    individual::{Individual, Population, MAX_ERROR},
    network::{FeedForwardNetwork, NetworkState, Trainable, TrainingOptions, TrainingProgress},
    rng::RandomNumberGenerator,
    selection::{elite_count, ElitistSelection},
};

/// Runs the generational loop with a breeding strategy and a challenge.
///
/// `N` is the network implementation each individual is trained with. The
/// launcher never holds a network; states are turned into networks for the
/// duration of one training run.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<N, Strategy, Chall>
where
    N: Trainable,
    Strategy: BreedStrategy<N>,
    Chall: Challenge,
{
    strategy: Strategy,
    challenge: Chall,
    selection: ElitistSelection,
    _marker: PhantomData<fn() -> N>,
}

/// Launcher for [`FeedForwardNetwork`] with [`MixedStrategy`] breeding and
/// [`StructuralChallenge`] scoring.
pub type DefaultLauncher = EvolutionLauncher<FeedForwardNetwork, MixedStrategy, StructuralChallenge>;

impl Default for DefaultLauncher {
    fn default() -> Self {
        Self::new(MixedStrategy::new(), StructuralChallenge)
    }
}

impl<N, Strategy, Chall> EvolutionLauncher<N, Strategy, Chall>
where
    N: Trainable,
    Strategy: BreedStrategy<N>,
    Chall: Challenge,
{
    /// Creates a new `EvolutionLauncher` instance with the specified breeding strategy and challenge.
    ///
    /// # Arguments
    ///
    /// * `strategy` - The breeding strategy used for producing each next generation.
    /// * `challenge` - The challenge used to score trained individuals.
    pub fn new(strategy: Strategy, challenge: Chall) -> Self {
        Self {
            strategy,
            challenge,
            selection: ElitistSelection::new(),
            _marker: PhantomData,
        }
    }

    /// Evolves a population against `data` until it converges or runs out of generations.
    ///
    /// See [`evolve_with`](Self::evolve_with) for details.
    pub fn evolve(
        &self,
        data: &Dataset,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        self.evolve_with(data, options, rng, &CancellationToken::new(), |_| {})
    }

    /// Evolves a population against `data`.
    ///
    /// Every generation trains each individual, scores it with the challenge
    /// and sorts the population best first. `on_progress` is called on the
    /// caller's thread every `options.callback_period()` generations, after the
    /// whole generation has been trained. The run then stops if `cancel` was
    /// triggered, if the best error reached `options.training().error_thresh`,
    /// or if `options.max_generations()` generations have been trained.
    /// Otherwise the elite breeds the next generation.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The options are invalid
    /// - The breeding strategy fails
    /// - A generation ends without a best individual
    ///
    /// A network that fails to build, fails to train or panics does not abort
    /// the run. The individual is disqualified with [`MAX_ERROR`] instead.
    ///
    /// # Performance
    ///
    /// Generations of at least `options.parallel_threshold()` individuals are
    /// trained in parallel with Rayon. Each result stays in its slot.
    pub fn evolve_with<F>(
        &self,
        data: &Dataset,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<EvolutionResult>
    where
        F: FnMut(&Progress<'_>),
    {
        options.validate()?;
        if options.population_size() == 0 {
            warn!(
                population_size = options.effective_population_size(),
                "Population size is zero, using the minimum"
            );
        }

        let sizes = data.sizes();
        let mut state = EvolutionState::new();
        let mut population = spawn::<N>(
            options.effective_population_size(),
            sizes,
            options.max_layers(),
            options.max_neurons(),
            rng,
        )?;

        loop {
            state.generation += 1;

            let failures = train_population::<N>(
                &mut population,
                data,
                options.training(),
                options.parallel_threshold(),
            );
            state.record_training(population.len(), failures);

            for individual in population.iter_mut() {
                individual.fitness = self.challenge.score(individual, options);
            }
            sort_population(&mut population);

            let best = population.first().cloned().ok_or_else_genetic(|| {
                GeneticError::EmptyPopulation
            })?;
            state.record_best(best);

            self.log_generation(&state, &population, options);

            let period = options.callback_period();
            if period > 0 && state.generation % period == 0 {
                if let Some(best) = state.best.as_ref() {
                    on_progress(&Progress {
                        generation: state.generation,
                        error: state.error,
                        best,
                    });
                }
            }

            if cancel.is_cancelled() {
                return state.finish(EvolutionStatus::Cancelled);
            }
            if state.error <= options.training().error_thresh {
                return state.finish(EvolutionStatus::Converged);
            }
            if state.generation >= options.max_generations() {
                return state.finish(EvolutionStatus::Exhausted);
            }

            let elite = self.selection.select(
                &population,
                elite_count(population.len(), options.elitism()),
            )?;
            population = self.strategy.breed(&elite, sizes, options, rng)?;
        }
    }

    fn log_generation(
        &self,
        state: &EvolutionState,
        population: &[Individual],
        options: &EvolutionOptions,
    ) {
        match options.log_level() {
            LogLevel::None => {}
            LogLevel::Minimal | LogLevel::Verbose => {
                info!(
                    generation = state.generation,
                    error = state.error,
                    failures = state.usage.training_failures,
                    "Generation trained"
                );
                if options.log_level() == LogLevel::Verbose {
                    for (rank, individual) in population.iter().enumerate() {
                        debug!(
                            generation = state.generation,
                            rank,
                            error = individual.error,
                            fitness = individual.fitness,
                            activation = %individual.genome().activation,
                            hidden_layers = ?individual.hidden_layers(),
                            "Individual"
                        );
                    }
                }
            }
        }
    }
}

/// Trains every individual in place and returns the number of failures.
fn train_population<N: Trainable>(
    population: &mut Population,
    data: &Dataset,
    training: &TrainingOptions,
    parallel_threshold: usize,
) -> usize {
    if population.len() >= parallel_threshold {
        population
            .par_iter_mut()
            .map(|individual| train_individual::<N>(individual, data, training))
            .filter(|trained| !trained)
            .count()
    } else {
        population
            .iter_mut()
            .map(|individual| train_individual::<N>(individual, data, training))
            .filter(|trained| !trained)
            .count()
    }
}

/// Trains one individual. On failure the state is kept and the error set to
/// [`MAX_ERROR`].
fn train_individual<N: Trainable>(
    individual: &mut Individual,
    data: &Dataset,
    training: &TrainingOptions,
) -> bool {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        train_state::<N>(&individual.state, data, training)
    }));

    let failure = match outcome {
        Ok(Ok((state, error))) if !error.is_nan() => {
            individual.state = state;
            individual.error = error;
            return true;
        }
        Ok(Ok((_, error))) => format!("training reported error {}", error),
        Ok(Err(e)) => e.to_string(),
        Err(_) => "training panicked".to_string(),
    };

    warn!(
        hidden_layers = ?individual.hidden_layers(),
        reason = %failure,
        "Training failed, individual disqualified"
    );
    individual.error = MAX_ERROR;
    false
}

/// Training runs with a callback period of one, so the reported error is the one
/// from the final iteration. The summary error is used when no iteration ran.
fn train_state<N: Trainable>(
    state: &NetworkState,
    data: &Dataset,
    training: &TrainingOptions,
) -> Result<(NetworkState, f64)> {
    let training = TrainingOptions {
        callback_period: 1,
        ..training.clone()
    };
    let mut network = N::from_state(state)?;
    let mut reported = None;
    let summary = network.train(data, &training, &mut |progress: &TrainingProgress| {
        reported = Some(progress.error)
    })?;
    Ok((network.to_state(), reported.unwrap_or(summary.error)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sample;

    fn xor() -> Dataset {
        Dataset::new(vec![
            Sample::new(vec![0.0, 0.0], vec![0.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0]),
            Sample::new(vec![1.0, 1.0], vec![0.0]),
        ])
        .unwrap()
    }

    fn small_options() -> EvolutionOptions {
        EvolutionOptions::builder()
            .max_generations(3)
            .population_size(6)
            .max_layers(2)
            .max_neurons(4)
            .training(TrainingOptions::builder().iterations(50).build())
            .build()
    }

    #[test]
    fn test_train_individual_sets_error() {
        let mut rng = RandomNumberGenerator::from_seed(61);
        let data = xor();
        let mut population =
            spawn::<FeedForwardNetwork>(1, data.sizes(), 1, 3, &mut rng).unwrap();
        let trained = train_individual::<FeedForwardNetwork>(
            &mut population[0],
            &data,
            &TrainingOptions::builder().iterations(20).build(),
        );
        assert!(trained);
        assert!(population[0].error.is_finite());
        assert!(population[0].error >= 0.0);
    }

    #[test]
    fn test_recorded_error_is_final_iteration_error() {
        let data = xor();
        // 15 iterations with a period of 10 leaves five iterations after the last tick.
        let training = TrainingOptions::builder()
            .iterations(15)
            .error_thresh(0.0)
            .callback_period(10)
            .build();
        for seed in 0..4 {
            let mut rng = RandomNumberGenerator::from_seed(seed);
            let mut population =
                spawn::<FeedForwardNetwork>(1, data.sizes(), 2, 4, &mut rng).unwrap();

            let mut network = FeedForwardNetwork::from_state(&population[0].state).unwrap();
            let summary = network.train(&data, &training, &mut |_| {}).unwrap();

            assert!(train_individual::<FeedForwardNetwork>(
                &mut population[0],
                &data,
                &training
            ));
            assert_eq!(summary.iterations, 15);
            assert_eq!(population[0].error, summary.error);
            assert_eq!(population[0].state, network.to_state());
        }
    }

    #[test]
    fn test_parallel_and_sequential_training_agree() {
        let data = xor();
        let training = TrainingOptions::builder().iterations(30).build();
        let mut rng = RandomNumberGenerator::from_seed(62);
        let spawned = spawn::<FeedForwardNetwork>(5, data.sizes(), 2, 4, &mut rng).unwrap();

        let mut sequential = spawned.clone();
        let mut parallel = spawned;
        train_population::<FeedForwardNetwork>(&mut sequential, &data, &training, usize::MAX);
        train_population::<FeedForwardNetwork>(&mut parallel, &data, &training, 0);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_evolve_is_exhausted_after_max_generations() {
        let mut rng = RandomNumberGenerator::from_seed(63);
        let launcher = DefaultLauncher::default();
        let result = launcher.evolve(&xor(), &small_options(), &mut rng).unwrap();
        assert_eq!(result.status, EvolutionStatus::Exhausted);
        assert_eq!(result.generations, 3);
        assert_eq!(result.usage.networks_trained, 18);
        assert_eq!(result.error, result.best.error);
    }

    #[test]
    fn test_evolve_converges_with_loose_threshold() {
        let mut rng = RandomNumberGenerator::from_seed(64);
        let mut options = small_options();
        options.set_training(
            TrainingOptions::builder()
                .iterations(10)
                .error_thresh(1.0)
                .build(),
        );
        let result = DefaultLauncher::default()
            .evolve(&xor(), &options, &mut rng)
            .unwrap();
        assert_eq!(result.status, EvolutionStatus::Converged);
        assert_eq!(result.generations, 1);
    }

    #[test]
    fn test_evolve_rejects_invalid_options() {
        let mut rng = RandomNumberGenerator::from_seed(65);
        let options = EvolutionOptions::builder().elitism(0.0).build();
        let result = DefaultLauncher::default().evolve(&xor(), &options, &mut rng);
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }
}
