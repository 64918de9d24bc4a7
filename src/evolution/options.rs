//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds every parameter of an evolution run:
//! population size and shape limits, selection and mutation rates, stopping
//! conditions, reporting cadence, and the [`TrainingOptions`] handed to each
//! network.
//!
//! ## Example
//!
//! ```rust
//! use neurogen::evolution::options::{EvolutionOptions, LogLevel};
//! use neurogen::network::TrainingOptions;
//!
//! let options = EvolutionOptions::builder()
//!     .max_generations(5)
//!     .population_size(8)
//!     .max_layers(2)
//!     .max_neurons(4)
//!     .log_level(LogLevel::Minimal)
//!     .training(TrainingOptions::builder().iterations(200).build())
//!     .build();
//!
//! assert!(options.validate().is_ok());
//! assert_eq!(options.population_size(), 8);
//! ```
//!
//! ## Defaults
//!
//! | field | default |
//! |---|---|
//! | `max_generations` | 1024 |
//! | `population_size` | 128 |
//! | `elitism` | 0.1 |
//! | `mutation_rate` | 0.1 |
//! | `mix_rands` | 1/3 |
//! | `max_layers` | 128 |
//! | `max_neurons` | 128 |
//! | `callback_period` | 10 |
//! | `parallel_threshold` | 2 |

use crate::{
    error::{GeneticError, Result},
    network::TrainingOptions,
};

/// Population size used when the configured size is zero.
pub const MIN_POPULATION_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// One event per generation plus one per individual.
    Verbose,
    /// One event per generation.
    Minimal,
    None,
}

#[derive(Debug, Clone)]
pub struct EvolutionOptions {
    max_generations: usize,
    log_level: LogLevel,
    population_size: usize,
    elitism: f64,
    mutation_rate: f64,
    mix_rands: f64,
    max_layers: usize,
    max_neurons: usize,
    /// Generations between progress callbacks
    callback_period: usize,
    /// Minimum population size trained in parallel
    parallel_threshold: usize,
    training: TrainingOptions,
}

impl EvolutionOptions {
    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// The configured population size, which may be zero.
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// The population size actually used: the configured size, or
    /// [`MIN_POPULATION_SIZE`] when it is zero.
    pub fn effective_population_size(&self) -> usize {
        if self.population_size < 1 {
            MIN_POPULATION_SIZE
        } else {
            self.population_size
        }
    }

    /// Share of each generation kept as breeding stock.
    pub fn elitism(&self) -> f64 {
        self.elitism
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Controls how much of each new generation is mated from the elite. A
    /// population of `N` runs `N - ceil(N - N * mix_rands)` mating rounds of two
    /// children each. The remaining slots receive fresh random individuals.
    pub fn mix_rands(&self) -> f64 {
        self.mix_rands
    }

    pub fn max_layers(&self) -> usize {
        self.max_layers
    }

    pub fn max_neurons(&self) -> usize {
        self.max_neurons
    }

    /// Generations between progress callbacks. Zero disables them.
    pub fn callback_period(&self) -> usize {
        self.callback_period
    }

    /// Returns the minimum number of individuals to train in parallel.
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn training(&self) -> &TrainingOptions {
        &self.training
    }

    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_mutation_rate(&mut self, mutation_rate: f64) {
        self.mutation_rate = mutation_rate;
    }

    pub fn set_training(&mut self, training: TrainingOptions) {
        self.training = training;
    }

    /// Checks every field.
    ///
    /// A population size of zero is not an error; see
    /// [`effective_population_size`](Self::effective_population_size).
    pub fn validate(&self) -> Result<()> {
        if self.max_generations == 0 {
            return Err(GeneticError::Configuration(
                "Maximum generations must be greater than zero".to_string(),
            ));
        }
        if !(self.elitism > 0.0 && self.elitism <= 1.0) {
            return Err(GeneticError::Configuration(format!(
                "Elitism must be in (0, 1], got {}",
                self.elitism
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneticError::Configuration(format!(
                "Mutation rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mix_rands) {
            return Err(GeneticError::Configuration(format!(
                "Mix ratio must be in [0, 1], got {}",
                self.mix_rands
            )));
        }
        if self.max_layers == 0 || self.max_neurons == 0 {
            return Err(GeneticError::Configuration(format!(
                "Networks need at least one layer and one neuron, got {} layers of {} neurons",
                self.max_layers, self.max_neurons
            )));
        }
        self.training.validate()
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        EvolutionOptionsBuilder::default().build()
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    max_generations: Option<usize>,
    log_level: Option<LogLevel>,
    population_size: Option<usize>,
    elitism: Option<f64>,
    mutation_rate: Option<f64>,
    mix_rands: Option<f64>,
    max_layers: Option<usize>,
    max_neurons: Option<usize>,
    callback_period: Option<usize>,
    parallel_threshold: Option<usize>,
    training: Option<TrainingOptions>,
}

impl EvolutionOptionsBuilder {
    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn elitism(mut self, value: f64) -> Self {
        self.elitism = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn mix_rands(mut self, value: f64) -> Self {
        self.mix_rands = Some(value);
        self
    }

    pub fn max_layers(mut self, value: usize) -> Self {
        self.max_layers = Some(value);
        self
    }

    pub fn max_neurons(mut self, value: usize) -> Self {
        self.max_neurons = Some(value);
        self
    }

    pub fn callback_period(mut self, value: usize) -> Self {
        self.callback_period = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn training(mut self, value: TrainingOptions) -> Self {
        self.training = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance. Validation happens in
    /// [`EvolutionOptions::validate`].
    pub fn build(self) -> EvolutionOptions {
        EvolutionOptions {
            max_generations: self.max_generations.unwrap_or(1024),
            log_level: self.log_level.unwrap_or(LogLevel::None),
            population_size: self.population_size.unwrap_or(128),
            elitism: self.elitism.unwrap_or(0.1),
            mutation_rate: self.mutation_rate.unwrap_or(0.1),
            mix_rands: self.mix_rands.unwrap_or(1.0 / 3.0),
            max_layers: self.max_layers.unwrap_or(128),
            max_neurons: self.max_neurons.unwrap_or(128),
            callback_period: self.callback_period.unwrap_or(10),
            parallel_threshold: self.parallel_threshold.unwrap_or(2),
            training: self.training.unwrap_or_default(),
        }
    }
}
