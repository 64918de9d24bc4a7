//! Run state and the result handed back to the caller.

use std::time::{Duration, Instant};

use crate::{
    error::{GeneticError, OptionExt, Result},
    individual::{Individual, MAX_ERROR},
};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionStatus {
    /// The best error reached the training error threshold.
    Converged,
    /// The generation budget ran out.
    Exhausted,
    /// The cancellation token was triggered.
    Cancelled,
}

/// Diagnostic counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceUsage {
    pub elapsed: Duration,
    pub networks_trained: usize,
    pub training_failures: usize,
    /// Weights and biases of the current best network.
    pub best_parameters: usize,
}

/// Result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub best: Individual,
    pub error: f64,
    /// Generations that were trained, the last one included.
    pub generations: usize,
    pub status: EvolutionStatus,
    pub usage: ResourceUsage,
}

/// State of a running evolution. Lives for one call to `evolve`.
#[derive(Debug)]
pub(crate) struct EvolutionState {
    pub generation: usize,
    pub best: Option<Individual>,
    pub error: f64,
    pub usage: ResourceUsage,
    started: Instant,
}

impl EvolutionState {
    pub fn new() -> Self {
        Self {
            generation: 0,
            best: None,
            error: MAX_ERROR,
            usage: ResourceUsage::default(),
            started: Instant::now(),
        }
    }

    pub fn record_training(&mut self, trained: usize, failures: usize) {
        self.usage.networks_trained += trained;
        self.usage.training_failures += failures;
        self.usage.elapsed = self.started.elapsed();
    }

    pub fn record_best(&mut self, best: Individual) {
        self.error = best.error;
        self.usage.best_parameters = best.state.parameter_count();
        self.best = Some(best);
    }

    /// Consumes the state. Fails if no generation produced a best individual.
    pub fn finish(mut self, status: EvolutionStatus) -> Result<EvolutionResult> {
        self.usage.elapsed = self.started.elapsed();
        let best = self
            .best
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        Ok(EvolutionResult {
            error: best.error,
            best,
            generations: self.generation,
            status,
            usage: self.usage,
        })
    }
}
