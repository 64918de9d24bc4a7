//! # Individual
//!
//! An [`Individual`] is one slot of a population: a network state together with
//! the error its last training run reached and the fitness derived from its shape.

use crate::{
    genome::Genome,
    network::NetworkState,
};

/// Error assigned to individuals that have not been trained yet or whose
/// training failed. Sorting by error puts them last.
pub const MAX_ERROR: f64 = f64::MAX;

/// A network state plus its evaluation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub state: NetworkState,
    /// Training error reported for the last generation.
    pub error: f64,
    /// Derived score; only used for ordering.
    pub fitness: f64,
}

impl Individual {
    /// Wraps an untrained state.
    pub fn new(state: NetworkState) -> Self {
        Self {
            state,
            error: MAX_ERROR,
            fitness: 0.0,
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.state.genome
    }

    pub fn hidden_layers(&self) -> &[usize] {
        &self.state.genome.hidden_layers
    }

    /// Whether the last training run of this individual failed or never happened.
    pub fn is_disqualified(&self) -> bool {
        self.error >= MAX_ERROR
    }
}

/// Individuals evaluated and bred together in one generation.
pub type Population = Vec<Individual>;
