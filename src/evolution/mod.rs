//! # Evolution
//!
//! The generational loop: spawn, train, score, sort, select, breed.
//! [`EvolutionLauncher`] drives it, [`EvolutionOptions`] configures it and
//! [`CancellationToken`] stops it from the outside.

pub mod cancel;
pub mod launcher;
pub mod options;
pub mod report;
pub mod state;

use crate::individual::Individual;

pub use cancel::CancellationToken;
pub use launcher::{DefaultLauncher, EvolutionLauncher};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
pub use state::{EvolutionResult, EvolutionStatus, ResourceUsage};

/// Passed to the progress callback of
/// [`EvolutionLauncher::evolve_with`].
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub generation: usize,
    /// Error of the best individual.
    pub error: f64,
    pub best: &'a Individual,
}
