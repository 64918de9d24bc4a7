//! # neurogen
//!
//! Neuroevolution of small feed-forward networks. A population of networks
//! with random hidden layer shapes and hyperparameters is trained against a
//! dataset, ranked by training error and size, and bred into the next
//! generation until the error threshold or the generation budget is reached.
//!
//! ## Example
//!
//! ```rust
//! use neurogen::{
//!     data::{Dataset, Sample},
//!     evolution::{DefaultLauncher, EvolutionOptions},
//!     network::TrainingOptions,
//!     rng::RandomNumberGenerator,
//! };
//!
//! let data = Dataset::new(vec![
//!     Sample::new(vec![0.0, 0.0], vec![0.0]),
//!     Sample::new(vec![0.0, 1.0], vec![1.0]),
//!     Sample::new(vec![1.0, 0.0], vec![1.0]),
//!     Sample::new(vec![1.0, 1.0], vec![0.0]),
//! ])?;
//! let options = EvolutionOptions::builder()
//!     .max_generations(2)
//!     .population_size(4)
//!     .max_layers(2)
//!     .max_neurons(4)
//!     .training(TrainingOptions::builder().iterations(100).build())
//!     .build();
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let result = DefaultLauncher::default().evolve(&data, &options, &mut rng)?;
//! assert!(result.error >= 0.0);
//! # Ok::<(), neurogen::GeneticError>(())
//! ```

pub mod breeding;
pub mod data;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod genome;
pub mod individual;
pub mod mutation;
pub mod network;
pub mod rng;
pub mod selection;
pub mod sequence;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{CancellationToken, EvolutionLauncher, EvolutionOptions, EvolutionResult};
