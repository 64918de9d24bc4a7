//! # Error Types
//!
//! This module defines the error type shared by every part of the neuroevolution
//! engine. Errors fall into two groups: those raised before a run starts
//! (invalid datasets, invalid configuration) and those raised while a run is in
//! progress (training failures, an empty population).
//!
//! Training failures are usually not surfaced to the caller of
//! [`evolve`](crate::evolution::EvolutionLauncher::evolve): the loop records them
//! on the affected individual and keeps going. They are still represented here so
//! that [`Trainable`](crate::network::Trainable) implementations can report them.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use neurogen::error::{GeneticError, Result};
//!
//! fn check_rate(rate: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&rate) {
//!         return Err(GeneticError::Configuration(format!("rate {} out of range", rate)));
//!     }
//!     Ok(rate)
//! }
//!
//! assert!(check_rate(0.1).is_ok());
//! assert!(check_rate(1.5).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use neurogen::error::{GeneticError, OptionExt};
//!
//! fn lowest_error(errors: &[f64]) -> neurogen::error::Result<f64> {
//!     errors
//!         .iter()
//!         .cloned()
//!         .reduce(f64::min)
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(lowest_error(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur in the neuroevolution engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// The dataset is empty or its samples are malformed.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Training of a single network failed.
    #[error("Training failure: {0}")]
    TrainingFailure(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A serialized network state does not describe a consistent network.
    #[error("Invalid network state: {0}")]
    InvalidState(String),

    /// Error that occurs when NaN or infinity values are encountered.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// Error raised while encoding or decoding a network state.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for neuroevolution operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use neurogen::error::ResultExt;
///
/// fn parse_generations(raw: &str) -> neurogen::error::Result<usize> {
///     raw.parse::<usize>().context("Failed to parse generation count")
/// }
///
/// assert!(parse_generations("12").is_ok());
/// assert!(parse_generations("twelve").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `GeneticError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
