//! # Dataset
//!
//! A [`Dataset`] is an ordered list of [`Sample`]s whose inputs and outputs are
//! normalized to `[0, 1]`. It is the only thing the evolution loop trains on.
//!
//! Raw domain values (pixel bytes, indices) are mapped into that range with the
//! affine [`encode`] and mapped back with [`decode`].
//!
//! ## Example
//!
//! ```rust
//! use neurogen::data::{Dataset, Sample};
//!
//! let data = Dataset::new(vec![
//!     Sample::new(vec![0.0], vec![1.0]),
//!     Sample::new(vec![1.0], vec![0.0]),
//! ])
//! .unwrap();
//!
//! assert_eq!(data.input_size(), 1);
//! assert_eq!(data.output_size(), 1);
//! ```

use std::path::{Path, PathBuf};

use crate::error::{GeneticError, Result};

/// Maps `value` from `[min, max]` into `[0, 1]`.
pub fn encode(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Maps an encoded value from `[0, 1]` back into `[min, max]`.
pub fn decode(encoded: f64, min: f64, max: f64) -> f64 {
    max * encoded - min * encoded + min
}

/// One training pair.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> Self {
        Self { input, output }
    }
}

/// Input and output dimensionality shared by every sample of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSizes {
    pub input_size: usize,
    pub output_size: usize,
}

/// A validated, non-empty collection of samples.
///
/// The only way to obtain one is through the validating constructors, so every
/// `Dataset` has at least one sample, consistent sizes and finite values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
    sizes: DataSizes,
    location: Option<PathBuf>,
}

impl Dataset {
    /// Validates `samples` and wraps them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::InvalidDataset`] if there are no samples, if the
    /// first sample has an empty input or output, if any sample's sizes differ
    /// from the first one, or if any value is not a finite number in `[0, 1]`.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        let first = samples.first().ok_or_else(|| {
            GeneticError::InvalidDataset("dataset contains no samples".to_string())
        })?;

        let sizes = DataSizes {
            input_size: first.input.len(),
            output_size: first.output.len(),
        };
        if sizes.input_size == 0 || sizes.output_size == 0 {
            return Err(GeneticError::InvalidDataset(
                "samples need at least one input and one output value".to_string(),
            ));
        }

        for (index, sample) in samples.iter().enumerate() {
            if sample.input.len() != sizes.input_size || sample.output.len() != sizes.output_size {
                return Err(GeneticError::InvalidDataset(format!(
                    "sample {} has shape {}→{}, expected {}→{}",
                    index,
                    sample.input.len(),
                    sample.output.len(),
                    sizes.input_size,
                    sizes.output_size
                )));
            }
            let in_range = |v: &f64| v.is_finite() && (0.0..=1.0).contains(v);
            if !sample.input.iter().all(in_range) || !sample.output.iter().all(in_range) {
                return Err(GeneticError::InvalidDataset(format!(
                    "sample {} contains values outside [0, 1]",
                    index
                )));
            }
        }

        Ok(Self {
            samples,
            sizes,
            location: None,
        })
    }

    /// Builds a dataset that maps each sample's index to its raw output vector.
    ///
    /// Sample `i` of `n` gets the single input `encode(i, 0, n - 1)` (or `0` when
    /// there is only one sample) and its outputs encoded from `[0, max]`. This is
    /// the layout used to teach a network to reproduce a set of images.
    pub fn from_indexed_outputs<T>(outputs: &[Vec<T>], max: f64) -> Result<Self>
    where
        T: Copy + Into<f64>,
    {
        if max <= 0.0 || !max.is_finite() {
            return Err(GeneticError::InvalidDataset(format!(
                "maximum raw value must be positive, got {}",
                max
            )));
        }

        let last_index = outputs.len().saturating_sub(1);
        let samples = outputs
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let input = if last_index == 0 {
                    0.0
                } else {
                    encode(index as f64, 0.0, last_index as f64)
                };
                let output = raw.iter().map(|&v| encode(v.into(), 0.0, max)).collect();
                Sample::new(vec![input], output)
            })
            .collect();

        Self::new(samples)
    }

    /// Records where the samples were read from.
    pub fn with_location(mut self, location: impl AsRef<Path>) -> Self {
        self.location = Some(location.as_ref().to_path_buf());
        self
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sizes(&self) -> DataSizes {
        self.sizes
    }

    pub fn input_size(&self) -> usize {
        self.sizes.input_size
    }

    pub fn output_size(&self) -> usize {
        self.sizes.output_size
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Decodes every sample's outputs back into `[0, max]`.
    pub fn decode_outputs(&self, max: f64) -> Vec<Vec<f64>> {
        self.samples
            .iter()
            .map(|sample| decode_vector(&sample.output, max))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Decodes a vector of network outputs into `[0, max]`, clamping to the range.
pub fn decode_vector(encoded: &[f64], max: f64) -> Vec<f64> {
    encoded
        .iter()
        .map(|&v| decode(v.clamp(0.0, 1.0), 0.0, max))
        .collect()
}
