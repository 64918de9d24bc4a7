use crate::error::{GeneticError, Result};
use crate::fitness::compare;
use crate::individual::Individual;

/// Number of elite individuals kept as breeding stock: `max(2, floor(size * elitism))`.
pub fn elite_count(population_size: usize, elitism: f64) -> usize {
    let share = (population_size as f64 * elitism).floor();
    if share.is_finite() && share > 2.0 {
        share as usize
    } else {
        2
    }
}

/// A selection strategy that keeps the best individuals of a population.
///
/// Individuals are ranked with [`compare`](crate::fitness::compare): lowest error
/// first, higher fitness breaking ties.
///
/// # Examples
///
/// ```
/// use neurogen::selection::{elite_count, ElitistSelection};
///
/// assert_eq!(elite_count(128, 0.1), 12);
/// assert_eq!(elite_count(8, 0.1), 2);
///
/// let selection = ElitistSelection::default();
/// assert!(selection.select(&[], 2).is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct ElitistSelection;

impl ElitistSelection {
    pub fn new() -> Self {
        Self
    }

    /// Returns clones of the `num_to_select` best individuals.
    ///
    /// Selects fewer when the population is smaller than `num_to_select`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::EmptyPopulation`] if `population` is empty.
    pub fn select(&self, population: &[Individual], num_to_select: usize) -> Result<Vec<Individual>> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut ranked: Vec<&Individual> = population.iter().collect();
        ranked.sort_by(|a, b| compare(a, b));

        Ok(ranked
            .into_iter()
            .take(num_to_select)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        genome::Genome,
        network::{LayerState, NetworkState},
    };

    fn individual(error: f64) -> Individual {
        Individual {
            state: NetworkState {
                input_size: 1,
                output_size: 1,
                genome: Genome {
                    hidden_layers: vec![1],
                    ..Genome::default()
                },
                hidden: vec![LayerState::zeroed(1, 1)],
                output: LayerState::zeroed(1, 1),
            },
            error,
            fitness: 0.5,
        }
    }

    #[test]
    fn test_elite_count() {
        assert_eq!(elite_count(1, 0.1), 2);
        assert_eq!(elite_count(10, 0.1), 2);
        assert_eq!(elite_count(30, 0.1), 3);
        assert_eq!(elite_count(128, 0.1), 12);
        assert_eq!(elite_count(8, 1.0), 8);
        assert_eq!(elite_count(25, 0.5), 12);
        for size in 1..200 {
            let expected = ((size as f64 * 0.25).floor() as usize).max(2);
            assert_eq!(elite_count(size, 0.25), expected);
        }
    }

    #[test]
    fn test_elitist_selection() {
        let population = vec![
            individual(0.5),
            individual(0.2),
            individual(0.9),
            individual(0.1),
        ];
        let selected = ElitistSelection::new().select(&population, 2).unwrap();
        let errors: Vec<f64> = selected.iter().map(|i| i.error).collect();
        assert_eq!(errors, vec![0.1, 0.2]);
    }

    #[test]
    fn test_elitist_selection_small_population() {
        let population = vec![individual(0.5)];
        let selected = ElitistSelection::new().select(&population, 2).unwrap();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_elitist_selection_empty_population() {
        let result = ElitistSelection::new().select(&[], 3);
        assert!(matches!(result, Err(GeneticError::EmptyPopulation)));
    }
}
