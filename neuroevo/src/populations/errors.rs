use std::error::Error;
use std::fmt;

/// An error type indicating that a population
/// could not be evolved. The population is left
/// untouched when evolution fails.
#[derive(Debug, Clone, PartialEq)]
pub enum EvolutionError {
    /// The genome at the contained index
    /// has a NaN or infinite fitness, which
    /// has no place on the selection wheel.
    InvalidFitness(usize),
    /// No genome could be selected as a parent.
    DegeneratePopulation,
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFitness(index) => {
                write!(f, "non-finite fitness detected for genome {}", index)
            }
            Self::DegeneratePopulation => write!(f, "attempted evolution on degenerate population"),
        }
    }
}

impl Error for EvolutionError {}
