use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation
/// and mating.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Chance of a single connection's weight
    /// being nudged during mating.
    pub weight_mutation_chance: f64,
    /// Chance of a node addition mutation taking place during mating.
    pub node_addition_mutation_chance: f64,
    /// Chance of a connection addition mutation taking place during mating.
    pub connection_addition_mutation_chance: f64,
    /// Magnitude of bound on the weight nudge uniform distribution.
    pub weight_mutation_power: f64,
    /// Magnitude of bound on the uniform distribution
    /// of initial and newly-added connection weights.
    pub weight_bound: f64,
    /// Maximum number of node pairs tried by a connection
    /// addition mutation before it gives up.
    pub max_connection_addition_attempts: usize,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::GeneticConfig;
    ///
    /// let cfg = GeneticConfig {
    ///     // Specify some values here...
    ///     node_addition_mutation_chance: 1.0,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            weight_mutation_chance: 0.0,
            node_addition_mutation_chance: 0.0,
            connection_addition_mutation_chance: 0.0,
            weight_mutation_power: 0.0,
            weight_bound: 0.0,
            max_connection_addition_attempts: 0,
        }
    }
}

impl Default for GeneticConfig {
    /// A single input and output, with the usual
    /// mutation rates: 0.9 for weight nudges of up
    /// to ±0.1, 0.03 for node additions and 0.05 for
    /// connection additions. Weights start in ±1.
    fn default() -> GeneticConfig {
        GeneticConfig {
            weight_mutation_chance: 0.9,
            node_addition_mutation_chance: 0.03,
            connection_addition_mutation_chance: 0.05,
            weight_mutation_power: 0.1,
            weight_bound: 1.0,
            max_connection_addition_attempts: 1,
            ..GeneticConfig::zero()
        }
    }
}
