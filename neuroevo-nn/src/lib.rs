//! # neuroevo-nn
//! Neural networks for the [`neuroevo`] crate.
//!
//! Provides two network designs:
//! - [`NNGenome`]: an evolvable topology implementing `neuroevo`'s
//!   `Genome` trait, grown through innovation-tracked node and
//!   connection additions and evaluated directly.
//! - [`FeedForwardNetwork`]: a fixed `input → hidden → output` topology
//!   over [`Matrix`] weights, evolved by weight perturbation or
//!   trained by gradient descent.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//! [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork
//! [`Matrix`]: crate::matrix::Matrix
//!
//! # Example usage: Evolution of an AND gate
//! ```
//! use neuroevo::{Population, PopulationConfig};
//! use neuroevo_nn::genomics::{GeneticConfig, NNGenome};
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_and(genome: &NNGenome) -> f64 {
//!     let cases = [
//!         ([0.0, 0.0], 0.0),
//!         ([0.0, 1.0], 0.0),
//!         ([1.0, 0.0], 0.0),
//!         ([1.0, 1.0], 1.0),
//!     ];
//!     let error: f64 = cases
//!         .iter()
//!         .map(|(input, expected)| (genome.predict(input)[0] - expected).abs())
//!         .sum();
//!     (4.0 - error).powi(2)
//! }
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     max_connection_addition_attempts: 10,
//!     ..GeneticConfig::default()
//! };
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(100).unwrap(),
//! };
//!
//! let mut population = Population::<_, _, NNGenome>::new(population_config, genetic_config);
//! for _ in 0..50 {
//!     population.evaluate_fitness(evaluate_and);
//!     if let Err(e) = population.evolve() {
//!         eprintln!("{}", e);
//!         break;
//!     }
//! }
//! population.evaluate_fitness(evaluate_and);
//! println!("{}", serde_json::to_string(population.champion()).unwrap());
//! ```

pub mod activation;
pub mod genomics;
pub mod matrix;
pub mod networks;

/// Identifier type used to designate historically
/// identical mutations for the purposes of
/// genome alignment during crossover.
pub type Innovation = usize;

/// Identifier type of a node within a genome.
pub type NodeId = usize;
