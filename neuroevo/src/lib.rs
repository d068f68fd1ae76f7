//! A generational genetic algorithm for evolving neural networks,
//! driven by fitness collected from an external simulation loop.
//!
//! The population is deliberately simple: a single global pool of
//! genomes (no species), fitness-proportionate ("roulette wheel")
//! parent selection, and a genome-defined mating operator that performs
//! crossover and mutation. Genomic structure is left to implementors of
//! the [`Genome`] trait; an evolvable neural network genome is supplied
//! by the `neuroevo-nn` crate.
//!
//! The intended driving loop is: let the simulation run one epoch,
//! accumulating each genome's fitness as its actor earns reward, then
//! call [`Population::evolve`] once every actor has terminated.
//!
//! # Example usage: Evolution of a network that outputs its input's negation
//! ```
//! use neuroevo::{Population, PopulationConfig};
//! use neuroevo_nn::genomics::{GeneticConfig, NNGenome};
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_negation(genome: &NNGenome) -> f64 {
//!     let cases = [([0.0, 1.0], 1.0), ([1.0, 1.0], 0.0)];
//!     cases
//!         .iter()
//!         .map(|(input, expected)| 1.0 - (genome.predict(input)[0] - expected).abs())
//!         .sum()
//! }
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     ..GeneticConfig::default()
//! };
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(50).unwrap(),
//! };
//!
//! let mut population = Population::<_, _, NNGenome>::with_seed(population_config, genetic_config, 7);
//! for _ in 0..20 {
//!     population.evaluate_fitness(evaluate_negation);
//!     if let Err(e) = population.evolve() {
//!         eprintln!("{}", e);
//!         break;
//!     }
//! }
//! assert_eq!(population.generation(), 20);
//! ```

mod genome;
mod populations;

pub use genome::*;
pub use populations::*;
