//! A Population is a fixed-size collection of genomes,
//! advanced one generation at a time using the
//! genomes' fitness as the source of selective pressure.
mod config;
mod errors;
pub mod logging;
mod selection;
#[cfg(test)]
mod testing;

use crate::{Genome, InnovationHistory};
pub use config::PopulationConfig;
pub use errors::EvolutionError;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::cmp::Ordering;

/// A population of genomes.
///
/// There is no speciation: every genome competes
/// with every other for a place on the selection wheel.
pub struct Population<C, H, G> {
    genomes: Vec<G>,
    history: H,
    generation: usize,
    population_config: PopulationConfig,
    genetic_config: C,
    rng: StdRng,
}

impl<C, H, G> Population<C, H, G>
where
    H: InnovationHistory<Config = C>,
    G: Genome<InnovationHistory = H, Config = C>,
{
    /// Creates a new population using the passed configurations,
    /// with a randomly-seeded source of randomness.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// let pop_config = PopulationConfig {
    ///     // Set desired configuration
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = GeneticConfig::default();
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(pop_config, genetic_config);
    /// ```
    pub fn new(population_config: PopulationConfig, genetic_config: C) -> Population<C, H, G> {
        Self::with_rng(population_config, genetic_config, StdRng::from_entropy())
    }

    /// Creates a new population whose every random decision
    /// (initial weights, selection, crossover and mutation)
    /// derives from `seed`. Two populations created with
    /// the same seed and configurations, and given the same
    /// fitnesses, evolve identically.
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// let p1 = Population::<_, _, G>::with_seed(PopulationConfig::zero(), genetic_config.clone(), 42);
    /// let p2 = Population::<_, _, G>::with_seed(PopulationConfig::zero(), genetic_config, 42);
    ///
    /// assert_eq!(p1.champion(), p2.champion());
    /// ```
    pub fn with_seed(
        population_config: PopulationConfig,
        genetic_config: C,
        seed: u64,
    ) -> Population<C, H, G> {
        Self::with_rng(population_config, genetic_config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        population_config: PopulationConfig,
        genetic_config: C,
        mut rng: StdRng,
    ) -> Population<C, H, G> {
        let mut history = H::new(&genetic_config);
        let genomes = (0..population_config.size.get())
            .map(|_| G::new(&genetic_config, &mut history, &mut rng))
            .collect();
        Population {
            genomes,
            history,
            generation: 0,
            population_config,
            genetic_config,
            rng,
        }
    }

    /// Evaluates the fitness of each genome in the
    /// population using the passed evaluator.
    ///
    /// This is an alternative to accumulating fitness
    /// through [`genomes_mut`] while a simulation runs.
    ///
    /// [`genomes_mut`]: Population::genomes_mut
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// );
    ///
    /// population.evaluate_fitness(|g| {
    ///     // Networks with outputs closer to 0 are given higher scores.
    ///     let fitness = 1.0 - g.predict(&[1.0])[0];
    ///     fitness
    /// });
    /// ```
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E)
    where
        E: FnMut(&G) -> f64,
    {
        for genome in &mut self.genomes {
            let fitness = evaluator(genome);
            genome.set_fitness(fitness);
        }
    }

    /// Replaces the population with a newly bred generation
    /// of the same size.
    ///
    /// Each child is produced by mating two parents chosen
    /// independently by fitness-proportionate selection;
    /// a genome may be chosen as both parents. If every
    /// genome has zero fitness, parents are chosen uniformly
    /// at random.
    ///
    /// Fitness values are not reset: the children carry
    /// whatever fitness the genome's mating operator gives them.
    ///
    /// # Errors
    /// Returns an error, leaving the population untouched,
    /// if any genome's fitness is NaN or infinite.
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config);
    ///
    /// for genome in population.genomes_mut() {
    ///     // Reward earned during the simulation...
    ///     genome.add_fitness(1.0);
    /// }
    ///
    /// if let Err(e) = population.evolve() {
    ///     eprintln!("{}", e);
    /// }
    /// assert_eq!(population.generation(), 1);
    /// ```
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        if let Some(index) = self.genomes.iter().position(|g| !g.fitness().is_finite()) {
            return Err(EvolutionError::InvalidFitness(index));
        }

        selection::sort_by_decreasing_fitness(&mut self.genomes);
        let total_fitness: f64 = self.genomes.iter().map(G::fitness).sum();

        let size = self.population_config.size.get();
        let mut offspring = Vec::with_capacity(size);
        while offspring.len() < size {
            let parent1 = selection::roulette_wheel(&self.genomes, total_fitness, &mut self.rng)
                .ok_or(EvolutionError::DegeneratePopulation)?;
            let parent2 = selection::roulette_wheel(&self.genomes, total_fitness, &mut self.rng)
                .ok_or(EvolutionError::DegeneratePopulation)?;
            offspring.push(G::mate(
                parent1,
                parent2,
                &mut self.history,
                &self.genetic_config,
                &mut self.rng,
            ));
        }

        self.genomes = offspring;
        self.generation += 1;
        debug!(
            "advanced to generation {} (previous total fitness {})",
            self.generation, total_fitness
        );
        Ok(())
    }

    /// Resets the population to an initial randomized state,
    /// with a fresh innovation history and generation count.
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// );
    ///
    /// population.evolve().unwrap();
    /// population.reset();
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn reset(&mut self) {
        let mut history = H::new(&self.genetic_config);
        self.genomes = (0..self.population_config.size.get())
            .map(|_| G::new(&self.genetic_config, &mut history, &mut self.rng))
            .collect();
        self.history = history;
        self.generation = 0;
    }

    /// Returns the currently best-performing genome.
    /// Ties go to the genome that comes first.
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig {
    ///         size: std::num::NonZeroUsize::new(20).unwrap(),
    ///     },
    ///     genetic_config,
    /// );
    ///
    /// let mut fitness = 0.0;
    /// population.evaluate_fitness(move |g| {
    ///     fitness += 10.0;
    ///     fitness
    /// });
    ///
    /// assert_eq!(population.champion().fitness(), 20.0 * 10.0);
    /// ```
    pub fn champion(&self) -> &G {
        self.genomes
            .iter()
            .reduce(|best, g| {
                match g.fitness().partial_cmp(&best.fitness()) {
                    Some(Ordering::Greater) => g,
                    _ => best,
                }
            })
            .expect("empty population has no champion")
    }

    /// Returns the current genomes, in their current order.
    ///
    /// Order is meaningful only until the next call
    /// to [`evolve`], which rearranges the population.
    ///
    /// [`evolve`]: Population::evolve
    pub fn genomes(&self) -> &[G] {
        &self.genomes
    }

    /// Returns the current genomes mutably, so that
    /// a simulation can accumulate their fitness.
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// let mut population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config);
    ///
    /// for genome in population.genomes_mut() {
    ///     let action = genome.predict(&[0.5])[0];
    ///     if action > 0.5 {
    ///         genome.add_fitness(1.0);
    ///     }
    /// }
    /// ```
    pub fn genomes_mut(&mut self) -> &mut [G] {
        &mut self.genomes
    }

    /// Returns the current generation number.
    ///
    /// # Examples
    /// ```
    /// # use neuroevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use neuroevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config);
    ///
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the population's configuration.
    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the configuration passed to genomes.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Counter, Tagged};
    use super::*;
    use std::num::NonZeroUsize;

    fn population(size: usize, seed: u64) -> Population<(), Counter, Tagged> {
        Population::with_seed(
            PopulationConfig {
                size: NonZeroUsize::new(size).unwrap(),
            },
            (),
            seed,
        )
    }

    #[test]
    fn new_has_configured_size() {
        let population = population(17, 0);
        assert_eq!(population.genomes().len(), 17);
        assert_eq!(population.generation(), 0);
        assert_eq!(population.history().0, 17);
    }

    #[test]
    fn evolve_keeps_size_and_counts_generations() {
        let mut population = population(10, 1);
        for generation in 1..=25 {
            population.evaluate_fitness(|g| (g.id % 3) as f64);
            population.evolve().unwrap();
            assert_eq!(population.genomes().len(), 10);
            assert_eq!(population.generation(), generation);
        }
    }

    #[test]
    fn evolve_with_zero_fitness_still_breeds() {
        let mut population = population(8, 2);
        let parent_ids: Vec<usize> = population.genomes().iter().map(|g| g.id).collect();
        population.evolve().unwrap();
        assert_eq!(population.genomes().len(), 8);
        for child in population.genomes() {
            let (p1, p2) = child.parents.unwrap();
            assert!(parent_ids.contains(&p1));
            assert!(parent_ids.contains(&p2));
        }
    }

    #[test]
    fn evolve_only_breeds_from_fit_genomes() {
        let mut population = population(6, 3);
        let fit_id = population.genomes()[4].id;
        population.genomes_mut()[4].set_fitness(2.5);
        population.evolve().unwrap();
        assert!(population
            .genomes()
            .iter()
            .all(|child| child.parents == Some((fit_id, fit_id))));
    }

    #[test]
    fn evolve_rejects_nan_fitness() {
        let mut population = population(5, 4);
        population.genomes_mut()[3].set_fitness(f64::NAN);
        let before: Vec<usize> = population.genomes().iter().map(|g| g.id).collect();
        assert_eq!(population.evolve(), Err(EvolutionError::InvalidFitness(3)));
        let after: Vec<usize> = population.genomes().iter().map(|g| g.id).collect();
        assert_eq!(before, after);
        assert_eq!(population.generation(), 0);
    }

    #[test]
    fn evolve_rejects_infinite_fitness() {
        for fitness in [f64::INFINITY, f64::NEG_INFINITY] {
            let mut population = population(5, 7);
            population.genomes_mut()[1].set_fitness(fitness);
            assert_eq!(population.evolve(), Err(EvolutionError::InvalidFitness(1)));
            assert_eq!(population.generation(), 0);
        }
    }

    #[test]
    fn same_seed_same_lineage() {
        let mut p1 = population(12, 99);
        let mut p2 = population(12, 99);
        for _ in 0..5 {
            p1.evaluate_fitness(|g| (g.id % 5) as f64);
            p2.evaluate_fitness(|g| (g.id % 5) as f64);
            p1.evolve().unwrap();
            p2.evolve().unwrap();
        }
        assert_eq!(p1.genomes(), p2.genomes());
    }

    #[test]
    fn champion_is_fittest() {
        let mut population = population(4, 5);
        population.evaluate_fitness(|g| [1.0, 7.0, 7.0, 3.0][g.id]);
        assert_eq!(population.champion().id, 1);
    }

    #[test]
    fn reset_restarts_history() {
        let mut population = population(3, 6);
        population.evolve().unwrap();
        population.reset();
        assert_eq!(population.generation(), 0);
        assert_eq!(population.history().0, 3);
        assert!(population.genomes().iter().all(|g| g.parents.is_none()));
    }
}
