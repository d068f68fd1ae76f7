use rand::Rng;

/// An interface for genomes that can be evolved by a [`Population`].
///
/// [`Population`]: crate::Population
pub trait Genome {
    type Config;
    type InnovationHistory: InnovationHistory<Config = Self::Config>;

    /// Returns a randomized genome.
    fn new<R: Rng + ?Sized>(
        config: &Self::Config,
        history: &mut Self::InnovationHistory,
        rng: &mut R,
    ) -> Self;

    /// Combines two genomes and returns a "child" genome.
    ///
    /// Mutation of the child is the implementor's
    /// responsibility. The two parents may be the
    /// same genome.
    fn mate<R: Rng + ?Sized>(
        parent1: &Self,
        parent2: &Self,
        history: &mut Self::InnovationHistory,
        config: &Self::Config,
        rng: &mut R,
    ) -> Self;

    /// Sets the genome's fitness value.
    fn set_fitness(&mut self, fitness: f64);

    /// Returns the genome's fitness value.
    fn fitness(&self) -> f64;
}

/// An Innovation History is used to keep track
/// of genetic innovations throughout successive
/// generations of genomes. A single history is
/// owned by each population, and shared by every
/// genome it creates or mates.
///
/// The exact function and utility of the
/// InnovationHistory is left to the implementor.
pub trait InnovationHistory {
    type Config;

    fn new(config: &Self::Config) -> Self;
}
