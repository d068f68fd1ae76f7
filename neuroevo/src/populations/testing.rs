//! A minimal genome used to exercise population
//! mechanics independently of any network genome.

use crate::{Genome, InnovationHistory};

use rand::Rng;

/// A genome that is nothing but an identifier,
/// plus the identifiers of the parents it was mated from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tagged {
    pub(crate) id: usize,
    pub(crate) parents: Option<(usize, usize)>,
    pub(crate) fitness: f64,
}

impl Tagged {
    pub(crate) fn with_fitness(id: usize, fitness: f64) -> Tagged {
        Tagged {
            id,
            parents: None,
            fitness,
        }
    }
}

/// Hands out genome identifiers.
pub(crate) struct Counter(pub(crate) usize);

impl InnovationHistory for Counter {
    type Config = ();

    fn new(_: &()) -> Counter {
        Counter(0)
    }
}

impl Genome for Tagged {
    type Config = ();
    type InnovationHistory = Counter;

    fn new<R: Rng + ?Sized>(_: &(), history: &mut Counter, _: &mut R) -> Tagged {
        history.0 += 1;
        Tagged::with_fitness(history.0 - 1, 0.0)
    }

    fn mate<R: Rng + ?Sized>(
        parent1: &Tagged,
        parent2: &Tagged,
        history: &mut Counter,
        _: &(),
        _: &mut R,
    ) -> Tagged {
        history.0 += 1;
        Tagged {
            id: history.0 - 1,
            parents: Some((parent1.id, parent2.id)),
            fitness: 0.0,
        }
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }
}
