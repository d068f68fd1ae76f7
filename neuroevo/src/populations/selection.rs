use crate::Genome;

use rand::prelude::{Rng, SliceRandom};

use std::cmp::Ordering;

/// Sorts genomes by fitness in descending order.
/// The sort is stable, so equally fit genomes keep
/// their relative order.
///
/// Non-finite fitnesses must have been rejected beforehand.
pub(super) fn sort_by_decreasing_fitness<G: Genome>(genomes: &mut [G]) {
    genomes.sort_by(|g1, g2| {
        g2.fitness()
            .partial_cmp(&g1.fitness())
            .unwrap_or(Ordering::Equal)
    });
}

/// Fitness-proportionate ("roulette wheel") selection.
///
/// Draws a number uniformly from `[0, total_fitness)`
/// and returns the first genome whose cumulative fitness
/// exceeds it. If none does, which is always the case
/// when all fitnesses are 0, a genome is picked
/// uniformly at random instead.
///
/// `genomes` are expected to be sorted by decreasing
/// fitness, and `total_fitness` to be their fitness sum.
/// Returns `None` only for an empty slice.
pub(super) fn roulette_wheel<'a, G, R>(
    genomes: &'a [G],
    total_fitness: f64,
    rng: &mut R,
) -> Option<&'a G>
where
    G: Genome,
    R: Rng + ?Sized,
{
    let target = rng.gen::<f64>() * total_fitness;
    let mut cumulative = 0.0;
    for genome in genomes {
        cumulative += genome.fitness();
        if cumulative > target {
            return Some(genome);
        }
    }
    genomes.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populations::testing::Tagged;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sorts_descending_and_stable() {
        let mut genomes = vec![
            Tagged::with_fitness(0, 1.0),
            Tagged::with_fitness(1, 3.0),
            Tagged::with_fitness(2, 1.0),
            Tagged::with_fitness(3, 2.0),
        ];
        sort_by_decreasing_fitness(&mut genomes);
        let order: Vec<usize> = genomes.iter().map(|g| g.id).collect();
        assert_eq!(order, [1, 3, 0, 2]);
    }

    #[test]
    fn only_fit_genome_is_always_selected() {
        let genomes = vec![
            Tagged::with_fitness(0, 5.0),
            Tagged::with_fitness(1, 0.0),
            Tagged::with_fitness(2, 0.0),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let picked = roulette_wheel(&genomes, 5.0, &mut rng).unwrap();
            assert_eq!(picked.id, 0);
        }
    }

    #[test]
    fn zero_fitness_falls_back_to_uniform_choice() {
        let genomes: Vec<Tagged> = (0..4).map(|i| Tagged::with_fitness(i, 0.0)).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[roulette_wheel(&genomes, 0.0, &mut rng).unwrap().id] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn selection_is_roughly_proportional() {
        let genomes = vec![Tagged::with_fitness(0, 3.0), Tagged::with_fitness(1, 1.0)];
        let mut rng = StdRng::seed_from_u64(5);
        let draws = 4000;
        let first = (0..draws)
            .filter(|_| roulette_wheel(&genomes, 4.0, &mut rng).unwrap().id == 0)
            .count();
        let share = first as f64 / draws as f64;
        assert!((share - 0.75).abs() < 0.05, "share was {}", share);
    }

    #[test]
    fn empty_slice_selects_nothing() {
        let genomes: Vec<Tagged> = vec![];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(roulette_wheel(&genomes, 0.0, &mut rng).is_none());
    }
}
