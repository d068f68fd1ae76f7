use super::FeedForwardNetwork;

use rand::Rng;
use rand_distr::NormalError;

use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

/// An error type indicating a failure to
/// breed a new generation of networks.
#[derive(Debug)]
pub enum BreedingError {
    /// There was no network to breed from.
    NoNetworks,
    /// The mutation rate is not a valid standard deviation.
    InvalidRate(NormalError),
}

impl fmt::Display for BreedingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNetworks => write!(f, "breeding from an empty generation"),
            Self::InvalidRate(e) => write!(f, "invalid mutation rate: {}", e),
        }
    }
}

impl Error for BreedingError {}

/// Each score's share of the total score. If the scores
/// sum to zero, every entry gets an equal share.
///
/// # Examples
/// ```
/// use neuroevo_nn::networks::fitness_shares;
///
/// assert_eq!(fitness_shares(&[1.0, 3.0]), [0.25, 0.75]);
/// assert_eq!(fitness_shares(&[0.0, 0.0]), [0.5, 0.5]);
/// ```
pub fn fitness_shares(scores: &[f64]) -> Vec<f64> {
    let total: f64 = scores.iter().sum();
    if total == 0.0 {
        let share = 1.0 / scores.len() as f64;
        return vec![share; scores.len()];
    }
    scores.iter().map(|s| s / total).collect()
}

/// Builds the next generation of a fixed-topology population:
/// `count` independent copies of the highest-scoring network,
/// each passed through [`mutate_by_rate`] with `rate`.
///
/// Ties go to the earliest network.
///
/// # Examples
/// ```
/// use neuroevo_nn::networks::{breed_from_champion, FeedForwardNetwork};
///
/// let mut rng = rand::thread_rng();
/// let scored: Vec<_> = (0..4)
///     .map(|score| (FeedForwardNetwork::with_dimensions(2, 3, 1, &mut rng), score as f64))
///     .collect();
///
/// let offspring = breed_from_champion(&scored, 10, 0.1, &mut rng).unwrap();
/// assert_eq!(offspring.len(), 10);
///
/// assert!(breed_from_champion(&[], 10, 0.1, &mut rng).is_err());
/// ```
///
/// [`mutate_by_rate`]: FeedForwardNetwork::mutate_by_rate
pub fn breed_from_champion<R: Rng + ?Sized>(
    scored: &[(FeedForwardNetwork, f64)],
    count: usize,
    rate: f64,
    rng: &mut R,
) -> Result<Vec<FeedForwardNetwork>, BreedingError> {
    let scores: Vec<f64> = scored.iter().map(|(_, score)| *score).collect();
    let shares = fitness_shares(&scores);
    let champion = scored
        .iter()
        .zip(shares)
        .reduce(|best, candidate| {
            match candidate.1.partial_cmp(&best.1) {
                Some(Ordering::Greater) => candidate,
                _ => best,
            }
        })
        .map(|((network, _), _)| network)
        .ok_or(BreedingError::NoNetworks)?;

    (0..count)
        .map(|_| {
            let mut child = FeedForwardNetwork::from_template(champion);
            child
                .mutate_by_rate(rate, rng)
                .map_err(BreedingError::InvalidRate)?;
            Ok(child)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn offspring_descend_from_highest_score() {
        let mut rng = StdRng::seed_from_u64(0);
        let scored: Vec<_> = [2.0, 9.0, 9.0, 1.0]
            .iter()
            .map(|s| (FeedForwardNetwork::with_dimensions(2, 3, 1, &mut rng), *s))
            .collect();

        let offspring = breed_from_champion(&scored, 5, 0.0, &mut rng).unwrap();
        assert_eq!(offspring.len(), 5);
        assert!(offspring.iter().all(|n| *n == scored[1].0));
    }

    #[test]
    fn offspring_are_mutated_independently() {
        let mut rng = StdRng::seed_from_u64(1);
        let scored = vec![(FeedForwardNetwork::with_dimensions(3, 6, 2, &mut rng), 1.0)];

        let offspring = breed_from_champion(&scored, 2, 0.5, &mut rng).unwrap();
        assert_ne!(offspring[0], scored[0].0);
        assert_ne!(offspring[0], offspring[1]);
    }

    #[test]
    fn invalid_rate_is_reported() {
        let mut rng = StdRng::seed_from_u64(2);
        let scored = vec![(FeedForwardNetwork::with_dimensions(1, 1, 1, &mut rng), 1.0)];
        for rate in [f64::NAN, f64::INFINITY, -0.5] {
            assert!(
                matches!(
                    breed_from_champion(&scored, 2, rate, &mut rng),
                    Err(BreedingError::InvalidRate(_))
                ),
                "accepted rate {}",
                rate
            );
        }
    }

    #[test]
    fn negative_rate_leaves_network_untouched() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = FeedForwardNetwork::with_dimensions(2, 3, 1, &mut rng);
        let before = network.clone();
        assert!(network.mutate_by_rate(-0.5, &mut rng).is_err());
        assert_eq!(network, before);
    }
}
