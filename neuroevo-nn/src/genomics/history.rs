use crate::genomics::GeneticConfig;
use crate::Innovation;

use neuroevo::InnovationHistory;
use serde::{Deserialize, Serialize};

/// An `InnovationCounter` hands out the innovation numbers
/// of new connections for a whole population.
///
/// The connections of a freshly generated genome are given
/// the innovation number `o + i ⨯ output_count`, where `i`
/// is the index of their input node and `o` that of their
/// output node, so every genome of a population shares its
/// initial innovations. The counter itself therefore starts
/// at `input_count ⨯ output_count`, and each mutation after
/// that draws a fresh number, even one that repeats a
/// structural change made elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnovationCounter {
    next_innovation: Innovation,
}

impl InnovationHistory for InnovationCounter {
    type Config = GeneticConfig;

    fn new(config: &GeneticConfig) -> InnovationCounter {
        Self::new(config)
    }
}

impl InnovationCounter {
    /// Creates a counter past the initial innovations
    /// of genomes generated with `config`.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{GeneticConfig, InnovationCounter};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let counter = InnovationCounter::new(&config);
    ///
    /// assert_eq!(counter.peek(), 6);
    /// ```
    pub fn new(config: &GeneticConfig) -> InnovationCounter {
        Self::starting_at(config.input_count.get() * config.output_count.get())
    }

    /// Creates a counter whose first innovation number is `next_innovation`.
    pub fn starting_at(next_innovation: Innovation) -> InnovationCounter {
        InnovationCounter { next_innovation }
    }

    /// Returns the innovation number of the initial
    /// connection between input `input` and output `output`,
    /// both given as indices into their layer.
    pub(super) fn initial_innovation(
        input: usize,
        output: usize,
        output_count: usize,
    ) -> Innovation {
        output + input * output_count
    }

    /// Returns a fresh innovation number and advances the counter.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::InnovationCounter;
    ///
    /// let mut counter = InnovationCounter::starting_at(4);
    ///
    /// assert_eq!(counter.next_innovation(), 4);
    /// assert_eq!(counter.next_innovation(), 5);
    /// assert_eq!(counter.peek(), 6);
    /// ```
    pub fn next_innovation(&mut self) -> Innovation {
        let innovation = self.next_innovation;
        self.next_innovation += 1;
        innovation
    }

    /// Returns the innovation number the counter
    /// will hand out next, without advancing it.
    pub fn peek(&self) -> Innovation {
        self.next_innovation
    }

    /// Returns the highest innovation number handed
    /// out or reserved so far, or `None` if there is none.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::InnovationCounter;
    ///
    /// assert_eq!(InnovationCounter::starting_at(0).max_innovation(), None);
    /// assert_eq!(InnovationCounter::starting_at(6).max_innovation(), Some(5));
    /// ```
    pub fn max_innovation(&self) -> Option<Innovation> {
        self.next_innovation.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::num::NonZeroUsize;

    #[test]
    fn initial_innovations_are_unique_and_below_counter() {
        for input_count in 1..6 {
            for output_count in 1..6 {
                let config = GeneticConfig {
                    input_count: NonZeroUsize::new(input_count).unwrap(),
                    output_count: NonZeroUsize::new(output_count).unwrap(),
                    ..GeneticConfig::zero()
                };
                let counter = InnovationCounter::new(&config);
                let innovations: HashSet<Innovation> = (0..input_count)
                    .flat_map(|i| {
                        (0..output_count)
                            .map(move |o| InnovationCounter::initial_innovation(i, o, output_count))
                    })
                    .collect();

                assert_eq!(innovations.len(), input_count * output_count);
                assert!(innovations.iter().all(|i| *i < counter.peek()));
            }
        }
    }

    #[test]
    fn innovations_are_handed_out_once() {
        let mut counter = InnovationCounter::new(&GeneticConfig::zero());
        let drawn: HashSet<Innovation> = (0..100).map(|_| counter.next_innovation()).collect();
        assert_eq!(drawn.len(), 100);
        assert_eq!(counter.max_innovation(), Some(100));
    }
}
