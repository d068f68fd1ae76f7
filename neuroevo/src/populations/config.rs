use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population. Every generation
    /// holds exactly this many genomes.
    pub size: NonZeroUsize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All `NonZeroUsize`s are set to 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use neuroevo::PopulationConfig;
    ///
    /// let cfg = PopulationConfig::zero();
    ///
    /// assert_eq!(cfg.size.get(), 1);
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_populations_are_rejected() {
        let parsed = serde_json::from_str::<PopulationConfig>(r#"{"size":0}"#);
        assert!(parsed.is_err());

        let parsed = serde_json::from_str::<PopulationConfig>(r#"{"size":12}"#).unwrap();
        assert_eq!(parsed.size.get(), 12);
    }
}
