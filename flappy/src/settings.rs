use crate::world::{WorldConfig, OBSERVATION_SIZE};

use neuroevo::PopulationConfig;
use neuroevo_nn::genomics::GeneticConfig;
use serde::{Deserialize, Serialize};

use std::error::Error;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

/// Everything a run can be tuned by. Read from a RON file,
/// with any field left out taking its default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub genetics: GeneticConfig,
    /// Generations evolved per run.
    pub generations: usize,
    /// Hidden layer size of the fixed-topology networks.
    pub hidden_nodes: usize,
    /// Mutation rate of the fixed-topology networks.
    pub mutation_rate: f64,
    /// Number of independently seeded runs in the stress test.
    pub stress_runs: usize,
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            world: WorldConfig::default(),
            population: PopulationConfig {
                size: NonZeroUsize::new(100).unwrap(),
            },
            genetics: GeneticConfig {
                input_count: NonZeroUsize::new(OBSERVATION_SIZE).unwrap(),
                output_count: NonZeroUsize::MIN,
                max_connection_addition_attempts: 20,
                ..GeneticConfig::default()
            },
            generations: 30,
            hidden_nodes: 8,
            mutation_rate: 0.1,
            stress_runs: 16,
            seed: 0,
        }
    }
}

impl Settings {
    /// Reads settings from the RON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Settings, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let settings: Settings = ron::from_str(&text)?;
        settings.check()?;
        Ok(settings)
    }

    /// Checks that genomes fit the world's observations and actions.
    pub fn check(&self) -> Result<(), String> {
        let (inputs, outputs) = (
            self.genetics.input_count.get(),
            self.genetics.output_count.get(),
        );
        if inputs != OBSERVATION_SIZE || outputs != 1 {
            return Err(format!(
                "genomes must have {} inputs and 1 output, not {} and {}",
                OBSERVATION_SIZE, inputs, outputs
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = ron::from_str("(generations: 3, seed: 9)").unwrap();
        assert_eq!(settings.generations, 3);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.world, WorldConfig::default());
        assert_eq!(settings.genetics.input_count.get(), OBSERVATION_SIZE);
        assert!(settings.check().is_ok());
    }

    #[test]
    fn mismatched_genome_shape_is_rejected() {
        let settings: Settings =
            ron::from_str("(genetics: (input_count: 2, output_count: 1))").unwrap();
        assert!(settings.check().is_err());
    }

    #[test]
    fn written_settings_read_back() {
        let settings = Settings::default();
        let text = ron::to_string(&settings).unwrap();
        assert_eq!(ron::from_str::<Settings>(&text).unwrap(), settings);
    }
}
