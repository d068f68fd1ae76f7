//! Evolves flappy-bird pilots in a headless world, first with
//! growing `NNGenome`s, then with fixed-topology networks bred
//! from each generation's champion, and finally stress-tests the
//! genome run over many seeds in parallel.
//!
//! Usage: `flappy [settings.ron]`

mod settings;
mod world;

use settings::Settings;
use world::{Pilot, World, OBSERVATION_SIZE};

use neuroevo::logging::{EvolutionLogger, GenerationMemberRecord, ReportingLevel, Stats};
use neuroevo::{EvolutionError, Population};
use neuroevo_nn::genomics::NNGenome;
use neuroevo_nn::networks::{breed_from_champion, BreedingError, FeedForwardNetwork};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use std::env;
use std::error::Error;

/// A fixed-topology network and the reward it earned this episode.
struct ScoredNetwork {
    network: FeedForwardNetwork,
    score: f64,
}

impl Pilot for ScoredNetwork {
    fn flaps(&self, observation: &[f64]) -> bool {
        self.network.predict(observation)[0] > 0.5
    }

    fn reward(&mut self, amount: f64) {
        self.score += amount;
    }
}

struct GenomeRun {
    logger: EvolutionLogger<NNGenome>,
    best_pipes: usize,
}

/// Pipe layouts differ between generations and runs.
fn episode_seed(run_seed: u64, generation: usize) -> u64 {
    run_seed.wrapping_mul(10_007).wrapping_add(generation as u64)
}

fn evolve_genomes(settings: &Settings, seed: u64) -> Result<GenomeRun, EvolutionError> {
    let mut population = Population::<_, _, NNGenome>::with_seed(
        settings.population.clone(),
        settings.genetics.clone(),
        seed,
    );
    let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
    let mut best_pipes = 0;

    for _ in 0..settings.generations {
        let episode = World::new(&settings.world, episode_seed(seed, population.generation()))
            .run(population.genomes_mut());
        best_pipes = best_pipes.max(episode.pipes_passed);
        logger.log(
            &population,
            &|g: &NNGenome| {
                [
                    g.fitness(),
                    g.connections().len() as f64,
                    g.nodes().count() as f64,
                ]
            },
            ["fitness", "connections", "nodes"],
        );
        debug!(
            "run {} generation {}: {} ticks, {} pipes",
            seed,
            population.generation(),
            episode.ticks,
            episode.pipes_passed
        );
        population.evolve()?;
    }

    Ok(GenomeRun { logger, best_pipes })
}

fn evolve_networks(settings: &Settings, seed: u64) -> Result<usize, BreedingError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let size = settings.population.size.get();
    let mut networks: Vec<FeedForwardNetwork> = (0..size)
        .map(|_| {
            FeedForwardNetwork::with_dimensions(OBSERVATION_SIZE, settings.hidden_nodes, 1, &mut rng)
        })
        .collect();
    let mut best_pipes = 0;

    for generation in 0..settings.generations {
        let mut pilots: Vec<ScoredNetwork> = networks
            .into_iter()
            .map(|network| ScoredNetwork {
                network,
                score: 0.0,
            })
            .collect();
        let episode = World::new(&settings.world, episode_seed(seed, generation)).run(&mut pilots);
        best_pipes = best_pipes.max(episode.pipes_passed);

        if let Some(stats) = Stats::from(pilots.iter().map(|p| p.score)) {
            info!(
                "fixed topology generation {}: {} pipes, score {}",
                generation, episode.pipes_passed, stats
            );
        }
        let scored: Vec<(FeedForwardNetwork, f64)> =
            pilots.into_iter().map(|p| (p.network, p.score)).collect();
        networks = breed_from_champion(&scored, size, settings.mutation_rate, &mut rng)?;
    }

    Ok(best_pipes)
}

fn stress_test(settings: &Settings) {
    let runs = settings.stress_runs;
    let best_pipes: Vec<Option<f64>> = (0..runs as u64)
        .into_par_iter()
        .map(|run| match evolve_genomes(settings, settings.seed + 1 + run) {
            Ok(outcome) => Some(outcome.best_pipes as f64),
            Err(e) => {
                warn!("stress run {} aborted: {}", run, e);
                None
            }
        })
        .collect();

    match Stats::from(best_pipes.iter().flatten().copied()) {
        Some(stats) => info!(
            "best pipes passed per run: {}, {}% of {} runs aborted",
            stats,
            best_pipes.iter().filter(|p| p.is_none()).count() as f64 * 100.0 / runs as f64,
            runs
        ),
        None => warn!("no stress run completed"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().init();

    let settings = match env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let genome_run = evolve_genomes(&settings, settings.seed)?;
    for log in genome_run.logger.iter() {
        info!("{}", log);
    }
    info!("genomes: best run passed {} pipes", genome_run.best_pipes);
    if let Some(log) = genome_run.logger.last() {
        if let GenerationMemberRecord::PopulationChampion(champion) = &log.generation_sample {
            info!("last champion: {}", ron::to_string(champion)?);
        }
    }

    let best_pipes = evolve_networks(&settings, settings.seed)?;
    info!("fixed topology: best run passed {} pipes", best_pipes);

    stress_test(&settings);
    Ok(())
}
