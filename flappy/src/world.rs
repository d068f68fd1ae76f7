//! A headless side-scroller: birds fall under gravity, flap upward
//! on command, and must pass through the gaps of pipe pairs scrolling
//! in from the right. Coordinates are in pixels, with `y` growing
//! downward, and time in seconds.

use neuroevo_nn::genomics::NNGenome;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Length of the observation fed to pilots.
pub const OBSERVATION_SIZE: usize = 5;

/// Physical constants of the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Downward acceleration, in px/s².
    pub gravity: f64,
    /// Vertical velocity set by a flap; negative is upward.
    pub jump_velocity: f64,
    /// Leftward speed of pipes, in px/s.
    pub pipe_speed: f64,
    /// Seconds between pipe pair spawns.
    pub pipe_interval: f64,
    /// Distance from a gap's centre to either of its edges.
    pub gap_half_height: f64,
    pub pipe_width: f64,
    /// Half the side of a bird's square hitbox.
    pub bird_radius: f64,
    /// Simulation step, in seconds.
    pub tick: f64,
    /// Ticks after which an episode ends even if birds survive.
    pub max_ticks: usize,
}

impl Default for WorldConfig {
    fn default() -> WorldConfig {
        WorldConfig {
            width: 800.0,
            height: 600.0,
            gravity: 800.0,
            jump_velocity: -500.0,
            pipe_speed: 200.0,
            pipe_interval: 3.0,
            gap_half_height: 150.0,
            pipe_width: 52.0,
            bird_radius: 15.0,
            tick: 1.0 / 60.0,
            max_ticks: 60 * 120,
        }
    }
}

/// Something that can steer a bird and be rewarded for it.
pub trait Pilot {
    /// Decides whether to flap given the observation
    /// `[y, gap top, gap bottom, pipe x, vertical velocity]`,
    /// with positions scaled by the world's dimensions and
    /// velocity divided by 1000.
    fn flaps(&self, observation: &[f64]) -> bool;

    /// Credits the pilot for a tick spent alive.
    fn reward(&mut self, amount: f64);
}

impl Pilot for NNGenome {
    fn flaps(&self, observation: &[f64]) -> bool {
        self.predict(observation)[0] > 0.5
    }

    fn reward(&mut self, amount: f64) {
        self.add_fitness(amount);
    }
}

#[derive(Clone, Debug)]
struct Bird {
    y: f64,
    velocity: f64,
    alive: bool,
}

#[derive(Clone, Debug)]
struct PipePair {
    x: f64,
    gap_centre: f64,
}

/// The outcome of an episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Episode {
    pub ticks: usize,
    /// Pipe pairs that scrolled off-screen while a bird lived.
    pub pipes_passed: usize,
}

/// A single episode's worth of world state.
pub struct World<'a> {
    config: &'a WorldConfig,
    rng: StdRng,
    pipes: Vec<PipePair>,
    since_last_spawn: f64,
}

impl<'a> World<'a> {
    /// Returns an empty world whose pipe gaps derive from `seed`.
    pub fn new(config: &'a WorldConfig, seed: u64) -> World<'a> {
        World {
            config,
            rng: StdRng::seed_from_u64(seed),
            pipes: vec![],
            // The first pair spawns on the first tick.
            since_last_spawn: config.pipe_interval,
        }
    }

    fn bird_x(&self) -> f64 {
        self.config.width * 0.1
    }

    /// Flies one bird per pilot until every bird has crashed
    /// or `max_ticks` elapse, rewarding each live pilot every
    /// tick by how close it is to the next gap's centre.
    pub fn run<P: Pilot>(&mut self, pilots: &mut [P]) -> Episode {
        let mut birds = vec![
            Bird {
                y: self.config.height * 0.5,
                velocity: 0.0,
                alive: true,
            };
            pilots.len()
        ];
        let mut pipes_passed = 0;

        for tick in 0..self.config.max_ticks {
            if birds.iter().all(|b| !b.alive) {
                return Episode {
                    ticks: tick,
                    pipes_passed,
                };
            }
            pipes_passed += self.advance_pipes();

            let next_pipe = self.next_pipe().cloned();
            for (bird, pilot) in birds.iter_mut().zip(pilots.iter_mut()) {
                if !bird.alive {
                    continue;
                }
                if let Some(pipe) = &next_pipe {
                    pilot.reward(self.centring_reward(bird, pipe));
                    if pilot.flaps(&self.observe(bird, pipe)) {
                        bird.velocity = self.config.jump_velocity;
                    }
                }
                bird.velocity += self.config.gravity * self.config.tick;
                bird.y += bird.velocity * self.config.tick;
                bird.alive = !self.crashed(bird);
            }
        }

        Episode {
            ticks: self.config.max_ticks,
            pipes_passed,
        }
    }

    /// Scrolls and spawns pipes, returning how many left the screen.
    fn advance_pipes(&mut self) -> usize {
        for pipe in &mut self.pipes {
            pipe.x -= self.config.pipe_speed * self.config.tick;
        }
        let before = self.pipes.len();
        self.pipes.retain(|p| p.x >= -50.0);
        let passed = before - self.pipes.len();

        self.since_last_spawn += self.config.tick;
        if self.since_last_spawn >= self.config.pipe_interval {
            self.since_last_spawn = 0.0;
            let h = self.config.height;
            let gap_centre = self.rng.gen_range(h * 0.2..=h * 0.8);
            self.pipes.push(PipePair {
                x: self.config.width,
                gap_centre,
            });
        }
        passed
    }

    /// The nearest pipe pair not yet cleared by the birds.
    fn next_pipe(&self) -> Option<&PipePair> {
        let bird_x = self.bird_x() - self.config.bird_radius;
        self.pipes
            .iter()
            .filter(|p| p.x + self.config.pipe_width >= bird_x)
            .min_by(|a, b| a.x.total_cmp(&b.x))
    }

    fn observe(&self, bird: &Bird, pipe: &PipePair) -> [f64; OBSERVATION_SIZE] {
        let (w, h) = (self.config.width, self.config.height);
        [
            bird.y / h,
            (pipe.gap_centre - self.config.gap_half_height) / h,
            (pipe.gap_centre + self.config.gap_half_height) / h,
            pipe.x / w,
            bird.velocity / 1000.0,
        ]
    }

    fn centring_reward(&self, bird: &Bird, pipe: &PipePair) -> f64 {
        let h = self.config.height;
        let offset = (bird.y / h - pipe.gap_centre / h).abs();
        (1.0 - offset * 100.0).max(0.0)
    }

    fn crashed(&self, bird: &Bird) -> bool {
        let (r, h) = (self.config.bird_radius, self.config.height);
        if bird.y > h * 1.2 || bird.y < -50.0 {
            return true;
        }
        let bird_x = self.bird_x();
        self.pipes.iter().any(|p| {
            let overlaps_x = bird_x + r > p.x && bird_x - r < p.x + self.config.pipe_width;
            let in_gap = bird.y - r > p.gap_centre - self.config.gap_half_height
                && bird.y + r < p.gap_centre + self.config.gap_half_height;
            overlaps_x && !in_gap
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flaps when falling well below the gap's centre.
    struct Autopilot {
        score: f64,
    }

    impl Pilot for Autopilot {
        fn flaps(&self, observation: &[f64]) -> bool {
            let centre = (observation[1] + observation[2]) / 2.0;
            observation[0] > centre + 0.1 && observation[4] > 0.0
        }

        fn reward(&mut self, amount: f64) {
            self.score += amount;
        }
    }

    struct Brick;

    impl Pilot for Brick {
        fn flaps(&self, _: &[f64]) -> bool {
            false
        }

        fn reward(&mut self, _: f64) {}
    }

    #[test]
    fn idle_birds_fall_out_of_the_world() {
        let config = WorldConfig::default();
        let episode = World::new(&config, 0).run(&mut [Brick, Brick]);
        assert!(episode.ticks < config.max_ticks);
        assert_eq!(episode.pipes_passed, 0);
    }

    #[test]
    fn episode_with_no_pilots_ends_immediately() {
        let config = WorldConfig::default();
        let episode = World::new(&config, 0).run::<Brick>(&mut []);
        assert_eq!(episode.ticks, 0);
    }

    #[test]
    fn steering_towards_gaps_passes_pipes() {
        let config = WorldConfig {
            max_ticks: 60 * 30,
            ..WorldConfig::default()
        };
        let mut pilots = [Autopilot { score: 0.0 }];
        let episode = World::new(&config, 1).run(&mut pilots);

        assert!(episode.pipes_passed > 0, "{:?}", episode);
        assert!(pilots[0].score > 0.0);
    }

    #[test]
    fn genomes_accumulate_fitness() {
        let config = WorldConfig::default();
        let mut genomes = vec![NNGenome::empty(OBSERVATION_SIZE, 1); 3];
        World::new(&config, 2).run(&mut genomes);
        // An unconnected genome outputs exactly 0.5 and never flaps,
        // so it only earns reward while falling through the centre.
        assert!(genomes.iter().all(|g| g.fitness() >= 0.0));
    }
}
