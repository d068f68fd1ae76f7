//! Genomes are the focus of evolution. An [`NNGenome`] is
//! a list of innovation-tagged connections between nodes,
//! evaluated directly as a neural network. Genomes grow
//! in complexity through node and connection addition
//! mutations during mating.

mod config;
mod connections;
mod errors;
mod history;

pub use config::GeneticConfig;
pub use connections::Connection;
use errors::*;
pub use history::InnovationCounter;

use crate::activation::sigmoid;
use crate::{Innovation, NodeId};

use ahash::RandomState;
use log::debug;
use rand::prelude::{Rng, SliceRandom};
use serde::{Deserialize, Serialize};

use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt;

/// A mutable collection of connections and the nodes they join.
///
/// Node ids `0..input_count` are inputs, the following
/// `output_count` ids are outputs, and any higher id is a
/// hidden node. Connections are kept, and evaluated, in
/// the order they were added.
///
/// Suports Serde for convenient genome saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct NNGenome {
    input_count: usize,
    output_count: usize,
    nodes: BTreeSet<NodeId>,
    connections: Vec<Connection>,
    fitness: f64,
}

impl NNGenome {
    /// Create a new genome with the specified configuration,
    /// with every input connected to every output.
    ///
    /// The connection between input `i` and output `o` is given
    /// the innovation number `o + i ⨯ output_count`, and a weight
    /// drawn uniformly from ±[`weight_bound`].
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::default()
    /// };
    /// let genome = NNGenome::new(&config, &mut rand::thread_rng());
    ///
    /// assert_eq!(genome.connections().len(), 6);
    /// assert_eq!(genome.nodes().count(), 5);
    /// ```
    pub fn new<R: Rng + ?Sized>(config: &GeneticConfig, rng: &mut R) -> NNGenome {
        let (input_count, output_count) = (config.input_count.get(), config.output_count.get());
        let mut genome = NNGenome::empty(input_count, output_count);
        for i in 0..input_count {
            for o in 0..output_count {
                let innovation = InnovationCounter::initial_innovation(i, o, output_count);
                let weight = Connection::random_weight(config, rng);
                genome.add_connection(Connection::new(innovation, i, input_count + o, weight));
            }
        }
        genome
    }

    /// Returns a genome with input and output nodes but
    /// no connections, and zero fitness.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::NNGenome;
    ///
    /// let genome = NNGenome::empty(2, 1);
    ///
    /// assert_eq!(genome.nodes().copied().collect::<Vec<_>>(), [0, 1, 2]);
    /// assert!(genome.connections().is_empty());
    /// ```
    pub fn empty(input_count: usize, output_count: usize) -> NNGenome {
        NNGenome {
            input_count,
            output_count,
            nodes: (0..input_count + output_count).collect(),
            connections: vec![],
            fitness: 0.0,
        }
    }

    /// Evaluates the genome as a network.
    ///
    /// Input node `k` is seeded with `inputs[k]`. Enabled
    /// connections are then visited in insertion order, each
    /// adding `value(input) ⨯ weight` to its output node, where
    /// `value(input)` is whatever that node has accumulated so
    /// far. Finally every non-input node passes through a
    /// sigmoid, and the output nodes' values are returned.
    ///
    /// A connection from a hidden node thus only sees that node's
    /// raw sum, and only if the connections feeding it came first.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{Connection, NNGenome};
    ///
    /// let mut genome = NNGenome::empty(2, 1);
    /// genome.add_connection(Connection::new(0, 0, 2, 0.5));
    /// genome.add_connection(Connection::new(1, 1, 2, -0.5));
    ///
    /// assert_eq!(genome.predict(&[1.0, 1.0]), [0.5]);
    /// ```
    pub fn predict(&self, inputs: &[f64]) -> Vec<f64> {
        let mut values: HashMap<NodeId, f64, RandomState> = inputs
            .iter()
            .take(self.input_count)
            .copied()
            .enumerate()
            .collect();

        for connection in self.connections.iter().filter(|c| c.enabled()) {
            let input_value = values.get(&connection.input()).copied().unwrap_or(0.0);
            *values.entry(connection.output()).or_insert(0.0) += input_value * connection.weight();
        }
        for node in self.nodes.range(self.input_count..) {
            let value = values.entry(*node).or_insert(0.0);
            *value = sigmoid(*value);
        }

        self.output_nodes()
            .map(|node| values.get(&node).copied().unwrap_or(0.0))
            .collect()
    }

    /// Appends `connection` as-is, registering its endpoints as
    /// nodes. The connection keeps its innovation number; use
    /// [`add_new_connection`] for a connection not inherited
    /// from another genome.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{Connection, NNGenome};
    ///
    /// let mut genome = NNGenome::empty(1, 1);
    /// let connection = genome.add_connection(Connection::new(631, 0, 5, 3.0));
    ///
    /// assert_eq!(connection.innovation(), 631);
    /// assert!(genome.nodes().any(|n| *n == 5));
    /// ```
    ///
    /// [`add_new_connection`]: NNGenome::add_new_connection
    pub fn add_connection(&mut self, connection: Connection) -> &mut Connection {
        self.nodes.insert(connection.input());
        self.nodes.insert(connection.output());
        self.connections.push(connection);
        let last = self.connections.len() - 1;
        &mut self.connections[last]
    }

    /// Appends a new enabled connection between `input` and `output`,
    /// with an innovation number drawn from `history`.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{InnovationCounter, NNGenome};
    ///
    /// let mut history = InnovationCounter::starting_at(10);
    /// let mut genome = NNGenome::empty(1, 1);
    /// let connection = genome.add_new_connection(1, 0, -2.0, &mut history);
    ///
    /// assert_eq!(connection.innovation(), 10);
    /// assert_eq!(connection.endpoints(), (1, 0));
    /// assert_eq!(history.peek(), 11);
    /// ```
    pub fn add_new_connection(
        &mut self,
        input: NodeId,
        output: NodeId,
        weight: f64,
        history: &mut InnovationCounter,
    ) -> &mut Connection {
        let innovation = history.next_innovation();
        self.add_connection(Connection::new(innovation, input, output, weight))
    }

    /// Nudges the weight of a uniformly chosen connection, enabled
    /// or not, as described in [`Connection::nudge_weight`].
    ///
    /// Returns the mutated connection, or `None`
    /// if the genome has no connections.
    pub fn mutate_weight<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Option<&Connection> {
        let connection = self.connections.choose_mut(rng)?;
        connection.nudge_weight(config, rng);
        Some(&*connection)
    }

    /// Splits a uniformly chosen connection `a -> b` in two.
    ///
    /// The connection is disabled, and a new node `n`, one past
    /// the highest existing node id, is added along with two new
    /// connections `a -> n` of weight 1 and `n -> b` inheriting the
    /// original weight. Both are enabled and get fresh innovation
    /// numbers from `history`.
    ///
    /// Returns the new input connection, node, and output
    /// connection, in that order.
    ///
    /// # Errors
    /// Returns an error and leaves the genome unchanged if
    /// it has no connections, or if the chosen connection
    /// is already disabled.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{GeneticConfig, InnovationCounter, NNGenome};
    ///
    /// let config = GeneticConfig::default();
    /// let mut history = InnovationCounter::new(&config);
    /// let mut genome = NNGenome::new(&config, &mut rand::thread_rng());
    /// let prev_connection = genome.connections()[0].clone();
    ///
    /// let (new_input, new_node, new_output) = genome
    ///     .mutate_add_node(&mut history, &mut rand::thread_rng())
    ///     .unwrap();
    ///
    /// assert_eq!(new_node, 2);
    /// assert_eq!(new_input.endpoints(), (prev_connection.input(), new_node));
    /// assert_eq!(new_input.weight(), 1.0);
    /// assert_eq!(new_output.endpoints(), (new_node, prev_connection.output()));
    /// assert_eq!(new_output.weight(), prev_connection.weight());
    ///
    /// assert_eq!(genome.connections().len(), 1 + 2);
    /// assert!(!genome.connections()[0].enabled());
    /// ```
    pub fn mutate_add_node<R: Rng + ?Sized>(
        &mut self,
        history: &mut InnovationCounter,
        rng: &mut R,
    ) -> Result<(&Connection, NodeId, &Connection), Box<dyn Error>> {
        let split = match self.connections.len() {
            0 => return Err(NodeAdditionMutationError::EmptyGenome.into()),
            len => rng.gen_range(0..len),
        };
        let connection = &mut self.connections[split];
        if !connection.enabled() {
            return Err(NodeAdditionMutationError::DisabledConnection(connection.innovation()).into());
        }
        connection.set_enabled(false);
        let (input, output) = connection.endpoints();
        let weight = connection.weight();

        let new_node = self.next_node_id();
        self.add_new_connection(input, new_node, 1.0, history);
        self.add_new_connection(new_node, output, weight, history);

        let added = self.connections.len() - 2;
        Ok((&self.connections[added], new_node, &self.connections[added + 1]))
    }

    /// Connects a pair of randomly chosen nodes.
    ///
    /// Up to [`max_connection_addition_attempts`] pairs are drawn
    /// uniformly from all nodes. The first pair of distinct nodes
    /// not already connected in that direction, whether by an
    /// enabled connection or not, receives a new connection with a
    /// fresh innovation number and a weight drawn uniformly from
    /// ±[`weight_bound`]. Cycles and connections into input nodes
    /// are allowed.
    ///
    /// # Errors
    /// Returns an error and leaves the genome unchanged
    /// if no suitable pair was drawn.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{GeneticConfig, InnovationCounter, NNGenome};
    ///
    /// let config = GeneticConfig {
    ///     max_connection_addition_attempts: 100,
    ///     ..GeneticConfig::default()
    /// };
    /// let mut history = InnovationCounter::new(&config);
    /// let mut genome = NNGenome::empty(1, 1);
    ///
    /// let connection = genome
    ///     .mutate_add_connection(&config, &mut history, &mut rand::thread_rng())
    ///     .unwrap();
    /// assert_ne!(connection.input(), connection.output());
    /// ```
    ///
    /// [`max_connection_addition_attempts`]: GeneticConfig::max_connection_addition_attempts
    /// [`weight_bound`]: GeneticConfig::weight_bound
    pub fn mutate_add_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        history: &mut InnovationCounter,
        rng: &mut R,
    ) -> Result<&Connection, Box<dyn Error>> {
        match self.find_unconnected_pair(config.max_connection_addition_attempts, rng) {
            Some((input, output)) => {
                let weight = Connection::random_weight(config, rng);
                Ok(&*self.add_new_connection(input, output, weight, history))
            }
            None => Err(ConnectionAdditionMutationError::NoInputOutputPairFound.into()),
        }
    }

    fn find_unconnected_pair<R: Rng + ?Sized>(
        &self,
        attempts: usize,
        rng: &mut R,
    ) -> Option<(NodeId, NodeId)> {
        let nodes: Vec<NodeId> = self.nodes.iter().copied().collect();
        (0..attempts)
            .filter_map(|_| Some((*nodes.choose(rng)?, *nodes.choose(rng)?)))
            .find(|(input, output)| input != output && !self.is_connected(*input, *output))
    }

    fn is_connected(&self, input: NodeId, output: NodeId) -> bool {
        self.connections
            .iter()
            .any(|c| c.endpoints() == (input, output))
    }

    fn next_node_id(&self) -> NodeId {
        self.nodes.iter().next_back().map_or(0, |n| n + 1)
    }

    /// Combines two parents into a child genome.
    ///
    /// The fitter parent (the first one, on ties) provides the
    /// child's structure: the child receives a copy of each of its
    /// connections, in order. Where the other parent has a
    /// connection with the same innovation number, a fair coin
    /// decides which parent's copy, weight and enabled state
    /// included, is inherited. The other parent's remaining
    /// connections are ignored.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{Connection, NNGenome};
    ///
    /// let mut fit = NNGenome::empty(1, 1);
    /// fit.add_connection(Connection::new(0, 0, 1, 1.0));
    /// fit.set_fitness(2.0);
    ///
    /// let mut unfit = NNGenome::empty(1, 1);
    /// unfit.add_connection(Connection::new(7, 1, 0, 1.0));
    ///
    /// let child = NNGenome::crossover(&unfit, &fit, &mut rand::thread_rng());
    /// assert_eq!(child.connections(), fit.connections());
    /// ```
    pub fn crossover<R: Rng + ?Sized>(
        parent1: &NNGenome,
        parent2: &NNGenome,
        rng: &mut R,
    ) -> NNGenome {
        let (fitter, other) = if parent2.fitness > parent1.fitness {
            (parent2, parent1)
        } else {
            (parent1, parent2)
        };
        let other_connections: HashMap<Innovation, &Connection, RandomState> = other
            .connections
            .iter()
            .map(|c| (c.innovation(), c))
            .collect();

        let mut child = NNGenome::empty(fitter.input_count, fitter.output_count);
        for connection in &fitter.connections {
            let inherited = match other_connections.get(&connection.innovation()) {
                Some(matching) if rng.gen::<bool>() => *matching,
                _ => connection,
            };
            child.add_connection(inherited.clone());
        }
        child
    }

    /// Mates two genomes, returning their mutated child.
    ///
    /// The child is produced by [`crossover`], then independently
    /// undergoes, with their respective configured chances, a
    /// [weight mutation], a [node addition] and a
    /// [connection addition], in that order. Failed structural
    /// mutations leave the child unchanged.
    ///
    /// [`crossover`]: NNGenome::crossover
    /// [weight mutation]: NNGenome::mutate_weight
    /// [node addition]: NNGenome::mutate_add_node
    /// [connection addition]: NNGenome::mutate_add_connection
    pub fn mate<R: Rng + ?Sized>(
        parent1: &NNGenome,
        parent2: &NNGenome,
        history: &mut InnovationCounter,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> NNGenome {
        let mut child = NNGenome::crossover(parent1, parent2, rng);
        child.mutate_all(history, config, rng);
        child
    }

    fn mutate_all<R: Rng + ?Sized>(
        &mut self,
        history: &mut InnovationCounter,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        if rng.gen::<f64>() < config.weight_mutation_chance {
            self.mutate_weight(config, rng);
        }
        if rng.gen::<f64>() < config.node_addition_mutation_chance {
            if let Err(e) = self.mutate_add_node(history, rng) {
                debug!("skipped node addition: {}", e);
            }
        }
        if rng.gen::<f64>() < config.connection_addition_mutation_chance {
            if let Err(e) = self.mutate_add_connection(config, history, rng) {
                debug!("skipped connection addition: {}", e);
            }
        }
    }

    /// Returns the number of input nodes.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of output nodes.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    fn output_nodes(&self) -> impl Iterator<Item = NodeId> {
        self.input_count..self.input_count + self.output_count
    }

    /// Returns the genome's connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Returns an iterator over the genome's node ids, in increasing order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    /// Sets the genome's fitness.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Adds `reward` to the genome's fitness, for
    /// simulations that score actors incrementally.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::NNGenome;
    ///
    /// let mut genome = NNGenome::empty(1, 1);
    /// genome.add_fitness(1.0);
    /// genome.add_fitness(0.5);
    ///
    /// assert_eq!(genome.fitness(), 1.5);
    /// ```
    pub fn add_fitness(&mut self, reward: f64) {
        self.fitness += reward;
    }

    /// Returns the genome's fitness.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

impl neuroevo::Genome for NNGenome {
    type Config = GeneticConfig;
    type InnovationHistory = InnovationCounter;

    fn new<R: Rng + ?Sized>(
        config: &GeneticConfig,
        _history: &mut InnovationCounter,
        rng: &mut R,
    ) -> NNGenome {
        Self::new(config, rng)
    }

    fn mate<R: Rng + ?Sized>(
        parent1: &NNGenome,
        parent2: &NNGenome,
        history: &mut InnovationCounter,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> NNGenome {
        Self::mate(parent1, parent2, history, config, rng)
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.set_fitness(fitness);
    }

    fn fitness(&self) -> f64 {
        self.fitness()
    }
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connections: Vec<String> = self.connections.iter().map(|c| c.to_string()).collect();
        f.debug_struct("NNGenome")
            .field("Connections", &connections)
            .field("Nodes", &self.nodes)
            .field("Fitness", &self.fitness)
            .finish()
    }
}
