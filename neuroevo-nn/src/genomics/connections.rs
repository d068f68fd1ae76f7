use crate::genomics::GeneticConfig;
use crate::{Innovation, NodeId};

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A weighted edge between two nodes of a genome,
/// tagged with the innovation number of the
/// mutation that first created it.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Connection {
    innovation: Innovation,
    input: NodeId,
    output: NodeId,
    weight: f64,
    enabled: bool,
}

impl Connection {
    /// Returns a new _enabled_ connection with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::Connection;
    ///
    /// let connection = Connection::new(42, 3, 9, 2.0);
    /// assert!(connection.enabled());
    /// ```
    pub fn new(innovation: Innovation, input: NodeId, output: NodeId, weight: f64) -> Connection {
        Connection {
            innovation,
            input,
            output,
            weight,
            enabled: true,
        }
    }

    /// Returns a random weight. Uses a uniform distribution
    /// over the range ±config.weight_bound.
    pub(super) fn random_weight<R: Rng + ?Sized>(config: &GeneticConfig, rng: &mut R) -> f64 {
        rng.gen_range(-config.weight_bound..=config.weight_bound)
    }

    /// Nudges the connection's weight by a random amount. Uses
    /// a uniform distribution over the range ±[`weight_mutation_power`].
    /// The weight is not clamped.
    ///
    /// [`weight_mutation_power`]: crate::genomics::GeneticConfig::weight_mutation_power
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::{Connection, GeneticConfig};
    ///
    /// let mut connection = Connection::new(42, 3, 9, 3.0);
    /// connection.nudge_weight(
    ///     &GeneticConfig {
    ///         weight_mutation_power: 0.1,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut rand::thread_rng(),
    /// );
    ///
    /// assert!((connection.weight() - 3.0).abs() <= 0.1);
    /// ```
    pub fn nudge_weight<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.weight +=
            rng.gen_range(-config.weight_mutation_power..=config.weight_mutation_power);
    }

    /// Returns the connection's innovation number.
    pub fn innovation(&self) -> Innovation {
        self.innovation
    }

    /// Returns the connection's input node.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Returns the connection's output node.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Returns the input and output nodes, in that order.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::Connection;
    ///
    /// let connection = Connection::new(42, 3, 9, 2.0);
    /// assert_eq!(connection.endpoints(), (3, 9));
    /// ```
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.input, self.output)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, w: f64) {
        self.weight = w;
    }

    /// Returns whether the connection takes
    /// part in evaluation.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the connection takes part in evaluation.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::genomics::Connection;
    ///
    /// let mut connection = Connection::new(42, 3, 9, 2.0);
    /// connection.set_enabled(false);
    ///
    /// assert!(!connection.enabled());
    /// ```
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_str = format!(
            "[{}] {} -> {} ({:.3})",
            self.innovation, self.input, self.output, self.weight
        );
        if self.enabled {
            write!(f, "{}", fmt_str)
        } else {
            write!(f, "({})", fmt_str)
        }
    }
}
