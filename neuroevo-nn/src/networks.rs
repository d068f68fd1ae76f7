//! A fixed-topology, fully-connected network with one hidden layer,
//! evolved by weight perturbation alone (see [`breed_from_champion`])
//! or trained by gradient descent.

mod breeding;

pub use breeding::{breed_from_champion, fitness_shares, BreedingError};

use crate::activation::{sigmoid, sigmoid_derivative};
use crate::matrix::{DeserializationError, Matrix, MatrixError};

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use serde::{Deserialize, Serialize};

/// Step size of [`FeedForwardNetwork::train`].
pub const LEARNING_RATE: f64 = 0.1;

/// An `input → hidden → output` network with sigmoid
/// activations on both the hidden and output layers.
///
/// Serializes to a JSON object with camelCase field names
/// (`inputNodeCount`, `weightsInputToHidden`, ...), each
/// matrix nested as a [`Matrix`] object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedForwardNetwork {
    input_node_count: usize,
    hidden_node_count: usize,
    output_node_count: usize,
    weights_input_to_hidden: Matrix,
    weights_hidden_to_output: Matrix,
    bias_hidden: Matrix,
    bias_output: Matrix,
}

impl FeedForwardNetwork {
    /// Returns a network of the given layer sizes,
    /// with all weights and biases drawn uniformly
    /// from `[-1, 1]`.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::networks::FeedForwardNetwork;
    ///
    /// let network = FeedForwardNetwork::with_dimensions(4, 8, 2, &mut rand::thread_rng());
    /// assert_eq!(network.dimensions(), (4, 8, 2));
    /// ```
    pub fn with_dimensions<R: Rng + ?Sized>(
        input_node_count: usize,
        hidden_node_count: usize,
        output_node_count: usize,
        rng: &mut R,
    ) -> FeedForwardNetwork {
        let mut layer = |rows, cols| {
            let mut m = Matrix::new(rows, cols);
            m.randomize(rng);
            m
        };
        FeedForwardNetwork {
            input_node_count,
            hidden_node_count,
            output_node_count,
            weights_input_to_hidden: layer(hidden_node_count, input_node_count),
            weights_hidden_to_output: layer(output_node_count, hidden_node_count),
            bias_hidden: layer(hidden_node_count, 1),
            bias_output: layer(output_node_count, 1),
        }
    }

    /// Returns an independent copy of `network`. Later
    /// changes to either network do not affect the other.
    pub fn from_template(network: &FeedForwardNetwork) -> FeedForwardNetwork {
        network.clone()
    }

    /// Returns `(input, hidden, output)` layer sizes.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (
            self.input_node_count,
            self.hidden_node_count,
            self.output_node_count,
        )
    }

    /// Computes the network's outputs, each in `(0, 1)`.
    ///
    /// # Panics
    /// If `inputs.len()` differs from the input layer size.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::networks::FeedForwardNetwork;
    ///
    /// let network = FeedForwardNetwork::with_dimensions(3, 5, 2, &mut rand::thread_rng());
    /// let outputs = network.predict(&[0.1, -0.4, 2.0]);
    ///
    /// assert_eq!(outputs.len(), 2);
    /// assert!(outputs.iter().all(|o| *o > 0.0 && *o < 1.0));
    /// ```
    pub fn predict(&self, inputs: &[f64]) -> Vec<f64> {
        self.check_lengths(inputs, None);
        let (_, outputs) = self
            .feed_forward(&Matrix::from_array(inputs))
            .unwrap_or_else(|e| panic!("inconsistent network layers: {}", e));
        outputs.to_array()
    }

    /// Performs one step of gradient descent towards `targets`,
    /// with step size [`LEARNING_RATE`].
    ///
    /// The hidden layer's error is propagated back through
    /// the already-updated hidden-to-output weights.
    ///
    /// # Panics
    /// If `inputs` or `targets` do not match the input
    /// and output layer sizes.
    pub fn train(&mut self, inputs: &[f64], targets: &[f64]) {
        self.check_lengths(inputs, Some(targets));
        self.back_propagate(&Matrix::from_array(inputs), &Matrix::from_array(targets))
            .unwrap_or_else(|e| panic!("inconsistent network layers: {}", e));
    }

    /// Replaces every weight and bias `v` at position `(row, col)`
    /// of its matrix with `f(v, row, col)`.
    pub fn mutate<F: FnMut(f64, usize, usize) -> f64>(&mut self, mut f: F) {
        self.weights_input_to_hidden.map(&mut f);
        self.weights_hidden_to_output.map(&mut f);
        self.bias_hidden.map(&mut f);
        self.bias_output.map(&mut f);
    }

    /// With probability `rate`, independently for each weight and
    /// bias, adds noise drawn from `Normal(0, rate)`.
    ///
    /// # Errors
    /// If `rate` is negative or not finite.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::networks::FeedForwardNetwork;
    ///
    /// let mut rng = rand::thread_rng();
    /// let mut network = FeedForwardNetwork::with_dimensions(2, 3, 1, &mut rng);
    /// let original = network.clone();
    ///
    /// network.mutate_by_rate(0.0, &mut rng).unwrap();
    /// assert_eq!(network, original);
    ///
    /// assert!(network.mutate_by_rate(-1.0, &mut rng).is_err());
    /// ```
    pub fn mutate_by_rate<R: Rng + ?Sized>(
        &mut self,
        rate: f64,
        rng: &mut R,
    ) -> Result<(), NormalError> {
        // `Normal::new` only rejects non-finite deviations.
        if rate.is_nan() || rate < 0.0 {
            return Err(NormalError::BadVariance);
        }
        let noise = Normal::new(0.0, rate)?;
        self.mutate(|v, _, _| {
            if rng.gen::<f64>() < rate {
                v + noise.sample(rng)
            } else {
                v
            }
        });
        Ok(())
    }

    /// Encodes the network as a JSON object.
    pub fn serialize(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restores a network from the output of [`serialize`].
    ///
    /// # Errors
    /// If the text is not valid network JSON, or any
    /// matrix disagrees with the declared layer sizes.
    ///
    /// [`serialize`]: FeedForwardNetwork::serialize
    pub fn deserialize(text: &str) -> Result<FeedForwardNetwork, DeserializationError> {
        let network: FeedForwardNetwork = serde_json::from_str(text)?;
        let (i, h, o) = network.dimensions();
        network
            .weights_input_to_hidden
            .check_shape("weightsInputToHidden", (h, i))?;
        network
            .weights_hidden_to_output
            .check_shape("weightsHiddenToOutput", (o, h))?;
        network.bias_hidden.check_shape("biasHidden", (h, 1))?;
        network.bias_output.check_shape("biasOutput", (o, 1))?;
        Ok(network)
    }

    fn check_lengths(&self, inputs: &[f64], targets: Option<&[f64]>) {
        assert_eq!(
            inputs.len(),
            self.input_node_count,
            "network expects {} inputs",
            self.input_node_count
        );
        if let Some(targets) = targets {
            assert_eq!(
                targets.len(),
                self.output_node_count,
                "network expects {} targets",
                self.output_node_count
            );
        }
    }

    /// Returns the hidden and output layer activations.
    fn feed_forward(&self, inputs: &Matrix) -> Result<(Matrix, Matrix), MatrixError> {
        let hidden = activate(&self.weights_input_to_hidden, inputs, &self.bias_hidden)?;
        let outputs = activate(&self.weights_hidden_to_output, &hidden, &self.bias_output)?;
        Ok((hidden, outputs))
    }

    fn back_propagate(&mut self, inputs: &Matrix, targets: &Matrix) -> Result<(), MatrixError> {
        let (hidden, outputs) = self.feed_forward(inputs)?;

        let output_errors = Matrix::subtract(targets, &outputs)?;
        let mut output_gradients = Matrix::mapped(&outputs, |y, _, _| sigmoid_derivative(y));
        output_gradients
            .multiply(&output_errors)?
            .multiply_scalar(LEARNING_RATE);
        let hidden_to_output_deltas = Matrix::product(&output_gradients, &hidden.transpose())?;
        self.weights_hidden_to_output
            .add(&hidden_to_output_deltas)?;
        self.bias_output.add(&output_gradients)?;

        let hidden_errors = Matrix::product(&self.weights_hidden_to_output.transpose(), &output_errors)?;
        let mut hidden_gradients = Matrix::mapped(&hidden, |y, _, _| sigmoid_derivative(y));
        hidden_gradients
            .multiply(&hidden_errors)?
            .multiply_scalar(LEARNING_RATE);
        let input_to_hidden_deltas = Matrix::product(&hidden_gradients, &inputs.transpose())?;
        self.weights_input_to_hidden.add(&input_to_hidden_deltas)?;
        self.bias_hidden.add(&hidden_gradients)?;
        Ok(())
    }
}

/// `sigmoid(weights ⨯ inputs + bias)`
fn activate(weights: &Matrix, inputs: &Matrix, bias: &Matrix) -> Result<Matrix, MatrixError> {
    let mut layer = Matrix::product(weights, inputs)?;
    layer.add(bias)?.map(|v, _, _| sigmoid(v));
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network(i: usize, h: usize, o: usize, seed: u64) -> FeedForwardNetwork {
        FeedForwardNetwork::with_dimensions(i, h, o, &mut StdRng::seed_from_u64(seed))
    }

    fn squared_error(network: &FeedForwardNetwork, inputs: &[f64], targets: &[f64]) -> f64 {
        network
            .predict(inputs)
            .iter()
            .zip(targets)
            .map(|(o, t)| (o - t).powi(2))
            .sum()
    }

    #[test]
    fn layer_shapes() {
        let n = network(4, 6, 3, 0);
        assert_eq!(n.weights_input_to_hidden.shape(), (6, 4));
        assert_eq!(n.weights_hidden_to_output.shape(), (3, 6));
        assert_eq!(n.bias_hidden.shape(), (6, 1));
        assert_eq!(n.bias_output.shape(), (3, 1));
    }

    #[test]
    fn outputs_lie_strictly_between_zero_and_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let n = network(5, 8, 2, 2);
        for _ in 0..50 {
            let inputs: Vec<f64> = (0..5).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let outputs = n.predict(&inputs);
            assert_eq!(outputs.len(), 2);
            assert!(outputs.iter().all(|o| *o > 0.0 && *o < 1.0), "{:?}", outputs);
        }
    }

    #[test]
    #[should_panic]
    fn predict_rejects_wrong_input_length() {
        network(3, 2, 1, 3).predict(&[1.0, 2.0]);
    }

    #[test]
    fn copies_are_independent() {
        let original = network(2, 4, 1, 4);
        let inputs = [0.3, -0.7];
        let before = original.predict(&inputs);

        let mut copy = FeedForwardNetwork::from_template(&original);
        copy.mutate(|v, _, _| v + 1.0);

        assert_eq!(original.predict(&inputs), before);
        assert_ne!(copy.predict(&inputs), before);
    }

    #[test]
    fn mutate_visits_every_weight_and_bias() {
        let mut n = network(2, 3, 2, 5);
        n.mutate(|_, _, _| 0.0);
        // All-zero parameters give sigmoid(0) everywhere.
        assert_eq!(n.predict(&[4.0, -9.0]), [0.5, 0.5]);
    }

    #[test]
    fn mutate_by_rate_perturbs_some_parameters() {
        let mut rng = StdRng::seed_from_u64(6);
        let original = network(4, 6, 2, 7);
        let mut mutated = original.clone();
        mutated.mutate_by_rate(0.5, &mut rng).unwrap();

        let changed = original
            .weights_input_to_hidden
            .to_array()
            .iter()
            .zip(mutated.weights_input_to_hidden.to_array())
            .filter(|(a, b)| **a != *b)
            .count();
        assert!(changed > 0 && changed < 24, "changed {}", changed);
    }

    #[test]
    fn training_reduces_error() {
        let mut n = network(2, 4, 1, 8);
        let (inputs, targets) = ([1.0, 0.0], [1.0]);
        let before = squared_error(&n, &inputs, &targets);
        for _ in 0..100 {
            n.train(&inputs, &targets);
        }
        assert!(squared_error(&n, &inputs, &targets) < before);
    }

    #[test]
    fn serialized_form_restores_identical_predictions() {
        let n = network(3, 5, 2, 9);
        let text = n.serialize().unwrap();
        for field in ["inputNodeCount", "weightsInputToHidden", "biasOutput"] {
            assert!(text.contains(field), "missing {}", field);
        }

        let restored = FeedForwardNetwork::deserialize(&text).unwrap();
        assert_eq!(restored, n);
        assert_eq!(restored.predict(&[0.1, 0.2, 0.3]), n.predict(&[0.1, 0.2, 0.3]));
    }

    #[test]
    fn deserialize_rejects_inconsistent_layers() {
        let text = network(3, 5, 2, 10).serialize().unwrap();
        let tampered = text.replacen("\"hiddenNodeCount\":5", "\"hiddenNodeCount\":4", 1);
        assert!(matches!(
            FeedForwardNetwork::deserialize(&tampered),
            Err(DeserializationError::InconsistentShape {
                field: "weightsInputToHidden",
                ..
            })
        ));
        assert!(FeedForwardNetwork::deserialize("{}").is_err());
    }
}
