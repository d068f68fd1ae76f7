//! The activation function shared by both network designs.

/// The logistic function, `1 / (1 + e^-x)`.
///
/// # Examples
/// ```
/// use neuroevo_nn::activation::sigmoid;
///
/// assert_eq!(sigmoid(0.0), 0.5);
/// assert!(sigmoid(4.0) > 0.98);
/// ```
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the [`sigmoid`] expressed in terms
/// of its output: for `y = sigmoid(x)`, `dy/dx = y(1 - y)`.
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_symmetric() {
        for x in [-3.0, -0.5, 0.25, 2.0] {
            assert!((sigmoid(x) + sigmoid(-x) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let h = 1e-6;
        for x in [-2.0, 0.0, 1.5] {
            let numeric = (sigmoid(x + h) - sigmoid(x - h)) / (2.0 * h);
            assert!((sigmoid_derivative(sigmoid(x)) - numeric).abs() < 1e-8);
        }
    }
}
