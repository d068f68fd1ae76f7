//! A small dense matrix of `f64`s, just large enough
//! to carry the weights and activations of a
//! [`FeedForwardNetwork`].
//!
//! Operations between matrices of incompatible shapes
//! never panic: they are logged and reported as a
//! [`MatrixError`], leaving the receiver untouched.
//!
//! [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork

mod errors;

pub use errors::{DeserializationError, MatrixError};

use log::warn;
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A `rows ⨯ cols` grid of numbers.
///
/// Serializes to a JSON object with the fields
/// `rows`, `cols`, and `data` (a list of rows).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "MatrixRepr", try_from = "MatrixRepr")]
pub struct Matrix {
    data: Array2<f64>,
}

/// The serialized form of a [`Matrix`].
#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl From<Matrix> for MatrixRepr {
    fn from(matrix: Matrix) -> MatrixRepr {
        let (rows, cols) = matrix.shape();
        MatrixRepr {
            rows,
            cols,
            data: matrix.data.outer_iter().map(|row| row.to_vec()).collect(),
        }
    }
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = DeserializationError;

    fn try_from(repr: MatrixRepr) -> Result<Matrix, DeserializationError> {
        let expected = (repr.rows, repr.cols);
        let inconsistent = |found| DeserializationError::InconsistentShape {
            field: "data",
            expected,
            found,
        };
        if repr.data.len() != repr.rows {
            return Err(inconsistent((repr.data.len(), repr.cols)));
        }
        if let Some(row) = repr.data.iter().find(|row| row.len() != repr.cols) {
            return Err(inconsistent((repr.rows, row.len())));
        }
        let values: Vec<f64> = repr.data.into_iter().flatten().collect();
        let data = Array2::from_shape_vec(expected, values)
            .map_err(|_| inconsistent(expected))?;
        Ok(Matrix { data })
    }
}

impl Matrix {
    /// Returns a `rows ⨯ cols` matrix filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::matrix::Matrix;
    ///
    /// let m = Matrix::new(2, 3);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert!(m.to_array().iter().all(|v| *v == 0.0));
    /// ```
    pub fn new(rows: usize, cols: usize) -> Matrix {
        Matrix {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Builds an `n ⨯ 1` column matrix from a slice of `n` values.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::matrix::Matrix;
    ///
    /// let m = Matrix::from_array(&[1.0, 2.0, 3.0]);
    /// assert_eq!(m.shape(), (3, 1));
    /// assert_eq!(m.get(1, 0), 2.0);
    /// ```
    pub fn from_array(values: &[f64]) -> Matrix {
        Matrix {
            data: Array1::from(values.to_vec()).insert_axis(Axis(1)),
        }
    }

    /// Flattens the matrix in row-major order.
    pub fn to_array(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Panics
    /// If the position lies outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[[row, col]]
    }

    /// Replaces every value `v` at `(row, col)` with `f(v, row, col)`.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::matrix::Matrix;
    ///
    /// let mut m = Matrix::new(2, 2);
    /// m.map(|_, r, c| (r * 2 + c) as f64);
    /// assert_eq!(m.to_array(), [0.0, 1.0, 2.0, 3.0]);
    /// ```
    pub fn map<F: FnMut(f64, usize, usize) -> f64>(&mut self, mut f: F) -> &mut Matrix {
        for ((r, c), value) in self.data.indexed_iter_mut() {
            *value = f(*value, r, c);
        }
        self
    }

    /// Returns a copy of `matrix` with `f` applied as in [`map`].
    ///
    /// [`map`]: Matrix::map
    pub fn mapped<F: FnMut(f64, usize, usize) -> f64>(matrix: &Matrix, f: F) -> Matrix {
        let mut result = matrix.clone();
        result.map(f);
        result
    }

    /// Fills the matrix with values drawn uniformly from `[-1, 1]`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Matrix {
        self.data = Array2::random_using(self.data.dim(), Uniform::new_inclusive(-1.0, 1.0), rng);
        self
    }

    /// Returns the `cols ⨯ rows` transpose of the matrix.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::matrix::Matrix;
    ///
    /// let m = Matrix::from_array(&[1.0, 2.0]).transpose();
    /// assert_eq!(m.shape(), (1, 2));
    /// assert_eq!(m.get(0, 1), 2.0);
    /// ```
    pub fn transpose(&self) -> Matrix {
        Matrix {
            data: self.data.t().to_owned(),
        }
    }

    /// Adds `other` element-wise.
    ///
    /// # Errors
    /// If the shapes differ, the matrix is left unchanged.
    pub fn add(&mut self, other: &Matrix) -> Result<&mut Matrix, MatrixError> {
        self.check_same_shape(other)?;
        self.data += &other.data;
        Ok(self)
    }

    /// Adds `n` to every value.
    pub fn add_scalar(&mut self, n: f64) -> &mut Matrix {
        self.data.mapv_inplace(|v| v + n);
        self
    }

    /// Multiplies by `other` element-wise (Hadamard product).
    ///
    /// # Errors
    /// If the shapes differ, the matrix is left unchanged.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::matrix::{Matrix, MatrixError};
    ///
    /// let mut m = Matrix::from_array(&[1.0, 2.0]);
    /// m.multiply(&Matrix::from_array(&[3.0, 4.0])).unwrap();
    /// assert_eq!(m.to_array(), [3.0, 8.0]);
    ///
    /// let err = m.multiply(&Matrix::new(1, 2)).unwrap_err();
    /// assert!(matches!(err, MatrixError::DimensionMismatch { .. }));
    /// ```
    pub fn multiply(&mut self, other: &Matrix) -> Result<&mut Matrix, MatrixError> {
        self.check_same_shape(other)?;
        self.data *= &other.data;
        Ok(self)
    }

    /// Multiplies every value by `n`.
    pub fn multiply_scalar(&mut self, n: f64) -> &mut Matrix {
        self.data.mapv_inplace(|v| v * n);
        self
    }

    /// Returns `a - b`, element-wise.
    ///
    /// # Errors
    /// If the shapes differ.
    pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        a.check_same_shape(b)?;
        Ok(Matrix {
            data: &a.data - &b.data,
        })
    }

    /// Returns the matrix product `a ⨯ b`.
    ///
    /// # Errors
    /// If `a`'s column count differs from `b`'s row count.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::matrix::Matrix;
    ///
    /// let mut a = Matrix::new(2, 3);
    /// a.map(|_, r, c| (r + c) as f64);
    /// let b = Matrix::from_array(&[1.0, 1.0, 1.0]);
    ///
    /// let p = Matrix::product(&a, &b).unwrap();
    /// assert_eq!(p.shape(), (2, 1));
    /// assert_eq!(p.to_array(), [3.0, 6.0]);
    ///
    /// assert!(Matrix::product(&b, &a).is_err());
    /// ```
    pub fn product(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        if a.cols() != b.rows() {
            let err = MatrixError::ProductMismatch {
                left: a.shape(),
                right: b.shape(),
            };
            warn!("{}", err);
            return Err(err);
        }
        Ok(Matrix {
            data: a.data.dot(&b.data),
        })
    }

    /// Encodes the matrix as a JSON object.
    ///
    /// Non-finite values have no JSON representation
    /// and are written as `null`, which [`deserialize`]
    /// then rejects.
    ///
    /// [`deserialize`]: Matrix::deserialize
    pub fn serialize(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restores a matrix from the output of [`serialize`].
    ///
    /// # Errors
    /// If the text is not valid matrix JSON, or
    /// its `data` disagrees with `rows` and `cols`.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::matrix::Matrix;
    ///
    /// let m = Matrix::deserialize(r#"{"rows":1,"cols":2,"data":[[0.5,-1.0]]}"#).unwrap();
    /// assert_eq!(m.to_array(), [0.5, -1.0]);
    ///
    /// assert!(Matrix::deserialize(r#"{"rows":2,"cols":2,"data":[[0.5,-1.0]]}"#).is_err());
    /// ```
    ///
    /// [`serialize`]: Matrix::serialize
    pub fn deserialize(text: &str) -> Result<Matrix, DeserializationError> {
        let repr: MatrixRepr = serde_json::from_str(text)?;
        Matrix::try_from(repr)
    }

    /// Checks that the matrix is `expected` in shape.
    pub(crate) fn check_shape(
        &self,
        field: &'static str,
        expected: (usize, usize),
    ) -> Result<(), DeserializationError> {
        if self.shape() == expected {
            Ok(())
        } else {
            Err(DeserializationError::InconsistentShape {
                field,
                expected,
                found: self.shape(),
            })
        }
    }

    fn check_same_shape(&self, other: &Matrix) -> Result<(), MatrixError> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            let err = MatrixError::DimensionMismatch {
                left: self.shape(),
                right: other.shape(),
            };
            warn!("{}", err);
            Err(err)
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.outer_iter() {
            let row: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_matrix(rows: usize, cols: usize, seed: u64) -> Matrix {
        let mut m = Matrix::new(rows, cols);
        m.randomize(&mut StdRng::seed_from_u64(seed));
        m
    }

    #[test]
    fn randomize_stays_in_unit_range() {
        let m = random_matrix(6, 7, 1);
        assert!(m.to_array().iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(m.to_array().iter().any(|v| *v != 0.0));
    }

    #[test]
    fn subtract_self_is_zero() {
        let a = random_matrix(3, 4, 2);
        let zero = Matrix::subtract(&a, &a).unwrap();
        assert_eq!(zero, Matrix::new(3, 4));
    }

    #[test]
    fn double_transpose_is_identity() {
        let a = random_matrix(2, 5, 3);
        assert_eq!(a.transpose().shape(), (5, 2));
        assert_eq!(a.transpose().transpose(), a);
    }

    #[test]
    fn product_shape() {
        let a = random_matrix(4, 3, 4);
        let b = random_matrix(3, 2, 5);
        assert_eq!(Matrix::product(&a, &b).unwrap().shape(), (4, 2));
        assert_eq!(
            Matrix::product(&b, &a).unwrap_err(),
            MatrixError::ProductMismatch {
                left: (3, 2),
                right: (4, 3)
            }
        );
    }

    #[test]
    fn mismatched_element_wise_leaves_receiver_unchanged() {
        let mut a = random_matrix(2, 2, 6);
        let before = a.clone();
        let other = Matrix::new(2, 3);

        assert!(a.add(&other).is_err());
        assert!(a.multiply(&other).is_err());
        assert!(Matrix::subtract(&a, &other).is_err());
        assert_eq!(a, before);
    }

    #[test]
    fn scalar_operations_chain() {
        let mut a = Matrix::from_array(&[1.0, -2.0]);
        a.add_scalar(1.0).multiply_scalar(3.0);
        assert_eq!(a.to_array(), [6.0, -3.0]);
    }

    #[test]
    fn array_conversions() {
        let values = [0.25, -1.5, 3.0];
        let column = Matrix::from_array(&values);
        assert_eq!(column.rows(), 3);
        assert_eq!(column.cols(), 1);
        assert_eq!(column.to_array(), values);
    }

    #[test]
    fn serialized_form_restores_equal_matrix() {
        let a = random_matrix(3, 2, 7);
        let text = a.serialize().unwrap();
        assert!(text.contains("\"rows\":3"));
        assert!(text.contains("\"cols\":2"));
        assert_eq!(Matrix::deserialize(&text).unwrap(), a);
    }

    #[test]
    fn malformed_text_is_rejected() {
        for text in [
            "",
            "[1, 2, 3]",
            r#"{"rows":1,"cols":1}"#,
            r#"{"rows":1,"cols":2,"data":[[1.0]]}"#,
            r#"{"rows":2,"cols":1,"data":[[1.0]]}"#,
            r#"{"rows":1,"cols":1,"data":[[null]]}"#,
        ] {
            assert!(Matrix::deserialize(text).is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn ragged_data_reports_inconsistent_shape() {
        let err = Matrix::deserialize(r#"{"rows":2,"cols":2,"data":[[1.0,2.0],[3.0]]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            DeserializationError::InconsistentShape {
                expected: (2, 2),
                found: (2, 1),
                ..
            }
        ));
    }

    #[test]
    fn transposed_product_matches_hand_computation() {
        let mut a = Matrix::new(2, 3);
        a.map(|_, r, c| (r * 3 + c) as f64);
        let p = Matrix::product(&a, &a.transpose()).unwrap();
        assert_eq!(p.shape(), (2, 2));
        assert_eq!(p.to_array(), [5.0, 14.0, 14.0, 50.0]);
    }

    #[test]
    fn non_finite_values_do_not_survive_serialization() {
        let mut a = Matrix::new(1, 1);
        a.add_scalar(f64::NAN);
        let text = a.serialize().unwrap();
        assert!(matches!(
            Matrix::deserialize(&text),
            Err(DeserializationError::Syntax(_))
        ));
    }
}
