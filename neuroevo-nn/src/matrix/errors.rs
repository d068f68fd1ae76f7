use std::error::Error;
use std::fmt;

/// An error type indicating an arithmetic operation
/// between matrices of incompatible shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixError {
    /// Element-wise operation between matrices
    /// of differing `(rows, cols)` shapes.
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Matrix product where the left operand's column
    /// count differs from the right operand's row count.
    ProductMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// An error type indicating a failure to restore
/// a matrix or network from its JSON form.
#[derive(Debug)]
pub enum DeserializationError {
    /// The text is not a JSON object of the expected form.
    Syntax(serde_json::Error),
    /// A matrix's declared shape disagrees with its data,
    /// or with the shape its position requires.
    InconsistentShape {
        field: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { left, right } => write!(
                f,
                "element-wise operation between {}x{} and {}x{} matrices",
                left.0, left.1, right.0, right.1
            ),
            Self::ProductMismatch { left, right } => write!(
                f,
                "columns of {}x{} matrix must match rows of {}x{} matrix",
                left.0, left.1, right.0, right.1
            ),
        }
    }
}

impl fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "malformed matrix data: {}", e),
            Self::InconsistentShape {
                field,
                expected,
                found,
            } => write!(
                f,
                "{} should be {}x{}, found {}x{}",
                field, expected.0, expected.1, found.0, found.1
            ),
        }
    }
}

impl Error for MatrixError {}

impl Error for DeserializationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::InconsistentShape { .. } => None,
        }
    }
}

impl From<serde_json::Error> for DeserializationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Syntax(e)
    }
}
