use crate::Innovation;

use std::error::Error;
use std::fmt;

/// An error type indicating a failure
/// to carry out a connection addition mutation.
#[derive(Debug)]
pub(crate) enum ConnectionAdditionMutationError {
    /// No unconnected pair of distinct nodes was
    /// found within the allowed attempts.
    NoInputOutputPairFound,
}

/// An error type indicating a failure
/// to carry out a node addition mutation.
#[derive(Debug)]
pub(crate) enum NodeAdditionMutationError {
    /// The genome has no connections.
    EmptyGenome,
    /// The chosen connection was already disabled.
    DisabledConnection(Innovation),
}

impl fmt::Display for ConnectionAdditionMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInputOutputPairFound => {
                write!(f, "no viable input-output pair found for connection mutation")
            }
        }
    }
}

impl fmt::Display for NodeAdditionMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGenome => write!(f, "node mutation on empty genome"),
            Self::DisabledConnection(id) => {
                write!(f, "node mutation on disabled connection with id {}", id)
            }
        }
    }
}

impl Error for ConnectionAdditionMutationError {}
impl Error for NodeAdditionMutationError {}
