use std::error;

use derive_more::{Display, From};

use super::{
    coords::{InvalidPointError, RangeError},
    registry::UnsupportedGameModeError,
    replay::OrderingError,
    sgf::StructuralError,
};

/// An error that occurred somewhere within the broadly defined parsing or
/// serialization process. Every failure is raised synchronously and aborts
/// the whole call; there is no partial result or recovery mode.
#[derive(Debug, From, Display)]
pub enum SgfError {
    /// A character appeared where the state machine has no transition.
    Structural(StructuralError),
    /// A metadata or stone-setup property appeared after moves had begun,
    /// or on a variation branch.
    Ordering(OrderingError),
    /// A coordinate fell outside the supported board extent.
    Range(RangeError),
    /// A coordinate value could not be decoded.
    InvalidPoint(InvalidPointError),
    /// The record declares a game variant this model does not handle.
    UnsupportedGameMode(UnsupportedGameModeError),
    /// The input holds no games at all.
    #[display("the input holds no games")]
    EmptyRecord,
}

impl error::Error for SgfError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Structural(err) => Some(err),
            Self::Ordering(err) => Some(err),
            Self::Range(err) => Some(err),
            Self::InvalidPoint(err) => Some(err),
            Self::UnsupportedGameMode(err) => Some(err),
            Self::EmptyRecord => None,
        }
    }
}
