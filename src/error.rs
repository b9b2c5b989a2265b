//! Error type shared by every fallible operation.
//!
//! Each variant's message is the descriptive string reported to callers.
//! An operation returning an error leaves the game unchanged.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LudoError {
    #[error("Invalid position '{0}', expected '<pieces> <turn> <captures>'.")]
    InvalidPosition(String),

    #[error("Position has {0} homes, at most 10 are supported.")]
    TooManyHomes(usize),

    #[error("Invalid piece position at '{0}'.")]
    InvalidSquare(char),

    #[error("Player '{0}' has more than 4 pieces.")]
    TooManyPieces(char),

    #[error("Player '{player}' has a piece in unknown home '{frame}'.")]
    InvalidFrame { player: char, frame: u8 },

    #[error("Invalid capture counters '{0}'.")]
    InvalidCaptures(String),

    #[error("Unknown player turn.")]
    UnknownTurn,

    #[error("Invalid player '{0}'.")]
    InvalidPlayer(char),

    #[error("Invalid opening number '{0}', expected 1 to 6.")]
    InvalidOpenWith(u8),

    #[error("Unknown player name or 'distance' is out of range.")]
    UnknownPlayerOrRoll,

    #[error("Invalid move or game is already over.")]
    InvalidMove,

    #[error("Invalid history entry '{0}'.")]
    InvalidNotation(String),

    #[error("Invalid history move.")]
    InvalidHistoryMove,

    #[error("No more undo.")]
    NoMoreUndo,

    #[error("No more redo.")]
    NoMoreRedo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(LudoError::NoMoreRedo.to_string(), "No more redo.");
        assert_eq!(LudoError::NoMoreUndo.to_string(), "No more undo.");
        assert_eq!(LudoError::InvalidHistoryMove.to_string(), "Invalid history move.");
        assert_eq!(LudoError::TooManyPieces('b').to_string(), "Player 'b' has more than 4 pieces.");
        assert_eq!(
            LudoError::InvalidFrame { player: 'a', frame: 7 }.to_string(),
            "Player 'a' has a piece in unknown home '7'."
        );
    }
}
