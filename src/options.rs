//! Game configuration supplied at init.

use serde::{Deserialize, Serialize};

use crate::LudoError;

/// Default starting position: players `a` and `c` with every piece at home.
pub const DEFAULT_POSITION: &str = "abcd//abcd/ a aa";

/// Options for `Game::init`.
///
/// Deserialises from camelCase keys; missing keys take their default, so
/// `{"historySize": 3}` is a complete configuration.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Rolls that open a piece from the home yard.
    pub open_with: Vec<u8>,
    /// Offer a move past the own home stretch instead of entering it.
    pub can_round: bool,
    /// Require at least one capture before entering the home stretch.
    pub capture: bool,
    /// Starting position string.
    pub position: String,
    /// Space-separated history entries loaded as redoable moves.
    pub state: String,
    /// Number of history entries kept, 0 disables history.
    pub history_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            open_with: vec![6],
            can_round: false,
            capture: false,
            position: DEFAULT_POSITION.to_string(),
            state: String::new(),
            history_size: 0,
        }
    }
}

impl Options {
    /// Options with a custom starting position.
    pub fn with_position(position: impl Into<String>) -> Options {
        Options {
            position: position.into(),
            ..Options::default()
        }
    }

    /// Check values that the type system does not.
    pub fn validate(&self) -> Result<(), LudoError> {
        match self.open_with.iter().find(|&&n| !(1..=6).contains(&n)) {
            Some(&n) => Err(LudoError::InvalidOpenWith(n)),
            None => Ok(()),
        }
    }

    /// Check if a roll opens a piece from the yard.
    #[inline]
    pub fn opens_with(&self, roll: u8) -> bool {
        self.open_with.contains(&roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.open_with, vec![6]);
        assert!(!options.can_round);
        assert!(!options.capture);
        assert_eq!(options.position, "abcd//abcd/ a aa");
        assert_eq!(options.history_size, 0);
        assert!(options.opens_with(6));
        assert!(!options.opens_with(1));
    }

    #[test]
    fn test_deserialize_partial() {
        let options: Options =
            serde_json::from_str(r#"{"historySize": 3, "canRound": true, "openWith": [1, 6]}"#).unwrap();
        assert_eq!(options.history_size, 3);
        assert!(options.can_round);
        assert_eq!(options.open_with, vec![1, 6]);
        assert_eq!(options.position, DEFAULT_POSITION);
    }

    #[test]
    fn test_validate() {
        assert!(Options::default().validate().is_ok());

        let options = Options {
            open_with: vec![6, 7],
            ..Options::default()
        };
        assert_eq!(options.validate(), Err(LudoError::InvalidOpenWith(7)));
    }
}
