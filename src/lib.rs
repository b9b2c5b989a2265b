//! Ludo rules engine with a compact 23-square board representation.
//!
//! # Board Layout
//!
//! ```text
//! Square  Kind        Role
//!  0-3    home        home yard, one slot per piece index
//!  4-8    normal      shared path (7 is safe)
//!  9      right-way   last square before the safe-way
//!  10-14  safe-end    home stretch, walked 14 -> 10
//!  15     safe-way    gateway: own frame enters 14, others continue to 21
//!  16     left-way    last square of a sector, next is 4 in the next frame
//!  17-19  normal      shared path, walked 21 -> 16
//!  20     safe        entry square for opened pieces
//!  21     right-way   first square after the safe-way when bypassing
//!  22     goal        final square
//! ```
//!
//! The 23 squares describe a single home sector. Every piece also carries a
//! frame (a home id) naming the sector it is currently in; stepping off
//! square 16 moves the piece onto square 4 of the next frame. One lap of the
//! shared path is therefore `13 * homes` squares:
//!
//! ```text
//! yard -> 20 19 18 17 16 | 4 5 6 7 8 9 15 21 20 ... (next frame)
//!                               own frame: 15 -> 14 13 12 11 10 -> 22
//! ```
//!
//! # Position String
//!
//! ```text
//! "<seg0>/<seg1>/.../<segN> <turn> <captures>"
//!
//! seg:      up to 4 tokens, square letter a-w + optional frame digit
//! turn:     player character on turn ('a' + segment index)
//! captures: one letter per present player, a = 0 .. z = 25
//! ```
//!
//! # History Notation
//!
//! ```text
//! <player><index><roll>[.<player><indices>]*[~|-]
//!
//! a21        piece a2 moved 1
//! c36~       piece c3 opened with a 6
//! c36.a2     piece c3 moved 6 and captured a2
//! a14-       piece a1 moved 4 bypassing its home stretch
//! ```

use serde::{Deserialize, Serialize};

pub mod board;
pub mod error;
pub mod events;
pub mod game;
pub mod history;
pub mod movegen;
pub mod notation;
pub mod options;
pub mod position;
pub mod track;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::{Board, Occupant, Square};
pub use error::LudoError;
pub use events::{Event, EventLog, Listener, MoveKind};
pub use game::Game;
pub use movegen::Move;
pub use notation::{Notation, NotationKind};
pub use options::Options;
pub use track::Track;

/// Number of squares in the board representation.
pub const SQUARE_COUNT: usize = 23;

/// Pieces owned by every player.
pub const PIECES_PER_PLAYER: usize = 4;

/// Maximum number of homes (frame ids are a single decimal digit).
pub const MAX_HOMES: usize = 10;

/// The goal square.
pub const GOAL: u8 = 22;

/// Square an opened piece lands on.
pub const ENTRY: u8 = 20;

/// Gateway square before a home stretch.
pub const SAFE_WAY: u8 = 15;

/// Player identifier, `'a'` for home 0, `'b'` for home 1, and so on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub struct Player(u8);

impl Player {
    /// Create a player from its home id (0-9).
    #[inline]
    pub fn from_home(home: u8) -> Option<Player> {
        ((home as usize) < MAX_HOMES).then_some(Player(home))
    }

    /// Create a player from its character (`'a'`-`'j'`).
    #[inline]
    pub fn from_char(c: char) -> Option<Player> {
        if c.is_ascii_lowercase() {
            Player::from_home(c as u8 - b'a')
        } else {
            None
        }
    }

    /// Home id of this player, also the frame its pieces start in.
    #[inline]
    pub fn home(self) -> u8 {
        self.0
    }

    /// Character used in positions and history entries.
    #[inline]
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl From<Player> for char {
    fn from(player: Player) -> char {
        player.to_char()
    }
}

impl TryFrom<char> for Player {
    type Error = LudoError;

    fn try_from(c: char) -> Result<Player, LudoError> {
        Player::from_char(c).ok_or(LudoError::InvalidPlayer(c))
    }
}

/// A single piece: owning player and piece index (0-3).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId {
    pub player: Player,
    pub index: u8,
}

impl PieceId {
    /// Create a piece identifier. Returns None for an index above 3.
    #[inline]
    pub fn new(player: Player, index: u8) -> Option<PieceId> {
        ((index as usize) < PIECES_PER_PLAYER).then_some(PieceId { player, index })
    }

    /// Bit of this piece inside a square's occupancy mask.
    #[inline]
    pub(crate) fn bit(self) -> u64 {
        1 << (self.player.home() as usize * PIECES_PER_PLAYER + self.index as usize)
    }

    /// Inverse of `bit()` for a bit position.
    #[inline]
    pub(crate) fn from_bit(bit: u32) -> PieceId {
        PieceId {
            player: Player(bit as u8 / PIECES_PER_PLAYER as u8),
            index: bit as u8 % PIECES_PER_PLAYER as u8,
        }
    }

    /// Home yard slot of this piece.
    #[inline]
    pub fn home_slot(self) -> u8 {
        self.index
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.player, self.index)
    }
}

/// Where a piece stands: square index plus the frame it reasons in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Location {
    pub square: u8,
    pub frame: u8,
}

impl Location {
    #[inline]
    pub fn new(square: u8, frame: u8) -> Location {
        Location { square, frame }
    }

    /// Check if the piece is still in a home yard.
    #[inline]
    pub fn in_yard(self) -> bool {
        self.square < 4
    }

    /// Check if the piece is inside a home stretch (10-14).
    #[inline]
    pub fn in_stretch(self) -> bool {
        (10..=14).contains(&self.square)
    }

    #[inline]
    pub fn at_goal(self) -> bool {
        self.square == GOAL
    }
}

/// Static kind of a square.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SquareKind {
    Home,
    Normal,
    Safe,
    SafeWay,
    SafeEnd,
    LeftWay,
    RightWay,
    Goal,
}

impl SquareKind {
    /// Kind of the square at `index`. Indices past 22 are treated as goal.
    pub fn of(index: u8) -> SquareKind {
        match index {
            0..=3 => SquareKind::Home,
            7 | 20 => SquareKind::Safe,
            9 | 21 => SquareKind::RightWay,
            10..=14 => SquareKind::SafeEnd,
            15 => SquareKind::SafeWay,
            16 => SquareKind::LeftWay,
            4..=19 => SquareKind::Normal,
            _ => SquareKind::Goal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SquareKind::Home => "home",
            SquareKind::Normal => "normal",
            SquareKind::Safe => "safe",
            SquareKind::SafeWay => "safe-way",
            SquareKind::SafeEnd => "safe-end",
            SquareKind::LeftWay => "left-way",
            SquareKind::RightWay => "right-way",
            SquareKind::Goal => "goal",
        }
    }
}

impl std::fmt::Display for SquareKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_chars() {
        assert_eq!(Player::from_char('a').map(Player::home), Some(0));
        assert_eq!(Player::from_char('j').map(Player::home), Some(9));
        assert_eq!(Player::from_char('k'), None);
        assert_eq!(Player::from_char('A'), None);

        for home in 0..MAX_HOMES as u8 {
            let player = Player::from_home(home).unwrap();
            assert_eq!(Player::from_char(player.to_char()), Some(player));
        }
    }

    #[test]
    fn test_piece_bits_are_unique() {
        let mut seen = 0u64;
        for home in 0..MAX_HOMES as u8 {
            for index in 0..4 {
                let piece = PieceId::new(Player::from_home(home).unwrap(), index).unwrap();
                assert_eq!(seen & piece.bit(), 0);
                assert_eq!(PieceId::from_bit(piece.bit().trailing_zeros()), piece);
                seen |= piece.bit();
            }
        }
        assert_eq!(seen.count_ones(), 40);
        assert!(PieceId::new(Player::from_home(0).unwrap(), 4).is_none());
    }

    #[test]
    fn test_square_kinds() {
        let kinds: Vec<&str> = (0..SQUARE_COUNT as u8).map(|i| SquareKind::of(i).as_str()).collect();
        assert_eq!(
            kinds,
            [
                "home", "home", "home", "home", "normal", "normal", "normal", "safe", "normal",
                "right-way", "safe-end", "safe-end", "safe-end", "safe-end", "safe-end",
                "safe-way", "left-way", "normal", "normal", "normal", "safe", "right-way", "goal",
            ]
        );
    }

    #[test]
    fn test_location_regions() {
        assert!(Location::new(3, 0).in_yard());
        assert!(!Location::new(4, 0).in_yard());
        assert!(Location::new(10, 0).in_stretch());
        assert!(Location::new(14, 0).in_stretch());
        assert!(!Location::new(15, 0).in_stretch());
        assert!(Location::new(GOAL, 1).at_goal());
    }
}
