//! Board occupancy and square lookups.
//!
//! # Occupancy Encoding
//!
//! ```text
//! occupancy[square]: u64, one bit per piece
//!   bit = home * 4 + piece index      (10 homes x 4 pieces = 40 bits)
//!
//! locations[home][index]: (square, frame) of every piece
//! ```
//!
//! A piece is only ever moved through `relocate()`, which clears the bit on
//! the old square before setting it on the new one, so every piece has
//! exactly one occupancy bit and it always sits on the recorded square.

use serde::{Deserialize, Serialize};

use crate::{Location, PieceId, Player, SquareKind, MAX_HOMES, PIECES_PER_PLAYER, SQUARE_COUNT};

/// A piece listed on a square.
///
/// `frame` is only present when the square was looked up without a frame
/// filter; with a filter every listed piece is in the filtered frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Occupant {
    #[serde(flatten)]
    pub piece: PieceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u8>,
}

/// Snapshot of a square as seen through an optional frame filter.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Square {
    pub kind: SquareKind,
    pub index: u8,
    /// The frame filter used for the lookup, None for "any frame".
    pub frame: Option<u8>,
    pub pieces: Vec<Occupant>,
}

impl Square {
    /// Location this snapshot refers to, if it was taken with a frame filter.
    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.frame.map(|frame| Location::new(self.index, frame))
    }

    /// Pieces on this square as bare identifiers.
    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.iter().map(|o| o.piece)
    }
}

/// Mutable board state: per-square occupancy plus per-piece locations.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    occupancy: [u64; SQUARE_COUNT],
    locations: [[Location; PIECES_PER_PLAYER]; MAX_HOMES],
    homes: u8,
}

impl Board {
    /// Create an empty board with `homes` home sectors.
    ///
    /// Piece locations default to their yard slot in their own frame, but
    /// no occupancy bit is set until a piece is placed with `relocate()`.
    pub fn new(homes: u8) -> Board {
        let mut locations = [[Location::new(0, 0); PIECES_PER_PLAYER]; MAX_HOMES];
        for (home, pieces) in locations.iter_mut().enumerate() {
            for (index, location) in pieces.iter_mut().enumerate() {
                *location = Location::new(index as u8, home as u8);
            }
        }

        Board {
            occupancy: [0; SQUARE_COUNT],
            locations,
            homes,
        }
    }

    /// Number of home sectors (segments of the position string).
    #[inline]
    pub fn homes(&self) -> u8 {
        self.homes
    }

    /// Current location of a piece.
    #[inline]
    pub fn location(&self, piece: PieceId) -> Location {
        self.locations[piece.player.home() as usize][piece.index as usize]
    }

    /// Move a piece to a new location, keeping occupancy in sync.
    /// Does NOT validate - caller must ensure the location is on the board.
    pub fn relocate(&mut self, piece: PieceId, to: Location) {
        debug_assert!((to.square as usize) < SQUARE_COUNT && to.frame < self.homes);
        let from = self.location(piece);
        self.occupancy[from.square as usize] &= !piece.bit();
        self.occupancy[to.square as usize] |= piece.bit();
        self.locations[piece.player.home() as usize][piece.index as usize] = to;
    }

    /// Pieces standing on a square, in (player, index) order.
    pub fn occupants(&self, square: u8) -> impl Iterator<Item = PieceId> {
        let mut mask = self.occupancy.get(square as usize).copied().unwrap_or(0);
        std::iter::from_fn(move || {
            if mask == 0 {
                return None;
            }
            let bit = mask.trailing_zeros();
            mask &= mask - 1;
            Some(PieceId::from_bit(bit))
        })
    }

    /// Look up a square.
    ///
    /// Returns None if `index` is past 22 or the frame filter names a home
    /// that is not on this board.
    pub fn square_at(&self, index: u8, frame: Option<u8>) -> Option<Square> {
        if index as usize >= SQUARE_COUNT || frame.is_some_and(|f| f >= self.homes) {
            return None;
        }
        Some(self.snapshot(index, frame))
    }

    /// Snapshot of a location known to be on the board.
    pub(crate) fn view(&self, location: Location) -> Square {
        debug_assert!((location.square as usize) < SQUARE_COUNT && location.frame < self.homes);
        self.snapshot(location.square, Some(location.frame))
    }

    fn snapshot(&self, index: u8, frame: Option<u8>) -> Square {
        let pieces = self
            .occupants(index)
            .filter_map(|piece| {
                let piece_frame = self.location(piece).frame;
                match frame {
                    None => Some(Occupant { piece, frame: Some(piece_frame) }),
                    Some(f) if f == piece_frame => Some(Occupant { piece, frame: None }),
                    Some(_) => None,
                }
            })
            .collect();

        Square {
            kind: SquareKind::of(index),
            index,
            frame,
            pieces,
        }
    }

    /// Check if a location names a square and frame on this board.
    #[inline]
    pub fn contains(&self, location: Location) -> bool {
        (location.square as usize) < SQUARE_COUNT && location.frame < self.homes
    }

    /// Look up a square through a location's frame.
    #[inline]
    pub fn square_at_location(&self, location: Location) -> Option<Square> {
        self.square_at(location.square, Some(location.frame))
    }

    /// Square a piece stands on, seen through the piece's own frame.
    pub fn square_of(&self, piece: PieceId) -> Option<Square> {
        self.square_at_location(self.location(piece))
    }

    /// Pieces of other players that a piece of `mover` would capture at
    /// `location`. Always empty on a safe square.
    pub fn capturable(&self, location: Location, mover: Player) -> Vec<PieceId> {
        if SquareKind::of(location.square) == SquareKind::Safe {
            return Vec::new();
        }
        self.occupants(location.square)
            .filter(|piece| piece.player != mover && self.location(*piece).frame == location.frame)
            .collect()
    }

    /// Check if all four pieces of a player are on the goal square.
    pub fn all_at_goal(&self, player: Player) -> bool {
        self.locations[player.home() as usize].iter().all(|l| l.at_goal())
    }
}
