//! Legal move generation.
//!
//! Moves are generated per piece, in piece index order:
//! 1. Pieces on the goal square never move.
//! 2. Pieces inside the home stretch only move if the roll does not
//!    overshoot the goal.
//! 3. Pieces in the yard only open on a roll from `Options::open_with`,
//!    and opening always travels a single step onto the entry square.
//! 4. With `Options::capture`, entering the home stretch needs at least one
//!    capture.
//! 5. With `Options::can_round`, a piece about to enter its home stretch is
//!    also offered the move that keeps going around the board.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::{Location, LudoError, Notation, NotationKind, PieceId, Player, Square, PIECES_PER_PLAYER};

/// Roll table used when no roll is given: 1 and 6 come up twice as often.
pub const ROLL_TABLE: [u8; 8] = [1, 2, 3, 6, 1, 4, 5, 6];

/// Draw a roll from `ROLL_TABLE`.
pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    ROLL_TABLE[rng.random_range(0..ROLL_TABLE.len())]
}

/// A candidate move.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    /// The roll this move was generated for.
    pub roll: u8,
    /// The piece leaves the home yard.
    pub initial: bool,
    /// The piece goes around instead of entering its home stretch.
    pub repeat: bool,
    pub from: Square,
    pub to: Square,
    /// Opponent pieces standing on the destination when generated.
    pub captures: Vec<PieceId>,
}

impl Move {
    /// Squares actually travelled.
    #[inline]
    pub fn steps(&self) -> u8 {
        if self.initial {
            1
        } else {
            self.roll
        }
    }

    /// History entry for this move with the given captures.
    pub fn notation(&self, captures: Vec<PieceId>) -> Notation {
        let kind = if self.initial {
            NotationKind::Initial
        } else if self.repeat {
            NotationKind::Repeat
        } else {
            NotationKind::Normal
        };
        Notation {
            piece: self.piece,
            roll: self.roll,
            captures,
            kind,
        }
    }
}

impl Game {
    /// Generate moves for `player` (default: the player on turn) with a
    /// given roll, or a random one when `roll` is 0.
    pub fn moves(&self, player: Option<Player>, roll: u8) -> Result<Vec<Move>, LudoError> {
        self.moves_with_rng(player, roll, &mut rand::rng())
    }

    /// Same as `moves()`, drawing a roll of 0 from the given generator.
    pub fn moves_with_rng<R: Rng + ?Sized>(
        &self,
        player: Option<Player>,
        roll: u8,
        rng: &mut R,
    ) -> Result<Vec<Move>, LudoError> {
        let player = player.or_else(|| self.turn()).ok_or(LudoError::UnknownPlayerOrRoll)?;
        if !self.players.contains(&player) || roll > 6 {
            return Err(LudoError::UnknownPlayerOrRoll);
        }
        let roll = if roll == 0 { self::roll(rng) } else { roll };

        let track = self.track();
        let owner = player.home();
        let mut moves = Vec::with_capacity(PIECES_PER_PLAYER * 2);

        for index in 0..PIECES_PER_PLAYER as u8 {
            let piece = PieceId { player, index };
            let from = self.board.location(piece);

            if from.at_goal() {
                continue;
            }
            // Overshooting the goal from inside the home stretch
            if from.in_stretch() && from.square - roll <= 8 {
                continue;
            }
            if from.in_yard() && !self.options.opens_with(roll) {
                continue;
            }

            let steps = if from.in_yard() { 1 } else { roll };
            let to = track.walk(from, Some(owner), steps);

            let gated = to.in_stretch() && self.options.capture && self.captures(player) == 0;
            if !gated {
                moves.push(self.candidate(piece, roll, from, to, false));
            }

            // Inside the stretch there is nothing left to go around
            if self.options.can_round && to.in_stretch() && !from.in_stretch() {
                let around = track.walk(from, None, steps);
                moves.push(self.candidate(piece, roll, from, around, true));
            }
        }

        Ok(moves)
    }

    fn candidate(&self, piece: PieceId, roll: u8, from: Location, to: Location, repeat: bool) -> Move {
        Move {
            piece,
            roll,
            initial: from.in_yard(),
            repeat,
            from: self.board.view(from),
            to: self.board.view(to),
            captures: self.board.capturable(to, piece.player),
        }
    }
}
