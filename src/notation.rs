//! Compact history notation for a single move.
//!
//! ```text
//! entry   := player index roll capture* marker?
//! player  := 'a'..'j'
//! index   := '0'..'3'
//! roll    := '1'..'6'
//! capture := '.' player index+
//! marker  := '~' (opened from the yard) | '-' (went around the home stretch)
//! ```
//!
//! Captured pieces are grouped by owner, so a capture of `a2` renders as
//! `c36.a2` and a capture of `b0`, `b1` and `c2` as `a15.b01.c2`.

use std::fmt;
use std::str::FromStr;

use crate::{LudoError, PieceId, Player};

/// How the move left its source square.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum NotationKind {
    Normal,
    /// Opened from the home yard (`~`).
    Initial,
    /// Bypassed the own home stretch (`-`).
    Repeat,
}

/// A decoded history entry.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Notation {
    pub piece: PieceId,
    pub roll: u8,
    pub captures: Vec<PieceId>,
    pub kind: NotationKind,
}

impl Notation {
    /// Number of squares the piece actually travelled.
    #[inline]
    pub fn steps(&self) -> u8 {
        match self.kind {
            NotationKind::Initial => 1,
            _ => self.roll,
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.piece, self.roll)?;

        let mut group = None;
        for captured in &self.captures {
            if group != Some(captured.player) {
                write!(f, ".{}", captured.player)?;
                group = Some(captured.player);
            }
            write!(f, "{}", captured.index)?;
        }

        match self.kind {
            NotationKind::Normal => Ok(()),
            NotationKind::Initial => f.write_str("~"),
            NotationKind::Repeat => f.write_str("-"),
        }
    }
}

fn piece_index(c: char) -> Option<u8> {
    ('0'..='3').contains(&c).then(|| c as u8 - b'0')
}

impl FromStr for Notation {
    type Err = LudoError;

    fn from_str(s: &str) -> Result<Notation, LudoError> {
        let invalid = || LudoError::InvalidNotation(s.to_string());
        let mut chars = s.chars().peekable();

        let player = chars.next().and_then(Player::from_char).ok_or_else(invalid)?;
        let index = chars.next().and_then(piece_index).ok_or_else(invalid)?;
        let roll = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .filter(|r| (1..=6).contains(r))
            .ok_or_else(invalid)? as u8;

        let mut captures = Vec::new();
        while chars.next_if_eq(&'.').is_some() {
            let captured = chars.next().and_then(Player::from_char).ok_or_else(invalid)?;
            let start = captures.len();
            while let Some(index) = chars.peek().copied().and_then(piece_index) {
                chars.next();
                captures.push(PieceId { player: captured, index });
            }
            if captures.len() == start {
                return Err(invalid());
            }
        }

        let kind = match chars.next() {
            None => NotationKind::Normal,
            Some('~') => NotationKind::Initial,
            Some('-') => NotationKind::Repeat,
            Some(_) => return Err(invalid()),
        };
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Notation {
            piece: PieceId { player, index },
            roll,
            captures,
            kind,
        })
    }
}
