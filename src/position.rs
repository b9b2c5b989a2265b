//! Position codec: the full game state as a single line of text.
//!
//! ```text
//! "aue3d//abcd/ a aa"
//!  |  | |       | |
//!  |  | |       | +- captures: one letter per present player, a = 0
//!  |  | |       +--- player on turn
//!  |  | +----------- empty segment: home 1 is not playing
//!  |  +------------- piece 2 on square 4 ('e') in frame 3
//!  +---------------- segment 0 belongs to player 'a'
//! ```

use crate::game::Game;
use crate::{Location, LudoError, PieceId, Player, MAX_HOMES, PIECES_PER_PLAYER, SQUARE_COUNT};

/// Highest capture count a position string can express.
pub const MAX_ENCODED_CAPTURES: u32 = 25;

/// A decoded position, validated and ready to be loaded into a `Game`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Setup {
    /// Number of segments, including empty ones.
    pub homes: u8,
    /// Every piece of every present player.
    pub pieces: Vec<(PieceId, Location)>,
    /// Present players in segment order.
    pub players: Vec<Player>,
    /// Present players with all four pieces at goal, in segment order.
    pub finished: Vec<Player>,
    /// Capture counters aligned with `players`.
    pub captures: Vec<u32>,
    pub turn: Player,
}

impl Setup {
    /// Decode a position string.
    pub fn parse(position: &str) -> Result<Setup, LudoError> {
        let fields: Vec<&str> = position.split(' ').collect();
        let [pieces_field, turn_field, captures_field] = &fields[..] else {
            return Err(LudoError::InvalidPosition(position.to_string()));
        };

        let segments: Vec<&str> = pieces_field.split('/').collect();
        if segments.len() > MAX_HOMES {
            return Err(LudoError::TooManyHomes(segments.len()));
        }
        let homes = segments.len() as u8;

        let mut pieces = Vec::new();
        let mut players = Vec::new();
        for (home, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                continue;
            }
            let home = home as u8;
            let Some(player) = Player::from_home(home) else {
                return Err(LudoError::TooManyHomes(segments.len()));
            };
            parse_segment(segment, player, homes, &mut pieces)?;
            players.push(player);
        }

        let finished = players
            .iter()
            .copied()
            .filter(|player| {
                pieces
                    .iter()
                    .filter(|(piece, _)| piece.player == *player)
                    .all(|(_, location)| location.at_goal())
            })
            .collect::<Vec<_>>();

        let captures = parse_captures(captures_field, players.len())?;

        let mut turn_chars = turn_field.chars();
        let turn = match (turn_chars.next().and_then(Player::from_char), turn_chars.next()) {
            (Some(player), None) if players.contains(&player) && !finished.contains(&player) => player,
            _ => return Err(LudoError::UnknownTurn),
        };

        Ok(Setup {
            homes,
            pieces,
            players,
            finished,
            captures,
            turn,
        })
    }
}

fn parse_segment(
    segment: &str,
    player: Player,
    homes: u8,
    pieces: &mut Vec<(PieceId, Location)>,
) -> Result<(), LudoError> {
    let mut chars = segment.chars().peekable();
    let mut index = 0u8;

    while let Some(c) = chars.next() {
        if !('a'..='w').contains(&c) {
            return Err(LudoError::InvalidSquare(c));
        }
        if index as usize == PIECES_PER_PLAYER {
            return Err(LudoError::TooManyPieces(player.to_char()));
        }

        let frame = match chars.peek().and_then(|d| d.to_digit(10)) {
            Some(digit) => {
                chars.next();
                digit as u8
            }
            None => player.home(),
        };
        if frame >= homes {
            return Err(LudoError::InvalidFrame {
                player: player.to_char(),
                frame,
            });
        }

        pieces.push((PieceId { player, index }, Location::new(c as u8 - b'a', frame)));
        index += 1;
    }

    // Pieces not listed stay in their yard slot
    for index in index..PIECES_PER_PLAYER as u8 {
        pieces.push((PieceId { player, index }, Location::new(index, player.home())));
    }
    Ok(())
}

fn parse_captures(field: &str, players: usize) -> Result<Vec<u32>, LudoError> {
    let invalid = || LudoError::InvalidCaptures(field.to_string());
    if field.chars().count() > players {
        return Err(invalid());
    }

    let mut captures = field
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                Ok((c as u8 - b'a') as u32)
            } else {
                Err(invalid())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    captures.resize(players, 0);
    Ok(captures)
}

fn square_letter(square: u8) -> char {
    debug_assert!((square as usize) < SQUARE_COUNT);
    (b'a' + square) as char
}

impl Game {
    /// Encode the current position.
    ///
    /// Decoding the result with `Options::with_position` reproduces the
    /// same board, rotation, turn and capture counters (counters above 25
    /// are clamped).
    pub fn position(&self) -> String {
        let mut segments = vec![String::new(); self.board.homes() as usize];
        for &player in &self.players {
            let segment = &mut segments[player.home() as usize];
            for index in 0..PIECES_PER_PLAYER as u8 {
                let location = self.board.location(PieceId { player, index });
                segment.push(square_letter(location.square));
                if location.frame != player.home() {
                    segment.push((b'0' + location.frame) as char);
                }
            }
        }

        let turn = self.turn().map(|p| p.to_string()).unwrap_or_default();
        let captures: String = self
            .players
            .iter()
            .map(|&p| (b'a' + self.captures(p).min(MAX_ENCODED_CAPTURES) as u8) as char)
            .collect();

        format!("{} {} {}", segments.join("/"), turn, captures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(c: char) -> Player {
        Player::from_char(c).unwrap()
    }

    #[test]
    fn test_parse_default_position() {
        let setup = Setup::parse("abcd//abcd/ a aa").unwrap();
        assert_eq!(setup.homes, 4);
        assert_eq!(setup.players, vec![player('a'), player('c')]);
        assert!(setup.finished.is_empty());
        assert_eq!(setup.captures, vec![0, 0]);
        assert_eq!(setup.turn, player('a'));
        assert_eq!(setup.pieces.len(), 8);
        assert_eq!(setup.pieces[4], (PieceId { player: player('c'), index: 0 }, Location::new(0, 2)));
    }

    #[test]
    fn test_parse_frames() {
        let setup = Setup::parse("aue3d//abcd/ a aa").unwrap();
        assert_eq!(setup.pieces[1].1, Location::new(20, 0));
        assert_eq!(setup.pieces[2].1, Location::new(4, 3));
        assert_eq!(setup.pieces[3].1, Location::new(3, 0));
    }

    #[test]
    fn test_parse_short_segment_fills_yard() {
        let setup = Setup::parse("u//ab/ c a").unwrap();
        let a: Vec<Location> = setup.pieces.iter().take(4).map(|(_, l)| *l).collect();
        assert_eq!(
            a,
            vec![Location::new(20, 0), Location::new(1, 0), Location::new(2, 0), Location::new(3, 0)]
        );
        assert_eq!(setup.captures, vec![0, 0]);
    }

    #[test]
    fn test_parse_finished_player() {
        let setup = Setup::parse("wwww/abcd/abcd b aab").unwrap();
        assert_eq!(setup.finished, vec![player('a')]);
        assert_eq!(setup.captures, vec![0, 0, 1]);
        assert_eq!(Setup::parse("wwww/abcd/abcd a aa"), Err(LudoError::UnknownTurn));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Setup::parse("abcd//abcd/ a"), Err(LudoError::InvalidPosition(_))));
        assert!(matches!(Setup::parse("abcd a aa extra"), Err(LudoError::InvalidPosition(_))));
        assert_eq!(Setup::parse("abxd//abcd/ a aa"), Err(LudoError::InvalidSquare('x')));
        assert_eq!(Setup::parse("abcde//abcd/ a aa"), Err(LudoError::TooManyPieces('a')));
        assert_eq!(
            Setup::parse("abc7d//abcd/ a aa"),
            Err(LudoError::InvalidFrame { player: 'a', frame: 7 })
        );
        assert_eq!(Setup::parse("abcd//abcd/ b aa"), Err(LudoError::UnknownTurn));
        assert_eq!(Setup::parse("abcd//abcd/ ac aa"), Err(LudoError::UnknownTurn));
        assert!(matches!(Setup::parse("abcd//abcd/ a aaa"), Err(LudoError::InvalidCaptures(_))));
        assert!(matches!(Setup::parse("abcd//abcd/ a A"), Err(LudoError::InvalidCaptures(_))));
        assert_eq!(
            Setup::parse("a/a/a/a/a/a/a/a/a/a/a a aa"),
            Err(LudoError::TooManyHomes(11))
        );
    }
}
