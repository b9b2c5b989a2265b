//! Coordinate transform: single steps along the track.
//!
//! `owner` is the home id of the piece's true owner, or None when the step
//! should ignore ownership. With None a piece on the safe-way never turns
//! into a home stretch and walks around the board instead.

use crate::{Location, ENTRY, GOAL, SAFE_WAY};

/// Step functions for a board with a given number of homes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Track {
    homes: u8,
}

impl Track {
    #[inline]
    pub fn new(homes: u8) -> Track {
        debug_assert!(homes > 0);
        Track { homes }
    }

    #[inline]
    pub fn homes(self) -> u8 {
        self.homes
    }

    /// One step forward.
    pub fn next(self, at: Location, owner: Option<u8>) -> Location {
        let Location { square, frame } = at;
        match square {
            10 | GOAL => Location::new(GOAL, frame),
            16 => Location::new(4, if frame + 1 >= self.homes { 0 } else { frame + 1 }),
            9 => Location::new(SAFE_WAY, frame),
            0..=3 => Location::new(ENTRY, frame),
            SAFE_WAY if owner != Some(frame) => Location::new(21, frame),
            s if s < 10 => Location::new(s + 1, frame),
            s => Location::new(s - 1, frame),
        }
    }

    /// One step backward. `slot` is the yard slot the piece returns to
    /// when stepping back out of the entry square in its own frame.
    pub fn prev(self, at: Location, owner: Option<u8>, slot: u8) -> Location {
        let Location { square, frame } = at;
        match square {
            GOAL => Location::new(10, frame),
            SAFE_WAY => Location::new(9, frame),
            21 => Location::new(SAFE_WAY, frame),
            4 => Location::new(16, if frame == 0 { self.homes - 1 } else { frame - 1 }),
            s if (s == ENTRY || s < 4) && owner == Some(frame) => Location::new(slot, frame),
            s if s < 10 => Location::new(s.saturating_sub(1), frame),
            s => Location::new(s + 1, frame),
        }
    }

    /// Walk `steps` squares forward.
    pub fn walk(self, mut at: Location, owner: Option<u8>, steps: u8) -> Location {
        for _ in 0..steps {
            at = self.next(at, owner);
        }
        at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: Track = Track { homes: 4 };

    fn loc(square: u8, frame: u8) -> Location {
        Location::new(square, frame)
    }

    #[test]
    fn test_next_special_squares() {
        assert_eq!(TRACK.next(loc(0, 0), None), loc(20, 0));
        assert_eq!(TRACK.next(loc(3, 0), None), loc(20, 0));
        assert_eq!(TRACK.next(loc(22, 0), None), loc(22, 0));
        assert_eq!(TRACK.next(loc(10, 0), None), loc(22, 0));
        assert_eq!(TRACK.next(loc(16, 0), None), loc(4, 1));
        assert_eq!(TRACK.next(loc(16, 3), None), loc(4, 0));
        assert_eq!(TRACK.next(loc(9, 2), None), loc(15, 2));
    }

    #[test]
    fn test_next_safe_way_branch() {
        // Without an owner the piece keeps going around
        assert_eq!(TRACK.next(loc(15, 0), None), loc(21, 0));
        // Someone else's frame
        assert_eq!(TRACK.next(loc(15, 0), Some(1)), loc(21, 0));
        // Own frame enters the home stretch
        assert_eq!(TRACK.next(loc(15, 0), Some(0)), loc(14, 0));
    }

    #[test]
    fn test_prev_special_squares() {
        assert_eq!(TRACK.prev(loc(22, 0), None, 1), loc(10, 0));
        assert_eq!(TRACK.prev(loc(15, 0), None, 1), loc(9, 0));
        assert_eq!(TRACK.prev(loc(21, 0), None, 1), loc(15, 0));
        assert_eq!(TRACK.prev(loc(4, 0), None, 1), loc(16, 3));
        assert_eq!(TRACK.prev(loc(20, 0), None, 1), loc(21, 0));
    }

    #[test]
    fn test_prev_back_into_yard() {
        assert_eq!(TRACK.prev(loc(20, 0), Some(0), 1), loc(1, 0));
        assert_eq!(TRACK.prev(loc(3, 0), Some(0), 1), loc(1, 0));
        // Entry square of another frame is just a path square
        assert_eq!(TRACK.prev(loc(20, 1), Some(0), 1), loc(21, 1));
    }

    #[test]
    fn test_round_trip_on_circuit() {
        for homes in 1..=10u8 {
            let track = Track::new(homes);
            for frame in 0..homes {
                for square in 4..22u8 {
                    let at = loc(square, frame);
                    for owner in [None, Some(frame), Some((frame + 1) % homes)] {
                        // Home stretch squares are only reached in the own frame
                        if at.in_stretch() && owner != Some(frame) {
                            continue;
                        }
                        let forward = track.next(at, owner);
                        if forward.at_goal() {
                            continue;
                        }
                        assert_eq!(track.prev(forward, None, 0), at, "prev(next({at:?}))");
                    }
                    let owner = at.in_stretch().then_some(frame);
                    assert_eq!(track.next(track.prev(at, None, 0), owner), at, "next(prev({at:?}))");
                }
            }
        }
    }

    #[test]
    fn test_opening_round_trip() {
        for slot in 0..4 {
            let yard = loc(slot, 2);
            let opened = TRACK.next(yard, Some(2));
            assert_eq!(opened, loc(20, 2));
            assert_eq!(TRACK.prev(opened, Some(2), slot), yard);
        }
    }

    #[test]
    fn test_full_lap_returns_to_own_stretch() {
        // 20 -> 4 of the next frame, three full sectors of 13, then 4 -> 15
        let mut at = loc(20, 0);
        let mut steps = 0;
        while at.square != 15 || at.frame != 0 {
            at = TRACK.next(at, Some(0));
            steps += 1;
        }
        assert_eq!(steps, 5 + 3 * 13 + 6);
        assert_eq!(TRACK.walk(at, Some(0), 6), loc(22, 0));
    }
}
