//! Event surface: synchronous listeners notified as the game changes.
//!
//! Implement `Listener` for the events you care about; every method has a
//! no-op default. `EventLog` records everything as `Event` values, and
//! `Rc<RefCell<L>>` forwards to `L` so a caller can keep a handle on a
//! listener after handing it to the game.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{Location, PieceId, Player, Square};

/// Why a piece moved.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveKind {
    Move,
    UndoMove,
    Capture,
    UndoCapture,
}

/// Callbacks fired by `Game`, one method per event.
pub trait Listener {
    /// A piece was placed while decoding the starting position.
    fn add(&mut self, _piece: PieceId, _at: Location) {}

    /// Initialisation finished successfully.
    fn init(&mut self) {}

    /// The turn passed to `player` (also fired once after init).
    fn turn(&mut self, _player: Player) {}

    /// A piece moved. `from` and `to` are snapshots taken before the move.
    fn moved(&mut self, _piece: PieceId, _from: &Square, _to: &Square, _kind: MoveKind) {}

    /// A piece reached the goal.
    fn finish(&mut self, _piece: PieceId) {}

    /// Only `last` is left in the rotation; `finished` is the finishing order.
    fn over(&mut self, _finished: &[Player], _last: Player) {}
}

impl<L: Listener + ?Sized> Listener for Rc<RefCell<L>> {
    fn add(&mut self, piece: PieceId, at: Location) {
        self.borrow_mut().add(piece, at)
    }

    fn init(&mut self) {
        self.borrow_mut().init()
    }

    fn turn(&mut self, player: Player) {
        self.borrow_mut().turn(player)
    }

    fn moved(&mut self, piece: PieceId, from: &Square, to: &Square, kind: MoveKind) {
        self.borrow_mut().moved(piece, from, to, kind)
    }

    fn finish(&mut self, piece: PieceId) {
        self.borrow_mut().finish(piece)
    }

    fn over(&mut self, finished: &[Player], last: Player) {
        self.borrow_mut().over(finished, last)
    }
}

/// A recorded event.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    Add { piece: PieceId, at: Location },
    Init,
    Turn { player: Player },
    Move { piece: PieceId, from: Square, to: Square, kind: MoveKind },
    Finish { piece: PieceId },
    Over { finished: Vec<Player>, last: Player },
}

/// Listener that records every event in order.
#[derive(Clone, Default, Debug)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog::default()
    }

    /// A log wrapped for sharing with a `Game`.
    pub fn shared() -> Rc<RefCell<EventLog>> {
        Rc::new(RefCell::new(EventLog::new()))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Most recent `turn` event.
    pub fn last_turn(&self) -> Option<Player> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Turn { player } => Some(*player),
            _ => None,
        })
    }
}

impl Listener for EventLog {
    fn add(&mut self, piece: PieceId, at: Location) {
        self.events.push(Event::Add { piece, at });
    }

    fn init(&mut self) {
        self.events.push(Event::Init);
    }

    fn turn(&mut self, player: Player) {
        self.events.push(Event::Turn { player });
    }

    fn moved(&mut self, piece: PieceId, from: &Square, to: &Square, kind: MoveKind) {
        self.events.push(Event::Move {
            piece,
            from: from.clone(),
            to: to.clone(),
            kind,
        });
    }

    fn finish(&mut self, piece: PieceId) {
        self.events.push(Event::Finish { piece });
    }

    fn over(&mut self, finished: &[Player], last: Player) {
        self.events.push(Event::Over {
            finished: finished.to_vec(),
            last,
        });
    }
}

/// Registered listeners, notified in registration order.
#[derive(Default)]
pub(crate) struct Listeners(Vec<Box<dyn Listener>>);

impl Listeners {
    pub(crate) fn push(&mut self, listener: Box<dyn Listener>) {
        self.0.push(listener);
    }

    pub(crate) fn add(&mut self, piece: PieceId, at: Location) {
        self.0.iter_mut().for_each(|l| l.add(piece, at));
    }

    pub(crate) fn init(&mut self) {
        self.0.iter_mut().for_each(|l| l.init());
    }

    pub(crate) fn turn(&mut self, player: Player) {
        self.0.iter_mut().for_each(|l| l.turn(player));
    }

    pub(crate) fn moved(&mut self, piece: PieceId, from: &Square, to: &Square, kind: MoveKind) {
        self.0.iter_mut().for_each(|l| l.moved(piece, from, to, kind));
    }

    pub(crate) fn finish(&mut self, piece: PieceId) {
        self.0.iter_mut().for_each(|l| l.finish(piece));
    }

    pub(crate) fn over(&mut self, finished: &[Player], last: Player) {
        self.0.iter_mut().for_each(|l| l.over(finished, last));
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listeners({})", self.0.len())
    }
}
