//! Game state, move execution and undo/redo.
//!
//! All mutable state lives in `Game`; independent games are independent
//! values. Every operation either succeeds completely or returns an error
//! without touching the state.

use tracing::{debug, trace, warn};

use crate::board::Board;
use crate::events::Listeners;
use crate::history::History;
use crate::position::Setup;
use crate::{
    Listener, Location, LudoError, Move, MoveKind, Notation, NotationKind, Options, PieceId, Player, Square,
    Track, MAX_HOMES, PIECES_PER_PLAYER,
};

/// How a successful move is written to the history.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Recording {
    /// A new move: append it, dropping the redo tail.
    Append,
    /// A redo of the entry after the cursor: rewrite it with the captures
    /// actually made and advance the cursor.
    Replay,
}

/// A Ludo game.
#[derive(Debug)]
pub struct Game {
    pub(crate) options: Options,
    pub(crate) board: Board,
    /// Present players in segment order.
    pub(crate) players: Vec<Player>,
    /// Players still playing, sorted by character.
    pub(crate) active: Vec<Player>,
    /// Players with every piece at goal, in finishing order.
    pub(crate) finished: Vec<Player>,
    /// Index into `active` of the player on turn.
    pub(crate) turn: usize,
    pub(crate) captures: [u32; MAX_HOMES],
    pub(crate) history: History,
    listeners: Listeners,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create an empty game. Call `init()` before playing; listeners
    /// subscribed before that see the init events.
    pub fn new() -> Game {
        Game {
            options: Options::default(),
            board: Board::new(0),
            players: Vec::new(),
            active: Vec::new(),
            finished: Vec::new(),
            turn: 0,
            captures: [0; MAX_HOMES],
            history: History::default(),
            listeners: Listeners::default(),
        }
    }

    /// Create and initialise a game in one go.
    pub fn from_options(options: Options) -> Result<Game, LudoError> {
        let mut game = Game::new();
        game.init(options)?;
        Ok(game)
    }

    /// Register a listener. Listeners are called synchronously, in
    /// registration order.
    pub fn subscribe(&mut self, listener: impl Listener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ========== Initialisation ==========

    /// Reset the game from `options`.
    ///
    /// Everything is validated before the previous state is discarded, so a
    /// failed init leaves the game as it was.
    pub fn init(&mut self, options: Options) -> Result<(), LudoError> {
        options.validate()?;
        let setup = Setup::parse(&options.position)?;
        let seed = options
            .state
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Notation>, _>>()?;

        self.board = Board::new(setup.homes);
        self.captures = [0; MAX_HOMES];
        for (player, count) in setup.players.iter().zip(&setup.captures) {
            self.captures[player.home() as usize] = *count;
        }
        self.players = setup.players.clone();
        self.finished = setup.finished.clone();
        self.active = setup
            .players
            .iter()
            .copied()
            .filter(|p| !setup.finished.contains(p))
            .collect();
        self.turn = self.active.iter().position(|p| *p == setup.turn).unwrap_or(0);
        self.history = History::seeded(options.history_size, seed);
        self.options = options;

        for (piece, location) in &setup.pieces {
            self.board.relocate(*piece, *location);
            self.listeners.add(*piece, *location);
        }

        debug!(
            position = %self.options.position,
            homes = setup.homes,
            players = self.players.len(),
            seeded = self.history.len(),
            "game initialised"
        );
        self.listeners.init();
        self.listeners.turn(setup.turn);
        Ok(())
    }

    // ========== Queries ==========

    /// Player on turn, None before init.
    pub fn turn(&self) -> Option<Player> {
        self.active.get(self.turn).copied()
    }

    /// Every player on the board, in segment order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Players still in the rotation.
    pub fn active(&self) -> &[Player] {
        &self.active
    }

    /// Players that brought all pieces home, in finishing order.
    pub fn finished(&self) -> &[Player] {
        &self.finished
    }

    /// Number of opponent pieces `player` has captured.
    pub fn captures(&self, player: Player) -> u32 {
        self.captures[player.home() as usize]
    }

    /// Check if only one player is left in the rotation.
    pub fn is_over(&self) -> bool {
        !self.players.is_empty() && self.active.len() <= 1
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Applied history entries joined by spaces.
    pub fn history(&self) -> String {
        self.history.to_string()
    }

    /// The history ring including redoable entries.
    pub fn history_log(&self) -> &History {
        &self.history
    }

    pub(crate) fn track(&self) -> Track {
        Track::new(self.board.homes())
    }

    /// Look up a square, optionally filtered by frame.
    pub fn square_at(&self, index: u8, frame: Option<u8>) -> Option<Square> {
        self.board.square_at(index, frame)
    }

    /// Square of a piece, None for an unknown player or index.
    pub fn square_of(&self, player: Player, index: u8) -> Option<Square> {
        let piece = PieceId::new(player, index)?;
        if !self.players.contains(&player) {
            return None;
        }
        self.board.square_of(piece)
    }

    /// Square one step forward from `(square, frame)`.
    pub fn next_square(&self, square: u8, frame: u8, owner: Option<u8>) -> Option<Square> {
        let at = Location::new(square, frame);
        if !self.board.contains(at) {
            return None;
        }
        self.board.square_at_location(self.track().next(at, owner))
    }

    /// Square one step backward from `(square, frame)`; `slot` is the yard
    /// slot used when stepping back into the yard in the owner's frame.
    pub fn prev_square(&self, square: u8, frame: u8, slot: u8, owner: Option<u8>) -> Option<Square> {
        let at = Location::new(square, frame);
        if !self.board.contains(at) || slot as usize >= PIECES_PER_PLAYER {
            return None;
        }
        self.board.square_at_location(self.track().prev(at, owner, slot))
    }

    // ========== Move Execution ==========

    /// Apply a move, usually one returned by `moves()`.
    pub fn apply(&mut self, mov: &Move) -> Result<(), LudoError> {
        self.execute(mov, Recording::Append)
    }

    /// Check that a move can be applied to the current state and return
    /// its source and destination.
    fn check_move(&self, mov: &Move) -> Result<(Location, Location), LudoError> {
        let piece = mov.piece;
        let to = mov.to.location().ok_or(LudoError::InvalidMove)?;
        if self.active.len() < 2
            || !self.players.contains(&piece.player)
            || piece.index as usize >= PIECES_PER_PLAYER
            || !(1..=6).contains(&mov.roll)
            || !self.board.contains(to)
        {
            return Err(LudoError::InvalidMove);
        }

        let from = self.board.location(piece);
        if mov.from.index != from.square || mov.from.frame.is_some_and(|f| f != from.frame) {
            return Err(LudoError::InvalidMove);
        }
        if mov.initial != from.in_yard() || from.at_goal() {
            return Err(LudoError::InvalidMove);
        }
        if from.in_yard() && !self.options.opens_with(mov.roll) {
            return Err(LudoError::InvalidMove);
        }
        // Walking past the goal stalls on it and could not be walked back
        if from.in_stretch() && from.square - mov.roll <= 8 {
            return Err(LudoError::InvalidMove);
        }

        // The destination must be where the track actually leads
        let owner = (!mov.repeat).then_some(piece.player.home());
        if self.track().walk(from, owner, mov.steps()) != to {
            return Err(LudoError::InvalidMove);
        }
        Ok((from, to))
    }

    fn execute(&mut self, mov: &Move, recording: Recording) -> Result<(), LudoError> {
        let (from, to) = self.check_move(mov)?;
        let piece = mov.piece;
        let mover = piece.player;

        // Recomputed: the board may differ from when the move was generated
        let captures = self.board.capturable(to, mover);

        match recording {
            Recording::Append => self.history.record(mov.notation(captures.clone())),
            Recording::Replay => self.history.replay(mov.notation(captures.clone())),
        }
        debug!(
            piece = %piece,
            roll = mov.roll,
            from = from.square,
            to = to.square,
            captures = captures.len(),
            "apply move"
        );

        for &captured in &captures {
            let home = Location::new(captured.home_slot(), captured.player.home());
            self.relocate(captured, home, MoveKind::Capture);
            self.captures[mover.home() as usize] += 1;
        }
        self.relocate(piece, to, MoveKind::Move);

        let mut removed = None;
        if to.at_goal() {
            self.listeners.finish(piece);
            if self.board.all_at_goal(mover) {
                if let Some(pos) = self.active.iter().position(|p| *p == mover) {
                    self.active.remove(pos);
                    self.finished.push(mover);
                    removed = Some(pos);
                    debug!(player = %mover, "player finished");
                }
            }
        }

        if let [last] = self.active[..] {
            debug!(last = %last, "game over");
            self.listeners.over(&self.finished, last);
        }

        // Removing the player on turn (or one before it) already shifted
        // the next player into place.
        let next = match removed {
            Some(pos) if pos <= self.turn => self.turn,
            _ => self.turn + 1,
        };
        self.turn = if next >= self.active.len() { 0 } else { next };
        if let Some(player) = self.turn() {
            self.listeners.turn(player);
        }
        Ok(())
    }

    /// Move a piece and notify listeners with before-move snapshots.
    fn relocate(&mut self, piece: PieceId, to: Location, kind: MoveKind) {
        let from_square = self.board.view(self.board.location(piece));
        let to_square = self.board.view(to);
        self.board.relocate(piece, to);
        self.listeners.moved(piece, &from_square, &to_square, kind);
    }

    // ========== Undo / Redo ==========

    fn check_entry(&self, entry: &Notation) -> Result<(), LudoError> {
        let known = |p: &Player| self.players.contains(p);
        if known(&entry.piece.player) && entry.captures.iter().all(|c| known(&c.player)) {
            Ok(())
        } else {
            warn!(entry = %entry, "history entry names a player that is not on the board");
            Err(LudoError::InvalidHistoryMove)
        }
    }

    /// Revert the most recent applied move.
    pub fn undo(&mut self) -> Result<(), LudoError> {
        let entry = self.history.peek_undo().cloned().ok_or(LudoError::NoMoreUndo)?;
        self.check_entry(&entry)?;

        let piece = entry.piece;
        let initial = entry.kind == NotationKind::Initial;
        let owner = initial.then_some(piece.player.home());
        let track = self.track();
        let current = self.board.location(piece);

        let mut at = current;
        for remaining in (0..entry.steps()).rev() {
            at = track.prev(at, owner, piece.home_slot());
            trace!(square = at.square, frame = at.frame, remaining, "undo step");
            if at.in_yard() && remaining > 0 {
                warn!(entry = %entry, "history entry walks back through the yard");
                return Err(LudoError::InvalidHistoryMove);
            }
        }
        if at.in_yard() != initial {
            warn!(entry = %entry, "history entry does not match the piece's position");
            return Err(LudoError::InvalidHistoryMove);
        }

        self.history.step_back();
        debug!(entry = %entry, from = current.square, to = at.square, "undo move");
        self.relocate(piece, at, MoveKind::UndoMove);

        for &captured in &entry.captures {
            self.relocate(captured, current, MoveKind::UndoCapture);
            let count = &mut self.captures[piece.player.home() as usize];
            *count = count.saturating_sub(1);
        }

        let mut reinstated = None;
        if current.at_goal() {
            if let Some(pos) = self.finished.iter().position(|p| *p == piece.player) {
                self.finished.remove(pos);
                let slot = self.active.partition_point(|p| *p < piece.player);
                self.active.insert(slot, piece.player);
                reinstated = Some(slot);
            }
        }

        self.turn = match reinstated {
            Some(slot) => slot,
            None if self.turn == 0 => self.active.len().saturating_sub(1),
            None => self.turn - 1,
        };
        if let Some(player) = self.turn() {
            self.listeners.turn(player);
        }
        Ok(())
    }

    /// Replay the most recently undone move.
    pub fn redo(&mut self) -> Result<(), LudoError> {
        let entry = self.history.peek_redo().cloned().ok_or(LudoError::NoMoreRedo)?;
        self.check_entry(&entry)?;

        let piece = entry.piece;
        let from = self.board.location(piece);
        if from.in_yard() != (entry.kind == NotationKind::Initial) {
            warn!(entry = %entry, "history entry does not match the piece's position");
            return Err(LudoError::InvalidHistoryMove);
        }

        let owner = (entry.kind != NotationKind::Repeat).then_some(piece.player.home());
        let track = self.track();
        let mut to = from;
        for remaining in (0..entry.steps()).rev() {
            to = track.next(to, owner);
            trace!(square = to.square, frame = to.frame, remaining, "redo step");
            if to.at_goal() && remaining > 0 {
                warn!(entry = %entry, "history entry runs past the goal");
                return Err(LudoError::InvalidHistoryMove);
            }
        }

        let mov = Move {
            piece,
            roll: entry.roll,
            initial: entry.kind == NotationKind::Initial,
            repeat: entry.kind == NotationKind::Repeat,
            from: self.board.view(from),
            to: self.board.view(to),
            captures: self.board.capturable(to, piece.player),
        };
        debug!(entry = %entry, "redo move");
        self.execute(&mov, Recording::Replay)
    }
}
