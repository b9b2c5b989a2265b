//! WASM bindings for ludo-core
//!
//! Provides a JavaScript-friendly API around `Game`. Events are buffered in
//! an `EventLog` and handed to JS in batches.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::{EventLog, Game, LudoError, Move, Options, Player};

fn to_js(err: LudoError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
    log: Rc<RefCell<EventLog>>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create an uninitialised game; call `init` next.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        let log = EventLog::shared();
        let mut inner = Game::new();
        inner.subscribe(log.clone());
        WasmGame { inner, log }
    }

    /// Initialise from an options object, e.g. `{ position, historySize }`.
    /// Missing fields take their defaults.
    pub fn init(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: Options = if options.is_undefined() || options.is_null() {
            Options::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        self.inner.init(options).map_err(to_js)
    }

    /// Legal moves as an array of move objects. `player` defaults to the
    /// player on turn, a roll of 0 draws a random one.
    pub fn moves(&self, player: Option<String>, roll: u8) -> Result<JsValue, JsValue> {
        let player = match player {
            Some(name) => {
                let mut chars = name.chars();
                match (chars.next().and_then(Player::from_char), chars.next()) {
                    (Some(player), None) => Some(player),
                    _ => return Err(to_js(LudoError::UnknownPlayerOrRoll)),
                }
            }
            None => None,
        };
        let moves = self.inner.moves(player, roll).map_err(to_js)?;
        to_value(&moves)
    }

    /// Apply a move object previously returned by `moves`.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, mov: JsValue) -> Result<(), JsValue> {
        let mov: Move = serde_wasm_bindgen::from_value(mov)?;
        self.inner.apply(&mov).map_err(to_js)
    }

    pub fn undo(&mut self) -> Result<(), JsValue> {
        self.inner.undo().map_err(to_js)
    }

    pub fn redo(&mut self) -> Result<(), JsValue> {
        self.inner.redo().map_err(to_js)
    }

    /// Applied history entries joined by spaces
    pub fn history(&self) -> String {
        self.inner.history()
    }

    /// Current position string
    pub fn position(&self) -> String {
        self.inner.position()
    }

    /// Player on turn, undefined before init
    pub fn turn(&self) -> Option<String> {
        self.inner.turn().map(|p| p.to_string())
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Square snapshot, undefined when out of range
    #[wasm_bindgen(js_name = squareAt)]
    pub fn square_at(&self, index: u8, frame: Option<u8>) -> Result<JsValue, JsValue> {
        match self.inner.square_at(index, frame) {
            Some(square) => to_value(&square),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Events recorded since the last call, oldest first
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        let events = self.log.borrow_mut().drain();
        to_value(&events)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
