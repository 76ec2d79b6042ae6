// One play session: owns the current game and turns input into moves
// Restart drops the game and builds a fresh one

use rand::prelude::*;
use std::rc::Rc;
use tracing::info;

use crate::xtf_game::{Coord, Game, Outcome, Player, WinLines};
use crate::xtf_lang::Lang;

pub struct Session {
    lines: Rc<WinLines>, // Shared by every game this session creates
    game: Game,
}

impl Session {
    /// Start with a random first player
    pub fn new(lines: WinLines) -> Self {
        Session::with_rng(lines, &mut thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(lines: WinLines, rng: &mut R) -> Self {
        info!(lines = lines.len(), size = lines.size(), "win lines ready");
        let lines = Rc::new(lines);
        let game = Game::new(Rc::clone(&lines), random_player(rng));
        Session { lines, game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Level-triggered: called every frame with the cell under the pointer
    /// and whether the button is held. Taken cells make repeats harmless.
    pub fn handle_pointer_input(&mut self, cell: Option<Coord>, is_pressed: bool) -> bool {
        match cell {
            Some((row, col)) if is_pressed => self.game.attempt_move(row, col),
            _ => false,
        }
    }

    pub fn handle_restart_signal(&mut self) {
        self.restart_with_rng(&mut thread_rng());
    }

    /// Replace the game wholesale; the first player ignores the last outcome
    pub fn restart_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.game = Game::new(Rc::clone(&self.lines), random_player(rng));
    }

    /// Caption text for the current state
    pub fn status_text(&self, lang: &Lang) -> String {
        status_text(&self.game, lang)
    }
}

fn random_player<R: Rng + ?Sized>(rng: &mut R) -> Player {
    if rng.gen_bool(0.5) { Player::X } else { Player::O }
}

/// Derived from outcome and turn only
pub fn status_text(game: &Game, lang: &Lang) -> String {
    let t = &lang.texts;
    match game.outcome() {
        Outcome::InProgress => Lang::fill(t.status_turn_fmt, &[game.turn().label()]),
        Outcome::Win { winner, .. } => Lang::fill(t.status_win_fmt, &[winner.label()]),
        Outcome::Tie => t.status_tie.to_string(),
    }
}
