//! Turn engine: who moves, when a roll is accepted, and when a round ends.
//!
//! Every input is either valid for the current state and applied, or
//! silently ignored. Rolls that would pass the last cell are recorded but
//! wasted, and the same player rolls again.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

use crate::board::{Cell, TransportMap};
use crate::error::MoveError;
use crate::player::Player;

pub const DIE_FACES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingRoll,
    Moving,
    TurnOver,
    GameWon,
}

/// Requests from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RequestRoll,
    RequestRestart,
    RequestMenu,
    RequestPlay,
}

#[derive(Debug)]
pub struct TurnEngine<R: Rng = StdRng> {
    players: Vec<Player>,
    transports: TransportMap,
    current: usize,
    phase: GamePhase,
    state: TurnState,
    last_roll: Option<u8>,
    rng: R,
}

impl TurnEngine<StdRng> {
    /// Engine whose dice come from OS entropy.
    pub fn new(players: Vec<Player>, transports: TransportMap) -> Self {
        Self::with_rng(players, transports, StdRng::from_os_rng())
    }

    /// Engine whose dice repeat for the same seed.
    pub fn seeded(players: Vec<Player>, transports: TransportMap, seed: u64) -> Self {
        Self::with_rng(players, transports, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TurnEngine<R> {
    /// Starts in the menu.
    ///
    /// # Panics
    ///
    /// Panics if `players` is empty. [`GameConfig::validate`] rejects such a
    /// configuration before an engine is built.
    ///
    /// [`GameConfig::validate`]: crate::config::GameConfig::validate
    pub fn with_rng(players: Vec<Player>, transports: TransportMap, rng: R) -> Self {
        assert!(!players.is_empty(), "a game needs at least one player");
        TurnEngine {
            players,
            transports,
            current: 0,
            phase: GamePhase::Menu,
            state: TurnState::AwaitingRoll,
            last_roll: None,
            rng,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player(&self) -> usize {
        self.current
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn turn_state(&self) -> TurnState {
        self.state
    }

    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    pub fn transports(&self) -> &TransportMap {
        &self.transports
    }

    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.has_won())
    }

    /// True when a roll request would be accepted right now.
    pub fn can_roll(&self) -> bool {
        self.phase == GamePhase::Playing
            && self.state == TurnState::AwaitingRoll
            && !self.active_player().is_animating()
    }

    /// Applies a command. Returns false when it is not valid in the current
    /// state, in which case nothing changed.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::RequestRoll => {
                if !self.can_roll() {
                    return false;
                }
                let die = self.rng.random_range(1..=DIE_FACES);
                self.roll_with(die)
            }
            Command::RequestRestart => {
                if self.phase != GamePhase::GameOver {
                    return false;
                }
                self.restart();
                true
            }
            Command::RequestMenu => {
                if self.phase == GamePhase::Menu {
                    return false;
                }
                info!("back to menu");
                self.phase = GamePhase::Menu;
                true
            }
            Command::RequestPlay => {
                if self.phase != GamePhase::Menu {
                    return false;
                }
                self.phase = if self.state == TurnState::GameWon {
                    GamePhase::GameOver
                } else {
                    GamePhase::Playing
                };
                info!(phase = ?self.phase, "leaving menu");
                true
            }
        }
    }

    /// Commits a die value for the active player. Values outside 1..=6 and
    /// rolls out of turn are refused.
    #[instrument(skip(self), fields(player = %self.players[self.current].name()))]
    pub fn roll_with(&mut self, die: u8) -> bool {
        if !self.can_roll() || !(1..=DIE_FACES).contains(&die) {
            return false;
        }
        self.last_roll = Some(die);
        let player = &mut self.players[self.current];
        player.record_roll(die);
        match player.start_move(die) {
            Ok(()) => {
                info!(from = player.position(), "rolled");
                self.state = TurnState::Moving;
            }
            Err(MoveError::Overshoot { position, steps }) => {
                info!(position, steps, "roll passes the last cell, turn kept");
            }
        }
        true
    }

    /// One step of the fixed-rate loop. Only the active player moves, and
    /// only while playing.
    pub fn tick(&mut self) {
        if self.phase != GamePhase::Playing || self.state != TurnState::Moving {
            return;
        }
        let player = &mut self.players[self.current];
        if !player.update_animation(&self.transports) {
            return;
        }
        if player.has_won() {
            info!(player = %player.name(), "player wins");
            self.state = TurnState::GameWon;
            self.phase = GamePhase::GameOver;
        } else {
            self.state = TurnState::TurnOver;
            self.end_turn();
        }
    }

    fn end_turn(&mut self) {
        if self.state != TurnState::TurnOver {
            return;
        }
        self.current = (self.current + 1) % self.players.len();
        self.state = TurnState::AwaitingRoll;
        debug!(player = %self.active_player().name(), "next turn");
    }

    /// Resets every player and the turn pointer and starts a new round.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.current = 0;
        self.last_roll = None;
        self.state = TurnState::AwaitingRoll;
        self.phase = GamePhase::Playing;
        info!("new round");
    }

    /// Position of every player, in turn order.
    pub fn positions(&self) -> Vec<Cell> {
        self.players.iter().map(|p| p.position()).collect()
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self, index: usize) -> &mut Player {
        &mut self.players[index]
    }
}
