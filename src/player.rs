// a player walks its path one cell at a time, `ticks_per_step` ticks per cell
// when the path runs out the landing cell is checked for a snake or ladder,
// which is taken as one extra hop straight to its destination
use std::collections::VecDeque;

use tracing::debug;

use crate::board::{Cell, TransportMap, LAST_CELL, OFF_BOARD};
use crate::config::TokenColor;
use crate::error::MoveError;

pub const DEFAULT_TICKS_PER_STEP: u32 = 20;

#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    color: TokenColor,
    position: Cell,
    won: bool,
    dice_history: Vec<u8>,
    path: VecDeque<Cell>,
    // ticks spent on the current hop
    hop_ticks: u32,
    ticks_per_step: u32,
    // the landing cell has already been checked for a snake or ladder
    transported: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, color: TokenColor) -> Self {
        Self::with_speed(name, color, DEFAULT_TICKS_PER_STEP)
    }

    pub fn with_speed(name: impl Into<String>, color: TokenColor, ticks_per_step: u32) -> Self {
        Player {
            name: name.into(),
            color,
            position: OFF_BOARD,
            won: false,
            dice_history: Vec::new(),
            path: VecDeque::new(),
            hop_ticks: 0,
            ticks_per_step: ticks_per_step.max(1),
            transported: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> TokenColor {
        self.color
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn dice_history(&self) -> &[u8] {
        &self.dice_history
    }

    pub fn is_animating(&self) -> bool {
        !self.path.is_empty()
    }

    /// Cells still to be visited, nearest first.
    pub fn pending_path(&self) -> impl Iterator<Item = Cell> + '_ {
        self.path.iter().copied()
    }

    /// How far the token is through its current hop, in [0, 1).
    pub fn progress(&self) -> f32 {
        self.hop_ticks as f32 / self.ticks_per_step as f32
    }

    pub fn ticks_per_step(&self) -> u32 {
        self.ticks_per_step
    }

    pub fn record_roll(&mut self, die: u8) {
        self.dice_history.push(die);
    }

    /// Queues one cell per step. A move that would pass the last cell is
    /// refused and nothing changes.
    pub fn start_move(&mut self, steps: u8) -> Result<(), MoveError> {
        let target = self.position as u16 + steps as u16;
        if target > LAST_CELL as u16 {
            return Err(MoveError::Overshoot {
                position: self.position,
                steps,
            });
        }
        self.path = (self.position + 1..=target as Cell).collect();
        self.hop_ticks = 0;
        self.transported = false;
        debug!(player = %self.name, from = self.position, to = target, "starting move");
        Ok(())
    }

    /// Advances the animation by one tick. Returns true on the tick the whole
    /// move, including any snake or ladder, is finished. Does nothing when the
    /// player is not moving.
    pub fn update_animation(&mut self, transports: &TransportMap) -> bool {
        if self.path.is_empty() {
            return false;
        }
        self.hop_ticks += 1;
        if self.hop_ticks < self.ticks_per_step {
            return false;
        }
        self.hop_ticks = 0;
        if let Some(next) = self.path.pop_front() {
            self.position = next;
        }
        if !self.path.is_empty() {
            return false;
        }
        if !self.transported {
            self.transported = true;
            let destination = transports.resolve(self.position);
            if destination != self.position {
                debug!(player = %self.name, from = self.position, to = destination, "taking transport");
                self.path.push_back(destination);
                return false;
            }
        }
        if self.position == LAST_CELL {
            self.won = true;
        }
        true
    }

    /// Back to the start of a round, keeping name and color.
    pub fn reset(&mut self) {
        self.position = OFF_BOARD;
        self.won = false;
        self.dice_history.clear();
        self.path.clear();
        self.hop_ticks = 0;
        self.transported = false;
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, cell: Cell) {
        self.position = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Transport;

    fn run_until_done(player: &mut Player, transports: &TransportMap) -> u32 {
        let mut ticks = 0;
        while player.is_animating() {
            ticks += 1;
            if player.update_animation(transports) {
                break;
            }
        }
        ticks
    }

    #[test]
    fn test_overshoot_is_rejected() {
        let mut player = Player::new("A", TokenColor::Red);
        player.place(97);
        assert_eq!(
            player.start_move(4),
            Err(MoveError::Overshoot {
                position: 97,
                steps: 4
            })
        );
        assert_eq!(player.position(), 97);
        assert!(!player.is_animating());
    }

    #[test]
    fn test_exact_finish_is_allowed() {
        let mut player = Player::new("A", TokenColor::Red);
        player.place(97);
        assert!(player.start_move(3).is_ok());
        assert_eq!(player.pending_path().collect::<Vec<_>>(), vec![98, 99, 100]);
    }

    #[test]
    fn test_path_takes_steps_times_ticks() {
        let empty = TransportMap::new(&[], &[]).unwrap();
        let mut player = Player::new("A", TokenColor::Red);
        player.place(10);
        player.start_move(5).unwrap();
        let ticks = run_until_done(&mut player, &empty);
        assert_eq!(ticks, 5 * DEFAULT_TICKS_PER_STEP);
        assert_eq!(player.position(), 15);
        assert!(!player.is_animating());
    }

    #[test]
    fn test_steps_one_cell_at_a_time() {
        let empty = TransportMap::new(&[], &[]).unwrap();
        let mut player = Player::with_speed("A", TokenColor::Blue, 2);
        player.start_move(2).unwrap();
        assert!(!player.update_animation(&empty));
        assert_eq!(player.position(), 0);
        assert_eq!(player.progress(), 0.5);
        assert!(!player.update_animation(&empty));
        assert_eq!(player.position(), 1);
        assert!(!player.update_animation(&empty));
        assert!(player.update_animation(&empty));
        assert_eq!(player.position(), 2);
    }

    #[test]
    fn test_ladder_is_one_extra_hop() {
        let map = TransportMap::classic();
        let mut player = Player::new("A", TokenColor::Red);
        player.place(1);
        player.start_move(3).unwrap();
        let ticks = run_until_done(&mut player, &map);
        assert_eq!(ticks, 4 * DEFAULT_TICKS_PER_STEP);
        assert_eq!(player.position(), 14);
    }

    #[test]
    fn test_snake_takes_player_down() {
        let map = TransportMap::classic();
        let mut player = Player::new("A", TokenColor::Red);
        player.place(12);
        player.start_move(4).unwrap();
        run_until_done(&mut player, &map);
        assert_eq!(player.position(), 6);
        assert!(!player.has_won());
    }

    #[test]
    fn test_ladder_to_last_cell_wins() {
        let map = TransportMap::classic();
        let mut player = Player::new("A", TokenColor::Red);
        player.place(77);
        player.start_move(3).unwrap();
        run_until_done(&mut player, &map);
        assert_eq!(player.position(), 100);
        assert!(player.has_won());
    }

    #[test]
    fn test_destination_is_not_resolved_again() {
        let map = TransportMap::new(&[Transport::new(30, 5)], &[]).unwrap();
        let mut player = Player::with_speed("A", TokenColor::Red, 1);
        player.place(28);
        player.start_move(2).unwrap();
        run_until_done(&mut player, &map);
        assert_eq!(player.position(), 5);
    }

    #[test]
    fn test_update_when_idle_is_noop() {
        let map = TransportMap::classic();
        let mut player = Player::new("A", TokenColor::Red);
        player.place(3);
        for _ in 0..50 {
            assert!(!player.update_animation(&map));
        }
        assert_eq!(player.position(), 3);
    }

    #[test]
    fn test_reset_keeps_identity() {
        let mut player = Player::new("Player 1", TokenColor::Red);
        player.place(42);
        player.record_roll(3);
        player.start_move(2).unwrap();
        player.reset();
        assert_eq!(player.position(), OFF_BOARD);
        assert!(player.dice_history().is_empty());
        assert!(!player.is_animating());
        assert_eq!(player.name(), "Player 1");
        assert_eq!(player.color(), TokenColor::Red);
    }
}
