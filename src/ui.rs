// the terminal front end: draws whatever the engine exposes and turns key
// presses into commands, one frame per tick
use std::fmt::Write as _;
use std::thread;
use std::time::{Duration, Instant};

use colored::{ColoredString, Colorize};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::board::{
    cell_to_coordinates, coordinates_to_cell, Cell, Coordinates, TransportKind, TransportMap,
    BOARD_GRID,
};
use crate::config::{GameConfig, TokenColor, TokenShape};
use crate::engine::{Command, GamePhase, TurnEngine, DIE_FACES};
use crate::input::{Action, Input};
use crate::player::Player;
use crate::terminal::{self, RawMode};

const CELL_WIDTH: usize = 6;
const HISTORY_SHOWN: usize = 8;

fn paint(text: &str, color: TokenColor) -> ColoredString {
    let (r, g, b) = color.rgb();
    text.truecolor(r, g, b).bold()
}

/// Pips of a die face on a 3x3 grid, row by row.
fn pips(value: u8) -> [[bool; 3]; 3] {
    const O: bool = false;
    const X: bool = true;
    match value {
        1 => [[O, O, O], [O, X, O], [O, O, O]],
        2 => [[X, O, O], [O, O, O], [O, O, X]],
        3 => [[X, O, O], [O, X, O], [O, O, X]],
        4 => [[X, O, X], [O, O, O], [X, O, X]],
        5 => [[X, O, X], [O, X, O], [X, O, X]],
        _ => [[X, O, X], [X, O, X], [X, O, X]],
    }
}

pub fn dice_face(value: u8) -> Vec<String> {
    let mut lines = vec!["╭───────╮".to_string()];
    for row in pips(value) {
        let mut line = String::from("│ ");
        for pip in row {
            line.push_str(if pip { "● " } else { "  " });
        }
        line.push('│');
        lines.push(line);
    }
    lines.push("╰───────╯".to_string());
    lines
}

/// Draws frames as strings; owns only the cosmetic token choices.
#[derive(Debug, Clone)]
pub struct Renderer {
    tokens: Vec<TokenShape>,
}

impl Renderer {
    pub fn new(tokens: Vec<TokenShape>) -> Self {
        Renderer { tokens }
    }

    fn token(&self, index: usize, player: &Player) -> ColoredString {
        let shape = self.tokens.get(index).copied().unwrap_or_default();
        paint(shape.glyph(), player.color())
    }

    pub fn menu(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "   {}", "Snake and Ladder".purple().bold());
        let _ = writeln!(out, "   {}", "Terminal Edition".truecolor(255, 165, 0));
        let _ = writeln!(out);
        // a little snake and a little ladder
        let _ = writeln!(out, "   {}", "~~~~~~~~~~<:".green());
        let _ = writeln!(out, "   {}", "|-|-|-|-|-|".truecolor(255, 165, 0));
        let _ = writeln!(out);
        let _ = writeln!(out, "   [p] Play    [q] Quit");
        out
    }

    fn cell_label(cell: Cell, transports: &TransportMap) -> String {
        let dest = transports.resolve(cell);
        let label = match transports.kind_at(cell) {
            Some(TransportKind::Snake) => format!("{cell}↓{dest}"),
            Some(TransportKind::Ladder) => format!("{cell}↑{dest}"),
            None => format!("{cell}"),
        };
        let padded = format!("{label:<width$}", width = CELL_WIDTH);
        match transports.kind_at(cell) {
            Some(TransportKind::Snake) => padded.red().to_string(),
            Some(TransportKind::Ladder) => padded.green().to_string(),
            None => padded,
        }
    }

    /// Tokens of every player on the board, indexed by row then column.
    /// Players still at the start have no square and are left out.
    fn token_grid<R: Rng>(&self, engine: &TurnEngine<R>) -> Vec<Vec<String>> {
        let size = BOARD_GRID as usize;
        let mut grid = vec![vec![String::new(); size]; size];
        let mut shown = vec![vec![0usize; size]; size];
        for (index, player) in engine.players().iter().enumerate() {
            let Some(coords) = cell_to_coordinates(player.position()) else {
                continue;
            };
            let (x, y) = (coords.x as usize, coords.y as usize);
            grid[y][x].push_str(&self.token(index, player).to_string());
            shown[y][x] += 1;
        }
        for (row, counts) in grid.iter_mut().zip(shown) {
            for (square, count) in row.iter_mut().zip(counts) {
                square.push_str(&" ".repeat(CELL_WIDTH.saturating_sub(count)));
            }
        }
        grid
    }

    pub fn board<R: Rng>(&self, engine: &TurnEngine<R>) -> String {
        let transports = engine.transports();
        let token_grid = self.token_grid(engine);
        let width = BOARD_GRID as usize * (CELL_WIDTH + 1);
        let mut out = String::new();
        //border up
        let _ = writeln!(out, "▗{}▖", "▄".repeat(width - 1));
        for y in 0..BOARD_GRID {
            let mut labels = String::from("▐");
            let mut tokens = String::from("▐");
            for x in 0..BOARD_GRID {
                let Some(cell) = coordinates_to_cell(Coordinates::new(x, y)) else {
                    continue;
                };
                if x > 0 {
                    labels.push('│');
                    tokens.push('│');
                }
                labels.push_str(&Self::cell_label(cell, transports));
                tokens.push_str(&token_grid[y as usize][x as usize]);
            }
            labels.push('▌');
            tokens.push('▌');
            let _ = writeln!(out, "{labels}");
            let _ = writeln!(out, "{tokens}");
        }
        //border down
        let _ = writeln!(out, "▝{}▘", "▀".repeat(width - 1));
        out
    }

    fn panel<R: Rng>(&self, engine: &TurnEngine<R>, shown_die: Option<u8>) -> Vec<String> {
        let mut lines = Vec::new();
        for (index, player) in engine.players().iter().enumerate() {
            let marker = if engine.phase() == GamePhase::Playing
                && index == engine.current_player()
                && !player.is_animating()
            {
                "▶"
            } else {
                " "
            };
            let position = if player.position() == 0 {
                "start".to_string()
            } else {
                player.position().to_string()
            };
            let history = player.dice_history();
            let recent = &history[history.len().saturating_sub(HISTORY_SHOWN)..];
            lines.push(format!(
                "{marker} {} {:<12} {:>5}  rolls {:?}",
                self.token(index, player),
                paint(player.name(), player.color()),
                position,
                recent
            ));
        }
        lines.push(String::new());
        if let Some(die) = shown_die.filter(|d| (1..=DIE_FACES).contains(d)) {
            lines.extend(dice_face(die));
        }
        lines
    }

    /// A full playing or game-over frame.
    pub fn game<R: Rng>(&self, engine: &TurnEngine<R>, shown_die: Option<u8>) -> String {
        let mut out = self.board(engine);
        for line in self.panel(engine, shown_die) {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out);
        match engine.phase() {
            GamePhase::Playing if engine.can_roll() => {
                let _ = writeln!(
                    out,
                    "{} to roll    [space] roll   [m] menu   [q] quit",
                    paint(engine.active_player().name(), engine.active_player().color())
                );
            }
            GamePhase::Playing => {
                let _ = writeln!(out, "moving...");
            }
            GamePhase::GameOver => {
                if let Some(winner) = engine.winner() {
                    let banner = format!("{} Wins!", winner.name());
                    let _ = writeln!(out, "{}", paint(&banner, winner.color()));
                }
                let _ = writeln!(out, "Press r to play again   [m] menu   [q] quit");
            }
            GamePhase::Menu => {}
        }
        out
    }

    pub fn frame<R: Rng>(&self, engine: &TurnEngine<R>) -> String {
        match engine.phase() {
            GamePhase::Menu => self.menu(),
            _ => self.game(engine, engine.last_roll()),
        }
    }
}

/// Runs the engine at a fixed tick rate against the terminal.
pub struct Game<R: Rng = StdRng> {
    engine: TurnEngine<R>,
    renderer: Renderer,
    input: Input,
    tick: Duration,
    dice_frames: u32,
    dice_frame: Duration,
    last_frame: String,
}

impl<R: Rng> Game<R> {
    pub fn new(engine: TurnEngine<R>, config: &GameConfig, input: Input) -> Self {
        Game {
            engine,
            renderer: Renderer::new(config.tokens()),
            input,
            tick: Duration::from_micros(1_000_000 / config.tick_rate.max(1) as u64),
            dice_frames: config.dice_frames,
            dice_frame: Duration::from_millis(config.dice_frame_ms),
            last_frame: String::new(),
        }
    }

    pub fn engine(&self) -> &TurnEngine<R> {
        &self.engine
    }

    pub fn play(&mut self) -> std::io::Result<()> {
        let _raw = RawMode::enable()?;
        info!("game started");
        self.draw();
        // main Game Loop happens here
        let mut frame_start_time = Instant::now();
        loop {
            if !self.input.poll() {
                break;
            }
            if frame_start_time.elapsed() < self.tick {
                // wait for next frame
                thread::sleep(Duration::from_millis(3));
                continue;
            }
            frame_start_time = Instant::now();
            if !self.step() {
                break;
            }
            self.draw();
        }
        info!("game closed");
        Ok(())
    }

    /// One tick: drain input, advance the engine. Returns false on quit.
    pub fn step(&mut self) -> bool {
        while let Some(action) = self.input.next_action() {
            match action {
                Action::Quit => return false,
                Action::Game(Command::RequestRoll) => {
                    if self.engine.can_roll() {
                        self.roll_dice_animation();
                        self.engine.handle(Command::RequestRoll);
                    }
                }
                Action::Game(command) => {
                    if !self.engine.handle(command) {
                        debug!(?command, "ignored");
                    }
                }
            }
        }
        self.engine.tick();
        true
    }

    fn draw(&mut self) {
        let frame = self.renderer.frame(&self.engine);
        if frame == self.last_frame {
            return;
        }
        terminal::clear_screen();
        print!("{frame}");
        terminal::flush();
        self.last_frame = frame;
    }

    // blocks the loop while random faces flash by
    fn roll_dice_animation(&mut self) {
        for _ in 0..self.dice_frames {
            let value = rand::random_range(1..=DIE_FACES);
            terminal::clear_screen();
            print!("{}", self.renderer.game(&self.engine, Some(value)));
            terminal::flush();
            thread::sleep(self.dice_frame);
        }
        self.last_frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TurnState;

    fn game(dice_frames: u32) -> Game {
        let config = GameConfig {
            dice_frames,
            dice_frame_ms: 0,
            ticks_per_step: 1,
            ..GameConfig::default()
        };
        let engine = TurnEngine::seeded(
            config.build_players(),
            config.transport_map().unwrap(),
            11,
        );
        Game::new(engine, &config, Input::detached())
    }

    #[test]
    fn test_dice_faces_have_right_pips() {
        for value in 1..=DIE_FACES {
            let pips = dice_face(value).concat().matches('●').count();
            assert_eq!(pips, value as usize);
        }
    }

    #[test]
    fn test_menu_frame() {
        let game = game(0);
        let frame = game.renderer.frame(game.engine());
        assert!(frame.contains("[p] Play"));
    }

    #[test]
    fn test_board_lists_every_cell() {
        let game = game(0);
        let board = game.renderer.board(game.engine());
        for cell in ["100", "91", "55", "16↓6", "80↑100"] {
            assert!(board.contains(cell), "missing {cell}");
        }
        // one label row and one token row per board row, plus borders
        assert_eq!(board.lines().count(), 2 * BOARD_GRID as usize + 2);
    }

    #[test]
    fn test_tokens_sit_on_their_square() {
        let mut game = game(0);
        // cell 1 is the bottom-right square, cell 100 the top-right one
        game.engine.player_mut(0).place(1);
        game.engine.player_mut(1).place(100);
        let board = game.renderer.board(game.engine());
        let lines: Vec<&str> = board.lines().collect();
        let top_tokens = lines[2];
        let bottom_tokens = lines[2 * BOARD_GRID as usize];
        assert!(bottom_tokens.contains('●'));
        assert!(!bottom_tokens.contains('★'));
        assert!(top_tokens.contains('★'));
        assert!(!top_tokens.contains('●'));
        let before_last_square = bottom_tokens.rsplit('│').nth(1).unwrap();
        assert!(!before_last_square.contains('●'));
        assert!(bottom_tokens.rsplit('│').next().unwrap().contains('●'));
        // nobody is drawn while still at the start
        game.engine.player_mut(0).place(0);
        let board = game.renderer.board(game.engine());
        assert!(!board.contains('●'));
    }

    #[test]
    fn test_keys_drive_engine() {
        let mut game = game(0);
        game.input.push(b'p');
        assert!(game.step());
        assert_eq!(game.engine().phase(), GamePhase::Playing);
        game.input.push(b' ');
        assert!(game.step());
        assert!(game.engine().last_roll().is_some());
        assert_eq!(game.engine().players()[0].dice_history().len(), 1);
        game.input.push(b'q');
        assert!(!game.step());
    }

    #[test]
    fn test_play_until_someone_wins() {
        let mut game = game(0);
        game.input.push(b'p');
        for _ in 0..100_000 {
            if game.engine().phase() == GamePhase::GameOver {
                break;
            }
            if game.engine().can_roll() {
                game.input.push(b' ');
            }
            game.step();
        }
        assert_eq!(game.engine().turn_state(), TurnState::GameWon);
        let winner = game.engine().winner().unwrap().name().to_string();
        let frame = game.renderer.frame(game.engine());
        assert!(frame.contains(&format!("{winner} Wins!")));

        game.input.push(b'r');
        game.step();
        assert_eq!(game.engine().phase(), GamePhase::Playing);
        assert_eq!(game.engine().positions(), vec![0, 0]);
    }
}
