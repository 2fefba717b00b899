// cells are numbered 1 to 100 in a serpentine layout, 0 means the token
// has not entered the board yet
// snakes and ladders are single-hop: a destination is never another source
use std::collections::BTreeMap;

use num::integer::div_rem;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub type Cell = u8;

pub const OFF_BOARD: Cell = 0;
pub const FIRST_CELL: Cell = 1;
pub const LAST_CELL: Cell = 100;
pub const BOARD_GRID: u8 = 10;

/// Grid position of a cell: `x` is the column, `y` the row, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x: u8,
    pub y: u8,
}

impl Coordinates {
    pub fn new(x: u8, y: u8) -> Coordinates {
        Coordinates { x, y }
    }
}

/// Maps a cell to its place on the 10x10 grid. Odd rows (counted from the
/// top) run right to left.
pub fn cell_to_coordinates(cell: Cell) -> Option<Coordinates> {
    if !(FIRST_CELL..=LAST_CELL).contains(&cell) {
        return None;
    }
    let (rows_from_bottom, offset) = div_rem(cell - 1, BOARD_GRID);
    let row = BOARD_GRID - 1 - rows_from_bottom;
    let column = if row % 2 == 0 {
        offset
    } else {
        BOARD_GRID - 1 - offset
    };
    Some(Coordinates::new(column, row))
}

/// Inverse of [`cell_to_coordinates`].
pub fn coordinates_to_cell(coords: Coordinates) -> Option<Cell> {
    if coords.x >= BOARD_GRID || coords.y >= BOARD_GRID {
        return None;
    }
    let rows_from_bottom = BOARD_GRID - 1 - coords.y;
    let offset = if coords.y % 2 == 0 {
        coords.x
    } else {
        BOARD_GRID - 1 - coords.x
    };
    Some(rows_from_bottom * BOARD_GRID + offset + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Snake,
    Ladder,
}

impl TransportKind {
    fn name(self) -> &'static str {
        match self {
            TransportKind::Snake => "snake",
            TransportKind::Ladder => "ladder",
        }
    }
}

/// One edge of the transport tables, as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transport {
    pub from: Cell,
    pub to: Cell,
}

impl Transport {
    pub const fn new(from: Cell, to: Cell) -> Transport {
        Transport { from, to }
    }
}

pub const CLASSIC_SNAKES: [Transport; 10] = [
    Transport::new(16, 6),
    Transport::new(47, 26),
    Transport::new(49, 11),
    Transport::new(56, 53),
    Transport::new(62, 19),
    Transport::new(64, 60),
    Transport::new(87, 24),
    Transport::new(93, 73),
    Transport::new(95, 75),
    Transport::new(98, 78),
];

pub const CLASSIC_LADDERS: [Transport; 9] = [
    Transport::new(1, 38),
    Transport::new(4, 14),
    Transport::new(9, 31),
    Transport::new(21, 42),
    Transport::new(28, 84),
    Transport::new(36, 44),
    Transport::new(51, 67),
    Transport::new(71, 91),
    Transport::new(80, 100),
];

/// Validated snake and ladder tables. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportMap {
    snakes: BTreeMap<Cell, Cell>,
    ladders: BTreeMap<Cell, Cell>,
}

impl TransportMap {
    /// Builds the tables, failing on anything that could corrupt a game:
    /// off-board cells, snakes going up, ladders going down, a cell used
    /// twice as a source, or a destination that would trigger another hop.
    pub fn new(snakes: &[Transport], ladders: &[Transport]) -> Result<Self, ConfigError> {
        let mut map = TransportMap {
            snakes: BTreeMap::new(),
            ladders: BTreeMap::new(),
        };
        for snake in snakes {
            map.insert(TransportKind::Snake, *snake)?;
        }
        for ladder in ladders {
            map.insert(TransportKind::Ladder, *ladder)?;
        }
        for (from, to) in map.snakes.iter().chain(map.ladders.iter()) {
            if map.kind_at(*to).is_some() {
                return Err(ConfigError::ChainedTransport {
                    from: *from,
                    to: *to,
                });
            }
        }
        Ok(map)
    }

    /// The reference board: ten snakes, nine ladders, the last one
    /// finishing on 100.
    pub fn classic() -> Self {
        TransportMap {
            snakes: CLASSIC_SNAKES.iter().map(|t| (t.from, t.to)).collect(),
            ladders: CLASSIC_LADDERS.iter().map(|t| (t.from, t.to)).collect(),
        }
    }

    fn insert(&mut self, kind: TransportKind, transport: Transport) -> Result<(), ConfigError> {
        let Transport { from, to } = transport;
        let on_board = |cell: Cell| (FIRST_CELL..=LAST_CELL).contains(&cell);
        if !on_board(from) || !on_board(to) {
            return Err(ConfigError::CellOutOfRange {
                kind: kind.name(),
                from,
                to,
            });
        }
        match kind {
            TransportKind::Snake if to >= from => {
                return Err(ConfigError::SnakeGoesUp { from, to });
            }
            TransportKind::Ladder if to <= from => {
                return Err(ConfigError::LadderGoesDown { from, to });
            }
            _ => {}
        }
        if self.kind_at(from).is_some() {
            return Err(ConfigError::DuplicateSource(from));
        }
        let table = match kind {
            TransportKind::Snake => &mut self.snakes,
            TransportKind::Ladder => &mut self.ladders,
        };
        table.insert(from, to);
        Ok(())
    }

    /// Where a token landing on `cell` ends up. Never chained.
    pub fn resolve(&self, cell: Cell) -> Cell {
        if let Some(to) = self.snakes.get(&cell) {
            *to
        } else if let Some(to) = self.ladders.get(&cell) {
            *to
        } else {
            cell
        }
    }

    pub fn kind_at(&self, cell: Cell) -> Option<TransportKind> {
        if self.snakes.contains_key(&cell) {
            Some(TransportKind::Snake)
        } else if self.ladders.contains_key(&cell) {
            Some(TransportKind::Ladder)
        } else {
            None
        }
    }

    pub fn snakes(&self) -> impl Iterator<Item = Transport> + '_ {
        self.snakes.iter().map(|(from, to)| Transport::new(*from, *to))
    }

    pub fn ladders(&self) -> impl Iterator<Item = Transport> + '_ {
        self.ladders.iter().map(|(from, to)| Transport::new(*from, *to))
    }
}

impl Default for TransportMap {
    fn default() -> Self {
        TransportMap::classic()
    }
}
