use crate::error::MapError;
use serde::{Deserialize, Serialize};

/// Rows of the built-in level
pub const DEFAULT_ROWS: usize = 13;
/// Columns of the built-in level
pub const DEFAULT_COLS: usize = 20;

/// Built-in level. Outer ring is code 6, interior walls use codes 1, 6 and 7.
const DEFAULT_LEVEL: [[u8; DEFAULT_COLS]; DEFAULT_ROWS] = [
    [6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6],
    [6, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 6],
    [6, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 6, 0, 0, 0, 6, 0, 0, 0, 6],
    [6, 0, 1, 0, 1, 0, 1, 0, 0, 1, 0, 6, 0, 7, 7, 0, 0, 0, 0, 6],
    [6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 0, 0, 0, 0, 0, 7, 0, 6],
    [6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7, 0, 6],
    [6, 0, 0, 0, 0, 0, 7, 7, 7, 0, 0, 1, 0, 0, 0, 0, 7, 7, 0, 6],
    [6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6],
    [6, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 0, 1, 0, 6],
    [6, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 7, 0, 0, 0, 0, 1, 0, 6],
    [6, 0, 0, 6, 6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6],
    [6, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6],
    [6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6],
];

/// Content of one grid cell.
/// The raw code is kept so a level round-trips bit for bit: 0 is walkable,
/// anything else is a wall whose code selects its texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Cell {
    Empty,
    Wall(u8),
}

impl Cell {
    pub fn from_code(code: u8) -> Self {
        if code == 0 {
            Cell::Empty
        } else {
            Cell::Wall(code)
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Wall(code) => code,
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Cell::Wall(_))
    }
}

impl From<u8> for Cell {
    fn from(code: u8) -> Self {
        Cell::from_code(code)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

/// Immutable level grid.
/// Cells are stored row-major; world coordinates are continuous and one tile
/// spans `tile_size` world units.
#[derive(Clone, Debug)]
pub struct Map {
    rows: usize,
    cols: usize,
    tile_size: f32,
    cells: Vec<Cell>,
}

impl Map {
    /// Build a map from rows of raw cell codes
    pub fn from_codes(rows: &[Vec<u8>], tile_size: f32) -> Result<Self, MapError> {
        if !(tile_size > 0.0) {
            return Err(MapError::InvalidTileSize(tile_size));
        }
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (row, codes) in rows.iter().enumerate() {
            if codes.len() != cols {
                return Err(MapError::RaggedRow {
                    row,
                    expected: cols,
                    found: codes.len(),
                });
            }
            cells.extend(codes.iter().copied().map(Cell::from_code));
        }

        Ok(Map {
            rows: rows.len(),
            cols,
            tile_size,
            cells,
        })
    }

    /// The built-in 13x20 level
    pub fn default_level(tile_size: f32) -> Result<Self, MapError> {
        let rows: Vec<Vec<u8>> = DEFAULT_LEVEL.iter().map(|row| row.to_vec()).collect();
        Self::from_codes(&rows, tile_size)
    }

    /// Parse a text layout: one row per line, codes separated by whitespace or
    /// commas. Blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str, tile_size: f32) -> Result<Self, MapError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row = rows.len();
            let codes = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .enumerate()
                .map(|(col, token)| {
                    token.parse::<u8>().map_err(|_| MapError::InvalidCode {
                        row,
                        col,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<u8>, MapError>>()?;
            rows.push(codes);
        }

        Self::from_codes(&rows, tile_size)
    }

    /// Render the layout in the format accepted by [`Map::parse`]
    pub fn to_layout_string(&self) -> String {
        let mut out = String::new();
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.cols)
                .map(|col| self.cell_at(row, col).code().to_string())
                .collect();
            out.push_str(&line.join(", "));
            out.push('\n');
        }
        out
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width in world units
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    /// Height in world units
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width() / 2.0, self.height() / 2.0)
    }

    /// Cell at (row, col). The caller must keep both indices inside the grid.
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        debug_assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) outside {}x{} map",
            row,
            col,
            self.rows,
            self.cols
        );
        self.cells[row * self.cols + col]
    }

    /// Bounds-checked lookup; `None` outside the grid
    pub fn cell_checked(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(self.cell_at(row as usize, col as usize))
    }

    /// Whether a world point lies on the map, upper edges included
    pub fn is_inside_bounds(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x <= self.width() && y >= 0.0 && y <= self.height()
    }

    /// Point collision used by player motion: outside the map or on a wall cell
    pub fn collides_at(&self, x: f32, y: f32) -> bool {
        if !self.is_inside_bounds(x, y) {
            return true;
        }
        let row = (y / self.tile_size).floor() as i32;
        let col = (x / self.tile_size).floor() as i32;
        match self.cell_checked(row, col) {
            Some(cell) => cell.is_wall(),
            // the inclusive upper edge belongs to no cell
            None => true,
        }
    }

    /// Whether every cell of the outer ring is a wall.
    /// Rays only terminate on a wall face when this holds.
    pub fn has_solid_border(&self) -> bool {
        let top_bottom = (0..self.cols)
            .all(|col| self.cell_at(0, col).is_wall() && self.cell_at(self.rows - 1, col).is_wall());
        let left_right = (0..self.rows)
            .all(|row| self.cell_at(row, 0).is_wall() && self.cell_at(row, self.cols - 1).is_wall());
        top_bottom && left_right
    }

    /// Sorted distinct wall codes used by this level
    pub fn wall_codes(&self) -> Vec<u8> {
        let mut codes: Vec<u8> = self
            .cells
            .iter()
            .filter(|cell| cell.is_wall())
            .map(|cell| cell.code())
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}
