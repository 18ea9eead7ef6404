use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building a [`crate::Map`] from a text layout
#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("map layout has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {col}: '{token}' is not a cell code in 0..=255")]
    InvalidCode {
        row: usize,
        col: usize,
        token: String,
    },
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),
}

/// Errors produced while loading or decoding wall textures
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture: {0}")]
    Decode(String),
    #[error("no texture configured for wall code {0}")]
    Missing(u8),
}

/// Errors produced while writing a frame into the pixel buffer
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("column {column} is outside a {width} pixel wide frame")]
    ColumnOutOfRange { column: usize, width: usize },
    #[error("no texture loaded for wall code {0}")]
    MissingTexture(u8),
}

/// Fatal misconfiguration detected before the frame loop starts
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read map file {path}: {source}")]
    MapFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("player start ({x}, {y}) is inside a wall or outside the map")]
    PlayerInsideWall { x: f32, y: f32 },
    #[error("screen must be between 1x1 and 65535x65535 pixels, got {width}x{height}")]
    InvalidScreen { width: usize, height: usize },
    #[error("field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFov(f32),
}
