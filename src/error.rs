use thiserror::Error;

/// Recoverable failures in classification and tilemap configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    #[error("tile shape id {id} is outside every known shape range")]
    UnclassifiedTile { id: u32 },

    #[error("tile index {index} is out of range for a tileset of {len} tiles")]
    TileIndexOutOfRange { index: usize, len: usize },

    #[error("invalid tile index range {start}..{end}")]
    InvalidTileRange { start: usize, end: usize },

    #[error("tile size must be positive and finite, got {width} x {height}")]
    InvalidTileSize { width: f32, height: f32 },

    #[error("cell ({x}, {y}) lies outside the tile map")]
    CellOutOfRange { x: usize, y: usize },
}

/// Errors raised while loading a [`crate::config::WorldConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse world config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid world config: {0}")]
    Invalid(String),
}
