//! Error types for the board layer.

use crate::TokenId;

/// Why a board mutation was rejected.
///
/// Rejections are synchronous and leave the board untouched — a failed
/// `move_token` keeps the token exactly where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The target cell lies outside the grid.
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: u32, y: u32 },

    /// The board already holds the maximum number of tokens.
    #[error("token cap of {0} reached")]
    MaxTokensReached(usize),

    /// Another token already stands on the target cell.
    #[error("cell ({x}, {y}) is occupied")]
    CellOccupied { x: u32, y: u32 },

    /// The target cell's terrain blocks placement and movement.
    #[error("cell ({x}, {y}) is an obstacle")]
    CellIsObstacle { x: u32, y: u32 },

    /// No token with this id exists on the board.
    #[error("no token {0} on the board")]
    UnknownToken(TokenId),
}
