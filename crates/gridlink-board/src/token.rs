//! Token types: the movable pieces standing on the board.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a token on the board.
///
/// Newtype over `u32`; renders as `piece-<n>`, which is also the id the DM
/// service addresses in `move_character` directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece-{}", self.0)
    }
}

impl TokenId {
    /// Parses the wire form `piece-<n>`. Bare numbers are accepted too,
    /// since the DM occasionally addresses tokens by index alone.
    pub fn parse_wire(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("piece-").unwrap_or(s);
        digits.parse().ok().map(TokenId)
    }
}

/// The avatar color palette, assigned round-robin as tokens are placed.
pub const AVATAR_COLORS: [&str; 6] = [
    "#FF5252", // red
    "#4CAF50", // green
    "#2196F3", // blue
    "#FFC107", // yellow
    "#9C27B0", // purple
    "#FF9800", // orange
];

/// A movable piece occupying exactly one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub x: u32,
    pub y: u32,
    /// Avatar reference — a palette color the renderer draws the piece in.
    pub avatar: String,
    pub label: String,
    /// True only while a drag gesture is holding this token.
    pub dragging: bool,
}

impl Token {
    pub fn pos(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}
