//! The full-state snapshot pushed to the DM.
//!
//! `get_state` ships the entire board: the cell matrix, every token
//! annotated with the terrain under it, the obstacle list, a bare terrain
//! map, the selected map and its metadata, and a `game_state` block
//! summarizing the running session for the DM's prompt context.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gridlink_board::{BoardStore, Cell, MapDefinition, Terrain, Token};

use crate::types::PlayerAction;

/// A grid coordinate on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

/// A token as the DM sees it: position plus the terrain it stands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub label: String,
    pub avatar: String,
    pub terrain: Terrain,
}

impl TokenView {
    fn annotate(token: &Token, board: &BoardStore) -> Self {
        Self {
            id: token.id.to_string(),
            x: token.x,
            y: token.y,
            label: token.label.clone(),
            avatar: token.avatar.clone(),
            // Tokens are always in bounds, so the lookup can't miss;
            // grass is the inert fallback if that ever changes.
            terrain: board.terrain_at(token.x, token.y).unwrap_or(Terrain::Grass),
        }
    }
}

/// Compact session summary mirrored into every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateBlock {
    pub current_map: String,
    pub characters: Vec<String>,
    /// Keyed by wire token id (`piece-<n>`); ordered for stable output.
    pub player_positions: BTreeMap<String, GridPos>,
    pub in_combat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<PlayerAction>,
}

/// The unit sent to the server: the whole board, at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    /// Cell matrix, row by row.
    pub grid: Vec<Vec<Cell>>,
    pub tokens: Vec<TokenView>,
    pub obstacles: Vec<GridPos>,
    /// Bare terrain matrix, row by row.
    pub terrain: Vec<Vec<Terrain>>,
    pub map_id: String,
    pub map: MapDefinition,
    pub game_state: GameStateBlock,
}

impl GameStateSnapshot {
    /// Captures the current board. `last_action` and `in_combat` come from
    /// the session layer, which tracks them across snapshots.
    pub fn capture(
        board: &BoardStore,
        last_action: Option<PlayerAction>,
        in_combat: bool,
    ) -> Self {
        let grid = board.grid();
        let rows: Vec<Vec<Cell>> = (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .map(|x| *grid.cell(x, y).expect("iterating in bounds"))
                    .collect()
            })
            .collect();
        let terrain = rows
            .iter()
            .map(|row| row.iter().map(|c| c.terrain).collect())
            .collect();
        let tokens: Vec<TokenView> = board
            .tokens()
            .iter()
            .map(|t| TokenView::annotate(t, board))
            .collect();
        let obstacles = grid
            .obstacles()
            .into_iter()
            .map(|(x, y)| GridPos { x, y })
            .collect();

        let game_state = GameStateBlock {
            current_map: board.map().id.clone(),
            characters: tokens.iter().map(|t| t.label.clone()).collect(),
            player_positions: tokens
                .iter()
                .map(|t| (t.id.clone(), GridPos { x: t.x, y: t.y }))
                .collect(),
            in_combat,
            last_action,
        };

        Self {
            grid: rows,
            tokens,
            obstacles,
            terrain,
            map_id: board.map().id.clone(),
            map: board.map().clone(),
            game_state,
        }
    }
}
