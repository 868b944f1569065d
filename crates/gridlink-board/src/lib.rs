//! Board state store for Gridlink.
//!
//! Owns everything on the tabletop: the map being played, the terrain grid
//! generated from it, and the tokens standing on it. Every mutation
//! re-validates bounds, obstacles, and occupancy against *current* state
//! immediately before applying, so there is no pre-checked staleness window.
//!
//! # Key types
//!
//! - [`MapDefinition`] / [`MapCatalog`] — the playable maps
//! - [`Grid`] / [`Cell`] / [`Terrain`] — generated terrain with derived obstacles
//! - [`Token`] / [`TokenId`] — movable pieces, one per cell
//! - [`BoardStore`] — the single shared mutable board, with validated mutations
//! - [`BoardError`] — why a mutation was rejected

mod error;
mod grid;
mod map;
mod store;
mod token;

pub use error::BoardError;
pub use grid::{Cell, Grid, Terrain, Visibility};
pub use map::{MapCatalog, MapDefinition};
pub use store::BoardStore;
pub use token::{AVATAR_COLORS, Token, TokenId};
