//! # Gridlink
//!
//! Real-time game-board synchronization engine for DM-driven grid games.
//!
//! Gridlink owns a grid-based tactical board — terrain, obstacles, movable
//! tokens — and keeps it synchronized with a remote narrative service (the
//! "DM") over one persistent WebSocket per session. Pointer input becomes
//! validated board mutations; DM directives (moves, adds, dice requests,
//! narration) are reconciled back into local state in arrival order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridlink::prelude::*;
//!
//! # async fn run() -> Result<(), GridlinkError> {
//! let session = GameSessionBuilder::new()
//!     .map("default")
//!     .config(SessionConfig::default())
//!     .connect("127.0.0.1:8000")
//!     .await?;
//!
//! session.toggle_placing().await?;
//! session.click_cell(2, 2).await?;   // place a token
//! session.enable_ai_control().await?; // let the DM drive
//! # Ok(())
//! # }
//! ```
//!
//! The layers underneath are separate crates, usable on their own:
//! `gridlink-board` (state store), `gridlink-input` (interaction
//! controller), `gridlink-protocol` (wire types), `gridlink-transport`
//! (session WebSocket), `gridlink-dice` (dice engine).

mod chat;
mod config;
mod error;
mod hooks;
mod push;
mod reconciler;
mod session;

pub use chat::{ChatLog, ChatMessage, Role};
pub use config::SessionConfig;
pub use error::GridlinkError;
pub use hooks::{
    HookError, NoopRewards, RewardIssuer, SilentSounds, SoundTrigger, TransactionHash,
};
pub use push::PushTimer;
pub use reconciler::{LinkState, Reconciler};
pub use session::{GameSessionBuilder, SessionHandle};

/// The commonly-needed surface, re-exported in one place.
pub mod prelude {
    pub use crate::{
        ChatMessage, GameSessionBuilder, GridlinkError, LinkState, RewardIssuer, Role,
        SessionConfig, SessionHandle, SoundTrigger,
    };
    pub use gridlink_board::{
        BoardError, BoardStore, Cell, Grid, MapCatalog, MapDefinition, Terrain, Token, TokenId,
    };
    pub use gridlink_dice::{DiceRollResult, DiceSpec};
    pub use gridlink_input::{GridGeometry, InteractionMode, PointerCapture};
    pub use gridlink_protocol::{ClientMessage, DmMessage, GameStateSnapshot};
    pub use gridlink_transport::{DmLink, SessionId};
}
