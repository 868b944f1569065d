//! Unified error type for the Gridlink engine.

use gridlink_board::BoardError;
use gridlink_dice::DiceFormatError;
use gridlink_protocol::ProtocolError;
use gridlink_transport::TransportError;

/// Top-level error surfaced by [`SessionHandle`](crate::SessionHandle)
/// operations.
///
/// Layer errors convert in via `#[from]`, so `?` works across crate
/// boundaries; the session-specific variants cover interaction rules that
/// belong to no lower layer.
#[derive(Debug, thiserror::Error)]
pub enum GridlinkError {
    /// A transport-level failure (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level failure (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A board mutation was rejected (obstacle, occupied, cap, bounds).
    #[error(transparent)]
    Board(#[from] BoardError),

    /// A dice spec failed to parse.
    #[error(transparent)]
    Dice(#[from] DiceFormatError),

    /// A roll arrived while the DM wasn't waiting for one.
    #[error("no dice roll is currently awaited")]
    NotAwaitingRoll,

    /// AI control needs at least one token on the board.
    #[error("AI control requires at least one token on the board")]
    NoTokens,

    /// No map with this id in the catalog.
    #[error("unknown map id {0:?}")]
    UnknownMap(String),

    /// The session task is gone — its handle can only fail.
    #[error("session is closed")]
    Closed,
}
