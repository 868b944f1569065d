//! Wire protocol for the Gridlink DM link.
//!
//! Defines the "language" spoken with the DM service over the session
//! WebSocket:
//!
//! - **Types** ([`ClientMessage`], [`DmMessage`], [`PlayerAction`], ...) —
//!   the JSON envelopes that travel on the wire.
//! - **Snapshots** ([`GameStateSnapshot`]) — the full-board unit pushed to
//!   the DM with `get_state`.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how envelopes become bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding.
//!
//! The protocol layer sits between the transport (raw frames) and the
//! reconciler (board semantics). It knows message shapes, not sockets or
//! game rules. Every inbound envelope is an exhaustively-matched tagged
//! union: an unrecognized `type` tag fails decode and surfaces as a
//! [`ProtocolError`], never as a silently-ignored default case.

mod codec;
mod error;
mod snapshot;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use snapshot::{GameStateBlock, GameStateSnapshot, GridPos, TokenView};
pub use types::{
    AddCharacter, ClientMessage, DiceRollPayload, DmMessage, MoveCharacter, PlayerAction,
    PlayerActionKind,
};
