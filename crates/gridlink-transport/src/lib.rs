//! Session transport for Gridlink.
//!
//! Exactly one connection exists per session, scoped by a [`SessionId`]
//! generated at session start. The [`DmLink`] trait abstracts the link so
//! the session layer can run against the real WebSocket ([`WsLink`]) or an
//! in-memory double in tests.
//!
//! Outbound delivery is best-effort: once the link is down, the session
//! layer drops sends silently and no reconnect is attempted — recovery
//! happens at session granularity, with a fresh id.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket link via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::WsLink;

use std::fmt;

use rand::Rng;

/// Identifies one game session — and therefore one connection.
///
/// 128 bits of randomness rendered as 32 lowercase hex characters, embedded
/// in the connection URL (`ws://<host>/ws/dnd/<session-id>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random session id.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let bytes: [u8; 16] = rng.random();
        let mut id = String::with_capacity(32);
        for byte in bytes {
            id.push_str(&format!("{byte:02x}"));
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The DM endpoint URL for a session on the given host.
pub fn endpoint_url(host: &str, session: &SessionId) -> String {
    format!("ws://{host}/ws/dnd/{session}")
}

/// A bidirectional link to the DM service.
///
/// The futures are explicitly `Send` so a session holding a generic link
/// can run inside a spawned task.
pub trait DmLink: Send + 'static {
    /// Sends one outbound frame.
    fn send(
        &mut self,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next inbound frame.
    ///
    /// Returns `Ok(None)` when the link is cleanly closed.
    fn recv(
        &mut self,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;

    /// Closes the link.
    fn close(&mut self) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
