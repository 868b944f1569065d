//! Interaction controller for Gridlink.
//!
//! Translates pointer and click input into board mutations and pending
//! outbound actions. The controller is strictly one of three modes — Idle,
//! Placing, Dragging — and every transition between them is explicit.
//!
//! The controller never talks to the network: it mutates the
//! [`BoardStore`](gridlink_board::BoardStore) it is handed and returns
//! [`PendingAction`]s describing what the session layer should report to
//! the DM.

mod capture;
mod controller;
mod geometry;

pub use capture::{NullCapture, PointerCapture};
pub use controller::{InteractionController, InteractionMode, PendingAction};
pub use geometry::GridGeometry;
