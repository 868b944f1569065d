//! The protocol reconciler: applies inbound DM directives to local state.
//!
//! A small state machine tracks the link:
//!
//! ```text
//!   Disconnected ──(open)──→ Connected ──(dice request)──→ AwaitingDiceRoll
//!        ↑                       ↑                              │
//!        │                       └────────(roll resolved)───────┘
//!        └──────────(close/error, from any state)
//! ```
//!
//! Inbound directives are applied in strict arrival order and are trusted:
//! the DM is authoritative, so moves and adds bypass local obstacle and
//! occupancy validation. Malformed payloads never reach this type — the
//! session layer drops them on decode failure.

use gridlink_board::{BoardStore, TokenId};
use gridlink_protocol::DmMessage;

use crate::chat::ChatLog;
use crate::hooks::SoundTrigger;

/// Connection state of the DM link, as the reconciler sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No link, or the link died. Outbound sends are dropped.
    Disconnected,
    /// Link is up; normal exchange.
    Connected,
    /// The DM asked for a dice roll and is waiting on it.
    AwaitingDiceRoll,
}

impl LinkState {
    /// Whether outbound traffic can flow.
    pub fn is_open(self) -> bool {
        !matches!(self, LinkState::Disconnected)
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::Disconnected => write!(f, "Disconnected"),
            LinkState::Connected => write!(f, "Connected"),
            LinkState::AwaitingDiceRoll => write!(f, "AwaitingDiceRoll"),
        }
    }
}

/// Applies DM messages to the board and chat, tracking link state.
#[derive(Debug)]
pub struct Reconciler {
    state: LinkState,
    /// Latest ambient narration text.
    narration: Option<String>,
    /// The die the DM asked for, while a request is outstanding.
    pending_dice: Option<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            state: LinkState::Disconnected,
            narration: None,
            pending_dice: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn narration(&self) -> Option<&str> {
        self.narration.as_deref()
    }

    /// The dice type of the outstanding roll request, if any.
    pub fn pending_dice(&self) -> Option<&str> {
        self.pending_dice.as_deref()
    }

    /// The transport opened.
    pub fn on_open(&mut self) {
        self.state = LinkState::Connected;
    }

    /// The transport closed or errored. Any outstanding roll request dies
    /// with the link.
    pub fn on_close(&mut self) {
        self.state = LinkState::Disconnected;
        self.pending_dice = None;
    }

    /// A local roll satisfied the outstanding request.
    pub fn roll_resolved(&mut self) {
        self.state = LinkState::Connected;
        self.pending_dice = None;
    }

    /// Applies one inbound message, in arrival order.
    pub fn apply(
        &mut self,
        msg: DmMessage,
        board: &mut BoardStore,
        chat: &mut ChatLog,
        ai_mode: bool,
        default_dice: &str,
        sounds: &impl SoundTrigger,
    ) {
        match msg {
            DmMessage::Narration { content } => {
                // In AI-controlled sessions narration doubles as chat —
                // the chat surface IS the game there.
                if ai_mode {
                    chat.push_dm(content.clone());
                }
                self.narration = Some(content);
            }

            DmMessage::DmResponse {
                content,
                request_dice_roll,
                dice_type,
                move_character,
                add_character,
            } => {
                if !content.is_empty() {
                    chat.push_dm(content);
                }

                if let Some(mv) = move_character {
                    self.apply_move(board, sounds, &mv.character_id, mv.to_x, mv.to_y);
                }

                if let Some(add) = add_character {
                    let label = add.label.unwrap_or_else(|| add.character_type.clone());
                    match board.force_place_token(add.x, add.y, label) {
                        Ok(token) => {
                            if let Some(terrain) = board.terrain_at(token.x, token.y) {
                                sounds.play_terrain_sound(terrain);
                            }
                            tracing::info!(token = %token.id, x = token.x, y = token.y, "DM added character");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "DM add_character directive dropped");
                        }
                    }
                }

                if request_dice_roll {
                    let dice = dice_type.unwrap_or_else(|| default_dice.to_string());
                    chat.push_dm(format!("Roll a {dice} to determine the outcome."));
                    self.pending_dice = Some(dice);
                    self.state = LinkState::AwaitingDiceRoll;
                }
            }

            DmMessage::Error { content } => {
                // State is deliberately untouched: a DM-side error doesn't
                // invalidate the link.
                chat.push_dm(format!("Error: {content}"));
            }
        }
    }

    fn apply_move(
        &self,
        board: &mut BoardStore,
        sounds: &impl SoundTrigger,
        character_id: &str,
        to_x: u32,
        to_y: u32,
    ) {
        let Some(id) = TokenId::parse_wire(character_id) else {
            tracing::warn!(character_id, "DM move_character has unparseable id");
            return;
        };
        match board.force_move_token(id, to_x, to_y) {
            Ok(()) => {
                if let Some(terrain) = board.terrain_at(to_x, to_y) {
                    sounds.play_terrain_sound(terrain);
                }
                tracing::info!(token = %id, x = to_x, y = to_y, "DM moved character");
            }
            Err(e) => {
                tracing::warn!(error = %e, "DM move_character directive dropped");
            }
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}
