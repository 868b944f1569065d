//! Wire message types for the DM link.
//!
//! Everything here is shaped to match the DM service's JSON exactly:
//! internally tagged envelopes (`{"type": "...", ...fields}`), snake_case
//! tags, and optional directive fields that default when absent. The DM
//! attaches a `timestamp` to its messages; serde ignores unknown fields, so
//! it never trips decoding.

use serde::{Deserialize, Serialize};

use gridlink_board::TokenId;

use crate::snapshot::{GameStateSnapshot, GridPos};

// ---------------------------------------------------------------------------
// Outbound: engine → DM
// ---------------------------------------------------------------------------

/// A message sent to the DM service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Full board snapshot, pushed periodically and on demand.
    /// Serializes as `{"type": "get_state", ...snapshot fields}`.
    GetState(GameStateSnapshot),

    /// A local board interaction the DM should narrate around.
    PlayerAction { action: PlayerAction },

    /// The outcome of a locally rolled die.
    RollDice {
        dice_type: String,
        result: u32,
        individual_rolls: Vec<u32>,
    },

    /// Free-text input to the DM, optionally accompanied by a roll.
    UserInput {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dice_roll: Option<DiceRollPayload>,
    },

    /// Hands narrative control to the DM (or takes it back).
    AiControl { enabled: bool },
}

/// One add/move/select/remove character event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAction {
    #[serde(rename = "type")]
    pub kind: PlayerActionKind,
    pub character_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GridPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<GridPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<GridPos>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerActionKind {
    Add,
    Move,
    Select,
    Remove,
}

impl PlayerAction {
    pub fn add(token: TokenId, character_type: &str, x: u32, y: u32) -> Self {
        Self {
            kind: PlayerActionKind::Add,
            character_id: token.to_string(),
            character_type: Some(character_type.to_string()),
            position: Some(GridPos { x, y }),
            from: None,
            to: None,
        }
    }

    pub fn moved(token: TokenId, from: (u32, u32), to: (u32, u32)) -> Self {
        Self {
            kind: PlayerActionKind::Move,
            character_id: token.to_string(),
            character_type: None,
            position: None,
            from: Some(GridPos { x: from.0, y: from.1 }),
            to: Some(GridPos { x: to.0, y: to.1 }),
        }
    }

    pub fn select(token: TokenId) -> Self {
        Self {
            kind: PlayerActionKind::Select,
            character_id: token.to_string(),
            character_type: None,
            position: None,
            from: None,
            to: None,
        }
    }

    pub fn remove(token: TokenId) -> Self {
        Self {
            kind: PlayerActionKind::Remove,
            character_id: token.to_string(),
            character_type: None,
            position: None,
            from: None,
            to: None,
        }
    }
}

/// A roll attached to a `user_input` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRollPayload {
    #[serde(rename = "type")]
    pub dice_type: String,
    pub result: u32,
}

// ---------------------------------------------------------------------------
// Inbound: DM → engine
// ---------------------------------------------------------------------------

/// A message received from the DM service.
///
/// An unrecognized tag fails deserialization — the reconciler logs it and
/// drops the message (the ProtocolError path), rather than falling through
/// a default case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DmMessage {
    /// Ambient scene narration.
    Narration { content: String },

    /// A DM reply: chat content plus optional board/dice directives.
    /// Every field defaults when absent — a bare dice request carries no
    /// content at all.
    DmResponse {
        #[serde(default)]
        content: String,
        #[serde(default)]
        request_dice_roll: bool,
        #[serde(default)]
        dice_type: Option<String>,
        #[serde(default)]
        move_character: Option<MoveCharacter>,
        #[serde(default)]
        add_character: Option<AddCharacter>,
    },

    /// A DM-side failure the player should see.
    Error { content: String },
}

/// Server directive: move an existing character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCharacter {
    pub character_id: String,
    pub to_x: u32,
    pub to_y: u32,
}

/// Server directive: put a new character on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCharacter {
    #[serde(rename = "type")]
    pub character_type: String,
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub label: Option<String>,
}
