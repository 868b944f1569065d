//! External collaborator hooks.
//!
//! The engine doesn't mint rewards or play audio itself — those live in the
//! embedding application (a wallet integration, an audio backend). It only
//! defines the seams and calls them fire-and-forget: results are logged,
//! never interpreted.

use std::future::Future;

use gridlink_board::Terrain;

/// An opaque receipt from the reward backend.
pub type TransactionHash = String;

/// A failure reported by a hook implementation.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HookError(pub String);

/// Issues a player reward for a narrative milestone.
///
/// Called off the session loop (spawned), so a slow backend can't stall
/// board processing.
pub trait RewardIssuer: Send + Sync + 'static {
    fn issue_reward(
        &self,
        achievement: &str,
    ) -> impl Future<Output = Result<TransactionHash, HookError>> + Send;
}

/// A reward issuer that grants nothing. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRewards;

impl RewardIssuer for NoopRewards {
    async fn issue_reward(&self, _achievement: &str) -> Result<TransactionHash, HookError> {
        Ok(TransactionHash::new())
    }
}

/// Plays sound cues for board events. Fire-and-forget, no return value.
pub trait SoundTrigger: Send + Sync + 'static {
    /// A token landed on this terrain.
    fn play_terrain_sound(&self, terrain: Terrain);

    /// A die of this type was rolled.
    fn play_dice_sound(&self, dice_type: &str);
}

/// A sound trigger that stays quiet. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSounds;

impl SoundTrigger for SilentSounds {
    fn play_terrain_sound(&self, _terrain: Terrain) {}
    fn play_dice_sound(&self, _dice_type: &str) {}
}
