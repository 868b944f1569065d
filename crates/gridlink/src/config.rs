//! Session configuration.

use std::time::Duration;

use tracing::warn;

/// Tunable parameters for one game session.
///
/// These used to be scattered magic numbers; they are supplied at session
/// construction so embedders (and tests) can tighten or loosen them.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often the full board snapshot is pushed to the DM while the
    /// link is open.
    pub push_interval: Duration,

    /// Maximum number of tokens on the board.
    pub token_cap: usize,

    /// Fog-of-war reveal radius around a token, in cells.
    pub vision_range: u32,

    /// The die rolled when the DM requests a roll without naming one.
    pub default_dice: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            push_interval: Duration::from_secs(10),
            token_cap: 5,
            vision_range: 2,
            default_dice: "d20".to_string(),
        }
    }
}

impl SessionConfig {
    /// Clamps out-of-range values so the config is safe to run with.
    ///
    /// - `token_cap` is raised to at least 1 — a board that can never hold
    ///   a token deadlocks AI control.
    /// - `push_interval` is raised to at least one second so a typo can't
    ///   flood the DM.
    pub fn validated(mut self) -> Self {
        if self.token_cap == 0 {
            warn!("token_cap of 0 is unusable — raising to 1");
            self.token_cap = 1;
        }
        if self.push_interval < Duration::from_secs(1) {
            warn!(
                interval_ms = self.push_interval.as_millis() as u64,
                "push_interval below 1s — clamping"
            );
            self.push_interval = Duration::from_secs(1);
        }
        self
    }
}
