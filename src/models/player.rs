//! Player and PlayerRole data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in events and lookups).
pub type PlayerId = Uuid;

/// Position a player covers when on the pitch.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    #[default]
    Field,
    Goalkeeper,
}

/// A squad member.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Seconds spent on the pitch in the current match.
    pub total_play_time: u32,
    /// On the pitch (true) or on the bench (false).
    pub is_active: bool,
    pub role: PlayerRole,
    /// Career goals; survives a match reset.
    pub total_goals: u32,
    /// Career assists; survives a match reset.
    pub total_assists: u32,
    pub last_subbed_at: Option<DateTime<Utc>>,
}

impl Player {
    /// Create a new benched player with the given name. Counters start at zero.
    pub fn new(name: impl Into<String>, role: PlayerRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            total_play_time: 0,
            is_active: false,
            role,
            total_goals: 0,
            total_assists: 0,
            last_subbed_at: None,
        }
    }

    /// Same as [`Player::new`] but already on the pitch.
    pub fn active(name: impl Into<String>, role: PlayerRole) -> Self {
        Self {
            is_active: true,
            ..Self::new(name, role)
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.role == PlayerRole::Goalkeeper
    }

    /// Whole minutes played in the current match.
    pub fn minutes_played(&self) -> u32 {
        self.total_play_time / 60
    }

    /// Record a goal for this player.
    pub fn add_goal(&mut self) {
        self.total_goals += 1;
    }

    /// Record an assist for this player.
    pub fn add_assist(&mut self) {
        self.total_assists += 1;
    }
}
