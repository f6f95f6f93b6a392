//! Live match state: clock, possession, score, shots and the goal feed.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match event.
pub type EventId = Uuid;

/// Which side of the match: our team or the opponent.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Our,
    Their,
}

/// One-step manual correction of a counter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjust {
    Increment,
    Decrement,
}

impl Adjust {
    /// Apply to a counter, never going below zero.
    pub fn apply(self, counter: &mut u32) {
        *counter = match self {
            Adjust::Increment => counter.saturating_add(1),
            Adjust::Decrement => counter.saturating_sub(1),
        };
    }
}

/// Substitution direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[default]
    Goal,
}

/// A goal in the match feed. Never mutated after creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: EventId,
    pub kind: EventKind,
    /// Whole minutes elapsed when the event was recorded.
    pub minute: u32,
    /// None for opponent goals.
    pub scorer_id: Option<PlayerId>,
    pub assistant_id: Option<PlayerId>,
    pub is_opponent: bool,
}

impl MatchEvent {
    pub fn goal(minute: u32, scorer_id: PlayerId, assistant_id: Option<PlayerId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: EventKind::Goal,
            minute,
            scorer_id: Some(scorer_id),
            assistant_id,
            is_opponent: false,
        }
    }

    pub fn opponent_goal(minute: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: EventKind::Goal,
            minute,
            scorer_id: None,
            assistant_id: None,
            is_opponent: true,
        }
    }
}

/// Everything the match clock owns. Times are in seconds.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub is_running: bool,
    pub elapsed_time: u32,
    /// Set on the first start after a reset.
    pub start_time: Option<DateTime<Utc>>,
    pub possession_our: u32,
    pub possession_their: u32,
    /// None when possession is not being tracked.
    pub current_possession: Option<Side>,
    pub time_without_gk: u32,
    pub score_our: u32,
    pub score_their: u32,
    pub shots_on_goal_our: u32,
    pub shots_off_goal_our: u32,
    pub shots_on_goal_their: u32,
    pub shots_off_goal_their: u32,
    /// Newest first.
    pub events: Vec<MatchEvent>,
    pub opponent_name: String,
}

impl MatchState {
    pub fn new(opponent_name: impl Into<String>) -> Self {
        Self {
            opponent_name: opponent_name.into(),
            ..Self::default()
        }
    }

    /// Match minute as shown on event cards.
    pub fn minute(&self) -> u32 {
        self.elapsed_time / 60
    }

    /// Possession split in whole percent. 50/50 until any possession is tracked.
    pub fn possession_percentages(&self) -> (u32, u32) {
        let total = self.possession_our + self.possession_their;
        if total == 0 {
            return (50, 50);
        }
        let pct = |part: u32| (f64::from(part) * 100.0 / f64::from(total)).round() as u32;
        (pct(self.possession_our), pct(self.possession_their))
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Our => self.score_our,
            Side::Their => self.score_their,
        }
    }

    pub(crate) fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Our => &mut self.score_our,
            Side::Their => &mut self.score_their,
        }
    }

    pub fn shots(&self, side: Side, on_target: bool) -> u32 {
        match (side, on_target) {
            (Side::Our, true) => self.shots_on_goal_our,
            (Side::Our, false) => self.shots_off_goal_our,
            (Side::Their, true) => self.shots_on_goal_their,
            (Side::Their, false) => self.shots_off_goal_their,
        }
    }

    pub(crate) fn shots_mut(&mut self, side: Side, on_target: bool) -> &mut u32 {
        match (side, on_target) {
            (Side::Our, true) => &mut self.shots_on_goal_our,
            (Side::Our, false) => &mut self.shots_off_goal_our,
            (Side::Their, true) => &mut self.shots_on_goal_their,
            (Side::Their, false) => &mut self.shots_off_goal_their,
        }
    }

    /// Back to a fresh match against the same opponent.
    pub fn reset(&mut self) {
        let opponent_name = std::mem::take(&mut self.opponent_name);
        *self = Self::new(opponent_name);
    }
}
