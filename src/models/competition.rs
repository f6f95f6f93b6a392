//! Competition, Opponent, Fixture, MatchResult and the derived StandingEntry.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CompetitionId = Uuid;
pub type OpponentId = Uuid;
pub type FixtureId = Uuid;
pub type ResultId = Uuid;

/// Scouting classification of an opponent.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub id: OpponentId,
    pub name: String,
    pub logo_url: Option<String>,
    pub strength: Strength,
    pub notes: Option<String>,
}

impl Opponent {
    pub fn new(name: impl Into<String>, strength: Strength) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            logo_url: None,
            strength,
            notes: None,
        }
    }
}

/// A scheduled, not yet played match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub opponent_id: OpponentId,
    pub kickoff: NaiveDateTime,
    pub venue: String,
}

/// Final score of a league match. Team names are free text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: ResultId,
    pub team_a: String,
    pub score_a: u32,
    pub team_b: String,
    pub score_b: u32,
    pub date: NaiveDate,
}

impl MatchResult {
    pub fn new(
        team_a: impl Into<String>,
        score_a: u32,
        team_b: impl Into<String>,
        score_b: u32,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_a: team_a.into(),
            score_a,
            team_b: team_b.into(),
            score_b,
            date,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub opponents: Vec<Opponent>,
    pub fixtures: Vec<Fixture>,
    pub results: Vec<MatchResult>,
}

impl Competition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            opponents: Vec::new(),
            fixtures: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn opponent(&self, id: OpponentId) -> Option<&Opponent> {
        self.opponents.iter().find(|o| o.id == id)
    }
}

/// One row of a league table. Only ever produced by the standings computation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub gf: u64,
    pub ga: u64,
    pub gd: i64,
    pub points: u32,
}

impl StandingEntry {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            ..Self::default()
        }
    }
}
