//! Session: the team's roster, live match and competitions in one owned state object.

use crate::models::competition::{
    Competition, CompetitionId, Fixture, FixtureId, MatchResult, Opponent, OpponentId, ResultId, Strength,
};
use crate::models::match_state::MatchState;
use crate::models::player::{Player, PlayerId, PlayerRole};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How many players the coach puts on the pitch by default when adding to the roster.
pub const MAX_ON_PITCH: usize = 5;

/// Errors that can occur during session operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CoachError {
    /// A goal for our side was recorded without choosing a scorer.
    MissingScorer,
    /// No player with this id on the roster.
    PlayerNotFound(PlayerId),
    /// The player exists but is on the bench.
    PlayerNotActive(PlayerId),
    /// Assistant is benched, unknown, or the scorer themself.
    InvalidAssistant(PlayerId),
    /// The clock is paused.
    ClockNotRunning,
    /// Name was empty after trimming.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// An opponent with this name already exists in the competition.
    DuplicateOpponentName,
    CompetitionNotFound(CompetitionId),
    OpponentNotFound(OpponentId),
    ResultNotFound(ResultId),
    /// Result import could not be parsed.
    InvalidCsv(String),
}

impl std::fmt::Display for CoachError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoachError::MissingScorer => write!(f, "Choose a scorer before recording the goal"),
            CoachError::PlayerNotFound(_) => write!(f, "Player not found"),
            CoachError::PlayerNotActive(_) => write!(f, "Player is not on the pitch"),
            CoachError::InvalidAssistant(_) => {
                write!(f, "Assistant must be another player on the pitch")
            }
            CoachError::ClockNotRunning => write!(f, "Match clock is not running"),
            CoachError::EmptyName => write!(f, "Name must not be empty"),
            CoachError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            CoachError::DuplicateOpponentName => {
                write!(f, "An opponent with this name already exists")
            }
            CoachError::CompetitionNotFound(_) => write!(f, "Competition not found"),
            CoachError::OpponentNotFound(_) => write!(f, "Opponent not found"),
            CoachError::ResultNotFound(_) => write!(f, "Result not found"),
            CoachError::InvalidCsv(msg) => write!(f, "Invalid results CSV: {}", msg),
        }
    }
}

impl std::error::Error for CoachError {}

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Full dashboard state for one team.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub team_name: String,
    pub players: Vec<Player>,
    pub match_state: MatchState,
    pub competitions: Vec<Competition>,
}

impl Session {
    /// Create a new session with an empty roster and a fresh match.
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_name: team_name.into(),
            players: Vec::new(),
            match_state: MatchState::default(),
            competitions: Vec::new(),
        }
    }

    /// Create a session with initial players.
    pub fn with_players(team_name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::new(team_name)
        }
    }

    /// Starting squad: five on the pitch with a goalkeeper, a reserve keeper and one field player on the bench.
    pub fn with_default_roster(team_name: impl Into<String>) -> Self {
        use PlayerRole::*;
        let players = vec![
            Player::active("Alex", Goalkeeper),
            Player::active("Jordan", Field),
            Player::active("Taylor", Field),
            Player::active("Morgan", Field),
            Player::active("Casey", Field),
            Player::new("Riley", Goalkeeper),
            Player::new("Skyler", Field),
        ];
        Self::with_players(team_name, players)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active)
    }

    pub fn bench_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_active)
    }

    /// Add a player. Goes straight onto the pitch while fewer than [`MAX_ON_PITCH`] are active.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        role: PlayerRole,
    ) -> Result<PlayerId, CoachError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(CoachError::EmptyName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(CoachError::DuplicatePlayerName);
        }
        let mut player = Player::new(name_trimmed, role);
        player.is_active = self.active_players().count() < MAX_ON_PITCH;
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), CoachError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(CoachError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    pub fn competition(&self, id: CompetitionId) -> Result<&Competition, CoachError> {
        self.competitions
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoachError::CompetitionNotFound(id))
    }

    pub fn competition_mut(&mut self, id: CompetitionId) -> Result<&mut Competition, CoachError> {
        self.competitions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoachError::CompetitionNotFound(id))
    }

    pub fn add_competition(&mut self, name: impl Into<String>) -> Result<CompetitionId, CoachError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(CoachError::EmptyName);
        }
        let competition = Competition::new(name);
        let id = competition.id;
        self.competitions.push(competition);
        Ok(id)
    }

    /// Add an opponent to a competition. Names are unique per competition (case-insensitive).
    pub fn add_opponent(
        &mut self,
        competition_id: CompetitionId,
        name: impl Into<String>,
        strength: Strength,
        notes: Option<String>,
    ) -> Result<OpponentId, CoachError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(CoachError::EmptyName);
        }
        let competition = self.competition_mut(competition_id)?;
        if competition
            .opponents
            .iter()
            .any(|o| o.name.eq_ignore_ascii_case(name))
        {
            return Err(CoachError::DuplicateOpponentName);
        }
        let mut opponent = Opponent::new(name, strength);
        opponent.notes = notes.filter(|n| !n.trim().is_empty());
        let id = opponent.id;
        competition.opponents.push(opponent);
        Ok(id)
    }

    /// Remove an opponent together with its fixtures. Results keep their free-text names.
    pub fn remove_opponent(
        &mut self,
        competition_id: CompetitionId,
        opponent_id: OpponentId,
    ) -> Result<(), CoachError> {
        let competition = self.competition_mut(competition_id)?;
        let before = competition.opponents.len();
        competition.opponents.retain(|o| o.id != opponent_id);
        if competition.opponents.len() == before {
            return Err(CoachError::OpponentNotFound(opponent_id));
        }
        competition.fixtures.retain(|f| f.opponent_id != opponent_id);
        Ok(())
    }

    pub fn add_fixture(
        &mut self,
        competition_id: CompetitionId,
        opponent_id: OpponentId,
        kickoff: NaiveDateTime,
        venue: impl Into<String>,
    ) -> Result<FixtureId, CoachError> {
        let competition = self.competition_mut(competition_id)?;
        if competition.opponent(opponent_id).is_none() {
            return Err(CoachError::OpponentNotFound(opponent_id));
        }
        let fixture = Fixture {
            id: Uuid::new_v4(),
            opponent_id,
            kickoff,
            venue: venue.into(),
        };
        let id = fixture.id;
        competition.fixtures.push(fixture);
        Ok(id)
    }

    /// Earliest fixture at or after `now`.
    pub fn upcoming_fixture(
        &self,
        competition_id: CompetitionId,
        now: NaiveDateTime,
    ) -> Result<Option<&Fixture>, CoachError> {
        let competition = self.competition(competition_id)?;
        Ok(competition
            .fixtures
            .iter()
            .filter(|f| f.kickoff >= now)
            .min_by_key(|f| f.kickoff))
    }

    pub fn add_result(
        &mut self,
        competition_id: CompetitionId,
        result: MatchResult,
    ) -> Result<ResultId, CoachError> {
        let competition = self.competition_mut(competition_id)?;
        let id = result.id;
        competition.results.push(result);
        Ok(id)
    }

    pub fn remove_result(
        &mut self,
        competition_id: CompetitionId,
        result_id: ResultId,
    ) -> Result<(), CoachError> {
        let competition = self.competition_mut(competition_id)?;
        let idx = competition
            .results
            .iter()
            .position(|r| r.id == result_id)
            .ok_or(CoachError::ResultNotFound(result_id))?;
        competition.results.remove(idx);
        Ok(())
    }
}
