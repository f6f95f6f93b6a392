//! Data structures for the coach dashboard: players, live match, competitions.

mod competition;
mod match_state;
mod player;
mod session;

pub use competition::{
    Competition, CompetitionId, Fixture, FixtureId, MatchResult, Opponent, OpponentId, ResultId,
    StandingEntry, Strength,
};
pub use match_state::{Adjust, Direction, EventId, EventKind, MatchEvent, MatchState, Side};
pub use player::{Player, PlayerId, PlayerRole};
pub use session::{CoachError, Session, SessionId, MAX_ON_PITCH};
