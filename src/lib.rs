//! Futsal coach dashboard: library with models, match clock, standings and the advice boundary.

pub mod advice;
pub mod logic;
pub mod models;

pub use logic::{
    adjust_score, adjust_shot, competition_standings, compute_standings, format_clock,
    has_active_goalkeeper, import_results_csv, match_stats, parse_results_csv, pause_match,
    record_goal, reset_match, set_opponent_name, set_possession, start_match, substitute, tick,
    MatchStats,
};
pub use models::{
    Adjust, CoachError, Competition, CompetitionId, Direction, EventId, EventKind, Fixture,
    FixtureId, MatchEvent, MatchResult, MatchState, Opponent, OpponentId, Player, PlayerId,
    PlayerRole, ResultId, Session, SessionId, Side, StandingEntry, Strength, MAX_ON_PITCH,
};
