//! Coach dashboard business logic: match clock, standings, result import.

mod clock;
mod results_import;
mod standings;

pub use clock::{
    adjust_score, adjust_shot, format_clock, has_active_goalkeeper, match_stats, pause_match,
    record_goal, reset_match, set_opponent_name, set_possession, start_match, substitute, tick,
    MatchStats,
};
pub use results_import::{import_results_csv, parse_results_csv};
pub use standings::{compute_standings, competition_standings};
