//! Match clock: start/pause, the one-second tick, and in-match actions (goals, shots, subs, reset).

use crate::models::{
    Adjust, CoachError, Direction, MatchEvent, MatchState, Player, PlayerId, Session, Side,
};
use chrono::Utc;
use serde::Serialize;

/// Start (or resume) the clock. The start time is kept from the first start after a reset.
pub fn start_match(session: &mut Session) {
    let state = &mut session.match_state;
    if state.is_running {
        return;
    }
    state.is_running = true;
    if state.start_time.is_none() {
        state.start_time = Some(Utc::now());
    }
    log::info!("Match clock started at {}", format_clock(state.elapsed_time));
}

pub fn pause_match(session: &mut Session) {
    let state = &mut session.match_state;
    if !state.is_running {
        return;
    }
    state.is_running = false;
    log::info!("Match clock paused at {}", format_clock(state.elapsed_time));
}

/// Advance the match by one second. Returns false (and changes nothing) while paused.
///
/// 1. Elapsed time.
/// 2. Possession for the side holding the ball, if tracked.
/// 3. Time without a goalkeeper when no active player is one.
/// 4. Playtime for every active player.
pub fn tick(session: &mut Session) -> bool {
    let state = &mut session.match_state;
    if !state.is_running {
        return false;
    }
    state.elapsed_time += 1;
    match state.current_possession {
        Some(Side::Our) => state.possession_our += 1,
        Some(Side::Their) => state.possession_their += 1,
        None => {}
    }
    if !has_active_goalkeeper(&session.players) {
        state.time_without_gk += 1;
    }
    for p in session.players.iter_mut().filter(|p| p.is_active) {
        p.total_play_time += 1;
    }
    true
}

/// Change which side holds the ball; counts from the next tick. Rejected while paused.
pub fn set_possession(session: &mut Session, side: Option<Side>) -> Result<(), CoachError> {
    let state = &mut session.match_state;
    if !state.is_running {
        return Err(CoachError::ClockNotRunning);
    }
    state.current_possession = side;
    Ok(())
}

/// Record a goal and prepend it to the feed. A goal always counts as a shot on target.
///
/// Our goals need an active scorer; the optional assistant must be another active player.
/// On any validation failure nothing is changed.
pub fn record_goal(
    session: &mut Session,
    side: Side,
    scorer_id: Option<PlayerId>,
    assistant_id: Option<PlayerId>,
) -> Result<MatchEvent, CoachError> {
    let minute = session.match_state.minute();
    let event = match side {
        Side::Our => {
            let scorer_id = scorer_id.ok_or(CoachError::MissingScorer)?;
            let scorer = session
                .player(scorer_id)
                .ok_or(CoachError::PlayerNotFound(scorer_id))?;
            if !scorer.is_active {
                return Err(CoachError::PlayerNotActive(scorer_id));
            }
            if let Some(aid) = assistant_id {
                let valid = aid != scorer_id && session.player(aid).is_some_and(|p| p.is_active);
                if !valid {
                    return Err(CoachError::InvalidAssistant(aid));
                }
            }

            if let Some(p) = session.get_player_mut(scorer_id) {
                p.add_goal();
            }
            if let Some(p) = assistant_id.and_then(|aid| session.get_player_mut(aid)) {
                p.add_assist();
            }
            MatchEvent::goal(minute, scorer_id, assistant_id)
        }
        Side::Their => MatchEvent::opponent_goal(minute),
    };

    let state = &mut session.match_state;
    Adjust::Increment.apply(state.score_mut(side));
    Adjust::Increment.apply(state.shots_mut(side, true));
    state.events.insert(0, event.clone());
    log::debug!(
        "Goal for {:?} at minute {} ({}-{})",
        side,
        minute,
        state.score_our,
        state.score_their
    );
    Ok(event)
}

/// Manual shot counter correction, clamped at zero.
pub fn adjust_shot(session: &mut Session, side: Side, on_target: bool, adjust: Adjust) {
    adjust.apply(session.match_state.shots_mut(side, on_target));
}

/// Manual score correction, clamped at zero. Does not touch the feed or the shot counters.
pub fn adjust_score(session: &mut Session, side: Side, adjust: Adjust) {
    adjust.apply(session.match_state.score_mut(side));
}

/// Move a player on or off the pitch. Accrued playtime stays with the player.
/// A player already in the requested state is left as is.
pub fn substitute(
    session: &mut Session,
    player_id: PlayerId,
    direction: Direction,
) -> Result<(), CoachError> {
    let p = session
        .get_player_mut(player_id)
        .ok_or(CoachError::PlayerNotFound(player_id))?;
    let is_active = direction == Direction::In;
    if p.is_active == is_active {
        return Ok(());
    }
    p.is_active = is_active;
    p.last_subbed_at = Some(Utc::now());
    log::debug!("Substitution: {} {:?}", p.name, direction);
    Ok(())
}

/// Full match reset: clock, counters and feed are cleared, playtime and sub stamps zeroed.
/// Roster membership and career goals/assists are kept.
pub fn reset_match(session: &mut Session) {
    session.match_state.reset();
    for p in &mut session.players {
        p.total_play_time = 0;
        p.last_subbed_at = None;
    }
    log::info!("Match reset");
}

pub fn set_opponent_name(session: &mut Session, name: impl Into<String>) {
    let name: String = name.into();
    session.match_state.opponent_name = name.trim().to_string();
}

pub fn has_active_goalkeeper(players: &[Player]) -> bool {
    players.iter().any(|p| p.is_active && p.is_goalkeeper())
}

/// `MM:SS`; minutes keep growing past 99.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Read-only values derived from the match state for display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchStats {
    pub clock: String,
    pub minute: u32,
    pub possession_our_pct: u32,
    pub possession_their_pct: u32,
    pub goalkeeper_on_pitch: bool,
    pub active_players: usize,
}

pub fn match_stats(session: &Session) -> MatchStats {
    let state: &MatchState = &session.match_state;
    let (our, their) = state.possession_percentages();
    MatchStats {
        clock: format_clock(state.elapsed_time),
        minute: state.minute(),
        possession_our_pct: our,
        possession_their_pct: their,
        goalkeeper_on_pitch: has_active_goalkeeper(&session.players),
        active_players: session.active_players().count(),
    }
}
