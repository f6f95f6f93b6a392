//! League table: aggregate final scores into ranked standings.

use crate::models::{CoachError, CompetitionId, MatchResult, Session, StandingEntry};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Build the league table for a set of team names.
///
/// 1. One zeroed row per distinct name, in the order given.
/// 2. Apply every result whose two teams are both known; others are skipped.
/// 3. Goal difference = goals for - goals against.
/// 4. Stable sort by points, then goal difference, then goals for (all descending).
///
/// The outcome does not depend on the order of `results`.
pub fn compute_standings<I, S>(team_names: I, results: &[MatchResult]) -> Vec<StandingEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table: Vec<StandingEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for name in team_names {
        let name = name.as_ref();
        if !index.contains_key(name) {
            index.insert(name.to_string(), table.len());
            table.push(StandingEntry::new(name));
        }
    }

    for r in results {
        let (a, b) = match (index.get(&r.team_a), index.get(&r.team_b)) {
            (Some(&a), Some(&b)) => (a, b),
            _ => {
                log::debug!(
                    "Skipping result {} vs {}: unknown team name",
                    r.team_a,
                    r.team_b
                );
                continue;
            }
        };
        apply_result(&mut table[a], r.score_a, r.score_b);
        apply_result(&mut table[b], r.score_b, r.score_a);
    }

    for entry in &mut table {
        entry.gd = goal_difference(entry.gf, entry.ga);
    }

    table.sort_by(rank_order);
    table
}

/// Apply one side of a result to its row. Counters saturate instead of overflowing.
fn apply_result(entry: &mut StandingEntry, scored: u32, conceded: u32) {
    entry.played = entry.played.saturating_add(1);
    entry.gf = entry.gf.saturating_add(u64::from(scored));
    entry.ga = entry.ga.saturating_add(u64::from(conceded));
    match scored.cmp(&conceded) {
        Ordering::Greater => {
            entry.won = entry.won.saturating_add(1);
            entry.points = entry.points.saturating_add(3);
        }
        Ordering::Less => entry.lost = entry.lost.saturating_add(1),
        Ordering::Equal => {
            entry.drawn = entry.drawn.saturating_add(1);
            entry.points = entry.points.saturating_add(1);
        }
    }
}

fn goal_difference(gf: u64, ga: u64) -> i64 {
    let gf = i64::try_from(gf).unwrap_or(i64::MAX);
    let ga = i64::try_from(ga).unwrap_or(i64::MAX);
    gf - ga
}

fn rank_order(a: &StandingEntry, b: &StandingEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.gd.cmp(&a.gd))
        .then_with(|| b.gf.cmp(&a.gf))
}

/// Table for one competition: our team plus every registered opponent.
pub fn competition_standings(
    session: &Session,
    competition_id: CompetitionId,
) -> Result<Vec<StandingEntry>, CoachError> {
    let competition = session.competition(competition_id)?;
    let names = std::iter::once(session.team_name.as_str())
        .chain(competition.opponents.iter().map(|o| o.name.as_str()));
    Ok(compute_standings(names, &competition.results))
}
