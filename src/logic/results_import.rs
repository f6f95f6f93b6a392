//! Bulk entry of league results from CSV (`date,team_a,score_a,team_b,score_b`).

use crate::models::{CoachError, CompetitionId, MatchResult, ResultId, Session};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize)]
struct ResultRow {
    date: NaiveDate,
    team_a: String,
    score_a: u32,
    team_b: String,
    score_b: u32,
}

/// Parse every row or fail on the first bad one (1-based data row in the message).
pub fn parse_results_csv<R: Read>(reader: R) -> Result<Vec<MatchResult>, CoachError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut results = Vec::new();
    for (i, row) in rdr.deserialize::<ResultRow>().enumerate() {
        let row = row.map_err(|e| CoachError::InvalidCsv(format!("row {}: {}", i + 1, e)))?;
        if row.team_a.is_empty() || row.team_b.is_empty() {
            return Err(CoachError::InvalidCsv(format!("row {}: empty team name", i + 1)));
        }
        results.push(MatchResult::new(
            row.team_a,
            row.score_a,
            row.team_b,
            row.score_b,
            row.date,
        ));
    }
    Ok(results)
}

/// Parse and append to a competition. Nothing is added unless the whole file parses.
pub fn import_results_csv<R: Read>(
    session: &mut Session,
    competition_id: CompetitionId,
    reader: R,
) -> Result<Vec<ResultId>, CoachError> {
    session.competition(competition_id)?;
    let results = parse_results_csv(reader)?;
    let ids = results.iter().map(|r| r.id).collect();
    let competition = session.competition_mut(competition_id)?;
    log::info!(
        "Imported {} result(s) into {}",
        results.len(),
        competition.name
    );
    competition.results.extend(results);
    Ok(ids)
}
