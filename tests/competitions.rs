//! Integration tests for competitions: opponents, fixtures, results, CSV import and standings.

use chrono::{NaiveDate, NaiveDateTime};
use futsal_coach::{
    competition_standings, import_results_csv, parse_results_csv, CoachError, MatchResult,
    Session, Strength,
};

fn kickoff(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 11, day)
        .unwrap()
        .and_hms_opt(19, 30, 0)
        .unwrap()
}

fn league() -> (Session, futsal_coach::CompetitionId) {
    let mut s = Session::new("Emerald Falcons FC");
    let comp = s.add_competition("National Futsal League").unwrap();
    s.add_opponent(comp, "Thunder FC", Strength::High, Some("Very physical team".into()))
        .unwrap();
    s.add_opponent(comp, "Red Devils", Strength::Medium, None)
        .unwrap();
    (s, comp)
}

#[test]
fn standings_include_our_team_and_opponents() {
    let (mut s, comp) = league();
    let d = NaiveDate::from_ymd_opt(2023, 10, 24).unwrap();
    s.add_result(comp, MatchResult::new("Emerald Falcons FC", 3, "Thunder FC", 1, d))
        .unwrap();
    s.add_result(comp, MatchResult::new("Red Devils", 2, "Thunder FC", 2, d))
        .unwrap();
    s.add_result(comp, MatchResult::new("Red Devils", 9, "Nobody United", 0, d))
        .unwrap();

    let table = competition_standings(&s, comp).unwrap();
    let order: Vec<_> = table.iter().map(|e| e.team_name.as_str()).collect();
    assert_eq!(order, ["Emerald Falcons FC", "Red Devils", "Thunder FC"]);
    assert_eq!(table[1].played, 1);
    assert_eq!(table[1].gf, 2);
}

#[test]
fn opponent_names_are_unique_and_fixtures_need_an_opponent() {
    let (mut s, comp) = league();
    assert_eq!(
        s.add_opponent(comp, "thunder fc", Strength::Low, None),
        Err(CoachError::DuplicateOpponentName)
    );
    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        s.add_fixture(comp, missing, kickoff(2), "Arena"),
        Err(CoachError::OpponentNotFound(missing))
    );
    assert!(matches!(
        s.add_competition(" "),
        Err(CoachError::EmptyName)
    ));
}

#[test]
fn upcoming_fixture_is_the_earliest_not_yet_played() {
    let (mut s, comp) = league();
    let thunder = s.competition(comp).unwrap().opponents[0].id;
    let devils = s.competition(comp).unwrap().opponents[1].id;
    s.add_fixture(comp, thunder, kickoff(1), "Central Futsal Arena").unwrap();
    let next = s
        .add_fixture(comp, devils, kickoff(9), "Grand Park Sports Complex")
        .unwrap();
    s.add_fixture(comp, thunder, kickoff(20), "Central Futsal Arena").unwrap();

    let found = s.upcoming_fixture(comp, kickoff(2)).unwrap().unwrap();
    assert_eq!(found.id, next);
    assert!(s.upcoming_fixture(comp, kickoff(21)).unwrap().is_none());
}

#[test]
fn removing_an_opponent_drops_its_fixtures() {
    let (mut s, comp) = league();
    let thunder = s.competition(comp).unwrap().opponents[0].id;
    s.add_fixture(comp, thunder, kickoff(3), "Arena").unwrap();
    s.remove_opponent(comp, thunder).unwrap();
    let c = s.competition(comp).unwrap();
    assert_eq!(c.opponents.len(), 1);
    assert!(c.fixtures.is_empty());
    assert_eq!(
        s.remove_opponent(comp, thunder),
        Err(CoachError::OpponentNotFound(thunder))
    );
}

#[test]
fn remove_result() {
    let (mut s, comp) = league();
    let d = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
    let id = s
        .add_result(comp, MatchResult::new("Red Devils", 1, "Thunder FC", 0, d))
        .unwrap();
    s.remove_result(comp, id).unwrap();
    assert!(s.competition(comp).unwrap().results.is_empty());
    assert_eq!(s.remove_result(comp, id), Err(CoachError::ResultNotFound(id)));
}

#[test]
fn csv_import_appends_results() {
    let (mut s, comp) = league();
    let csv = "date,team_a,score_a,team_b,score_b\n\
               2023-10-24, Emerald Falcons FC ,3,Thunder FC,1\n\
               2023-10-31,Red Devils,0,Emerald Falcons FC,2\n";
    let ids = import_results_csv(&mut s, comp, csv.as_bytes()).unwrap();
    assert_eq!(ids.len(), 2);
    let c = s.competition(comp).unwrap();
    assert_eq!(c.results[0].team_a, "Emerald Falcons FC");
    assert_eq!(c.results[1].score_b, 2);

    let table = competition_standings(&s, comp).unwrap();
    assert_eq!(table[0].team_name, "Emerald Falcons FC");
    assert_eq!(table[0].points, 6);
}

#[test]
fn bad_csv_row_rejects_whole_import() {
    let (mut s, comp) = league();
    let csv = "date,team_a,score_a,team_b,score_b\n\
               2023-10-24,Red Devils,1,Thunder FC,1\n\
               2023-10-31,Red Devils,two,Thunder FC,1\n";
    let err = import_results_csv(&mut s, comp, csv.as_bytes()).unwrap_err();
    assert!(matches!(err, CoachError::InvalidCsv(ref msg) if msg.starts_with("row 2")));
    assert!(s.competition(comp).unwrap().results.is_empty());

    assert!(parse_results_csv("date,team_a,score_a,team_b,score_b\n2023-10-01,,1,B,0\n".as_bytes()).is_err());
}
