//! Integration tests for league table aggregation.

use chrono::NaiveDate;
use futsal_coach::{compute_standings, MatchResult, StandingEntry};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 24).unwrap()
}

fn result(a: &str, sa: u32, b: &str, sb: u32) -> MatchResult {
    MatchResult::new(a, sa, b, sb, date())
}

fn row<'a>(table: &'a [StandingEntry], name: &str) -> &'a StandingEntry {
    table.iter().find(|e| e.team_name == name).unwrap()
}

#[test]
fn win_and_draw_example() {
    let results = vec![result("A", 3, "B", 1), result("A", 2, "C", 2)];
    let table = compute_standings(["A", "B", "C"], &results);

    let a = row(&table, "A");
    assert_eq!(
        (a.played, a.won, a.drawn, a.lost, a.gf, a.ga, a.gd, a.points),
        (2, 1, 1, 0, 5, 3, 2, 4)
    );
    let b = row(&table, "B");
    assert_eq!(
        (b.played, b.won, b.drawn, b.lost, b.gf, b.ga, b.gd, b.points),
        (1, 0, 0, 1, 1, 3, -2, 0)
    );
    let c = row(&table, "C");
    assert_eq!(
        (c.played, c.won, c.drawn, c.lost, c.gf, c.ga, c.gd, c.points),
        (1, 0, 1, 0, 2, 2, 0, 1)
    );

    let order: Vec<_> = table.iter().map(|e| e.team_name.as_str()).collect();
    assert_eq!(order, ["A", "C", "B"]);
}

#[test]
fn result_order_does_not_matter() {
    let results = vec![
        result("A", 1, "B", 0),
        result("C", 4, "D", 4),
        result("B", 2, "C", 5),
        result("D", 3, "A", 0),
        result("A", 2, "C", 2),
    ];
    let forward = compute_standings(["A", "B", "C", "D"], &results);
    let mut reversed = results.clone();
    reversed.reverse();
    assert_eq!(compute_standings(["A", "B", "C", "D"], &reversed), forward);
    let mut rotated = results;
    rotated.rotate_left(2);
    assert_eq!(compute_standings(["A", "B", "C", "D"], &rotated), forward);
}

#[test]
fn unknown_team_results_are_dropped() {
    let table = compute_standings(
        ["A", "B"],
        &[result("A", 1, "Ghost", 0), result("Typo", 2, "B", 2)],
    );
    assert_eq!(table, vec![StandingEntry::new("A"), StandingEntry::new("B")]);
}

#[test]
fn ties_break_on_goal_difference_then_goals_for_then_input_order() {
    // A and B: 3 pts and gd +1 each, B scored more. C and D: 0 pts, gd -1 each, D scored more.
    // E and F never play and keep input order.
    let results = vec![
        result("A", 1, "C", 0),
        result("B", 3, "D", 2),
        result("B", 0, "X", 0),
    ];
    let table = compute_standings(["F", "E", "A", "B", "C", "D"], &results);
    let order: Vec<_> = table.iter().map(|e| e.team_name.as_str()).collect();
    assert_eq!(order, ["B", "A", "F", "E", "D", "C"]);
}

#[test]
fn duplicate_team_names_get_one_row() {
    let table = compute_standings(["A", "A", "B"], &[result("A", 2, "B", 0)]);
    assert_eq!(table.len(), 2);
    assert_eq!(row(&table, "A").points, 3);
}

#[test]
fn huge_scores_do_not_overflow_goal_totals() {
    let big = u32::MAX / 2 + 1;
    let table = compute_standings(["A", "B"], &[result("A", big, "B", 0), result("A", big, "B", 0)]);
    let a = row(&table, "A");
    assert_eq!(a.gf, 2 * u64::from(big));
    assert_eq!(a.gd, 2 * i64::from(big));
    assert_eq!(a.points, 6);
    let b = row(&table, "B");
    assert_eq!(b.ga, 2 * u64::from(big));
    assert_eq!(b.gd, -2 * i64::from(big));
    assert_eq!(table[0].team_name, "A");
}
