use std::fs;
use std::path::PathBuf;

use matchup_terminal::api::ApiConfig;
use matchup_terminal::predict_fetch::{parse_prediction_json, predict_url};
use matchup_terminal::roster_fetch::{parse_batters_json, parse_pitchers_json};
use matchup_terminal::state::MatchupPair;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_batters_fixture_preserving_order() {
    let raw = read_fixture("batters.json");
    let batters = parse_batters_json(&raw).expect("fixture should parse");
    assert_eq!(batters.len(), 3);
    assert_eq!(batters[0].id, 660670);
    assert_eq!(batters[0].name, "Ronald Acuna Jr.");
    assert_eq!(batters[2].name, "Matt Olson");
}

#[test]
fn parses_pitchers_fixture() {
    let raw = read_fixture("pitchers.json");
    let pitchers = parse_pitchers_json(&raw).expect("fixture should parse");
    assert_eq!(pitchers.len(), 2);
    assert_eq!(pitchers[0].id, 554430);
    assert_eq!(pitchers[0].name, "Zack Wheeler");
}

#[test]
fn duplicate_roster_rows_are_kept_verbatim() {
    let raw = r#"[
        { "BATTER_ID": 1, "BATTER": "A" },
        { "BATTER_ID": 1, "BATTER": "A" }
    ]"#;
    let batters = parse_batters_json(raw).expect("duplicates should parse");
    assert_eq!(batters.len(), 2);
}

#[test]
fn roster_null_and_empty_bodies_are_empty_lists() {
    assert!(parse_batters_json("null").expect("null should parse").is_empty());
    assert!(parse_batters_json("  ").expect("blank should parse").is_empty());
    assert!(parse_pitchers_json("null").expect("null should parse").is_empty());
}

#[test]
fn parses_prediction_fixture() {
    let raw = read_fixture("prediction.json");
    let prediction = parse_prediction_json(&raw).expect("fixture should parse");
    assert_eq!(prediction.total_at_bats, 152);
    assert_eq!(prediction.hits, 44);
    assert_eq!(prediction.strikeouts, 31);
    assert_eq!(prediction.outcome_counts.len(), 5);
    assert_eq!(prediction.outcome_counts[0].label, "Single");
    assert_eq!(prediction.outcome_counts[0].count, 24);
    // Backend order carries straight through to the charts.
    assert_eq!(prediction.outcome_counts[4].label, "Strikeout");
    assert_eq!(prediction.performance_over_time.len(), 3);
    assert_eq!(prediction.performance_over_time[0].date, "2024-04-02");
    assert_eq!(prediction.video_links.len(), 2);
    assert!(prediction.has_videos());
    assert!(prediction.has_timeline());
}

#[test]
fn prediction_missing_optional_sequences_defaults_empty() {
    let raw = r#"{
        "batting_average": 0.25,
        "slugging_percentage": 0.4,
        "total_at_bats": 4,
        "hits": 1,
        "strikeouts": 2
    }"#;
    let prediction = parse_prediction_json(raw).expect("sequences should default");
    assert!(prediction.outcome_counts.is_empty());
    assert!(prediction.performance_over_time.is_empty());
    assert!(prediction.video_links.is_empty());
    assert!(!prediction.has_videos());
    assert!(!prediction.has_timeline());
}

#[test]
fn prediction_garbage_body_is_an_error() {
    assert!(parse_prediction_json("<html>Server Error</html>").is_err());
    assert!(parse_prediction_json("").is_err());
}

#[test]
fn predict_url_is_keyed_by_the_pair() {
    let cfg = ApiConfig {
        base_url: "http://localhost:8000/api".to_string(),
    };
    let pair = MatchupPair {
        batter_id: 1,
        pitcher_id: 10,
    };
    assert_eq!(
        predict_url(&cfg, pair),
        "http://localhost:8000/api/predict/?batter_id=1&pitcher_id=10"
    );
}

#[test]
fn minimal_fixture_formats_batting_average_to_three_places() {
    let raw = read_fixture("prediction_minimal.json");
    let prediction = parse_prediction_json(&raw).expect("fixture should parse");
    let lines = prediction.summary_lines();
    assert_eq!(lines[0], "Batting Average: 0.301");
    assert_eq!(lines[1], "Slugging Percentage: 0.512");
    // Empty sequences mean the video and timeline sections stay hidden.
    assert!(!prediction.has_videos());
    assert!(!prediction.has_timeline());
}
