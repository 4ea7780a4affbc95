use anyhow::anyhow;

use matchup_terminal::provider::roster_delta;
use matchup_terminal::state::{
    apply_delta, AppState, Batter, Delta, Pitcher, RosterFocus, RosterState,
};

fn batters() -> Vec<Batter> {
    vec![
        Batter {
            id: 660670,
            name: "Ronald Acuna Jr.".to_string(),
        },
        Batter {
            id: 645277,
            name: "Ozzie Albies".to_string(),
        },
    ]
}

fn pitchers() -> Vec<Pitcher> {
    vec![Pitcher {
        id: 554430,
        name: "Zack Wheeler".to_string(),
    }]
}

#[test]
fn batters_failing_makes_the_whole_roster_fail() {
    // Pitchers resolved fine; the aggregate still must not expose them.
    let delta = roster_delta(Err(anyhow!("http 500")), Ok(pitchers()));
    let mut state = AppState::new();
    apply_delta(&mut state, delta);

    assert!(!state.roster_ready());
    assert!(state.batters().is_empty());
    assert!(state.pitchers().is_empty());
    assert!(matches!(state.roster, RosterState::Failed { .. }));
}

#[test]
fn pitchers_failing_makes_the_whole_roster_fail() {
    let delta = roster_delta(Ok(batters()), Err(anyhow!("connection refused")));
    assert!(matches!(delta, Delta::RosterFailed { .. }));
}

#[test]
fn both_succeeding_loads_both_lists_verbatim() {
    let delta = roster_delta(Ok(batters()), Ok(pitchers()));
    let mut state = AppState::new();
    apply_delta(&mut state, delta);

    assert!(state.roster_ready());
    assert_eq!(state.batters().len(), 2);
    assert_eq!(state.batters()[0].name, "Ronald Acuna Jr.");
    assert_eq!(state.batters()[1].name, "Ozzie Albies");
    assert_eq!(state.pitchers().len(), 1);
}

#[test]
fn roster_failure_logs_a_warning() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::RosterFailed {
            message: "Error fetching player data: http 500".to_string(),
        },
    );
    let last = state.logs.back().expect("failure should log");
    assert!(last.starts_with("[WARN]"));
}

#[test]
fn selected_names_resolve_against_the_loaded_roster() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::RosterLoaded {
            batters: batters(),
            pitchers: pitchers(),
        },
    );

    state.selected_batter = Some(660670);
    state.selected_pitcher = Some(554430);
    assert_eq!(state.selected_batter_name(), Some("Ronald Acuna Jr."));
    assert_eq!(state.selected_pitcher_name(), Some("Zack Wheeler"));

    // An id the roster does not know stays unnamed.
    state.selected_batter = Some(999);
    assert_eq!(state.selected_batter_name(), None);
}

#[test]
fn cursor_movement_is_clamped_to_the_list() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::RosterLoaded {
            batters: batters(),
            pitchers: pitchers(),
        },
    );

    state.focus = RosterFocus::Batters;
    state.cursor_up();
    assert_eq!(state.batter_cursor, 0);
    state.cursor_down();
    assert_eq!(state.batter_cursor, 1);
    state.cursor_down();
    assert_eq!(state.batter_cursor, 1);

    state.focus = RosterFocus::Pitchers;
    state.cursor_down();
    assert_eq!(state.pitcher_cursor, 0);
    assert_eq!(state.cursor_id(), Some(554430));
}

#[test]
fn cursor_has_no_id_before_the_roster_loads() {
    let state = AppState::new();
    assert_eq!(state.cursor_id(), None);
}
