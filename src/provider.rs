use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;

use crate::api::ApiConfig;
use crate::predict_fetch::fetch_prediction;
use crate::roster_fetch::{fetch_batters, fetch_pitchers};
use crate::state::{Batter, Delta, Pitcher, ProviderCommand};

/// Runs the backend I/O off the UI thread. Commands arrive on `cmd_rx`,
/// results go back as deltas for the UI thread to apply.
///
/// Each prediction request gets its own thread: requests for different
/// pairs may be in flight at once and resolve in any order, and nothing is
/// cancelled. `apply_delta` keeps or drops each response by comparing its
/// pair against the selection current at resolution time.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, cfg: ApiConfig) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchRoster => fetch_roster(&tx, &cfg),
                ProviderCommand::FetchPrediction { pair } => {
                    let tx = tx.clone();
                    let cfg = cfg.clone();
                    thread::spawn(move || {
                        let delta = match fetch_prediction(&cfg, pair) {
                            Ok(prediction) => Delta::PredictionLoaded { pair, prediction },
                            Err(err) => Delta::PredictionFailed {
                                pair,
                                message: format!("Error fetching prediction data: {err}"),
                            },
                        };
                        let _ = tx.send(delta);
                    });
                }
            }
        }
    });
}

/// Both roster requests start together and the pair fails fast as a unit.
fn fetch_roster(tx: &Sender<Delta>, cfg: &ApiConfig) {
    let (batters, pitchers) = rayon::join(|| fetch_batters(cfg), || fetch_pitchers(cfg));
    let _ = tx.send(roster_delta(batters, pitchers));
}

/// One error means no roster at all, never a partial one, and both
/// failures collapse into a single message.
pub fn roster_delta(batters: Result<Vec<Batter>>, pitchers: Result<Vec<Pitcher>>) -> Delta {
    match (batters, pitchers) {
        (Ok(batters), Ok(pitchers)) => Delta::RosterLoaded { batters, pitchers },
        (Err(err), _) | (_, Err(err)) => Delta::RosterFailed {
            message: format!("Error fetching player data: {err}"),
        },
    }
}
