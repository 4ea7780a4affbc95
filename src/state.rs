use std::collections::VecDeque;

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batter {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pitcher {
    pub id: u32,
    pub name: String,
}

/// The (batter, pitcher) tuple that keys every prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchupPair {
    pub batter_id: u32,
    pub pitcher_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeCount {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePoint {
    pub date: String,
    pub batting_average: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub batting_average: f64,
    pub slugging_percentage: f64,
    pub total_at_bats: u32,
    pub hits: u32,
    pub strikeouts: u32,
    pub outcome_counts: Vec<OutcomeCount>,
    pub performance_over_time: Vec<PerformancePoint>,
    pub video_links: Vec<String>,
}

impl Prediction {
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Batting Average: {:.3}", self.batting_average),
            format!("Slugging Percentage: {:.3}", self.slugging_percentage),
            format!("Total At-Bats: {}", self.total_at_bats),
            format!("Hits: {}", self.hits),
            format!("Strikeouts: {}", self.strikeouts),
        ]
    }

    /// Per-outcome share of all recorded outcomes, in percent, preserving
    /// backend order. Empty when nothing was counted.
    pub fn outcome_percentages(&self) -> Vec<(String, f64)> {
        let total: u64 = self.outcome_counts.iter().map(|o| u64::from(o.count)).sum();
        if total == 0 {
            return Vec::new();
        }
        self.outcome_counts
            .iter()
            .map(|o| (o.label.clone(), o.count as f64 * 100.0 / total as f64))
            .collect()
    }

    pub fn has_videos(&self) -> bool {
        !self.video_links.is_empty()
    }

    // An empty series and an absent field are the same "no data" case.
    pub fn has_timeline(&self) -> bool {
        !self.performance_over_time.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterState {
    Loading,
    Ready {
        batters: Vec<Batter>,
        pitchers: Vec<Pitcher>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionState {
    Idle,
    Pending {
        pair: MatchupPair,
    },
    Ready {
        pair: MatchupPair,
        prediction: Prediction,
    },
    Failed {
        pair: MatchupPair,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFocus {
    Batters,
    Pitchers,
}

/// The single funnel every selection change goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    BatterPicked(u32),
    BatterCleared,
    PitcherPicked(u32),
    PitcherCleared,
}

#[derive(Debug, Clone)]
pub enum Delta {
    RosterLoaded {
        batters: Vec<Batter>,
        pitchers: Vec<Pitcher>,
    },
    RosterFailed {
        message: String,
    },
    PredictionLoaded {
        pair: MatchupPair,
        prediction: Prediction,
    },
    PredictionFailed {
        pair: MatchupPair,
        message: String,
    },
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchRoster,
    FetchPrediction { pair: MatchupPair },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub roster: RosterState,
    pub selected_batter: Option<u32>,
    pub selected_pitcher: Option<u32>,
    pub prediction: PredictionState,
    pub focus: RosterFocus,
    pub batter_cursor: usize,
    pub pitcher_cursor: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            roster: RosterState::Loading,
            selected_batter: None,
            selected_pitcher: None,
            prediction: PredictionState::Idle,
            focus: RosterFocus::Batters,
            batter_cursor: 0,
            pitcher_cursor: 0,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
        }
    }

    pub fn roster_ready(&self) -> bool {
        matches!(self.roster, RosterState::Ready { .. })
    }

    pub fn batters(&self) -> &[Batter] {
        match &self.roster {
            RosterState::Ready { batters, .. } => batters,
            _ => &[],
        }
    }

    pub fn pitchers(&self) -> &[Pitcher] {
        match &self.roster {
            RosterState::Ready { pitchers, .. } => pitchers,
            _ => &[],
        }
    }

    pub fn selected_pair(&self) -> Option<MatchupPair> {
        match (self.selected_batter, self.selected_pitcher) {
            (Some(batter_id), Some(pitcher_id)) => Some(MatchupPair {
                batter_id,
                pitcher_id,
            }),
            _ => None,
        }
    }

    /// Name lookups resolve against the loaded roster for display only; the
    /// prediction fetch is keyed by ids and never needs them.
    pub fn selected_batter_name(&self) -> Option<&str> {
        let id = self.selected_batter?;
        self.batters()
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str())
    }

    pub fn selected_pitcher_name(&self) -> Option<&str> {
        let id = self.selected_pitcher?;
        self.pitchers()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.prediction {
            PredictionState::Ready { prediction, .. } => Some(prediction),
            _ => None,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            RosterFocus::Batters => RosterFocus::Pitchers,
            RosterFocus::Pitchers => RosterFocus::Batters,
        };
    }

    pub fn cursor_down(&mut self) {
        match self.focus {
            RosterFocus::Batters => {
                if self.batter_cursor + 1 < self.batters().len() {
                    self.batter_cursor += 1;
                }
            }
            RosterFocus::Pitchers => {
                if self.pitcher_cursor + 1 < self.pitchers().len() {
                    self.pitcher_cursor += 1;
                }
            }
        }
    }

    pub fn cursor_up(&mut self) {
        match self.focus {
            RosterFocus::Batters => self.batter_cursor = self.batter_cursor.saturating_sub(1),
            RosterFocus::Pitchers => self.pitcher_cursor = self.pitcher_cursor.saturating_sub(1),
        }
    }

    /// Id under the cursor in the focused list, if the roster is loaded.
    pub fn cursor_id(&self) -> Option<u32> {
        match self.focus {
            RosterFocus::Batters => self.batters().get(self.batter_cursor).map(|b| b.id),
            RosterFocus::Pitchers => self.pitchers().get(self.pitcher_cursor).map(|p| p.id),
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }
}

/// Applies one selection change and reports whether a prediction request
/// must be issued for the resulting pair.
///
/// Any change that leaves fewer than two sides selected lands in `Idle`,
/// dropping whatever prediction was on screen before the new selection
/// renders. A pair already `Pending` or `Ready` is not re-requested; a
/// `Failed` pair is, so picking the same matchup again is the retry path.
pub fn apply_selection(state: &mut AppState, event: SelectionEvent) -> Option<MatchupPair> {
    match event {
        SelectionEvent::BatterPicked(id) => state.selected_batter = Some(id),
        SelectionEvent::BatterCleared => state.selected_batter = None,
        SelectionEvent::PitcherPicked(id) => state.selected_pitcher = Some(id),
        SelectionEvent::PitcherCleared => state.selected_pitcher = None,
    }

    let Some(pair) = state.selected_pair() else {
        state.prediction = PredictionState::Idle;
        return None;
    };

    match &state.prediction {
        PredictionState::Pending { pair: current } if *current == pair => None,
        PredictionState::Ready { pair: current, .. } if *current == pair => None,
        _ => {
            state.prediction = PredictionState::Pending { pair };
            Some(pair)
        }
    }
}

/// Applies a provider delta on the UI thread.
///
/// Prediction deltas carry the pair they were requested for and only take
/// effect while that pair is still the current selection; anything else is
/// a stale response and is dropped with a console line. The check runs at
/// resolution time, so request history and arrival order do not matter.
pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::RosterLoaded { batters, pitchers } => {
            state.batter_cursor = 0;
            state.pitcher_cursor = 0;
            state.roster = RosterState::Ready { batters, pitchers };
        }
        Delta::RosterFailed { message } => {
            state.push_log(format!("[WARN] Roster load failed: {message}"));
            state.roster = RosterState::Failed { message };
        }
        Delta::PredictionLoaded { pair, prediction } => {
            if state.selected_pair() == Some(pair) {
                state.prediction = PredictionState::Ready { pair, prediction };
            } else {
                state.push_log(format!(
                    "[INFO] Discarded stale prediction for batter {} vs pitcher {}",
                    pair.batter_id, pair.pitcher_id
                ));
            }
        }
        Delta::PredictionFailed { pair, message } => {
            if state.selected_pair() == Some(pair) {
                state.push_log(format!("[WARN] Prediction error: {message}"));
                state.prediction = PredictionState::Failed { pair, message };
            } else {
                state.push_log(format!(
                    "[INFO] Discarded stale prediction error for batter {} vs pitcher {}",
                    pair.batter_id, pair.pitcher_id
                ));
            }
        }
        Delta::Log(message) => state.push_log(message),
    }
}
