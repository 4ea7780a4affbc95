use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
};

use matchup_terminal::api::ApiConfig;
use matchup_terminal::provider::spawn_provider;
use matchup_terminal::state::{
    apply_delta, apply_selection, AppState, Delta, MatchupPair, Prediction, PredictionState,
    ProviderCommand, RosterFocus, RosterState, SelectionEvent,
};

const PERCENT_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Red,
    Color::Blue,
];

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                if self.state.roster_ready() {
                    self.state.toggle_focus();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.cursor_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.cursor_up(),
            KeyCode::Enter | KeyCode::Char(' ') => self.pick_under_cursor(),
            KeyCode::Char('c') | KeyCode::Backspace => self.clear_focused(),
            KeyCode::Char('r') => {
                if matches!(self.state.roster, RosterState::Failed { .. }) {
                    self.request_roster();
                }
            }
            _ => {}
        }
    }

    fn pick_under_cursor(&mut self) {
        let Some(id) = self.state.cursor_id() else {
            return;
        };
        let event = match self.state.focus {
            RosterFocus::Batters => SelectionEvent::BatterPicked(id),
            RosterFocus::Pitchers => SelectionEvent::PitcherPicked(id),
        };
        self.dispatch_selection(event);
    }

    fn clear_focused(&mut self) {
        let event = match self.state.focus {
            RosterFocus::Batters => SelectionEvent::BatterCleared,
            RosterFocus::Pitchers => SelectionEvent::PitcherCleared,
        };
        self.dispatch_selection(event);
    }

    fn dispatch_selection(&mut self, event: SelectionEvent) {
        if let Some(pair) = apply_selection(&mut self.state, event) {
            self.request_prediction(pair);
        }
    }

    fn request_prediction(&mut self, pair: MatchupPair) {
        if self
            .cmd_tx
            .send(ProviderCommand::FetchPrediction { pair })
            .is_err()
        {
            // Provider thread is gone; a stuck Pending would never resolve.
            self.state.prediction = PredictionState::Failed {
                pair,
                message: "Prediction provider unavailable".to_string(),
            };
        }
    }

    fn request_roster(&mut self) {
        self.state.roster = RosterState::Loading;
        if self.cmd_tx.send(ProviderCommand::FetchRoster).is_err() {
            self.state.roster = RosterState::Failed {
                message: "Roster provider unavailable".to_string(),
            };
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx, ApiConfig::from_env());

    let mut app = App::new(cmd_tx);
    app.request_roster();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(
        std::env::var("TICK_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(250)
            .max(50),
    );
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], &app.state);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let matchup = match (state.selected_batter_name(), state.selected_pitcher_name()) {
        (Some(batter), Some(pitcher)) => format!(" | {batter} vs. {pitcher}"),
        (Some(batter), None) => format!(" | {batter} vs. ?"),
        (None, Some(pitcher)) => format!(" | ? vs. {pitcher}"),
        (None, None) => String::new(),
    };
    let line1 = format!("  .--.  MATCHUP TERMINAL{matchup}");
    let line2 = " ( () )".to_string();
    let line3 = "  `--'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match &state.roster {
        RosterState::Loading => "Loading rosters... | ? Help | q Quit".to_string(),
        RosterState::Failed { .. } => "r Retry | ? Help | q Quit".to_string(),
        RosterState::Ready { .. } => {
            "Tab Switch list | j/k/↑/↓ Move | Enter Pick | c Clear | ? Help | q Quit".to_string()
        }
    }
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.roster {
        RosterState::Loading => {
            let loading = Paragraph::new("Loading batters and pitchers...")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, area);
        }
        // A roster failure replaces the whole interactive body.
        RosterState::Failed { message } => {
            let error = Paragraph::new(format!("{message}\n\nPress r to retry."))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().title("Roster Error").borders(Borders::ALL));
            frame.render_widget(error, area);
        }
        RosterState::Ready { .. } => render_dashboard(frame, area, state),
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(5)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(40)])
        .split(rows[0]);

    render_roster_columns(frame, columns[0], state);
    render_prediction_panel(frame, columns[1], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[1]);
}

fn render_roster_columns(frame: &mut Frame, area: Rect, state: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let batter_rows: Vec<(u32, &str)> = state
        .batters()
        .iter()
        .map(|b| (b.id, b.name.as_str()))
        .collect();
    render_roster_list(
        frame,
        halves[0],
        "Batters",
        &batter_rows,
        state.batter_cursor,
        state.selected_batter,
        state.focus == RosterFocus::Batters,
    );

    let pitcher_rows: Vec<(u32, &str)> = state
        .pitchers()
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();
    render_roster_list(
        frame,
        halves[1],
        "Pitchers",
        &pitcher_rows,
        state.pitcher_cursor,
        state.selected_pitcher,
        state.focus == RosterFocus::Pitchers,
    );
}

fn render_roster_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[(u32, &str)],
    cursor: usize,
    selected_id: Option<u32>,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if rows.is_empty() {
        let empty = Paragraph::new("No players").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    if inner.height == 0 {
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(cursor, rows.len(), visible);

    let mut lines = Vec::with_capacity(end - start);
    for idx in start..end {
        let (id, name) = rows[idx];
        let cursor_mark = if focused && idx == cursor { "> " } else { "  " };
        let picked = selected_id == Some(id);
        let pick_mark = if picked { "* " } else { "  " };
        let mut style = Style::default();
        if picked {
            style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
        }
        if focused && idx == cursor {
            style = style.bg(Color::DarkGray);
        }
        lines.push(Line::styled(format!("{cursor_mark}{pick_mark}{name}"), style));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_prediction_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.prediction {
        PredictionState::Idle => {
            let hint = Paragraph::new("Select a batter and a pitcher")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Matchup").borders(Borders::ALL));
            frame.render_widget(hint, area);
        }
        PredictionState::Pending { .. } => {
            let pending = Paragraph::new(format!("Fetching {}...", matchup_label(state)))
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Matchup").borders(Borders::ALL));
            frame.render_widget(pending, area);
        }
        PredictionState::Failed { message, .. } => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(Block::default().title("Matchup").borders(Borders::ALL));
            frame.render_widget(error, area);
        }
        PredictionState::Ready { prediction, .. } => {
            render_prediction_ready(frame, area, state, prediction);
        }
    }
}

fn render_prediction_ready(frame: &mut Frame, area: Rect, state: &AppState, prediction: &Prediction) {
    let block = Block::default()
        .title(matchup_label(state))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let percentages = prediction.outcome_percentages();
    let pct_height = (percentages.len() as u16).clamp(1, 8) + 2;

    let mut constraints = vec![
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(pct_height),
    ];
    if prediction.has_timeline() {
        constraints.push(Constraint::Length(10));
    }
    if prediction.has_videos() {
        constraints.push(Constraint::Min(3));
    }
    constraints.push(Constraint::Min(0));
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    render_summary(frame, sections[0], prediction);
    render_outcome_distribution(frame, sections[1], prediction);
    render_outcome_percentages(frame, sections[2], &percentages);

    let videos_at = 3 + usize::from(prediction.has_timeline());
    if prediction.has_timeline() {
        render_timeline(frame, sections[3], prediction);
    }
    if prediction.has_videos() {
        render_videos(frame, sections[videos_at], prediction);
    }
}

fn render_summary(frame: &mut Frame, area: Rect, prediction: &Prediction) {
    let summary = Paragraph::new(prediction.summary_lines().join("\n"))
        .block(Block::default().title("Summary").borders(Borders::ALL));
    frame.render_widget(summary, area);
}

fn render_outcome_distribution(frame: &mut Frame, area: Rect, prediction: &Prediction) {
    let block = Block::default()
        .title("Outcome Distribution")
        .borders(Borders::ALL);
    if prediction.outcome_counts.is_empty() {
        let empty = Paragraph::new("No recorded outcomes")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = prediction
        .outcome_counts
        .iter()
        .map(|o| {
            Bar::default()
                .value(u64::from(o.count))
                .label(Line::from(truncate_label(&o.label, 8)))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

fn render_outcome_percentages(frame: &mut Frame, area: Rect, percentages: &[(String, f64)]) {
    let block = Block::default()
        .title("Outcome Percentage")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }
    if percentages.is_empty() {
        let empty =
            Paragraph::new("No recorded outcomes").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    for (i, (label, pct)) in percentages.iter().take(inner.height as usize).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(16),
                Constraint::Min(10),
                Constraint::Length(7),
            ])
            .split(row_area);

        let color = PERCENT_COLORS[i % PERCENT_COLORS.len()];
        let name = Paragraph::new(truncate_label(label, 15));
        frame.render_widget(name, cols[0]);
        frame.render_widget(percent_bar(*pct, color), cols[1]);
        let value = Paragraph::new(format!("{pct:>5.1}%"));
        frame.render_widget(value, cols[2]);
    }
}

fn percent_bar(pct: f64, color: Color) -> BarChart<'static> {
    let bar = Bar::default()
        .value(pct.round() as u64)
        .text_value(String::new())
        .style(Style::default().fg(color));
    BarChart::default()
        .data(BarGroup::default().bars(&[bar]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(100)
}

fn render_timeline(frame: &mut Frame, area: Rect, prediction: &Prediction) {
    let series = &prediction.performance_over_time;
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.batting_average))
        .collect();
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let first = short_date(&series[0].date);
    let last = short_date(&series[series.len() - 1].date);

    let dataset = Dataset::default()
        .name("BA")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title("Batting Average Over Time")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(Axis::default().bounds([0.0, 1.0]).labels(vec![
            Span::raw("0.000"),
            Span::raw("0.500"),
            Span::raw("1.000"),
        ]));
    frame.render_widget(chart, area);
}

fn render_videos(frame: &mut Frame, area: Rect, prediction: &Prediction) {
    // No inline playback in a terminal; the links themselves are the section.
    let list = prediction.video_links.join("\n");
    let videos = Paragraph::new(list).block(
        Block::default()
            .title("Video Highlights")
            .borders(Borders::ALL),
    );
    frame.render_widget(videos, area);
}

fn matchup_label(state: &AppState) -> String {
    let batter = state.selected_batter_name().unwrap_or("?");
    let pitcher = state.selected_pitcher_name().unwrap_or("?");
    format!("{batter} vs. {pitcher}")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    label.chars().take(max).collect()
}

fn short_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return date.format("%m-%d").to_string();
    }
    raw.chars().take(10).collect()
}

fn visible_range(cursor: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = cursor.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchup Terminal - Help",
        "",
        "Global:",
        "  Tab / h / l  Switch between batter and pitcher lists",
        "  j/k or ↑/↓   Move cursor",
        "  Enter/Space  Pick player under cursor",
        "  c/Backspace  Clear the focused selection",
        "  r            Retry roster load (after a roster error)",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "The prediction panel follows the selection: picking both",
        "players fetches the matchup; clearing either side clears it.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
