pub mod chart;
pub mod dashboard;
pub mod format;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::Frame;

use crate::engine::EngineSnapshot;

use chart::PriceChart;
use dashboard::{KeybindBar, PricePanel, StatsPanel, StatusBar};

/// Draws one frame from an engine snapshot. `notice` is a transient line
/// such as a rejected key press.
pub fn render(frame: &mut Frame, snapshot: &EngineSnapshot, notice: Option<&str>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(6), // price + stats
            Constraint::Min(8),    // chart
            Constraint::Length(1), // notice / last feed error
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            symbol: &snapshot.symbol,
            phase: snapshot.phase,
            running: snapshot.running,
            interval_secs: snapshot.interval.as_secs(),
            points: snapshot.history.len(),
            health: &snapshot.health,
        },
        outer[0],
    );

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[1]);

    let latest = snapshot.latest.as_ref();
    frame.render_widget(PricePanel::new(latest), top[0]);
    frame.render_widget(
        StatsPanel::new(latest, format::base_asset(&snapshot.symbol)),
        top[1],
    );

    let rising = latest.map(|s| s.is_up()).unwrap_or(true);
    frame.render_widget(
        PriceChart::new(&snapshot.history, &snapshot.symbol).rising(rising),
        outer[2],
    );

    let message = match (notice, snapshot.health.last_error.as_deref()) {
        (Some(n), _) => Some(Span::styled(format!(" {}", n), Style::default().fg(Color::Yellow))),
        (None, Some(err)) if snapshot.health.is_degraded() => Some(Span::styled(
            format!(" last feed error: {}", err),
            Style::default().fg(Color::Red),
        )),
        _ => None,
    };
    match message {
        Some(span) if outer[3].height > 0 => frame.render_widget(span, outer[3]),
        _ => {}
    }

    frame.render_widget(KeybindBar, outer[4]);
}
