use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::engine::{EnginePhase, FeedHealth};
use crate::model::StatsSnapshot;

use super::format::{
    format_clock, format_quote_volume_millions, format_signed_pct, format_signed_usd,
    format_usd, format_volume,
};

fn change_color(value: f64) -> Color {
    if value >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

fn placeholder() -> Span<'static> {
    Span::styled("---", Style::default().fg(Color::DarkGray))
}

/// Current price with its 24h percent change, plus 24h high/low.
pub struct PricePanel<'a> {
    latest: Option<&'a StatsSnapshot>,
}

impl<'a> PricePanel<'a> {
    pub fn new(latest: Option<&'a StatsSnapshot>) -> Self {
        Self { latest }
    }
}

impl Widget for PricePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = Style::default().fg(Color::DarkGray);
        let lines = match self.latest {
            Some(s) => vec![
                Line::from(vec![
                    Span::styled("Price: ", label),
                    Span::styled(
                        format_usd(s.price),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format_signed_pct(s.change_percent),
                        Style::default().fg(change_color(s.change_percent)),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("24h High: ", label),
                    Span::styled(format_usd(s.high), Style::default().fg(Color::Green)),
                ]),
                Line::from(vec![
                    Span::styled("24h Low:  ", label),
                    Span::styled(format_usd(s.low), Style::default().fg(Color::Red)),
                ]),
            ],
            None => vec![
                Line::from(vec![Span::styled("Price: ", label), placeholder()]),
                Line::from(vec![Span::styled("24h High: ", label), placeholder()]),
                Line::from(vec![Span::styled("24h Low:  ", label), placeholder()]),
            ],
        };

        let block = Block::default()
            .title(" Market ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// 24h volume, quote volume, absolute change and update time.
pub struct StatsPanel<'a> {
    latest: Option<&'a StatsSnapshot>,
    base_asset: &'a str,
}

impl<'a> StatsPanel<'a> {
    pub fn new(latest: Option<&'a StatsSnapshot>, base_asset: &'a str) -> Self {
        Self { latest, base_asset }
    }
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);
        let row = |name: &'static str, v: Option<Span<'static>>| {
            Line::from(vec![
                Span::styled(name, label),
                v.unwrap_or_else(placeholder),
            ])
        };

        let s = self.latest;
        let lines = vec![
            row(
                "24h Volume: ",
                s.map(|s| Span::styled(format_volume(s.volume, self.base_asset), value)),
            ),
            row(
                "24h Turnover: ",
                s.map(|s| Span::styled(format_quote_volume_millions(s.quote_volume), value)),
            ),
            row(
                "24h Change: ",
                s.map(|s| {
                    Span::styled(
                        format_signed_usd(s.absolute_change),
                        Style::default().fg(change_color(s.absolute_change)),
                    )
                }),
            ),
            row(
                "Updated: ",
                s.map(|s| Span::styled(format_clock(s.observed_at), value)),
            ),
        ];

        let block = Block::default()
            .title(" 24h Stats ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub symbol: &'a str,
    pub phase: EnginePhase,
    pub running: bool,
    pub interval_secs: u64,
    pub points: usize,
    pub health: &'a FeedHealth,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let phase_color = match self.phase {
            EnginePhase::Ticking => Color::Green,
            EnginePhase::Stopped => Color::Yellow,
            EnginePhase::Idle => Color::DarkGray,
        };

        let auto_status = if self.running {
            Span::styled(" AUTO ", Style::default().fg(Color::Green))
        } else {
            Span::styled(
                " MANUAL ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        };

        let feed_status = if self.health.is_degraded() {
            Span::styled(
                format!("FEED ERR x{}", self.health.consecutive_failures),
                Style::default().fg(Color::Red),
            )
        } else if self.health.successes > 0 {
            Span::styled("FEED OK", Style::default().fg(Color::Green))
        } else {
            Span::styled("FEED ---", Style::default().fg(Color::DarkGray))
        };

        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let line = Line::from(vec![
            Span::styled(
                " btc-ticker ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(self.symbol, Style::default().fg(Color::Cyan)),
            sep(),
            Span::styled(self.phase.as_str(), Style::default().fg(phase_color)),
            sep(),
            auto_status,
            sep(),
            Span::styled(
                format!("every {}s", self.interval_secs),
                Style::default().fg(Color::DarkGray),
            ),
            sep(),
            feed_status,
            sep(),
            Span::styled(
                format!("points: {}", self.points),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let line = Line::from(vec![
            Span::styled(" [Q/Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" quit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[A]", Style::default().fg(Color::Yellow)),
            Span::styled("uto-refresh  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[+/-]", Style::default().fg(Color::Yellow)),
            Span::styled(" interval  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::Yellow)),
            Span::styled("efresh once", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
