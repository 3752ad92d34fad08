use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::model::PricePoint;

use super::format::{format_clock, format_thousands};

/// Scatter-style line of the retained price history, earliest on the left.
pub struct PriceChart<'a> {
    points: &'a [PricePoint],
    title: String,
    rising: bool,
}

impl<'a> PriceChart<'a> {
    pub fn new(points: &'a [PricePoint], symbol: &str) -> Self {
        Self {
            points,
            title: format!(" Price ({}) ", symbol),
            rising: true,
        }
    }

    pub fn rising(mut self, rising: bool) -> Self {
        self.rising = rising;
        self
    }
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        // A single point is not a line.
        if self.points.len() < 2 || inner.height < 3 || inner.width < 4 {
            let msg = if self.points.is_empty() {
                "waiting for data..."
            } else {
                "collecting history..."
            };
            if inner.height > 0 {
                buf.set_string(inner.x, inner.y, msg, Style::default().fg(Color::DarkGray));
            }
            return;
        }

        let chart_height = inner.height.saturating_sub(1) as usize; // leave 1 row for time labels
        let chart_width = inner.width as usize;

        let visible = if self.points.len() > chart_width {
            &self.points[self.points.len() - chart_width..]
        } else {
            self.points
        };

        let min_price = visible.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max_price = visible
            .iter()
            .map(|p| p.price)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = max_price - min_price;
        let range = if range < 0.01 { 1.0 } else { range };

        let color = if self.rising { Color::Green } else { Color::Red };
        // Spread points across the full width when there are fewer than columns.
        let step = if visible.len() > 1 {
            (chart_width - 1) as f64 / (visible.len() - 1) as f64
        } else {
            0.0
        };
        for (i, point) in visible.iter().enumerate() {
            let x = inner.x + ((i as f64 * step) as u16).min(inner.width - 1);
            let normalized = (point.price - min_price) / range;
            let y_pos = chart_height
                - 1
                - ((normalized * (chart_height - 1) as f64) as usize).min(chart_height - 1);
            let y = inner.y + y_pos as u16;
            buf.set_string(x, y, "●", Style::default().fg(color));
        }

        let label_style = Style::default().fg(Color::DarkGray);
        buf.set_string(inner.x, inner.y, format_thousands(max_price, 2), label_style);
        buf.set_string(
            inner.x,
            inner.y + chart_height as u16 - 1,
            format_thousands(min_price, 2),
            label_style,
        );

        let time_y = inner.y + inner.height - 1;
        if let (Some(first), Some(last)) = (visible.first(), visible.last()) {
            let right = format_clock(last.timestamp);
            buf.set_string(inner.x, time_y, format_clock(first.timestamp), label_style);
            let right_x = inner.x + inner.width.saturating_sub(right.len() as u16);
            buf.set_string(right_x, time_y, right, label_style);
        }
    }
}
