//! Live log view: a rolling window over the log feed, pinned to the newest entry.

use crossterm::event::{KeyCode, KeyEvent};
use helpdesk_core::logs::{LOG_BUFFER_CAPACITY, LogFeed, LogSource};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::debug;

/// Geometry of the mounted log surface, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSurface {
    pub viewport_height: usize,
    pub content_height: usize,
    pub scroll_top: usize,
}

impl ScrollSurface {
    pub const fn max_scroll(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }
}

pub struct LogsView {
    feed: LogFeed,
    surface: Option<ScrollSurface>,
}

impl LogsView {
    /// Build the view and subscribe to `source`.
    pub fn new(source: &dyn LogSource) -> Self {
        let mut feed = LogFeed::new();
        feed.start(source);
        Self {
            feed,
            surface: None,
        }
    }

    pub const fn feed(&self) -> &LogFeed {
        &self.feed
    }

    pub const fn surface(&self) -> Option<ScrollSurface> {
        self.surface
    }

    /// Drain pending entries. Returns how many arrived.
    pub fn tick(&mut self) -> usize {
        let appended = self.feed.pump();
        if appended > 0 {
            self.scroll_to_bottom();
        }
        appended
    }

    /// Pin the surface to its newest row. Nothing to do before the first render.
    pub fn scroll_to_bottom(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.scroll_top = surface.max_scroll();
        }
    }

    pub fn clear(&mut self) {
        self.feed.clear();
        debug!("log view cleared");
        if let Some(surface) = self.surface.as_mut() {
            surface.content_height = 0;
        }
        self.scroll_to_bottom();
    }

    /// Unsubscribe. Entries still in flight are dropped.
    pub fn deactivate(&mut self) {
        self.feed.stop();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let KeyCode::Char('c') = key.code {
            self.clear();
        }
    }

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let state = if self.feed.is_subscribed() {
            Span::styled("● live", Style::default().fg(Color::Green))
        } else {
            Span::styled("○ stopped", Style::default().fg(Color::DarkGray))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title(Line::from(vec![
                Span::raw(format!(
                    " Live Logs {}/{LOG_BUFFER_CAPACITY} ",
                    self.feed.len()
                )),
                state,
                Span::raw(" "),
            ]));
        let inner = block.inner(area);

        let previous = self.surface.map_or(0, |surface| surface.scroll_top);
        self.surface = Some(ScrollSurface {
            viewport_height: usize::from(inner.height),
            content_height: self.feed.len(),
            scroll_top: previous,
        });
        self.scroll_to_bottom();

        let lines: Vec<Line<'_>> = if self.feed.is_empty() {
            vec![Line::from(Span::styled(
                "Waiting for log entries...",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.feed.entries().iter().map(|entry| entry_line(entry)).collect()
        };

        let scroll_top = self
            .surface
            .map_or(0, |surface| u16::try_from(surface.scroll_top).unwrap_or(u16::MAX));
        frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll_top, 0)), area);
    }
}

fn entry_line(entry: &str) -> Line<'_> {
    let (stamp, message) = entry.split_once("] ").unwrap_or(("", entry));
    let message_style = if message.contains("failed") {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    if stamp.is_empty() {
        return Line::from(Span::styled(message, message_style));
    }
    Line::from(vec![
        Span::styled(stamp, Style::default().fg(Color::DarkGray)),
        Span::styled("] ", Style::default().fg(Color::DarkGray)),
        Span::styled(message, message_style),
    ])
}
