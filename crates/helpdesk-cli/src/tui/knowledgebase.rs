//! Knowledgebase editor view.
//!
//! The editor keeps a char-offset cursor and an optional selection anchor
//! over the document text. Formatting shortcuts wrap the selection in
//! markdown markers; preview mode swaps the text surface for rendered
//! markdown, and while previewing there is no selection to format.

use super::markdown::render_markdown;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use helpdesk_core::clock::{Clock, time_of_day};
use helpdesk_core::kb::{KnowledgebaseDocument, byte_index_at_char};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const BOLD_MARKER: &str = "**";
pub const ITALIC_MARKER: &str = "_";
pub const CODE_MARKER: &str = "`";

pub struct KnowledgebaseView {
    document: KnowledgebaseDocument,
    cursor: usize,
    anchor: Option<usize>,
    clock: Arc<dyn Clock>,
    saved_notice: Option<Instant>,
    saved_indicator: Duration,
    scroll: usize,
}

impl KnowledgebaseView {
    pub fn new(
        document: KnowledgebaseDocument,
        clock: Arc<dyn Clock>,
        saved_indicator: Duration,
    ) -> Self {
        let cursor = document.char_len();
        Self {
            document,
            cursor,
            anchor: None,
            clock,
            saved_notice: None,
            saved_indicator,
            scroll: 0,
        }
    }

    pub const fn document(&self) -> &KnowledgebaseDocument {
        &self.document
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the text surface is mounted and takes keystrokes.
    pub const fn is_editing(&self) -> bool {
        !self.document.preview_mode()
    }

    /// Current selection as an ordered char range; empty when nothing is selected.
    pub fn selection(&self) -> Range<usize> {
        match self.anchor {
            Some(anchor) if anchor <= self.cursor => anchor..self.cursor,
            Some(anchor) => self.cursor..anchor,
            None => self.cursor..self.cursor,
        }
    }

    /// Select `range`, leaving the cursor at its end.
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.document.char_len();
        self.anchor = Some(range.start.min(len));
        self.cursor = range.end.min(len);
    }

    /// Wrap the selection in `prefix`/`suffix` and keep the original text
    /// selected. Does nothing in preview mode; returns whether text changed.
    pub fn insert_text(&mut self, prefix: &str, suffix: &str) -> bool {
        if !self.is_editing() {
            return false;
        }
        let selection = self.selection();
        let wrapped = self
            .document
            .wrap_selection(selection.start, selection.end, prefix, suffix);
        self.anchor = (!wrapped.is_empty()).then_some(wrapped.start);
        self.cursor = wrapped.end;
        true
    }

    pub fn toggle_preview(&mut self) {
        self.document.toggle_preview();
        self.anchor = None;
        self.scroll = 0;
    }

    pub fn save(&mut self) {
        self.document.save(self.clock.as_ref());
        self.saved_notice = Some(Instant::now());
    }

    /// Whether the transient "saved" notice is still showing.
    pub fn saved_visible(&self) -> bool {
        self.saved_notice
            .is_some_and(|at| at.elapsed() < self.saved_indicator)
    }

    /// Expire the saved notice. The save timestamp itself is kept.
    pub fn tick(&mut self) {
        if self.saved_notice.is_some() && !self.saved_visible() {
            self.saved_notice = None;
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    fn delete_selection(&mut self) -> bool {
        let selection = self.selection();
        self.anchor = None;
        if selection.is_empty() {
            return false;
        }
        let start = byte_index_at_char(&self.document.content, selection.start);
        let end = byte_index_at_char(&self.document.content, selection.end);
        self.document.content.replace_range(start..end, "");
        self.cursor = selection.start;
        true
    }

    fn insert_str(&mut self, text: &str) {
        self.delete_selection();
        let at = byte_index_at_char(&self.document.content, self.cursor);
        self.document.content.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    fn backspace(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = byte_index_at_char(&self.document.content, self.cursor);
        self.document.content.remove(at);
    }

    fn delete_forward(&mut self) {
        if self.delete_selection() || self.cursor >= self.document.char_len() {
            return;
        }
        let at = byte_index_at_char(&self.document.content, self.cursor);
        self.document.content.remove(at);
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = target.min(self.document.char_len());
    }

    fn vertical_target(&self, down: bool) -> usize {
        let content = &self.document.content;
        let (row, col) = line_col(content, self.cursor);
        let rows = content.split('\n').count();
        let target_row = if down {
            (row + 1).min(rows - 1)
        } else {
            row.saturating_sub(1)
        };
        if target_row == row {
            return if down {
                self.document.char_len()
            } else {
                0
            };
        }
        offset_at(content, target_row, col)
    }

    fn line_bounds(&self) -> (usize, usize) {
        let content = &self.document.content;
        let (row, col) = line_col(content, self.cursor);
        let start = self.cursor - col;
        let width = content.split('\n').nth(row).map_or(0, |line| line.chars().count());
        (start, start + width)
    }

    fn handle_ctrl(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('b') => {
                self.insert_text(BOLD_MARKER, BOLD_MARKER);
            }
            KeyCode::Char('i') => {
                self.insert_text(ITALIC_MARKER, ITALIC_MARKER);
            }
            KeyCode::Char('k') => {
                self.insert_text(CODE_MARKER, CODE_MARKER);
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('p') => self.toggle_preview(),
            KeyCode::Char('a') if self.is_editing() => {
                self.select(0..self.document.char_len());
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_ctrl(key);
            return;
        }

        if !self.is_editing() {
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
                KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
                KeyCode::Home => self.scroll = 0,
                _ => {}
            }
            return;
        }

        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char(c) => self.insert_str(c.encode_utf8(&mut [0; 4])),
            KeyCode::Enter => self.insert_str("\n"),
            KeyCode::Tab => self.insert_str("    "),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => {
                let selection = self.selection();
                let target = if !extend && !selection.is_empty() {
                    selection.start
                } else {
                    self.cursor.saturating_sub(1)
                };
                self.move_to(target, extend);
            }
            KeyCode::Right => {
                let selection = self.selection();
                let target = if !extend && !selection.is_empty() {
                    selection.end
                } else {
                    self.cursor + 1
                };
                self.move_to(target, extend);
            }
            KeyCode::Up => self.move_to(self.vertical_target(false), extend),
            KeyCode::Down => self.move_to(self.vertical_target(true), extend),
            KeyCode::Home => self.move_to(self.line_bounds().0, extend),
            KeyCode::End => self.move_to(self.line_bounds().1, extend),
            KeyCode::Esc => self.anchor = None,
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let mode = if self.is_editing() {
            Span::styled(" edit ", Style::default().fg(Color::Black).bg(Color::Cyan))
        } else {
            Span::styled(" preview ", Style::default().fg(Color::Black).bg(Color::Magenta))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title(" Knowledgebase ")
            .title(Line::from(vec![mode, Span::raw(" ")]).right_aligned());
        let inner = block.inner(chunks[0]);
        let height = usize::from(inner.height).max(1);

        if self.is_editing() {
            let (row, col) = line_col(&self.document.content, self.cursor);
            if row < self.scroll {
                self.scroll = row;
            } else if row >= self.scroll + height {
                self.scroll = row + 1 - height;
            }
            let lines = editor_lines(&self.document.content, &self.selection());
            let paragraph = Paragraph::new(lines)
                .block(block)
                .scroll((to_u16(self.scroll), 0));
            frame.render_widget(paragraph, chunks[0]);
            frame.set_cursor_position(Position::new(
                inner.x.saturating_add(to_u16(col)),
                inner.y.saturating_add(to_u16(row - self.scroll)),
            ));
        } else {
            let paragraph = Paragraph::new(render_markdown(&self.document.content))
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((to_u16(self.scroll), 0));
            frame.render_widget(paragraph, chunks[0]);
        }

        frame.render_widget(Paragraph::new(self.footer()), chunks[1]);
    }

    fn footer(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let saved = match self.document.last_saved_at() {
            Some(at) if self.saved_visible() => Span::styled(
                format!("✓ Saved at {}", time_of_day(&at)),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Some(at) => Span::styled(format!("Last saved {}", time_of_day(&at)), dim),
            None => Span::styled("Not saved yet", dim),
        };
        Line::from(vec![
            saved,
            Span::styled(format!("  {} chars", self.document.char_len()), dim),
        ])
    }
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Zero-based (row, column) of a char offset.
fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let mut row = 0;
    let mut col = 0;
    for ch in content.chars().take(offset) {
        if ch == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (row, col)
}

/// Char offset of (row, column), clamping the column to the line.
fn offset_at(content: &str, row: usize, col: usize) -> usize {
    let mut offset = 0;
    for (idx, line) in content.split('\n').enumerate() {
        let width = line.chars().count();
        if idx == row {
            return offset + col.min(width);
        }
        offset += width + 1;
    }
    content.chars().count()
}

fn editor_lines(content: &str, selection: &Range<usize>) -> Vec<Line<'static>> {
    let selected = Style::default().bg(Color::Blue).fg(Color::White);
    let mut offset = 0;
    content
        .split('\n')
        .map(|raw| {
            let width = raw.chars().count();
            let start = selection.start.clamp(offset, offset + width) - offset;
            let end = selection.end.clamp(offset, offset + width) - offset;
            offset += width + 1;
            if start == end {
                return Line::from(raw.to_string());
            }
            let before: String = raw.chars().take(start).collect();
            let middle: String = raw.chars().skip(start).take(end - start).collect();
            let after: String = raw.chars().skip(end).collect();
            Line::from(vec![
                Span::raw(before),
                Span::styled(middle, selected),
                Span::raw(after),
            ])
        })
        .collect()
}
