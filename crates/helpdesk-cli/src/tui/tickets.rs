//! Ticket list view: status filter tabs over a table of tickets.

use crossterm::event::{KeyCode, KeyEvent};
use helpdesk_core::tickets::{
    FILTER_OPTIONS, StatusTone, TicketBoard, TicketStore, next_filter, previous_filter,
    status_tone,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
};

pub struct TicketsView {
    board: TicketBoard,
    table_state: TableState,
}

impl TicketsView {
    pub fn new(store: &dyn TicketStore) -> Self {
        let mut view = Self {
            board: TicketBoard::load(store),
            table_state: TableState::default(),
        };
        view.reset_selection();
        view
    }

    pub const fn board(&self) -> &TicketBoard {
        &self.board
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn apply_filter(&mut self, label: &str) {
        self.board.filter_tickets(label);
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        let first = (!self.board.filtered().is_empty()).then_some(0);
        self.table_state.select(first);
    }

    fn select_next(&mut self) {
        let len = self.board.filtered().len();
        if len == 0 {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.board.filtered().is_empty() {
            return;
        }
        let prev = self
            .table_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => {
                let label = next_filter(self.board.current_filter());
                self.apply_filter(label);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let label = previous_filter(self.board.current_filter());
                self.apply_filter(label);
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as usize) - ('1' as usize);
                self.apply_filter(FILTER_OPTIONS[idx]);
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            _ => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let titles: Vec<Line<'static>> = FILTER_OPTIONS
            .iter()
            .map(|label| Line::from(format!("{label} ({})", self.board.count_for(label))))
            .collect();
        let selected = FILTER_OPTIONS
            .iter()
            .position(|&label| label == self.board.current_filter());
        let tabs = Tabs::new(titles)
            .select(selected.unwrap_or(0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .title(" Filter "),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, chunks[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title(format!(
                " Tickets {}/{} ",
                self.board.filtered().len(),
                self.board.tickets().len()
            ));

        if self.board.filtered().is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No tickets match this filter.",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let rows: Vec<Row<'static>> = self
            .board
            .filtered()
            .iter()
            .map(|ticket| {
                let label = ticket.status.label();
                Row::new(vec![
                    Cell::from(ticket.id.clone()),
                    Cell::from(ticket.subject.clone()),
                    Cell::from(Span::styled(label, tone_style(status_tone(label)))),
                    Cell::from(ticket.created_at.format("%b %-d, %Y %H:%M").to_string()),
                ])
            })
            .collect();

        let header = Row::new(vec!["ID", "Subject", "Status", "Created"]).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(20),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

        frame.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }
}

fn tone_style(tone: StatusTone) -> Style {
    match tone {
        StatusTone::Positive => Style::default().fg(Color::Green),
        StatusTone::Caution => Style::default().fg(Color::Yellow),
        StatusTone::Neutral => Style::default().fg(Color::Gray),
    }
}
