//! The console shell: route tabs, the active view and global keys.

use super::knowledgebase::KnowledgebaseView;
use super::logs::LogsView;
use super::tickets::TicketsView;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use helpdesk_core::clock::Clock;
use helpdesk_core::kb::KnowledgebaseDocument;
use helpdesk_core::logs::LogSource;
use helpdesk_core::route::Route;
use helpdesk_core::tickets::TicketStore;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The mounted view. Only the active route's view exists.
pub enum ActiveView {
    Tickets(TicketsView),
    Knowledgebase(KnowledgebaseView),
    Logs(LogsView),
}

impl ActiveView {
    const fn route(&self) -> Route {
        match self {
            Self::Tickets(_) => Route::Tickets,
            Self::Knowledgebase(_) => Route::Knowledgebase,
            Self::Logs(_) => Route::Logs,
        }
    }
}

/// Everything needed to build a view from scratch.
struct ViewFactory {
    store: Box<dyn TicketStore>,
    log_source: Box<dyn LogSource>,
    clock: Arc<dyn Clock>,
    saved_indicator: Duration,
}

impl ViewFactory {
    fn mount(&self, route: Route) -> ActiveView {
        match route {
            Route::Tickets => ActiveView::Tickets(TicketsView::new(self.store.as_ref())),
            Route::Knowledgebase => ActiveView::Knowledgebase(KnowledgebaseView::new(
                KnowledgebaseDocument::default(),
                Arc::clone(&self.clock),
                self.saved_indicator,
            )),
            Route::Logs => ActiveView::Logs(LogsView::new(self.log_source.as_ref())),
        }
    }
}

pub struct App {
    views: ViewFactory,
    view: ActiveView,
    should_quit: bool,
    keyboard_enhanced: bool,
}

impl App {
    pub fn new(
        store: Box<dyn TicketStore>,
        log_source: Box<dyn LogSource>,
        clock: Arc<dyn Clock>,
        saved_indicator: Duration,
        start: Route,
    ) -> Self {
        let views = ViewFactory {
            store,
            log_source,
            clock,
            saved_indicator,
        };
        let view = views.mount(start);
        Self {
            views,
            view,
            should_quit: false,
            keyboard_enhanced: false,
        }
    }

    /// Record whether the terminal reports Ctrl+I apart from Tab.
    pub const fn set_keyboard_enhanced(&mut self, enhanced: bool) {
        self.keyboard_enhanced = enhanced;
    }

    pub const fn route(&self) -> Route {
        self.view.route()
    }

    pub const fn view(&self) -> &ActiveView {
        &self.view
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Switch to `route`. The old view is torn down before the new one is
    /// built, so a log subscription never outlives its view.
    pub fn navigate(&mut self, route: Route) {
        let from = self.route();
        if from == route {
            return;
        }
        if let ActiveView::Logs(logs) = &mut self.view {
            logs.deactivate();
        }
        self.view = self.views.mount(route);
        info!(%from, to = %route, "navigated");
    }

    /// Per-frame housekeeping for the active view.
    pub fn tick(&mut self) {
        match &mut self.view {
            ActiveView::Logs(logs) => {
                logs.tick();
            }
            ActiveView::Knowledgebase(kb) => kb.tick(),
            ActiveView::Tickets(_) => {}
        }
    }

    /// Tear down the active view before exit.
    pub fn shutdown(&mut self) {
        if let ActiveView::Logs(logs) = &mut self.view {
            logs.deactivate();
        }
    }

    fn editor_has_focus(&self) -> bool {
        matches!(&self.view, ActiveView::Knowledgebase(kb) if kb.is_editing())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::F(n @ 1..=3) => {
                self.navigate(Route::ALL[usize::from(n) - 1]);
                return;
            }
            _ if self.editor_has_focus() => {}
            KeyCode::Tab => {
                self.navigate(self.route().next());
                return;
            }
            KeyCode::BackTab => {
                self.navigate(self.route().previous());
                return;
            }
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match &mut self.view {
            ActiveView::Tickets(view) => view.handle_key(key),
            ActiveView::Knowledgebase(view) => view.handle_key(key),
            ActiveView::Logs(view) => view.handle_key(key),
        }
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let titles: Vec<Line<'static>> = Route::ALL
            .iter()
            .enumerate()
            .map(|(idx, route)| Line::from(format!("F{} {}", idx + 1, route.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.route().index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .title(" helpdesk "),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        match &mut self.view {
            ActiveView::Tickets(view) => view.render(frame, chunks[1]),
            ActiveView::Knowledgebase(view) => view.render(frame, chunks[1]),
            ActiveView::Logs(view) => view.render(frame, chunks[1]),
        }

        frame.render_widget(Paragraph::new(build_status_bar(self)), chunks[2]);
    }
}

fn build_status_bar(app: &App) -> Line<'static> {
    let key_style = Style::default().fg(Color::Cyan);
    let dim_style = Style::default().fg(Color::DarkGray);
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut hint = |key: &'static str, label: &'static str| {
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(label, dim_style));
    };

    match &app.view {
        ActiveView::Tickets(_) => {
            hint("←/→", " filter  ");
            hint("1-4", " pick filter  ");
            hint("↑/↓", " select  ");
        }
        ActiveView::Knowledgebase(kb) if kb.is_editing() => {
            hint("^B", " bold  ");
            if app.keyboard_enhanced {
                hint("^I", " italic  ");
            }
            hint("^K", " code  ");
            hint("^S", " save  ");
            hint("^P", " preview  ");
        }
        ActiveView::Knowledgebase(_) => {
            hint("↑/↓", " scroll  ");
            hint("^S", " save  ");
            hint("^P", " edit  ");
        }
        ActiveView::Logs(_) => {
            hint("c", " clear  ");
        }
    }

    hint("F1-F3", " views  ");
    if app.editor_has_focus() {
        hint("^C", " quit");
    } else {
        hint("TAB", " next  ");
        hint("q", " quit");
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use helpdesk_core::clock::{FixedClock, SystemClock};
    use helpdesk_core::logs::ScriptedLogSource;
    use helpdesk_core::model::ticket::Ticket;
    use helpdesk_core::tickets::MockTicketStore;
    use ratatui::{Terminal, backend::TestBackend};
    use std::cell::Cell;
    use std::rc::Rc;

    fn app_at(start: Route, source: &ScriptedLogSource) -> App {
        let at = Local
            .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
            .single()
            .expect("unambiguous local time");
        App::new(
            Box::new(MockTicketStore::with_fixtures()),
            Box::new(source.clone()),
            Arc::new(FixedClock::new(at)),
            Duration::from_secs(3),
            start,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn opens_on_the_requested_route() {
        let source = ScriptedLogSource::new();
        let app = app_at(Route::Tickets, &source);
        assert_eq!(app.route(), Route::Tickets);
        assert_eq!(source.total_subscriptions(), 0);

        let app = app_at(Route::Logs, &source);
        assert_eq!(app.route(), Route::Logs);
        assert_eq!(source.live_subscribers(), 1);
    }

    struct CountingStore {
        inner: MockTicketStore,
        reads: Rc<Cell<usize>>,
    }

    impl TicketStore for CountingStore {
        fn list_tickets(&self) -> Vec<Ticket> {
            self.reads.set(self.reads.get() + 1);
            self.inner.list_tickets()
        }
    }

    #[test]
    fn starting_elsewhere_does_not_load_tickets() {
        let reads = Rc::new(Cell::new(0));
        let store = CountingStore {
            inner: MockTicketStore::with_fixtures(),
            reads: Rc::clone(&reads),
        };
        let mut app = App::new(
            Box::new(store),
            Box::new(ScriptedLogSource::new()),
            Arc::new(SystemClock),
            Duration::from_secs(3),
            Route::Knowledgebase,
        );
        assert_eq!(reads.get(), 0);

        app.navigate(Route::Tickets);
        assert_eq!(reads.get(), 1);
    }

    #[test]
    fn leaving_logs_cancels_the_subscription() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Tickets, &source);

        app.handle_key(key(KeyCode::F(3)));
        assert_eq!(app.route(), Route::Logs);
        assert_eq!(source.live_subscribers(), 1);

        source.emit("[9:30:00 AM] User logged in");
        app.tick();

        app.handle_key(key(KeyCode::F(1)));
        assert_eq!(app.route(), Route::Tickets);
        assert_eq!(source.live_subscribers(), 0);
        assert_eq!(source.emit("[9:30:02 AM] Cache cleared"), 0);
    }

    #[test]
    fn returning_to_logs_starts_fresh() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Logs, &source);
        source.emit("[9:30:00 AM] User logged in");
        app.tick();

        app.navigate(Route::Knowledgebase);
        app.navigate(Route::Logs);
        assert_eq!(source.total_subscriptions(), 2);
        assert_eq!(source.live_subscribers(), 1);
        let ActiveView::Logs(logs) = app.view() else {
            panic!("expected logs view");
        };
        assert!(logs.feed().is_empty());
    }

    #[test]
    fn navigating_to_the_same_route_keeps_the_view() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Logs, &source);
        app.navigate(Route::Logs);
        assert_eq!(source.total_subscriptions(), 1);
    }

    #[test]
    fn tab_cycles_routes_outside_the_editor() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Tickets, &source);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.route(), Route::Knowledgebase);

        // The editor keeps Tab and q for itself.
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('q')));
        assert_eq!(app.route(), Route::Knowledgebase);
        assert!(!app.should_quit());

        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.route(), Route::Knowledgebase);
        app.handle_key(key(KeyCode::F(1)));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.route(), Route::Logs);
    }

    #[test]
    fn q_quits_outside_the_editor_and_ctrl_c_everywhere() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Tickets, &source);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());

        let mut app = app_at(Route::Knowledgebase, &source);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn knowledgebase_resets_when_the_view_is_remounted() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Knowledgebase, &source);
        app.handle_key(key(KeyCode::Char('!')));
        app.navigate(Route::Tickets);
        app.navigate(Route::Knowledgebase);
        let ActiveView::Knowledgebase(kb) = app.view() else {
            panic!("expected knowledgebase view");
        };
        assert_eq!(kb.document().content, helpdesk_core::kb::WELCOME_CONTENT);
    }

    #[test]
    fn shell_renders_tabs_and_status_bar() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Tickets, &source);
        let text = screen(&mut app);
        assert!(text.contains("F1 Tickets"));
        assert!(text.contains("F3 Live Logs"));
        assert!(text.contains("T-101"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn shutdown_releases_the_log_subscription() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Logs, &source);
        app.shutdown();
        assert_eq!(source.live_subscribers(), 0);
    }

    fn status_text(app: &App) -> String {
        build_status_bar(app)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn italic_hint_needs_keyboard_enhancement() {
        let source = ScriptedLogSource::new();
        let mut app = app_at(Route::Knowledgebase, &source);
        let plain = status_text(&app);
        assert!(plain.contains("^B bold"));
        assert!(!plain.contains("^I"));

        app.set_keyboard_enhanced(true);
        assert!(status_text(&app).contains("^I italic"));
    }
}
