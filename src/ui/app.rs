//! Main TUI application

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::app::events::{column_delta, is_key, is_quit, row_delta, AppEvent, EventHandler};
use crate::app::messages::AppMessage;
use crate::grid::HeaderRow;
use crate::store::Collection;
use crate::ui::grid::GridView;
use crate::ui::layout::AppLayout;
use crate::ui::statusbar::{build_status_line, StatusItem};
use crate::ui::theme::Theme;

/// Main TUI application
pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
    message_rx: mpsc::Receiver<AppMessage>,

    collection: Collection,
    header: HeaderRow,
    grid: GridView,

    // UI state
    theme: Theme,
    source_label: String,
    show_help: bool,
    last_loaded: Option<DateTime<Local>>,
    last_error: Option<String>,
}

impl TuiApp {
    pub fn new(
        collection: Collection,
        header: HeaderRow,
        message_rx: mpsc::Receiver<AppMessage>,
        theme: Theme,
        source_label: String,
        mouse_capture: bool,
    ) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if mouse_capture {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(100)),
            message_rx,

            collection,
            header,
            grid: GridView::new(),

            theme,
            source_label,
            show_help: false,
            last_loaded: None,
            last_error: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            // Drain fetch worker messages
            while let Ok(message) = self.message_rx.try_recv() {
                match message {
                    AppMessage::PageLoaded(page) => {
                        if self.collection.apply_fetched(page) {
                            self.last_loaded = Some(Local::now());
                            self.last_error = None;
                        }
                    }
                    AppMessage::FetchFailed { generation, error } => {
                        tracing::error!("Fetch {} failed: {}", generation, error);
                        self.last_error = Some(error);
                    }
                }
            }

            // Pick up sort broadcasts before drawing
            self.header.sync();

            // Draw UI
            self.draw()?;

            // Handle input events
            if let Some(event) = self.event_handler.next() {
                match event {
                    AppEvent::Key(key) => {
                        if self.show_help {
                            self.show_help = false;
                            continue;
                        }
                        if is_quit(&key) {
                            break;
                        }
                        self.handle_key(key);
                    }
                    AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('?') || key.code == KeyCode::F(1) {
            self.show_help = true;
            return;
        }

        if is_key(&key, KeyCode::Enter) || is_key(&key, KeyCode::Char('s')) {
            self.header.activate_selected(&mut self.collection);
            return;
        }

        if is_key(&key, KeyCode::Char('[')) {
            self.collection.prev_page();
            return;
        }
        if is_key(&key, KeyCode::Char(']')) {
            self.collection.next_page();
            return;
        }
        if is_key(&key, KeyCode::Char('r')) {
            self.collection.refresh();
            return;
        }

        if let Some(delta) = column_delta(&key) {
            self.header.select_delta(delta);
            return;
        }

        if let Some(delta) = row_delta(&key) {
            self.grid.select_delta(delta, self.collection.visible().len());
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.grid.header_hit(mouse.column, mouse.row) {
                    self.header.activate(index, &mut self.collection);
                }
            }
            MouseEventKind::ScrollUp => {
                self.grid.select_delta(-3, self.collection.visible().len());
            }
            MouseEventKind::ScrollDown => {
                self.grid.select_delta(3, self.collection.visible().len());
            }
            _ => {}
        }
    }

    fn draw(&mut self) -> Result<()> {
        let title_line = Line::from(vec![
            Span::styled(
                " datagrid-tui ",
                self.theme.header().add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.source_label.clone(), self.theme.dim()),
        ]);
        let content_title = format!(" Records ({}) ", self.collection.total());
        let status_line = self.status_line();
        let show_help = self.show_help;

        let theme = &self.theme;
        let grid = &mut self.grid;
        let header = &self.header;
        let collection = &self.collection;

        self.terminal.draw(|frame| {
            let layout = AppLayout::new(frame.area());

            // Title bar
            frame.render_widget(Paragraph::new(title_line), layout.title);

            // Grid
            let content_block = Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border())
                .title(content_title);

            let inner = content_block.inner(layout.content);
            frame.render_widget(content_block, layout.content);

            grid.render(frame, inner, header, collection, theme);

            // Status bar
            frame.render_widget(Paragraph::new(status_line), layout.status);

            // Help overlay
            if show_help {
                render_help(frame, theme);
            }
        })?;

        Ok(())
    }

    fn status_line(&self) -> Line<'static> {
        let mut items = vec![StatusItem::new("Rows", &self.collection.total().to_string())];

        if let Some((page, pages)) = self.collection.page_info() {
            items.push(StatusItem::new("Page", &format!("{}/{}", page + 1, pages)));
        }

        match self.header.active_sort() {
            Some((column, direction)) => items.push(
                StatusItem::new("Sort", &format!("{} {}", column, direction))
                    .with_style(self.theme.active_sort()),
            ),
            None => {
                items.push(StatusItem::new("Sort", "none").with_style(self.theme.dim()));
            }
        }

        if let Some(loaded) = &self.last_loaded {
            items.push(StatusItem::new(
                "Loaded",
                &loaded.format("%H:%M:%S").to_string(),
            ));
        }

        if let Some(error) = &self.last_error {
            items.push(StatusItem::new("Error", error).with_style(self.theme.error()));
        }

        items.push(StatusItem::new("", "?=help q=quit").with_style(self.theme.dim()));

        build_status_line(items, "│", self.theme.dim())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn render_help(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    let help_area = crate::ui::layout::centered(area, 48, 23);

    let help_text = vec![
        "",
        "  datagrid-tui - Keyboard Shortcuts",
        "  ─────────────────────────────────",
        "",
        "  Navigation:",
        "    ←/→, h/l      Select column",
        "    ↑/↓, j/k      Select row",
        "    PgUp/PgDn     Page rows up/down",
        "    Home/End      Go to top/bottom",
        "    [ / ]         Previous/next page",
        "",
        "  Sorting:",
        "    s, Enter      Cycle sort on the selected",
        "                  column (asc, desc, off)",
        "    Left click    Cycle sort on that header",
        "",
        "  Other:",
        "    r             Refresh",
        "    q, Ctrl-C     Quit",
        "",
        "  Press any key to close",
    ];

    let help_block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(theme.header())
        .style(theme.normal());

    let help_content = Paragraph::new(help_text.join("\n"))
        .block(help_block)
        .style(theme.normal());

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(help_content, help_area);
}
