use std::io::{self, Stdout};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Direction, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use term_dock::cascade::DockDelegate;
use term_dock::drop::DropPolicy;
use term_dock::layout::{
    ContentId, ContentItem, DockError, PaneId, PaneKind, PaneNode, WindowId, rect_contains,
};
use term_dock::tracing_sub::{self, LogBuffer};
use term_dock::window::{DockManager, FloatingWindow, WindowKind};

#[derive(Parser, Debug)]
#[command(
    name = "term-dock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive docking demo: drag floating windows over each other, close and hide their content"
)]
struct DemoCli {
    /// Offer document panes as drop targets to dragged document windows.
    #[arg(long = "dock-documents")]
    dock_documents: bool,

    /// How long to wait for input each frame, in milliseconds.
    #[arg(short = 't', long = "tick", value_name = "MILLIS", default_value_t = 33)]
    tick_ms: u64,

    /// Log per-item cascade steps and drop-area enumeration too.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> io::Result<()> {
    let args = DemoCli::parse();
    let log = tracing_sub::install_log_buffer(LogBuffer::new());
    tracing_sub::init(if args.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::DEBUG
    });
    let mut app = DemoApp::new(&args, log).map_err(io::Error::other)?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = run_demo(&mut terminal, &mut app, Duration::from_millis(args.tick_ms));

    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;
    result
}

type DemoTerminal = Terminal<CrosstermBackend<Stdout>>;

struct HeaderDrag {
    window: WindowId,
    grab_dx: u16,
}

/// Logs the engine's terminal notifications into the status line.
struct ShellDelegate;

impl DockDelegate<String> for ShellDelegate {
    fn document_closed(&mut self, item: ContentItem<String>) {
        tracing::info!(title = item.title(), "document closed");
    }

    fn anchorable_closed(&mut self, item: ContentItem<String>) {
        tracing::info!(title = item.title(), "anchorable closed");
    }

    fn anchorable_hidden(&mut self, item: &ContentItem<String>) {
        tracing::info!(title = item.title(), "anchorable hidden");
    }
}

struct DemoApp {
    manager: DockManager<String>,
    delegate: ShellDelegate,
    log: LogBuffer,
    drag: Option<HeaderDrag>,
    placed: bool,
}

impl DemoApp {
    fn new(args: &DemoCli, log: LogBuffer) -> Result<Self, DockError> {
        let mut manager = DockManager::new();
        manager.set_drop_policy(DropPolicy {
            document_window_targets_document_panes: args.dock_documents,
        });

        // editor: two documents sharing one pane
        let pane = manager.alloc_pane_id();
        let mut root = PaneNode::pane(pane, PaneKind::Document);
        let notes = manager.alloc_content_id();
        root.add_item(
            pane,
            ContentItem::document(notes, "notes.md", "drafting area for release notes".to_string()),
        )?;
        let todo = manager.alloc_content_id();
        root.add_item(
            pane,
            ContentItem::document(todo, "todo.txt", "1. drag me\n2. close me".to_string()),
        )?;
        manager.open_window(WindowKind::Document, "editor", root);

        // tools: two anchorable panes; "search" cannot close, so closing the
        // window hides it and the window survives
        let outline = manager.alloc_pane_id();
        let search = manager.alloc_pane_id();
        let mut root = PaneNode::split(
            Direction::Vertical,
            vec![
                PaneNode::pane(outline, PaneKind::Anchorable),
                PaneNode::pane(search, PaneKind::Anchorable),
            ],
        );
        let outline_item = manager.alloc_content_id();
        root.add_item(
            outline,
            ContentItem::anchorable(outline_item, "outline", "symbols in scope".to_string()),
        )?;
        let search_id = manager.alloc_content_id();
        let mut search_item =
            ContentItem::anchorable(search_id, "search", "ripgrep results".to_string());
        search_item.set_can_close(false);
        root.add_item(search, search_item)?;
        manager.open_window(WindowKind::Anchorable, "tools", root);

        Ok(Self {
            manager,
            delegate: ShellDelegate,
            log,
            drag: None,
            placed: false,
        })
    }
}

fn run_demo(terminal: &mut DemoTerminal, app: &mut DemoApp, tick: Duration) -> io::Result<()> {
    loop {
        terminal.draw(|frame| draw_frame(frame, app))?;
        for id in app.manager.take_closed_windows() {
            tracing::info!(window_id = ?id, "window torn down");
        }
        if app.manager.window_ids().is_empty() {
            return Ok(());
        }
        if !event::poll(tick)? {
            continue;
        }
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, key.code, key.modifiers) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
            if !event::poll(Duration::ZERO)? {
                break;
            }
        }
    }
}

fn handle_key(app: &mut DemoApp, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('c') => {
            if let Some(&top) = app.manager.z_order().last() {
                let verdict = app.manager.request_close(top, &mut app.delegate);
                tracing::info!(window_id = ?top, ?verdict, "close requested");
            }
        }
        KeyCode::Char('h') => {
            if let Some(&top) = app.manager.z_order().last() {
                if app.manager.hide_all_content(top, &mut app.delegate) {
                    tracing::info!(window_id = ?top, "hid window content");
                } else {
                    tracing::info!(window_id = ?top, "window content cannot all hide");
                }
            }
        }
        KeyCode::Char('r') => restore_hidden(app),
        _ => {}
    }
    false
}

fn restore_hidden(app: &mut DemoApp) {
    for id in app.manager.window_ids() {
        let hidden: Vec<ContentId> = match app.manager.window(id) {
            Some(window) => window
                .root()
                .items()
                .iter()
                .filter(|item| item.is_hidden())
                .map(|item| item.id())
                .collect(),
            None => continue,
        };
        for content in hidden {
            if app.manager.restore_content(id, content).unwrap_or(false) {
                tracing::info!(content_id = ?content, "restored");
            }
        }
    }
}

fn handle_mouse(app: &mut DemoApp, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(id) = app.manager.window_at(mouse.column, mouse.row) else {
                return;
            };
            app.manager.bring_to_front(id);
            let bounds = match app.manager.window(id) {
                Some(window) => window.bounds(),
                None => return,
            };
            if rect_contains(close_hotspot(bounds), mouse.column, mouse.row) {
                let verdict = app.manager.request_close(id, &mut app.delegate);
                tracing::info!(window_id = ?id, ?verdict, "close requested");
            } else if mouse.row == bounds.y {
                app.drag = Some(HeaderDrag {
                    window: id,
                    grab_dx: mouse.column.saturating_sub(bounds.x),
                });
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(drag) = &app.drag else {
                return;
            };
            let dragging = drag.window;
            let grab_dx = drag.grab_dx;
            if let Some(window) = app.manager.window_mut(dragging) {
                let mut bounds = window.bounds();
                bounds.x = mouse.column.saturating_sub(grab_dx);
                bounds.y = mouse.row;
                window.set_bounds(bounds);
            }
            match target_under(app, mouse.column, mouse.row, dragging) {
                Some(target) => {
                    app.manager.show_overlay(target, dragging);
                }
                None => app.manager.hide_overlay(),
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(drag) = app.drag.take() else {
                return;
            };
            if let Some(target) = app.manager.overlay_target()
                && app.manager.overlay_hit_test(mouse.column, mouse.row)
            {
                let hit = app
                    .manager
                    .drop_areas(target, drag.window)
                    .iter()
                    .find(|area| rect_contains(area.surface.bounds, mouse.column, mouse.row))
                    .map(|area| (area.surface.pane, area.kind));
                if let Some((pane, kind)) = hit {
                    tracing::info!(?pane, ?kind, "would dock here");
                }
            }
            app.manager.hide_overlay();
        }
        _ => {}
    }
}

fn target_under(app: &DemoApp, column: u16, row: u16, dragging: WindowId) -> Option<WindowId> {
    app.manager
        .z_order()
        .iter()
        .rev()
        .copied()
        .filter(|id| *id != dragging)
        .find(|id| {
            app.manager
                .window(*id)
                .is_some_and(|window| rect_contains(window.bounds(), column, row))
        })
}

fn close_hotspot(bounds: Rect) -> Rect {
    if bounds.width < 6 {
        return Rect::default();
    }
    Rect {
        x: bounds.x + bounds.width - 5,
        y: bounds.y,
        width: 3,
        height: 1,
    }
}

fn draw_frame(frame: &mut Frame, app: &mut DemoApp) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }
    if !app.placed {
        place_windows(app, area);
        app.placed = true;
    }
    let body = Rect {
        height: area.height.saturating_sub(2),
        ..area
    };
    for &id in app.manager.z_order() {
        if let Some(window) = app.manager.window(id) {
            render_window(frame, window, body);
        }
    }
    if let Some(overlay) = app.manager.overlay() {
        overlay.render(frame);
    }
    render_status(frame, app, area);
}

fn place_windows(app: &mut DemoApp, area: Rect) {
    let ids = app.manager.z_order().to_vec();
    for (index, id) in ids.into_iter().enumerate() {
        let offset = index as u16;
        let bounds = Rect {
            x: (2 + offset * 12).min(area.width.saturating_sub(36)),
            y: (1 + offset * 3).min(area.height.saturating_sub(14)),
            width: 34.min(area.width),
            height: 12.min(area.height),
        };
        if let Some(window) = app.manager.window_mut(id) {
            window.set_bounds(bounds);
        }
    }
}

fn render_window(frame: &mut Frame, window: &FloatingWindow<String>, screen: Rect) {
    let bounds = window.bounds().intersection(screen);
    if bounds.width < 2 || bounds.height < 2 {
        return;
    }
    frame.render_widget(Clear, bounds);
    let kind_tag = match window.kind() {
        WindowKind::Document => "doc",
        WindowKind::Anchorable => "tool",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} [{kind_tag}] ", window.title()));
    let inner = block.inner(bounds);
    frame.render_widget(block, bounds);
    let hotspot = close_hotspot(bounds);
    if hotspot.width > 0 {
        frame
            .buffer_mut()
            .set_string(hotspot.x, hotspot.y, "[x]", Style::default().fg(Color::Red));
    }
    for (pane, _, region) in window.root().pane_regions(inner) {
        render_pane(frame, window, pane, region);
    }
}

fn render_pane(frame: &mut Frame, window: &FloatingWindow<String>, pane: PaneId, region: Rect) {
    if region.width == 0 || region.height == 0 {
        return;
    }
    let Some(pane) = window.root().pane_by_id(pane) else {
        return;
    };
    let visible = pane.visible_items();
    let hidden = pane.items().len() - visible.len();
    let mut tabs: Vec<String> = visible
        .iter()
        .map(|item| item.title().to_string())
        .collect();
    if hidden > 0 {
        tabs.push(format!("({hidden} hidden)"));
    }
    let tab_row = Rect {
        height: region.height.min(1),
        ..region
    };
    frame.render_widget(
        Paragraph::new(Line::from(tabs.join(" | ")))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        tab_row,
    );
    if region.height > 1 {
        let body = Rect {
            y: region.y + 1,
            height: region.height - 1,
            ..region
        };
        let text = visible
            .first()
            .and_then(|item| item.payload().cloned())
            .unwrap_or_default();
        frame.render_widget(Paragraph::new(text), body);
    }
}

fn render_status(frame: &mut Frame, app: &DemoApp, area: Rect) {
    if area.height < 2 {
        return;
    }
    let help = "q quit | c close top | h hide top | r restore | drag headers to dock";
    let lines = app.log.tail(1);
    let last_log = lines.first().map(String::as_str).unwrap_or("");
    let status = Rect {
        y: area.y + area.height - 2,
        height: 2,
        ..area
    };
    frame.render_widget(Clear, status);
    frame.render_widget(
        Paragraph::new(vec![Line::from(last_log.to_string()), Line::from(help)])
            .style(Style::default().fg(Color::DarkGray)),
        status,
    );
}
