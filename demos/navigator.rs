// Interactive demo: open sample models, switch the current one, close them,
// and use the per-node context menu.
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use tracing_subscriber::EnvFilter;

use tui_model_navigator::{
    ActionMenu, DomainModel, ElementKind, MemoryLog, ModelElement, NavigatorLog, NavigatorModel,
    NavigatorStyle, NavigatorView, NavigatorViewState, NodeAction, Severity, TracingLog,
    ViewAction, ViewEvent,
};

// Stand-in for a musculoskeletal model from a simulation library.
struct SampleModel {
    name: String,
    segments: &'static [&'static str],
}

impl DomainModel for SampleModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn init_system(&mut self) {
        tracing::debug!(model = %self.name, "system initialized");
    }

    fn elements(&self) -> Vec<ModelElement> {
        let bodies = self
            .segments
            .iter()
            .map(|segment| ModelElement::new(*segment, ElementKind::Body));
        let joints = self
            .segments
            .windows(2)
            .map(|pair| ModelElement::new(format!("{}_{}", pair[0], pair[1]), ElementKind::Joint));
        vec![
            ModelElement::group("Bodies").with_children(bodies),
            ModelElement::group("Joints").with_children(joints),
            ModelElement::group("Forces")
                .with_child(ModelElement::new("muscle_1", ElementKind::Force)),
            ModelElement::group("Markers")
                .with_child(ModelElement::new("marker_1", ElementKind::Marker)),
        ]
    }
}

const SAMPLES: [(&str, &[&str]); 3] = [
    ("arm26", &["ground", "humerus", "ulna", "radius"]),
    ("gait2392", &["ground", "pelvis", "femur_r", "tibia_r", "talus_r"]),
    ("leg6dof9musc", &["ground", "pelvis", "thigh", "shank", "foot"]),
];

// Messages go to tracing and to the status line.
struct StatusLog {
    memory: MemoryLog,
}

impl NavigatorLog for StatusLog {
    fn log(&self, message: &str, tag: &str, severity: Severity) {
        TracingLog.log(message, tag, severity);
        self.memory.log(message, tag, severity);
    }
}

struct App {
    navigator: NavigatorModel<SampleModel, StatusLog>,
    state: NavigatorViewState,
    status: MemoryLog,
    menu: Option<ActionMenu>,
    loaded: usize,
}

impl App {
    fn new() -> Self {
        let status = MemoryLog::new();
        let navigator = NavigatorModel::with_logger(StatusLog {
            memory: status.clone(),
        });
        Self {
            navigator,
            state: NavigatorViewState::new(),
            status,
            menu: None,
            loaded: 0,
        }
    }

    fn open_next_sample(&mut self) {
        let (name, segments) = SAMPLES[self.loaded % SAMPLES.len()];
        self.loaded += 1;
        self.navigator.load_model(SampleModel {
            name: format!("{name} #{}", self.loaded),
            segments,
        });
    }

    fn activate_selected(&mut self) {
        let selected = self.state.selected_index();
        let owner = self
            .navigator
            .node_for_index(&selected)
            .and_then(|node| node.kind().model());
        if let Some(key) = owner
            && let Err(err) = self.navigator.trigger(NodeAction::ActivateModel(key))
        {
            tracing::warn!(%err, "activation failed");
        }
    }

    fn open_menu(&mut self) {
        let mut menu = ActionMenu::new();
        self.navigator
            .actions_for(&self.state.selected_index(), &mut menu);
        self.menu = (!menu.is_empty()).then_some(menu);
    }

    fn pick_menu_entry(&mut self, position: usize) {
        let Some(menu) = self.menu.take() else {
            return;
        };
        if let Some(action) = menu.action_at(position)
            && let Err(err) = self.navigator.trigger(action)
        {
            tracing::warn!(%err, "menu action failed");
        }
    }

    // Returns false when the app should quit.
    fn handle_key(&mut self, code: KeyCode, key: event::KeyEvent) -> bool {
        if self.menu.is_some() {
            match code {
                KeyCode::Char(digit @ '1'..='9') => {
                    self.pick_menu_entry(digit as usize - '1' as usize);
                }
                _ => self.menu = None,
            }
            return true;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('o') => self.open_next_sample(),
            KeyCode::Char('r') => self.navigator.clean(),
            _ => {
                if let ViewEvent::Action(action) = self.state.handle_key(&self.navigator, key) {
                    match action {
                        ViewAction::ActivateSelected => self.activate_selected(),
                        ViewAction::CloseCurrentModel => {
                            self.navigator.close_current_model();
                        }
                        ViewAction::CloseAllModels => self.navigator.close_all_models(),
                        ViewAction::OpenContextMenu => self.open_menu(),
                        _ => {}
                    }
                }
            }
        }
        true
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render(frame: &mut Frame, app: &mut App, style: &NavigatorStyle<'_>) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

    let view = NavigatorView::new(&app.navigator, style.clone());
    frame.render_stateful_widget(view, tree_area, &mut app.state);

    let status = app.status.last().map_or_else(
        || "o: open  c: set current  x: close  X: close all  m: menu  r: reset  q: quit".to_owned(),
        |entry| format!("[{}] {}: {}", entry.severity, entry.tag, entry.message),
    );
    frame.render_widget(Paragraph::new(Line::from(status)), status_area);

    if let Some(menu) = &app.menu {
        let items: Vec<ListItem> = menu
            .entries()
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let item = ListItem::new(format!("{} {}", position + 1, entry.label));
                if entry.enabled {
                    item
                } else {
                    item.style(Style::default().fg(Color::DarkGray))
                }
            })
            .collect();
        let height = u16::try_from(items.len()).unwrap_or(u16::MAX).saturating_add(2);
        let popup = centered(tree_area, 32, height);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title("Actions")),
            popup,
        );
    }
}

fn run_app(mut terminal: DefaultTerminal, mut app: App, style: NavigatorStyle<'_>) -> io::Result<()> {
    loop {
        // Signals raised by the last key are handled before drawing.
        app.state.sync(&mut app.navigator);
        terminal.draw(|frame| render(frame, &mut app, &style))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key.code, key) {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    // NAVIGATOR_LOG=debug cargo run --example navigator --features keymap
    let Ok(filter) = EnvFilter::try_from_env("NAVIGATOR_LOG") else {
        return;
    };
    let Ok(file) = File::create("navigator.log") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn main() -> io::Result<()> {
    init_tracing();

    let mut style = NavigatorStyle::default();
    style.block_style = Style::default()
        .fg(Color::Rgb(221, 227, 235))
        .bg(Color::Rgb(24, 28, 36));
    style.border_style = Style::default().fg(Color::Rgb(92, 110, 140));
    style.line_style = Style::default().fg(Color::Rgb(86, 98, 120));
    style.current_style = Style::default()
        .fg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    style.highlight_style = Style::default()
        .fg(Color::Rgb(255, 255, 255))
        .bg(Color::Rgb(52, 66, 96))
        .add_modifier(Modifier::BOLD);
    style.title = Some(Line::from("Models"));

    let mut app = App::new();
    app.open_next_sample();

    let terminal = ratatui::init();
    let result = run_app(terminal, app, style);
    ratatui::restore();
    result
}
