use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, error, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::state::{cache_app_state, restore_app_state};
use crate::io::store::{FileStore, KeyValueStore};
use crate::model::{AppState, Config, grain_id_from_element};
use crate::ops::transitions::{Effect, selected_grain, set_selection_to_grain};

use super::focus::Debouncer;
use super::input;
use super::render;
use super::theme::Theme;

/// Element id of the "new grain" text input
pub const TOP_INPUT_ID: &str = "top-input";

/// Longest the event loop blocks waiting for input
const MAX_POLL: Duration = Duration::from_millis(250);

/// What currently has keyboard focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    /// Nothing in particular (e.g. after the focused row was deleted)
    Body,
    TopInput,
    /// A rendered element, addressed by id (`grain-li--<grain id>`)
    Element(String),
}

/// The kind of widget a focus target resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusContext<'a> {
    Body,
    TopInput,
    /// A grain row showing its title
    ListItem(&'a str),
    /// A grain row replaced by its edit input
    EditInput(&'a str),
}

/// Main application state
pub struct App {
    pub state: AppState,
    pub store: Box<dyn KeyValueStore>,
    pub focus: Focus,
    pub focus_scheduler: Debouncer<String>,
    /// Element ids drawn in the last frame, top to bottom
    pub rendered_ids: Vec<String>,
    /// A focus request was made after the last frame was drawn
    pub awaiting_draw: bool,
    /// Byte cursor in `state.input_value`
    pub input_cursor: usize,
    /// Byte cursor in the edit buffer title
    pub edit_cursor: usize,
    /// First visible row of the grain list
    pub list_scroll: usize,
    pub theme: Theme,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(state: AppState, store: Box<dyn KeyValueStore>, config: &Config) -> Self {
        let input_cursor = state.input_value.len();
        let edit_cursor = state.edit.as_ref().map_or(0, |e| e.title.len());
        App {
            state,
            store,
            focus: Focus::TopInput,
            focus_scheduler: Debouncer::new(Duration::from_millis(config.ui.focus_debounce_ms)),
            rendered_ids: Vec::new(),
            awaiting_draw: false,
            input_cursor,
            edit_cursor,
            list_scroll: 0,
            theme: Theme::from_config(&config.ui),
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            should_quit: false,
        }
    }

    /// Run a transition on a draft of the state and commit the result.
    /// A changed snapshot is written through to the store.
    pub fn apply<R>(&mut self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let (next, out) = self.state.produce(f);
        if next != self.state {
            self.state = next;
            cache_app_state(self.store.as_mut(), &self.state);
        }
        out
    }

    /// Hand a transition's effect to the scheduler
    pub fn schedule(&mut self, effect: Option<Effect>, now: Instant) {
        if let Some(Effect::FocusElement(id)) = effect {
            self.focus_scheduler.request(id, now);
            self.awaiting_draw = true;
        }
    }

    /// Apply a focus request whose idle window has passed. A request waits
    /// for the next frame so the rows it targets exist.
    pub fn tick(&mut self, now: Instant) {
        if self.awaiting_draw {
            return;
        }
        if let Some(id) = self.focus_scheduler.poll(now) {
            self.focus_element(&id);
        }
    }

    /// Move focus to an element by id. Returns false (and logs) when no such
    /// element was rendered.
    pub fn focus_element(&mut self, id: &str) -> bool {
        if id == TOP_INPUT_ID {
            self.focus = Focus::TopInput;
            return true;
        }
        if !self.rendered_ids.iter().any(|r| r == id) {
            error!("focus failed: {}", id);
            return false;
        }
        self.focus = Focus::Element(id.to_string());
        if let Some(len) = self.editing_element(id).map(str::len) {
            self.edit_cursor = len;
            // The edit input owns the selection while it has focus
            if let Some(grain_id) = grain_id_from_element(id) {
                self.apply(|s| set_selection_to_grain(s, grain_id));
            }
        }
        true
    }

    /// Title of the edit buffer if `element_id` is the row being edited
    fn editing_element(&self, element_id: &str) -> Option<&str> {
        let grain_id = grain_id_from_element(element_id)?;
        self.state
            .edit
            .as_ref()
            .filter(|e| e.grain_id == grain_id)
            .map(|e| e.title.as_str())
    }

    /// Resolve the focus target to the widget it lands on
    pub fn focus_context(&self) -> FocusContext<'_> {
        match &self.focus {
            Focus::Body => FocusContext::Body,
            Focus::TopInput => FocusContext::TopInput,
            Focus::Element(id) => {
                if self.editing_element(id).is_some() {
                    FocusContext::EditInput(id)
                } else {
                    FocusContext::ListItem(id)
                }
            }
        }
    }

    /// Whether focus sits in a text input (or nowhere)
    pub fn focus_in_input_or_body(&self) -> bool {
        matches!(
            self.focus_context(),
            FocusContext::Body | FocusContext::TopInput | FocusContext::EditInput(_)
        )
    }

    /// Element id of the selected grain's row
    pub fn selected_element_id(&self) -> Option<String> {
        selected_grain(&self.state).map(|g| g.element_id())
    }

    /// Write the current state (used at exit)
    pub fn save(&mut self) {
        cache_app_state(self.store.as_mut(), &self.state);
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::new(data_dir);
    let state = restore_app_state(&store);
    info!(
        "restored {} grains from {}",
        state.lookup.len(),
        store.dir().display()
    );
    let mut app = App::new(state, Box::new(store), config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    app.save();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;
        let drawn_focus = app.focus.clone();
        app.tick(Instant::now());
        if app.focus != drawn_focus {
            continue;
        }

        // Wake up in time for a pending focus move
        let timeout = app
            .focus_scheduler
            .time_until_due(Instant::now())
            .map_or(MAX_POLL, |due| due.min(MAX_POLL));

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            debug!("key {:?} focus {:?}", key, app.focus);
            input::handle_key(app, key, Instant::now());
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
