use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::bible::{BibleClient, FetchError, Passage, Verse};
use crate::commands::Command;
use crate::config::Config;
use crate::favorites::{AddOutcome, FavoritesStore, RemoveOutcome};
use crate::render::{self, VerseColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Input,
    Scroll,
}

/// Per-run state the commands read and change. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub last_verse: Option<Verse>,
    pub show_references: bool,
    pub active_color: Option<VerseColor>,
}

pub type FetchTask = JoinHandle<Result<Passage, FetchError>>;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusMode,
    pub session: Session,

    // Input line
    pub input: String,
    pub cursor: usize, // in chars, not bytes

    // Output pane
    pub output: Text<'static>,
    pub output_scroll: u16,
    pub output_height: u16,
    pub output_width: u16,
    pub output_area: Option<Rect>,

    // Lookup in flight
    pub fetch_task: Option<FetchTask>,
    pub pending_query: Option<String>,
    pub animation_frame: u8,

    favorites: FavoritesStore,
    client: BibleClient,
    wrap_width: usize,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl App {
    pub fn new(config: &Config) -> Self {
        let favorites = FavoritesStore::new(config.favorites_path());
        info!(
            favorites = %favorites.path().display(),
            api = config.api_base_url(),
            "starting terminal bible"
        );

        Self {
            should_quit: false,
            focus: FocusMode::Input,
            session: Session::default(),

            input: String::new(),
            cursor: 0,

            output: render::home_page(),
            output_scroll: 0,
            output_height: 0,
            output_width: 0,
            output_area: None,

            fetch_task: None,
            pending_query: None,
            animation_frame: 0,

            favorites,
            client: BibleClient::new(config.api_base_url()),
            wrap_width: config.wrap_width(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_task.is_some()
    }

    /// Take the input line and run it. A lookup typed while another is in
    /// flight stays in the input line so it can be sent again.
    pub fn submit(&mut self) {
        let command = Command::parse(&self.input);
        if matches!(command, Command::Lookup(_)) && self.is_loading() {
            warn!(input = %self.input, "lookup held, another is in flight");
            return;
        }

        self.input.clear();
        self.cursor = 0;
        self.dispatch(command);
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Noop => self.focus = FocusMode::Input,
            Command::Quit => self.should_quit = true,
            Command::Color { color, name } => {
                self.session.active_color = Some(color);
                self.show(render::color_confirmation(color, &name));
            }
            Command::Favorites => {
                let favorites = self.favorites.load();
                self.show(render::favorites_view(&favorites, self.wrap_width));
            }
            Command::ToggleReferences => {
                self.session.show_references = !self.session.show_references;
                let state = if self.session.show_references { "enabled" } else { "hidden" };
                self.show(render::notice(format!("Verse references {}.", state)));
            }
            Command::Help => self.show(render::help_page()),
            Command::Save => self.save_last_verse(),
            Command::Delete(reference) => self.delete_favorite(&reference),
            Command::Lookup(query) => self.start_lookup(query),
        }
    }

    fn save_last_verse(&mut self) {
        let Some(verse) = self.session.last_verse.clone() else {
            self.show(render::notice("⚠️ No verse to save. Lookup one first."));
            return;
        };

        match self.favorites.add(&verse) {
            Ok(AddOutcome::Added) => self.show(render::notice("✅ Verse saved to favorites!")),
            Ok(AddOutcome::AlreadyExists) => {
                self.show(render::notice("⚠️ Verse already in favorites."))
            }
            Err(e) => {
                error!(error = %e, "saving favorite failed");
                self.show(render::error_view(e.to_string()));
            }
        }
    }

    fn delete_favorite(&mut self, reference: &str) {
        match self.favorites.remove(reference) {
            Ok(RemoveOutcome::Removed) => {
                self.show(render::notice(format!("🗑️ Removed {} from favorites.", reference)))
            }
            Ok(RemoveOutcome::NotFound) => self.show(render::notice(format!(
                "⚠️ Could not find \"{}\" in favorites.",
                reference
            ))),
            Err(e) => {
                error!(error = %e, "removing favorite failed");
                self.show(render::error_view(e.to_string()));
            }
        }
    }

    /// Spawn the lookup; only one may be in flight.
    fn start_lookup(&mut self, query: String) {
        if self.fetch_task.is_some() {
            warn!(%query, "lookup ignored, another is in flight");
            return;
        }

        let client = self.client.clone();
        let task_query = query.clone();
        self.fetch_task = Some(tokio::spawn(async move { client.fetch(&task_query).await }));
        self.pending_query = Some(query);
        self.animation_frame = 0;
    }

    /// Apply the lookup result once its task has finished.
    pub async fn poll_fetch(&mut self) {
        if !self.fetch_task.as_ref().is_some_and(|task| task.is_finished()) {
            return;
        }
        let Some(task) = self.fetch_task.take() else {
            return;
        };
        self.pending_query = None;

        match task.await {
            Ok(result) => self.apply_lookup(result),
            Err(e) => {
                error!(error = %e, "lookup task failed");
                self.show(render::error_view(e.to_string()));
            }
        }
    }

    pub fn apply_lookup(&mut self, result: Result<Passage, FetchError>) {
        match result {
            Ok(passage) => {
                info!(reference = passage.reference(), "passage loaded");
                self.session.last_verse = Some(passage.to_verse());
                self.show(render::passage_view(
                    &passage,
                    self.session.show_references,
                    self.session.active_color,
                    self.wrap_width,
                ));
            }
            Err(e) => self.show(render::error_view(e.to_string())),
        }
    }

    fn show(&mut self, text: Text<'static>) {
        self.output = text;
        self.output_scroll = 0;
    }

    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Output scrolling

    /// Screen rows the output takes once wrapped to the pane width.
    pub fn output_rows(&self) -> u16 {
        let rows = if self.output_width == 0 {
            self.output.lines.len()
        } else {
            Paragraph::new(self.output.clone())
                .wrap(Wrap { trim: false })
                .line_count(self.output_width)
        };
        rows.min(u16::MAX as usize) as u16
    }

    fn max_scroll(&self) -> u16 {
        self.output_rows().saturating_sub(self.output_height)
    }

    /// Pull the scroll offset back in range after the pane was resized.
    pub fn clamp_scroll(&mut self) {
        self.output_scroll = self.output_scroll.min(self.max_scroll());
    }

    pub fn scroll_down(&mut self) {
        if self.output_scroll < self.max_scroll() {
            self.output_scroll = self.output_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = (self.output_height / 2).max(1);
        self.output_scroll = self.output_scroll.saturating_add(half_page).min(self.max_scroll());
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = (self.output_height / 2).max(1);
        self.output_scroll = self.output_scroll.saturating_sub(half_page);
    }

    pub fn scroll_to_top(&mut self) {
        self.output_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.output_scroll = self.max_scroll();
    }

    // Input line editing
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}
