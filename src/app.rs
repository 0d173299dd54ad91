// src/app.rs
use crate::catalog::Catalog;
use crate::filter::{self, FilterCriteria};
use crate::opener::UrlOpener;
use crate::playback::PlaybackController;
use crate::podcast::PodcastEntry;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::Backend};
use std::io;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FocusedPanel {
    Search,
    Categories,
    Podcasts,
}

impl Default for FocusedPanel {
    fn default() -> Self {
        FocusedPanel::Podcasts // The list is where playback happens
    }
}

pub struct App {
    pub should_quit: bool,
    pub catalog: Catalog,
    pub categories: Vec<String>,
    pub criteria: FilterCriteria,
    pub visible: Vec<PodcastEntry>,
    pub selected_index: Option<usize>,
    pub selected_category_index: usize,
    pub focused_panel: FocusedPanel,
    pub player: PlaybackController,
    pub opener: Box<dyn UrlOpener>,
    pub status_line: Option<String>,
}

impl App {
    pub fn new(
        catalog: Catalog,
        criteria: FilterCriteria,
        player: PlaybackController,
        opener: Box<dyn UrlOpener>,
    ) -> App {
        let categories = catalog.categories();
        let selected_category_index =
            categories.iter().position(|c| *c == criteria.category).unwrap_or(0);
        let mut app = App {
            should_quit: false,
            catalog,
            categories,
            criteria,
            visible: Vec::new(),
            selected_index: None,
            selected_category_index,
            focused_panel: FocusedPanel::default(),
            player,
            opener,
            status_line: None,
        };
        app.apply_filter();
        app
    }

    // ============================ Filtering ======================================

    /// Recompute the visible list from the current criteria, keeping the
    /// selection on the same entry when it survives the filter.
    pub fn apply_filter(&mut self) {
        let previously_selected = self.selected_entry().map(|e| e.key());
        self.visible = filter::apply(self.catalog.list(), &self.criteria);
        self.selected_index = match previously_selected {
            Some(key) => self
                .visible
                .iter()
                .position(|e| e.key() == key)
                .or(if self.visible.is_empty() { None } else { Some(0) }),
            None => {
                if self.visible.is_empty() {
                    None
                } else {
                    Some(0)
                }
            }
        };
    }

    pub fn push_query_char(&mut self, c: char) {
        self.criteria.query.push(c);
        self.apply_filter();
    }

    pub fn pop_query_char(&mut self) {
        self.criteria.query.pop();
        self.apply_filter();
    }

    // ====================== Category chip navigation =============================

    pub fn select_next_category(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        self.selected_category_index = (self.selected_category_index + 1) % self.categories.len();
        self.criteria.category = self.categories[self.selected_category_index].clone();
        self.apply_filter();
    }

    pub fn select_prev_category(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let len = self.categories.len();
        self.selected_category_index = (self.selected_category_index + len - 1) % len;
        self.criteria.category = self.categories[self.selected_category_index].clone();
        self.apply_filter();
    }

    // ========================= List navigation ===================================

    pub fn select_next_entry(&mut self) {
        if self.visible.is_empty() {
            self.selected_index = None;
            return;
        }
        let new_index = self.selected_index.map_or(0, |i| (i + 1) % self.visible.len());
        self.selected_index = Some(new_index);
    }

    pub fn select_prev_entry(&mut self) {
        if self.visible.is_empty() {
            self.selected_index = None;
            return;
        }
        let len = self.visible.len();
        let new_index = self.selected_index.map_or(len - 1, |i| (i + len - 1) % len);
        self.selected_index = Some(new_index);
    }

    pub fn selected_entry(&self) -> Option<&PodcastEntry> {
        self.selected_index.and_then(|i| self.visible.get(i))
    }

    // ========================= Panel focus =======================================

    pub fn focus_next_panel(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Search => FocusedPanel::Categories,
            FocusedPanel::Categories => FocusedPanel::Podcasts,
            FocusedPanel::Podcasts => FocusedPanel::Search, // Cycle back
        };
    }

    pub fn focus_prev_panel(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Search => FocusedPanel::Podcasts, // Cycle back
            FocusedPanel::Categories => FocusedPanel::Search,
            FocusedPanel::Podcasts => FocusedPanel::Categories,
        };
    }

    // ========================= Playback actions ==================================

    /// Enter on a list item: play it, or stop it when it is already active.
    pub async fn play_or_stop_selected(&mut self) {
        let Some(entry) = self.selected_entry().cloned() else {
            return;
        };
        let key = entry.key();
        if self.player.is_active(&key) {
            self.player.request_stop(&key);
            self.status_line = None;
        } else {
            self.run_playback_request(&entry, false).await;
        }
    }

    /// Space on a list item: pause/resume toggle.
    pub async fn toggle_selected(&mut self) {
        let Some(entry) = self.selected_entry().cloned() else {
            return;
        };
        self.run_playback_request(&entry, true).await;
    }

    async fn run_playback_request(&mut self, entry: &PodcastEntry, toggle: bool) {
        let result = if toggle {
            self.player.request_toggle(entry).await
        } else {
            self.player.request_play(entry).await
        };
        match result {
            Ok(()) => {
                self.status_line = None;
            }
            Err(err) => {
                // The failure was already logged by the controller; show it
                // once and reset so the user can retry.
                self.status_line = Some(err.to_string());
                self.player.take_failure();
            }
        }
    }

    pub fn open_selected_website(&mut self) {
        if let Some(entry) = self.selected_entry() {
            info!("opening website for {}", entry.title());
            self.opener.open(entry.website_url());
        }
    }

    // --- Key Handler ---
    pub async fn on_key(&mut self, key: KeyCode) {
        // 'q' quits everywhere except the search field, where it is input.
        if key == KeyCode::Char('q') && self.focused_panel != FocusedPanel::Search {
            self.should_quit = true;
            return;
        }

        match self.focused_panel {
            FocusedPanel::Search => match key {
                KeyCode::Char(c) => self.push_query_char(c),
                KeyCode::Backspace => self.pop_query_char(),
                KeyCode::Esc | KeyCode::Enter | KeyCode::Down => {
                    self.focused_panel = FocusedPanel::Podcasts
                }
                KeyCode::Tab => self.focus_next_panel(),
                KeyCode::BackTab => self.focus_prev_panel(),
                _ => {}
            },
            FocusedPanel::Categories => match key {
                KeyCode::Right => self.select_next_category(),
                KeyCode::Left => self.select_prev_category(),
                KeyCode::Down | KeyCode::Enter => self.focused_panel = FocusedPanel::Podcasts,
                KeyCode::Tab => self.focus_next_panel(),
                KeyCode::BackTab => self.focus_prev_panel(),
                _ => {}
            },
            FocusedPanel::Podcasts => match key {
                KeyCode::Down => self.select_next_entry(),
                KeyCode::Up => self.select_prev_entry(),
                KeyCode::Right => self.select_next_category(),
                KeyCode::Left => self.select_prev_category(),
                KeyCode::Enter => self.play_or_stop_selected().await,
                KeyCode::Char(' ') => self.toggle_selected().await,
                KeyCode::Char('o') => self.open_selected_website(),
                KeyCode::Char('/') => self.focused_panel = FocusedPanel::Search,
                KeyCode::Tab => self.focus_next_panel(),
                KeyCode::BackTab => self.focus_prev_panel(),
                _ => {}
            },
        }
    }

    /// Release the playback resource. Runs on every exit path; the
    /// controller's Drop impl backstops paths that never reach here.
    pub fn teardown(&mut self) {
        self.player.shutdown();
    }
}

pub async fn start_ui(mut app: App) -> Result<()> {
    // Set up the terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_loop(&mut terminal, &mut app).await;

    // Restore the terminal before anything else writes to stderr
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    app.teardown();

    if let Err(e) = res {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

pub async fn run_app_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| crate::ui::ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                app.on_key(key_event.code).await;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{BackendCall, FakeBackend};
    use crate::opener::FakeOpener;

    fn test_app() -> (App, std::sync::Arc<std::sync::Mutex<Vec<BackendCall>>>) {
        let (backend, calls) = FakeBackend::new();
        let app = App::new(
            Catalog::builtin(),
            FilterCriteria::default(),
            PlaybackController::new(Box::new(backend)),
            Box::new(FakeOpener::default()),
        );
        (app, calls)
    }

    #[tokio::test]
    async fn test_typing_in_search_filters_list() {
        let (mut app, _calls) = test_app();
        app.focused_panel = FocusedPanel::Search;

        for c in "daily".chars() {
            app.on_key(KeyCode::Char(c)).await;
        }

        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.visible[0].title(), "The Daily");
        assert_eq!(app.selected_index, Some(0));
    }

    #[tokio::test]
    async fn test_q_in_search_is_input_not_quit() {
        let (mut app, _calls) = test_app();
        app.focused_panel = FocusedPanel::Search;

        app.on_key(KeyCode::Char('q')).await;

        assert!(!app.should_quit);
        assert_eq!(app.criteria.query, "q");
    }

    #[tokio::test]
    async fn test_category_cycling_updates_criteria_and_list() {
        let (mut app, _calls) = test_app();

        // "All" -> "News"
        app.select_next_category();
        assert_eq!(app.criteria.category, "News");
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.visible[0].title(), "The Daily");

        // Back to "All"
        app.select_prev_category();
        assert_eq!(app.criteria.category, "All");
        assert_eq!(app.visible.len(), app.catalog.list().len());
    }

    #[tokio::test]
    async fn test_selection_follows_entry_across_filters() {
        let (mut app, _calls) = test_app();
        // Select "Planet Money" (index 3 in the full list)
        app.selected_index = Some(3);

        for c in "money".chars() {
            app.push_query_char(c);
        }

        assert_eq!(app.selected_entry().map(|e| e.title()), Some("Planet Money"));
        assert_eq!(app.selected_index, Some(0));
    }

    #[tokio::test]
    async fn test_enter_plays_then_stops_selected() {
        let (mut app, calls) = test_app();
        app.selected_index = Some(0);

        app.on_key(KeyCode::Enter).await;
        let key = app.visible[0].key();
        assert!(app.player.is_playing(&key));

        app.on_key(KeyCode::Enter).await;
        assert!(!app.player.is_active(&key));
        assert_eq!(calls.lock().unwrap().last(), Some(&BackendCall::Stop));
    }

    #[tokio::test]
    async fn test_space_pauses_and_resumes() {
        let (mut app, _calls) = test_app();
        app.selected_index = Some(1);
        let key = app.visible[1].key();

        app.on_key(KeyCode::Char(' ')).await;
        assert!(app.player.is_playing(&key));

        app.on_key(KeyCode::Char(' ')).await;
        assert!(app.player.is_paused(&key));

        app.on_key(KeyCode::Char(' ')).await;
        assert!(app.player.is_playing(&key));
    }

    #[tokio::test]
    async fn test_playback_failure_surfaces_in_status_line() {
        let (mut backend, _calls) = FakeBackend::new();
        backend.fail_prepare = Some(crate::errors::PlayerError::SourceUnavailable(
            "connection refused".to_string(),
        ));
        let mut app = App::new(
            Catalog::builtin(),
            FilterCriteria::default(),
            PlaybackController::new(Box::new(backend)),
            Box::new(FakeOpener::default()),
        );
        app.selected_index = Some(0);

        app.on_key(KeyCode::Enter).await;

        assert!(app.status_line.as_deref().unwrap_or("").contains("unavailable"));
        // Failure already acknowledged; the user can retry immediately.
        assert_eq!(app.player.status(), &crate::playback::PlaybackStatus::Idle);
    }

    #[tokio::test]
    async fn test_o_opens_selected_website() {
        let (backend, _calls) = FakeBackend::new();
        let opener = FakeOpener::default();
        let opened = opener.opened.clone();
        let mut app = App::new(
            Catalog::builtin(),
            FilterCriteria::default(),
            PlaybackController::new(Box::new(backend)),
            Box::new(opener),
        );
        app.selected_index = Some(3);

        app.on_key(KeyCode::Char('o')).await;

        assert_eq!(*opened.lock().unwrap(), vec!["https://www.npr.org/sections/money/".to_string()]);
    }

    #[tokio::test]
    async fn test_teardown_stops_and_releases_while_playing() {
        let (mut app, calls) = test_app();
        app.selected_index = Some(0);
        app.on_key(KeyCode::Enter).await;

        app.teardown();

        let log = calls.lock().unwrap();
        assert_eq!(log[log.len() - 2..], [BackendCall::Stop, BackendCall::Release]);
        assert_eq!(log.iter().filter(|c| **c == BackendCall::Release).count(), 1);
    }

    #[tokio::test]
    async fn test_empty_filter_result_clears_selection() {
        let (mut app, _calls) = test_app();
        for c in "zzzz".chars() {
            app.push_query_char(c);
        }
        assert!(app.visible.is_empty());
        assert_eq!(app.selected_index, None);

        // Playback requests on an empty list are no-ops.
        app.on_key(KeyCode::Enter).await;
        assert_eq!(app.player.active_key(), None);
    }
}
