// src/ui.rs
use crate::app::{App, FocusedPanel};
use crate::playback::PlaybackStatus;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
};
use std::rc::Rc;

pub struct LayoutChunks {
    pub search_chunk: Rect,
    pub categories_chunk: Rect,
    pub list_chunk: Rect,
    pub details_chunk: Rect,
    pub player_chunk: Rect,
    pub hint_chunk: Rect,
}

pub fn compute_layout(frame_size: Rect) -> LayoutChunks {
    let main_chunks: Rc<[Rect]> = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search field
            Constraint::Length(3), // Category chips
            Constraint::Min(0),    // List + details
            Constraint::Length(3), // Player bar
            Constraint::Length(1), // Hint bar
        ])
        .split(frame_size);

    let content_columns: Rc<[Rect]> = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[2]);

    LayoutChunks {
        search_chunk: main_chunks[0],
        categories_chunk: main_chunks[1],
        list_chunk: content_columns[0],
        details_chunk: content_columns[1],
        player_chunk: main_chunks[3],
        hint_chunk: main_chunks[4],
    }
}

/// Marker shown in front of a list entry, derived from the controller state
/// so no list item carries its own playing flag.
fn playback_marker(app: &App, entry: &crate::podcast::PodcastEntry) -> &'static str {
    let key = entry.key();
    if app.player.is_playing(&key) {
        "▶ "
    } else if app.player.is_paused(&key) {
        "⏸ "
    } else if app.player.is_active(&key) {
        "… " // Preparing
    } else {
        "  "
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let layout_chunks: LayoutChunks = compute_layout(f.size());

    // === Define Styles ===
    let default_style: Style = Style::default().fg(Color::White);
    let focused_style: Style = Style::default().fg(Color::Cyan);
    let selected_item_style: Style =
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let unfocused_selected_item_style: Style = Style::default().fg(Color::LightCyan);

    // ================================= Search Field ==============================
    let is_search_focused: bool = app.focused_panel == FocusedPanel::Search;
    let search_text: String = if is_search_focused {
        format!("{}█", app.criteria.query)
    } else {
        app.criteria.query.clone()
    };
    let search_widget: Paragraph = Paragraph::new(search_text).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(if is_search_focused { focused_style } else { default_style }),
    );
    f.render_widget(search_widget, layout_chunks.search_chunk);

    // =============================== Category Chips ==============================
    let is_categories_focused: bool = app.focused_panel == FocusedPanel::Categories;
    let category_titles: Vec<String> = app.categories.clone();
    let categories_widget: Tabs = Tabs::new(category_titles)
        .select(app.selected_category_index)
        .style(default_style)
        .highlight_style(selected_item_style)
        .block(
            Block::default()
                .title("Categories")
                .borders(Borders::ALL)
                .border_style(if is_categories_focused { focused_style } else { default_style }),
        );
    f.render_widget(categories_widget, layout_chunks.categories_chunk);

    // ================================ Podcasts List ===============================
    let is_list_focused: bool = app.focused_panel == FocusedPanel::Podcasts;
    let list_items: Vec<ListItem> = if app.visible.is_empty() {
        vec![ListItem::new("No podcasts match the current filter").style(default_style)]
    } else {
        app.visible
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let label = format!("{}{}", playback_marker(app, entry), entry.title());
                let mut item: ListItem = ListItem::new(label);
                if Some(i) == app.selected_index {
                    item = item.style(if is_list_focused {
                        selected_item_style
                    } else {
                        unfocused_selected_item_style
                    });
                } else {
                    item = item.style(default_style);
                }
                item
            })
            .collect()
    };
    let list_widget: List = List::new(list_items)
        .block(
            Block::default()
                .title(format!("Podcasts ({})", app.visible.len()))
                .borders(Borders::ALL)
                .border_style(if is_list_focused { focused_style } else { default_style }),
        )
        .highlight_symbol(if is_list_focused { ">> " } else { "   " });
    f.render_widget(list_widget, layout_chunks.list_chunk);

    // ================================ Details Panel ===============================
    let (details_title, details_text): (String, String) = match app.selected_entry() {
        Some(entry) => (
            format!("Details: {}", entry.title()),
            format!(
                "{}\n\nCategory: {}\nWebsite : {}\nArtwork : {}\nAudio   : {}",
                entry.description(),
                entry.category(),
                entry.website_url(),
                entry.image_url(),
                entry.audio_url(),
            ),
        ),
        None => ("Details".to_string(), "Select a podcast to see details.".to_string()),
    };
    let details_widget: Paragraph = Paragraph::new(details_text)
        .wrap(Wrap { trim: true })
        .style(default_style)
        .block(Block::default().title(details_title).borders(Borders::ALL).border_style(default_style));
    f.render_widget(details_widget, layout_chunks.details_chunk);

    // ================================= Player Bar =================================
    let now_playing = app
        .player
        .active_key()
        .and_then(|key| app.catalog.get(key))
        .map(|entry| entry.title().to_string());
    let (player_title, player_text, player_color): (&str, String, Color) =
        match (&app.status_line, app.player.status(), now_playing) {
            (Some(message), _, _) => ("Playback Error", message.clone(), Color::Red),
            (None, PlaybackStatus::Playing, Some(title)) => {
                ("Now Playing", format!("▶ {}", title), Color::Green)
            }
            (None, PlaybackStatus::Paused, Some(title)) => {
                ("Paused", format!("⏸ {}", title), Color::Yellow)
            }
            (None, PlaybackStatus::Preparing, Some(title)) => {
                ("Preparing", format!("… {}", title), Color::Yellow)
            }
            _ => ("Not Playing", " ".to_string(), Color::Green),
        };
    let player_widget: Paragraph = Paragraph::new(player_text).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(player_title)
            .borders(Borders::ALL)
            .style(Style::default().fg(player_color)),
    );
    f.render_widget(player_widget, layout_chunks.player_chunk);

    // =============================== Hint Bar Panel ===============================
    let hint_text: &str = "[/] Search | [←/→] Category | [↑/↓] Select | [Enter] Play/Stop | [Space] Pause/Resume | [O] Website | [Q] Quit";
    let hint_widget: Paragraph = Paragraph::new(hint_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(hint_widget, layout_chunks.hint_chunk);
}
