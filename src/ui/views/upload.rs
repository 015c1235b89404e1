use std::path::PathBuf;

use async_trait::async_trait;
use directories::BaseDirs;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    catalog::Track,
    event::events::Event,
    upload::{UploadItem, UploadStatus},
    ui::{
        components::{spinner::Spinner, text_input::TextInput},
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::{
        colors,
        format::{format_duration, format_file_size, truncate},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Pane {
    #[default]
    Staged,
    Uploaded,
}

/// Admin surface: stage local files and push them to the upload API.
#[derive(Default)]
pub struct Upload {
    path: TextInput,
    is_editing: bool,
    pane: Pane,
    staged: ListState,
    uploaded: ListState,
}

impl Upload {
    fn stage(&mut self, ctx: &AppContext) -> Action {
        let paths = parse_paths(self.path.value());
        self.path.clear();
        self.is_editing = false;

        if paths.is_empty() {
            return Action::None;
        }

        let staged = ctx.uploads.stage_files(paths).len();
        if staged == 0 {
            Action::Notify("No new audio files found".to_string())
        } else {
            self.pane = Pane::Staged;
            Action::Notify(format!("Staged {staged} file(s)"))
        }
    }

    fn start_upload(&self, ctx: &AppContext) -> Action {
        if ctx.uploads.is_uploading() {
            return Action::Notify("Upload already in progress".to_string());
        }
        if !ctx.uploads.can_upload() {
            return Action::Notify("No files ready to upload".to_string());
        }

        let queue = ctx.uploads.clone();
        tokio::spawn(async move {
            queue.upload_all().await;
        });
        Action::None
    }

    fn list_state(&mut self) -> &mut ListState {
        match self.pane {
            Pane::Staged => &mut self.staged,
            Pane::Uploaded => &mut self.uploaded,
        }
    }

    fn move_selection(&mut self, len: usize, forward: bool) {
        let state = self.list_state();
        if len == 0 {
            state.select(None);
            return;
        }
        let next = match (state.selected(), forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        state.select(Some(next));
    }

    fn render_staged(&mut self, f: &mut Frame, area: Rect, items: &[UploadItem]) {
        let block = pane_block(" Selected files ", self.pane == Pane::Staged && !self.is_editing);

        if items.is_empty() {
            let empty = Paragraph::new("No files selected. Press 'a' and enter a file or folder path.")
                .style(Style::default().fg(colors::NEUTRAL))
                .centered()
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        clamp(&mut self.staged, items.len());
        let name_width = (area.width as usize).saturating_sub(40).max(10);

        let rows: Vec<ListItem> = items
            .iter()
            .map(|item| {
                let duration = item
                    .metadata
                    .as_ref()
                    .map(|m| format_duration(std::time::Duration::from_secs(m.duration)))
                    .unwrap_or_else(|| "…".to_string());

                let mut line = Line::from(vec![
                    Span::raw(format!(
                        "{:<w$}",
                        truncate(&item.name, name_width),
                        w = name_width
                    )),
                    Span::styled(
                        format!("  {:>9}  {:>5}  ", format_file_size(item.size), duration),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                ]);
                line.push_span(status_span(item));

                ListItem::new(line)
            })
            .collect();

        let list = List::new(rows)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.staged);
    }

    fn render_uploaded(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let uploaded = ctx.uploads.uploaded();
        let block = pane_block(" Uploaded ", self.pane == Pane::Uploaded && !self.is_editing);

        if uploaded.is_empty() {
            let empty = Paragraph::new("Nothing uploaded yet")
                .style(Style::default().fg(colors::NEUTRAL))
                .centered()
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        clamp(&mut self.uploaded, uploaded.len());
        let current_id = ctx.player.current_track().map(|t| t.id);

        let rows: Vec<ListItem> = uploaded
            .iter()
            .map(|track| {
                let marker = if current_id.as_deref() == Some(track.id.as_str()) {
                    "♪ "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{} - {}", track.title, track.artist))
            })
            .collect();

        let list = List::new(rows)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.uploaded);
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { colors::PRIMARY } else { colors::NEUTRAL };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

fn clamp(state: &mut ListState, len: usize) {
    match state.selected() {
        None => state.select(Some(0)),
        Some(i) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

fn status_span(item: &UploadItem) -> Span<'static> {
    match item.status {
        UploadStatus::Pending if item.metadata.is_none() => {
            Span::styled("reading…", Style::default().fg(colors::NEUTRAL))
        }
        UploadStatus::Pending => Span::styled(item.status.label(), Style::default().fg(colors::TEXT)),
        UploadStatus::Uploading => {
            let filled = (item.progress as usize) / 10;
            Span::styled(
                format!("{}{} {:>3}%", "█".repeat(filled), "░".repeat(10 - filled), item.progress),
                Style::default().fg(colors::PRIMARY),
            )
        }
        UploadStatus::Completed => Span::styled(item.status.label(), Style::default().fg(colors::SUCCESS)),
        UploadStatus::Error => Span::styled(
            item.error.clone().unwrap_or_else(|| item.status.label().to_string()),
            Style::default().fg(colors::ERROR),
        ),
    }
}

/// Splits path input into paths. Quoted segments (as terminals produce when
/// files are dropped on them) each become one path; otherwise the whole
/// input is a single path. A leading `~` expands to the home directory.
fn parse_paths(input: &str) -> Vec<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    let raw: Vec<String> = if input.starts_with('\'') || input.starts_with('"') {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;
        for c in input.chars() {
            match quote {
                Some(q) if c == q => {
                    parts.push(std::mem::take(&mut current));
                    quote = None;
                }
                Some(_) => current.push(c),
                None if c == '\'' || c == '"' => quote = Some(c),
                None => {}
            }
        }
        parts
    } else {
        vec![input.replace("\\ ", " ")]
    };

    raw.into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| expand_home(&p))
        .collect()
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), BaseDirs::new()) {
        (Some(rest), Some(dirs)) => dirs.home_dir().join(rest),
        _ => PathBuf::from(path),
    }
}

#[async_trait]
impl View for Upload {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        f.render_widget(
            self.path.widget("File or folder path (a)", self.is_editing),
            chunks[0],
        );

        let stats = ctx.uploads.stats();
        let stats_line = Line::from(vec![
            Span::styled(format!(" uploaded {}", stats.uploaded), Style::default().fg(colors::SUCCESS)),
            Span::styled(format!("  pending {}", stats.pending), Style::default().fg(colors::TEXT)),
            Span::styled(format!("  completed {}", stats.completed), Style::default().fg(colors::SUCCESS)),
            Span::styled(format!("  failed {}", stats.failed), Style::default().fg(colors::ERROR)),
        ]);
        if ctx.uploads.is_uploading() {
            let [stats_area, spinner_area] =
                Layout::horizontal([Constraint::Min(1), Constraint::Length(14)]).areas(chunks[1]);
            f.render_widget(Paragraph::new(stats_line), stats_area);
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label("Uploading"),
                spinner_area,
            );
        } else {
            f.render_widget(Paragraph::new(stats_line), chunks[1]);
        }

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(chunks[2]);

        let items = ctx.uploads.items();
        self.render_staged(f, body[0], &items);
        self.render_uploaded(f, body[1], ctx);

        let hint = Paragraph::new("a add path · u upload all · x remove · ←→ pane · Enter preview")
            .style(Style::default().fg(colors::NEUTRAL));
        f.render_widget(hint, chunks[3]);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        if self.is_editing {
            return match key.code {
                KeyCode::Enter => Some(self.stage(ctx)),
                KeyCode::Esc => {
                    self.is_editing = false;
                    Some(Action::None)
                }
                _ if self.path.handle_key(key) => Some(Action::None),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.is_editing = true;
                Some(Action::None)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.pane = Pane::Staged;
                Some(Action::None)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.pane = Pane::Uploaded;
                Some(Action::None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.pane_len(ctx);
                self.move_selection(len, true);
                Some(Action::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.pane_len(ctx);
                self.move_selection(len, false);
                Some(Action::None)
            }
            KeyCode::Char('u') => Some(self.start_upload(ctx)),
            KeyCode::Char('x') | KeyCode::Delete if self.pane == Pane::Staged => {
                let items = ctx.uploads.items();
                let item = self.staged.selected().and_then(|i| items.get(i))?;
                ctx.uploads.remove(item.id);
                Some(Action::None)
            }
            KeyCode::Enter if self.pane == Pane::Uploaded => {
                let uploaded = ctx.uploads.uploaded();
                let track = self.uploaded.selected().and_then(|i| uploaded.get(i))?;
                Some(Action::PlayTrack(Track::from(track.clone())))
            }
            _ => None,
        }
    }

    fn on_paste(&mut self, text: &str) -> bool {
        self.is_editing = true;
        self.path.insert_str(text);
        true
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        if let Event::UploadFinished(summary) = event
            && summary.completed > 0
        {
            self.uploaded.select(Some(0));
        }
    }
}

impl Upload {
    fn pane_len(&self, ctx: &AppContext) -> usize {
        match self.pane {
            Pane::Staged => ctx.uploads.items().len(),
            Pane::Uploaded => ctx.uploads.uploaded().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_input_is_one_path() {
        assert_eq!(
            parse_paths("  /music/Artist - Song.mp3 "),
            vec![PathBuf::from("/music/Artist - Song.mp3")]
        );
        assert_eq!(
            parse_paths("/music/My\\ Song.mp3"),
            vec![PathBuf::from("/music/My Song.mp3")]
        );
        assert!(parse_paths("   ").is_empty());
    }

    #[test]
    fn quoted_drops_become_separate_paths() {
        assert_eq!(
            parse_paths("'/a/one.mp3' '/b/two words.wav'"),
            vec![PathBuf::from("/a/one.mp3"), PathBuf::from("/b/two words.wav")]
        );
    }
}
