use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    ui::{
        app::App,
        components::{player::PlayerWidget, sidebar::Sidebar},
        state::{NoticeLevel, Route},
    },
    util::colors,
};

const KEY_HINT: &str = "space play · n/p next/prev · H/L seek · +/- volume · s shuffle · r repeat · Tab switch · Ctrl-L logout · Ctrl-C quit";

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame, area: Rect) {
        if !self.app.has_focus {
            return;
        }

        let buf = f.buffer_mut();
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(1)])
            .split(chunks[0]);

        self.render_sidebar(f, main_chunks[0]);

        let route = self.app.router.route();
        let content_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title(format!(" {} ", route.title()));
        let content_inner = content_block.inner(main_chunks[1]);
        f.render_widget(content_block, main_chunks[1]);

        self.app
            .router
            .render(f, content_inner, &self.app.state, &self.app.ctx);

        let notice = match &self.app.state.ui.notice {
            Some(notice) => {
                let color = match notice.level {
                    NoticeLevel::Info => colors::SUCCESS,
                    NoticeLevel::Error => colors::ERROR,
                };
                Line::from(Span::styled(
                    format!(" {}", notice.text),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            }
            None => Line::from(Span::styled(
                format!(" {KEY_HINT}"),
                Style::default().fg(colors::NEUTRAL),
            )),
        };
        f.render_widget(Paragraph::new(notice), chunks[1]);

        let playback = self.app.ctx.player.snapshot();
        f.render_widget(PlayerWidget::new(&playback), chunks[2]);
    }

    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title("cloudtune")
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let [items_area, account_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

        let session = self.app.ctx.session.snapshot();
        let route = self.app.router.route();
        let titles: Vec<&str> = Route::TABS.iter().map(Route::title).collect();
        let locked = Route::TABS
            .iter()
            .map(|r| r.requires_login() && !session.logged_in)
            .collect();
        f.render_widget(
            Sidebar::new(titles, route.tab_index()).locked(locked),
            items_area,
        );

        let account = match &session.user_email {
            Some(email) if session.logged_in => vec![
                Line::from(Span::styled(" Signed in as", Style::default().fg(colors::NEUTRAL))),
                Line::from(Span::styled(format!(" {email}"), Style::default().fg(colors::TEXT))),
            ],
            _ => vec![Line::from(Span::styled(
                " Not signed in",
                Style::default().fg(colors::NEUTRAL),
            ))],
        };
        f.render_widget(Paragraph::new(account), account_area);
    }
}
