use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Widget},
};

use crate::util::colors;

pub struct Sidebar<'a> {
    items: Vec<&'a str>,
    selected_index: Option<usize>,
    locked: Vec<bool>,
}

impl<'a> Sidebar<'a> {
    pub fn new(items: Vec<&'a str>, selected_index: Option<usize>) -> Self {
        let locked = vec![false; items.len()];
        Self {
            items,
            selected_index,
            locked,
        }
    }

    /// Dims entries that need a login.
    pub fn locked(mut self, locked: Vec<bool>) -> Self {
        self.locked = locked;
        self
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let locked = self.locked.get(i).copied().unwrap_or(false);
                let style = if Some(i) == self.selected_index {
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD)
                } else if locked {
                    Style::default()
                        .fg(colors::NEUTRAL)
                        .add_modifier(Modifier::DIM)
                } else {
                    Style::default().fg(colors::TEXT)
                };
                let marker = if locked { " ·" } else { "" };
                ListItem::new(format!("  {item}{marker}")).style(style)
            })
            .collect();

        List::new(items).render(area, buf);
    }
}
