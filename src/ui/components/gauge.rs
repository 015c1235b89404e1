use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Widget},
};

/// Progress bar with a second, lighter fill for the downloaded part.
#[derive(Debug, Default, Clone)]
pub struct PlaybackGauge<'a> {
    block: Option<Block<'a>>,
    played: f64,
    buffered: f64,
    label: Option<Span<'a>>,
    played_style: Style,
    buffered_style: Style,
    remaining_style: Style,
}

impl<'a> PlaybackGauge<'a> {
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Ratios outside `[0, 1]` are clamped.
    pub fn ratios(mut self, played: f64, buffered: f64) -> Self {
        self.played = clamp_ratio(played);
        self.buffered = clamp_ratio(buffered);
        self
    }

    pub fn label<T: Into<Span<'a>>>(mut self, label: T) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn played_style(mut self, style: Style) -> Self {
        self.played_style = style;
        self
    }

    pub fn buffered_style(mut self, style: Style) -> Self {
        self.buffered_style = style;
        self
    }

    pub fn remaining_style(mut self, style: Style) -> Self {
        self.remaining_style = style;
        self
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Widget for PlaybackGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        if inner.is_empty() {
            return;
        }

        let width = inner.width as f64;
        let played_cells = (width * self.played).round() as u16;
        let buffered_cells = ((width * self.buffered).round() as u16).max(played_cells);

        for y in inner.top()..inner.bottom() {
            for offset in 0..inner.width {
                let style = if offset < played_cells {
                    self.played_style
                } else if offset < buffered_cells {
                    self.buffered_style
                } else {
                    self.remaining_style
                };
                buf[(inner.left() + offset, y)]
                    .set_symbol(" ")
                    .set_style(style);
            }
        }

        if let Some(label) = &self.label {
            let label_width = (label.width() as u16).min(inner.width);
            let x = inner.left() + (inner.width - label_width) / 2;
            let y = inner.top() + inner.height / 2;
            buf.set_span(x, y, label, label_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn fills_played_then_buffered() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        PlaybackGauge::default()
            .ratios(0.3, 0.6)
            .played_style(Style::new().bg(Color::Red))
            .buffered_style(Style::new().bg(Color::Blue))
            .remaining_style(Style::new().bg(Color::Black))
            .render(area, &mut buf);

        assert_eq!(buf[(0, 0)].bg, Color::Red);
        assert_eq!(buf[(2, 0)].bg, Color::Red);
        assert_eq!(buf[(3, 0)].bg, Color::Blue);
        assert_eq!(buf[(5, 0)].bg, Color::Blue);
        assert_eq!(buf[(6, 0)].bg, Color::Black);
    }

    #[test]
    fn out_of_range_ratios_are_clamped() {
        let gauge = PlaybackGauge::default().ratios(f64::NAN, 4.0);
        assert_eq!(gauge.played, 0.0);
        assert_eq!(gauge.buffered, 1.0);
    }
}
