use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Text,
    widgets::{Paragraph, Widget},
};

/// Coordinate-addressed drawing onto a region of a [`Buffer`].  All
/// coordinates are relative to the region, and anything falling outside of it
/// is clipped.
#[derive(Debug, Eq, PartialEq)]
pub(super) struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    pub(super) fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    /// Print `s` at (`y`, `x`), truncated to at most `max_width` columns and
    /// to the edge of the canvas
    pub(super) fn mvprint_clipped<S: AsRef<str>>(
        &mut self,
        y: u16,
        x: u16,
        s: S,
        style: Style,
        max_width: u16,
    ) {
        if y < self.area.height && x < self.area.width && max_width > 0 {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // canvas, though we need to be sure that the Rect passed to the
            // Paragraph is entirely within the buffer lest a panic result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width).min(max_width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    pub(super) fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        self.mvprint_clipped(y, x, s, style, u16::MAX);
    }

    pub(super) fn hline(&mut self, y: u16, x: u16, ch: char, length: u16, style: Style) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), style);
    }

    /// Add `modifier` to the style of `width` cells starting at (`y`, `x`)
    pub(super) fn add_modifier(&mut self, y: u16, x: u16, width: u16, modifier: Modifier) {
        if y < self.area.height && x < self.area.width {
            let width = (self.area.width - x).min(width);
            let style = Style::new().add_modifier(modifier);
            self.buf.set_style(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width,
                    height: 1,
                },
                style,
            );
        }
    }
}
