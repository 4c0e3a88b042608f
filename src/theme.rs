use crate::event::Palette;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const OTHER_MONTH_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

pub(crate) const FOCUSED_EVENT_MODIFIER: Modifier = Modifier::REVERSED;

pub(crate) fn palette_color(p: Palette) -> Color {
    match p {
        Palette::Blue => Color::Blue,
        Palette::Green => Color::Green,
        Palette::Yellow => Color::Yellow,
        Palette::Red => Color::Red,
        Palette::Purple => Color::Magenta,
    }
}

pub(crate) fn event_style(p: Palette) -> Style {
    Style::new().fg(Color::Black).bg(palette_color(p))
}

pub(crate) mod form {
    use super::*;

    pub(crate) const LABEL_STYLE: Style = BASE_STYLE;

    pub(crate) const FOCUSED_LABEL_STYLE: Style = BASE_STYLE
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const BUTTON_STYLE: Style = BASE_STYLE;

    pub(crate) const SELECTED_BUTTON_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);
}
