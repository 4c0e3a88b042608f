use super::grid::BoundEvent;
use crate::theme::{palette_color, BASE_STYLE, FOCUSED_EVENT_MODIFIER, OTHER_MONTH_STYLE, TITLE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

static HEADING_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[weekday], [day padding:none] [month repr:long] [year]");

const SWATCH: &str = "■ ";

/// The events of a single day, one per line with their descriptions beneath
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Agenda<'g, 'a> {
    date: Date,
    events: &'g [BoundEvent<'a>],
    focused: Option<usize>,
}

impl<'g, 'a> Agenda<'g, 'a> {
    pub(crate) fn new(date: Date, events: &'g [BoundEvent<'a>]) -> Agenda<'g, 'a> {
        Agenda {
            date,
            events,
            focused: None,
        }
    }

    pub(crate) fn focused(mut self, i: Option<usize>) -> Self {
        self.focused = i;
        self
    }

    fn to_text(&self) -> Text<'static> {
        let heading = self
            .date
            .format(&HEADING_FMT)
            .unwrap_or_else(|_| self.date.to_string());
        let mut lines = vec![Line::styled(heading, TITLE_STYLE), Line::default()];
        if self.events.is_empty() {
            lines.push(Line::styled("No events", OTHER_MONTH_STYLE));
        }
        for (i, bound) in self.events.iter().enumerate() {
            let ev = bound.event;
            let summary = if ev.duration.is_empty() {
                format!("{} {}", ev.time, ev.title)
            } else {
                format!("{} {} ({})", ev.time, ev.title, ev.duration)
            };
            let mut line = Line::from_iter([
                Span::styled(SWATCH, Style::new().fg(palette_color(ev.color))),
                Span::styled(summary, BASE_STYLE),
            ]);
            if self.focused == Some(i) {
                line = line.patch_style(Style::new().add_modifier(FOCUSED_EVENT_MODIFIER));
            }
            lines.push(line);
            if !ev.description.is_empty() {
                lines.push(Line::styled(
                    format!("  {}", ev.description),
                    OTHER_MONTH_STYLE,
                ));
            }
        }
        Text::from(lines)
    }
}

impl Widget for Agenda<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.to_text()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::super::canvas::tests::buffer_lines;
    use super::super::grid::bind;
    use super::*;
    use crate::event::tests::event;
    use time::macros::date;

    #[test]
    fn test_render() {
        let mut standup = event("Standup", date!(2024 - 02 - 14));
        standup.duration = "15m".into();
        standup.description = "Daily sync".into();
        let mut dinner = event("Dinner", date!(2024 - 02 - 14));
        dinner.time = "19:00".into();
        let events = vec![standup, event("Elsewhere", date!(2024 - 02 - 15)), dinner];
        let bound = bind(date!(2024 - 02 - 14), &events).collect::<Vec<_>>();
        let area = Rect::new(0, 0, 30, 6);
        let mut buffer = Buffer::empty(area);
        Agenda::new(date!(2024 - 02 - 14), &bound)
            .focused(Some(1))
            .render(area, &mut buffer);
        assert_eq!(
            buffer_lines(&buffer),
            [
                "Wednesday, 14 February 2024   ",
                "                              ",
                "■ 09:00 Standup (15m)         ",
                "  Daily sync                  ",
                "■ 19:00 Dinner                ",
                "                              ",
            ]
        );
        assert!(buffer
            .cell((3, 4))
            .unwrap()
            .modifier
            .contains(FOCUSED_EVENT_MODIFIER));
        assert!(!buffer
            .cell((3, 2))
            .unwrap()
            .modifier
            .contains(FOCUSED_EVENT_MODIFIER));
    }

    #[test]
    fn test_no_events() {
        let area = Rect::new(0, 0, 30, 3);
        let mut buffer = Buffer::empty(area);
        Agenda::new(date!(2024 - 03 - 01), &[]).render(area, &mut buffer);
        assert_eq!(
            buffer_lines(&buffer),
            [
                "Friday, 1 March 2024          ",
                "                              ",
                "No events                     ",
            ]
        );
    }
}
