use super::canvas::BufferCanvas;
use super::grid::MonthGrid;
use super::widget::{day_label, day_style, DAY_LABEL_WIDTH};
use crate::theme::{CURSOR_MODIFIER, TITLE_STYLE, WEEKDAY_STYLE};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use time::Date;

static HEADER: &str = " Su   Mo   Tu   We   Th   Fr   Sa ";

/// Columns per day: the day label plus one for the event marker
const DAY_WIDTH: u16 = DAY_LABEL_WIDTH + 1;

/// Number of lines taken up by the title and the weekday names
const HEADER_LINES: u16 = 2;

const EVENT_MARKER: &str = "•";

/// A compact month grid with one line per week, marking days that have events
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MiniMonth<'g, 'a> {
    grid: &'g MonthGrid<'a>,
    cursor: Date,
}

impl<'g, 'a> MiniMonth<'g, 'a> {
    /// Width of the widget in columns
    pub(crate) const WIDTH: u16 = DAY_WIDTH * 7;

    pub(crate) fn new(grid: &'g MonthGrid<'a>, cursor: Date) -> MiniMonth<'g, 'a> {
        MiniMonth { grid, cursor }
    }

    /// Number of lines the widget needs to draw every week
    pub(crate) fn height(&self) -> u16 {
        HEADER_LINES + u16::try_from(self.grid.week_count()).unwrap_or(u16::MAX)
    }
}

impl Widget for MiniMonth<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut canvas = BufferCanvas::new(area, buf);
        let title = self.grid.month().to_string();
        let title_width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        canvas.mvprint(0, Self::WIDTH.saturating_sub(title_width) / 2, title, TITLE_STYLE);
        canvas.mvprint(1, 0, HEADER, WEEKDAY_STYLE);
        for (y, week) in std::iter::zip(HEADER_LINES.., self.grid.weeks()) {
            for (x, cell) in std::iter::zip((0..).step_by(DAY_WIDTH.into()), week) {
                canvas.mvprint(y, x, day_label(cell), day_style(cell));
                if cell.date == self.cursor {
                    canvas.add_modifier(y, x, DAY_LABEL_WIDTH, CURSOR_MODIFIER);
                }
                if !cell.events.is_empty() {
                    canvas.mvprint(y, x + DAY_LABEL_WIDTH, EVENT_MARKER, day_style(cell));
                }
            }
        }
    }
}
