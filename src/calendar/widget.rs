use super::canvas::BufferCanvas;
use super::grid::{CalendarCell, MonthGrid};
use super::month::DAYS_IN_WEEK;
use crate::theme::{
    event_style, BASE_STYLE, CURSOR_MODIFIER, FOCUSED_EVENT_MODIFIER, OTHER_MONTH_STYLE,
    TITLE_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use time::Date;

static WEEKDAYS: [&str; DAYS_IN_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of lines taken up by the title, the weekday names, and the rule
/// beneath them
const HEADER_LINES: u16 = 3;

/// Each week takes at least this many lines: the day numbers and the rule
/// beneath them.  Days whose events don't fit get a marker instead.
const MIN_WEEK_LINES: u16 = 2;

const MIN_CELL_WIDTH: u16 = 6;

/// Width of a day label as produced by [`day_label()`]
pub(super) const DAY_LABEL_WIDTH: u16 = 4;

const ACS_HLINE: char = '─';
const ACS_VLINE: char = '│';
const ACS_PLUS: char = '┼';
const ACS_BTEE: char = '┴';

/// The full-size month grid, with the titles of each day's events written
/// inside its cell
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthView<'g, 'a> {
    grid: &'g MonthGrid<'a>,
    cursor: Date,
    focused: Option<usize>,
}

impl<'g, 'a> MonthView<'g, 'a> {
    pub(crate) fn new(grid: &'g MonthGrid<'a>, cursor: Date) -> MonthView<'g, 'a> {
        MonthView {
            grid,
            cursor,
            focused: None,
        }
    }

    /// Highlight the `i`-th event of the cursor date
    pub(crate) fn focused(mut self, i: Option<usize>) -> Self {
        self.focused = i;
        self
    }

    fn week_lines(&self, height: u16) -> u16 {
        let weeks = u16::try_from(self.grid.week_count()).unwrap_or(u16::MAX).max(1);
        (height.saturating_sub(HEADER_LINES) / weeks).max(MIN_WEEK_LINES)
    }

    fn draw_cell(
        &self,
        canvas: &mut BufferCanvas<'_>,
        y: u16,
        x: u16,
        cell: &CalendarCell<'_>,
        geom: CellGeometry,
    ) {
        canvas.mvprint(y, x, day_label(cell), day_style(cell));
        let is_cursor = cell.date == self.cursor;
        if is_cursor {
            canvas.add_modifier(y, x, DAY_LABEL_WIDTH, CURSOR_MODIFIER);
        }
        let slots = usize::from(geom.content_lines.saturating_sub(1));
        let inner = geom.width.saturating_sub(1);
        if slots == 0 {
            if !cell.events.is_empty() {
                canvas.mvprint(y, x + DAY_LABEL_WIDTH, "•", day_style(cell));
            }
            return;
        }
        let shown = if cell.events.len() > slots {
            slots - 1
        } else {
            cell.events.len()
        };
        for (i, (bound, line)) in std::iter::zip(&cell.events, (y + 1)..).take(shown).enumerate() {
            let iw = usize::from(inner);
            canvas.mvprint_clipped(
                line,
                x,
                format!("{:iw$}", bound.event.title),
                event_style(bound.event.color),
                inner,
            );
            if is_cursor && self.focused == Some(i) {
                canvas.add_modifier(line, x, inner, FOCUSED_EVENT_MODIFIER);
            }
        }
        if shown < cell.events.len() {
            let more = cell.events.len() - shown;
            let line = y + 1 + u16::try_from(shown).unwrap_or(u16::MAX);
            canvas.mvprint_clipped(line, x, format!("+{more} more"), day_style(cell), inner);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct CellGeometry {
    width: u16,
    content_lines: u16,
}

impl Widget for MonthView<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cell_width = (area.width / 7).max(MIN_CELL_WIDTH);
        let week_lines = self.week_lines(area.height);
        let geom = CellGeometry {
            width: cell_width,
            content_lines: week_lines - 1,
        };
        let mut canvas = BufferCanvas::new(area, buf);
        let total_width = cell_width * 7;

        let title = self.grid.month().to_string();
        let title_width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        canvas.mvprint(
            0,
            total_width.saturating_sub(title_width) / 2,
            title,
            TITLE_STYLE,
        );
        for (x, name) in std::iter::zip((0..).step_by(cell_width.into()), WEEKDAYS) {
            canvas.mvprint(1, x + 1, name, WEEKDAY_STYLE);
        }
        canvas.hline(2, 0, ACS_HLINE, total_width, BASE_STYLE);

        let last_week = self.grid.week_count().saturating_sub(1);
        for (w, week) in self.grid.weeks().enumerate() {
            let w16 = u16::try_from(w).unwrap_or(u16::MAX);
            let y = HEADER_LINES.saturating_add(w16.saturating_mul(week_lines));
            for (col, cell) in std::iter::zip(0u16.., week) {
                let x = col * cell_width;
                self.draw_cell(&mut canvas, y, x, cell, geom);
                if usize::from(col) + 1 < DAYS_IN_WEEK {
                    let bar = x + cell_width - 1;
                    for line in y..(y + geom.content_lines) {
                        canvas.mvprint(line, bar, ACS_VLINE.to_string(), BASE_STYLE);
                    }
                }
            }
            let rule_y = y + geom.content_lines;
            canvas.hline(rule_y, 0, ACS_HLINE, total_width, BASE_STYLE);
            let tee = if w == last_week { ACS_BTEE } else { ACS_PLUS };
            for col in 1..7 {
                canvas.mvprint(rule_y, col * cell_width - 1, tee.to_string(), BASE_STYLE);
            }
        }
    }
}

/// The day of the month padded to [`DAY_LABEL_WIDTH`] columns, bracketed if
/// it is today
pub(super) fn day_label(cell: &CalendarCell<'_>) -> String {
    if cell.is_today {
        format!("[{:2}]", cell.date.day())
    } else {
        format!(" {:2} ", cell.date.day())
    }
}

pub(super) fn day_style(cell: &CalendarCell<'_>) -> Style {
    if cell.is_today {
        TODAY_STYLE
    } else if cell.is_current_month {
        BASE_STYLE
    } else {
        OTHER_MONTH_STYLE
    }
}
