use super::month::{iter_days_after, YearMonth, DAYS_IN_WEEK};
use crate::event::{Event, EventList};
use std::iter::once;
use time::Date;

/// Every date from the Sunday on or before the first of `month` through the
/// Saturday on or after its last day, in ascending order
pub(crate) fn grid_dates(month: YearMonth) -> Vec<Date> {
    let start = month.grid_start();
    let end = month.grid_end();
    once(start)
        .chain(iter_days_after(start))
        .take_while(|&d| d <= end)
        .collect()
}

/// An event bound to a calendar cell, together with its position in the
/// event list
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BoundEvent<'a> {
    pub(crate) index: usize,
    pub(crate) event: &'a Event,
}

/// All events falling on `date`, in list order
pub(crate) fn bind(date: Date, events: &[Event]) -> impl Iterator<Item = BoundEvent<'_>> {
    events
        .iter()
        .enumerate()
        .filter(move |(_, ev)| ev.date == date)
        .map(|(index, event)| BoundEvent { index, event })
}

pub(crate) fn events_for_date(date: Date, events: &[Event]) -> Vec<&Event> {
    bind(date, events).map(|b| b.event).collect()
}

pub(crate) fn is_today(date: Date, today: Date) -> bool {
    date == today
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarCell<'a> {
    pub(crate) date: Date,
    pub(crate) is_current_month: bool,
    pub(crate) is_today: bool,
    pub(crate) events: Vec<BoundEvent<'a>>,
}

/// The cells of one month's calendar, ready to be drawn.  Built from scratch
/// on every render; nothing here is retained between frames.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid<'a> {
    month: YearMonth,
    cells: Vec<CalendarCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    pub(crate) fn new(month: YearMonth, today: Date, events: &'a EventList) -> MonthGrid<'a> {
        let cells = grid_dates(month)
            .into_iter()
            .map(|date| CalendarCell {
                date,
                is_current_month: month.contains(date),
                is_today: is_today(date, today),
                events: bind(date, events.as_slice()).collect(),
            })
            .collect();
        MonthGrid { month, cells }
    }

    pub(crate) fn month(&self) -> YearMonth {
        self.month
    }

    pub(crate) fn weeks(&self) -> impl ExactSizeIterator<Item = &[CalendarCell<'a>]> + '_ {
        self.cells.chunks(DAYS_IN_WEEK)
    }

    pub(crate) fn week_count(&self) -> usize {
        self.cells.len() / DAYS_IN_WEEK
    }

    pub(crate) fn cell(&self, date: Date) -> Option<&CalendarCell<'a>> {
        self.cells.iter().find(|c| c.date == date)
    }
}
