use std::fmt;
use std::iter::successors;
use thiserror::Error;
use time::{Date, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

/// A calendar month of a specific year, used as the reference month of the
/// grid.
///
/// Only months whose full grid (padded out to whole Sunday-to-Saturday weeks)
/// lies within the range of [`Date`] can be constructed, so computing the
/// grid of a `YearMonth` never runs off the end of time.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub(crate) fn new(year: i32, month: Month) -> Result<YearMonth, OutOfRangeError> {
        let first = Date::from_calendar_date(year, month, 1).map_err(|_| OutOfRangeError)?;
        let last = last_day_of_month(first);
        let before = usize::from(first.weekday().index0());
        let after = DAYS_IN_WEEK - 1 - usize::from(last.weekday().index0());
        if iter_days_before(first).take(before).count() < before
            || iter_days_after(last).take(after).count() < after
        {
            return Err(OutOfRangeError);
        }
        Ok(YearMonth { year, month })
    }

    pub(crate) fn containing(date: Date) -> Result<YearMonth, OutOfRangeError> {
        YearMonth::new(date.year(), date.month())
    }

    pub(crate) fn first_day(&self) -> Date {
        // Validated on construction
        Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN)
    }

    pub(crate) fn last_day(&self) -> Date {
        last_day_of_month(self.first_day())
    }

    /// The Sunday on or before the first day of the month
    pub(crate) fn grid_start(&self) -> Date {
        let first = self.first_day();
        iter_days_before(first)
            .take(first.weekday().index0().into())
            .last()
            .unwrap_or(first)
    }

    /// The Saturday on or after the last day of the month
    pub(crate) fn grid_end(&self) -> Date {
        let last = self.last_day();
        iter_days_after(last)
            .take(DAYS_IN_WEEK - 1 - usize::from(last.weekday().index0()))
            .last()
            .unwrap_or(last)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub(crate) fn next(&self) -> Result<YearMonth, OutOfRangeError> {
        let year = if self.month == Month::December {
            self.year.checked_add(1).ok_or(OutOfRangeError)?
        } else {
            self.year
        };
        YearMonth::new(year, self.month.next())
    }

    pub(crate) fn previous(&self) -> Result<YearMonth, OutOfRangeError> {
        let year = if self.month == Month::January {
            self.year.checked_sub(1).ok_or(OutOfRangeError)?
        } else {
            self.year
        };
        YearMonth::new(year, self.month.previous())
    }

    /// The date in this month with the same day-of-month as `date`, clamped
    /// to the month's length
    pub(crate) fn clamp_day(&self, date: Date) -> Date {
        let last = self.last_day();
        Date::from_calendar_date(self.year, self.month, date.day().min(last.day())).unwrap_or(last)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("date is outside the supported range")]
pub(crate) struct OutOfRangeError;

fn last_day_of_month(first: Date) -> Date {
    iter_days_after(first)
        .take_while(|d| d.month() == first.month())
        .last()
        .unwrap_or(first)
}

pub(crate) fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

pub(crate) fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}
