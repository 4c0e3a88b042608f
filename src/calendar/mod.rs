mod agenda;
mod canvas;
mod grid;
mod mini;
mod month;
mod widget;
pub(crate) use self::agenda::Agenda;
pub(crate) use self::grid::{bind, events_for_date, MonthGrid};
pub(crate) use self::mini::MiniMonth;
pub(crate) use self::month::YearMonth;
pub(crate) use self::widget::MonthView;

#[cfg(test)]
pub(crate) use self::canvas::tests::buffer_lines;
