use crate::calendar::{bind, events_for_date, Agenda, MiniMonth, MonthGrid, MonthView, YearMonth};
use crate::clock::Clock;
use crate::event::{EventList, Palette};
use crate::form::{EventForm, FormInput, FormOutput, FormState};
use crate::help::Help;
use crate::theme::BASE_STYLE;
use crossterm::event::{read, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Duration};

/// Terminals at least this wide show the full month grid beside a sidebar;
/// narrower ones get the compact month and the day's agenda
const WIDE_MIN_WIDTH: u16 = 100;

const SIDEBAR_WIDTH: u16 = MiniMonth::WIDTH;

const SIDEBAR_GAP: u16 = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<C> {
    events: EventList,
    month: YearMonth,
    cursor: Date,
    // Position of the selected event among the cursor date's events
    focus: Option<usize>,
    // Last color picked in the form; new events start with it
    color: Palette,
    clock: C,
    state: AppState,
}

impl<C: Clock> App<C> {
    pub(crate) fn new(clock: C, events: EventList, month: YearMonth) -> App<C> {
        let today = clock.today();
        let cursor = if month.contains(today) {
            today
        } else {
            month.first_day()
        };
        App {
            events,
            month,
            cursor,
            focus: None,
            color: Palette::default(),
            clock,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let TermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = read()?
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Char('p') | KeyCode::PageUp => self.previous_month(),
                KeyCode::Char('n') | KeyCode::PageDown => self.next_month(),
                KeyCode::Char('0') | KeyCode::Home => self.jump_to_today(),
                KeyCode::Tab => self.cycle_focus(true),
                KeyCode::BackTab => self.cycle_focus(false),
                KeyCode::Enter => {
                    if let Some(i) = self.focus {
                        self.open_edit(i)
                    } else {
                        self.open_add();
                        true
                    }
                }
                KeyCode::Char('a') => {
                    self.open_add();
                    true
                }
                KeyCode::Char('e') => self.open_edit(self.focus.unwrap_or_default()),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Editing(form) => {
                let input = match key {
                    KeyCode::Esc => FormInput::Cancel,
                    KeyCode::Tab | KeyCode::Down => FormInput::Next,
                    KeyCode::BackTab | KeyCode::Up => FormInput::Previous,
                    KeyCode::Left => FormInput::Left,
                    KeyCode::Right => FormInput::Right,
                    KeyCode::Enter => FormInput::Enter,
                    KeyCode::Backspace => FormInput::Backspace,
                    KeyCode::Char(c) => FormInput::Char(c),
                    _ => return false,
                };
                let output = form.handle_input(input);
                self.apply_form(output)
            }
            AppState::Quitting => false,
        }
    }

    fn apply_form(&mut self, output: FormOutput) -> bool {
        match output {
            FormOutput::Ok => true,
            FormOutput::Invalid => false,
            FormOutput::Cancel => {
                self.state = AppState::Calendar;
                true
            }
            FormOutput::Submit { index, event } => {
                self.color = event.color;
                if let Some(i) = index {
                    if let Err(e) = self.events.replace(i, event) {
                        tracing::warn!(error = %e, "could not update event");
                        return false;
                    }
                } else {
                    self.events.push(event);
                }
                self.focus = None;
                self.state = AppState::Calendar;
                true
            }
            FormOutput::Delete(i) => {
                if let Err(e) = self.events.remove(i) {
                    tracing::warn!(error = %e, "could not delete event");
                    return false;
                }
                self.focus = None;
                self.state = AppState::Calendar;
                true
            }
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    // Moves the cursor, switching months if it leaves the displayed one
    fn move_cursor(&mut self, days: i64) -> bool {
        let Some(date) = self.cursor.checked_add(Duration::days(days)) else {
            return false;
        };
        let Ok(month) = YearMonth::containing(date) else {
            return false;
        };
        if month != self.month {
            tracing::debug!(%month, "cursor moved into another month");
        }
        self.cursor = date;
        self.month = month;
        self.focus = None;
        true
    }

    fn next_month(&mut self) -> bool {
        match self.month.next() {
            Ok(month) => {
                self.show_month(month);
                true
            }
            Err(_) => false,
        }
    }

    fn previous_month(&mut self) -> bool {
        match self.month.previous() {
            Ok(month) => {
                self.show_month(month);
                true
            }
            Err(_) => false,
        }
    }

    fn show_month(&mut self, month: YearMonth) {
        tracing::debug!(%month, "showing month");
        self.cursor = month.clamp_day(self.cursor);
        self.month = month;
        self.focus = None;
    }

    fn jump_to_today(&mut self) -> bool {
        let today = self.clock.today();
        match YearMonth::containing(today) {
            Ok(month) => {
                self.month = month;
                self.cursor = today;
                self.focus = None;
                true
            }
            Err(_) => false,
        }
    }

    // Steps through the cursor date's events and then back to no selection
    fn cycle_focus(&mut self, forwards: bool) -> bool {
        let qty = events_for_date(self.cursor, self.events.as_slice()).len();
        if qty == 0 {
            return false;
        }
        self.focus = match (self.focus, forwards) {
            (None, true) => Some(0),
            (Some(i), true) if i + 1 < qty => Some(i + 1),
            (Some(_), true) => None,
            (None, false) => Some(qty - 1),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        true
    }

    fn open_add(&mut self) {
        self.state = AppState::Editing(FormState::add(self.cursor, self.color));
    }

    // Opens the form on the `i`-th event of the cursor date
    fn open_edit(&mut self, i: usize) -> bool {
        match bind(self.cursor, self.events.as_slice()).nth(i) {
            Some(bound) => {
                self.state = AppState::Editing(FormState::edit(bound.index, bound.event));
                true
            }
            None => false,
        }
    }
}

impl<C: Clock> Widget for &mut App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let grid = MonthGrid::new(self.month, self.clock.today(), &self.events);
        let day_events = grid
            .cell(self.cursor)
            .map(|c| c.events.as_slice())
            .unwrap_or_default();
        let mini = MiniMonth::new(&grid, self.cursor);
        let agenda = Agenda::new(self.cursor, day_events).focused(self.focus);
        let (sidebar, main) = if area.width >= WIDE_MIN_WIDTH {
            let [sidebar, main] = Layout::horizontal([
                Constraint::Length(SIDEBAR_WIDTH),
                Constraint::Fill(1),
            ])
            .spacing(SIDEBAR_GAP)
            .areas(area);
            (sidebar, Some(main))
        } else {
            (area, None)
        };
        let [mini_area, agenda_area] = Layout::vertical([
            Constraint::Length(mini.height() + 1),
            Constraint::Fill(1),
        ])
        .areas(sidebar);
        mini.render(mini_area, buf);
        agenda.render(agenda_area, buf);
        if let Some(main) = main {
            MonthView::new(&grid, self.cursor)
                .focused(self.focus)
                .render(main, buf);
        }
        match &mut self.state {
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::Editing(form) => EventForm.render(area, buf, form),
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Editing(FormState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::buffer_lines;
    use crate::clock::FixedClock;
    use crate::event::{tests::event, Event};
    use time::macros::date;

    fn app_with(events: Vec<Event>) -> App<FixedClock> {
        let today = date!(2024 - 02 - 14);
        App::new(
            FixedClock(today),
            EventList::new(events),
            YearMonth::containing(today).unwrap(),
        )
    }

    fn type_keys(app: &mut App<FixedClock>, s: &str) {
        for c in s.chars() {
            assert!(app.handle_key(KeyCode::Char(c)), "key {c:?} rejected");
        }
    }

    fn titles(app: &App<FixedClock>) -> Vec<&str> {
        app.events
            .as_slice()
            .iter()
            .map(|ev| ev.title.as_str())
            .collect()
    }

    #[test]
    fn test_wide_layout() {
        let mut app = app_with(vec![event("Lunch", date!(2024 - 02 - 14))]);
        let area = Rect::new(0, 0, 110, 30);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert!(lines[0].matches("February 2024").count() == 2, "{:?}", lines[0]);
        assert!(lines[1].starts_with(" Su   Mo "), "{:?}", lines[1]);
        assert!(lines[1].contains(" Sun "), "{:?}", lines[1]);
        // The sidebar's month is five weeks tall, followed by a blank line
        assert!(
            lines[8].starts_with("Wednesday, 14 February 2024"),
            "{:?}",
            lines[8]
        );
        assert!(lines[10].starts_with("■ 09:00 Lunch"), "{:?}", lines[10]);
        assert!(lines.iter().any(|ln| ln.contains("│Lunch ")));
    }

    #[test]
    fn test_narrow_layout() {
        let mut app = app_with(vec![event("Lunch", date!(2024 - 02 - 14))]);
        let area = Rect::new(0, 0, 60, 20);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert!(lines[0].starts_with("           February 2024"), "{:?}", lines[0]);
        assert!(!lines.iter().any(|ln| ln.contains(" Sun ")));
        assert!(lines[4].contains("[14]•"), "{:?}", lines[4]);
        assert!(lines[10].starts_with("■ 09:00 Lunch"), "{:?}", lines[10]);
    }

    #[test]
    fn test_form_overlay() {
        let mut app = app_with(Vec::new());
        assert!(app.handle_key(KeyCode::Char('a')));
        let area = Rect::new(0, 0, 110, 30);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert!(lines
            .iter()
            .any(|ln| ln.contains(" Add Event on 14 Feb 2024 ")));
    }

    #[test]
    fn test_add_event() {
        let mut app = app_with(vec![event("Breakfast", date!(2024 - 02 - 14))]);
        assert!(app.handle_key(KeyCode::Right));
        assert!(app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Editing(_)));
        type_keys(&mut app, "Lunch");
        assert!(app.handle_key(KeyCode::Tab));
        type_keys(&mut app, "12:30");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(titles(&app), ["Breakfast", "Lunch"]);
        assert_eq!(
            app.events.as_slice().get(1).map(|ev| (ev.date, ev.time.as_str())),
            Some((date!(2024 - 02 - 15), "12:30"))
        );
    }

    #[test]
    fn test_add_requires_title_and_time() {
        let mut app = app_with(Vec::new());
        assert!(app.handle_key(KeyCode::Char('a')));
        type_keys(&mut app, "Lunch");
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Editing(_)));
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Calendar);
        assert!(titles(&app).is_empty());
    }

    #[test]
    fn test_color_carries_over() {
        let mut app = app_with(Vec::new());
        app.handle_key(KeyCode::Char('a'));
        type_keys(&mut app, "Lunch");
        app.handle_key(KeyCode::Tab);
        type_keys(&mut app, "12:00");
        for _ in 0..3 {
            app.handle_key(KeyCode::Tab);
        }
        assert!(app.handle_key(KeyCode::Right));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.events.as_slice().get(0).map(|ev| ev.color), Some(Palette::Green));
        app.handle_key(KeyCode::Char('a'));
        let AppState::Editing(form) = &app.state else {
            panic!("form should be open");
        };
        assert_eq!(form.color(), Palette::Green);
    }

    #[test]
    fn test_edit_in_place() {
        let mut app = app_with(vec![
            event("Breakfast", date!(2024 - 02 - 14)),
            event("Elsewhere", date!(2024 - 02 - 01)),
            event("Lunch", date!(2024 - 02 - 14)),
            event("Dinner", date!(2024 - 02 - 14)),
        ]);
        assert!(app.handle_key(KeyCode::Tab));
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.focus, Some(1));
        assert!(app.handle_key(KeyCode::Enter));
        type_keys(&mut app, " break");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(
            titles(&app),
            ["Breakfast", "Elsewhere", "Lunch break", "Dinner"]
        );
        assert_eq!(app.focus, None);
    }

    #[test]
    fn test_edit_first_event() {
        let mut app = app_with(vec![
            event("Elsewhere", date!(2024 - 02 - 01)),
            event("Breakfast", date!(2024 - 02 - 14)),
        ]);
        assert!(app.handle_key(KeyCode::Char('e')));
        let AppState::Editing(form) = &app.state else {
            panic!("form should be open");
        };
        assert_eq!(*form, FormState::edit(1, &event("Breakfast", date!(2024 - 02 - 14))));
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.handle_key(KeyCode::Right));
        assert!(!app.handle_key(KeyCode::Char('e')));
    }

    #[test]
    fn test_delete() {
        let mut app = app_with(vec![
            event("Breakfast", date!(2024 - 02 - 14)),
            event("Lunch", date!(2024 - 02 - 14)),
            event("Dinner", date!(2024 - 02 - 14)),
        ]);
        assert!(app.handle_key(KeyCode::BackTab));
        assert_eq!(app.focus, Some(2));
        assert!(app.handle_key(KeyCode::BackTab));
        assert_eq!(app.focus, Some(1));
        assert!(app.handle_key(KeyCode::Enter));
        // Up to the buttons, then left from "Update" to "Delete"
        assert!(app.handle_key(KeyCode::Up));
        assert!(app.handle_key(KeyCode::Left));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(titles(&app), ["Breakfast", "Dinner"]);
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = app_with(vec![
            event("Breakfast", date!(2024 - 02 - 14)),
            event("Lunch", date!(2024 - 02 - 14)),
        ]);
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.focus, Some(0));
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.focus, Some(1));
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.focus, None);
        assert!(app.handle_key(KeyCode::Tab));
        assert!(app.handle_key(KeyCode::Down));
        assert_eq!(app.focus, None);
        assert!(!app.handle_key(KeyCode::Tab));
    }

    #[test]
    fn test_navigation() {
        let mut app = app_with(Vec::new());
        assert_eq!(app.cursor, date!(2024 - 02 - 14));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(app.cursor, date!(2024 - 01 - 14));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.cursor, date!(2024 - 02 - 04));
        assert_eq!(app.month, YearMonth::containing(date!(2024 - 02 - 01)).unwrap());
        assert!(app.handle_key(KeyCode::Char('k')));
        assert_eq!(app.cursor, date!(2024 - 01 - 28));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert_eq!(app.cursor, date!(2024 - 02 - 01));
        assert!(app.handle_key(KeyCode::Char('h')));
        assert_eq!(app.cursor, date!(2024 - 01 - 31));
        assert!(app.handle_key(KeyCode::PageDown));
        assert_eq!(app.cursor, date!(2024 - 02 - 29));
        assert!(app.handle_key(KeyCode::PageDown));
        assert_eq!(app.cursor, date!(2024 - 03 - 29));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.cursor, date!(2024 - 02 - 14));
        assert_eq!(app.month, YearMonth::containing(date!(2024 - 02 - 14)).unwrap());
    }

    #[test]
    fn test_starting_month_without_today() {
        let app = App::new(
            FixedClock(date!(2024 - 02 - 14)),
            EventList::default(),
            YearMonth::containing(date!(2023 - 07 - 04)).unwrap(),
        );
        assert_eq!(app.cursor, date!(2023 - 07 - 01));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app_with(Vec::new());
        assert!(!app.handle_key(KeyCode::Char('z')));
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('z')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }
}
