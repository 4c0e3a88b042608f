use crate::event::{Event, Palette};
use crate::theme::{
    form::{
        BUTTON_STYLE, FOCUSED_LABEL_STYLE, LABEL_STYLE, PLACEHOLDER_STYLE, SELECTED_BUTTON_STYLE,
    },
    palette_color, BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Time};

static TITLE_DATE_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[day] [month repr:short] [year]");

static TIME_INPUT_FMT: &[BorrowedFormatItem<'_>] = format_description!("[hour padding:none]:[minute]");

static TIME_OUTPUT_FMT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

const OUTER_WIDTH: u16 = 52;
const OUTER_HEIGHT: u16 = 12;

/// Width of the field labels, including the space after the colon
const LABEL_WIDTH: usize = 13;

const CURSOR: &str = "_";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EventForm;

impl StatefulWidget for EventForm {
    type State = FormState;

    /*
     * ....................................................
     * .┌────────── Add Event on 14 Feb 2024 ───────────┐.
     * .│                                                │.
     * .│Title:       Standup_                           │.
     * .│Time:        HH:MM                              │.
     * .│Duration:    e.g. 1h                            │.
     * .│Description: Description                        │.
     * .│Color:       [blue] green  yellow  red  purple  │.
     * .│                                                │.
     * .│             [ Cancel ]  [ Add ]                │.
     * .└────────────────────────────────────────────────┘.
     * ....................................................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(state.title())
            .title_alignment(Alignment::Center)
            .style(BASE_STYLE)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text(text_area.width).render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Title,
    Time,
    Duration,
    Description,
    Color,
    Buttons,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Title => Field::Time,
            Field::Time => Field::Duration,
            Field::Duration => Field::Description,
            Field::Description => Field::Color,
            Field::Color => Field::Buttons,
            Field::Buttons => Field::Title,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Title => Field::Buttons,
            Field::Time => Field::Title,
            Field::Duration => Field::Time,
            Field::Description => Field::Duration,
            Field::Color => Field::Description,
            Field::Buttons => Field::Color,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Button {
    Cancel,
    Delete,
    Submit,
}

/// The contents of the add/edit form for a single event
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FormState {
    date: Date,
    editing: Option<usize>,
    title: String,
    time: String,
    duration: String,
    description: String,
    color: Palette,
    field: Field,
    button: Button,
}

impl FormState {
    /// A blank form for adding an event on `date`
    pub(crate) fn add(date: Date, color: Palette) -> FormState {
        FormState {
            date,
            editing: None,
            title: String::new(),
            time: String::new(),
            duration: String::new(),
            description: String::new(),
            color,
            field: Field::Title,
            button: Button::Submit,
        }
    }

    /// A form prefilled with the event at position `index` in the event list
    pub(crate) fn edit(index: usize, event: &Event) -> FormState {
        FormState {
            date: event.date,
            editing: Some(index),
            title: event.title.clone(),
            time: event.time.clone(),
            duration: event.duration.clone(),
            description: event.description.clone(),
            color: event.color,
            field: Field::Title,
            button: Button::Submit,
        }
    }

    pub(crate) fn handle_input(&mut self, input: FormInput) -> FormOutput {
        match (input, self.field) {
            (FormInput::Cancel, _) => FormOutput::Cancel,
            (FormInput::Next, _) => {
                self.field = self.field.next();
                FormOutput::Ok
            }
            (FormInput::Previous, _) => {
                self.field = self.field.previous();
                FormOutput::Ok
            }
            (FormInput::Char(c), _) => match self.text_field_mut() {
                Some(s) => {
                    s.push(c);
                    FormOutput::Ok
                }
                None => FormOutput::Invalid,
            },
            (FormInput::Backspace, _) => match self.text_field_mut().and_then(String::pop) {
                Some(_) => FormOutput::Ok,
                None => FormOutput::Invalid,
            },
            (FormInput::Left, Field::Color) => {
                self.color = self.color.previous();
                FormOutput::Ok
            }
            (FormInput::Right, Field::Color) => {
                self.color = self.color.next();
                FormOutput::Ok
            }
            (FormInput::Left, Field::Buttons) => {
                self.button = self.previous_button();
                FormOutput::Ok
            }
            (FormInput::Right, Field::Buttons) => {
                self.button = self.next_button();
                FormOutput::Ok
            }
            (FormInput::Left | FormInput::Right, _) => FormOutput::Invalid,
            (FormInput::Enter, Field::Buttons) => match (self.button, self.editing) {
                (Button::Cancel, _) => FormOutput::Cancel,
                (Button::Delete, Some(index)) => FormOutput::Delete(index),
                (Button::Delete, None) => FormOutput::Invalid,
                (Button::Submit, _) => self.submit(),
            },
            (FormInput::Enter, _) => self.submit(),
        }
    }

    fn submit(&self) -> FormOutput {
        let title = self.title.trim();
        if title.is_empty() {
            return FormOutput::Invalid;
        }
        let Ok(time) = Time::parse(self.time.trim(), &TIME_INPUT_FMT) else {
            return FormOutput::Invalid;
        };
        let Ok(time) = time.format(&TIME_OUTPUT_FMT) else {
            return FormOutput::Invalid;
        };
        FormOutput::Submit {
            index: self.editing,
            event: Event {
                title: title.to_owned(),
                date: self.date,
                time,
                duration: self.duration.trim().to_owned(),
                description: self.description.trim().to_owned(),
                color: self.color,
            },
        }
    }

    pub(crate) fn color(&self) -> Palette {
        self.color
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.field {
            Field::Title => Some(&mut self.title),
            Field::Time => Some(&mut self.time),
            Field::Duration => Some(&mut self.duration),
            Field::Description => Some(&mut self.description),
            Field::Color | Field::Buttons => None,
        }
    }

    fn buttons(&self) -> &'static [Button] {
        if self.editing.is_some() {
            &[Button::Cancel, Button::Delete, Button::Submit]
        } else {
            &[Button::Cancel, Button::Submit]
        }
    }

    fn next_button(&self) -> Button {
        let buttons = self.buttons();
        let i = buttons.iter().position(|&b| b == self.button).unwrap_or_default();
        buttons[(i + 1) % buttons.len()]
    }

    fn previous_button(&self) -> Button {
        let buttons = self.buttons();
        let i = buttons.iter().position(|&b| b == self.button).unwrap_or_default();
        buttons[(i + buttons.len() - 1) % buttons.len()]
    }

    fn title(&self) -> String {
        let verb = if self.editing.is_some() { "Edit" } else { "Add" };
        let date = self
            .date
            .format(&TITLE_DATE_FMT)
            .unwrap_or_else(|_| self.date.to_string());
        format!(" {verb} Event on {date} ")
    }

    fn to_text(&self, width: u16) -> Text<'static> {
        let value_width = usize::from(width).saturating_sub(LABEL_WIDTH);
        Text::from_iter([
            Line::default(),
            self.text_line("Title:", Field::Title, &self.title, "Title", value_width),
            self.text_line("Time:", Field::Time, &self.time, "HH:MM", value_width),
            self.text_line(
                "Duration:",
                Field::Duration,
                &self.duration,
                "e.g. 1h",
                value_width,
            ),
            self.text_line(
                "Description:",
                Field::Description,
                &self.description,
                "Description",
                value_width,
            ),
            self.color_line(),
            Line::default(),
            self.button_line(),
        ])
    }

    fn label(&self, label: &str, field: Field) -> Span<'static> {
        let style = if self.field == field {
            FOCUSED_LABEL_STYLE
        } else {
            LABEL_STYLE
        };
        Span::styled(format!("{label:LABEL_WIDTH$}"), style)
    }

    fn text_line(
        &self,
        label: &str,
        field: Field,
        value: &str,
        placeholder: &'static str,
        width: usize,
    ) -> Line<'static> {
        let mut spans = vec![self.label(label, field)];
        if self.field == field {
            // Keep the end of the text, where typing happens, in view
            let room = width.saturating_sub(CURSOR.len());
            let skip = value.chars().count().saturating_sub(room);
            spans.push(Span::styled(value.chars().skip(skip).collect::<String>(), BASE_STYLE));
            spans.push(Span::styled(CURSOR, BASE_STYLE.add_modifier(Modifier::SLOW_BLINK)));
        } else if value.is_empty() {
            spans.push(Span::styled(placeholder, PLACEHOLDER_STYLE));
        } else {
            spans.push(Span::styled(value.to_owned(), BASE_STYLE));
        }
        Line::from(spans)
    }

    fn color_line(&self) -> Line<'static> {
        let mut spans = vec![self.label("Color:", Field::Color)];
        for p in Palette::ALL {
            let style = Style::new().fg(palette_color(p));
            spans.push(if p == self.color {
                Span::styled(format!("[{}]", p.name()), style.add_modifier(Modifier::BOLD))
            } else {
                Span::styled(format!(" {} ", p.name()), style)
            });
        }
        Line::from(spans)
    }

    fn button_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for &b in self.buttons() {
            if !spans.is_empty() {
                spans.push(Span::styled("  ", BASE_STYLE));
            }
            let label = match b {
                Button::Cancel => "[ Cancel ]",
                Button::Delete => "[ Delete ]",
                Button::Submit if self.editing.is_some() => "[ Update ]",
                Button::Submit => "[ Add ]",
            };
            let style = if self.field == Field::Buttons && self.button == b {
                SELECTED_BUTTON_STYLE
            } else {
                BUTTON_STYLE
            };
            spans.push(Span::styled(label, style));
        }
        Line::from(spans).centered()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FormInput {
    Char(char),
    Backspace,
    Next,
    Previous,
    Left,
    Right,
    Enter,
    Cancel,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FormOutput {
    Ok,
    Invalid,
    Cancel,
    Submit { index: Option<usize>, event: Event },
    Delete(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::buffer_lines;
    use time::macros::date;

    fn type_str(form: &mut FormState, s: &str) {
        for c in s.chars() {
            assert_eq!(form.handle_input(FormInput::Char(c)), FormOutput::Ok);
        }
    }

    #[test]
    fn test_add() {
        let mut form = FormState::add(date!(2024 - 02 - 14), Palette::Green);
        type_str(&mut form, "Standup");
        assert_eq!(form.handle_input(FormInput::Next), FormOutput::Ok);
        type_str(&mut form, "9:30");
        assert_eq!(form.handle_input(FormInput::Next), FormOutput::Ok);
        type_str(&mut form, "15m");
        assert_eq!(form.handle_input(FormInput::Next), FormOutput::Ok);
        type_str(&mut form, "Daily sync ");
        assert_eq!(
            form.handle_input(FormInput::Enter),
            FormOutput::Submit {
                index: None,
                event: Event {
                    title: "Standup".into(),
                    date: date!(2024 - 02 - 14),
                    time: "09:30".into(),
                    duration: "15m".into(),
                    description: "Daily sync".into(),
                    color: Palette::Green,
                }
            }
        );
    }

    #[test]
    fn test_required_fields() {
        let mut form = FormState::add(date!(2024 - 02 - 14), Palette::Blue);
        assert_eq!(form.handle_input(FormInput::Enter), FormOutput::Invalid);
        type_str(&mut form, "   ");
        assert_eq!(form.handle_input(FormInput::Enter), FormOutput::Invalid);
        type_str(&mut form, "Lunch");
        // No time yet
        assert_eq!(form.handle_input(FormInput::Enter), FormOutput::Invalid);
        form.handle_input(FormInput::Next);
        type_str(&mut form, "25:00");
        assert_eq!(form.handle_input(FormInput::Enter), FormOutput::Invalid);
        for _ in 0..5 {
            assert_eq!(form.handle_input(FormInput::Backspace), FormOutput::Ok);
        }
        assert_eq!(form.handle_input(FormInput::Backspace), FormOutput::Invalid);
        type_str(&mut form, "12:00");
        assert!(matches!(
            form.handle_input(FormInput::Enter),
            FormOutput::Submit { index: None, .. }
        ));
    }

    #[test]
    fn test_edit_prefills_and_updates() {
        let event = Event {
            title: "Dentist".into(),
            date: date!(2024 - 02 - 20),
            time: "14:00".into(),
            duration: "1h".into(),
            description: String::new(),
            color: Palette::Red,
        };
        let mut form = FormState::edit(3, &event);
        assert_eq!(form.color(), Palette::Red);
        type_str(&mut form, "!");
        // Walk back around to the color field and pick the next color
        form.handle_input(FormInput::Previous);
        form.handle_input(FormInput::Previous);
        assert_eq!(form.handle_input(FormInput::Right), FormOutput::Ok);
        assert_eq!(
            form.handle_input(FormInput::Enter),
            FormOutput::Submit {
                index: Some(3),
                event: Event {
                    title: "Dentist!".into(),
                    color: Palette::Purple,
                    ..event
                }
            }
        );
    }

    #[test]
    fn test_buttons() {
        let event = Event {
            title: "Dentist".into(),
            date: date!(2024 - 02 - 20),
            time: "14:00".into(),
            duration: String::new(),
            description: String::new(),
            color: Palette::Blue,
        };
        let mut form = FormState::edit(1, &event);
        form.handle_input(FormInput::Previous);
        assert_eq!(form.field, Field::Buttons);
        assert_eq!(form.handle_input(FormInput::Char('x')), FormOutput::Invalid);
        assert_eq!(form.handle_input(FormInput::Left), FormOutput::Ok);
        assert_eq!(form.handle_input(FormInput::Enter), FormOutput::Delete(1));
        assert_eq!(form.handle_input(FormInput::Left), FormOutput::Ok);
        assert_eq!(form.handle_input(FormInput::Enter), FormOutput::Cancel);

        let mut form = FormState::add(date!(2024 - 02 - 20), Palette::Blue);
        form.handle_input(FormInput::Previous);
        // No delete button when adding
        assert_eq!(form.handle_input(FormInput::Left), FormOutput::Ok);
        assert_eq!(form.button, Button::Cancel);
        assert_eq!(form.handle_input(FormInput::Left), FormOutput::Ok);
        assert_eq!(form.button, Button::Submit);
    }

    #[test]
    fn test_cancel_from_anywhere() {
        let mut form = FormState::add(date!(2024 - 02 - 20), Palette::Blue);
        type_str(&mut form, "abc");
        assert_eq!(form.handle_input(FormInput::Cancel), FormOutput::Cancel);
        form.handle_input(FormInput::Next);
        form.handle_input(FormInput::Next);
        form.handle_input(FormInput::Next);
        form.handle_input(FormInput::Next);
        assert_eq!(form.field, Field::Color);
        assert_eq!(form.handle_input(FormInput::Char('q')), FormOutput::Invalid);
        assert_eq!(form.handle_input(FormInput::Cancel), FormOutput::Cancel);
    }

    #[test]
    fn test_render() {
        let mut form = FormState::add(date!(2024 - 02 - 14), Palette::Blue);
        type_str(&mut form, "Standup");
        let area = Rect::new(0, 0, 60, 14);
        let mut buffer = Buffer::empty(area);
        EventForm.render(area, &mut buffer, &mut form);
        let lines = buffer_lines(&buffer);
        assert!(lines[2].contains("Add Event on 14 Feb 2024"), "{:?}", lines[2]);
        assert!(lines[4].contains("│Title:       Standup_"), "{:?}", lines[4]);
        assert!(lines[5].contains("│Time:        HH:MM "), "{:?}", lines[5]);
        assert!(lines[6].contains("│Duration:    e.g. 1h "), "{:?}", lines[6]);
        assert!(
            lines[8].contains("│Color:       [blue] green  yellow  red  purple "),
            "{:?}",
            lines[8]
        );
        assert!(lines[10].contains("[ Cancel ]  [ Add ]"), "{:?}", lines[10]);
        assert!(!lines[10].contains("Delete"), "{:?}", lines[10]);
    }
}
