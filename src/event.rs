use serde::{de::Error as _, Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

pub(crate) static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct Event {
    pub(crate) title: String,
    #[serde(deserialize_with = "deserialize_ymd")]
    pub(crate) date: Date,
    pub(crate) time: String,
    #[serde(default)]
    pub(crate) duration: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) color: Palette,
}

fn deserialize_ymd<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let s = String::deserialize(deserializer)?;
    Date::parse(&s, &YMD_FMT).map_err(D::Error::custom)
}

/// The fixed set of colors an event can be highlighted with
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Palette {
    #[default]
    #[serde(alias = "bg-blue-300")]
    Blue,
    #[serde(alias = "bg-green-300")]
    Green,
    #[serde(alias = "bg-yellow-300")]
    Yellow,
    #[serde(alias = "bg-red-300")]
    Red,
    #[serde(alias = "bg-purple-300")]
    Purple,
}

impl Palette {
    pub(crate) const ALL: [Palette; 5] = [
        Palette::Blue,
        Palette::Green,
        Palette::Yellow,
        Palette::Red,
        Palette::Purple,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Palette::Blue => "blue",
            Palette::Green => "green",
            Palette::Yellow => "yellow",
            Palette::Red => "red",
            Palette::Purple => "purple",
        }
    }

    fn position(self) -> usize {
        Palette::ALL.iter().position(|&p| p == self).unwrap_or_default()
    }

    // Both directions wrap around
    pub(crate) fn next(self) -> Palette {
        Palette::ALL[(self.position() + 1) % Palette::ALL.len()]
    }

    pub(crate) fn previous(self) -> Palette {
        Palette::ALL[(self.position() + Palette::ALL.len() - 1) % Palette::ALL.len()]
    }
}

/// The in-memory list of events.  Indices into the list identify events for
/// editing and deletion; removing an event shifts the indices of those after
/// it but never reorders them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventList(Vec<Event>);

impl EventList {
    pub(crate) fn new(events: Vec<Event>) -> EventList {
        EventList(events)
    }

    pub(crate) fn from_json(s: &str) -> Result<EventList, serde_json::Error> {
        serde_json::from_str(s).map(EventList)
    }

    pub(crate) fn load(path: &Path) -> Result<EventList, SeedError> {
        let src = fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_owned(),
            source,
        })?;
        let events = EventList::from_json(&src).map_err(|source| SeedError::Parse {
            path: path.to_owned(),
            source,
        })?;
        tracing::info!(path = %path.display(), count = events.len(), "loaded seed events");
        Ok(events)
    }

    pub(crate) fn as_slice(&self) -> &[Event] {
        &self.0
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Append an event and return its index
    pub(crate) fn push(&mut self, event: Event) -> usize {
        tracing::info!(title = %event.title, date = %event.date, "adding event");
        self.0.push(event);
        self.0.len() - 1
    }

    /// Replace the event at `index` in place, returning the old event
    pub(crate) fn replace(&mut self, index: usize, event: Event) -> Result<Event, NoSuchEvent> {
        let slot = self.0.get_mut(index).ok_or(NoSuchEvent(index))?;
        tracing::info!(index, title = %event.title, date = %event.date, "updating event");
        Ok(std::mem::replace(slot, event))
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<Event, NoSuchEvent> {
        if index < self.0.len() {
            let event = self.0.remove(index);
            tracing::info!(index, title = %event.title, "deleted event");
            Ok(event)
        } else {
            Err(NoSuchEvent(index))
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("no event at index {0}")]
pub(crate) struct NoSuchEvent(pub(crate) usize);

#[derive(Debug, Error)]
pub(crate) enum SeedError {
    #[error("failed to read seed events from {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse seed events in {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
