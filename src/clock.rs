use time::{Date, OffsetDateTime, UtcOffset};

/// Source of the current calendar date, consulted on every render
pub(crate) trait Clock {
    fn today(&self) -> Date;
}

/// The system clock, read in the local time zone
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LocalClock {
    offset: UtcOffset,
}

impl LocalClock {
    // The offset can only be determined reliably while the process is
    // single-threaded, so it is captured once at startup.
    pub(crate) fn detect() -> LocalClock {
        let offset = UtcOffset::current_local_offset().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not determine local UTC offset; using UTC");
            UtcOffset::UTC
        });
        LocalClock { offset }
    }
}

impl Clock for LocalClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) Date);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
