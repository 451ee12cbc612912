use chrono::{Duration, FixedOffset, Local, NaiveDate, Offset, Utc};

use crate::common::Time;
use crate::event::Event;

const LIVE_WINDOW_SECS: i64 = 60 * 60;

/// How long an event counts as live after its scheduled start.
pub fn live_window() -> Duration {
    Duration::seconds(LIVE_WINDOW_SECS)
}

/// Zone in which calendar days are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarZone {
    // The visitor's system zone.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl CalendarZone {
    pub fn utc() -> Self {
        CalendarZone::Fixed(Utc.fix())
    }

    pub fn date_of(&self, instant: &Time) -> NaiveDate {
        match self {
            CalendarZone::Local => instant.with_timezone(&Local).date_naive(),
            CalendarZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

/// `now` falls in `[target, target + 1h)`.
pub fn is_live(event: &Event, now: Time) -> bool {
    event.target <= now && now < event.target + live_window()
}

/// The live window is fully over.
pub fn has_ended(event: &Event, now: Time) -> bool {
    now > event.target + live_window()
}

pub fn calendar_date(event: &Event, zone: &CalendarZone) -> NaiveDate {
    zone.date_of(&event.target)
}

/// Ended events are never visible. Otherwise an event is visible when no date
/// is selected, or when it starts on the selected calendar day in `zone`.
pub fn is_visible(
    event: &Event,
    now: Time,
    selected: Option<NaiveDate>,
    zone: &CalendarZone,
) -> bool {
    if has_ended(event, now) {
        return false;
    }
    match selected {
        None => true,
        Some(date) => calendar_date(event, zone) == date,
    }
}
