use std::path::Path;

use chrono::NaiveDate;

use crate::common::{debug, Result, Time};
use crate::event::filter::{has_ended, is_visible, CalendarZone};
use crate::event::Event;

/// Number of events the carousel shows.
pub const CAROUSEL_LIMIT: usize = 10;

/// Visible events in chronological order.
pub fn upcoming<'a>(
    events: &'a [Event],
    now: Time,
    selected: Option<NaiveDate>,
    zone: &CalendarZone,
) -> Vec<&'a Event> {
    let mut visible: Vec<&Event> = events
        .iter()
        .filter(|event| is_visible(event, now, selected, zone))
        .collect();
    visible.sort_by_key(|event| event.target);
    visible
}

/// Most recent first, as the carousel shows them. Ended events are kept.
pub fn recent_first(events: &[Event], limit: usize) -> Vec<&Event> {
    let mut recent: Vec<&Event> = events.iter().collect();
    recent.sort_by(|a, b| b.target.cmp(&a.target));
    recent.truncate(limit);
    recent
}

/// Preselect today when something that has not ended starts today.
pub fn initial_selected_date(events: &[Event], now: Time, zone: &CalendarZone) -> Option<NaiveDate> {
    let today = zone.date_of(&now);
    events
        .iter()
        .any(|event| !has_ended(event, now) && zone.date_of(&event.target) == today)
        .then_some(today)
}

pub fn empty_listing_message(selected: Option<NaiveDate>) -> &'static str {
    match selected {
        Some(_) => "No events on this date",
        None => "No upcoming events",
    }
}

/// Read events from a JSON array file.
pub async fn load_events(path: impl AsRef<Path>) -> crate::Result<Vec<Event>> {
    Ok(read_events(path.as_ref()).await?)
}

async fn read_events(path: &Path) -> Result<Vec<Event>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let events: Vec<Event> = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), count = events.len(), "Events loaded");
    Ok(events)
}
