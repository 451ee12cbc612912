//! Event listings for the discover page.
//!
//! Everything here is synchronous and pure. Callers pass `now` explicitly.

mod filter;
pub use self::filter::{calendar_date, has_ended, is_live, is_visible, live_window, CalendarZone};

mod listing;
pub use self::listing::{
    empty_listing_message, initial_selected_date, load_events, recent_first, upcoming,
    CAROUSEL_LIMIT,
};

use serde::Deserialize;

use crate::common::Time;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub address: String,
    // Display labels as entered by the organizer.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub background_image_url: String,
    // Scheduled start.
    #[serde(rename = "target_date")]
    pub target: Time,
}
