use chrono::FixedOffset;
use serde::Deserialize;

use crate::core;
use crate::event::{CalendarZone, CAROUSEL_LIMIT};

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub shell: core::Config,
    #[serde(default)]
    pub discover: DiscoverConfig,
}

// Discover page configuration.
#[derive(Deserialize, Debug, Default)]
pub struct DiscoverConfig {
    // Offset used for calendar day comparison. Local zone when absent.
    utc_offset_minutes: Option<i32>,
    // Number of events in the carousel.
    carousel_limit: Option<usize>,
}

impl DiscoverConfig {
    pub fn set_utc_offset_minutes(&mut self, val: Option<i32>) {
        if let Some(val) = val {
            self.utc_offset_minutes = Some(val)
        }
    }

    pub fn set_carousel_limit(&mut self, val: Option<usize>) {
        if let Some(val) = val {
            self.carousel_limit = Some(val)
        }
    }

    pub fn zone(&self) -> CalendarZone {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .map_or(CalendarZone::Local, CalendarZone::Fixed)
    }

    pub fn carousel_limit(&self) -> usize {
        self.carousel_limit.unwrap_or(CAROUSEL_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_defaults_to_local() {
        assert_eq!(DiscoverConfig::default().zone(), CalendarZone::Local);
    }

    #[test]
    fn zone_from_offset() {
        let mut discover = DiscoverConfig::default();
        discover.set_utc_offset_minutes(Some(180));
        assert_eq!(
            discover.zone(),
            CalendarZone::Fixed(FixedOffset::east_opt(3 * 3600).unwrap())
        );

        // out of range offsets fall back to local.
        discover.set_utc_offset_minutes(Some(24 * 60));
        assert_eq!(discover.zone(), CalendarZone::Local);
    }
}
