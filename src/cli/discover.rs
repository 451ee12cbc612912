use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Args};

use crate::common::debug;
use crate::config::{env, Initializer};
use crate::event::{self, Event};
use crate::locale;
use crate::Result;

/// List events visible on the discover page
#[derive(Args, Debug)]
pub struct DiscoverCommand {
    /// Event records as a json array
    #[arg(
        long,
        short = 'e',
        default_value = "./files/events.json",
        env = "EVENTGATE_EVENTS_PATH"
    )]
    events: PathBuf,
    /// Configuration file path
    #[arg(long, short = 'C', env = env::CONFIG_PATH)]
    config: Option<PathBuf>,
    /// Only show events on this date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "preselect")]
    date: Option<NaiveDate>,
    /// Select today when something starts today
    #[arg(long, action = ArgAction::SetTrue)]
    preselect: bool,
    /// Evaluate at this instant (RFC 3339) instead of the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,
    /// Offset from UTC used to compare calendar days. Local zone by default
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,
    /// Show the carousel, most recent first
    #[arg(long, action = ArgAction::SetTrue)]
    carousel: bool,
    /// Number of events in the carousel
    #[arg(long)]
    carousel_limit: Option<usize>,
    /// File holding a cdn trace response, used to name the visitor's country
    #[arg(long)]
    trace: Option<PathBuf>,
}

impl DiscoverCommand {
    pub async fn run(self) -> Result<()> {
        let DiscoverCommand {
            events,
            config,
            date,
            preselect,
            now,
            utc_offset_minutes,
            carousel,
            carousel_limit,
            trace,
        } = self;

        let mut initializer = match config {
            Some(path) => Initializer::load_config_file(path).await?,
            None => Initializer::default(),
        };
        let discover = &mut initializer.config.discover;
        discover.set_utc_offset_minutes(utc_offset_minutes);
        discover.set_carousel_limit(carousel_limit);

        let zone = discover.zone();
        let now = now.unwrap_or_else(Utc::now);
        let events = event::load_events(events).await?;
        debug!(count = events.len(), ?zone, %now, "Discover");

        let trace = match trace {
            Some(path) => Some(tokio::fs::read_to_string(path).await?),
            None => None,
        };
        println!("Discover events in {}", locale::country_label(trace.as_deref()));

        if carousel {
            for event in event::recent_first(&events, discover.carousel_limit()) {
                println!("{}", line(event, now));
            }
            return Ok(());
        }

        let selected = match (date, preselect) {
            (Some(date), _) => Some(date),
            (None, true) => event::initial_selected_date(&events, now, &zone),
            (None, false) => None,
        };
        if let Some(selected) = selected {
            println!("on {}", selected);
        }

        let visible = event::upcoming(&events, now, selected, &zone);
        if visible.is_empty() {
            println!("{}", event::empty_listing_message(selected));
        }
        for event in visible {
            println!("{}", line(event, now));
        }

        Ok(())
    }
}

fn line(event: &Event, now: DateTime<Utc>) -> String {
    let live = if event::is_live(event, now) {
        " [LIVE]"
    } else {
        ""
    };
    format!(
        "{} {}  {}{} @ {}",
        event.date, event.time, event.title, live, event.address
    )
}
