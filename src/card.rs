//! Interactive result cards and conversation entries.
//!
//! A [`ResultCard`] is the rendered unit produced by a completed action. It
//! owns its canonical record and exposes a fixed, finite set of follow-up
//! triggers - each a fully formed [`Action`] derived purely from the record,
//! ready to be handed back to the runner. A [`ConversationEntry`] wraps a
//! card (or a visible error) with an id and timestamp for the append-only
//! conversation log.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::num::NonZeroU32;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::request::{Country, WeatherRequest};
use crate::types::{Action, ActionOutput, SearchResultItem, WeatherReading, WeatherSnapshot};

/// Number of hourly slots a weather card displays.
const HOURLY_SLOTS: usize = 7;

const SHORT_FORECAST_DAYS: NonZeroU32 = NonZeroU32::new(3).unwrap();
const LONG_FORECAST_DAYS: NonZeroU32 = NonZeroU32::new(5).unwrap();

/// A follow-up trigger exposed by a card: a label for display and the
/// action to run when the user picks it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub label: String,
    pub action: Action,
}

/// One slot of the weather card's hourly strip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourSlot {
    /// `Now` for the first slot, then the wall-clock hour zero-padded to
    /// two digits.
    pub label: String,
    pub reading: WeatherReading,
}

/// The rendered unit for one completed action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "card", rename_all = "snake_case")]
pub enum ResultCard {
    Search {
        query: String,
        results: Vec<SearchResultItem>,
    },
    Weather(WeatherSnapshot),
}

impl ResultCard {
    #[must_use]
    pub fn from_output(output: ActionOutput) -> Self {
        match output {
            ActionOutput::Search { query, results } => Self::Search { query, results },
            ActionOutput::Weather(snapshot) => Self::Weather(snapshot),
        }
    }

    /// Follow-up triggers for this card.
    ///
    /// Search cards expose none. Weather cards expose the two forecast
    /// horizons plus a city toggle; parameters derive purely from the
    /// snapshot, with a hardcoded New York / London switch standing in for a
    /// richer recommendation policy.
    #[must_use]
    pub fn follow_ups(&self) -> Vec<FollowUp> {
        match self {
            Self::Search { .. } => Vec::new(),
            Self::Weather(snapshot) => weather_follow_ups(snapshot),
        }
    }

    /// The hourly display strip: at most [`HOURLY_SLOTS`] entries, slot 0
    /// labeled `Now`, later slots labeled with their wall-clock hour.
    #[must_use]
    pub fn hourly_display(&self) -> Vec<HourSlot> {
        let Self::Weather(snapshot) = self else {
            return Vec::new();
        };

        snapshot
            .hourly
            .iter()
            .take(HOURLY_SLOTS)
            .enumerate()
            .map(|(index, reading)| HourSlot {
                label: hour_label(snapshot.current_hour, index),
                reading: *reading,
            })
            .collect()
    }

    /// Plain-text rendering for hosts without a layout engine.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Search { query, results } => render_search(query, results),
            Self::Weather(snapshot) => render_weather(snapshot, &self.hourly_display()),
        }
    }
}

fn hour_label(current_hour: u8, index: usize) -> String {
    if index == 0 {
        "Now".to_string()
    } else {
        format!("{:02}", (usize::from(current_hour) + index) % 24)
    }
}

fn weather_follow_ups(snapshot: &WeatherSnapshot) -> Vec<FollowUp> {
    let base = WeatherRequest {
        location: snapshot.location.clone(),
        country_code: snapshot.country_code,
        units: Some(snapshot.units),
        forecast_days: None,
    };

    let other_city = if snapshot.location == "New York" {
        "London"
    } else {
        "New York"
    };
    let other_country = if snapshot.country_code == Some(Country::US) {
        Country::GB
    } else {
        Country::US
    };

    vec![
        FollowUp {
            label: format!("{SHORT_FORECAST_DAYS} day forecast"),
            action: Action::WeatherForecast(
                base.clone().with_forecast_days(SHORT_FORECAST_DAYS),
            ),
        },
        FollowUp {
            label: format!("{LONG_FORECAST_DAYS} day forecast"),
            action: Action::WeatherForecast(
                base.clone().with_forecast_days(LONG_FORECAST_DAYS),
            ),
        },
        FollowUp {
            label: format!("Weather in {other_city}"),
            action: Action::CurrentWeather(WeatherRequest {
                location: other_city.to_string(),
                country_code: Some(other_country),
                units: base.units,
                forecast_days: None,
            }),
        },
    ]
}

fn render_search(query: &str, results: &[SearchResultItem]) -> String {
    if results.is_empty() {
        return format!("No results found for: {query}");
    }

    let mut output = format!("Search results for: {query}\n\n");
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(output, "{}. {}", i + 1, result.title);
        let _ = writeln!(output, "   URL: {}", result.url);
        if !result.description.is_empty() {
            let _ = writeln!(output, "   {}", result.description);
        }
        if let Some(ref author) = result.author {
            let _ = writeln!(output, "   By: {author}");
        }
        if let Some(ref date) = result.published_date {
            let _ = writeln!(output, "   Published: {date}");
        }
        output.push('\n');
    }
    output
}

fn render_weather(snapshot: &WeatherSnapshot, hours: &[HourSlot]) -> String {
    let mut output = format!("Weather Forecast: {}", snapshot.location);
    if let Some(country) = snapshot.country_code {
        let _ = write!(output, ", {country}");
    }
    output.push('\n');

    let _ = writeln!(
        output,
        "{} {}{}",
        snapshot.current_date,
        snapshot.current.temp,
        snapshot.units.temp_suffix()
    );

    for slot in hours {
        let _ = writeln!(
            output,
            "{:>3}  {}°  (code {})",
            slot.label,
            slot.reading.temp.round(),
            slot.reading.weather_code
        );
    }
    output
}

/// One immutable entry of the append-only conversation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(flatten)]
    pub body: EntryBody,
}

/// What an entry shows: a rendered card, or a visible error message so the
/// conversation never silently loses a turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum EntryBody {
    Card(ResultCard),
    Error { message: String },
}

impl ConversationEntry {
    #[must_use]
    pub fn card(card: ResultCard) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            body: EntryBody::Card(card),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            body: EntryBody::Error {
                message: message.into(),
            },
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.body, EntryBody::Error { .. })
    }

    /// Plain-text rendering of the entry.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.body {
            EntryBody::Card(card) => card.render(),
            EntryBody::Error { message } => format!("Something went wrong: {message}"),
        }
    }
}
