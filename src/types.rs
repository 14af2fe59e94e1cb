//! Core types shared across the crate.
//!
//! This module contains the fundamental types the rest of the crate builds
//! on:
//!
//! - [`ActionKind`]: Closed set of action descriptors
//! - [`Action`]: A descriptor paired with its typed request
//! - [`SearchResultItem`]: Canonical record for one web search hit
//! - [`WeatherSnapshot`]: Canonical record for a weather lookup
//! - [`ActionOutput`]: Canonical record produced by a completed invocation
//! - [`InvocationError`]: Uniform failure shape for all invocation paths
//! - [`NormalizeError`]: Adapter failure for unmappable provider shapes

use crate::request::{Country, SearchRequest, Units, WeatherRequest};
use serde::{Deserialize, Serialize};
use time::Date;

/// Identifies which provider/adapter pair an invocation uses.
///
/// This is a closed, enumerable set - adding a provider means adding a
/// variant here and a routing arm in the invoker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    WebSearch,
    CurrentWeather,
    WeatherForecast,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::CurrentWeather => "current_weather",
            Self::WeatherForecast => "weather_forecast",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully formed action: descriptor plus the typed request it carries.
///
/// Requests are constructed per user interaction and consumed once by the
/// invoker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    WebSearch(SearchRequest),
    CurrentWeather(WeatherRequest),
    WeatherForecast(WeatherRequest),
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::WebSearch(_) => ActionKind::WebSearch,
            Self::CurrentWeather(_) => ActionKind::CurrentWeather,
            Self::WeatherForecast(_) => ActionKind::WeatherForecast,
        }
    }

    /// Short human-readable description, used for logging and context notes.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::WebSearch(req) => format!("web search for \"{}\"", req.query),
            Self::CurrentWeather(req) => format!("current weather in {}", req.location),
            Self::WeatherForecast(req) => {
                let days = req
                    .forecast_days
                    .map_or_else(String::new, |d| format!("{d}-day "));
                format!("{days}weather forecast for {}", req.location)
            }
        }
    }
}

/// Canonical record for a single web search result.
///
/// Field names are the internal contract; provider-specific names
/// (`page_age`, `profile.name`, `thumbnail.src`) are renamed by the adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One temperature/condition reading, current or hourly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temp: f64,
    /// WMO weather interpretation code.
    pub weather_code: u16,
}

/// Canonical record for a completed weather lookup.
///
/// `hourly` starts at the current hour and is ordered; `forecast_days` is
/// present only for forecast actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<Country>,
    pub units: Units,
    pub current_hour: u8,
    pub current_date: Date,
    pub current: WeatherReading,
    pub hourly: Vec<WeatherReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_days: Option<u32>,
}

/// Canonical output of a completed invocation, one variant per domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum ActionOutput {
    Search {
        query: String,
        results: Vec<SearchResultItem>,
    },
    Weather(WeatherSnapshot),
}

/// Uniform failure shape for every invocation path.
///
/// Callers never need to distinguish a reachable-but-unhappy provider from a
/// transport failure at the UI boundary; both arrive through this one enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvocationError {
    /// Provider reachable but returned a non-success status.
    Http { status: u16 },
    /// Network error, timeout, malformed body, or unmappable shape.
    Transport { cause: String },
}

impl InvocationError {
    #[must_use]
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            cause: cause.to_string(),
        }
    }
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { status } => write!(f, "provider returned HTTP {status}"),
            Self::Transport { cause } => write!(f, "request failed: {cause}"),
        }
    }
}

impl std::error::Error for InvocationError {}

impl From<NormalizeError> for InvocationError {
    fn from(err: NormalizeError) -> Self {
        Self::transport(err)
    }
}

/// The provider returned a shape the adapter cannot map.
///
/// Raised only when a *required* canonical field is absent; missing optional
/// fields are recovered locally by omission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizeError {
    pub field: String,
}

impl NormalizeError {
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "response missing required field: {}", self.field)
    }
}

impl std::error::Error for NormalizeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_round_trips_through_serde() {
        let json = serde_json::to_string(&ActionKind::CurrentWeather).unwrap();
        assert_eq!(json, "\"current_weather\"");
        let parsed: ActionKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ActionKind::CurrentWeather);
    }

    #[test]
    fn action_reports_its_kind() {
        let action = Action::WebSearch(SearchRequest::new("hi"));
        assert_eq!(action.kind(), ActionKind::WebSearch);

        let action = Action::WeatherForecast(WeatherRequest::new("Oslo"));
        assert_eq!(action.kind(), ActionKind::WeatherForecast);
    }

    #[test]
    fn describe_mentions_the_subject() {
        let action = Action::CurrentWeather(WeatherRequest::new("Tokyo"));
        assert!(action.describe().contains("Tokyo"));
    }

    #[test]
    fn invocation_error_display() {
        let err = InvocationError::Http { status: 500 };
        assert_eq!(err.to_string(), "provider returned HTTP 500");

        let err = InvocationError::transport("connection reset");
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn normalize_error_folds_into_transport() {
        let err: InvocationError = NormalizeError::missing("web.results").into();
        match err {
            InvocationError::Transport { cause } => assert!(cause.contains("web.results")),
            InvocationError::Http { .. } => panic!("expected transport variant"),
        }
    }

    #[test]
    fn search_item_omits_absent_optionals_in_json() {
        let item = SearchResultItem {
            title: "t".into(),
            url: "u".into(),
            description: "d".into(),
            published_date: None,
            author: None,
            image_url: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("author").is_none());
        assert!(json.get("image_url").is_none());
    }
}
