//! Public request vocabulary for actions.
//!
//! This module defines the request surface callers build before handing an
//! action to the runner:
//!
//! - [`SearchRequest`] - A web search with optional modifiers
//! - [`WeatherRequest`] - A weather lookup by location name
//! - [`Country`] - Fixed enumeration of supported country codes
//! - [`Freshness`] - Recency window, long-form public vocabulary
//! - [`Units`] - Metric or imperial unit system
//!
//! Every modifier is optional; an absent modifier means "let the provider
//! apply its own default" and is omitted from the outbound call entirely.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Country codes accepted by the search provider.
///
/// This is a closed, fixed enumeration; the serialized form is the
/// ISO-alpha-2 code itself (e.g. `"US"`, `"GB"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    AR,
    AU,
    AT,
    BE,
    BR,
    CA,
    CL,
    DK,
    FI,
    FR,
    DE,
    HK,
    IN,
    ID,
    IT,
    JP,
    KR,
    MY,
    MX,
    NL,
    NZ,
    NO,
    CN,
    PL,
    PT,
    PH,
    RU,
    SA,
    ZA,
    ES,
    SE,
    CH,
    TW,
    TH,
    TR,
    GB,
    US,
}

impl Country {
    /// The ISO-alpha-2 code sent upstream.
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::AR => "AR",
            Self::AU => "AU",
            Self::AT => "AT",
            Self::BE => "BE",
            Self::BR => "BR",
            Self::CA => "CA",
            Self::CL => "CL",
            Self::DK => "DK",
            Self::FI => "FI",
            Self::FR => "FR",
            Self::DE => "DE",
            Self::HK => "HK",
            Self::IN => "IN",
            Self::ID => "ID",
            Self::IT => "IT",
            Self::JP => "JP",
            Self::KR => "KR",
            Self::MY => "MY",
            Self::MX => "MX",
            Self::NL => "NL",
            Self::NZ => "NZ",
            Self::NO => "NO",
            Self::CN => "CN",
            Self::PL => "PL",
            Self::PT => "PT",
            Self::PH => "PH",
            Self::RU => "RU",
            Self::SA => "SA",
            Self::ZA => "ZA",
            Self::ES => "ES",
            Self::SE => "SE",
            Self::CH => "CH",
            Self::TW => "TW",
            Self::TH => "TH",
            Self::TR => "TR",
            Self::GB => "GB",
            Self::US => "US",
        }
    }

    /// Parse a provider-reported code back into the enumeration.
    ///
    /// Codes outside the supported set map to `None`; provider responses may
    /// cover more of the world than the request vocabulary does.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(code.to_ascii_uppercase())).ok()
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Recency window for search results.
///
/// The long forms (`past-day`, `past-week`, ...) are the stable public
/// vocabulary; the provider short codes (`pd`, `pw`, ...) are accepted on
/// input for compatibility but are an upstream implementation detail and
/// never appear in serialized output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    #[serde(rename = "past-day", alias = "pd")]
    PastDay,
    #[serde(rename = "past-week", alias = "pw")]
    PastWeek,
    #[serde(rename = "past-month", alias = "pm")]
    PastMonth,
    #[serde(rename = "past-year", alias = "py")]
    PastYear,
}

impl Freshness {
    /// The short code the search provider expects.
    #[must_use]
    pub const fn short_code(self) -> &'static str {
        match self {
            Self::PastDay => "pd",
            Self::PastWeek => "pw",
            Self::PastMonth => "pm",
            Self::PastYear => "py",
        }
    }

    /// The long-form public name.
    #[must_use]
    pub const fn long_form(self) -> &'static str {
        match self {
            Self::PastDay => "past-day",
            Self::PastWeek => "past-week",
            Self::PastMonth => "past-month",
            Self::PastYear => "past-year",
        }
    }
}

/// Unit system for weather values and search localization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Temperature suffix for rendering.
    #[must_use]
    pub const fn temp_suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }
}

/// A web search request.
///
/// Only `query` is required. `count` is a positive integer; the provider
/// default (5) applies when unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness: Option<Freshness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<NonZeroU32>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            country: None,
            freshness: None,
            units: None,
            count: None,
        }
    }

    #[must_use]
    pub const fn with_country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    #[must_use]
    pub const fn with_freshness(mut self, freshness: Freshness) -> Self {
        self.freshness = Some(freshness);
        self
    }

    #[must_use]
    pub const fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub const fn with_count(mut self, count: NonZeroU32) -> Self {
        self.count = Some(count);
        self
    }
}

/// A weather lookup request, shared by the current-weather and forecast
/// actions.
///
/// `forecast_days` is only meaningful for the forecast action; the
/// current-weather action leaves it unset and the parameter is omitted
/// upstream either way when absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRequest {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<Country>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_days: Option<NonZeroU32>,
}

impl WeatherRequest {
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            country_code: None,
            units: None,
            forecast_days: None,
        }
    }

    #[must_use]
    pub const fn with_country_code(mut self, country: Country) -> Self {
        self.country_code = Some(country);
        self
    }

    #[must_use]
    pub const fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub const fn with_forecast_days(mut self, days: NonZeroU32) -> Self {
        self.forecast_days = Some(days);
        self
    }
}
