//! Open-Meteo weather adapter.
//!
//! Two upstream calls per lookup: geocode the location name, then fetch
//! current/hourly conditions for the resolved coordinates. The forecast and
//! current-weather actions share this adapter; the forecast horizon is the
//! only difference in the outbound call.

use log::debug;
use time::PrimitiveDateTime;
use time::macros::format_description;

use crate::request::{Country, Units, WeatherRequest};
use crate::types::{InvocationError, NormalizeError, WeatherReading, WeatherSnapshot};

const GEOCODING_ENDPOINT: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

/// How many geocoding candidates to request; the first match wins after the
/// optional country filter is applied.
const GEOCODING_CANDIDATES: u32 = 10;

/// Open-Meteo API adapter (no authentication required upstream).
#[derive(Clone)]
pub struct OpenMeteoProvider {
    client: reqwest::Client,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider with a custom HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Current conditions for a location.
    ///
    /// # Errors
    /// Returns [`InvocationError`] on transport, status, geocoding, or
    /// normalization failure.
    pub async fn current_weather(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherSnapshot, InvocationError> {
        self.fetch_snapshot(request, None).await
    }

    /// Multi-day forecast for a location.
    ///
    /// # Errors
    /// Returns [`InvocationError`] on transport, status, geocoding, or
    /// normalization failure.
    pub async fn forecast(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherSnapshot, InvocationError> {
        self.fetch_snapshot(request, request.forecast_days.map(std::num::NonZeroU32::get))
            .await
    }

    async fn fetch_snapshot(
        &self,
        request: &WeatherRequest,
        forecast_days: Option<u32>,
    ) -> Result<WeatherSnapshot, InvocationError> {
        let place = self.geocode(request).await?;
        debug!(
            "geocoded {} as {} ({}, {})",
            request.location, place.name, place.latitude, place.longitude
        );

        let params = forecast_params(&place, request.units, forecast_days);
        let response = self
            .client
            .get(FORECAST_ENDPOINT)
            .header("Accept", "application/json")
            .query(&params)
            .send()
            .await
            .map_err(InvocationError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InvocationError::Http {
                status: status.as_u16(),
            });
        }

        let raw: raw::Forecast = response
            .json()
            .await
            .map_err(InvocationError::transport)?;

        normalize(&raw, &place, request, forecast_days).map_err(InvocationError::from)
    }

    async fn geocode(&self, request: &WeatherRequest) -> Result<raw::GeoResult, InvocationError> {
        let response = self
            .client
            .get(GEOCODING_ENDPOINT)
            .header("Accept", "application/json")
            .query(&[
                ("name", request.location.clone()),
                ("count", GEOCODING_CANDIDATES.to_string()),
            ])
            .send()
            .await
            .map_err(InvocationError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InvocationError::Http {
                status: status.as_u16(),
            });
        }

        let raw: raw::Geocoding = response
            .json()
            .await
            .map_err(InvocationError::transport)?;

        pick_geocoding_match(raw, request.country_code).ok_or_else(|| {
            InvocationError::transport(format!(
                "no geocoding match for \"{}\"",
                request.location
            ))
        })
    }
}

/// First candidate matching the country filter, or the first candidate when
/// no filter is given.
fn pick_geocoding_match(
    raw: raw::Geocoding,
    country: Option<Country>,
) -> Option<raw::GeoResult> {
    let candidates = raw.results?;
    match country {
        Some(wanted) => candidates.into_iter().find(|c| {
            c.country_code
                .as_deref()
                .is_some_and(|code| code.eq_ignore_ascii_case(wanted.as_code()))
        }),
        None => candidates.into_iter().next(),
    }
}

/// Forecast query in wire order. Unit system and horizon are omitted when
/// the caller did not set them, so the provider defaults (celsius, one day's
/// horizon) govern.
fn forecast_params(
    place: &raw::GeoResult,
    units: Option<Units>,
    forecast_days: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("latitude", place.latitude.to_string()),
        ("longitude", place.longitude.to_string()),
        ("current", "temperature_2m,weather_code".to_string()),
        ("hourly", "temperature_2m,weather_code".to_string()),
        ("timezone", "auto".to_string()),
    ];
    if let Some(Units::Imperial) = units {
        params.push(("temperature_unit", "fahrenheit".to_string()));
    }
    if let Some(days) = forecast_days {
        params.push(("forecast_days", days.to_string()));
    }
    params
}

/// Map the provider response onto the canonical snapshot.
///
/// `current` and the three parallel `hourly` arrays are required and must
/// agree in length; the hourly sequence is re-anchored to start at the
/// current hour.
fn normalize(
    raw: &raw::Forecast,
    place: &raw::GeoResult,
    request: &WeatherRequest,
    forecast_days: Option<u32>,
) -> Result<WeatherSnapshot, NormalizeError> {
    let current = raw
        .current
        .as_ref()
        .ok_or_else(|| NormalizeError::missing("current"))?;
    let hourly = raw
        .hourly
        .as_ref()
        .ok_or_else(|| NormalizeError::missing("hourly"))?;

    if hourly.time.len() != hourly.temperature_2m.len()
        || hourly.time.len() != hourly.weather_code.len()
    {
        return Err(NormalizeError::missing("hourly.weather_code"));
    }

    let now = parse_local_time(&current.time)
        .ok_or_else(|| NormalizeError::missing("current.time"))?;
    let current_hour = now.hour();

    // Hourly series starts at local midnight; drop everything before the
    // hour containing "now". ISO timestamps compare correctly as strings.
    let hour_floor = format!(
        "{}T{:02}:00",
        current.time.split('T').next().unwrap_or_default(),
        current_hour
    );
    let start = hourly
        .time
        .iter()
        .position(|t| t.as_str() >= hour_floor.as_str())
        .unwrap_or(0);

    let readings = hourly.temperature_2m[start..]
        .iter()
        .zip(&hourly.weather_code[start..])
        .map(|(&temp, &weather_code)| WeatherReading { temp, weather_code })
        .collect();

    Ok(WeatherSnapshot {
        location: request.location.clone(),
        country_code: request.country_code.or_else(|| {
            place
                .country_code
                .as_deref()
                .and_then(Country::from_code)
        }),
        units: request.units.unwrap_or(Units::Metric),
        current_hour,
        current_date: now.date(),
        current: WeatherReading {
            temp: current.temperature_2m,
            weather_code: current.weather_code,
        },
        hourly: readings,
        forecast_days,
    })
}

fn parse_local_time(value: &str) -> Option<PrimitiveDateTime> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    PrimitiveDateTime::parse(value, format).ok()
}

/// Raw Open-Meteo response structures.
mod raw {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Geocoding {
        pub results: Option<Vec<GeoResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeoResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country_code: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Forecast {
        pub current: Option<Current>,
        pub hourly: Option<Hourly>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        pub time: String,
        pub temperature_2m: f64,
        pub weather_code: u16,
    }

    #[derive(Debug, Deserialize)]
    pub struct Hourly {
        pub time: Vec<String>,
        pub temperature_2m: Vec<f64>,
        pub weather_code: Vec<u16>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::num::NonZeroU32;

    fn place() -> raw::GeoResult {
        raw::GeoResult {
            name: "London".into(),
            latitude: 51.5,
            longitude: -0.12,
            country_code: Some("GB".into()),
        }
    }

    #[test]
    fn forecast_params_omit_unset_modifiers() {
        let params = forecast_params(&place(), None, None);
        let names: Vec<_> = params.iter().map(|(k, _)| *k).collect();

        assert!(!names.contains(&"temperature_unit"));
        assert!(!names.contains(&"forecast_days"));
        assert!(names.contains(&"latitude"));
        assert!(names.contains(&"current"));
    }

    #[test]
    fn imperial_units_request_fahrenheit() {
        let params = forecast_params(&place(), Some(Units::Imperial), None);
        assert!(params.contains(&("temperature_unit", "fahrenheit".to_string())));
    }

    #[test]
    fn metric_units_rely_on_provider_default() {
        let params = forecast_params(&place(), Some(Units::Metric), None);
        assert!(params.iter().all(|(k, _)| *k != "temperature_unit"));
    }

    #[test]
    fn forecast_days_sent_only_when_set() {
        let params = forecast_params(&place(), None, Some(5));
        assert!(params.contains(&("forecast_days", "5".to_string())));
    }

    #[test]
    fn geocoding_filter_prefers_requested_country() {
        let raw: raw::Geocoding = serde_json::from_value(json!({
            "results": [
                { "name": "London", "latitude": 42.98, "longitude": -81.24, "country_code": "CA" },
                { "name": "London", "latitude": 51.5, "longitude": -0.12, "country_code": "GB" }
            ]
        }))
        .unwrap();

        let hit = pick_geocoding_match(raw, Some(Country::GB)).unwrap();
        assert_eq!(hit.country_code.as_deref(), Some("GB"));
    }

    #[test]
    fn geocoding_without_filter_takes_first() {
        let raw: raw::Geocoding = serde_json::from_value(json!({
            "results": [
                { "name": "London", "latitude": 42.98, "longitude": -81.24, "country_code": "CA" },
                { "name": "London", "latitude": 51.5, "longitude": -0.12, "country_code": "GB" }
            ]
        }))
        .unwrap();

        let hit = pick_geocoding_match(raw, None).unwrap();
        assert_eq!(hit.country_code.as_deref(), Some("CA"));
    }

    #[test]
    fn geocoding_no_results_is_none() {
        let raw: raw::Geocoding = serde_json::from_value(json!({})).unwrap();
        assert!(pick_geocoding_match(raw, None).is_none());
    }

    fn sample_forecast() -> raw::Forecast {
        serde_json::from_value(json!({
            "current": {
                "time": "2026-08-06T14:15",
                "temperature_2m": 21.4,
                "weather_code": 3
            },
            "hourly": {
                "time": (0..24).map(|h| format!("2026-08-06T{h:02}:00")).collect::<Vec<_>>(),
                "temperature_2m": (0..24).map(f64::from).collect::<Vec<_>>(),
                "weather_code": vec![1u16; 24]
            }
        }))
        .unwrap()
    }

    #[test]
    fn normalize_anchors_hourly_at_current_hour() {
        let request = WeatherRequest::new("London");
        let snapshot = normalize(&sample_forecast(), &place(), &request, None).unwrap();

        assert_eq!(snapshot.current_hour, 14);
        assert_eq!(snapshot.hourly.len(), 10);
        // First remaining reading is the 14:00 slot.
        assert!((snapshot.hourly[0].temp - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_carries_request_identity() {
        let request = WeatherRequest::new("London")
            .with_country_code(Country::GB)
            .with_units(Units::Imperial);
        let snapshot = normalize(&sample_forecast(), &place(), &request, Some(3)).unwrap();

        assert_eq!(snapshot.location, "London");
        assert_eq!(snapshot.country_code, Some(Country::GB));
        assert_eq!(snapshot.units, Units::Imperial);
        assert_eq!(snapshot.forecast_days, Some(3));
        assert_eq!(snapshot.current.weather_code, 3);
    }

    #[test]
    fn geocoder_country_backfills_when_request_has_none() {
        let request = WeatherRequest::new("London");
        let snapshot = normalize(&sample_forecast(), &place(), &request, None).unwrap();
        assert_eq!(snapshot.country_code, Some(Country::GB));
    }

    #[test]
    fn missing_current_block_fails_normalization() {
        let raw: raw::Forecast = serde_json::from_value(json!({
            "hourly": { "time": [], "temperature_2m": [], "weather_code": [] }
        }))
        .unwrap();

        let err = normalize(&raw, &place(), &WeatherRequest::new("x"), None).unwrap_err();
        assert_eq!(err, NormalizeError::missing("current"));
    }

    #[test]
    fn mismatched_hourly_arrays_fail_normalization() {
        let raw: raw::Forecast = serde_json::from_value(json!({
            "current": { "time": "2026-08-06T00:00", "temperature_2m": 1.0, "weather_code": 0 },
            "hourly": {
                "time": ["2026-08-06T00:00", "2026-08-06T01:00"],
                "temperature_2m": [1.0, 2.0],
                "weather_code": [0]
            }
        }))
        .unwrap();

        assert!(normalize(&raw, &place(), &WeatherRequest::new("x"), None).is_err());
    }

    #[test]
    fn forecast_uses_request_horizon() {
        let req = WeatherRequest::new("Oslo").with_forecast_days(NonZeroU32::new(5).unwrap());
        assert_eq!(req.forecast_days.map(NonZeroU32::get), Some(5));
    }
}
