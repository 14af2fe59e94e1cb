//! Brave Search adapter.
//!
//! Builds the outbound query, performs the call, and maps the provider's
//! `web.results[]` shape onto [`SearchResultItem`]. Optional modifiers the
//! caller did not set are omitted from the query entirely so the provider's
//! own defaults govern.

use log::debug;
use serde_json::Value;

use crate::config;
use crate::request::SearchRequest;
use crate::types::{InvocationError, NormalizeError, SearchResultItem};

const SEARCH_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

/// Result count sent when the caller leaves `count` unset.
const DEFAULT_COUNT: u32 = 5;

/// Brave Search API adapter.
///
/// Requires a subscription token in the environment (see
/// [`config::SEARCH_TOKEN_VAR`]); the token is read per call, not cached.
#[derive(Clone)]
pub struct BraveSearchProvider {
    client: reqwest::Client,
}

impl Default for BraveSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BraveSearchProvider {
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

    /// Execute a search and return canonical results, bounded by the
    /// requested count.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Http`] on a non-success status and
    /// [`InvocationError::Transport`] on network/parse/normalization
    /// failure. Single attempt, no retries.
    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResultItem>, InvocationError> {
        let params = query_params(request);
        debug!(
            "dispatching search call (query={}, params={})",
            request.query,
            params.len()
        );

        // The client negotiates `Accept-Encoding: gzip` itself; setting the
        // header by hand would bypass reqwest's transparent decompression.
        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", config::search_token())
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

        let raw: Value = response
            .json()
            .await
            .map_err(InvocationError::transport)?;

        normalize(&raw, result_limit(request)).map_err(InvocationError::from)
    }
}

/// The outbound query for a request, in wire order.
///
/// `q`, `text_decorations=0` and `count` are always present; every other
/// parameter appears only when the caller supplied it - never as an empty
/// value.
pub(crate) fn query_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", request.query.clone()),
        ("text_decorations", "0".to_string()),
        ("count", result_limit(request).to_string()),
    ];
    if let Some(country) = request.country {
        params.push(("country", country.as_code().to_string()));
    }
    if let Some(freshness) = request.freshness {
        // Short code only; the long form never crosses the wire.
        params.push(("freshness", freshness.short_code().to_string()));
    }
    if let Some(units) = request.units {
        params.push(("units", units.as_str().to_string()));
    }
    params
}

fn result_limit(request: &SearchRequest) -> u32 {
    request.count.map_or(DEFAULT_COUNT, std::num::NonZeroU32::get)
}

/// Map the provider response onto canonical records.
///
/// `web.results` is required; within each result `title` and `url` are
/// required, `description` defaults to empty, and the nested optionals
/// (`page_age`, `profile.name`, `thumbnail.src`) map to `None` when absent.
pub(crate) fn normalize(
    raw: &Value,
    limit: u32,
) -> Result<Vec<SearchResultItem>, NormalizeError> {
    let results = raw
        .pointer("/web/results")
        .and_then(Value::as_array)
        .ok_or_else(|| NormalizeError::missing("web.results"))?;

    results
        .iter()
        .take(limit as usize)
        .map(normalize_item)
        .collect()
}

fn normalize_item(raw: &Value) -> Result<SearchResultItem, NormalizeError> {
    let field = |name: &str| raw.get(name).and_then(Value::as_str).map(str::to_string);

    Ok(SearchResultItem {
        title: field("title").ok_or_else(|| NormalizeError::missing("web.results[].title"))?,
        url: field("url").ok_or_else(|| NormalizeError::missing("web.results[].url"))?,
        description: field("description").unwrap_or_default(),
        published_date: field("page_age"),
        author: raw
            .pointer("/profile/name")
            .and_then(Value::as_str)
            .map(str::to_string),
        image_url: raw
            .pointer("/thumbnail/src")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Country, Freshness, Units};
    use serde_json::json;
    use std::num::NonZeroU32;

    #[test]
    fn bare_request_sends_only_fixed_parameters() {
        let params = query_params(&SearchRequest::new("weather today"));

        assert_eq!(
            params,
            vec![
                ("q", "weather today".to_string()),
                ("text_decorations", "0".to_string()),
                ("count", "5".to_string()),
            ]
        );
    }

    #[test]
    fn no_parameter_is_ever_empty() {
        let req = SearchRequest::new("x")
            .with_country(Country::JP)
            .with_freshness(Freshness::PastYear)
            .with_units(Units::Metric);

        for (name, value) in query_params(&req) {
            assert!(!value.is_empty(), "parameter {name} was empty");
        }
    }

    #[test]
    fn freshness_goes_upstream_as_short_code() {
        let req = SearchRequest::new("x").with_freshness(Freshness::PastWeek);
        let params = query_params(&req);

        let freshness = params.iter().find(|(k, _)| *k == "freshness").unwrap();
        assert_eq!(freshness.1, "pw");
        assert!(params.iter().all(|(_, v)| v != "past-week"));
    }

    #[test]
    fn explicit_count_overrides_default() {
        let req = SearchRequest::new("x").with_count(NonZeroU32::new(12).unwrap());
        let params = query_params(&req);

        let count = params.iter().find(|(k, _)| *k == "count").unwrap();
        assert_eq!(count.1, "12");
    }

    fn sample_response() -> Value {
        json!({
            "web": {
                "results": [
                    {
                        "title": "First",
                        "url": "https://example.com/1",
                        "description": "A result",
                        "page_age": "2026-07-01T00:00:00",
                        "profile": { "name": "Example" },
                        "thumbnail": { "src": "https://img.example.com/1.png" }
                    },
                    {
                        "title": "Second",
                        "url": "https://example.com/2"
                    }
                ]
            }
        })
    }

    #[test]
    fn normalize_maps_all_fields() {
        let items = normalize(&sample_response(), 5).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First");
        assert_eq!(items[0].url, "https://example.com/1");
        assert_eq!(items[0].description, "A result");
        assert_eq!(items[0].published_date.as_deref(), Some("2026-07-01T00:00:00"));
        assert_eq!(items[0].author.as_deref(), Some("Example"));
        assert_eq!(
            items[0].image_url.as_deref(),
            Some("https://img.example.com/1.png")
        );
    }

    #[test]
    fn missing_optionals_map_to_none_not_failure() {
        let items = normalize(&sample_response(), 5).unwrap();

        assert_eq!(items[1].description, "");
        assert!(items[1].published_date.is_none());
        assert!(items[1].author.is_none());
        assert!(items[1].image_url.is_none());
    }

    #[test]
    fn order_is_preserved_and_bounded_by_count() {
        let raw = json!({
            "web": { "results": (0..10).map(|i| json!({
                "title": format!("r{i}"),
                "url": format!("https://example.com/{i}")
            })).collect::<Vec<_>>() }
        });

        let items = normalize(&raw, 3).unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["r0", "r1", "r2"]);
    }

    #[test]
    fn missing_results_is_a_normalization_failure() {
        let err = normalize(&json!({ "query": {} }), 5).unwrap_err();
        assert_eq!(err, NormalizeError::missing("web.results"));
    }

    #[test]
    fn missing_title_is_a_normalization_failure() {
        let raw = json!({
            "web": { "results": [ { "url": "https://example.com" } ] }
        });
        let err = normalize(&raw, 5).unwrap_err();
        assert!(err.field.contains("title"));
    }
}
