//! Action invocation.
//!
//! The [`ActionInvoker`] trait is the seam between the runner and the
//! outside world: one call per action, no retries, and a single uniform
//! failure shape. [`HttpInvoker`] is the live implementation routing each
//! action descriptor to its provider adapter; tests drive the runner with
//! mock invokers instead.

use async_trait::async_trait;
use log::debug;

use crate::providers::{BraveSearchProvider, OpenMeteoProvider};
use crate::types::{Action, ActionOutput, InvocationError};

/// Routes a typed action to a provider and returns its canonical output.
#[async_trait]
pub trait ActionInvoker: Send + Sync {
    /// Perform a single attempt at the action.
    ///
    /// # Errors
    /// Returns [`InvocationError`] for both non-success HTTP statuses and
    /// transport/parse failures; callers handle one shape.
    async fn invoke(&self, action: &Action) -> Result<ActionOutput, InvocationError>;
}

/// Live invoker backed by the HTTP provider adapters.
///
/// Both adapters share one [`reqwest::Client`]; no timeout is configured
/// beyond what the transport enforces by default.
#[derive(Clone)]
pub struct HttpInvoker {
    search: BraveSearchProvider,
    weather: OpenMeteoProvider,
}

impl Default for HttpInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpInvoker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Build an invoker whose adapters share the given client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            search: BraveSearchProvider::with_client(client.clone()),
            weather: OpenMeteoProvider::with_client(client),
        }
    }
}

#[async_trait]
impl ActionInvoker for HttpInvoker {
    async fn invoke(&self, action: &Action) -> Result<ActionOutput, InvocationError> {
        debug!("invoking {} action", action.kind());
        match action {
            Action::WebSearch(request) => {
                let results = self.search.search(request).await?;
                Ok(ActionOutput::Search {
                    query: request.query.clone(),
                    results,
                })
            }
            Action::CurrentWeather(request) => {
                let snapshot = self.weather.current_weather(request).await?;
                Ok(ActionOutput::Weather(snapshot))
            }
            Action::WeatherForecast(request) => {
                let snapshot = self.weather.forecast(request).await?;
                Ok(ActionOutput::Weather(snapshot))
            }
        }
    }
}
