//! Assistant Actions - action dispatch and dual-state synchronization for
//! conversational assistants.
//!
//! This crate lets a conversational interface answer user requests
//! ("weather in X", "search for Y") by invoking external HTTP APIs,
//! normalizing their responses into a stable internal schema, and producing
//! an interactive result card whose follow-up triggers re-enter the same
//! pipeline. Every action updates two logically separate state slices - the
//! append-only conversation log and the mutable agent context - through one
//! synchronizer that keeps them from diverging.
//!
//! # Example
//!
//! ```ignore
//! use assistant_actions::{
//!     Action, ActionRunner, HttpInvoker, InMemoryContext, InMemoryConversation, WeatherRequest,
//! };
//! use std::sync::Arc;
//!
//! let runner = ActionRunner::new(
//!     Arc::new(HttpInvoker::new()),
//!     Arc::new(InMemoryConversation::new()),
//!     Arc::new(InMemoryContext::new()),
//! );
//!
//! let entry = runner
//!     .run_action(Action::CurrentWeather(WeatherRequest::new("New York")))
//!     .await?;
//! println!("{}", entry.render());
//! ```

#![forbid(unsafe_code)]

mod card;
mod config;
mod invoker;
pub mod providers;
mod request;
mod runner;
mod stores;
mod types;

pub use card::{ConversationEntry, EntryBody, FollowUp, HourSlot, ResultCard};
pub use config::{SEARCH_TOKEN_VAR, search_token};
pub use invoker::{ActionInvoker, HttpInvoker};
pub use request::{Country, Freshness, SearchRequest, Units, WeatherRequest};
pub use runner::{ActionRunner, TriggerOutcome};
pub use stores::{
    AgentContext, ContextStore, ConversationStore, InMemoryContext, InMemoryConversation,
};
pub use types::{
    Action, ActionKind, ActionOutput, InvocationError, NormalizeError, SearchResultItem,
    WeatherReading, WeatherSnapshot,
};
