//! Process-wide configuration.

use std::env::{self, VarError};

/// Environment variable holding the search subscription token.
pub const SEARCH_TOKEN_VAR: &str = "BRAVE_SEARCH_API_KEY";

/// Read the search subscription token from the environment.
///
/// Read at call time rather than cached at startup, so token rotation takes
/// effect without a restart. An unset variable yields the empty string: the
/// credential is still sent and the provider rejects it upstream - an unset
/// token is not a local fault.
#[must_use]
pub fn search_token() -> String {
    token_or_empty(env::var(SEARCH_TOKEN_VAR))
}

fn token_or_empty(var: Result<String, VarError>) -> String {
    var.unwrap_or_default()
}
