// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway credential configuration from the environment.
//!
//! All runtime environment variables used by the operator are defined here
//! with typed accessor functions. A missing required variable fails the one
//! synchronization attempt it was needed for, never the process.

use thiserror::Error;

/// Environment variable names.
pub mod vars {
    pub const ENDPOINT: &str = "GATESYNC_ENDPOINT";
    pub const USERNAME: &str = "GATESYNC_USERNAME";
    pub const PASSWORD: &str = "GATESYNC_PASSWORD";
    pub const SOURCE: &str = "GATESYNC_SOURCE";
    pub const INSECURE: &str = "GATESYNC_INSECURE";
}

/// Default authentication data source within the gateway.
const DEFAULT_SOURCE: &str = "postgresql";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Credential bundle for one gateway instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the gateway REST API.
    pub endpoint: String,
    /// Account the operator authenticates as.
    pub username: String,
    /// Password for the operator account.
    pub password: String,
    /// Authentication data source holding the managed objects.
    pub source: String,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

impl Config {
    /// Loads the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            endpoint: require(vars::ENDPOINT)?,
            username: require(vars::USERNAME)?,
            password: require(vars::PASSWORD)?,
            source: env_or_default(vars::SOURCE, DEFAULT_SOURCE),
            insecure: env_flag(vars::INSECURE),
        })
    }
}

/// Returns the value of a required environment variable.
fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Returns the value of an environment variable or the default value.
fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Returns `true` if the variable is set to `1` or `true`.
fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
