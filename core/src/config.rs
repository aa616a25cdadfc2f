//! Client configuration and the immutable header sets derived from it.
//!
//! # Design
//! Configuration is read once (normally from the environment) and turned
//! into `RequestHeaders`, which every request builder borrows. Nothing here
//! is mutated after construction.

use std::env;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://cloud.culturedcode.com/version/1";

pub const ENV_BASE_URL: &str = "TODO_SYNC_BASE_URL";
pub const ENV_ACCOUNT: &str = "TODO_SYNC_ACCOUNT";
pub const ENV_APP_ID: &str = "TODO_SYNC_APP_ID";
pub const ENV_USER_AGENT: &str = "TODO_SYNC_USER_AGENT";

const SCHEMA_VERSION: &str = "301";
const PUSH_PRIORITY: &str = "5";

/// Account and application identity for one cloud endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub account: String,
    pub app_id: String,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(account: &str, app_id: &str, user_agent: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account: account.to_string(),
            app_id: app_id.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Point the client at a different server, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from `TODO_SYNC_*` environment variables.
    ///
    /// Account, app id and user agent are required; the base URL falls back
    /// to the production endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };
        let config = Self::new(
            &required(ENV_ACCOUNT)?,
            &required(ENV_APP_ID)?,
            &required(ENV_USER_AGENT)?,
        );
        Ok(match lookup(ENV_BASE_URL) {
            Some(url) => config.with_base_url(&url),
            None => config,
        })
    }

    /// `host[:port]` part of `base_url`, sent as the `Host` header.
    pub fn host(&self) -> Result<&str, ConfigError> {
        let rest = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest);
        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(host)
    }
}

/// Header sets for the two kinds of request, built once per client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    read: Vec<(String, String)>,
    commit: Vec<(String, String)>,
}

impl RequestHeaders {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let read: Vec<(String, String)> = [
            ("Accept", "application/json"),
            ("Accept-Charset", "UTF-8"),
            ("Accept-Language", "en-gb"),
            ("Host", config.host()?),
            ("User-Agent", config.user_agent.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut commit = read.clone();
        commit.extend(
            [
                ("Schema", SCHEMA_VERSION.to_string()),
                ("Content-Type", "application/json; charset=UTF-8".to_string()),
                ("App-Id", config.app_id.clone()),
                ("App-Instance-Id", format!("-{}", config.app_id)),
                ("Push-Priority", PUSH_PRIORITY.to_string()),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v)),
        );

        Ok(Self { read, commit })
    }

    /// Headers sent with history reads.
    pub fn read(&self) -> &[(String, String)] {
        &self.read
    }

    /// Headers sent with commits: the read set plus schema and app identity.
    pub fn commit(&self) -> &[(String, String)] {
        &self.commit
    }
}
