//! The request being served by the current bootstrap.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One incoming host request, as seen by the embedded framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique id of this request, used to correlate logs and reports.
    pub id: Uuid,
    /// When the request was received.
    pub received_at: DateTime<Utc>,
    /// Host command the request was routed with, if any.
    pub command: Option<String>,
    /// Query and form parameters.
    pub params: BTreeMap<String, String>,
}

impl Request {
    /// Creates a request without parameters.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            command: None,
            params: BTreeMap::new(),
        }
    }

    /// Creates a request from `key=value` parameter pairs.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::new();
        request.params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        request
    }

    /// Sets the host command.
    pub fn with_command(mut self, command: &str) -> Self {
        self.command = Some(command.to_string());
        self
    }

    /// Returns the host command.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Adds a parameter.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Returns a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
