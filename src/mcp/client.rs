// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! HTTP client side of the bridge protocol. One shared `reqwest` client per
//! adapter process; every MCP tool call maps to exactly one request here.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::bridge::{DEFAULT_HOST, DEFAULT_PORT};
use crate::command::{CommandRequest, StatusReply, StopReply};

pub const HOST_ENV: &str = "MINDBRIDGE_HOST";
pub const PORT_ENV: &str = "MINDBRIDGE_PORT";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BridgeClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug)]
pub enum ClientError {
    Config {
        name: &'static str,
        value: String,
    },
    Build {
        source: reqwest::Error,
    },
    Transport {
        url: String,
        source: reqwest::Error,
    },
    InvalidReply {
        url: String,
        source: reqwest::Error,
    },
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    /// The bridge answered, but the reply body carries an `error` field.
    Bridge {
        message: String,
        body: Value,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { name, value } => write!(f, "invalid {name}: {value}"),
            Self::Build { .. } => f.write_str("failed to build the HTTP client"),
            Self::Transport { url, .. } => write!(f, "request to {url} failed"),
            Self::InvalidReply { url, .. } => write!(f, "unreadable reply from {url}"),
            Self::UnexpectedStatus { url, status, body } => {
                write!(f, "unexpected status {status} from {url}: {body}")
            }
            Self::Bridge { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Build { source }
            | Self::Transport { source, .. }
            | Self::InvalidReply { source, .. } => Some(source),
            Self::Config { .. } | Self::UnexpectedStatus { .. } | Self::Bridge { .. } => None,
        }
    }
}

impl BridgeClient {
    pub fn new(host: &str, port: u16) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Build { source })?;
        Ok(Self {
            base_url: format!("http://{host}:{port}"),
            client,
        })
    }

    /// Bridge location from `MINDBRIDGE_HOST` / `MINDBRIDGE_PORT`, falling
    /// back to the compiled-in defaults. A present but unparsable port is an
    /// error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ClientError> {
        let host = std::env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_owned());
        let port = match std::env::var(PORT_ENV) {
            Ok(value) => value.parse::<u16>().map_err(|_| ClientError::Config {
                name: PORT_ENV,
                value,
            })?,
            Err(_) => DEFAULT_PORT,
        };
        Self::new(&host, port)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn status(&self) -> Result<StatusReply, ClientError> {
        let url = format!("{}/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        self.read_reply(&url, response).await
    }

    /// Sends one command to `POST /execute` and returns the raw success body.
    /// A body carrying `error` comes back as [`ClientError::Bridge`] with the
    /// full body attached, so callers can relay extra fields like
    /// `available_commands` or `child_count`.
    pub async fn execute(&self, command: &str, params: Value) -> Result<Value, ClientError> {
        let url = format!("{}/execute", self.base_url);
        debug!("-> {command}");
        let request = CommandRequest::new(command, params);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        let body: Value = self.read_reply(&url, response).await?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(ClientError::Bridge {
                message: message.to_owned(),
                body,
            });
        }
        Ok(body)
    }

    pub async fn stop(&self) -> Result<StopReply, ClientError> {
        let url = format!("{}/stop", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        self.read_reply(&url, response).await
    }

    async fn read_reply<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                url: url.to_owned(),
                status,
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::InvalidReply {
                url: url.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_carries_host_and_port() {
        let client = BridgeClient::new("localhost", 9000).expect("client");
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn transport_errors_name_the_url() {
        let err = ClientError::Bridge {
            message: "Node not found: ID_9".to_owned(),
            body: serde_json::json!({ "error": "Node not found: ID_9" }),
        };
        assert_eq!(err.to_string(), "Node not found: ID_9");

        let err = ClientError::Config {
            name: PORT_ENV,
            value: "eight".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid MINDBRIDGE_PORT: eight");
    }
}
