//! Request construction, retry policy and response mapping
//!
//! Shared by the blocking and async clients. Nothing here performs I/O: the
//! clients send an [`ApiRequest`] with their own reqwest flavour, classify
//! each failed attempt as an [`AttemptError`], and ask the [`RetryPolicy`]
//! whether to try again.

use std::time::Duration;

use reqwest::Method;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::error::{BoardError, Result};
use crate::models::{timestamp_from_value, BountyStatus};

pub const USER_AGENT: &str = concat!("owockibot-rs/", env!("CARGO_PKG_VERSION"));

/// Well-known metadata document describing the API
pub const DISCOVERY_PATH: &str = "/.well-known/bounty-board.json";

/// A single call against the board API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Claims and submissions change board state and are not safe to replay
    pub fn is_idempotent(&self) -> bool {
        self.method == Method::GET
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }

    /// GET /bounties, with the filters passed through as query parameters
    pub fn list_bounties(status: Option<&BountyStatus>, tags: &[String]) -> Self {
        let mut req = Self::get("/bounties");
        if let Some(status) = status {
            req = req.param("status", status.as_str());
        }
        if !tags.is_empty() {
            req = req.param("tags", tags.join(","));
        }
        req
    }

    pub fn get_bounty(id: &str) -> Self {
        Self::get(bounty_path(id, ""))
    }

    pub fn claim_bounty(id: &str, wallet: &str) -> Self {
        Self::post(bounty_path(id, "/claim"), json!({ "address": wallet }))
    }

    pub fn submit_bounty(id: &str, wallet: &str, submission: &str, proof: Option<&str>) -> Self {
        let mut body = json!({
            "address": wallet,
            "submission": submission,
        });
        if let Some(proof) = proof.filter(|p| !p.is_empty()) {
            body["proof"] = Value::String(proof.to_string());
        }
        Self::post(bounty_path(id, "/submit"), body)
    }

    pub fn stats() -> Self {
        Self::get("/stats")
    }

    pub fn discovery() -> Self {
        Self::get(DISCOVERY_PATH)
    }
}

fn bounty_path(id: &str, suffix: &str) -> String {
    format!("/bounties/{}{}", urlencoding::encode(id), suffix)
}

/// Pick the explicit wallet, else the configured default
pub fn resolve_wallet<'a>(explicit: Option<&'a str>, default: Option<&'a str>) -> Result<&'a str> {
    explicit
        .filter(|w| !w.trim().is_empty())
        .or(default.filter(|w| !w.trim().is_empty()))
        .ok_or(BoardError::MissingWallet)
}

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptError {
    /// The connection was never established, so the server saw nothing
    Connect(String),
    /// Sent, but no complete response arrived (timeout, dropped body)
    Transport(String),
    /// The server answered; the mapped error
    Response(BoardError),
}

impl AttemptError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() {
            AttemptError::Connect(err.to_string())
        } else {
            AttemptError::Transport(err.to_string())
        }
    }

    pub fn into_board_error(self) -> BoardError {
        match self {
            AttemptError::Connect(msg) | AttemptError::Transport(msg) => BoardError::Request(msg),
            AttemptError::Response(err) => err,
        }
    }

    /// Connect failures are always safe to retry. Anything that may have
    /// reached the server is retried only for idempotent requests.
    pub fn is_retryable(&self, idempotent: bool) -> bool {
        match self {
            AttemptError::Connect(_) => true,
            AttemptError::Transport(_) => idempotent,
            AttemptError::Response(err) => idempotent && err.is_retryable(),
        }
    }
}

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay)
    }

    /// At least one attempt is always made
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before another attempt, or `None` if `err` must be surfaced.
    /// `attempt` is 1-based.
    pub fn backoff(&self, attempt: u32, err: &AttemptError, idempotent: bool) -> Option<Duration> {
        if attempt >= self.attempts() || !err.is_retryable(idempotent) {
            return None;
        }
        Some(self.delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Map a raw HTTP response to its JSON body or a typed error
pub fn map_response(status: u16, body: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        return Err(map_error(status, body));
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| BoardError::decode(format!("invalid JSON: {}", e)))
}

/// Error bodies look like `{"error": "..."}`, sometimes with extra context
/// such as `claimedBy`/`claimedAt` on conflicts.
pub fn map_error(status: u16, body: &str) -> BoardError {
    let data: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let message = data
        .get("error")
        .or_else(|| data.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            let text = body.trim();
            if text.is_empty() {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text.to_string()
            }
        });

    match status {
        409 if message.to_lowercase().contains("claimed") => BoardError::AlreadyClaimed {
            claimed_by: data
                .get("claimedBy")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            claimed_at: data
                .get("claimedAt")
                .and_then(|v| timestamp_from_value(v).ok().flatten()),
        },
        404 => BoardError::NotFound { message },
        _ => BoardError::Api { status, message },
    }
}
