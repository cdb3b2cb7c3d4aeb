//! Blocking client for the owockibot Bounty Board API
//!
//! One call at a time per instance. Do not use from inside an async runtime;
//! use [`crate::AsyncBountyClient`] there.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{BoardError, Result};
use crate::models::{ApiDiscovery, Bounty, BountyStatus, ClaimResult, Stats, SubmitResult};
use crate::transport::{
    map_response, resolve_wallet, ApiRequest, AttemptError, RetryPolicy, USER_AGENT,
};

/// Blocking bounty board client
///
/// ```no_run
/// use owockibot::{BountyClient, ClientConfig};
///
/// let client = BountyClient::new(ClientConfig::default().with_wallet("0x..."));
/// for bounty in client.discover(&[])? {
///     println!("{}: {}", bounty.title, bounty.reward_formatted());
/// }
/// # Ok::<(), owockibot::BoardError>(())
/// ```
pub struct BountyClient {
    http: Client,
    config: ClientConfig,
    retry: RetryPolicy,
}

impl BountyClient {
    pub fn new(config: ClientConfig) -> Self {
        // Build HTTP client with timeout, falling back to default client if builder fails
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            retry: RetryPolicy::from_config(&config),
            config,
        }
    }

    /// Client for the public board using config.toml and `OWOCKIBOT_*` overrides
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(ClientConfig::load()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn send_once(&self, req: &ApiRequest) -> std::result::Result<Value, AttemptError> {
        let mut builder = self
            .http
            .request(req.method.clone(), req.url(&self.config.base_url))
            .header(ACCEPT, "application/json");
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(AttemptError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(AttemptError::from_reqwest)?;
        map_response(status, &body).map_err(AttemptError::Response)
    }

    fn execute(&self, req: &ApiRequest) -> Result<Value> {
        retry_blocking(&self.retry, req.is_idempotent(), |attempt| {
            debug!(
                "{} {} (attempt {}/{})",
                req.method.as_str(),
                req.path,
                attempt,
                self.retry.attempts()
            );
            self.send_once(req)
        })
    }

    /// List bounties, optionally filtered by status and tags (any tag matches)
    pub fn list_bounties(&self, status: Option<BountyStatus>, tags: &[String]) -> Result<Vec<Bounty>> {
        let data = self.execute(&ApiRequest::list_bounties(status.as_ref(), tags))?;
        let bounties = Bounty::list_from_json(data)?;
        Ok(filter_bounties(bounties, status.as_ref(), tags))
    }

    pub fn get_bounty(&self, bounty_id: &str) -> Result<Bounty> {
        Bounty::from_json(self.execute(&ApiRequest::get_bounty(bounty_id))?)
    }

    /// Claim a bounty for `wallet_address` or the configured default wallet.
    ///
    /// Fails with [`BoardError::AlreadyClaimed`] when another wallet holds
    /// the claim. Claiming again with the same wallet succeeds.
    pub fn claim_bounty(&self, bounty_id: &str, wallet_address: Option<&str>) -> Result<ClaimResult> {
        let wallet = resolve_wallet(wallet_address, self.config.wallet_address.as_deref())?;
        let result = self.execute(&ApiRequest::claim_bounty(bounty_id, wallet));
        settle_claim(bounty_id, wallet, result)
    }

    /// Submit work for a bounty claimed by `wallet_address` (or the default)
    pub fn submit_bounty(
        &self,
        bounty_id: &str,
        submission: &str,
        proof: Option<&str>,
        wallet_address: Option<&str>,
    ) -> Result<SubmitResult> {
        let wallet = resolve_wallet(wallet_address, self.config.wallet_address.as_deref())?;
        let req = ApiRequest::submit_bounty(bounty_id, wallet, submission, proof);
        SubmitResult::from_json(self.execute(&req)?)
    }

    pub fn get_stats(&self) -> Result<Stats> {
        Stats::from_json(self.execute(&ApiRequest::stats())?)
    }

    /// Open bounties, optionally restricted to `tags`
    pub fn discover(&self, tags: &[String]) -> Result<Vec<Bounty>> {
        self.list_bounties(Some(BountyStatus::Open), tags)
    }

    /// API metadata document, if the board publishes one
    pub fn discovery_document(&self) -> Result<Option<ApiDiscovery>> {
        match self.execute(&ApiRequest::discovery()) {
            Ok(data) => ApiDiscovery::from_json(data).map(Some),
            Err(BoardError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Run `attempt` under `policy`, sleeping the current thread between tries
pub fn retry_blocking<T>(
    policy: &RetryPolicy,
    idempotent: bool,
    mut attempt: impl FnMut(u32) -> std::result::Result<T, AttemptError>,
) -> Result<T> {
    let mut n = 1;
    loop {
        match attempt(n) {
            Ok(value) => return Ok(value),
            Err(err) => match policy.backoff(n, &err, idempotent) {
                Some(delay) => {
                    warn!("Attempt {} failed, retrying in {:?}: {:?}", n, delay, err);
                    sleep(delay);
                    n += 1;
                }
                None => return Err(err.into_board_error()),
            },
        }
    }
}

fn sleep(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

/// Apply the list filters locally: exact status, and tags with OR semantics
pub(crate) fn filter_bounties(
    bounties: Vec<Bounty>,
    status: Option<&BountyStatus>,
    tags: &[String],
) -> Vec<Bounty> {
    bounties
        .into_iter()
        .filter(|b| status.map_or(true, |s| &b.status == s))
        .filter(|b| tags.is_empty() || b.has_any_tag(tags))
        .collect()
}

/// A conflict naming our own wallet means the claim already holds
pub(crate) fn settle_claim(bounty_id: &str, wallet: &str, result: Result<Value>) -> Result<ClaimResult> {
    match result {
        Ok(data) => ClaimResult::from_json(data),
        Err(BoardError::AlreadyClaimed {
            claimed_by,
            claimed_at: Some(claimed_at),
        }) if claimed_by.eq_ignore_ascii_case(wallet) => {
            info!("Bounty {} already claimed by this wallet", bounty_id);
            Ok(ClaimResult {
                id: bounty_id.to_string(),
                status: BountyStatus::Claimed,
                claimed_by,
                claimed_at,
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn bounty(id: &str, status: &str, tags: &[&str]) -> Bounty {
        Bounty::from_json(json!({ "id": id, "status": status, "tags": tags })).unwrap()
    }

    #[test]
    fn test_retry_fails_twice_then_succeeds() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;

        let result = retry_blocking(&policy, true, |_| {
            calls += 1;
            if calls < 3 {
                Err(AttemptError::Transport("timed out".into()))
            } else {
                Ok("ok")
            }
        });

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_retry_gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let mut calls = 0;

        let result: Result<()> = retry_blocking(&policy, true, |_| {
            calls += 1;
            Err(AttemptError::Response(BoardError::api(503, "unavailable")))
        });

        assert_eq!(result.unwrap_err(), BoardError::api(503, "unavailable"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_retry_surfaces_conflict_immediately() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;

        let result: Result<()> = retry_blocking(&policy, false, |_| {
            calls += 1;
            Err(AttemptError::Response(BoardError::AlreadyClaimed {
                claimed_by: "0xother".into(),
                claimed_at: None,
            }))
        });

        assert!(result.unwrap_err().is_already_claimed());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_filter_bounties() {
        let all = vec![
            bounty("1", "open", &["rust"]),
            bounty("2", "claimed", &["rust"]),
            bounty("3", "open", &["python"]),
            bounty("4", "open", &[]),
        ];

        let open = filter_bounties(all.clone(), Some(&BountyStatus::Open), &[]);
        assert_eq!(open.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), ["1", "3", "4"]);

        let tagged = filter_bounties(all.clone(), None, &["rust".into(), "go".into()]);
        assert_eq!(tagged.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), ["1", "2"]);

        assert_eq!(filter_bounties(all, None, &[]).len(), 4);
    }

    #[test]
    fn test_settle_claim_same_wallet_is_idempotent() {
        let claimed_at = Utc::now();
        let result = settle_claim(
            "42",
            "0xABC",
            Err(BoardError::AlreadyClaimed {
                claimed_by: "0xabc".into(),
                claimed_at: Some(claimed_at),
            }),
        )
        .unwrap();

        assert_eq!(result.id, "42");
        assert_eq!(result.status, BountyStatus::Claimed);
        assert_eq!(result.claimed_at, claimed_at);
    }

    #[test]
    fn test_settle_claim_other_wallet_fails() {
        let err = settle_claim(
            "42",
            "0xabc",
            Err(BoardError::AlreadyClaimed {
                claimed_by: "0xother".into(),
                claimed_at: Some(Utc::now()),
            }),
        )
        .unwrap_err();

        assert!(matches!(err, BoardError::AlreadyClaimed { ref claimed_by, .. } if claimed_by == "0xother"));
    }

    #[test]
    fn test_claim_without_wallet() {
        let client = BountyClient::new(ClientConfig::new("http://127.0.0.1:9"));
        assert_eq!(client.claim_bounty("1", None).unwrap_err(), BoardError::MissingWallet);
        assert_eq!(
            client.submit_bounty("1", "done", None, None).unwrap_err(),
            BoardError::MissingWallet
        );
    }
}
