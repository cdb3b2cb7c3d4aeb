//! Asynchronous client for the owockibot Bounty Board API
//!
//! The client is cheap to clone; clones share one connection pool and may
//! issue requests concurrently. The pool is released when the last clone is
//! dropped, whichever way the owning scope exits.

use std::future::Future;

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{filter_bounties, settle_claim};
use crate::config::ClientConfig;
use crate::error::{BoardError, Result};
use crate::models::{ApiDiscovery, Bounty, BountyStatus, ClaimResult, Stats, SubmitResult};
use crate::transport::{
    map_response, resolve_wallet, ApiRequest, AttemptError, RetryPolicy, USER_AGENT,
};

/// Async bounty board client
///
/// ```no_run
/// use owockibot::{AsyncBountyClient, ClientConfig};
///
/// # async fn run() -> owockibot::Result<()> {
/// let client = AsyncBountyClient::new(ClientConfig::default());
/// let bounties = client.discover(&[]).await?;
/// println!("Found {} open bounties!", bounties.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AsyncBountyClient {
    http: Client,
    config: ClientConfig,
    retry: RetryPolicy,
}

impl AsyncBountyClient {
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

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(ClientConfig::load()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send_once(&self, req: &ApiRequest) -> std::result::Result<Value, AttemptError> {
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

        let response = builder.send().await.map_err(AttemptError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(AttemptError::from_reqwest)?;
        map_response(status, &body).map_err(AttemptError::Response)
    }

    async fn execute(&self, req: &ApiRequest) -> Result<Value> {
        retry(&self.retry, req.is_idempotent(), move |attempt| {
            debug!(
                "{} {} (attempt {}/{})",
                req.method.as_str(),
                req.path,
                attempt,
                self.retry.attempts()
            );
            self.send_once(req)
        })
        .await
    }

    /// List bounties, optionally filtered by status and tags (any tag matches)
    pub async fn list_bounties(
        &self,
        status: Option<BountyStatus>,
        tags: &[String],
    ) -> Result<Vec<Bounty>> {
        let data = self
            .execute(&ApiRequest::list_bounties(status.as_ref(), tags))
            .await?;
        let bounties = Bounty::list_from_json(data)?;
        Ok(filter_bounties(bounties, status.as_ref(), tags))
    }

    pub async fn get_bounty(&self, bounty_id: &str) -> Result<Bounty> {
        Bounty::from_json(self.execute(&ApiRequest::get_bounty(bounty_id)).await?)
    }

    /// Claim a bounty; see [`crate::BountyClient::claim_bounty`]
    pub async fn claim_bounty(
        &self,
        bounty_id: &str,
        wallet_address: Option<&str>,
    ) -> Result<ClaimResult> {
        let wallet = resolve_wallet(wallet_address, self.config.wallet_address.as_deref())?;
        let result = self
            .execute(&ApiRequest::claim_bounty(bounty_id, wallet))
            .await;
        settle_claim(bounty_id, wallet, result)
    }

    pub async fn submit_bounty(
        &self,
        bounty_id: &str,
        submission: &str,
        proof: Option<&str>,
        wallet_address: Option<&str>,
    ) -> Result<SubmitResult> {
        let wallet = resolve_wallet(wallet_address, self.config.wallet_address.as_deref())?;
        let req = ApiRequest::submit_bounty(bounty_id, wallet, submission, proof);
        SubmitResult::from_json(self.execute(&req).await?)
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        Stats::from_json(self.execute(&ApiRequest::stats()).await?)
    }

    pub async fn discover(&self, tags: &[String]) -> Result<Vec<Bounty>> {
        self.list_bounties(Some(BountyStatus::Open), tags).await
    }

    pub async fn discovery_document(&self) -> Result<Option<ApiDiscovery>> {
        match self.execute(&ApiRequest::discovery()).await {
            Ok(data) => ApiDiscovery::from_json(data).map(Some),
            Err(BoardError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Run `attempt` under `policy`; the wait between tries only suspends the
/// calling task.
pub async fn retry<F, Fut, T>(policy: &RetryPolicy, idempotent: bool, mut attempt: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let mut n = 1;
    loop {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(err) => match policy.backoff(n, &err, idempotent) {
                Some(delay) => {
                    warn!("Attempt {} failed, retrying in {:?}: {:?}", n, delay, err);
                    tokio::time::sleep(delay).await;
                    n += 1;
                }
                None => return Err(err.into_board_error()),
            },
        }
    }
}
