//! Claim command

use crate::style::*;
use anyhow::Result;
use owockibot::{AsyncBountyClient, BoardError};

pub async fn run(client: &AsyncBountyClient, id: &str) -> Result<()> {
    print_header("Claim Bounty");

    match client.claim_bounty(id, None).await {
        Ok(claim) => {
            print_success(&format!("Bounty #{} claimed!", claim.id));
            println!();
            println!("Claimed by:   {}", style_cyan(&claim.claimed_by));
            println!("Claimed at:   {}", claim.claimed_at.format("%Y-%m-%d %H:%M UTC"));
            println!();
            println!("When the work is done, run:");
            println!("  owockibot submit {} \"<what you did>\" --proof <url>", claim.id);
            Ok(())
        }
        Err(BoardError::AlreadyClaimed {
            claimed_by,
            claimed_at,
        }) => {
            print_warning(&format!(
                "Bounty #{} is already claimed by {}",
                id,
                truncate_address(&claimed_by)
            ));
            if let Some(at) = claimed_at {
                println!("  since {}", at.format("%Y-%m-%d %H:%M UTC"));
            }
            anyhow::bail!("Bounty #{} was not claimed", id)
        }
        Err(BoardError::MissingWallet) => {
            anyhow::bail!("No wallet configured. Pass --wallet or set OWOCKIBOT_WALLET")
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owockibot::ClientConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_claim_conflict_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bounties/2/claim"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": "Bounty already claimed",
                "claimedBy": "0xsomeoneelse",
                "claimedAt": 1767139200000i64
            })))
            .mount(&server)
            .await;

        let client = AsyncBountyClient::new(ClientConfig::new(server.uri()).with_wallet("0xme"));
        let err = run(&client, "2").await.unwrap_err();

        assert!(err.to_string().contains("not claimed"));
    }
}
