//! Integration tests for the blocking client
//!
//! The mock server runs on its own thread; only its setup needs a runtime,
//! so these are plain `#[test]`s driving it through `tokio_test::block_on`.

use std::time::Duration;

use owockibot::{BoardError, BountyClient, BountyStatus, ClientConfig};
use serde_json::json;
use tokio_test::block_on;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WALLET: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

fn start() -> MockServer {
    block_on(MockServer::start())
}

fn client_for(server: &MockServer) -> BountyClient {
    BountyClient::new(
        ClientConfig::new(server.uri())
            .with_wallet(WALLET)
            .with_retry_delay(Duration::from_millis(10)),
    )
}

#[test]
fn test_get_bounty() {
    let server = start();
    block_on(
        Mock::given(method("GET"))
            .and(path("/bounties/17"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "17",
                "title": "Fix the docs",
                "reward": 5000000,
                "status": "open",
                "tags": ["docs"]
            })))
            .mount(&server),
    );

    let bounty = client_for(&server).get_bounty("17").unwrap();

    assert_eq!(bounty.id, "17");
    assert_eq!(bounty.title, "Fix the docs");
    assert_eq!(bounty.reward_formatted(), "5.00 USDC");
}

#[test]
fn test_discover_filters_to_open() {
    let server = start();
    block_on(
        Mock::given(method("GET"))
            .and(path("/bounties"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "1", "status": "open" },
                { "id": "2", "status": "claimed", "claimedBy": "0xb", "claimedAt": 1767139200000i64 },
                { "id": "3", "status": "completed", "claimedBy": "0xc", "claimedAt": 1767139200000i64 },
                { "id": "4", "status": "open" }
            ])))
            .mount(&server),
    );

    let open = client_for(&server).discover(&[]).unwrap();

    assert_eq!(open.len(), 2);
    assert!(open.iter().all(|b| b.status == BountyStatus::Open));
}

#[test]
fn test_get_stats() {
    let server = start();
    block_on(
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalBounties": 10,
                "openBounties": 4,
                "claimedBounties": 3,
                "completedBounties": 3,
                "totalPayouts": 0
            })))
            .mount(&server),
    );

    let stats = client_for(&server).get_stats().unwrap();

    assert_eq!(
        (
            stats.total_bounties,
            stats.open_bounties,
            stats.claimed_bounties,
            stats.completed_bounties
        ),
        (10, 4, 3, 3)
    );
}

#[test]
fn test_claim_conflict_is_not_retried() {
    let server = start();
    block_on(
        Mock::given(method("POST"))
            .and(path("/bounties/5/claim"))
            .and(body_json(json!({ "address": WALLET })))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": "Bounty already claimed",
                "claimedBy": "0xsomeoneelse",
                "claimedAt": 1767139200000i64
            })))
            .expect(1)
            .mount(&server),
    );

    let err = client_for(&server).claim_bounty("5", None).unwrap_err();

    assert!(err.is_already_claimed());
    assert!(matches!(err, BoardError::AlreadyClaimed { ref claimed_by, .. } if claimed_by == "0xsomeoneelse"));
}

#[test]
fn test_submit_without_proof() {
    let server = start();
    block_on(
        Mock::given(method("POST"))
            .and(path("/bounties/5/submit"))
            .and(body_json(json!({ "address": WALLET, "submission": "done" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "5",
                "status": "submitted",
                "submissions": [{ "id": "s1", "content": "done" }]
            })))
            .mount(&server),
    );

    let result = client_for(&server).submit_bounty("5", "done", None, None).unwrap();
    assert_eq!(result.submission_id, "s1");
}

#[test]
fn test_retry_fails_twice_then_succeeds() {
    let server = start();
    block_on(async {
        Mock::given(method("GET"))
            .and(path("/bounties/9"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bounties/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "9" })))
            .mount(&server)
            .await;
    });

    let bounty = client_for(&server).get_bounty("9").unwrap();

    assert_eq!(bounty.id, "9");
    assert_eq!(block_on(server.received_requests()).unwrap().len(), 3);
}

#[test]
fn test_not_found() {
    let server = start();
    block_on(
        Mock::given(method("GET"))
            .and(path("/bounties/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such bounty"))
            .expect(1)
            .mount(&server),
    );

    let err = client_for(&server).get_bounty("404").unwrap_err();
    assert_eq!(
        err,
        BoardError::NotFound {
            message: "no such bounty".to_string()
        }
    );
}
