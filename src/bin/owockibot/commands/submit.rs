//! Submit command

use crate::style::*;
use anyhow::{Context, Result};
use owockibot::AsyncBountyClient;

pub async fn run(
    client: &AsyncBountyClient,
    id: &str,
    submission: &str,
    proof: Option<&str>,
) -> Result<()> {
    print_header("Submit Work");

    let result = client
        .submit_bounty(id, submission, proof, None)
        .await
        .with_context(|| format!("Failed to submit bounty #{}", id))?;

    print_success(&format!("Work submitted for bounty #{}", result.id));
    println!();
    println!("Submission:   {}", style_dim(&result.submission_id));
    println!("Status:       {}", style_status(&result.status));
    Ok(())
}
