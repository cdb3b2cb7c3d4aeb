//! Bounty listing commands

use crate::style::*;
use anyhow::Result;
use owockibot::{AsyncBountyClient, Bounty, BountyStatus};

pub async fn discover(client: &AsyncBountyClient, tags: &[String]) -> Result<()> {
    print_header("Open Bounties");

    let bounties = client.discover(tags).await?;
    if bounties.is_empty() {
        print_info("No open bounties right now.");
        return Ok(());
    }

    print_table(&bounties);
    println!();
    println!("Found {} open bounties!", bounties.len());
    Ok(())
}

/// Accept only the known lifecycle states on the command line
pub fn parse_status(s: &str) -> std::result::Result<BountyStatus, String> {
    match BountyStatus::from(s.to_string()) {
        BountyStatus::Unknown(other) => Err(format!(
            "unknown status '{}' (expected open, claimed, submitted or completed)",
            other
        )),
        status => Ok(status),
    }
}

pub async fn list(
    client: &AsyncBountyClient,
    status: Option<BountyStatus>,
    tags: &[String],
) -> Result<()> {
    print_header("Bounties");

    let bounties = client.list_bounties(status, tags).await?;
    if bounties.is_empty() {
        print_info("No bounties match.");
        return Ok(());
    }

    print_table(&bounties);
    println!();
    println!("Total bounties: {}", bounties.len());
    Ok(())
}

pub async fn show(client: &AsyncBountyClient, id: &str) -> Result<()> {
    let bounty = client.get_bounty(id).await?;

    print_header(&format!("#{} {}", bounty.id, bounty.title));
    println!();
    println!("Status:       {}", style_status(&bounty.status));
    println!("Reward:       {}", style_green(&bounty.reward_formatted()));
    println!("Creator:      {}", truncate_address(&bounty.creator));
    if let Some(deadline) = bounty.deadline {
        println!("Deadline:     {}", deadline.format("%Y-%m-%d %H:%M UTC"));
    }
    if !bounty.tags.is_empty() {
        println!("Tags:         {}", style_cyan(&bounty.tags.join(", ")));
    }
    if let Some(claimed_by) = &bounty.claimed_by {
        println!("Claimed by:   {}", truncate_address(claimed_by));
    }

    if !bounty.description.is_empty() {
        println!();
        println!("{}", bounty.description);
    }

    if !bounty.requirements.is_empty() {
        println!();
        println!("{}", style_bold("Requirements:"));
        for req in &bounty.requirements {
            println!("  - {}", req);
        }
    }

    if !bounty.submissions.is_empty() {
        println!();
        println!("{}", style_bold("Submissions:"));
        for sub in &bounty.submissions {
            println!(
                "  {}  {}",
                style_dim(&sub.id),
                sub.proof.as_deref().unwrap_or(&sub.content)
            );
        }
    }

    if let Some(payment) = &bounty.payment {
        println!();
        println!("{}", style_bold("Payment:"));
        println!(
            "  {} {} on {} ({} fee)",
            owockibot::format_usdc(payment.net_reward),
            style_dim(&format!("net of {}", payment.fee_percent)),
            payment.chain,
            owockibot::format_usdc(payment.fee)
        );
        println!("  tx {}", style_dim(&payment.tx_hash));
    }

    Ok(())
}

fn print_table(bounties: &[Bounty]) {
    println!();
    println!(
        "{:>6}  {:<10}  {:>14}  Title",
        "ID", "Status", "Reward"
    );
    println!("{}", "─".repeat(75));

    for bounty in bounties {
        // Pad before styling so escape codes don't break alignment
        let status = format!("{:<10}", bounty.status.as_str());
        let status = match bounty.status {
            BountyStatus::Open => style_green(&status),
            BountyStatus::Claimed => style_yellow(&status),
            _ => style_dim(&status),
        };
        println!(
            "{:>6}  {}  {:>14}  {}",
            bounty.id,
            status,
            bounty.reward_formatted(),
            bounty.title
        );
    }
}
