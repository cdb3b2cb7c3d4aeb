//! Stats command

use crate::style::*;
use anyhow::Result;
use owockibot::AsyncBountyClient;

pub async fn run(client: &AsyncBountyClient) -> Result<()> {
    print_header("Bounty Board Stats");

    let stats = client.get_stats().await?;

    println!();
    println!("Total bounties:     {}", style_bold(&stats.total_bounties.to_string()));
    println!("Open:               {}", style_green(&stats.open_bounties.to_string()));
    println!("Claimed:            {}", style_yellow(&stats.claimed_bounties.to_string()));
    println!("Completed:          {}", style_dim(&stats.completed_bounties.to_string()));
    println!("Total payouts:      {}", style_green(&stats.total_payouts_formatted()));
    Ok(())
}
