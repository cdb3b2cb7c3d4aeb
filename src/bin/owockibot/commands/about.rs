//! About command - show the API metadata document

use crate::style::*;
use anyhow::Result;
use owockibot::AsyncBountyClient;

pub async fn run(client: &AsyncBountyClient) -> Result<()> {
    print_header("Bounty Board API");

    println!();
    println!("URL:              {}", style_cyan(&client.config().base_url));

    match client.discovery_document().await? {
        Some(doc) => {
            println!("Name:             {}", doc.name.as_deref().unwrap_or("?"));
            println!("Version:          {}", doc.version.as_deref().unwrap_or("?"));
            if let Some(description) = &doc.description {
                println!();
                println!("{}", description);
            }
            if !doc.extra.is_empty() {
                println!();
                println!("{}", serde_json::to_string_pretty(&doc.extra)?);
            }
        }
        None => print_info("This board does not publish a metadata document."),
    }
    Ok(())
}
