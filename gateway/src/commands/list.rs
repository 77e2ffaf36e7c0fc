//! List registered products

use anyhow::{Context, Result};
use colored::Colorize;
use solana_sdk::pubkey::Pubkey;

use registry_gateway::config::GatewayConfig;
use registry_gateway::registry::ListQuery;

use super::format_timestamp;

pub async fn run(
    config: &GatewayConfig,
    owner: Option<&str>,
    after: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let query = ListQuery {
        owner: owner.map(parse_key).transpose()?,
        after: after.map(parse_key).transpose()?,
        limit,
    };

    println!("{}", "Fetching registered products...".cyan());

    let registry = config.connect()?;
    let listing = registry.list(&query).await?;

    println!();
    println!("{} {}", "Products:".yellow().bold(), listing.count());
    println!();

    for (i, product) in listing.products.iter().enumerate() {
        println!("{}. {} → {}", i + 1, product.nfc_id.cyan(), product.product_id);
        println!("   Account:    {}", product.locator);
        println!("   Owner:      {}", product.owner);
        println!("   Registered: {}", format_timestamp(product.created_at));
    }

    if listing.skipped > 0 {
        println!();
        println!(
            "{}",
            format!("{} program accounts could not be decoded", listing.skipped).dimmed()
        );
    }

    if let Some(cursor) = listing.next_cursor {
        println!();
        println!("More products available. Continue with --after {}", cursor);
    }

    Ok(())
}

fn parse_key(input: &str) -> Result<Pubkey> {
    input
        .parse()
        .with_context(|| format!("Invalid public key '{}'", input))
}
