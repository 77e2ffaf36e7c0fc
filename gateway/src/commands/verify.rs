//! Verify a tag

use anyhow::Result;
use colored::Colorize;

use registry_gateway::config::GatewayConfig;

pub async fn run(config: &GatewayConfig, nfc_id: &str) -> Result<()> {
    let registry = config.connect()?;
    let verification = registry.verify(nfc_id).await;

    println!();
    if verification.is_authentic {
        println!("{}", "AUTHENTIC".green().bold());
    } else {
        println!("{}", "NOT AUTHENTIC".red().bold());
    }
    println!("  NFC tag: {}", verification.nfc_id);
    if let Some(locator) = verification.locator {
        println!("  Product account: {}", locator);
    }
    if let Some(fault) = verification.fault {
        println!("  {}", fault.dimmed());
    }

    Ok(())
}
