//! Show a registered product

use anyhow::Result;
use colored::Colorize;

use registry_gateway::config::GatewayConfig;
use registry_gateway::RegistryError;

use super::format_timestamp;

pub async fn run(config: &GatewayConfig, nfc_id: &str) -> Result<()> {
    let registry = config.connect()?;

    let record = match registry.fetch(nfc_id).await {
        Ok(record) => record,
        Err(RegistryError::NotFound { locator }) => {
            println!("{}", "No product registered for this tag.".yellow());
            println!("  Product account: {}", locator);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!();
    println!("{}", "Product".yellow().bold());
    println!("  NFC tag:         {}", record.nfc_id);
    println!("  Product:         {}", record.product_id);
    println!("  Owner:           {}", record.owner);
    println!("  Registered:      {}", format_timestamp(record.created_at));
    println!("  Product account: {}", record.locator);

    Ok(())
}
