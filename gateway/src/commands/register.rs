//! Register a product on-chain

use anyhow::Result;
use colored::Colorize;

use registry_gateway::config::GatewayConfig;
use registry_gateway::RegistryError;

/// Below this the authority may not cover rent plus fees (0.01 SOL)
const LOW_BALANCE_LAMPORTS: u64 = 10_000_000;

pub async fn run(config: &GatewayConfig, nfc_id: &str, product_id: &str) -> Result<()> {
    println!("{}", "Registering product on-chain...".cyan());

    let registry = config.connect()?;

    // Check balance
    let balance = registry.ledger().authority_balance().await?;
    println!("Authority balance: {} SOL", balance as f64 / 1_000_000_000.0);

    if balance < LOW_BALANCE_LAMPORTS {
        println!(
            "{}",
            "Warning: Low balance. The authority pays rent and fees for each product.".yellow()
        );
    }

    println!("Sending transaction...");
    let registration = match registry.register(nfc_id, product_id).await {
        Ok(registration) => registration,
        Err(RegistryError::DuplicateRegistration { locator }) => {
            println!();
            println!("{}", "Tag is already registered.".red().bold());
            println!("Product account: {}", locator);
            println!("{}", "Use a new NFC tag for this product.".dimmed());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!();
    println!("{}", "Product registered successfully!".green().bold());
    println!();
    println!("Transaction:     {}", registration.receipt.signature);
    println!("Slot:            {}", registration.receipt.slot);
    println!("Product account: {}", registration.locator);
    println!("Owner:           {}", registration.owner);
    println!("NFC tag:         {}", registration.nfc_id);
    println!("Product:         {}", registration.product_id);

    Ok(())
}
