//! Show configuration and authority info

use anyhow::Result;
use colored::Colorize;
use solana_sdk::signer::Signer;

use registry_gateway::config::{default_keypair_path, load_authority, GatewayConfig};

pub async fn run(config: &GatewayConfig) -> Result<()> {
    println!();
    println!("{}", "Registry Gateway Configuration".yellow().bold());
    println!();

    // RPC info
    println!("{}:", "RPC Endpoint".cyan());
    println!("  {}", config.rpc_url);
    println!("  Commitment: {:?}", config.commitment.commitment);
    println!("  Timeout:    {}s", config.timeout.as_secs());
    println!();

    // Program
    println!("{}:", "Program ID".cyan());
    println!("  {}", config.program_id);
    match &config.idl_path {
        Some(path) => match config.program_interface() {
            Ok(_) => println!("  IDL: {} {}", path.display(), "(ok)".green()),
            Err(err) => println!("  IDL: {} {}", path.display(), format!("({:#})", err).red()),
        },
        None => println!("  {}", "IDL: not set, using computed discriminators".dimmed()),
    }
    println!();

    // Authority keypair
    println!("{}:", "Authority".cyan());
    let keypair_path = match &config.keypair_path {
        Some(path) => path.clone(),
        None => default_keypair_path()?,
    };
    println!("  Keypair: {}", keypair_path.display());

    match load_authority(Some(&keypair_path)) {
        Ok(authority) => {
            println!("  Address: {}", authority.pubkey());

            if let Ok(registry) = config.connect() {
                if let Ok(balance) = registry.ledger().authority_balance().await {
                    println!("  Balance: {} SOL", balance as f64 / 1_000_000_000.0);
                }
                if let Ok(slot) = registry.chain_height().await {
                    println!();
                    println!("{}:", "Chain".cyan());
                    println!("  Slot: {}", slot);
                }
            }
        }
        Err(err) => {
            println!("  {}", "NOT CONFIGURED".red());
            println!("  {}", format!("{:#}", err).dimmed());
            println!("  Run 'solana-keygen new' to create a keypair");
        }
    }

    Ok(())
}
