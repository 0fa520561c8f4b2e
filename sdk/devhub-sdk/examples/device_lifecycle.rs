// Example: driving the device ledger end to end.
//
// Expects the ledger program to be deployed on the configured cluster and
// its id passed as the first argument:
//
//   cargo run --example device_lifecycle -- <PROGRAM_ID>

use std::str::FromStr;

use devhub_sdk::state::DeviceRecord;
use devhub_sdk::{ClientConfig, LedgerClient, LedgerCommand};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program_id = std::env::args()
        .nth(1)
        .ok_or("usage: device_lifecycle <PROGRAM_ID>")?;
    let program_id = Pubkey::from_str(&program_id)?;

    let connection = ClientConfig::default().build()?;
    let payer = Keypair::new();
    let mut client = LedgerClient::new(connection, payer, program_id);
    client.setup().await?;

    let device = DeviceRecord {
        mac_address: "00:11:22:33:44:55".to_string(),
        owner: client.payer_pubkey().to_string(),
        token_balance: 100,
        registration_time: 1_630_301_040,
        merchant: "Merchant".to_string(),
        longitude: "100.23111".to_string(),
        latitude: "50.11231".to_string(),
    };

    client
        .submit(LedgerCommand::Register(device.clone()))
        .await?;
    client
        .submit(LedgerCommand::ChargeToken {
            mac_address: device.mac_address.clone(),
            amount: 100,
        })
        .await?;
    client
        .submit(LedgerCommand::MineToken {
            mac_address: device.mac_address.clone(),
        })
        .await?;

    let ledger = client.fetch_ledger().await?;
    println!("registered devices: {}", ledger.count);
    for entry in &ledger.entries {
        println!(
            "  {} balance {} owner {}",
            entry.mac_address, entry.token_balance, entry.owner
        );
    }
    Ok(())
}
