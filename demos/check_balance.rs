use bulksms::{BulkSmsClient, GatewayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = BulkSmsClient::from_config(&GatewayConfig::from_env()?)?;
    let response = client.check_balance().await?;
    println!("balance: {}", response.balance);

    Ok(())
}
