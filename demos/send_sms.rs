use std::io;

use bulksms::{BulkSmsClient, GatewayConfig, MessageTypeSelection};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let phone = std::env::var("BULKSMS_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "BULKSMS_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("BULKSMS_MESSAGE")
        .unwrap_or_else(|_| "Hello from the bulksms example.".to_owned());
    let selection: MessageTypeSelection = std::env::var("BULKSMS_MESSAGE_TYPE")
        .unwrap_or_else(|_| "auto".to_owned())
        .parse()?;

    let client = BulkSmsClient::from_config(&config)?;
    let mut draft = client.draft();
    draft
        .append_mobile_number(phone)?
        .set_body_with_type(message, selection);
    if let Ok(sender) = std::env::var("BULKSMS_SENDER_ID") {
        draft.set_sender_id(sender)?;
    }

    println!("message type: {:?}", draft.message_type());
    let response = client.send(&draft).await?;
    println!("message ids: {:?}", response.message_ids);

    Ok(())
}
