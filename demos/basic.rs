use serde_json::json;

use logship_client::init::init_tracing;
use logship_client::{Config, Environment, LogClient, LogClientError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Makes delivery failures visible on the console.
    init_tracing()?;

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());

    let config = Config::new("demo-project-key")
        .endpoint(endpoint)
        .environment(Environment::Local)
        .timezone("Europe/Berlin");
    let client = LogClient::new(config, Some(json!({"id": 1, "name": "demo"})))?;

    client.info(Some("service started"), None).await?;

    match client
        .error(Some("payment failed"), Some(json!({"order_id": 123})))
        .await
    {
        Ok(body) => println!("accepted: {}", body),
        Err(LogClientError::InvalidCredential { .. }) => println!("project key was rejected"),
        Err(e) => println!("delivery failed: {}", e),
    }

    Ok(())
}
