//! Schoolgate - HTTP REST backend for a school management system
//!
//! This binary loads configuration from the environment and a local config
//! file, connects to the database and serves the portal API.

use schoolgate::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the environment directly
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    schoolgate::start_server(config).await?;

    Ok(())
}
