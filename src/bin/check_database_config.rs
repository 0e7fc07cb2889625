use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use workflow_database::{config, create_client};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Fail before anything else touches the database.
    let config = config::init().context("invalid Supabase configuration")?;
    info!(supabase_url = %config.supabase_url, "Supabase configuration is valid");

    let client = create_client().context("failed to create Supabase client")?;
    match client.ping().await {
        Ok(()) => {
            info!(rest_url = %client.rest_url(), "Supabase REST endpoint reachable");
            Ok(())
        }
        Err(err) => {
            error!(rest_url = %client.rest_url(), error = %err, "Supabase REST endpoint check failed");
            Err(err).context("Supabase REST endpoint check failed")
        }
    }
}
