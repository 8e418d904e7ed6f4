use anyhow::Result;
use letsrevoke::{
    api::{build_state, create_router, ApiServer},
    config::Config,
    index::write_index,
    telemetry,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // 2. Load configuration
    let config = Arc::new(Config::load()?);

    // 3. Initialize logging
    telemetry::init_logging(&config)?;
    info!("Starting {}...", config.general.app_name);

    // 4. Wire the issuance log, revocation client and credential checks
    let state = build_state(config.clone())?;
    info!(
        "Issuance log {} and revocation service {} configured",
        config.storage.database_path.display(),
        config.revocation.base_url
    );

    // 5. Export the index file, if requested
    if let Some(path) = &config.index.path {
        match state.engine.list(None, None).await {
            Ok(page) => {
                if let Err(e) = write_index(path, &page.certificates).await {
                    warn!("Index export to {} failed: {}", path.display(), e);
                }
            }
            Err(e) => warn!("Index export skipped: {}", e),
        }
    }

    // 6. Serve until shutdown
    let server = ApiServer::new(&config, create_router(state))?;
    server.start_with_shutdown().await?;

    info!("{} stopped", config.general.app_name);
    Ok(())
}
