use pos_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, work dir, logging)
    setup_environment()?;
    print_banner();

    // 2. Configuration
    let config = Config::from_env();
    tracing::info!(
        port = config.http_port,
        environment = %config.environment,
        timezone = %config.business_tz,
        "POS server starting..."
    );

    // 3. State (database, services)
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server, background tasks stop with it
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
