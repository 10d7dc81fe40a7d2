use checkout_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env overrides before config load)
    dotenv::dotenv().ok();

    // 2. Configuration
    let config = Config::from_env();

    // 3. Logging
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("checkout server starting...");

    // 4. State (opens the database under the working directory)
    let state = ServerState::new(config.clone())?;

    // 5. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
