use todo_server::{Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. dotenv + configuration + logging
    let (config, _log_guard) = setup_environment();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Todo server starting");

    // 2. database + shared state
    let state = ServerState::initialize(&config).await?;

    // 3. serve until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
