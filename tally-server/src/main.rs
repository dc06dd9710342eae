use tally_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment()?;

    print_banner();

    // 2. Configuration
    let config = Config::from_env();
    tracing::info!(
        port = config.http_port,
        printer = %config.printer_address,
        model = %config.printer_model,
        label = %config.label_size,
        "Tally label server starting..."
    );

    // 3. State (counters, fonts, printer)
    let state = ServerState::initialize(&config);

    // 4. HTTP server until Ctrl-C
    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
