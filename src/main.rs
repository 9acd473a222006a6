use flex_backend::core::{AppState, Config, init_tracing};
use flex_backend::create_router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Inizializza il logging, RUST_LOG sovrascrive il livello di default
    init_tracing();

    // Carica la configurazione dalle variabili d'ambiente
    let config = Config::from_env()?;
    config.print_info();

    // Repository in memoria oppure pool MySQL con le migrazioni
    let state = AppState::connect(&config).await?;

    // Crea il router
    let app = create_router(Arc::new(state));

    // Crea il listener TCP
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    // Avvia il server
    axum::serve(listener, app).await?;

    Ok(())
}
