/**
 * Stanza Server Entry Point
 *
 * Loads `.env`, sets up tracing, builds the app from the environment and
 * serves it.
 *
 * `stanza-server reconcile` instead recomputes every user's popularity from
 * their poems and exits. Run it while the server is stopped.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use stanza::backend::server::{create_app, load_store, ServerConfig};
    use stanza::backend::PopularityLedger;
    use tracing_subscriber::EnvFilter;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Server initialization started");

    let config = ServerConfig::from_env()?;

    if std::env::args().nth(1).as_deref() == Some("reconcile") {
        let ledger = PopularityLedger::new(load_store(&config).await?);
        let drifted = ledger.reconcile_all().await?;
        for report in &drifted {
            tracing::info!(
                "Corrected {}: {} -> {}",
                report.user_id,
                report.recorded,
                report.derived
            );
        }
        return Ok(());
    }

    let port = config.port;
    let app = create_app(config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is running on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin stanza-server --features ssr");
    std::process::exit(1);
}
