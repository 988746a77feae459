use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use audio_catalog::config::{ServerConfig, StoreBackend};
use audio_catalog::{cli_utils, create_catalog_router};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "SQLite database URL for persistent storage")]
    database: Option<String>,
    #[arrrg(flag, "Keep the catalog in memory only")]
    in_memory: bool,
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"audio-catalogd - Audio catalog daemon

USAGE:
    audio-catalogd [OPTIONS]

OPTIONS:
    --database <URL>     SQLite database URL [default: sqlite://audio_catalog.db]
    --in-memory          Keep the catalog in memory only (lost on exit)
    --host <HOST>        Host to bind the HTTP server [default: 127.0.0.1]
    --port <PORT>        Port to bind the HTTP server [default: 8000]
    --verbose            Enable verbose logging (RUST_LOG overrides)

DESCRIPTION:
    Serves a catalog of songs, podcasts and audiobooks. Request bodies are
    form-encoded; <type> is one of song, podcast or audiobook.

    The server supports graceful shutdown via Ctrl+C.

API ENDPOINTS:
    POST   /create/<type>/          Create a record
    POST   /update/<type>/<id>/     Update fields of a record
    GET    /read/<type>/            List all records of a type
    GET    /read/<type>/<id>/       Get one record
    POST   /delete/<type>/<id>/     Delete a record

FIELDS:
    song         name, duration
    podcast      name, duration, host, participants (comma-separated)
    audiobook    title, author, narrator, duration"#;

fn init_logging(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: audio-catalogd [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }
    if !free.is_empty() {
        cli_utils::exit_with_usage_error(
            &format!("unexpected argument '{}'", free[0]),
            "USAGE: audio-catalogd [OPTIONS] (see `audio-catalogd help`)",
        );
    }

    let config = ServerConfig::from_options(
        args.database,
        args.in_memory,
        args.host,
        args.port,
        args.verbose,
    )
    .unwrap_or_else(|e| cli_utils::exit_with_error(&e.to_string()));

    init_logging(&config);
    tracing::debug!(?config, "starting with configuration");

    let store = config.open_store().await.map_err(|e| {
        tracing::error!("failed to open store {}: {}", config.backend, e);
        format!("Failed to open store {}: {}", config.backend, e)
    })?;
    if config.backend == StoreBackend::InMemory {
        tracing::warn!("serving from the in-memory store; records are lost on exit");
    }

    let app = create_catalog_router(store);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(address = %addr, store = %config.backend, "audio catalog listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    tracing::info!("audio catalog stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received, stopping server gracefully");
}
