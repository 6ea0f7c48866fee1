use clap::Parser;

use couchtv::catalog::store::{CatalogHandle, JsonCatalogStore};
use couchtv::{cli, config, http};

/// Wait for the first Ctrl+C (graceful shutdown). A second Ctrl+C while
/// in-flight streams drain force-exits.
async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down, draining in-flight requests...");
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ncouchtv: forced exit");
            std::process::exit(1);
        }
    });
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref())
        .and_then(|path| {
            match config::load_config(&path) {
                Ok(cfg) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}", e);
                    None
                }
            }
        });

    let config = config::Config::resolve(file_config, &args);

    let store = JsonCatalogStore::new(&config.data_dir).unwrap_or_else(|e| {
        eprintln!("error: cannot use data directory {}: {}", config.data_dir.display(), e);
        std::process::exit(1);
    });

    tracing::info!("Catalog data in {}", store.dir().display());
    tracing::info!("Range suffix handling: {:?}", config.suffix_ranges);

    let state = http::state::AppState {
        catalog: CatalogHandle::new(store),
        suffix_mode: config.suffix_ranges,
        posters_dir: config.frontend_dir.join("posters"),
    };
    let app = http::with_frontend(http::build_router(state), &config.frontend_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind {}: {}", addr, e);
            std::process::exit(1);
        });
    tracing::info!("couchtv listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
    {
        tracing::error!("HTTP server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Goodbye.");
}
