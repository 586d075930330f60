use alnoor_kesar::cart::storage::{CartStorage, FileStorage, MemoryStorage, WriteBehind};
use alnoor_kesar::cart::AppState;
use alnoor_kesar::catalog::{locate_data_directory, Catalog, CATALOG_FILE};
use alnoor_kesar::config::StorefrontConfig;
use alnoor_kesar::router::create_app_router;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    alnoor_kesar::init_tracing();

    let config = StorefrontConfig::from_env().context("reading configuration")?;

    // Load the catalog
    let data_dir = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => {
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            locate_data_directory(&current_dir)
        }
    };
    let catalog_path = data_dir.join(CATALOG_FILE);
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("loading catalog from {}", catalog_path.display()))?;
    tracing::info!(
        path = %catalog_path.display(),
        products = catalog.products().len(),
        "catalog loaded"
    );

    // Pick cart storage
    let storage: Arc<dyn CartStorage> = match &config.cart_dir {
        Some(dir) => {
            let storage = FileStorage::open(dir).context("opening cart directory")?;
            tracing::info!(dir = %storage.dir().display(), "persisting carts to disk");
            Arc::new(WriteBehind::spawn(Arc::new(storage)))
        }
        None => {
            tracing::info!("carts are kept in memory");
            Arc::new(MemoryStorage::new())
        }
    };

    // Initialize application state
    let state = AppState::new(catalog, &config)
        .context("invalid WhatsApp number")?
        .with_storage(storage);

    let state = Arc::new(state);
    state.spawn_session_sweeper();
    tracing::info!(idle = ?config.session_idle, "idle sessions are evicted");

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!(addr = %config.addr, store = %config.store_name, "server running");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
