use std::sync::{Arc, RwLock};
use taskboard::api::{self, AppState};
use taskboard::config::Settings;
use taskboard::persist::SaveFile;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();

    // ── Boot the store ─────────────────────────────────────────
    let save_file = SaveFile::open(&settings.save_path).expect("Failed to open save file");

    let store = save_file
        .load_store()
        .expect("Failed to load tasks from save file");

    tracing::info!(tasks = store.tasks.len(), path = %settings.save_path, "store loaded");

    // ── Shared state ───────────────────────────────────────────
    let state = Arc::new(AppState {
        store: RwLock::new(store),
        save_file,
    });

    // ── Router ─────────────────────────────────────────────────
    let app = api::router(state, &settings.client_origin);

    // ── Start ──────────────────────────────────────────────────
    tracing::info!(addr = %settings.bind, origin = %settings.client_origin, "server running");

    let listener = tokio::net::TcpListener::bind(settings.bind).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
