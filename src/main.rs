use std::sync::Arc;
use tokio::net::TcpListener;
use wheat_detect::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    model::{classifier::OnnxClassifier, labels::ClassLabels, loader},
    observability,
    server::{routes, types::AppState},
    storage::UploadStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Init
    observability::init_tracing();
    loader::init_ort()?;

    // 2. Load Config
    let config = AppConfig::load(DEFAULT_CONFIG_PATH)?;

    // 3. Load the classifier; a missing artifact stops startup here
    tracing::info!(path = %config.model.path, "loading classifier");
    let session = loader::load_model(&config.model.path, config.model.intra_threads)?;
    let labels = ClassLabels::new(config.model.class_names.clone());
    tracing::info!(classes = labels.len(), "class labels configured");

    // 4. Prepare the public upload directory before mounting it
    let store = UploadStore::new(&config.storage);
    tokio::fs::create_dir_all(store.dir()).await?;

    // 5. Create Router
    let state = AppState {
        classifier: Arc::new(OnnxClassifier::new(session)),
        labels,
        store,
        image_size: config.model.image_size,
        metrics: observability::init_metrics()?,
    };
    let app = routes::create_router(state, config.server.max_upload_bytes);

    // 6. Bind & Serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}
