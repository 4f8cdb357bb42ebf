use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const PREDICTIONS_TOTAL: &str = "wheat_predictions_total";
pub const INFERENCE_DURATION_SECONDS: &str = "wheat_inference_duration_seconds";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Ignore the error so tests and embedders can install their own subscriber first.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .try_init();
}

/// Installs the global Prometheus recorder and returns the handle `/metrics` renders.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = builder()?.install_recorder()?;
    describe();
    tracing::info!("Prometheus metrics initialized");
    Ok(handle)
}

/// A recorder that is not installed globally, for tests.
pub fn local_metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

fn builder() -> anyhow::Result<PrometheusBuilder> {
    Ok(PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(INFERENCE_DURATION_SECONDS.to_string()),
        &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
    )?)
}

fn describe() {
    metrics::describe_counter!(PREDICTIONS_TOTAL, "Prediction requests by outcome");
    metrics::describe_histogram!(
        INFERENCE_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Time spent decoding, resizing and classifying one upload"
    );
}

pub fn record_prediction(outcome: &'static str) {
    metrics::counter!(PREDICTIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_inference_duration(duration_secs: f64) {
    metrics::histogram!(INFERENCE_DURATION_SECONDS).record(duration_secs);
}
