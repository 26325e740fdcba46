//! Prometheus counters for the synchronizer and the `/metrics` endpoint.

use lazy_static::lazy_static;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use warp::Filter;
use warp::Rejection;
use warp::Reply;


lazy_static! {
    pub static ref WATCH_RECONNECTS: IntCounter = IntCounter::new(
        "watch_reconnects_total",
        "Number of times the watch stream was dropped and reopened"
    )
    .expect("metric can not be created");

    pub static ref EDGES_MATERIALIZED: IntCounterVec = IntCounterVec::new(
        Opts::new("edges_materialized_total", "Edges written to the mirror"),
        &["table", "outcome"]
    )
    .expect("metric can not be created");

    pub static ref MATERIALIZE_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("materialize_failures_total", "Edges dropped because the insert failed"),
        &["table"]
    )
    .expect("metric can not be created");

    pub static ref COMPLETED_REVISIONS: IntCounter = IntCounter::new(
        "completed_revisions_total",
        "Completed revision markers received from the watch feed"
    )
    .expect("metric can not be created");

    pub static ref UNHANDLED_RESPONSES: IntCounterVec = IntCounterVec::new(
        Opts::new("unhandled_responses_total", "Watch responses the mirror does not act on"),
        &["kind"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

fn register_custom_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(WATCH_RECONNECTS.clone()),
        Box::new(EDGES_MATERIALIZED.clone()),
        Box::new(MATERIALIZE_FAILURES.clone()),
        Box::new(COMPLETED_REVISIONS.clone()),
        Box::new(UNHANDLED_RESPONSES.clone()),
    ];
    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            error!("collector can not be registered: {}", e);
        }
    }
}

pub async fn start_server(
    port: u16,
    mut shutdown_signal: watch::Receiver<()>,
) {
    register_custom_metrics(&REGISTRY);
    info!("metrics server listening on port {}", port);

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    let (_, server) =
        warp::serve(metrics_route).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async move {
            let _ = shutdown_signal.changed().await;
        });
    server.await;
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    Ok(encode_metrics(&REGISTRY))
}

pub(crate) fn encode_metrics(registry: &Registry) -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
    };
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}
