use super::assets::{CHART_DATA_PLACEHOLDER, INDEX_HTML};
use super::data::ChartData;
use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::model::Dataset;
use crate::style;
use axum::{
    Json, Router,
    extract::State,
    response::{
        Html, IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across handlers. The chart payload is swapped
/// wholesale on every rebuild; handlers only ever see a complete generation.
pub struct AppState {
    pub chart: RwLock<ChartData>,
    pub events: broadcast::Sender<u64>,
}

/// Input needed to rebuild the chart in watch mode. The config is cached for
/// the lifetime of the server; the source JSON is re-read on every rebuild.
pub struct WatchContext {
    pub input: PathBuf,
    pub config: Config,
}

/// Start the HTTP server for the chart visualization.
pub async fn serve(
    chart: ChartData,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (events, _) = broadcast::channel(16);
    let state = Arc::new(AppState {
        chart: RwLock::new(chart),
        events,
    });
    run_server(state, port, open_browser).await
}

/// Serve the chart and re-read the input file on change, pushing rebuilds to
/// connected pages over SSE. Each successful rebuild carries a higher
/// generation; a failed rebuild keeps the previous generation live.
pub async fn serve_with_watch(
    chart: ChartData,
    port: u16,
    open_browser: bool,
    ctx: WatchContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let (events, _) = broadcast::channel(16);
    let generation = chart.metadata.generation;
    let state = Arc::new(AppState {
        chart: RwLock::new(chart),
        events,
    });

    tokio::spawn(watch_loop(state.clone(), ctx, generation));

    run_server(state, port, open_browser).await
}

async fn run_server(
    state: Arc<AppState>,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    println!("Starting bundlemap visualization server...");
    println!("Open in browser: {}", style::url(&url));
    println!("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/chart", get(chart_handler))
        .route("/api/events", get(events_handler))
        .layer(cors)
        .with_state(state)
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn chart_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.chart.read().await.clone())
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(generation) => Some(Ok(Event::default().data(generation.to_string()))),
        // Lagged receivers just miss intermediate generations; the page
        // refetches the latest payload on the next event anyway.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Poll the input file once per second and rebuild on mtime change.
async fn watch_loop(state: Arc<AppState>, ctx: WatchContext, mut generation: u64) {
    let fs = default_fs();
    let mut last_modified = fs.modified(&ctx.input).ok();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        ticker.tick().await;

        let modified = match fs.modified(&ctx.input) {
            Ok(m) => m,
            Err(e) => {
                style::warning(&format!("Cannot stat {}: {}", ctx.input.display(), e));
                continue;
            }
        };

        if last_modified == Some(modified) {
            continue;
        }
        last_modified = Some(modified);

        match rebuild(&ctx, generation + 1) {
            Ok(chart) => {
                generation += 1;
                *state.chart.write().await = chart;
                // No receivers is fine; pages subscribe lazily.
                let _ = state.events.send(generation);
                style::status(&format!("Rebuilt chart (generation {})", generation));
            }
            Err(e) => {
                style::warning(&format!("Rebuild failed, keeping previous chart: {}", e));
            }
        }
    }
}

fn rebuild(
    ctx: &WatchContext,
    generation: u64,
) -> Result<ChartData, Box<dyn std::error::Error + Send + Sync>> {
    let content = default_fs().read_to_string(&ctx.input)?;
    let dataset = Dataset::from_json_str(&content)?;
    Ok(ChartData::build_generation(&dataset, &ctx.config, generation)?)
}

/// Render a self-contained HTML file with the chart payload inlined, so the
/// export works without a server.
pub fn generate_static_html(chart: &ChartData) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_string(chart)?;
    Ok(INDEX_HTML.replace(CHART_DATA_PLACEHOLDER, &payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_html_inlines_the_payload() {
        let dataset = Dataset::from_json_str(r#"[{"A": "x", "B": "p"}]"#).unwrap();
        let chart = ChartData::build(&dataset, &Config::default()).unwrap();
        let html = generate_static_html(&chart).unwrap();

        assert!(!html.contains(CHART_DATA_PLACEHOLDER));
        assert!(html.contains(r#""record_count":1"#));
        assert!(html.contains("curveBundle"));
    }

    #[test]
    fn index_page_carries_the_placeholder() {
        assert!(INDEX_HTML.contains(CHART_DATA_PLACEHOLDER));
    }
}
