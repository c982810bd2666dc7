//! HTTP data source for the tracker API.
//!
//! Drives a `reqwest` client on a background task so the UI loop never
//! blocks on the network. Requests go in over a command channel and results
//! come back as [`SourceEvent`]s via `poll()`.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{BlobList, DataSource, Snapshot, SourceError, SourceEvent};

/// Request timeout for all API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
enum Command {
    Latest { gen: u64 },
    History { gen: u64 },
    Blob { name: String },
}

/// A data source backed by the tracker's HTTP API.
///
/// All three endpoints hang off a common API root:
/// `<root>/data/latest`, `<root>/data/blobs`, `<root>/data/<identifier>`.
///
/// Must be created inside a tokio runtime; the worker task lives as long as
/// the runtime does and exits when the source is dropped.
#[derive(Debug)]
pub struct HttpSource {
    commands: mpsc::Sender<Command>,
    events: mpsc::Receiver<SourceEvent>,
    description: String,
}

impl HttpSource {
    /// Spawn the background worker for the given API root.
    ///
    /// Fails only if the HTTP client itself cannot be constructed
    /// (e.g. TLS backend initialization).
    pub fn spawn(base_url: &str) -> Result<Self> {
        let base = base_url.trim_end_matches('/').to_string();
        let description = format!("api: {}", base);

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(16);
        let (event_tx, event_rx) = mpsc::channel::<SourceEvent>(16);

        tokio::spawn(async move {
            while let Some(cmd) = cmd_rx.recv().await {
                let event = match cmd {
                    Command::Latest { gen } => {
                        let url = format!("{}/data/latest", base);
                        let result = fetch_json(&client, &url).await.map(Snapshot::from_value);
                        SourceEvent::Latest { gen, result }
                    }
                    Command::History { gen } => {
                        let url = format!("{}/data/blobs", base);
                        let result = fetch_json(&client, &url).await.and_then(|value| {
                            serde_json::from_value::<BlobList>(value)
                                .map(|list| list.blobs)
                                .map_err(|e| SourceError::Decode(e.to_string()))
                        });
                        SourceEvent::History { gen, result }
                    }
                    Command::Blob { name } => {
                        let url = format!("{}/data/{}", base, name);
                        let result = fetch_json(&client, &url).await.map(Snapshot::from_value);
                        SourceEvent::Blob { name, result }
                    }
                };

                if event_tx.send(event).await.is_err() {
                    // Receiver dropped, UI is gone
                    break;
                }
            }
        });

        Ok(Self {
            commands: cmd_tx,
            events: event_rx,
            description,
        })
    }

    fn send(&self, cmd: Command) {
        // Channel full means a pile-up of unanswered requests; dropping the
        // oldest intent is fine since a newer refresh supersedes it anyway.
        if let Err(e) = self.commands.try_send(cmd) {
            warn!("dropping request: {}", e);
        }
    }
}

impl DataSource for HttpSource {
    fn request_latest(&mut self, gen: u64) {
        self.send(Command::Latest { gen });
    }

    fn request_history(&mut self, gen: u64) {
        self.send(Command::History { gen });
    }

    fn request_blob(&mut self, name: &str) {
        self.send(Command::Blob {
            name: name.to_string(),
        });
    }

    fn poll(&mut self) -> Option<SourceEvent> {
        self.events.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// GET a URL and return the body as JSON.
///
/// Non-2xx statuses are reported as [`SourceError::Status`] carrying the
/// numeric code; transport and decode failures get their own variants.
async fn fetch_json(client: &reqwest::Client, url: &str) -> Result<serde_json::Value, SourceError> {
    debug!(url, "fetching");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!(url, status = status.as_u16(), "request failed");
        return Err(SourceError::Status(status.as_u16()));
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| SourceError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    /// Serve the given router on a loopback port, returning the API root.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    /// Poll the source until an event arrives (bounded wait).
    async fn wait_for_event(source: &mut HttpSource) -> SourceEvent {
        for _ in 0..200 {
            if let Some(event) = source.poll() {
                return event;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no event from source");
    }

    fn tracker_router() -> Router {
        Router::new()
            .route(
                "/api/data/latest",
                get(|| async {
                    Json(json!({
                        "timestamp": "2024-01-15T14:30:45",
                        "data": { "occupancy": 25 }
                    }))
                }),
            )
            .route(
                "/api/data/blobs",
                get(|| async {
                    Json(json!({
                        "count": 2,
                        "blobs": [
                            "scraped_data_2024-01-14_09-00-00.json",
                            "scraped_data_2024-01-15_14-30-45.json"
                        ]
                    }))
                }),
            )
            .route(
                "/api/data/{name}",
                get(|Path(name): Path<String>| async move {
                    Json(json!({
                        "timestamp": "2024-01-14T09:00:00",
                        "data": { "occupancy": 80, "blob": name }
                    }))
                }),
            )
    }

    #[tokio::test]
    async fn test_http_source_latest() {
        let base = serve(tracker_router()).await;
        let mut source = HttpSource::spawn(&base).unwrap();

        source.request_latest(1);
        match wait_for_event(&mut source).await {
            SourceEvent::Latest { gen, result } => {
                assert_eq!(gen, 1);
                let snapshot = result.unwrap();
                assert_eq!(snapshot.occupancy, Some(25));
                assert_eq!(snapshot.timestamp.as_deref(), Some("2024-01-15T14:30:45"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_history_and_blob() {
        let base = serve(tracker_router()).await;
        let mut source = HttpSource::spawn(&base).unwrap();

        source.request_history(3);
        match wait_for_event(&mut source).await {
            SourceEvent::History { gen, result } => {
                assert_eq!(gen, 3);
                let blobs = result.unwrap();
                assert_eq!(blobs.len(), 2);
                assert_eq!(blobs[0], "scraped_data_2024-01-14_09-00-00.json");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        source.request_blob("scraped_data_2024-01-14_09-00-00.json");
        match wait_for_event(&mut source).await {
            SourceEvent::Blob { name, result } => {
                assert_eq!(name, "scraped_data_2024-01-14_09-00-00.json");
                assert_eq!(result.unwrap().occupancy, Some(80));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_server_error_carries_status() {
        let router = Router::new().route(
            "/api/data/latest",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = serve(router).await;
        let mut source = HttpSource::spawn(&base).unwrap();

        source.request_latest(1);
        match wait_for_event(&mut source).await {
            SourceEvent::Latest { result, .. } => {
                let err = result.unwrap_err();
                assert_eq!(err, SourceError::Status(500));
                assert!(err.to_string().contains("500"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_connection_refused() {
        // Nothing listening on this port
        let mut source = HttpSource::spawn("http://127.0.0.1:9/api").unwrap();

        source.request_latest(1);
        match wait_for_event(&mut source).await {
            SourceEvent::Latest { result, .. } => {
                assert!(matches!(result, Err(SourceError::Transport(_))));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_malformed_body() {
        let router = Router::new().route("/api/data/blobs", get(|| async { "not json" }));
        let base = serve(router).await;
        let mut source = HttpSource::spawn(&base).unwrap();

        source.request_history(1);
        match wait_for_event(&mut source).await {
            SourceEvent::History { result, .. } => {
                assert!(matches!(result, Err(SourceError::Decode(_))));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_description_strips_trailing_slash() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let source = rt.block_on(async { HttpSource::spawn("http://localhost:5000/api/").unwrap() });
        assert_eq!(source.description(), "api: http://localhost:5000/api");
    }
}
