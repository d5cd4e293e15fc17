//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use bike_planner::config::{PlannerConfig, ProviderKind};
use bike_planner::http::HttpServer;
use bike_planner::lifecycle::Shutdown;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[allow(dead_code)]
pub const GRAPHHOPPER_PATH: &str = "/api/1/route";
#[allow(dead_code)]
pub const MAPBOX_PATH: &str = "/directions/v5/mapbox";

/// One request as seen by the mock provider.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl RecordedRequest {
    fn url(&self) -> url::Url {
        url::Url::parse(&format!("http://mock{}", self.target)).unwrap()
    }

    pub fn path(&self) -> String {
        self.url().path().to_string()
    }

    pub fn query(&self) -> HashMap<String, String> {
        self.url().query_pairs().into_owned().collect()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A directions provider stand-in listening on an ephemeral port.
pub struct MockProvider {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a mock provider that always answers 200 with `response`.
#[allow(dead_code)]
pub async fn start_mock_provider(response: &'static str) -> MockProvider {
    start_programmable_provider(move |_| async move { (200, response.to_string()) }).await
}

/// Start a programmable mock provider with async support.
///
/// Requests are recorded before `f` runs, so a handler that never answers
/// still counts as a call.
#[allow(dead_code)]
pub async fn start_programmable_provider<F, Fut>(f: F) -> MockProvider
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        recorded.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");
                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockProvider { addr, requests }
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(socket);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await.ok()?;

    Some(RecordedRequest { method, target, headers, body })
}

/// Planner config pointing GraphHopper at `mock`.
#[allow(dead_code)]
pub fn graphhopper_config(mock: &MockProvider) -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.provider.kind = ProviderKind::GraphHopper;
    config.provider.system_proxy = false;
    config.graphhopper.base_url = mock.url(GRAPHHOPPER_PATH);
    config.graphhopper.api_key = "test-key".into();
    config.map.access_token = "pk.test-map".into();
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config
}

/// Planner config pointing Mapbox at `mock`.
#[allow(dead_code)]
pub fn mapbox_config(mock: &MockProvider) -> PlannerConfig {
    let mut config = graphhopper_config(mock);
    config.provider.kind = ProviderKind::Mapbox;
    config.mapbox.base_url = mock.url(MAPBOX_PATH);
    config.mapbox.access_token = "pk.test-directions".into();
    config
}

/// Start the planner on an ephemeral port.
#[allow(dead_code)]
pub async fn start_planner(config: PlannerConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
