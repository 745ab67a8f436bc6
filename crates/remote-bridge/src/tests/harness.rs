//! Test harness for listener tests.
//!
//! Provides:
//! - FakeDatabase: a TCP server answering one canned response per connection
//! - RecordingHost: host actions that only record which capability ran
//! - listener(): a Listener wired to both

use crate::listener::Listener;
use crate::rtdb::RtdbClient;
use async_trait::async_trait;
use bridge_config::Credentials;
use remote_actions::{
    ActionError, ActionRegistry, AdmissionFilter, CommandPipeline, Dispatcher, MediaController,
    SystemActions, SystemShell, VolumeController,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

pub const SECRET: &str = "test-secret";

/// Idle timeout of harness clients; short so silent streams fail fast.
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(200);

/// One canned HTTP response.
#[derive(Debug, Clone)]
pub enum CannedResponse {
    /// `200 text/event-stream` with these events, then the connection closes.
    Stream(Vec<String>),
    /// Plain response with a status code and body.
    Status(u16, String),
    /// `200 text/event-stream` headers, then nothing; the connection stays open.
    Silent,
}

impl CannedResponse {
    fn to_http(&self) -> String {
        match self {
            Self::Stream(events) => format!(
                "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n{}",
                events.concat()
            ),
            Self::Silent => {
                "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n"
                    .to_string()
            }
            Self::Status(status, body) => format!(
                "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            ),
        }
    }
}

pub fn put_event(path: &str, data: Value) -> String {
    format!("event: put\ndata: {}\n\n", json!({ "path": path, "data": data }))
}

pub fn patch_event(path: &str, data: Value) -> String {
    format!("event: patch\ndata: {}\n\n", json!({ "path": path, "data": data }))
}

pub fn control_event(event: &str, data: &str) -> String {
    format!("event: {event}\ndata: {data}\n\n")
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Serves canned responses in order, one per accepted connection.
pub struct FakeDatabase {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl FakeDatabase {
    pub async fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request);

                let _ = socket.write_all(response.to_http().as_bytes()).await;
                if matches!(response, CannedResponse::Silent) {
                    held.push(socket);
                } else {
                    let _ = socket.shutdown().await;
                }
            }
            // silent connections stay open until the test drops the server
            std::future::pending::<()>().await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    /// Raw requests received so far (head and body).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> RtdbClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        RtdbClient::with_http_client(
            http,
            self.url(),
            Credentials::DatabaseSecret(SECRET.to_string()),
        )
        .with_idle_timeout(IDLE_TIMEOUT)
    }
}

impl Drop for FakeDatabase {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        if let Some(head_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Host actions that record the capability name instead of touching the OS.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl MediaController for RecordingHost {
    async fn play_pause(&self) -> Result<(), ActionError> {
        self.record("play_pause")
    }

    async fn next_track(&self) -> Result<(), ActionError> {
        self.record("next_track")
    }

    async fn previous_track(&self) -> Result<(), ActionError> {
        self.record("previous_track")
    }
}

#[async_trait]
impl VolumeController for RecordingHost {
    async fn volume_up(&self) -> Result<(), ActionError> {
        self.record("volume_up")
    }

    async fn volume_down(&self) -> Result<(), ActionError> {
        self.record("volume_down")
    }

    async fn toggle_mute(&self) -> Result<(), ActionError> {
        self.record("toggle_mute")
    }
}

#[async_trait]
impl SystemActions for RecordingHost {
    async fn lock_screen(&self) -> Result<(), ActionError> {
        self.record("lock_screen")
    }

    async fn screenshot(&self) -> Result<(), ActionError> {
        self.record("screenshot")
    }

    async fn open_browser(&self) -> Result<(), ActionError> {
        self.record("open_browser")
    }

    async fn open_spotify(&self) -> Result<(), ActionError> {
        self.record("open_spotify")
    }

    async fn open_terminal(&self) -> Result<(), ActionError> {
        self.record("open_terminal")
    }
}

/// Listener on `/media` of `db`, with the default 2s freshness window.
pub fn listener(
    db: &FakeDatabase,
    host: &Arc<RecordingHost>,
    min_interval: Duration,
) -> Listener {
    let dispatcher = Dispatcher::new(
        ActionRegistry::from_provider(host.clone()),
        Arc::new(SystemShell::new()),
        Duration::from_secs(10),
    );
    let pipeline = CommandPipeline::new(
        AdmissionFilter::new(Duration::from_secs(2), min_interval),
        dispatcher,
    );

    Listener::new(db.client(), "media", pipeline, Duration::from_millis(10))
}
