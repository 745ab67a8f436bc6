//! Realtime database REST client: streaming reads and plain writes.
//!
//! Streaming uses `GET <node>.json` with `Accept: text/event-stream`. The
//! server answers with server-sent events:
//!
//! | event          | data                              |
//! |----------------|-----------------------------------|
//! | `put`          | `{"path": "/..", "data": <json>}` |
//! | `patch`        | `{"path": "/..", "data": {..}}`   |
//! | `keep-alive`   | `null`                            |
//! | `cancel`       | reason string                     |
//! | `auth_revoked` | reason string                     |

use crate::error::{BridgeError, BridgeResult};
use crate::sse::{SseEvent, SseParser};
use bridge_config::Credentials;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// The server sends a keep-alive every 30 seconds.
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// One decoded stream event.
#[derive(Debug, Clone, PartialEq)]
pub enum RtdbEvent {
    Put { path: String, data: Value },
    Patch { path: String, data: Value },
    KeepAlive,
    Cancel(String),
    AuthRevoked,
    /// Event type this client does not know; ignored by the listener.
    Other(String),
}

#[derive(Debug, Deserialize)]
struct ChangeBody {
    path: String,
    #[serde(default)]
    data: Value,
}

impl RtdbEvent {
    pub fn from_sse(event: &SseEvent) -> BridgeResult<Self> {
        match event.event.as_str() {
            "put" => {
                let body = parse_change(&event.data)?;
                Ok(Self::Put {
                    path: body.path,
                    data: body.data,
                })
            }
            "patch" => {
                let body = parse_change(&event.data)?;
                Ok(Self::Patch {
                    path: body.path,
                    data: body.data,
                })
            }
            "keep-alive" => Ok(Self::KeepAlive),
            "cancel" => Ok(Self::Cancel(reason(&event.data))),
            "auth_revoked" => Ok(Self::AuthRevoked),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

fn parse_change(data: &str) -> BridgeResult<ChangeBody> {
    serde_json::from_str(data)
        .map_err(|e| BridgeError::Protocol(format!("invalid change event '{data}': {e}")))
}

/// Cancel reasons arrive as a JSON string or bare text.
fn reason(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(text)) => text,
        _ if data.trim().is_empty() => "no reason given".to_string(),
        _ => data.trim().to_string(),
    }
}

/// Authorized client for one database.
#[derive(Clone)]
pub struct RtdbClient {
    http: reqwest::Client,
    base: Url,
    credentials: Credentials,
    idle_timeout: Duration,
}

impl RtdbClient {
    pub fn new(base: Url, credentials: Credentials) -> BridgeResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self::with_http_client(http, base, credentials))
    }

    /// Use a preconfigured HTTP client. No request timeout may be set on it,
    /// since change streams stay open indefinitely.
    pub fn with_http_client(http: reqwest::Client, base: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base,
            credentials,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Longest silence tolerated on an open stream before it counts as dead.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// REST URL of the node at `path`, with the credential attached.
    pub fn node_url(&self, path: &str) -> BridgeResult<Url> {
        let mut segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        match segments.last_mut() {
            Some(last) => last.push_str(".json"),
            None => segments.push(".json".to_string()),
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BridgeError::Protocol(format!("database URL {} has no path", self.base)))?
            .pop_if_empty()
            .extend(&segments);

        let (name, value) = self.credentials.query_param();
        url.query_pairs_mut().append_pair(name, value);
        Ok(url)
    }

    /// Open a change stream on `path`.
    pub async fn stream(&self, path: &str) -> BridgeResult<EventStream> {
        let url = self.node_url(path)?;
        debug!(path = %path, "Opening change stream");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(EventStream::new(
            response
                .bytes_stream()
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .boxed(),
            self.idle_timeout,
        ))
    }

    /// Overwrite the node at `path` with `value`.
    pub async fn put(&self, path: &str, value: &Value) -> BridgeResult<()> {
        let url = self.node_url(path)?;
        let response = self.http.put(url).json(value).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> BridgeResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BridgeError::Status {
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

/// Decoded events of one open stream.
///
/// A half-open connection never yields another chunk, so a read that sees no
/// bytes for `idle_timeout` fails with [`BridgeError::Idle`].
pub struct EventStream {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    parser: SseParser,
    pending: VecDeque<SseEvent>,
    idle_timeout: Duration,
}

impl EventStream {
    pub fn new(body: BoxStream<'static, reqwest::Result<Vec<u8>>>, idle_timeout: Duration) -> Self {
        Self {
            body,
            parser: SseParser::new(),
            pending: VecDeque::new(),
            idle_timeout,
        }
    }

    /// Next event, or `None` once the server closes the stream.
    pub async fn next_event(&mut self) -> BridgeResult<Option<RtdbEvent>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return RtdbEvent::from_sse(&event).map(Some);
            }

            let idle_timeout = self.idle_timeout;
            let next = tokio::time::timeout(idle_timeout, self.body.next())
                .await
                .map_err(|_| BridgeError::Idle(idle_timeout))?;

            match next {
                Some(chunk) => {
                    let chunk = chunk?;
                    self.pending.extend(self.parser.feed(&chunk));
                }
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> RtdbClient {
        RtdbClient::new(
            Url::parse(base).unwrap(),
            Credentials::IdToken("tok en".into()),
        )
        .unwrap()
    }

    fn sse(event: &str, data: &str) -> SseEvent {
        SseEvent {
            event: event.into(),
            data: data.into(),
        }
    }

    #[test]
    fn node_url_appends_json_and_credential() {
        let url = client("https://demo.firebaseio.com").node_url("/media/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://demo.firebaseio.com/media.json?auth=tok+en"
        );
    }

    #[test]
    fn node_url_keeps_base_path_and_nested_segments() {
        let url = client("http://127.0.0.1:9000/ns/")
            .node_url("devices/desk/media")
            .unwrap();
        assert_eq!(url.path(), "/ns/devices/desk/media.json");
    }

    #[test]
    fn root_node_url() {
        let url = client("https://demo.firebaseio.com/").node_url("").unwrap();
        assert_eq!(url.path(), "/.json");
    }

    #[test]
    fn access_token_uses_its_own_parameter() {
        let client = RtdbClient::new(
            Url::parse("https://demo.firebaseio.com").unwrap(),
            Credentials::AccessToken("ya29".into()),
        )
        .unwrap();
        assert_eq!(
            client.node_url("media").unwrap().query(),
            Some("access_token=ya29")
        );
    }

    #[test]
    fn decodes_change_events() {
        assert_eq!(
            RtdbEvent::from_sse(&sse("put", r#"{"path":"/","data":{"action":"play"}}"#)).unwrap(),
            RtdbEvent::Put {
                path: "/".into(),
                data: json!({ "action": "play" }),
            }
        );
        assert_eq!(
            RtdbEvent::from_sse(&sse("patch", r#"{"path":"/","data":{"timestamp":3}}"#)).unwrap(),
            RtdbEvent::Patch {
                path: "/".into(),
                data: json!({ "timestamp": 3 }),
            }
        );
    }

    #[test]
    fn decodes_control_events() {
        assert_eq!(
            RtdbEvent::from_sse(&sse("keep-alive", "null")).unwrap(),
            RtdbEvent::KeepAlive
        );
        assert_eq!(
            RtdbEvent::from_sse(&sse("cancel", r#""Permission denied""#)).unwrap(),
            RtdbEvent::Cancel("Permission denied".into())
        );
        assert_eq!(
            RtdbEvent::from_sse(&sse("auth_revoked", r#""token expired""#)).unwrap(),
            RtdbEvent::AuthRevoked
        );
        assert_eq!(
            RtdbEvent::from_sse(&sse("rules_debug", "x")).unwrap(),
            RtdbEvent::Other("rules_debug".into())
        );
    }

    #[tokio::test]
    async fn silent_body_times_out() {
        let body = futures_util::stream::pending::<reqwest::Result<Vec<u8>>>().boxed();
        let mut stream = EventStream::new(body, Duration::from_millis(50));

        let err = stream.next_event().await.unwrap_err();
        assert!(matches!(err, BridgeError::Idle(d) if d == Duration::from_millis(50)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn buffered_events_do_not_wait_for_more_data() {
        let chunk = b"event: keep-alive\ndata: null\n\nevent: keep-alive\ndata: null\n\n".to_vec();
        let body = futures_util::stream::iter(vec![Ok::<_, reqwest::Error>(chunk)])
            .chain(futures_util::stream::pending())
            .boxed();
        let mut stream = EventStream::new(body, Duration::from_millis(50));

        assert_eq!(stream.next_event().await.unwrap(), Some(RtdbEvent::KeepAlive));
        assert_eq!(stream.next_event().await.unwrap(), Some(RtdbEvent::KeepAlive));
        assert!(matches!(stream.next_event().await, Err(BridgeError::Idle(_))));
    }

    #[test]
    fn malformed_change_is_a_protocol_error() {
        let err = RtdbEvent::from_sse(&sse("put", "not json")).unwrap_err();
        assert!(matches!(err, BridgeError::Protocol(_)));
    }
}
