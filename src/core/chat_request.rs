use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ChatReply, ChatRequest, CHAT_ENDPOINT_PATH};
use crate::utils::url::construct_api_url;

/// Upper bound on one round trip to the chat proxy. Matches the proxy's own
/// upstream timeout so a hung request resolves instead of leaving the client
/// busy forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub enum ChatError {
    /// The request could not be sent or the connection failed.
    Transport(reqwest::Error),
    /// The endpoint did not answer within the configured timeout.
    Timeout(Duration),
    /// The endpoint answered with a non-success status.
    Status { status: u16, summary: String },
    /// The body of a success response was not valid JSON.
    Malformed(String),
    /// The body parsed but carried no `content` field.
    MissingContent,
    /// The request task ended without reporting a result.
    Aborted,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(source) => write!(f, "Request failed: {source}"),
            ChatError::Timeout(after) => {
                write!(f, "Request timed out after {}s", after.as_secs())
            }
            ChatError::Status { status, summary } if summary.is_empty() => {
                write!(f, "Chat endpoint returned status {status}")
            }
            ChatError::Status { status, summary } => {
                write!(f, "Chat endpoint returned status {status}: {summary}")
            }
            ChatError::Malformed(detail) => write!(f, "Malformed response body: {detail}"),
            ChatError::MissingContent => write!(f, "Response body has no content field"),
            ChatError::Aborted => write!(f, "Request task ended without a result"),
        }
    }
}

impl StdError for ChatError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ChatError::Transport(source) => Some(source),
            _ => None,
        }
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

/// One-line description of an error body for the debug log.
fn summarize_error_body(body: &str) -> String {
    const MAX_SUMMARY_CHARS: usize = 200;

    let trimmed = body.trim();
    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .unwrap_or_else(|| trimmed.split_whitespace().collect::<Vec<_>>().join(" "));

    if summary.chars().count() > MAX_SUMMARY_CHARS {
        let mut cut: String = summary.chars().take(MAX_SUMMARY_CHARS).collect();
        cut.push('…');
        cut
    } else {
        summary
    }
}

fn parse_reply_body(body: &str) -> Result<String, ChatError> {
    let reply: ChatReply =
        serde_json::from_str(body).map_err(|e| ChatError::Malformed(e.to_string()))?;
    reply.content.ok_or(ChatError::MissingContent)
}

/// Post one conversation to the chat endpoint and return the reply text.
pub async fn send_chat_request(
    client: &reqwest::Client,
    endpoint: &str,
    request: &ChatRequest,
    timeout: Duration,
) -> Result<String, ChatError> {
    let chat_url = construct_api_url(endpoint, CHAT_ENDPOINT_PATH);
    debug!(
        url = %chat_url,
        model = %request.model,
        messages = request.messages.len(),
        "Sending chat request"
    );

    let round_trip = async {
        let response = client
            .post(&chat_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(ChatError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ChatError::Transport)?;

        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        parse_reply_body(&body)
    };

    tokio::time::timeout(timeout, round_trip)
        .await
        .map_err(|_| ChatError::Timeout(timeout))?
}

pub type ChatOutcome = Result<String, ChatError>;

pub struct ChatRequestParams {
    pub client: reqwest::Client,
    pub endpoint: String,
    pub request: ChatRequest,
    pub timeout: Duration,
    pub request_id: u64,
}

/// Guarantees a completion is reported for a request id, even when the task
/// unwinds or is dropped before it could send one.
struct CompletionGuard {
    tx: mpsc::UnboundedSender<(ChatOutcome, u64)>,
    request_id: u64,
    completed: bool,
}

impl CompletionGuard {
    fn complete(mut self, outcome: ChatOutcome) {
        self.completed = true;
        let _ = self.tx.send((outcome, self.request_id));
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if !self.completed {
            let _ = self.tx.send((Err(ChatError::Aborted), self.request_id));
        }
    }
}

#[derive(Clone)]
pub struct ChatRequestService {
    tx: mpsc::UnboundedSender<(ChatOutcome, u64)>,
}

impl ChatRequestService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(ChatOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Run one request in the background. Exactly one `(outcome, request_id)`
    /// pair is delivered on the receiver for every call.
    pub fn spawn_request(&self, params: ChatRequestParams) {
        let guard = CompletionGuard {
            tx: self.tx.clone(),
            request_id: params.request_id,
            completed: false,
        };

        tokio::spawn(async move {
            let ChatRequestParams {
                client,
                endpoint,
                request,
                timeout,
                request_id,
            } = params;

            let outcome = send_chat_request(&client, &endpoint, &request, timeout).await;
            if let Err(err) = &outcome {
                warn!(request_id, error = %err, "Chat request failed");
            }
            guard.complete(outcome);
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, outcome: ChatOutcome, request_id: u64) {
        let _ = self.tx.send((outcome, request_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatMessage;
    use crate::utils::test_utils::{serve_once, CannedResponse};

    fn sample_request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "hello".into(),
            }],
            model: "m1".into(),
        }
    }

    #[test]
    fn summary_prefers_nested_error_message() {
        let body = r#"{"error":{"message":"model   overloaded","type":"x"}}"#;
        assert_eq!(summarize_error_body(body), "model overloaded");
    }

    #[test]
    fn summary_handles_proxy_error_shape() {
        let body = r#"{"error":"OpenRouter API error: 429","details":"slow down"}"#;
        assert_eq!(summarize_error_body(body), "OpenRouter API error: 429");
    }

    #[test]
    fn summary_falls_back_to_collapsed_text() {
        assert_eq!(
            summarize_error_body("<html>\n  bad gateway\n</html>"),
            "<html> bad gateway </html>"
        );
    }

    #[test]
    fn reply_body_requires_content() {
        assert_eq!(parse_reply_body(r#"{"content":"hi"}"#).unwrap(), "hi");
        assert!(matches!(
            parse_reply_body(r#"{"text":"hi"}"#),
            Err(ChatError::MissingContent)
        ));
        assert!(matches!(
            parse_reply_body("not json"),
            Err(ChatError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn posts_payload_and_returns_content() {
        let (endpoint, captured) =
            serve_once(CannedResponse::json(200, r#"{"content":"hi there"}"#)).await;

        let reply = send_chat_request(
            &reqwest::Client::new(),
            &endpoint,
            &sample_request(),
            Duration::from_secs(5),
        )
        .await
        .expect("request should succeed");
        assert_eq!(reply, "hi there");

        let request = captured.await.expect("captured request");
        assert!(request.head.starts_with("POST /api/chat "));
        assert!(request
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "messages": [{"role": "user", "content": "hello"}],
                "model": "m1"
            })
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (endpoint, _captured) =
            serve_once(CannedResponse::json(500, r#"{"error":"Internal server error"}"#)).await;

        let err = send_chat_request(
            &reqwest::Client::new(),
            &endpoint,
            &sample_request(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

        match err {
            ChatError::Status { status, summary } => {
                assert_eq!(status, 500);
                assert_eq!(summary, "Internal server error");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_without_content_is_an_error() {
        let (endpoint, _captured) = serve_once(CannedResponse::json(200, r#"{}"#)).await;

        let err = send_chat_request(
            &reqwest::Client::new(),
            &endpoint,
            &sample_request(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ChatError::MissingContent));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = send_chat_request(
            &reqwest::Client::new(),
            &format!("http://{addr}"),
            &sample_request(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let holder = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(socket);
        });

        let err = send_chat_request(
            &reqwest::Client::new(),
            &format!("http://{addr}"),
            &sample_request(),
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ChatError::Timeout(_)));
        holder.abort();
    }

    #[tokio::test]
    async fn service_delivers_exactly_one_outcome() {
        let (endpoint, _captured) =
            serve_once(CannedResponse::json(200, r#"{"content":"ok"}"#)).await;
        let (service, mut rx) = ChatRequestService::new();

        service.spawn_request(ChatRequestParams {
            client: reqwest::Client::new(),
            endpoint,
            request: sample_request(),
            timeout: Duration::from_secs(5),
            request_id: 7,
        });

        let (outcome, request_id) = rx.recv().await.expect("one outcome");
        assert_eq!(request_id, 7);
        assert_eq!(outcome.unwrap(), "ok");

        drop(service);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn dropped_guard_reports_abort() {
        let (service, mut rx) = ChatRequestService::new();
        let guard = CompletionGuard {
            tx: service.tx.clone(),
            request_id: 3,
            completed: false,
        };
        drop(guard);

        let (outcome, request_id) = rx.try_recv().expect("abort reported");
        assert_eq!(request_id, 3);
        assert!(matches!(outcome, Err(ChatError::Aborted)));
        assert!(rx.try_recv().is_err());
    }
}
