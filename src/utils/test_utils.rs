use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::core::app::App;
use crate::core::catalog::{ModelCatalog, ModelCategory, ModelDescriptor};
use crate::core::message::{Message, MessageIdGenerator, TranscriptRole};

pub fn create_test_app() -> App {
    App::new_test_app(test_catalog())
}

pub fn test_catalog() -> ModelCatalog {
    ModelCatalog::from_models(vec![
        ModelDescriptor {
            id: "m1".into(),
            name: "Model One".into(),
            provider: "Test".into(),
            description: "First test model".into(),
            category: ModelCategory::Free,
        },
        ModelDescriptor {
            id: "m2".into(),
            name: "Model Two".into(),
            provider: "Test".into(),
            description: "Second test model".into(),
            category: ModelCategory::Premium,
        },
    ])
    .expect("test catalog is valid")
}

pub fn create_test_message(role: TranscriptRole, content: &str) -> Message {
    let mut ids = MessageIdGenerator::new();
    Message::new(&mut ids, role, content)
}

/// Response written by [`serve_once`].
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Request line plus headers, and the body, as received by [`serve_once`].
#[derive(Debug)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Status",
    }
}

/// Accept a single HTTP connection on an ephemeral port, answer it with
/// `response`, and hand back what the client sent. Returns the base URL.
pub async fn serve_once(
    response: CannedResponse,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let (head, body) = loop {
            let read = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..read]);

            if let Some(end) = find_header_end(&buf) {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                let wanted = content_length(&head);
                let body_start = end + 4;
                if buf.len() - body_start >= wanted {
                    let body =
                        String::from_utf8_lossy(&buf[body_start..body_start + wanted]).to_string();
                    break (head, body);
                }
            }
        };

        let reply = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response.status,
            reason_phrase(response.status),
            response.body.len(),
            response.body
        );
        let _ = socket.write_all(reply.as_bytes()).await;
        let _ = socket.shutdown().await;
        let _ = tx.send(CapturedRequest { head, body });
    });

    (format!("http://{addr}"), rx)
}
