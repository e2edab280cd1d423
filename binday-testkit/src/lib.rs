//! Minimal HTTP/1.1 stub server for exercising the HTTP backends in tests.
//!
//! Every connection receives the same canned response and is then closed.
//! Requests are recorded so tests can assert on method, path, headers, and body.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const HEADER_END: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Default)]
/// A request as seen by the stub server.
pub struct RecordedRequest {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request target including the query string.
    pub target: String,
    /// Header name/value pairs, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Raw body decoded as UTF-8.
    pub body: String,
}

impl RecordedRequest {
    /// First value of the header `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Stub server answering every request with one fixed status and body.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Bind to an ephemeral localhost port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub async fn start(status: u16, body: impl Into<String>) -> io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let response = render_response(status, &body.into());

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                // A client hanging up mid-request only loses that request.
                if serve(stream, &recorded, response.as_bytes()).await.is_err() {
                    continue;
                }
            }
        });

        Ok(Self {
            addr,
            requests,
            handle,
        })
    }

    /// Base URL of the server, without trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Address that refuses connections, for transport failure tests.
///
/// # Errors
///
/// Returns an error when no ephemeral port can be bound.
pub async fn closed_url() -> io::Result<String> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

fn render_response(status: u16, body: &str) -> String {
    format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

// Records the request before answering, so callers see it once the response arrives.
async fn serve(
    mut stream: TcpStream,
    recorded: &Mutex<Vec<RecordedRequest>>,
    response: &[u8],
) -> io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];

    let header_len = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        buffer.extend(chunk.iter().take(read));
        if let Some(pos) = buffer
            .windows(HEADER_END.len())
            .position(|window| window == HEADER_END)
        {
            break pos + HEADER_END.len();
        }
    };

    let head = String::from_utf8_lossy(buffer.get(..header_len).unwrap_or_default()).into_owned();
    let mut request = parse_head(&head);

    let content_length = request
        .header("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    while buffer.len() < header_len + content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend(chunk.iter().take(read));
    }
    request.body =
        String::from_utf8_lossy(buffer.get(header_len..).unwrap_or_default()).into_owned();
    if let Ok(mut requests) = recorded.lock() {
        requests.push(request);
    }

    stream.write_all(response).await?;
    stream.shutdown().await
}

fn parse_head(head: &str) -> RecordedRequest {
    let mut lines = head.split("\r\n");
    let mut start = lines.next().unwrap_or_default().split_whitespace();
    let method = start.next().unwrap_or_default().to_owned();
    let target = start.next().unwrap_or_default().to_owned();

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_owned()))
        .collect();

    RecordedRequest {
        method,
        target,
        headers,
        body: String::new(),
    }
}
