//! Minimal HTTP/1.1 server for the download and translation tests.
//!
//! Each canned response is served on its own connection, in order. The raw
//! requests (head and body) are handed back through the join handle.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct Canned {
    pub status_line: &'static str,
    pub location: Option<&'static str>,
    pub body: &'static [u8],
}

impl Canned {
    pub fn status(status_line: &'static str, body: &'static [u8]) -> Self {
        Self {
            status_line,
            location: None,
            body,
        }
    }

    pub fn redirect(location: &'static str) -> Self {
        Self {
            status_line: "302 Found",
            location: Some(location),
            body: b"",
        }
    }
}

/// Serve `responses` one connection at a time and return the base URL
pub async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let location = response
                .location
                .map(|target| format!("Location: {}\r\n", target))
                .unwrap_or_default();
            let head = format!(
                "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
                response.status_line,
                location,
                response.body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(response.body).await.unwrap();
            socket.flush().await.unwrap();
        }
        requests
    });

    (format!("http://{}", addr), handle)
}

pub async fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, JoinHandle<Vec<String>>) {
    serve(vec![Canned::status(status_line, body)]).await
}

/// Read the head and, when announced, the body of one request
async fn read_request(socket: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return String::from_utf8_lossy(&request).into_owned();
        }
        request.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok());
    let chunked = head.contains("transfer-encoding: chunked");

    loop {
        let body = &request[head_end..];
        let complete = match content_length {
            Some(len) => body.len() >= len,
            None if chunked => body.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            break;
        }
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&request).into_owned()
}

/// Lower-cased request head, for header assertions
pub fn head_of(request: &str) -> String {
    request
        .split("\r\n\r\n")
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
