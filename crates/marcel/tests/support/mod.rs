//! A minimal scripted HTTP server for exercising the clients over a real
//! socket. Each connection reads one request, consults the handler with the
//! request path and the hit index, and writes one canned response.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct CannedResponse {
  pub status: u16,
  pub body: String,
  pub delay: Duration,
}

impl CannedResponse {
  pub fn json(status: u16, body: impl Into<String>) -> Self {
    CannedResponse { status, body: body.into(), delay: Duration::ZERO }
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }
}

pub struct TestServer {
  pub base: String,
  pub hits: Arc<AtomicUsize>,
}

impl TestServer {
  pub async fn start<H>(handler: H) -> Self
  where
    H: Fn(&str, usize) -> CannedResponse + Send + Sync + 'static,
  {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let handler = Arc::new(handler);

    tokio::spawn(async move {
      while let Ok((stream, _)) = listener.accept().await {
        let hit = counter.fetch_add(1, Ordering::SeqCst);
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
          serve_one(stream, hit, handler.as_ref()).await;
        });
      }
    });

    TestServer { base: format!("http://{addr}"), hits }
  }

  pub fn hit_count(&self) -> usize {
    self.hits.load(Ordering::SeqCst)
  }
}

async fn serve_one<H>(mut stream: TcpStream, hit: usize, handler: &H)
where
  H: Fn(&str, usize) -> CannedResponse,
{
  let Some(path) = read_request(&mut stream).await else {
    return;
  };
  let canned = handler(&path, hit);
  if !canned.delay.is_zero() {
    tokio::time::sleep(canned.delay).await;
  }

  let reason = match canned.status {
    200 => "OK",
    400 => "Bad Request",
    401 => "Unauthorized",
    404 => "Not Found",
    500 => "Internal Server Error",
    503 => "Service Unavailable",
    _ => "Unknown",
  };
  let response = format!(
    "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
    canned.status,
    reason,
    canned.body.len(),
    canned.body
  );
  let _ = stream.write_all(response.as_bytes()).await;
  let _ = stream.shutdown().await;
}

/// Read one full request (head plus content-length body) and return its path.
async fn read_request(stream: &mut TcpStream) -> Option<String> {
  let mut buffer = Vec::new();
  let mut chunk = [0u8; 4096];

  let head_end = loop {
    let read = stream.read(&mut chunk).await.ok()?;
    if read == 0 {
      return None;
    }
    buffer.extend_from_slice(&chunk[..read]);
    if let Some(pos) = find_head_end(&buffer) {
      break pos;
    }
  };

  let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
  let content_length = head
    .lines()
    .find_map(|line| {
      let (name, value) = line.split_once(':')?;
      name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
    })
    .unwrap_or(0);

  let mut body_read = buffer.len() - (head_end + 4);
  while body_read < content_length {
    let read = stream.read(&mut chunk).await.ok()?;
    if read == 0 {
      break;
    }
    body_read += read;
  }

  let request_line = head.lines().next()?;
  request_line.split_whitespace().nth(1).map(str::to_string)
}

fn find_head_end(buffer: &[u8]) -> Option<usize> {
  buffer.windows(4).position(|window| window == b"\r\n\r\n")
}
