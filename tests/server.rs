//! Real sockets: requests go through hyper, body collection and dispatch.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crossroad::{DemoService, Error, MemoryCounter, routes, serve_listener};

async fn start() -> (SocketAddr, oneshot::Sender<()>, JoinHandle<Result<(), Error>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = routes::app(Arc::new(DemoService::new(Arc::new(MemoryCounter::new()))));
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve_listener(listener, app, async {
        let _ = rx.await;
    }));
    (addr, tx, handle)
}

/// Sends one HTTP/1.1 request with `connection: close` and returns the raw
/// response text.
async fn roundtrip(addr: SocketAddr, head: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{head}\r\nhost: test\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut out = String::new();
    stream.read_to_string(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn serves_routes_over_tcp() {
    let (addr, stop, handle) = start().await;

    let res = roundtrip(addr, "GET / HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(res.ends_with("Index Site"), "{res}");

    let res = roundtrip(addr, "GET /counter HTTP/1.1", "").await;
    assert!(res.ends_with("\r\n\r\n1"), "{res}");

    let res = roundtrip(addr, "GET /list/add/9 HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 302"), "{res}");
    assert!(res.to_ascii_lowercase().contains("location: /list"), "{res}");

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn request_bodies_are_collected() {
    let (addr, stop, handle) = start().await;

    let res = roundtrip(
        addr,
        "POST /receive_json HTTP/1.1\r\ncontent-type: application/json",
        r#"{"x":1}"#,
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(res.ends_with(r#"{"x":1}"#), "{res}");

    let res = roundtrip(
        addr,
        "POST /login HTTP/1.1\r\ncontent-type: application/x-www-form-urlencoded",
        "key1=a&key2=b",
    )
    .await;
    assert!(res.ends_with("a | b"), "{res}");

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let (addr, stop, handle) = start().await;

    let res = roundtrip(addr, "PROPFIND / HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 405"), "{res}");

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn shutdown_closes_idle_keep_alive_connections() {
    let (addr, stop, handle) = start().await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET / HTTP/1.1\r\nhost: test\r\n\r\n").await.unwrap();

    // Read the full response but keep the connection open.
    let mut seen = Vec::new();
    let mut buf = [0u8; 512];
    while !seen.ends_with(b"Index Site") {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "server closed a keep-alive connection early");
        seen.extend_from_slice(&buf[..n]);
    }

    stop.send(()).unwrap();
    let finished = tokio::time::timeout(Duration::from_secs(3), handle).await;
    assert!(finished.is_ok(), "shutdown waited on an idle connection");
    finished.unwrap().unwrap().unwrap();

    // The server hung up on its side.
    let n = stream.read(&mut buf).await.unwrap_or(0);
    assert_eq!(n, 0);
}
