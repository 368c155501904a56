//! `HttpTransport` against a local one-shot HTTP server.

use countriesnow_rs::transport::JSON_CONTENT_TYPE;
use countriesnow_rs::{Error, HttpTransport, Method, Transport};
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Accept one connection, reply with `status` and `body` after `delay`, and hand
/// back the raw request text.
fn serve_once(status: &str, body: &str, delay: Duration) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let reply = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        thread::sleep(delay);
        // The client may already have given up; a failed write is fine here.
        let _ = stream.write_all(reply.as_bytes());
        let _ = stream.flush();
        request
    });
    (base_url, handle)
}

fn read_request(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn transport(base_url: &str, timeout: Duration) -> HttpTransport {
    HttpTransport::new(base_url, timeout, Duration::from_secs(1)).unwrap()
}

fn header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
    request.lines().find_map(|l| {
        let (n, v) = l.split_once(':')?;
        n.eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

#[test]
fn parses_successful_json_reply() {
    let (base, server) = serve_once("200 OK", r#"{"error":false,"data":["Brno"]}"#, Duration::ZERO);
    let v = transport(&base, Duration::from_secs(5))
        .fetch(Method::Get, "cities/q?country=Czech%20Republic", None)
        .unwrap();
    assert_eq!(v, json!({"error": false, "data": ["Brno"]}));
    let request = server.join().unwrap();
    assert!(request.starts_with("GET /cities/q?country=Czech%20Republic HTTP/1.1\r\n"), "{request}");
}

#[test]
fn non_success_status_is_transport_error() {
    let (base, server) = serve_once("404 Not Found", "{}", Duration::ZERO);
    let err = transport(&base, Duration::from_secs(5))
        .fetch(Method::Get, "currency", None)
        .unwrap_err();
    server.join().unwrap();
    match err {
        Error::Transport { method, url, reason } => {
            assert_eq!(method, "GET");
            assert_eq!(url, format!("{base}/currency"));
            assert_eq!(reason, "request failed with HTTP 404 Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_json_body_is_transport_error() {
    let (base, server) = serve_once("200 OK", "hello", Duration::ZERO);
    let err = transport(&base, Duration::from_secs(5))
        .fetch(Method::Get, "codes", None)
        .unwrap_err();
    server.join().unwrap();
    match err {
        Error::Transport { reason, .. } => assert!(reason.starts_with("decode json"), "{reason}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn post_sends_json_body_with_charset() {
    let (base, server) = serve_once("200 OK", r#"{"data":{"flag":"x"}}"#, Duration::ZERO);
    let body = json!({"country": "Czech Republic"});
    transport(&base, Duration::from_secs(5))
        .fetch(Method::Post, "flag/images", Some(&body))
        .unwrap();
    let request = server.join().unwrap();
    assert!(request.starts_with("POST /flag/images HTTP/1.1\r\n"), "{request}");
    assert_eq!(header(&request, "content-type"), Some(JSON_CONTENT_TYPE));
    let sent = request.split("\r\n\r\n").nth(1).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(sent).unwrap(), body);
}

#[test]
fn slow_reply_times_out_as_transport_error() {
    let (base, server) = serve_once("200 OK", "{}", Duration::from_secs(2));
    let err = transport(&base, Duration::from_secs(1))
        .fetch(Method::Get, "currency", None)
        .unwrap_err();
    assert!(matches!(err, Error::Transport { method: "GET", .. }), "{err:?}");
    server.join().unwrap();
}
