//! Minimal HTTP stub standing in for the Mailosaur API
//!
//! Accepts one request per connection and answers with `Connection: close`,
//! recording every request for later assertions.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

/// A request as seen by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A canned response
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(status: u16, value: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::json(404, json!({ "type": "NotFound" }))
    }
}

type Handler = dyn Fn(&RecordedRequest) -> StubResponse + Send + Sync;

pub struct StubServer {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Start serving on an ephemeral local port
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                std::thread::spawn(move || serve(stream, handler.as_ref(), &recorded));
            }
        });

        Self { port, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<RecordedRequest>>) {
    let Some(request) = read_request(&stream) else {
        return;
    };
    recorded.lock().unwrap().push(request.clone());
    let response = handler(&request);

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason(response.status),
        response.content_type,
        response.body.len()
    );

    let mut stream = stream;
    stream.write_all(head.as_bytes()).ok();
    stream.write_all(&response.body).ok();
    stream.flush().ok();
}

fn read_request(stream: &TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let chunked = headers.iter().any(|(name, value)| {
        name.eq_ignore_ascii_case("transfer-encoding") && value.eq_ignore_ascii_case("chunked")
    });
    let body = if chunked {
        read_chunked(&mut reader)?
    } else {
        let length = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0; length];
        reader.read_exact(&mut body).ok()?;
        body
    };

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

fn read_chunked(reader: &mut impl BufRead) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).ok()?;
        let size_hex = size_line.trim().split(';').next()?;
        let size = usize::from_str_radix(size_hex, 16).ok()?;

        if size == 0 {
            // Trailing CRLF after the last chunk
            let mut end = String::new();
            reader.read_line(&mut end).ok()?;
            return Some(body);
        }
        let mut chunk = vec![0; size + 2];
        reader.read_exact(&mut chunk).ok()?;
        body.extend_from_slice(&chunk[..size]);
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Unknown",
    }
}

/// Install a test logger; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An email summary as returned by list and search
pub fn summary_json(id: &str, token: &str, received: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "from": [{ "name": format!("{token} {token}"), "address": format!("{token}.abc123@mailosaur.io") }],
        "to": [{ "name": format!("{token} {token}"), "address": format!("to-{token}.abc123@mailosaur.io") }],
        "subject": format!("{token} subject"),
        "senderhost": "smtp.example.com",
        "server": "abc123",
        "received": received,
        "attachments": [
            {
                "id": format!("{id}-cat"),
                "fileName": "cat.png",
                "contentType": "image/png",
                "length": 16,
                "creationDate": received
            },
            {
                "id": format!("{id}-dog"),
                "fileName": "dog.png",
                "contentType": "image/png",
                "length": 32,
                "creationDate": received
            }
        ]
    })
}

/// A full email as returned by get
pub fn full_email_json(id: &str, token: &str, received: DateTime<Utc>) -> Value {
    let mut email = summary_json(id, token, received);
    email["headers"] = json!({
        "from": format!("{token} {token} <{token}.abc123@mailosaur.io>"),
        "To": format!("{token} {token} <to-{token}.abc123@mailosaur.io>"),
        "subject": format!("{token} subject")
    });
    email["html"] = json!({
        "body": format!("<div dir=\"ltr\">{token} html</div>"),
        "links": [
            { "href": "https://mailosaur.com/", "text": "mailosaur" },
            { "href": "https://mailosaur.com/" },
            { "href": "http://invalid/", "text": "invalid" }
        ],
        "images": [
            { "src": "https://mailosaur.com/logo.png", "alt": "logo" },
            { "src": "cid:ii_1435fadb31d523f6", "alt": "Inline image 1" }
        ]
    });
    email["text"] = json!({
        "body": format!("this is a test {token}"),
        "links": [
            { "href": "https://mailosaur.com/", "text": "https://mailosaur.com/" },
            { "href": "https://mailosaur.com/", "text": "https://mailosaur.com/" }
        ]
    });
    email
}
