//! Shared test infrastructure for flow integration tests.
//!
//! [`StubServer`] plays the remote services: it serves a scripted list
//! of responses over a loopback listener, one connection per response,
//! and captures each request for assertions.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use cropcast::config::AdvisoryConfig;

/// One scripted response, served verbatim with a JSON content type.
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> StubResponse {
        StubResponse {
            status,
            body: body.to_string(),
        }
    }
}

/// One request as received by the stub, for post-hoc assertions.
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    /// Path including the query string, exactly as sent.
    pub path: String,
    /// `content-type` header, when the request carried one.
    pub content_type: Option<String>,
    pub body: String,
}

/// Loopback HTTP server that serves scripted responses in order.
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<CapturedRequest>>,
}

impl StubServer {
    /// Bind a listener and serve one connection per scripted response.
    pub fn start(responses: Vec<StubResponse>) -> StubServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for response in &responses {
                let (stream, _) = listener.accept().expect("accept stub connection");
                captured.push(handle_connection(stream, response));
            }
            captured
        });
        StubServer { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait for every scripted response to be consumed and return the
    /// captured requests in arrival order.
    pub fn finish(self) -> Vec<CapturedRequest> {
        self.handle.join().expect("stub server thread")
    }
}

/// Config pointing every collaborator at the stub.
pub fn test_config(base: &str) -> AdvisoryConfig {
    AdvisoryConfig {
        prediction_url: format!("{base}/predict"),
        cultivation_url: base.to_string(),
        weather_url: base.to_string(),
        weather_key: "test-key".to_string(),
    }
}

fn handle_connection(stream: TcpStream, response: &StubResponse) -> CapturedRequest {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name == "content-length" {
                content_length = value.parse().unwrap_or(0);
            } else if name == "content-type" {
                content_type = Some(value.to_string());
            } else if name == "transfer-encoding" && value.eq_ignore_ascii_case("chunked") {
                chunked = true;
            }
        }
    }

    let body = if chunked {
        read_chunked(&mut reader)
    } else {
        let mut buf = vec![0u8; content_length];
        reader.read_exact(&mut buf).expect("read request body");
        String::from_utf8_lossy(&buf).into_owned()
    };

    let mut stream = reader.into_inner();
    let reply = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason(response.status),
        response.body.len(),
        response.body
    );
    stream.write_all(reply.as_bytes()).expect("write stub response");
    stream.flush().expect("flush stub response");

    CapturedRequest {
        method,
        path,
        content_type,
        body,
    }
}

fn read_chunked(reader: &mut BufReader<TcpStream>) -> String {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).expect("read chunk size");
        let size = usize::from_str_radix(size_line.trim(), 16).expect("parse chunk size");
        if size == 0 {
            let mut terminator = String::new();
            reader
                .read_line(&mut terminator)
                .expect("read chunk terminator");
            break;
        }
        let mut chunk = vec![0u8; size];
        reader.read_exact(&mut chunk).expect("read chunk");
        body.extend_from_slice(&chunk);
        let mut crlf = String::new();
        reader.read_line(&mut crlf).expect("read chunk separator");
    }
    String::from_utf8_lossy(&body).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
