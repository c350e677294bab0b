//! One-shot HTTP listener for the OAuth redirect.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use tracing::{debug, warn};

use crate::error::{Error, Result};

const CALLBACK_PATH: &str = "/callback";

/// Result of inspecting one request to the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Authorization code with a matching state.
    Code(String),
    /// Authorization server reported an error, or the state did not match.
    Rejected(String),
    /// Request for some other path (e.g. a favicon).
    Ignored,
}

/// Decode a query string into key/value pairs.
fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let decode = |s: &str| {
                let s = s.replace('+', " ");
                urlencoding::decode(&s)
                    .map(|d| d.into_owned())
                    .unwrap_or(s)
            };
            (decode(key), decode(value))
        })
        .collect()
}

/// Inspect an HTTP request line such as `GET /callback?code=..&state=.. HTTP/1.1`.
pub fn parse_request_line(line: &str, expected_state: &str) -> CallbackOutcome {
    let mut parts = line.split_whitespace();
    let (Some(_method), Some(target)) = (parts.next(), parts.next()) else {
        return CallbackOutcome::Ignored;
    };
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    if path != CALLBACK_PATH {
        return CallbackOutcome::Ignored;
    }

    let pairs = query_pairs(query);
    let get = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    if let Some(error) = get("error") {
        return CallbackOutcome::Rejected(format!("authorization denied: {}", error));
    }
    if get("state") != Some(expected_state) {
        return CallbackOutcome::Rejected("state mismatch".to_string());
    }
    match get("code") {
        Some(code) if !code.is_empty() => CallbackOutcome::Code(code.to_string()),
        _ => CallbackOutcome::Rejected("missing authorization code".to_string()),
    }
}

/// Listens on the redirect address until the authorization server calls back.
pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    pub fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        debug!("Callback listener bound to {}", addr);
        Ok(Self { listener })
    }

    /// Block until a callback arrives and return its authorization code.
    pub fn wait_for_code(&self, expected_state: &str) -> Result<String> {
        for stream in self.listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Failed to accept callback connection: {}", e);
                    continue;
                }
            };

            let line = read_request(&stream)?;
            match parse_request_line(&line, expected_state) {
                CallbackOutcome::Code(code) => {
                    respond(&mut stream, "200 OK", "Login Completed! You can close this tab.");
                    return Ok(code);
                }
                CallbackOutcome::Rejected(reason) => {
                    respond(&mut stream, "403 Forbidden", "Couldn't get token");
                    return Err(Error::AuthenticationFailed(reason));
                }
                CallbackOutcome::Ignored => {
                    debug!("Ignoring request: {}", line);
                    respond(&mut stream, "404 Not Found", "Not found");
                }
            }
        }
        Err(Error::AuthenticationFailed(
            "callback listener closed".to_string(),
        ))
    }
}

/// Read the request line and drain the headers.
fn read_request(stream: &TcpStream) -> Result<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header)? == 0 || header.trim().is_empty() {
            break;
        }
    }
    Ok(request_line.trim_end().to_string())
}

fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if let Err(e) = stream.write_all(response.as_bytes()) {
        warn!("Failed to answer callback: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code() {
        let outcome =
            parse_request_line("GET /callback?code=abc%2F123&state=xyz HTTP/1.1", "xyz");
        assert_eq!(outcome, CallbackOutcome::Code("abc/123".to_string()));
    }

    #[test]
    fn test_parse_state_mismatch() {
        let outcome = parse_request_line("GET /callback?code=abc&state=other HTTP/1.1", "xyz");
        assert!(matches!(outcome, CallbackOutcome::Rejected(_)));
    }

    #[test]
    fn test_parse_error_param() {
        let outcome =
            parse_request_line("GET /callback?error=access_denied&state=xyz HTTP/1.1", "xyz");
        assert_eq!(
            outcome,
            CallbackOutcome::Rejected("authorization denied: access_denied".to_string())
        );
    }

    #[test]
    fn test_parse_missing_code() {
        let outcome = parse_request_line("GET /callback?state=xyz HTTP/1.1", "xyz");
        assert!(matches!(outcome, CallbackOutcome::Rejected(_)));
    }

    #[test]
    fn test_parse_other_path() {
        assert_eq!(
            parse_request_line("GET /favicon.ico HTTP/1.1", "xyz"),
            CallbackOutcome::Ignored
        );
        assert_eq!(parse_request_line("", "xyz"), CallbackOutcome::Ignored);
    }

    #[test]
    fn test_query_pairs_decoding() {
        let pairs = query_pairs("a=1&b=hello+world&c=%E2%9C%93&flag");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "hello world".to_string()),
                ("c".to_string(), "\u{2713}".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_listener_receives_code() {
        let listener = CallbackListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.listener.local_addr().unwrap();

        let client = std::thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream
                .write_all(b"GET /callback?code=c0de&state=s HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .unwrap();
            let mut response = String::new();
            std::io::Read::read_to_string(&mut stream, &mut response).unwrap();
            response
        });

        assert_eq!(listener.wait_for_code("s").unwrap(), "c0de");
        assert!(client.join().unwrap().starts_with("HTTP/1.1 200 OK"));
    }
}
