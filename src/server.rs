//! JSON-RPC 2.0 over HTTP
//!
//! One POST per request, `Content-Length` framed, connection closed after
//! the response. Methods: `tools/list` and `tools/call`. The catalog is
//! reopened per request on the blocking pool, so edits to the content
//! store are picked up without a restart.

use crate::catalog::PatternSource;
use crate::config::Config;
use crate::mcp::{get_tools, handle_tool_call_with};
use crate::report::ReportOptions;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, Take,
};
use tokio::net::TcpListener;

/// Bodies above this are rejected before reading
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Cap on the request line plus headers
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const TOOL_ERROR: i64 = -32000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub request_line: String,
    pub body: Vec<u8>,
}

/// Read one line of the request head, failing once the head budget is spent
async fn read_head_line<R: AsyncBufRead + Unpin>(head: &mut Take<R>, line: &mut String) -> Result<usize> {
    let n = head.read_line(line).await?;
    if head.limit() == 0 && !line.ends_with('\n') {
        anyhow::bail!("Request headers exceed {} bytes", MAX_HEADER_BYTES);
    }
    Ok(n)
}

/// Read the request line, headers and body
pub async fn read_request<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<HttpRequest> {
    let mut head = (&mut *reader).take(MAX_HEADER_BYTES as u64);

    let mut request_line = String::new();
    read_head_line(&mut head, &mut request_line).await?;

    let mut content_length: usize = 0;
    loop {
        let mut header = String::new();
        let n = read_head_line(&mut head, &mut header).await?;
        if n == 0 || header.trim().is_empty() {
            break;
        }
        if header.to_lowercase().starts_with("content-length:") {
            content_length = header
                .split(':')
                .nth(1)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
        }
    }

    if content_length > MAX_BODY_BYTES {
        anyhow::bail!("Request body too large: {} bytes", content_length);
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader
            .read_exact(&mut body)
            .await
            .context("Request body shorter than Content-Length")?;
    }

    Ok(HttpRequest {
        request_line: request_line.trim_end().to_string(),
        body,
    })
}

fn rpc_error(id: Value, code: i64, message: String) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message}
    })
}

/// Route one JSON-RPC request body to a response envelope
///
/// `options` carries the configured report defaults for tool calls.
pub fn dispatch(catalog: &PatternSource, options: &ReportOptions, body: &[u8]) -> Value {
    let request: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => return rpc_error(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)),
    };

    let method = request.get("method").and_then(|m| m.as_str()).unwrap_or("");
    let params = request.get("params").cloned().unwrap_or(json!({}));
    let id = request.get("id").cloned().unwrap_or(json!(1));

    let result = match method {
        "tools/list" => Ok(json!({"tools": get_tools()})),
        "tools/call" => {
            let name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
            let args = params.get("arguments").unwrap_or(&params);
            handle_tool_call_with(catalog, name, args, options)
        }
        _ => {
            return rpc_error(id, METHOD_NOT_FOUND, format!("Unknown method: {}", method));
        }
    };

    match result {
        Ok(r) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": r
        }),
        Err(e) => {
            tracing::debug!(method, error = %e, "tool call failed");
            rpc_error(id, TOOL_ERROR, e.to_string())
        }
    }
}

pub fn http_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

/// Serve a single request on an established stream
pub async fn serve_connection<S>(
    stream: S,
    catalog_path: Option<PathBuf>,
    options: ReportOptions,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let request = read_request(&mut reader).await?;
    tracing::debug!(request = %request.request_line, bytes = request.body.len(), "http request");

    let response = tokio::task::spawn_blocking(move || {
        let catalog = PatternSource::open(catalog_path.as_deref());
        dispatch(&catalog, &options, &request.body)
    })
    .await
    .context("Request handler panicked")?;

    let body = serde_json::to_string(&response)?;
    write_half.write_all(http_response(&body).as_bytes()).await?;
    write_half.flush().await?;
    Ok(())
}

/// Accept connections until the process is stopped
pub async fn run_http_server(config: Config) -> Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let catalog_path = config.catalog_path().map(|p| p.to_path_buf());
    let options = ReportOptions {
        suggestion_limit: config.suggestion_limit,
        ..Default::default()
    };
    tracing::info!(
        %addr,
        catalog = ?catalog_path,
        suggestion_limit = options.suggestion_limit,
        "quadrant-advisor listening on http://{}/rpc",
        addr
    );

    loop {
        let (stream, peer) = listener.accept().await?;
        let catalog_path = catalog_path.clone();

        tokio::spawn(async move {
            if let Err(e) = serve_connection(stream, catalog_path, options).await {
                tracing::warn!(%peer, error = %e, "Request error");
            }
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(body: &[u8]) -> Value {
        dispatch(&PatternSource::default(), &ReportOptions::default(), body)
    }

    fn post(body: &str) -> String {
        format!(
            "POST /rpc HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[test]
    fn test_read_request() {
        let body = r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#;
        let raw = post(body);
        let mut mock = tokio_test::io::Builder::new().read(raw.as_bytes()).build();
        let mut reader = BufReader::new(&mut mock);

        let request = tokio_test::block_on(read_request(&mut reader)).unwrap();
        assert_eq!(request.request_line, "POST /rpc HTTP/1.1");
        assert_eq!(request.body, body.as_bytes());
    }

    #[test]
    fn test_read_request_split_reads() {
        let body = r#"{"method":"tools/list"}"#;
        let raw = post(body);
        let (head, tail) = raw.split_at(raw.len() - 5);
        let mut mock = tokio_test::io::Builder::new()
            .read(head.as_bytes())
            .read(tail.as_bytes())
            .build();
        let mut reader = BufReader::new(&mut mock);

        let request = tokio_test::block_on(read_request(&mut reader)).unwrap();
        assert_eq!(request.body, body.as_bytes());
    }

    #[test]
    fn test_read_request_rejects_huge_body() {
        let raw = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY_BYTES + 1);
        let mut mock = tokio_test::io::Builder::new().read(raw.as_bytes()).build();
        let mut reader = BufReader::new(&mut mock);
        assert!(tokio_test::block_on(read_request(&mut reader)).is_err());
    }

    #[test]
    fn test_read_request_rejects_oversized_headers() {
        let raw = format!(
            "POST / HTTP/1.1\r\nX-Padding: {}\r\nContent-Length: 2\r\n\r\n{{}}",
            "a".repeat(MAX_HEADER_BYTES)
        );
        let mut reader = raw.as_bytes();

        let err = tokio_test::block_on(read_request(&mut reader)).unwrap_err();
        assert!(err.to_string().contains("headers exceed"));
    }

    #[test]
    fn test_read_request_unterminated_head_is_rejected() {
        let raw = "a".repeat(MAX_HEADER_BYTES + 10);
        let mut reader = raw.as_bytes();
        assert!(tokio_test::block_on(read_request(&mut reader)).is_err());
    }

    #[test]
    fn test_dispatch_tools_list() {
        let response = rpc(br#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#);
        assert_eq!(response["id"], 3);
        assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_dispatch_tools_call() {
        let response = rpc(
            br#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"classify_task","arguments":{"frequency":1,"information":5}}}"#,
        );
        assert_eq!(response["id"], "a");
        assert_eq!(response["result"]["quadrant"], "Q4");
    }

    #[test]
    fn test_dispatch_errors() {
        let parse = rpc(b"not json");
        assert_eq!(parse["error"]["code"], PARSE_ERROR);

        let unknown = rpc(br#"{"id":1,"method":"counsel"}"#);
        assert_eq!(unknown["error"]["code"], METHOD_NOT_FOUND);

        let failed = rpc(
            br#"{"id":1,"method":"tools/call","params":{"name":"get_guardrails","arguments":{}}}"#,
        );
        assert_eq!(failed["error"]["code"], TOOL_ERROR);
    }

    #[test]
    fn test_dispatch_applies_configured_suggestion_limit() {
        let options = ReportOptions {
            suggestion_limit: 2,
            ..Default::default()
        };
        let response = dispatch(
            &PatternSource::default(),
            &options,
            br#"{"id":1,"method":"tools/call","params":{"name":"build_report","arguments":{"diagnostic":{"frequency":4,"information":2},"layers":{"risk":"high","uncertainty":"high","urgency":"high"},"include_suggestions":true}}}"#,
        );
        assert_eq!(response["result"]["suggestions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_serve_connection_writes_response() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"get_checklist"}}"#;
        let expected = rpc(body.as_bytes());
        let expected = http_response(&serde_json::to_string(&expected).unwrap());

        let mock = tokio_test::io::Builder::new()
            .read(post(body).as_bytes())
            .write(expected.as_bytes())
            .build();

        tokio_test::block_on(serve_connection(mock, None, ReportOptions::default())).unwrap();
    }
}
