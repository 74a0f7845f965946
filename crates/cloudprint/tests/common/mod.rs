//! In-process stub of the token endpoint and the Cloud Print API.
//!
//! Serves one canned response per path and records every request it sees.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cloudprint::ServiceConfig;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const TOKEN_PATH: &str = "/token";
pub const STUB_TOKEN: &str = "ya29.stub-token";
pub const SOURCE: &str = "test-proxy";
pub const SERVICE_EMAIL: &str = "printer-bot@example-project.iam.gserviceaccount.com";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string
    pub target: String,
    /// Header names lower-cased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or(&self.target)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    /// Split a multipart/form-data body into `(part headers, name, value)`.
    pub fn form_parts(&self) -> Vec<(String, String, String)> {
        let content_type = self.header("content-type").unwrap();
        let boundary = content_type
            .split("boundary=")
            .nth(1)
            .expect("multipart boundary");
        let body = self.body_text();
        let terminator = format!("--{}--\r\n", boundary);
        assert!(body.ends_with(&terminator), "body not terminated: {:?}", body);

        body[..body.len() - terminator.len()]
            .split(&format!("--{}\r\n", boundary))
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (headers, value) = part.split_once("\r\n\r\n").expect("part header block");
                let name = headers
                    .split("name=\"")
                    .nth(1)
                    .and_then(|rest| rest.split('"').next())
                    .expect("part name")
                    .to_string();
                let value = value.strip_suffix("\r\n").expect("part CRLF").to_string();
                (headers.to_string(), name, value)
            })
            .collect()
    }

    /// `(name, value)` pairs of the multipart body.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.form_parts()
            .into_iter()
            .map(|(_, name, value)| (name, value))
            .collect()
    }
}

#[derive(Clone)]
struct Canned {
    status: u16,
    body: String,
}

pub struct StubServer {
    addr: SocketAddr,
    routes: Arc<Mutex<HashMap<String, Canned>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Bind to an ephemeral port and serve on the current runtime. The token
    /// endpoint answers with [`STUB_TOKEN`] valid for one hour.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = Self {
            addr,
            routes: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        server.token_lifetime(3600);

        let routes = server.routes.clone();
        let requests = server.requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let requests = requests.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(socket, routes, requests).await;
                });
            }
        });

        server
    }

    /// Serve `body` with `status` on `path` (query string ignored).
    pub fn respond(&self, path: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().insert(
            path.to_string(),
            Canned {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Canned response for `<base>/<verb>`.
    pub fn respond_verb(&self, verb: &str, status: u16, body: &str) {
        self.respond(&format!("/cloudprint/{}", verb), status, body);
    }

    pub fn token_lifetime(&self, expires_in: i64) {
        self.respond(
            TOKEN_PATH,
            200,
            &format!(
                r#"{{"access_token":"{}","token_type":"Bearer","expires_in":{}}}"#,
                STUB_TOKEN, expires_in
            ),
        );
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn api_base_url(&self) -> String {
        format!("http://{}/cloudprint", self.addr)
    }

    pub fn token_uri(&self) -> String {
        format!("http://{}{}", self.addr, TOKEN_PATH)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }

    pub fn token_requests(&self) -> usize {
        self.requests_to(TOKEN_PATH).len()
    }

    pub fn verb_requests(&self, verb: &str) -> Vec<RecordedRequest> {
        self.requests_to(&format!("/cloudprint/{}", verb))
    }

    /// Config for a JSON key written into `dir` that points at this stub.
    pub fn json_key_config(&self, dir: &Path) -> ServiceConfig {
        let key_path = write_json_key(dir, Some(&self.token_uri()));
        let mut config = ServiceConfig::with_json_key(SOURCE, key_path);
        config.api_base_url = self.api_base_url();
        config.timeout_secs = 5;
        config.connect_timeout_secs = 2;
        config
    }

    /// Config for the PKCS#12 fixture, with the token endpoint set in config.
    pub fn certificate_config(&self) -> ServiceConfig {
        let mut config =
            ServiceConfig::with_certificate(SOURCE, SERVICE_EMAIL, fixture_path("test_service_account.p12"), "notasecret");
        config.api_base_url = self.api_base_url();
        config.token_uri = self.token_uri();
        config.timeout_secs = 5;
        config.connect_timeout_secs = 2;
        config
    }
}

async fn handle_connection(
    mut socket: TcpStream,
    routes: Arc<Mutex<HashMap<String, Canned>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = socket.split();
    let mut reader = BufReader::new(read_half);

    // Request line: "POST /path?query HTTP/1.1"
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;

    let request = RecordedRequest {
        method,
        target,
        headers,
        body,
    };
    let canned = routes
        .lock()
        .unwrap()
        .get(request.path())
        .cloned()
        .unwrap_or(Canned {
            status: 404,
            body: format!("no stub for {}", request.path()),
        });
    requests.lock().unwrap().push(request);

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        canned.status,
        reason(canned.status),
        canned.body.len(),
        canned.body
    );
    write_half.write_all(response.as_bytes()).await?;
    write_half.shutdown().await?;
    Ok(())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Write a service-account JSON key built around the fixture RSA key.
pub fn write_json_key(dir: &Path, token_uri: Option<&str>) -> PathBuf {
    let private_key = std::fs::read_to_string(fixture_path("test_service_account.pem")).unwrap();
    let mut key = serde_json::json!({
        "type": "service_account",
        "project_id": "example-project",
        "private_key_id": "0123456789abcdef",
        "private_key": private_key,
        "client_email": SERVICE_EMAIL,
        "client_id": "1234567890",
    });
    if let Some(uri) = token_uri {
        key["token_uri"] = serde_json::Value::String(uri.to_string());
    }

    let path = dir.join("service-account.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&key).unwrap()).unwrap();
    path
}

/// Decode the claims of a compact JWT without verifying it.
pub fn jwt_claims(token: &str) -> serde_json::Value {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let payload = token.split('.').nth(1).expect("JWT payload segment");
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
}

/// Value of `key` in an application/x-www-form-urlencoded body.
pub fn form_value(body: &str, key: &str) -> Option<String> {
    body.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| urlencoding::decode(v).unwrap().into_owned())
    })
}
