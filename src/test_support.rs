//! Local HTTP responder and log capture shared by unit tests.

use std::sync::{Mutex, Once};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves canned responses on a loopback port, one connection per response.
pub(crate) struct CannedServer {
    listener: TcpListener,
    pub base_url: String,
}

impl CannedServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        Self { listener, base_url }
    }

    /// Answer the next `responses.len()` connections in order. The handle
    /// yields the raw requests received.
    pub fn respond(self, responses: Vec<(u16, String)>) -> JoinHandle<Vec<String>> {
        tokio::spawn(async move {
            let mut requests = vec![];
            for (status, body) in responses {
                let (mut socket, _) = self.listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let reason = reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Status");
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        })
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = vec![];
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Route `log` output into an in-memory buffer for the whole test binary.
pub(crate) fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// True if any captured message contains `needle`. Tests run in parallel,
/// so needles should be specific to the test.
pub(crate) fn logged(needle: &str) -> bool {
    CAPTURED.lock().unwrap().iter().any(|m| m.contains(needle))
}

pub(crate) const TEST_PRIVATE_KEY: &[u8] =
    include_bytes!("../tests/fixtures/jwt_signing_key.pem");
pub(crate) const TEST_PUBLIC_KEY: &[u8] =
    include_bytes!("../tests/fixtures/jwt_signing_key.pub.pem");

pub(crate) fn test_private_key_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/jwt_signing_key.pem")
}
