//! Printer adapters for sending raster data
//!
//! Supports network printers (raw TCP, port 9100).

use crate::error::{PrintError, PrintResult};
use crate::status::{QlStatus, STATUS_LEN, StatusType};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send a raw job to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;
}

/// Network printer (TCP port 9100)
///
/// The host may be an IP literal or a hostname; names are resolved on every
/// connect. Connecting and writing are bounded by `timeout`. After the job is
/// written, status frames are read until the printer reports completion,
/// reports an error, closes the connection or `status_wait` runs out. Only an
/// error frame fails the job.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    timeout: Duration,
    status_wait: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let host = host.trim().trim_start_matches('[').trim_end_matches(']');
        let valid_name = host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if host.is_empty() || !(valid_name || host.parse::<IpAddr>().is_ok()) {
            return Err(PrintError::InvalidConfig(format!("Invalid host: {:?}", host)));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            timeout: Duration::from_secs(5),
            status_wait: Duration::from_secs(3),
        })
    }

    /// Create from a printer identifier
    ///
    /// Accepts `tcp://10.0.0.13`, `tcp://brother-ql.local:9100`,
    /// `10.0.0.13:9100` or `[::1]:9100`. The port defaults to 9100.
    pub fn from_uri(uri: &str) -> PrintResult<Self> {
        let rest = uri.trim();
        let rest = rest.strip_prefix("tcp://").unwrap_or(rest);
        if rest.is_empty() {
            return Err(PrintError::InvalidConfig("Empty printer address".to_string()));
        }

        if let Ok(addr) = rest.parse::<SocketAddr>() {
            return Self::new(&addr.ip().to_string(), addr.port());
        }
        if let Ok(ip) = rest.parse::<IpAddr>() {
            return Self::new(&ip.to_string(), DEFAULT_PORT);
        }

        match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| PrintError::InvalidConfig(format!("Invalid port in {}", rest)))?;
                Self::new(host, port)
            }
            None => Self::new(rest, DEFAULT_PORT),
        }
    }

    /// Set connect and write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long to wait for status frames after sending
    pub fn with_status_wait(mut self, wait: Duration) -> Self {
        self.status_wait = wait;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, bracketing IPv6 literals
    pub fn address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{}]:{}", self.host, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }

    async fn await_completion(&self, stream: &mut TcpStream) -> PrintResult<()> {
        let deadline = Instant::now() + self.status_wait;
        let mut frame = [0u8; STATUS_LEN];

        loop {
            let read = tokio::time::timeout_at(deadline, stream.read_exact(&mut frame)).await;
            match read {
                Err(_) => {
                    debug!("No completion status before deadline, assuming sent");
                    return Ok(());
                }
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    debug!("Printer closed connection without completion status");
                    return Ok(());
                }
                Ok(Err(e)) => return Err(PrintError::Io(e)),
                Ok(Ok(_)) => {
                    let status = QlStatus::parse(&frame)?.into_result()?;
                    debug!(status = ?status.status_type, "Printer status");
                    if status.status_type == StatusType::PrintingCompleted {
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.address(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let address = self.address();
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let mut stream = tokio::time::timeout(self.timeout, connect)
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", address)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", address, e)))?;

        info!("Connected, sending {} bytes", data.len());

        let send = async {
            stream.write_all(data).await?;
            stream.flush().await
        };
        tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", address)))?
            .map_err(|e| {
                PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                ))
            })?;

        self.await_completion(&mut stream).await?;

        info!("Print job sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::frame;
    use tokio::net::TcpListener;

    /// Fake printer: reads until the job terminator, then writes `replies`
    async fn fake_printer(replies: Vec<[u8; STATUS_LEN]>) -> (SocketAddr, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if received.last() == Some(&0x1A) {
                    break;
                }
            }
            for reply in replies {
                socket.write_all(&reply).await.unwrap();
            }
            received
        });

        (addr, handle)
    }

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.port(), 9100);
        assert_eq!(printer.address(), "192.168.1.100:9100");
    }

    #[test]
    fn test_from_uri_variants() {
        let printer = NetworkPrinter::from_uri("tcp://10.0.0.13").unwrap();
        assert_eq!(printer.address(), "10.0.0.13:9100");

        let printer = NetworkPrinter::from_uri("tcp://10.0.0.13:9200").unwrap();
        assert_eq!(printer.port(), 9200);

        let printer = NetworkPrinter::from_uri("10.0.0.13:9100").unwrap();
        assert_eq!(printer.port(), 9100);

        let printer = NetworkPrinter::from_uri("tcp://[::1]:9101").unwrap();
        assert_eq!(printer.address(), "[::1]:9101");
    }

    #[test]
    fn test_from_uri_hostnames() {
        let printer = NetworkPrinter::from_uri("tcp://localhost").unwrap();
        assert_eq!(printer.host(), "localhost");
        assert_eq!(printer.port(), DEFAULT_PORT);

        let printer = NetworkPrinter::from_uri("tcp://brother-ql.local:9100").unwrap();
        assert_eq!(printer.host(), "brother-ql.local");
        assert_eq!(printer.address(), "brother-ql.local:9100");
    }

    #[test]
    fn test_invalid_addr() {
        assert!(NetworkPrinter::from_uri("tcp://").is_err());
        assert!(NetworkPrinter::from_uri("tcp://printer:notaport").is_err());
        assert!(NetworkPrinter::from_uri("tcp://bad host").is_err());
        assert!(NetworkPrinter::from_uri("tcp://:9100").is_err());
    }

    #[tokio::test]
    async fn test_print_resolves_hostname() {
        let (addr, handle) = fake_printer(vec![frame(0x01, 0, 0)]).await;
        let printer = NetworkPrinter::new("localhost", addr.port()).unwrap();

        printer.print(&[0x1B, 0x40, 0x1A]).await.unwrap();
        assert_eq!(handle.await.unwrap(), vec![0x1B, 0x40, 0x1A]);
    }

    #[tokio::test]
    async fn test_write_is_bounded_by_timeout() {
        // Accepts the connection but never reads
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _holder = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let printer = NetworkPrinter::new(&addr.ip().to_string(), addr.port())
            .unwrap()
            .with_timeout(Duration::from_millis(300));
        let data = vec![0u8; 64 * 1024 * 1024];

        let started = std::time::Instant::now();
        let err = printer.print(&data).await.unwrap_err();
        assert!(matches!(err, PrintError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_print_waits_for_completion() {
        let (addr, handle) = fake_printer(vec![frame(0x00, 0, 0), frame(0x01, 0, 0)]).await;
        let printer = NetworkPrinter::new(&addr.ip().to_string(), addr.port()).unwrap();

        printer.print(&[0x1B, 0x40, 0x1A]).await.unwrap();

        let received = handle.await.unwrap();
        assert_eq!(received, vec![0x1B, 0x40, 0x1A]);
    }

    #[tokio::test]
    async fn test_print_error_status_rejects() {
        let (addr, _handle) = fake_printer(vec![frame(0x02, 0x01, 0)]).await;
        let printer = NetworkPrinter::new(&addr.ip().to_string(), addr.port()).unwrap();

        let err = printer.print(&[0x1A]).await.unwrap_err();
        assert!(matches!(err, PrintError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_print_without_status_reply() {
        let (addr, _handle) = fake_printer(vec![]).await;
        let printer = NetworkPrinter::new(&addr.ip().to_string(), addr.port())
            .unwrap()
            .with_status_wait(Duration::from_millis(200));

        assert!(printer.print(&[0x1A]).await.is_ok());
    }

    #[tokio::test]
    async fn test_print_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let printer = NetworkPrinter::new(&addr.ip().to_string(), addr.port()).unwrap();
        let err = printer.print(&[0x1A]).await.unwrap_err();
        assert!(matches!(err, PrintError::Connection(_) | PrintError::Timeout(_)));
    }
}
