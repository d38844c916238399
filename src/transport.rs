//! The network transport: a duplex byte channel, plaintext or TLS.
//!
//! The session engine drives the transport through `send` and
//! `read_chunk` and never distinguishes the two variants above the
//! byte level. TLS uses the system trust store for certificate
//! verification; the TCP socket gets protocol-level keepalive so a
//! dead peer eventually surfaces as EOF.

use std::sync::Arc;

use bytes::BytesMut;
use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

use crate::error::TransportError;

/// A connected byte channel to the IRC server.
pub enum Transport {
    /// Plain TCP.
    Tcp(TcpStream),
    /// TLS over TCP.
    Tls(Box<TlsStream<TcpStream>>),
}

fn enable_keepalive(stream: &TcpStream) {
    use std::time::Duration;

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));
    if let Err(e) = sock.set_tcp_keepalive(&keepalive) {
        warn!("failed to enable TCP keepalive: {}", e);
    }
}

fn tls_config() -> Arc<ClientConfig> {
    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        warn!("skipping unreadable system certificate: {}", err);
    }
    for cert in native.certs {
        if let Err(e) = roots.add(cert) {
            warn!("skipping invalid system certificate: {}", e);
        }
    }
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Arc::new(config)
}

impl Transport {
    /// Resolve `host`, open the TCP connection, and when `tls` is set
    /// perform the TLS client handshake immediately after connect.
    pub async fn connect(host: &str, port: u16, tls: bool) -> Result<Self, TransportError> {
        let addrs = lookup_host((host, port))
            .await
            .map_err(|source| TransportError::ResolveFailed {
                host: host.to_string(),
                source,
            })?;

        let mut last_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no address");
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = e,
            }
        }
        let stream = stream.ok_or_else(|| TransportError::ConnectFailed {
            host: host.to_string(),
            port,
            source: last_err,
        })?;
        enable_keepalive(&stream);
        debug!(host, port, tls, "connected");

        if !tls {
            return Ok(Transport::Tcp(stream));
        }

        let connector = TlsConnector::from(tls_config());
        let server_name = ServerName::try_from(host.to_string()).map_err(|e| {
            TransportError::TlsHandshakeFailed {
                host: host.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
            }
        })?;
        let tls_stream = connector.connect(server_name, stream).await.map_err(|source| {
            TransportError::TlsHandshakeFailed {
                host: host.to_string(),
                source,
            }
        })?;
        Ok(Transport::Tls(Box::new(tls_stream)))
    }

    /// True for the TLS variant.
    pub fn is_tls(&self) -> bool {
        matches!(self, Transport::Tls(_))
    }

    /// Write a full byte slice to the peer.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        match self {
            Transport::Tcp(s) => s.write_all(bytes).await?,
            Transport::Tls(s) => s.write_all(bytes).await?,
        }
        Ok(())
    }

    /// Read whatever is available into `buf`.
    ///
    /// Returns the number of bytes read; zero means EOF.
    pub async fn read_chunk(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError> {
        let n = match self {
            Transport::Tcp(s) => s.read_buf(buf).await?,
            Transport::Tls(s) => s.read_buf(buf).await?,
        };
        Ok(n)
    }

    /// Graceful teardown: flush, send TLS `close_notify` when
    /// applicable, then close the socket. Errors are ignored; the
    /// session is over either way.
    pub async fn close(&mut self) {
        match self {
            Transport::Tcp(s) => {
                let _ = s.shutdown().await;
            }
            Transport::Tls(s) => {
                let _ = s.shutdown().await;
            }
        }
    }
}
