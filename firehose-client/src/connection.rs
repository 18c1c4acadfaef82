use std::io;
use std::sync::Arc;
use std::time::Duration;

use firehose_rs_protocol::{JsonFramer, Message};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{self, RootCertStore};
use tracing::{debug, trace};

use crate::error::{ClientError, Result};
use crate::state::DEFAULT_MAX_MESSAGE_SIZE;

/// Transport produced by [`connect_tls`].
pub type TlsTransport = TlsStream<TcpStream>;

/// TCP connect plus TLS handshake, verified against the Mozilla root store.
/// No client certificate is presented.
pub async fn connect_tls(address: &str, connect_timeout: Duration) -> Result<TlsTransport> {
    let host = host_of(address);
    let server_name = ServerName::try_from(host)
        .map_err(|_| ClientError::InvalidServerName(host.to_owned()))?
        .to_owned();

    let connector = tls_connector()?;

    debug!(address, "TCP connecting");
    let handshake = async {
        let tcp = TcpStream::connect(address).await?;
        tcp.set_nodelay(true).ok();
        debug!(address, "TLS handshake");
        connector.connect(server_name, tcp).await
    };

    tokio::time::timeout(connect_timeout, handshake)
        .await
        .map_err(|_| ClientError::Timeout(connect_timeout))?
        .map_err(ClientError::Connect)
}

/// Uses the ring provider explicitly rather than the process-wide default,
/// which is ambiguous when several rustls backends are linked.
fn tls_connector() -> Result<TlsConnector> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(ClientError::Tls)?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(config)))
}

/// Host part of `host:port`, without IPv6 brackets.
///
/// An unbracketed address with more than one colon is a bare IPv6 address
/// and is returned unchanged.
fn host_of(address: &str) -> &str {
    if let Some(rest) = address.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(host, _)| host);
    }
    match address.split_once(':') {
        Some((host, port)) if !port.contains(':') => host,
        _ => address,
    }
}

/// Reads one JSON value at a time from a byte stream and decodes it.
///
/// Only the value currently being read is buffered, up to a maximum size.
pub struct MessageReader<R> {
    reader: BufReader<R>,
    framer: JsonFramer,
    buf: Vec<u8>,
    max_message_size: usize,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_max_message_size(inner, DEFAULT_MAX_MESSAGE_SIZE)
    }

    /// A value longer than `max_message_size` bytes fails the read with
    /// [`ClientError::MessageTooLarge`].
    pub fn with_max_message_size(inner: R, max_message_size: usize) -> Self {
        Self {
            reader: BufReader::new(inner),
            framer: JsonFramer::new(),
            buf: Vec::new(),
            max_message_size,
        }
    }

    /// Read and decode the next message.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly between values. A
    /// decode failure consumes exactly the offending value, so the next call
    /// starts at the following one.
    pub async fn read_message(&mut self) -> Result<Option<Message>> {
        let Some(raw) = self.read_value().await? else {
            return Ok(None);
        };
        trace!(len = raw.len(), "value framed");
        Ok(Some(Message::decode(&raw)?))
    }

    async fn read_value(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            let available = self.reader.fill_buf().await.map_err(ClientError::Read)?;

            if available.is_empty() {
                let idle = self.framer.is_idle();
                if self.framer.finish() {
                    return Ok(Some(std::mem::take(&mut self.buf)));
                }
                self.buf.clear();
                if idle {
                    return Ok(None);
                }
                return Err(ClientError::Read(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended inside a JSON value",
                )));
            }

            match self.framer.scan(available) {
                Some(end) => {
                    self.buf.extend_from_slice(&available[..end]);
                    self.reader.consume(end);
                    self.check_size()?;
                    return Ok(Some(std::mem::take(&mut self.buf)));
                }
                None => {
                    let n = available.len();
                    if self.framer.is_idle() {
                        // Whitespace between values.
                        self.buf.clear();
                    } else {
                        self.buf.extend_from_slice(available);
                    }
                    self.reader.consume(n);
                    self.check_size()?;
                }
            }
        }
    }

    fn check_size(&mut self) -> Result<()> {
        if self.buf.len() > self.max_message_size {
            self.buf.clear();
            return Err(ClientError::MessageTooLarge(self.max_message_size));
        }
        Ok(())
    }
}
