use firehose_rs_protocol::{InitCommand, Message};
use futures_core::Stream;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::cancel::Cancellation;
use crate::connection::{self, MessageReader, TlsTransport};
use crate::error::{ClientError, Result};
use crate::state::{ClientConfig, StreamState};

/// A live Firehose session over one transport.
///
/// State machine: `Open` → `Initiated` → `Reading` ⇄ `Decoded` → `Closed`.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> firehose_rs_client::Result<()> {
/// use firehose_rs_client::{Cancellation, FirehoseStream};
/// use firehose_rs_protocol::{Event, InitCommand, Message};
///
/// let mut stream = FirehoseStream::connect().await?;
/// let command = InitCommand::new("user", "api-key").live().event(Event::Position);
/// stream.initiate_command(&command).await?;
///
/// let cancel = Cancellation::new();
/// while let Some(msg) = stream.next_message(&cancel).await? {
///     if let Message::Position(pos) = msg {
///         println!("{:?} at {:?},{:?}", pos.ident, pos.lat, pos.lon);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct FirehoseStream<T = TlsTransport> {
    reader: Option<MessageReader<ReadHalf<T>>>,
    writer: Option<BufWriter<WriteHalf<T>>>,
    state: StreamState,
    config: ClientConfig,
}

impl FirehoseStream<TlsTransport> {
    /// Connect to the default Firehose endpoint over TLS.
    pub async fn connect() -> Result<Self> {
        Self::connect_with_config(ClientConfig::default()).await
    }

    /// Connect over TLS with a custom [`ClientConfig`].
    pub async fn connect_with_config(config: ClientConfig) -> Result<Self> {
        info!(address = %config.address, "connecting");
        let transport = connection::connect_tls(&config.address, config.connect_timeout).await?;
        info!(address = %config.address, "connected");
        Ok(Self::with_config(transport, config))
    }
}

impl<T> FirehoseStream<T>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Wrap an already established transport. No TLS is layered on top.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Wrap an already established transport; only
    /// [`read_timeout`](ClientConfig::read_timeout) and
    /// [`max_message_size`](ClientConfig::max_message_size) apply.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        let (read_half, write_half) = tokio::io::split(transport);
        Self {
            reader: Some(MessageReader::with_max_message_size(
                read_half,
                config.max_message_size,
            )),
            writer: Some(BufWriter::new(write_half)),
            state: StreamState::Open,
            config,
        }
    }

    // -- Accessors --

    /// Returns the current session state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Returns the configuration used for this stream.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -- Initiation --

    /// Send the initiation command line.
    ///
    /// A newline is appended. Sending more than one command per session is
    /// not rejected, but the server's behavior is undefined.
    pub async fn initiate(&mut self, command: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(ClientError::Closed)?;

        // The command carries the API key; log its size only.
        debug!(len = command.len(), "sending initiation command");
        writer
            .write_all(command.as_bytes())
            .await
            .map_err(ClientError::Write)?;
        writer.write_all(b"\n").await.map_err(ClientError::Write)?;
        writer.flush().await.map_err(ClientError::Write)?;

        if self.state == StreamState::Open {
            self.state = StreamState::Initiated;
        }
        Ok(())
    }

    /// Serialize and send an [`InitCommand`].
    pub async fn initiate_command(&mut self, command: &InitCommand) -> Result<()> {
        self.initiate(&command.to_string()).await
    }

    // -- Reading --

    /// Read the next message, or stop when `cancel` fires.
    ///
    /// Returns `Ok(Some(message))` on success and `Ok(None)` when the server
    /// closed the connection between messages. A per-message decode failure
    /// is returned as [`ClientError::Protocol`] and the stream stays usable.
    ///
    /// The read runs on a spawned task raced against `cancel`. If `cancel`
    /// fires first (including when it has already fired on entry), the
    /// transport is closed, the in-flight read is discarded and
    /// [`ClientError::Cancelled`] or [`ClientError::DeadlineExceeded`] is
    /// returned. A deadline on `cancel` also bounds the read itself.
    ///
    /// Transport failures close the stream. Dropping the returned future
    /// mid-read aborts the read and leaves the stream closed.
    pub async fn next_message(&mut self, cancel: &Cancellation) -> Result<Option<Message>> {
        if let Some(reason) = cancel.check() {
            debug!(?reason, "cancelled before read, closing transport");
            self.teardown();
            return Err(reason.into());
        }

        let Some(mut reader) = self.reader.take() else {
            // Closed, or an earlier read was abandoned mid-value.
            self.teardown();
            return Err(ClientError::Closed);
        };

        let limit = self.read_limit(cancel);
        self.state = StreamState::Reading;

        let mut task = AbortOnDrop(tokio::spawn(async move {
            let result = match limit {
                Some((deadline, expired)) => {
                    match tokio::time::timeout_at(deadline, reader.read_message()).await {
                        Ok(result) => result,
                        Err(_) => Err(expired),
                    }
                }
                None => reader.read_message().await,
            };
            (reader, result)
        }));

        let outcome = tokio::select! {
            biased;
            reason = cancel.fired() => Err(reason),
            joined = &mut task.0 => Ok(joined),
        };

        match outcome {
            Err(reason) => {
                debug!(?reason, "cancelled during read, closing transport");
                drop(task);
                self.teardown();
                Err(reason.into())
            }
            Ok(Err(join_error)) => {
                self.teardown();
                Err(join_error.into())
            }
            Ok(Ok((reader, result))) => match result {
                Ok(Some(message)) => {
                    trace!(message_type = message.message_type(), "message received");
                    self.reader = Some(reader);
                    self.state = StreamState::Decoded;
                    Ok(Some(message))
                }
                Err(ClientError::Protocol(e)) => {
                    debug!(error = %e, "message decode failed");
                    self.reader = Some(reader);
                    self.state = StreamState::Decoded;
                    Err(ClientError::Protocol(e))
                }
                Ok(None) => {
                    debug!("server closed the stream");
                    self.teardown();
                    Ok(None)
                }
                Err(e) => {
                    if let ClientError::Timeout(timeout) = &e {
                        warn!(?timeout, "read timeout");
                    }
                    self.teardown();
                    Err(e)
                }
            },
        }
    }

    // -- Stream conversion --

    /// Consume this stream and return a [`Stream`] of messages.
    ///
    /// See [`message_stream`](crate::stream::message_stream).
    pub fn into_messages(self, cancel: Cancellation) -> impl Stream<Item = Result<Message>> {
        crate::stream::message_stream(self, cancel)
    }

    // -- Shutdown --

    /// Shut down and drop the transport.
    ///
    /// Closing an already closed stream returns [`ClientError::Closed`].
    pub async fn close(&mut self) -> Result<()> {
        self.reader = None;
        let Some(mut writer) = self.writer.take() else {
            return Err(ClientError::Closed);
        };
        self.state = StreamState::Closed;
        debug!("closing stream");
        writer.shutdown().await.map_err(ClientError::Write)
    }

    // -- Private helpers --

    /// The earlier of the caller's deadline and the configured read timeout,
    /// paired with the error reported when it passes.
    fn read_limit(&self, cancel: &Cancellation) -> Option<(Instant, ClientError)> {
        let caller = cancel
            .deadline()
            .map(|deadline| (deadline, ClientError::DeadlineExceeded));
        let configured = self
            .config
            .read_timeout
            .map(|timeout| (Instant::now() + timeout, ClientError::Timeout(timeout)));

        match (caller, configured) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    /// Drop both halves without a graceful shutdown, so a stalled peer
    /// cannot hold up cancellation.
    fn teardown(&mut self) {
        self.reader = None;
        self.writer = None;
        self.state = StreamState::Closed;
    }
}

/// Aborts the read task when the owning call returns or is dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
