use firehose_rs_protocol::Message;
use futures_core::Stream;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::FirehoseStream;
use crate::cancel::Cancellation;
use crate::error::ClientError;

/// Convert an initiated [`FirehoseStream`] into a [`Stream`] of messages.
///
/// Per-message decode errors are yielded as `Err` and reading continues.
/// The stream ends when the server closes the connection, when `cancel` is
/// cancelled, or right after yielding any other error.
pub fn message_stream<T>(
    mut client: FirehoseStream<T>,
    cancel: Cancellation,
) -> impl Stream<Item = Result<Message, ClientError>>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    async_stream::stream! {
        loop {
            match client.next_message(&cancel).await {
                Ok(Some(message)) => yield Ok(message),
                Ok(None) => break,
                Err(e) if e.is_cancelled() => break,
                Err(e) => {
                    let fatal = e.is_fatal();
                    yield Err(e);
                    if fatal {
                        break;
                    }
                }
            }
        }
    }
}
