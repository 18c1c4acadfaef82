//! Integration tests against the real Firehose.
//!
//! These tests are gated by environment variables:
//! - `FIREHOSE_TEST_USERNAME`: FlightAware account with Firehose access
//! - `FIREHOSE_TEST_PASSWORD`: Firehose API key

use std::time::Duration;

use firehose_rs_client::{Cancellation, ClientError, FirehoseStream, StreamState};
use firehose_rs_protocol::{Event, InitCommand, Message};

fn credentials() -> Option<(String, String)> {
    let username = std::env::var("FIREHOSE_TEST_USERNAME").ok()?;
    let password = std::env::var("FIREHOSE_TEST_PASSWORD").ok()?;
    Some((username, password))
}

#[tokio::test]
async fn live_position() {
    let Some((username, password)) = credentials() else {
        eprintln!("skipping: FIREHOSE_TEST_USERNAME / FIREHOSE_TEST_PASSWORD not set");
        return;
    };

    let mut stream = FirehoseStream::connect().await.unwrap();
    let command = InitCommand::new(username, password)
        .live()
        .event(Event::Position);
    stream.initiate_command(&command).await.unwrap();

    let cancel = Cancellation::new().with_timeout(Duration::from_secs(60));
    let msg = stream
        .next_message(&cancel)
        .await
        .unwrap_or_else(|e| panic!("error reading first message: {e}"))
        .expect("server closed the stream");

    match msg {
        Message::Position(pos) => {
            eprintln!("position: {pos:?}");
            assert!(pos.pitr.is_some_and(|p| !p.is_empty()));
        }
        Message::Error(e) => panic!("server error: {}", e.message),
    }

    stream.close().await.unwrap();
    assert_eq!(stream.state(), StreamState::Closed);
}

#[tokio::test]
async fn bad_credentials_report_error() {
    if credentials().is_none() {
        eprintln!("skipping: FIREHOSE_TEST_USERNAME / FIREHOSE_TEST_PASSWORD not set");
        return;
    }

    let mut stream = FirehoseStream::connect().await.unwrap();
    stream
        .initiate_command(&InitCommand::new("nobody", "wrong").live())
        .await
        .unwrap();

    let cancel = Cancellation::new().with_timeout(Duration::from_secs(30));
    match stream.next_message(&cancel).await {
        Ok(Some(Message::Error(e))) => eprintln!("server error: {}", e.message),
        Ok(None) => eprintln!("server closed the stream"),
        Ok(Some(other)) => panic!("unexpected message: {other:?}"),
        Err(e @ ClientError::Read(_)) => eprintln!("connection dropped: {e}"),
        Err(e) => panic!("unexpected error: {e}"),
    }
}
