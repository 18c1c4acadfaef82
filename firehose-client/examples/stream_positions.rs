//! Print live position reports inside a bounding box until Ctrl-C.
//!
//! ```bash
//! FIREHOSE_USERNAME=me FIREHOSE_PASSWORD=key \
//! MIN_LAT=40 MIN_LON=-75 MAX_LAT=42 MAX_LON=-72 \
//!     cargo run --example stream_positions -p firehose-rs-client
//! ```

use firehose_rs_client::{Cancellation, FirehoseStream};
use firehose_rs_protocol::{Event, InitCommand, Message, Rectangle};

fn env_or(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> firehose_rs_client::Result<()> {
    let username = std::env::var("FIREHOSE_USERNAME").unwrap_or_default();
    let password = std::env::var("FIREHOSE_PASSWORD").unwrap_or_default();
    let bounds = Rectangle::new(
        env_or("MIN_LAT", -90.0),
        env_or("MIN_LON", -180.0),
        env_or("MAX_LAT", 90.0),
        env_or("MAX_LON", 180.0),
    );

    let cancel = Cancellation::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut stream = FirehoseStream::connect().await?;
    let command = InitCommand::new(username, password)
        .live()
        .event(Event::Position)
        .latlong(bounds);
    stream.initiate_command(&command).await?;

    loop {
        match stream.next_message(&cancel).await {
            Ok(Some(Message::Position(pos))) => println!("{pos:#?}"),
            Ok(Some(Message::Error(e))) => eprintln!("server error: {}", e.message),
            Ok(None) => return Ok(()),
            Err(e) if e.is_cancelled() => return Ok(()),
            Err(e) if !e.is_fatal() => eprintln!("skipping message: {e}"),
            Err(e) => return Err(e),
        }
    }
}
