use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct MockConfig {
    /// Written in order after the initiation line arrives.
    pub chunks: Vec<Vec<u8>>,
    pub chunk_delay: Duration,
    /// Close the connection after the last chunk instead of idling.
    pub close_after_send: bool,
}

impl MockConfig {
    pub fn messages(messages: &[&str]) -> Self {
        Self {
            chunks: messages
                .iter()
                .map(|m| format!("{m}\n").into_bytes())
                .collect(),
            chunk_delay: Duration::ZERO,
            close_after_send: false,
        }
    }

    /// Accepts the initiation line and then never sends anything.
    pub fn silent() -> Self {
        Self::messages(&[])
    }
}

pub struct MockServer {
    addr: SocketAddr,
    init_line: Option<oneshot::Receiver<String>>,
}

impl MockServer {
    pub async fn start(config: MockConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (line_tx, line_rx) = oneshot::channel();

        tokio::spawn(async move {
            Self::handle_connection(listener, config, line_tx).await;
        });

        Self {
            addr,
            init_line: Some(line_rx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The initiation line received from the client, without its terminator.
    pub async fn init_line(&mut self) -> String {
        self.init_line
            .take()
            .expect("init line already taken")
            .await
            .unwrap()
    }

    async fn handle_connection(
        listener: TcpListener,
        config: MockConfig,
        line_tx: oneshot::Sender<String>,
    ) {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };

        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(n) if n > 0 => {}
            _ => return,
        }
        let _ = line_tx.send(line.trim_end_matches('\n').to_owned());

        for chunk in &config.chunks {
            if !config.chunk_delay.is_zero() {
                tokio::time::sleep(config.chunk_delay).await;
            }
            if write_half.write_all(chunk).await.is_err() {
                return;
            }
            let _ = write_half.flush().await;
        }

        if config.close_after_send {
            let _ = write_half.shutdown().await;
            return;
        }

        // Hold the connection open until the client goes away.
        let mut buf = [0u8; 64];
        while let Ok(n) = reader.read(&mut buf).await {
            if n == 0 {
                break;
            }
        }
    }
}
