//! Console input forwarding.
//!
//! Reads stdin line by line on a blocking task and forwards each line to the
//! main application over an async channel.

use std::{
    io::{self, BufRead},
    time::Duration,
};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards console lines to the application.
pub struct ConsoleHandler {
    line_tx: mpsc::Sender<String>,
}

impl ConsoleHandler {
    /// Create a handler feeding `line_tx`.
    pub fn new(line_tx: mpsc::Sender<String>) -> Self {
        Self { line_tx }
    }

    /// Forward lines until stdin closes or shutdown is signalled.
    ///
    /// Consumes the handler so the line channel closes when input ends,
    /// which the application treats as a quit.
    #[instrument(skip_all)]
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let (event_tx, mut event_rx) = mpsc::channel::<String>(32);

        // Shutdown: when event_rx is dropped, the next blocking_send() fails
        // and the loop ends. A read already blocked on stdin is left to the
        // runtime's shutdown timeout.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if event_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read console input");
                        break;
                    }
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console handler shutting down");
                    break;
                }
                line = event_rx.recv() => match line {
                    Some(line) => {
                        if self.line_tx.send(line).await.is_err() {
                            debug!("Application stopped listening");
                            break;
                        }
                    }
                    None => {
                        info!("Console input closed");
                        break;
                    }
                }
            }
        }

        drop(event_rx);

        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Console reader stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Console reader task panicked"),
            Err(_) => debug!("Console reader still blocked on stdin, will be cleaned up on exit"),
        }
    }
}
