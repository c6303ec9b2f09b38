//! Line input for interactive sessions
//!
//! Tokio's own stdin reads on the blocking pool, and the runtime waits for a
//! pending read before it shuts down. Reading on a detached thread instead
//! lets the process exit after Ctrl-C while a read is still outstanding.

use std::io::BufRead;

use tokio::io::{AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::mpsc;

use crate::Result;

const PIPE_CAPACITY: usize = 8 * 1024;

/// Read `source` line by line on its own thread
///
/// The returned reader yields the same lines and reaches end of input when
/// `source` does. Must be called inside a tokio runtime.
///
/// # Errors
///
/// Returns error if the reader thread cannot be spawned
pub fn spawn_line_reader<R>(source: R) -> Result<BufReader<DuplexStream>>
where
    R: BufRead + Send + 'static,
{
    let (lines_tx, mut lines_rx) = mpsc::unbounded_channel::<String>();

    std::thread::Builder::new()
        .name("cadence-input".to_string())
        .spawn(move || {
            for line in source.lines() {
                match line {
                    Ok(line) => {
                        if lines_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "input read failed");
                        break;
                    }
                }
            }
        })?;

    let (mut writer, reader) = tokio::io::duplex(PIPE_CAPACITY);
    tokio::spawn(async move {
        while let Some(mut line) = lines_rx.recv().await {
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    Ok(BufReader::new(reader))
}

/// Lines from this process's stdin
///
/// # Errors
///
/// Returns error if the reader thread cannot be spawned
pub fn stdin_lines() -> Result<BufReader<DuplexStream>> {
    spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use tokio::io::AsyncBufReadExt;

    use super::*;

    /// A source whose reads never return
    struct Stalled;

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            loop {
                std::thread::park();
            }
        }
    }

    #[tokio::test]
    async fn lines_arrive_in_order_then_end() {
        let reader = spawn_line_reader(Cursor::new("first\nsecond line\n")).unwrap();
        let mut lines = reader.lines();

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("second line"));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn stalled_source_does_not_hold_the_runtime() {
        let reader = spawn_line_reader(std::io::BufReader::new(Stalled)).unwrap();
        let mut lines = reader.lines();

        let read = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            lines.next_line(),
        )
        .await;
        // Returning from here drops the runtime with the read still pending
        assert!(read.is_err());
    }
}
