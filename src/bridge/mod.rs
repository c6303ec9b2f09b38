//! Editor extension bridge
//!
//! An editor extension spawns `cadence bridge` and talks to it over
//! stdin/stdout, one JSON object per line. Requests come in tagged by
//! `command`, events go out tagged by `event`.

mod controller;
mod protocol;

use rand::Rng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

pub use controller::ConversationController;
pub use protocol::{BridgeEvent, BridgeRequest};

use crate::assistant::CannedResponder;
use crate::timing::{Pacer, TimingConfig};
use crate::{Flow, Result};

/// Run a bridge conversation until `stop` or end of input
///
/// Requests are read on a separate task so that `pause` and `stop` cut short
/// a response that is still being delivered. Requests queued behind them are
/// handled in order. Returns the output
/// writer once every event has been flushed.
///
/// # Errors
///
/// Returns error if writing events fails
pub async fn serve<I, O, P, R>(
    input: I,
    output: O,
    timing: TimingConfig,
    pacer: P,
    responder: CannedResponder<R>,
) -> Result<O>
where
    I: AsyncBufRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin + Send + 'static,
    P: Pacer,
    R: Rng,
{
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_events(events_rx, output));
    let mut controller = ConversationController::new(timing, pacer, responder, events_tx.clone());

    let (requests_tx, mut requests_rx) = mpsc::unbounded_channel();
    let interrupt = controller.interrupt();
    let reader = tokio::spawn(async move {
        let mut lines = input.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "bridge input failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let request = match BridgeRequest::parse(&line) {
                Ok(request) => request,
                Err(e) => {
                    let _ = events_tx.send(BridgeEvent::error(e.to_string()));
                    continue;
                }
            };

            // Cut the running delivery now; the controller reports it in order
            if matches!(request, BridgeRequest::Pause | BridgeRequest::Stop) && interrupt.raise() {
                tracing::debug!(?request, "delivery interrupted by request");
            }
            let stop = request == BridgeRequest::Stop;
            if requests_tx.send(request).is_err() || stop {
                break;
            }
        }
    });

    while let Some(request) = requests_rx.recv().await {
        if controller.handle(request).await == Flow::Quit {
            break;
        }
    }

    reader.abort();
    drop(controller);
    writer
        .await
        .map_err(|e| crate::Error::Bridge(format!("event writer failed: {e}")))?
}

async fn write_events<O: AsyncWrite + Unpin>(
    mut events: mpsc::UnboundedReceiver<BridgeEvent>,
    mut output: O,
) -> Result<O> {
    while let Some(event) = events.recv().await {
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
    }
    Ok(output)
}
