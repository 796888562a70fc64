// crates/game-server/src/client.rs

//! Per-connection I/O.
//!
//! The reader splits the byte stream into lines, decodes each into a
//! `Command` and forwards it to the application task with a oneshot
//! reply. For every line it queues one `Outbound` slot, so the writer,
//! which drains the queue in order, answers requests in the order they
//! arrived even when they are pipelined.

use anyhow::{anyhow, bail};
use bytes::BytesMut;
use game_core::AppError;
use game_protocol::{decode_command, encode_response};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::types::{
    AppRequest, AppTx, ClientId, ClientRegistry, Outbound, OutboundRx, OutboundTx,
};

/// Longest request line accepted before the connection is dropped.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Run the client I/O loop for a single connection.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    app_tx: AppTx,
    clients: ClientRegistry,
) -> anyhow::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(run_writer(client_id, write_half, out_rx));

    let read_result = run_reader(client_id, read_half, &app_tx, &out_tx).await;

    // Let the writer flush whatever is still queued.
    drop(out_tx);
    let write_result = match writer.await {
        Ok(res) => res,
        Err(e) => Err(anyhow!("writer task failed: {}", e)),
    };

    {
        let mut guard = clients.write().await;
        guard.remove(&client_id);
    }

    read_result.and(write_result)
}

async fn run_reader(
    client_id: ClientId,
    mut read_half: OwnedReadHalf,
    app_tx: &AppTx,
    out_tx: &OutboundTx,
) -> anyhow::Result<()> {
    let mut buffer = BytesMut::with_capacity(4096);

    loop {
        // Process complete lines
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line = buffer.split_to(newline_pos + 1);
            if !handle_line(client_id, &line, app_tx, out_tx)? {
                return Ok(());
            }
        }

        if buffer.len() > MAX_LINE_LEN {
            bail!("client {} sent a line longer than {} bytes", client_id.0, MAX_LINE_LEN);
        }

        let n = read_half.read_buf(&mut buffer).await?;
        if n == 0 {
            // EOF. A last line without a newline still counts.
            if !buffer.is_empty() {
                let line = buffer.split();
                handle_line(client_id, &line, app_tx, out_tx)?;
            }
            return Ok(());
        }
    }
}

/// Returns `false` once the writer is gone.
fn handle_line(
    client_id: ClientId,
    line: &[u8],
    app_tx: &AppTx,
    out_tx: &OutboundTx,
) -> anyhow::Result<bool> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return Ok(true);
    }
    debug!(client = client_id.0, request = text, "request");

    let slot = match decode_command(text) {
        Ok(command) => {
            let (reply, rx) = oneshot::channel();
            let req = AppRequest::Command {
                client_id,
                command,
                reply,
            };
            if app_tx.send(req).is_err() {
                bail!("application channel closed");
            }
            Outbound::Pending(rx)
        }
        Err(err) => Outbound::Ready(encode_response(&Err(err))),
    };

    Ok(out_tx.send(slot).is_ok())
}

async fn run_writer(
    client_id: ClientId,
    mut write_half: OwnedWriteHalf,
    mut out_rx: OutboundRx,
) -> anyhow::Result<()> {
    while let Some(slot) = out_rx.recv().await {
        let line = match slot {
            Outbound::Ready(line) => line,
            Outbound::Pending(rx) => match rx.await {
                Ok(result) => encode_response(&result),
                Err(_) => {
                    warn!(client = client_id.0, "application dropped a request");
                    encode_response(&Err(AppError::Internal(
                        "request was not processed".to_string(),
                    )))
                }
            },
        };

        write_half.write_all(line.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
        write_half.flush().await?;
    }

    Ok(())
}
