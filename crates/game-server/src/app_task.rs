//! Central application loop.
//!
//! This task owns the `Application` and handles every `AppRequest`
//! one at a time, in arrival order. Commands and ticks never
//! interleave: each one sees the state the previous one left.

use game_core::{Application, ErrorKind};
use tracing::{debug, error, info, warn};

use crate::types::{AppRequest, AppRx};

pub async fn run_app_loop(mut app_rx: AppRx, mut app: Application) {
    while let Some(req) = app_rx.recv().await {
        match req {
            AppRequest::Command {
                client_id,
                command,
                reply,
            } => {
                let result = app.process(command);
                if let Err(err) = &result {
                    if err.kind() == ErrorKind::Internal {
                        error!(client = client_id.0, %err, "command hit an internal error");
                    } else {
                        debug!(client = client_id.0, code = err.code(), %err, "command rejected");
                    }
                }
                // The client may have gone away; its response is dropped.
                let _ = reply.send(result);
            }
            AppRequest::Tick { elapsed } => {
                if let Err(err) = app.advance(elapsed) {
                    warn!(?elapsed, %err, "tick failed");
                }
            }
        }
    }

    info!("application loop shutting down (channel closed)");
}
