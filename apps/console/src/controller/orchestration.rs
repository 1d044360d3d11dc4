//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::Controller;

/// Queues `cmd` for the backend worker. A command that cannot be queued settles its request
/// immediately so the controller never stays in the loading state.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    controller: &mut Controller,
) {
    let cmd_name = cmd.name();
    let token = cmd.token();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, %token, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            controller.dispatch_failed(token, "request queue is full; please retry");
        }
        Err(TrySendError::Disconnected(_)) => {
            controller.dispatch_failed(
                token,
                "backend worker disconnected (possible startup/runtime failure)",
            );
        }
    }
}
