//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::GenerationService;
use crossbeam_channel::{Receiver, Sender};
use shared::{domain::RequestToken, error::ServiceCallError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Starts the backend worker thread. Every command received produces exactly one
/// `UiEvent::GenerationSettled`, including when the runtime cannot start or a request task
/// dies. The worker exits once every command sender is dropped.
pub fn launch(
    service: Arc<dyn GenerationService>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let reason = format!("backend worker startup failure: {err}");
                while let Ok(cmd) = cmd_rx.recv() {
                    settle(&ui_tx, cmd.token(), Err(ServiceCallError::Transport(reason.clone())));
                }
                return;
            }
        };

        runtime.block_on(async move {
            tracing::debug!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Generate { token, request } => {
                        let service = Arc::clone(&service);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let task = tokio::spawn(async move {
                                service.generate_tests(&request).await
                            });
                            let outcome = match task.await {
                                Ok(outcome) => outcome,
                                Err(err) => Err(ServiceCallError::Transport(format!(
                                    "generation task failed: {err}"
                                ))),
                            };
                            // The UI queue is bounded; a full queue must not stall a runtime worker.
                            let delivered = tokio::task::spawn_blocking(move || {
                                settle(&ui_tx, token, outcome)
                            })
                            .await;
                            if let Err(err) = delivered {
                                tracing::error!(%token, "failed to deliver generation result: {err}");
                            }
                        });
                    }
                }
            }
            tracing::debug!("backend worker command queue closed");
        });
    })
}

fn settle(
    ui_tx: &Sender<UiEvent>,
    token: RequestToken,
    outcome: Result<client_core::GenerationResult, ServiceCallError>,
) {
    if ui_tx
        .send(UiEvent::GenerationSettled { token, outcome })
        .is_err()
    {
        tracing::debug!(%token, "ui event queue closed; dropping generation result");
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
