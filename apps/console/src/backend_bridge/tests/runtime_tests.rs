use super::*;

use std::time::Duration;

use async_trait::async_trait;
use client_core::GenerationResult;
use crossbeam_channel::bounded;
use shared::{
    domain::{Breakdown, CoveragePercent},
    protocol::GenerationRequest,
};

use crate::controller::reducer::{Controller, ViewState};

/// Answers from the code itself: `slow ...` sleeps first, `panic` panics, `fail` returns a
/// service error, anything else succeeds with the code echoed back as test code.
struct ScriptedService;

#[async_trait]
impl GenerationService for ScriptedService {
    async fn generate_tests(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ServiceCallError> {
        let code = request.code_content.as_str();
        if code.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        if code == "panic" {
            panic!("scripted service panic");
        }
        if code == "fail" {
            return Err(ServiceCallError::service(500, Some("AI quota exceeded".into())));
        }
        Ok(GenerationResult {
            test_code: format!("# tests for {code}"),
            coverage: CoveragePercent::from_estimate(Some(91.2)),
            breakdown: Breakdown::default(),
            total_tests: 1,
            tested_functions: 1,
            explanation: None,
        })
    }
}

fn start() -> (
    Sender<BackendCommand>,
    Receiver<UiEvent>,
    thread::JoinHandle<()>,
) {
    start_with_ui_capacity(8)
}

fn start_with_ui_capacity(
    capacity: usize,
) -> (
    Sender<BackendCommand>,
    Receiver<UiEvent>,
    thread::JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = bounded(capacity);
    let handle = launch(Arc::new(ScriptedService), cmd_rx, ui_tx);
    (cmd_tx, ui_rx, handle)
}

fn recv_settled(ui_rx: &Receiver<UiEvent>) -> (RequestToken, Result<GenerationResult, ServiceCallError>) {
    match ui_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("settled event")
    {
        UiEvent::GenerationSettled { token, outcome } => (token, outcome),
        UiEvent::Input(_) => panic!("unexpected input event"),
    }
}

#[test]
fn each_command_settles_with_its_token() {
    let (cmd_tx, ui_rx, handle) = start();
    cmd_tx
        .send(BackendCommand::Generate {
            token: RequestToken(4),
            request: GenerationRequest::new("def f(): pass"),
        })
        .expect("send");

    let (token, outcome) = recv_settled(&ui_rx);
    assert_eq!(token, RequestToken(4));
    assert_eq!(outcome.expect("success").test_code, "# tests for def f(): pass");

    drop(cmd_tx);
    handle.join().expect("worker exits");
}

#[test]
fn service_errors_are_delivered_not_swallowed() {
    let (cmd_tx, ui_rx, _handle) = start();
    cmd_tx
        .send(BackendCommand::Generate {
            token: RequestToken(1),
            request: GenerationRequest::new("fail"),
        })
        .expect("send");

    let (_, outcome) = recv_settled(&ui_rx);
    assert_eq!(
        outcome.expect_err("service error"),
        ServiceCallError::service(500, Some("AI quota exceeded".into()))
    );
}

#[test]
fn panicking_request_still_settles() {
    let (cmd_tx, ui_rx, _handle) = start();
    cmd_tx
        .send(BackendCommand::Generate {
            token: RequestToken(2),
            request: GenerationRequest::new("panic"),
        })
        .expect("send");

    let (token, outcome) = recv_settled(&ui_rx);
    assert_eq!(token, RequestToken(2));
    let err = outcome.expect_err("task failure");
    assert!(err.is_transport());
    assert!(err.to_string().contains("generation task failed"));
}

#[test]
fn slower_earlier_request_does_not_overwrite_newer_result() {
    let (cmd_tx, ui_rx, _handle) = start();
    let mut controller = Controller::new("http://localhost:8000", GenerationRequest::new(""));

    let first = controller.submit("slow first").expect("command");
    cmd_tx.send(first).expect("send");
    let second = controller.submit("second").expect("command");
    cmd_tx.send(second).expect("send");

    for _ in 0..2 {
        let (token, outcome) = recv_settled(&ui_rx);
        controller.apply(UiEvent::GenerationSettled { token, outcome });
    }

    let snapshot = controller.snapshot();
    match &snapshot.view {
        ViewState::Result(result) => assert_eq!(result.test_code, "# tests for second"),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[test]
fn results_queue_up_behind_a_full_ui_queue() {
    let (cmd_tx, ui_rx, handle) = start_with_ui_capacity(1);
    for id in 1..=16 {
        cmd_tx
            .send(BackendCommand::Generate {
                token: RequestToken(id),
                request: GenerationRequest::new(format!("x = {id}")),
            })
            .expect("send");
    }
    thread::sleep(Duration::from_millis(200));

    let mut tokens: Vec<u64> = (0..16).map(|_| recv_settled(&ui_rx).0 .0).collect();
    tokens.sort_unstable();
    assert_eq!(tokens, (1..=16).collect::<Vec<_>>());

    drop(cmd_tx);
    handle.join().expect("worker exits");
}
