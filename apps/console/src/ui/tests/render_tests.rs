use super::*;

use shared::{
    domain::{Breakdown, CoveragePercent, RequestToken},
    error::ServiceCallError,
};

use crate::controller::events::UiError;

fn rendered(snapshot: &ViewSnapshot) -> String {
    let mut out = Vec::new();
    render(snapshot, &mut out).expect("render");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn idle_without_notice_renders_nothing() {
    let snapshot = ViewSnapshot {
        view: ViewState::Idle,
        notice: None,
    };
    assert_eq!(rendered(&snapshot), "");
}

#[test]
fn notice_is_rendered_above_view() {
    let snapshot = ViewSnapshot {
        view: ViewState::Loading {
            token: RequestToken(3),
        },
        notice: Some("Please paste some code first.".into()),
    };
    assert_eq!(
        rendered(&snapshot),
        "! Please paste some code first.\nGenerating tests (request #3)...\n"
    );
}

#[test]
fn result_lists_coverage_counts_and_code() {
    let snapshot = ViewSnapshot {
        view: ViewState::Result(GenerationResult {
            test_code: "def test_add():\n    assert add(1, 2) == 3".into(),
            coverage: CoveragePercent::from_estimate(Some(87.6)),
            breakdown: Breakdown {
                basic: 2,
                edge: 1,
                ..Breakdown::default()
            },
            total_tests: 3,
            tested_functions: 1,
            explanation: Some("AST generation".into()),
        }),
        notice: None,
    };

    let text = rendered(&snapshot);
    assert!(text.starts_with("Coverage: 88%\nTests: 3 total, 1 function(s) tested\n"));
    assert!(text.contains("  basic:         2\n"));
    assert!(text.contains("  edge cases:    1\n"));
    assert!(text.contains("  branches:      0\n"));
    assert!(text.contains("Notes: AST generation\n"));
    assert!(text.contains("    assert add(1, 2) == 3\n---"));
}

#[test]
fn error_output_is_rendered_verbatim() {
    let error = UiError::from_call_error(
        &ServiceCallError::service(500, Some("AI quota exceeded".into())),
        "http://localhost:8000",
    );
    let snapshot = ViewSnapshot {
        view: ViewState::Error(error),
        notice: None,
    };
    assert_eq!(rendered(&snapshot), "# Error: AI quota exceeded\n");
}
