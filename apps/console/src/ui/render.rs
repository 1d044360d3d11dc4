use std::io::{self, Write};

use client_core::GenerationResult;

use crate::controller::reducer::{ViewSnapshot, ViewState};

pub const PROMPT_HINT: &str =
    "Paste Python code, then enter a line containing only '.' to generate tests (':quit' to exit).";

pub fn render(snapshot: &ViewSnapshot, out: &mut impl Write) -> io::Result<()> {
    if let Some(notice) = &snapshot.notice {
        writeln!(out, "! {notice}")?;
    }

    match &snapshot.view {
        ViewState::Idle => {}
        ViewState::Loading { token } => writeln!(out, "Generating tests (request {token})...")?,
        ViewState::Result(result) => render_result(result, out)?,
        ViewState::Error(error) => writeln!(out, "{}", error.output())?,
    }
    out.flush()
}

fn render_result(result: &GenerationResult, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Coverage: {}", result.coverage)?;
    writeln!(
        out,
        "Tests: {} total, {} function(s) tested",
        result.total_tests, result.tested_functions
    )?;
    for (category, count) in result.breakdown.iter() {
        writeln!(out, "  {:<15}{count}", format!("{}:", category.label()))?;
    }
    if let Some(explanation) = &result.explanation {
        writeln!(out, "Notes: {explanation}")?;
    }
    writeln!(out, "----- generated tests -----")?;
    write!(out, "{}", result.test_code)?;
    if !result.test_code.ends_with('\n') {
        writeln!(out)?;
    }
    writeln!(out, "---------------------------")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
