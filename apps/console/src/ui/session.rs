//! The UI event loop. It owns the controller and is the only place that mutates it.

use std::io::Write;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{InputEvent, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::{Controller, ViewSnapshot},
};
use crate::ui::render::{render, PROMPT_HINT};

pub struct Session<W: Write> {
    controller: Controller,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        controller: Controller,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        out: W,
    ) -> Self {
        Self {
            controller,
            cmd_tx,
            ui_rx,
            out,
        }
    }

    /// Submits `source_code` once and returns the snapshot after the request settled.
    pub fn run_once(mut self, source_code: &str) -> Result<ViewSnapshot> {
        self.submit(source_code)?;
        while self.controller.is_loading() {
            let event = self
                .ui_rx
                .recv()
                .context("backend worker stopped before the request settled")?;
            self.handle_backend_event(event)?;
        }
        Ok(self.controller.snapshot())
    }

    /// Processes input and backend events until input closes and the latest request settled.
    pub fn run_interactive(mut self) -> Result<ViewSnapshot> {
        writeln!(self.out, "{PROMPT_HINT}")?;
        let mut closing = false;
        while !(closing && !self.controller.is_loading()) {
            let Ok(event) = self.ui_rx.recv() else {
                tracing::debug!("ui event queue closed");
                break;
            };
            match event {
                UiEvent::Input(InputEvent::Submit(source_code)) => self.submit(&source_code)?,
                UiEvent::Input(InputEvent::Closed) => closing = true,
                event => self.handle_backend_event(event)?,
            }
        }
        Ok(self.controller.snapshot())
    }

    fn submit(&mut self, source_code: &str) -> Result<()> {
        if let Some(cmd) = self.controller.submit(source_code) {
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.controller);
        }
        self.render()
    }

    fn handle_backend_event(&mut self, event: UiEvent) -> Result<()> {
        if self.controller.apply(event) {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        render(&self.controller.snapshot(), &mut self.out).context("failed to write output")
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
