//! Reads code blocks from a line source and forwards them as input events.

use std::{
    io::BufRead,
    thread,
};

use crossbeam_channel::Sender;

use crate::controller::events::{InputEvent, UiEvent};

pub const SUBMIT_LINE: &str = ".";
pub const QUIT_LINE: &str = ":quit";

/// Spawns a reader thread. Lines accumulate into a buffer that is submitted on a line holding
/// only `.`; `:quit` or end of input sends `InputEvent::Closed`.
pub fn spawn_reader<R>(reader: R, ui_tx: Sender<UiEvent>) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || read_blocks(reader, &ui_tx))
}

fn read_blocks(reader: impl BufRead, ui_tx: &Sender<UiEvent>) {
    let mut buffer = String::new();
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!("failed to read input: {err}");
                break;
            }
        };
        match line.trim_end() {
            SUBMIT_LINE => {
                let block = std::mem::take(&mut buffer);
                if ui_tx.send(UiEvent::Input(InputEvent::Submit(block))).is_err() {
                    return;
                }
            }
            QUIT_LINE => break,
            _ => {
                buffer.push_str(&line);
                buffer.push('\n');
            }
        }
    }
    let _ = ui_tx.send(UiEvent::Input(InputEvent::Closed));
}
