use crate::ui::widgets::notes::note_name;
use colored::*;
use crossbeam::channel::{Receiver, TryRecvError};
use notebridge::{store::State, MidiSession};
use std::{io::Write, time::Duration};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Print every state change until stdin reaches EOF or reads a `q` line.
pub fn run(session: &MidiSession, out: &mut impl Write) -> anyhow::Result<()> {
    let quit = watch_stdin();
    let mut printed = Printed::default();
    let mut revision = session.store().revision();

    printed.print(&session.store().state(), &mut *out)?;

    loop {
        match quit.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => (),
        }

        let (next, state) = session.store().wait_for_change(revision, POLL_INTERVAL);
        if next != revision {
            revision = next;
            printed.print(&state, &mut *out)?;
        }
    }

    Ok(())
}

fn watch_stdin() -> Receiver<()> {
    let (sender, receiver) = crossbeam::channel::bounded(1);

    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) if line.trim() == "q" => break,
                Ok(_) => (),
                Err(e) => {
                    log::error!("failed to read stdin : {e}");
                    break;
                }
            }
        }

        let _ = sender.send(());
    });

    receiver
}

/// What has already been written, so only changes get printed.
#[derive(Default)]
struct Printed {
    notes: Option<String>,
    errors: usize,
}

impl Printed {
    fn print(&mut self, state: &State, out: &mut impl Write) -> anyhow::Result<()> {
        for error in state.errors.iter().skip(self.errors) {
            writeln!(out, "{} {}", "error:".red().bold(), error)?;
        }
        self.errors = state.errors.len();

        let notes = format_notes(state);
        if self.notes.as_ref() != Some(&notes) {
            writeln!(out, "{notes}")?;
            self.notes = Some(notes);
        }

        out.flush()?;
        Ok(())
    }
}

pub fn format_notes(state: &State) -> String {
    if state.notes.is_empty() {
        return "notes : -".to_owned();
    }

    let notes: Vec<_> = state
        .notes
        .iter()
        .map(|(&note, velocity)| format!("{}({note})={velocity}", note_name(note)))
        .collect();

    format!("notes : {}", notes.join(" "))
}
