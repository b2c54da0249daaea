use crate::{
    app::{Base, Flow},
    ui::{title, widgets},
};
use crossterm::event::{KeyCode, KeyEvent};
use notebridge::{store::State, MidiSession};
use ratatui::prelude::*;

const USAGE: &str = r#"
        ? : display help
 <ESC>, q : quit or hide help
    <C-c> : force quit
"#;

pub struct MonitorApp<'a> {
    session: &'a MidiSession,
    state: State,
    show_usage: bool,
}

impl<'a> MonitorApp<'a> {
    pub fn new(session: &'a MidiSession) -> Self {
        Self {
            state: session.store().state(),
            session,
            show_usage: false,
        }
    }

    fn notes_title(&self) -> String {
        let status = if self.session.is_running() {
            title("listening")
        } else {
            title("idle")
        };

        let inputs = match self.session.inputs() {
            [] => title("no inputs"),
            inputs => title(&inputs.join(", ")),
        };

        let dropped = match self.session.channel_stats() {
            Some(stats) if stats.dropped() > 0 => title(&format!("{} dropped", stats.dropped())),
            _ => String::new(),
        };

        format!("{status}─{inputs}─{dropped}")
    }
}

impl Base for MonitorApp<'_> {
    fn update(&mut self) -> anyhow::Result<Flow> {
        self.state = self.session.store().state();
        Ok(Flow::Continue)
    }

    fn on_keypress(&mut self, key: KeyEvent) -> anyhow::Result<Flow> {
        match key.code {
            KeyCode::Char('?') => self.show_usage = !self.show_usage,
            KeyCode::Char('q') | KeyCode::Esc => {
                if !self.show_usage {
                    return Ok(Flow::Exit);
                }

                self.show_usage = false;
            }
            _ => {}
        }

        Ok(Flow::Continue)
    }

    fn render(&mut self, f: &mut Frame) {
        let error_rows = if self.state.errors.is_empty() {
            0
        } else {
            self.state.errors.len().min(8) as u16 + 2
        };

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(3), Constraint::Length(error_rows)])
            .split(f.size());

        widgets::notes::render_notes(f, &self.notes_title(), &self.state.notes, sections[0]);

        if error_rows > 0 {
            widgets::notes::render_errors(f, &self.state.errors, sections[1]);
        }

        if self.show_usage {
            widgets::usage::render(f, USAGE);
        }
    }
}
