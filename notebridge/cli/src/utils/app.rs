use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

pub enum Flow {
    Continue,
    Exit,
}

pub trait Base {
    /// Called at terminal refresh rate
    fn update(&mut self) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called when a key press has been detected
    fn on_keypress(&mut self, _key: KeyEvent) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Render the terminal UI frame
    fn render(&mut self, frame: &mut Frame);
}

fn is_force_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn run(
    terminal: &mut Terminal<impl Backend>,
    app: &mut impl Base,
    fps: f32,
) -> anyhow::Result<()> {
    terminal.clear()?;

    let tick_rate = Duration::from_secs_f32(1. / fps.max(1.));
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    if is_force_quit(&key) {
                        return Ok(());
                    }

                    if let Flow::Exit = app.on_keypress(key)? {
                        return Ok(());
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            if let Flow::Exit = app.update()? {
                return Ok(());
            }
        }
    }
}
