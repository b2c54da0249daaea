use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

type CrossTerminal = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Run `f` inside the alternate screen. The terminal is restored even when `f` fails.
pub fn with_terminal<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut CrossTerminal) -> anyhow::Result<()>,
{
    let mut terminal = acquire()?;
    set_panic_hook();
    let result = f(&mut terminal);
    release()?;
    result
}

fn acquire() -> anyhow::Result<CrossTerminal> {
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    crossterm::terminal::enable_raw_mode()?;

    let mut terminal = Terminal::new(backend::CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;

    Ok(terminal)
}

fn release() -> anyhow::Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

fn set_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        // the event loop catches and logs handler panics itself,
        // tearing the screen down for those would leave the app running blind
        if std::thread::current().name() == Some(notebridge::session::EVENT_LOOP_NAME) {
            return;
        }

        if let Err(e) = release() {
            eprintln!("failed to restore the terminal : {e}");
        }
        original_hook(panic);
    }));
}
