mod headless;
mod ui;

use notebridge::{
    bridge::InputSelection, channel::Capacity, store::Store, BridgeConfig, MidiSession,
};
use std::{num::NonZeroUsize, path::PathBuf};

#[derive(Debug, clap::Parser)]
pub struct Options {
    /// Path to log file to write to. Defaults
    /// to system log file at ~/.notebridge/log/monitor.log
    #[arg(long)]
    log: Option<PathBuf>,

    /// Frames per second
    #[arg(long, default_value_t = 30.)]
    fps: f32,

    /// Only listen to this input, may be repeated. Listens to every input by default
    #[arg(long = "input")]
    inputs: Vec<String>,

    /// Maximum number of pending events, unbounded by default
    #[arg(long)]
    capacity: Option<NonZeroUsize>,

    /// Name registered with the MIDI backend
    #[arg(long, default_value = "notebridge-in")]
    client_name: String,

    /// Print state changes to stdout instead of drawing the terminal UI
    #[arg(long)]
    headless: bool,
}

impl Options {
    fn bridge_config(&self) -> BridgeConfig {
        let inputs = if self.inputs.is_empty() {
            InputSelection::All
        } else {
            InputSelection::Named(self.inputs.clone())
        };

        BridgeConfig {
            client_name: self.client_name.clone(),
            capacity: Capacity::from(self.capacity),
            inputs,
        }
    }
}

pub fn run(opts: Options, common: crate::CommonOptions) -> anyhow::Result<()> {
    if let Some(log_file) = opts.log.clone().or(crate::locations::log_file("monitor")) {
        crate::logger::start("monitor", log_file, common.verbose)?;
    }

    let config = opts.bridge_config();
    let access = notebridge::midi::request_access(&config.client_name);
    let mut session = MidiSession::start(access, &config, Store::default())?;

    let result = if opts.headless {
        headless::run(&session, &mut std::io::stdout())
    } else {
        crate::terminal::with_terminal(|term| {
            let mut app = ui::MonitorApp::new(&session);
            crate::app::run(term, &mut app, opts.fps)
        })
    };

    session.close()?;
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_to_every_input_and_no_bound() {
        let opts = Options::parse_from(["monitor"]);
        let config = opts.bridge_config();

        assert_eq!(config.inputs, InputSelection::All);
        assert_eq!(config.capacity, Capacity::Unbounded);
        assert_eq!(config.client_name, "notebridge-in");
        assert!(!opts.headless);
    }

    #[test]
    fn named_inputs_and_capacity_are_forwarded() {
        let opts = Options::parse_from([
            "monitor",
            "--input",
            "keys",
            "--input",
            "pads",
            "--capacity",
            "256",
        ]);
        let config = opts.bridge_config();

        assert_eq!(
            config.inputs,
            InputSelection::Named(vec!["keys".into(), "pads".into()])
        );
        assert_eq!(config.capacity, Capacity::bounded(256).unwrap());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(Options::try_parse_from(["monitor", "--capacity", "0"]).is_err());
    }
}
