use colored::*;
use notebridge::midi::{request_access, MidiSource};

#[derive(Debug, clap::Parser)]
pub struct Options {
    /// Name registered with the MIDI backend while listing
    #[arg(long, default_value = "notebridge-list")]
    client_name: String,
}

pub fn run(opts: Options) -> anyhow::Result<()> {
    let source = request_access(&opts.client_name)?;
    print_inputs(&*source, &mut std::io::stdout())
}

fn print_inputs(source: &dyn MidiSource, out: &mut impl std::io::Write) -> anyhow::Result<()> {
    let inputs = source.list_inputs()?;

    if inputs.is_empty() {
        writeln!(out, "{}", "no MIDI inputs found".yellow())?;
        return Ok(());
    }

    for (index, name) in inputs.iter().enumerate() {
        writeln!(out, "{} {}", format!("[{index}]").dimmed(), name.bold())?;
    }

    Ok(())
}
