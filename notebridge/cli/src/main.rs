mod list;
mod monitor;
mod ui;
mod utils;
pub use utils::*;

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::Write;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: CommonOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
pub struct CommonOptions {
    /// Log verbosity level
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available MIDI inputs
    List(list::Options),
    /// Track the notes currently sounding on MIDI inputs
    Monitor(monitor::Options),
    /// `notebridge completions --generate=zsh > notebridge.zsh`
    Completions(Completions),
}

#[derive(Debug, Parser)]
#[command(arg_required_else_help(true))]
struct Completions {
    /// shell to generate the completion script for
    #[arg(long = "generate", value_enum)]
    shell: Option<clap_complete::Shell>,
}

impl Completions {
    fn generate(&self) -> anyhow::Result<()> {
        let Some(shell) = self.shell else {
            anyhow::bail!("no shell specified for autocompletion generation");
        };

        let mut stdout = std::io::stdout();
        stdout.flush()?;

        let mut cli = Cli::command();
        clap_complete::generate(shell, &mut cli, "notebridge", &mut stdout);

        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let app_result = match args.command {
        Commands::List(opts) => list::run(opts),
        Commands::Monitor(opts) => monitor::run(opts, args.opts),
        Commands::Completions(c) => c.generate(),
    };

    if let Err(e) = app_result {
        if logger::is_active() {
            log::error!("{e}");
        }

        use colored::*;
        eprintln!("{} {}", "Error:".red().bold(), format!("{e}").bold());
        std::process::exit(1);
    }

    Ok(())
}
