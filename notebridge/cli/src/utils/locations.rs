/// Default locations stored in `~/.notebridge`
///
/// .
/// └── log
///    ├── list.log
///    └── monitor.log
///
use std::path::PathBuf;

pub fn notebridge() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".notebridge"))
}

pub fn log() -> Option<PathBuf> {
    Some(notebridge()?.join("log"))
}

pub fn log_file(name: &str) -> Option<PathBuf> {
    Some(log()?.join(format!("{name}.log")))
}
