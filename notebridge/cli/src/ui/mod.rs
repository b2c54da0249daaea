pub mod widgets;

/// Decorate a block title the same way everywhere.
pub fn title(text: &str) -> String {
    format!("˧ {text} ꜔")
}
