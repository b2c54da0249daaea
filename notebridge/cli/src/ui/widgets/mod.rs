//! Custom Ratatui widgets
//!
//! Stateless widgets are free functions, scoped by module.

pub mod notes;
pub mod usage;
