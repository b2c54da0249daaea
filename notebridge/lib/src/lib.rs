pub mod bridge;
pub mod channel;
pub mod classify;
pub mod event_loop;
pub mod midi;
pub mod session;
pub mod store;

pub use session::{BridgeConfig, MidiSession};
