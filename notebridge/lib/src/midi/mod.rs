#[cfg(feature = "hosted")]
mod hosted;

#[cfg(feature = "hosted")]
pub use hosted::*;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MidiData {
    pub timestamp: u64,
    pub bytes: Vec<u8>,
}

impl MidiData {
    pub fn new(timestamp: u64, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            timestamp,
            bytes: bytes.into(),
        }
    }
}

/// Invoked by a source for every message received on an input.
/// Runs on whatever thread the source delivers from, so it must not block.
pub type MidiCallback = Box<dyn FnMut(MidiData) + Send + 'static>;

/// A registered callback on a single input.
pub trait Listener {
    ///
    fn input_name(&self) -> &str;
    /// Deregister the callback. No further invocations happen once this returns.
    fn close(self: Box<Self>);
}

/// A push-based source of MIDI messages, one callback per input.
pub trait MidiSource {
    ///
    fn list_inputs(&self) -> anyhow::Result<Vec<String>>;
    ///
    fn listen(&mut self, input: &str, callback: MidiCallback) -> anyhow::Result<Box<dyn Listener>>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("MIDI is not supported on this host")]
    Unsupported,
    #[error("failed to access MIDI inputs : {0}")]
    Failure(String),
}

/// Acquire the host's MIDI inputs.
#[cfg(feature = "hosted")]
pub fn request_access(client_name: &str) -> Result<Box<dyn MidiSource>, AccessError> {
    let source = HostedMidiSource::new(client_name)?;
    log::trace!("[ MIDI ] : access granted to {client_name}");
    Ok(Box::new(source))
}

/// Acquire the host's MIDI inputs.
#[cfg(not(feature = "hosted"))]
pub fn request_access(client_name: &str) -> Result<Box<dyn MidiSource>, AccessError> {
    log::trace!("[ MIDI ] : no backend compiled in, refusing access to {client_name}");
    Err(AccessError::Unsupported)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn access_errors_are_distinct() {
        let unsupported = AccessError::Unsupported;
        let failure = AccessError::Failure("no sequencer".into());
        assert_ne!(unsupported.to_string(), failure.to_string());
        assert!(failure.to_string().contains("no sequencer"));
    }

    #[cfg(not(feature = "hosted"))]
    #[test]
    fn access_is_unsupported_without_a_backend() {
        assert_eq!(
            request_access("test").err(),
            Some(AccessError::Unsupported)
        );
    }
}
