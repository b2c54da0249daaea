use crate::{
    channel::Producer,
    midi::{Listener, MidiData, MidiSource},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum InputSelection {
    #[default]
    All,
    Named(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to list MIDI inputs : {0}")]
    List(#[source] anyhow::Error),
    #[error("no MIDI input named {0}")]
    UnknownInput(String),
    #[error("failed to listen to {input} : {source}")]
    Listen {
        input: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Registers one listener per input of a [`MidiSource`] and forwards every
/// message they receive into a single channel.
///
/// Closing the bridge deregisters all listeners. It happens once, either
/// through [`Bridge::close`] or on drop.
pub struct Bridge {
    listeners: Option<Vec<Box<dyn Listener>>>,
}

impl Bridge {
    pub fn attach(
        source: &mut dyn MidiSource,
        selection: &InputSelection,
        producer: Producer<MidiData>,
    ) -> Result<Self, BridgeError> {
        let available = source.list_inputs().map_err(BridgeError::List)?;

        let inputs = match selection {
            InputSelection::All => available,
            InputSelection::Named(names) => {
                if let Some(missing) = names.iter().find(|name| !available.contains(name)) {
                    return Err(BridgeError::UnknownInput(missing.clone()));
                }
                names.clone()
            }
        };

        let mut bridge = Self {
            listeners: Some(Vec::with_capacity(inputs.len())),
        };

        for input in inputs {
            let producer = producer.clone();
            let callback = Box::new(move |midi: MidiData| {
                producer.push(midi);
            });

            // dropping `bridge` on error closes what was registered so far
            let listener = source
                .listen(&input, callback)
                .map_err(|source| BridgeError::Listen { input, source })?;

            if let Some(listeners) = bridge.listeners.as_mut() {
                listeners.push(listener);
            }
        }

        log::trace!("bridge attached to {} input(s)", bridge.inputs().len());

        Ok(bridge)
    }

    pub fn inputs(&self) -> Vec<&str> {
        self.listeners
            .iter()
            .flatten()
            .map(|listener| listener.input_name())
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.listeners.is_none()
    }

    /// Deregister every listener. Later calls do nothing.
    pub fn close(&mut self) {
        let Some(listeners) = self.listeners.take() else {
            return;
        };

        let count = listeners.len();
        for listener in listeners {
            listener.close();
        }

        log::trace!("bridge closed {count} listener(s)");
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.close();
    }
}
