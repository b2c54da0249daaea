use crate::{
    bridge::{Bridge, InputSelection},
    channel::{self, Capacity, ChannelStats},
    classify::classify,
    event_loop::EventLoop,
    midi::{AccessError, MidiData, MidiSource},
    store::{Action, Store},
};
use std::sync::Arc;

/// Name of the thread that drains MIDI events into the store.
pub const EVENT_LOOP_NAME: &str = "notebridge-events";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Name the session registers with the MIDI backend.
    pub client_name: String,
    pub capacity: Capacity,
    pub inputs: InputSelection,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            client_name: "notebridge-in".to_owned(),
            capacity: Capacity::default(),
            inputs: InputSelection::default(),
        }
    }
}

struct Running {
    bridge: Bridge,
    event_loop: EventLoop,
    stats: Arc<ChannelStats>,
}

/// Everything between the MIDI inputs and the store.
///
/// Access failures never abort the session: they are dispatched to the store
/// and the session stays idle.
pub struct MidiSession {
    store: Store,
    running: Option<Running>,
    inputs: Vec<String>,
}

impl MidiSession {
    pub fn start(
        access: Result<Box<dyn MidiSource>, AccessError>,
        config: &BridgeConfig,
        store: Store,
    ) -> anyhow::Result<Self> {
        let mut session = Self {
            store,
            running: None,
            inputs: vec![],
        };

        let mut source = match access {
            Ok(source) => source,
            Err(AccessError::Unsupported) => {
                log::error!("{}", AccessError::Unsupported);
                session.store.dispatch(Action::MidiUnsupported);
                return Ok(session);
            }
            Err(AccessError::Failure(reason)) => {
                log::error!("failed to access MIDI inputs : {reason}");
                session.store.dispatch(Action::MidiAccessFailure(reason));
                return Ok(session);
            }
        };

        let (producer, receiver) = channel::open::<MidiData>(config.capacity);
        let stats = producer.stats();

        let bridge = match Bridge::attach(&mut *source, &config.inputs, producer) {
            Ok(bridge) => bridge,
            Err(e) => {
                log::error!("{e}");
                session
                    .store
                    .dispatch(Action::MidiAccessFailure(e.to_string()));
                return Ok(session);
            }
        };

        let event_loop = EventLoop::launch(EVENT_LOOP_NAME, receiver, {
            let store = session.store.clone();
            move |midi: MidiData| {
                if let Some(action) = classify(&midi) {
                    store.dispatch(action);
                }
                Ok(())
            }
        })?;

        session.inputs = bridge.inputs().into_iter().map(str::to_owned).collect();
        if session.inputs.is_empty() {
            log::warn!("no MIDI inputs to listen to, the session will stop on its own");
        }
        session.running = Some(Running {
            bridge,
            event_loop,
            stats,
        });

        log::info!("listening to {:?}", session.inputs);

        Ok(session)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| running.event_loop.is_running())
    }

    /// Inputs the session listens to.
    pub fn inputs(&self) -> &[String] {
        self.inputs.as_slice()
    }

    pub fn channel_stats(&self) -> Option<Arc<ChannelStats>> {
        self.running.as_ref().map(|running| running.stats.clone())
    }

    /// Deregister the listeners, then stop the consumer. Later calls do nothing.
    pub fn close(&mut self) -> anyhow::Result<()> {
        let Some(mut running) = self.running.take() else {
            return Ok(());
        };

        running.bridge.close();
        running.event_loop.stop()?;

        log::info!(
            "session closed after {} event(s), {} dropped",
            running.stats.pushed(),
            running.stats.dropped()
        );

        Ok(())
    }
}

impl Drop for MidiSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::error!("failed to close MIDI session : {e}");
        }
    }
}
