use std::{
    collections::BTreeMap,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    MidiUnsupported,
    MidiAccessFailure(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoteOn { .. } => "NOTE_ON",
            Self::NoteOff { .. } => "NOTE_OFF",
            Self::MidiUnsupported => "MIDI_UNSUPPORTED",
            Self::MidiAccessFailure(_) => "MIDI_ACCESS_FAILURE",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct State {
    /// Currently sounding notes, note number to velocity.
    pub notes: BTreeMap<u8, u8>,
    pub errors: Vec<String>,
}

impl State {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::NoteOn { note, velocity } => {
                self.notes.insert(note, velocity);
            }
            Action::NoteOff { note } => {
                self.notes.remove(&note);
            }
            Action::MidiUnsupported => self
                .errors
                .push("MIDI is not supported on this host".to_owned()),
            Action::MidiAccessFailure(reason) => self
                .errors
                .push(format!("Failed to access MIDI inputs : {reason}")),
        }
    }
}

#[derive(Default)]
struct Shared {
    state: State,
    revision: u64,
}

/// Cloneable handle to the application state.
///
/// All mutation goes through [`Store::dispatch`]. Readers take snapshots or
/// block until the state matches what they are waiting for.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<(Mutex<Shared>, Condvar)>,
}

impl Store {
    pub fn dispatch(&self, action: Action) {
        log::trace!("dispatch : {} : {action:?}", action.name());

        let (_, changed) = &*self.inner;
        let mut shared = self.lock();
        shared.state.reduce(action);
        shared.revision += 1;
        changed.notify_all();
    }

    pub fn state(&self) -> State {
        self.lock().state.clone()
    }

    /// Number of actions dispatched so far.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Block until `predicate` holds or `timeout` elapses.
    /// Returns whether the predicate held.
    pub fn wait_until(&self, timeout: Duration, mut predicate: impl FnMut(&State) -> bool) -> bool {
        let (_, changed) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut shared = self.lock();

        while !predicate(&shared.state) {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };

            shared = changed
                .wait_timeout(shared, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        true
    }

    /// Block until a dispatch moves the revision past `revision` or `timeout` elapses.
    /// Returns the current revision and a snapshot of the state.
    pub fn wait_for_change(&self, revision: u64, timeout: Duration) -> (u64, State) {
        let (_, changed) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut shared = self.lock();

        while shared.revision <= revision {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                break;
            };

            shared = changed
                .wait_timeout(shared, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        (shared.revision, shared.state.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        let (shared, _) = &*self.inner;
        shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn note_on_then_off_leaves_the_note_absent() {
        let mut state = State::default();
        state.reduce(Action::NoteOn {
            note: 60,
            velocity: 100,
        });
        state.reduce(Action::NoteOff { note: 60 });

        assert!(!state.notes.contains_key(&60));
        assert!(state.errors.is_empty());
    }

    #[test]
    fn note_on_alone_keeps_the_velocity() {
        let mut state = State::default();
        state.reduce(Action::NoteOn {
            note: 64,
            velocity: 87,
        });

        assert_eq!(state.notes.get(&64), Some(&87));
    }

    #[test]
    fn repeated_note_on_overwrites_the_velocity() {
        let mut state = State::default();
        state.reduce(Action::NoteOn {
            note: 64,
            velocity: 10,
        });
        state.reduce(Action::NoteOn {
            note: 64,
            velocity: 90,
        });

        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[&64], 90);
    }

    #[test]
    fn note_off_for_a_silent_note_changes_nothing() {
        let mut state = State::default();
        state.reduce(Action::NoteOff { note: 12 });
        assert_eq!(state, State::default());
    }

    #[test]
    fn unsupported_adds_exactly_one_error() {
        let mut state = State::default();
        state.reduce(Action::NoteOn {
            note: 1,
            velocity: 1,
        });
        let notes = state.notes.clone();

        state.reduce(Action::MidiUnsupported);

        assert_eq!(state.errors.len(), 1);
        assert_eq!(state.notes, notes);
    }

    #[test]
    fn access_failure_is_distinct_from_unsupported() {
        let mut unsupported = State::default();
        unsupported.reduce(Action::MidiUnsupported);

        let mut failure = State::default();
        failure.reduce(Action::MidiAccessFailure("permission denied".into()));

        assert_eq!(failure.errors.len(), 1);
        assert_ne!(failure.errors, unsupported.errors);
        assert!(failure.errors[0].contains("permission denied"));
        assert_ne!(
            Action::MidiUnsupported.name(),
            Action::MidiAccessFailure(String::new()).name()
        );
    }

    #[test]
    fn store_wakes_waiters_on_dispatch() {
        let store = Store::default();

        let waiter = std::thread::spawn({
            let store = store.clone();
            move || {
                store.wait_until(Duration::from_secs(2), |state| {
                    state.notes.get(&48) == Some(&20)
                })
            }
        });

        store.dispatch(Action::NoteOn {
            note: 48,
            velocity: 20,
        });

        assert!(waiter.join().unwrap());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn wait_until_times_out() {
        let store = Store::default();
        assert!(!store.wait_until(Duration::from_millis(10), |state| !state.errors.is_empty()));
    }

    #[test]
    fn wait_for_change_returns_the_new_revision() {
        let store = Store::default();
        store.dispatch(Action::MidiUnsupported);

        let (revision, state) = store.wait_for_change(0, Duration::from_millis(10));
        assert_eq!(revision, 1);
        assert_eq!(state.errors.len(), 1);

        let (revision, _) = store.wait_for_change(1, Duration::from_millis(10));
        assert_eq!(revision, 1);
    }
}
