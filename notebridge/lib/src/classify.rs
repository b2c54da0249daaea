use crate::{midi::MidiData, store::Action};
use midly::{live::LiveEvent, MidiMessage};

/// Decode a raw message into the store action it maps to.
///
/// Only note on/off are recognised. A note on with zero velocity is a note
/// off. Everything else, including bytes that do not parse, yields `None`.
pub fn classify(midi: &MidiData) -> Option<Action> {
    let Ok(LiveEvent::Midi { message, .. }) = LiveEvent::parse(&midi.bytes) else {
        return None;
    };

    match message {
        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => Some(Action::NoteOn {
            note: key.as_int(),
            velocity: vel.as_int(),
        }),
        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
            Some(Action::NoteOff { note: key.as_int() })
        }
        _ => None,
    }
}
