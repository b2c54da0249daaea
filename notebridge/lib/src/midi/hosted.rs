use super::*;
use midir::*;

pub struct HostedMidiSource {
    host: MidiInput,
    client_name: String,
}

impl HostedMidiSource {
    pub fn new(client_name: &str) -> Result<Self, AccessError> {
        let host = MidiInput::new(client_name).map_err(|e| AccessError::Failure(e.to_string()))?;

        Ok(Self {
            host,
            client_name: client_name.to_owned(),
        })
    }

    fn find_port(&self, input: &str) -> anyhow::Result<MidiInputPort> {
        self.host
            .ports()
            .into_iter()
            .find(|port| self.host.port_name(port).as_deref() == Ok(input))
            .ok_or_else(|| anyhow::anyhow!("[ MIDI ] : Cannot find device {input}"))
    }
}

impl MidiSource for HostedMidiSource {
    fn list_inputs(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .host
            .ports()
            .iter()
            .map(|port| self.host.port_name(port))
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn listen(
        &mut self,
        input: &str,
        mut callback: MidiCallback,
    ) -> anyhow::Result<Box<dyn Listener>> {
        let port = self.find_port(input)?;

        // a connection consumes its `MidiInput`, so every listener gets its own client
        let mut midi_in = MidiInput::new(&self.client_name)?;
        midi_in.ignore(Ignore::None);

        let connection = midi_in
            .connect(
                &port,
                &format!("{}-{input}", self.client_name),
                move |timestamp, bytes, _| callback(MidiData::new(timestamp, bytes)),
                (),
            )
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;

        log::trace!("[ MIDI ] : connected to {input}");

        Ok(Box::new(HostedListener {
            input: input.to_owned(),
            connection,
        }))
    }
}

struct HostedListener {
    input: String,
    connection: MidiInputConnection<()>,
}

impl Listener for HostedListener {
    fn input_name(&self) -> &str {
        &self.input
    }

    fn close(self: Box<Self>) {
        let HostedListener { input, connection } = *self;
        let _ = connection.close();
        log::trace!("[ MIDI ] : disconnected from {input}");
    }
}
