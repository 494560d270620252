use crate::constants::{LONG_PACKET_OVERHEAD, MAX_PACKET_SIZE, SHORT_PACKET_SIZE};
use crate::dump::hex_dump;
use crate::error::DsiError;
use crate::message::DcsRequest;
use crate::packet::{DataType, VirtualChannel, encode_long, encode_short};
use bytes::BytesMut;
use tracing::{debug, trace, warn};

/// Physical side of the link: takes finished packets and puts them on the wire.
///
/// Implementations handle lane state and timing. `transmit` returns how many
/// bytes of `packet` were accepted.
pub trait Transport {
    fn transmit(&mut self, channel: VirtualChannel, packet: &[u8]) -> Result<usize, DsiError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transmit(&mut self, channel: VirtualChannel, packet: &[u8]) -> Result<usize, DsiError> {
        (**self).transmit(channel, packet)
    }
}

/// Host side of a DSI link bound to one virtual channel.
pub struct DsiHost<T: Transport> {
    transport: T,
    channel: VirtualChannel,
    packets_sent: u64,
}

impl<T: Transport> DsiHost<T> {
    pub fn new(transport: T, channel: VirtualChannel) -> Self {
        Self {
            transport,
            channel,
            packets_sent: 0,
        }
    }

    pub fn channel(&self) -> VirtualChannel {
        self.channel
    }

    /// Packets the transport has fully accepted so far
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send `payload` with an explicit data type.
    ///
    /// Long data types go out as long packets, everything else as a short
    /// packet (which then needs one or two payload bytes). Returns the
    /// number of payload bytes delivered.
    pub fn write(&mut self, data_type: DataType, payload: &[u8]) -> Result<usize, DsiError> {
        let channel = self.channel.get();
        let capacity = if data_type.is_long() {
            (payload.len() + LONG_PACKET_OVERHEAD).min(MAX_PACKET_SIZE)
        } else {
            SHORT_PACKET_SIZE
        };
        let mut packet = BytesMut::zeroed(capacity);
        let written = if data_type.is_long() {
            encode_long(&mut packet, channel, data_type, payload)?
        } else {
            encode_short(&mut packet, channel, data_type, payload)?
        };
        packet.truncate(written);

        self.send_packet(data_type, &packet)?;
        Ok(payload.len())
    }

    /// Send a DCS command, choosing the packet shape from its length.
    ///
    /// Returns the number of command bytes delivered.
    pub fn write_dcs(&mut self, command: &[u8]) -> Result<usize, DsiError> {
        let request = DcsRequest::from_command(command)?;
        self.send_request(&request)
    }

    /// Send an already tagged DCS request.
    pub fn send_request(&mut self, request: &DcsRequest<'_>) -> Result<usize, DsiError> {
        let packet = request.to_bytes(self.channel.get())?;
        self.send_packet(request.data_type(), &packet)?;
        Ok(request.payload_len())
    }

    /// Send DCS commands in order, stopping at the first failure.
    ///
    /// Returns how many commands were sent.
    pub fn write_script<I>(&mut self, commands: I) -> Result<usize, DsiError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut sent = 0;
        for command in commands {
            self.write_dcs(command.as_ref())?;
            sent += 1;
        }
        debug!(commands = sent, "Script complete");
        Ok(sent)
    }

    fn send_packet(&mut self, data_type: DataType, packet: &[u8]) -> Result<(), DsiError> {
        debug!(
            channel = %self.channel,
            %data_type,
            len = packet.len(),
            "Sending packet"
        );
        trace!("\n{}", hex_dump(packet));

        let accepted = self.transport.transmit(self.channel, packet)?;
        if accepted != packet.len() {
            warn!(expected = packet.len(), accepted, "Transport accepted a partial packet");
            return Err(DsiError::ShortTransfer {
                expected: packet.len(),
                actual: accepted,
            });
        }

        self.packets_sent += 1;
        Ok(())
    }
}
