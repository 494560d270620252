use crate::constants::{LONG_PACKET_OVERHEAD, SHORT_PACKET_SIZE};
use crate::error::DsiError;
use crate::packet::{DataType, encode_long, encode_short};
use bytes::{Bytes, BytesMut};

/// A Display Command Set write, tagged with the packet shape it travels in.
///
/// The codec never guesses the shape from a payload length; callers either
/// build the variant they want or use [`DcsRequest::from_command`], which
/// applies the usual length policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DcsRequest<'a> {
    /// DCS command without parameter (short packet, data type 0x05)
    ShortWrite { command: u8 },
    /// DCS command with one parameter (short packet, data type 0x15)
    ShortWriteParam { command: u8, param: u8 },
    /// DCS command with any number of parameters (long packet, data type 0x39).
    /// `payload` starts with the command byte.
    LongWrite { payload: &'a [u8] },
}

impl<'a> DcsRequest<'a> {
    /// Pick the packet shape from the command length: one byte is a short
    /// write, two bytes a short write with parameter, anything longer a long
    /// write.
    pub fn from_command(command: &'a [u8]) -> Result<Self, DsiError> {
        match *command {
            [] => Err(DsiError::InvalidLength(0)),
            [command] => Ok(DcsRequest::ShortWrite { command }),
            [command, param] => Ok(DcsRequest::ShortWriteParam { command, param }),
            _ => Ok(DcsRequest::LongWrite { payload: command }),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DcsRequest::ShortWrite { .. } => DataType::DcsShortWrite,
            DcsRequest::ShortWriteParam { .. } => DataType::DcsShortWriteParam,
            DcsRequest::LongWrite { .. } => DataType::DcsLongWrite,
        }
    }

    /// Number of command bytes carried.
    pub fn payload_len(&self) -> usize {
        match self {
            DcsRequest::ShortWrite { .. } => 1,
            DcsRequest::ShortWriteParam { .. } => 2,
            DcsRequest::LongWrite { payload } => payload.len(),
        }
    }

    /// Size of the encoded packet.
    pub fn encoded_len(&self) -> usize {
        match self {
            DcsRequest::LongWrite { payload } => payload.len() + LONG_PACKET_OVERHEAD,
            _ => SHORT_PACKET_SIZE,
        }
    }

    /// Encode into `buffer` on `channel`, returning the packet length.
    pub fn encode(&self, channel: u8, buffer: &mut [u8]) -> Result<usize, DsiError> {
        match *self {
            DcsRequest::ShortWrite { command } => encode_short(buffer, channel, self.data_type(), &[command]),
            DcsRequest::ShortWriteParam { command, param } => {
                encode_short(buffer, channel, self.data_type(), &[command, param])
            }
            DcsRequest::LongWrite { payload } => encode_long(buffer, channel, self.data_type(), payload),
        }
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self, channel: u8) -> Result<Bytes, DsiError> {
        let mut buffer = BytesMut::zeroed(self.encoded_len());
        let written = self.encode(channel, &mut buffer)?;
        buffer.truncate(written);
        Ok(buffer.freeze())
    }
}
