//! # MIPI DSI packet framing
//!
//! Every packet starts with a 4-byte header:
//!
//! ```text
//! ┌──────────────┬────────────────┬────────────────┬─────┐
//! │ DI           │ byte 1         │ byte 2         │ ECC │
//! │ VC[7:6]      │ data 0 (short) │ data 1 (short) │     │
//! │ DT[5:0]      │ WC low  (long) │ WC high (long) │     │
//! └──────────────┴────────────────┴────────────────┴─────┘
//! ```
//!
//! A short packet is exactly the header. A long packet continues with
//! `WC` payload bytes and a 2-byte little-endian checksum.
//!
//! The encoders write into a caller-supplied buffer and validate every
//! argument before touching it, so a failed call leaves the buffer as it
//! was.

use crate::checksum::payload_checksum;
use crate::constants::{
    CHECKSUM_SIZE, DATA_TYPE_MASK, HEADER_SIZE, LONG_PACKET_OVERHEAD, MAX_VIRTUAL_CHANNEL, SHORT_PACKET_SIZE,
};
use crate::ecc::{EccStatus, correct_header, header_ecc};
use crate::error::DsiError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use modular_bitfield::prelude::*;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt;
use strum_macros::Display;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Processor-to-peripheral data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DataType {
    // Short packets
    #[strum(to_string = "V Sync Start")]
    VSyncStart = 0x01,
    #[strum(to_string = "V Sync End")]
    VSyncEnd = 0x11,
    #[strum(to_string = "H Sync Start")]
    HSyncStart = 0x21,
    #[strum(to_string = "H Sync End")]
    HSyncEnd = 0x31,
    #[strum(to_string = "End of Transmission")]
    EndOfTransmission = 0x08,
    #[strum(to_string = "Color Mode Off")]
    ColorModeOff = 0x02,
    #[strum(to_string = "Color Mode On")]
    ColorModeOn = 0x12,
    #[strum(to_string = "Shutdown Peripheral")]
    ShutdownPeripheral = 0x22,
    #[strum(to_string = "Turn On Peripheral")]
    TurnOnPeripheral = 0x32,
    #[strum(to_string = "Generic Short Write, 0 Params")]
    GenericShortWrite0 = 0x03,
    #[strum(to_string = "Generic Short Write, 1 Param")]
    GenericShortWrite1 = 0x13,
    #[strum(to_string = "Generic Short Write, 2 Params")]
    GenericShortWrite2 = 0x23,
    #[strum(to_string = "Generic Read, 0 Params")]
    GenericRead0 = 0x04,
    #[strum(to_string = "Generic Read, 1 Param")]
    GenericRead1 = 0x14,
    #[strum(to_string = "Generic Read, 2 Params")]
    GenericRead2 = 0x24,
    #[strum(to_string = "DCS Short Write")]
    DcsShortWrite = 0x05,
    #[strum(to_string = "DCS Short Write, 1 Param")]
    DcsShortWriteParam = 0x15,
    #[strum(to_string = "DCS Read")]
    DcsRead = 0x06,
    #[strum(to_string = "Compression Mode")]
    CompressionMode = 0x07,
    #[strum(to_string = "Execute Queue")]
    ExecuteQueue = 0x16,
    #[strum(to_string = "Set Maximum Return Packet Size")]
    SetMaxReturnPacketSize = 0x37,

    // Long packets
    #[strum(to_string = "Null Packet")]
    NullPacket = 0x09,
    #[strum(to_string = "Blanking Packet")]
    BlankingPacket = 0x19,
    #[strum(to_string = "Generic Long Write")]
    GenericLongWrite = 0x29,
    #[strum(to_string = "DCS Long Write")]
    DcsLongWrite = 0x39,
    #[strum(to_string = "Picture Parameter Set")]
    PictureParameterSet = 0x0A,
    #[strum(to_string = "Compressed Pixel Stream")]
    CompressedPixelStream = 0x0B,
    #[strum(to_string = "Loosely Packed Pixel Stream, 20-bit YCbCr 4:2:2")]
    LooselyPackedYcbcr20 = 0x0C,
    #[strum(to_string = "Packed Pixel Stream, 24-bit YCbCr 4:2:2")]
    PackedYcbcr24 = 0x1C,
    #[strum(to_string = "Packed Pixel Stream, 16-bit YCbCr 4:2:2")]
    PackedYcbcr16 = 0x2C,
    #[strum(to_string = "Packed Pixel Stream, 30-bit RGB")]
    PackedRgb30 = 0x0D,
    #[strum(to_string = "Packed Pixel Stream, 36-bit RGB")]
    PackedRgb36 = 0x1D,
    #[strum(to_string = "Packed Pixel Stream, 12-bit YCbCr 4:2:0")]
    PackedYcbcr12 = 0x3D,
    #[strum(to_string = "Packed Pixel Stream, 16-bit RGB")]
    PackedRgb16 = 0x0E,
    #[strum(to_string = "Packed Pixel Stream, 18-bit RGB")]
    PackedRgb18 = 0x1E,
    #[strum(to_string = "Loosely Packed Pixel Stream, 18-bit RGB")]
    LooselyPackedRgb18 = 0x2E,
    #[strum(to_string = "Packed Pixel Stream, 24-bit RGB")]
    PackedRgb24 = 0x3E,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl DataType {
    /// Whether this data type travels in a long packet.
    pub fn is_long(&self) -> bool {
        matches!(
            self,
            DataType::NullPacket
                | DataType::BlankingPacket
                | DataType::GenericLongWrite
                | DataType::DcsLongWrite
                | DataType::PictureParameterSet
                | DataType::CompressedPixelStream
                | DataType::LooselyPackedYcbcr20
                | DataType::PackedYcbcr24
                | DataType::PackedYcbcr16
                | DataType::PackedRgb30
                | DataType::PackedRgb36
                | DataType::PackedYcbcr12
                | DataType::PackedRgb16
                | DataType::PackedRgb18
                | DataType::LooselyPackedRgb18
                | DataType::PackedRgb24
        )
    }

    /// The 6-bit code as it appears in the Data Identifier.
    pub fn code(&self) -> u8 {
        u8::from(*self) & DATA_TYPE_MASK
    }
}

/// One of the four logical channels multiplexed on a DSI link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct VirtualChannel(u8);

impl VirtualChannel {
    pub const ZERO: VirtualChannel = VirtualChannel(0);

    pub fn new(channel: u8) -> Result<Self, DsiError> {
        if channel > MAX_VIRTUAL_CHANNEL {
            return Err(DsiError::InvalidChannel(channel));
        }
        Ok(Self(channel))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for VirtualChannel {
    type Error = DsiError;

    fn try_from(channel: u8) -> Result<Self, Self::Error> {
        Self::new(channel)
    }
}

impl From<VirtualChannel> for u8 {
    fn from(channel: VirtualChannel) -> Self {
        channel.0
    }
}

impl fmt::Display for VirtualChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VC{}", self.0)
    }
}

/// First header byte: virtual channel in the top two bits, data type below.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataIdentifier {
    pub data_type: B6,
    pub virtual_channel: B2,
}

impl DataIdentifier {
    pub fn for_packet(channel: VirtualChannel, data_type: DataType) -> Self {
        DataIdentifier::new()
            .with_data_type(data_type.code())
            .with_virtual_channel(channel.get())
    }
}

/// The 4 header bytes of any packet, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct PacketHeader {
    pub id: u8,
    /// Two data bytes for short packets, little-endian word count for long ones
    pub data: [u8; 2],
    pub ecc: u8,
}

impl PacketHeader {
    /// Build a header and compute its ECC.
    pub fn new(channel: VirtualChannel, data_type: DataType, data: [u8; 2]) -> Self {
        let [id] = DataIdentifier::for_packet(channel, data_type).into_bytes();
        Self {
            id,
            data,
            ecc: header_ecc([id, data[0], data[1]]),
        }
    }

    fn from_header_bytes(header: [u8; HEADER_SIZE]) -> Self {
        Self {
            id: header[0],
            data: [header[1], header[2]],
            ecc: header_ecc(header),
        }
    }

    pub fn header_bytes(&self) -> [u8; HEADER_SIZE] {
        [self.id, self.data[0], self.data[1]]
    }

    pub fn identifier(&self) -> DataIdentifier {
        DataIdentifier::from_bytes([self.id])
    }

    pub fn data_type(&self) -> DataType {
        DataType::from_primitive(self.identifier().data_type())
    }

    pub fn virtual_channel(&self) -> VirtualChannel {
        VirtualChannel(self.identifier().virtual_channel())
    }

    /// Payload length of a long packet.
    pub fn word_count(&self) -> u16 {
        u16::from_le_bytes(self.data)
    }
}

fn ensure_capacity(buffer: &[u8], required: usize) -> Result<(), DsiError> {
    if buffer.len() < required {
        return Err(DsiError::BufferTooSmall {
            required,
            capacity: buffer.len(),
        });
    }
    Ok(())
}

/// Encode a short packet carrying one or two data bytes.
///
/// A single byte is padded with 0x00. Returns the number of bytes written,
/// always 4.
pub fn encode_short(buffer: &mut [u8], channel: u8, data_type: DataType, payload: &[u8]) -> Result<usize, DsiError> {
    let channel = VirtualChannel::new(channel)?;
    let data = match *payload {
        [data0] => [data0, 0x00],
        [data0, data1] => [data0, data1],
        _ => return Err(DsiError::InvalidLength(payload.len())),
    };
    ensure_capacity(buffer, SHORT_PACKET_SIZE)?;

    let header = PacketHeader::new(channel, data_type, data);
    buffer[..SHORT_PACKET_SIZE].copy_from_slice(header.as_bytes());
    Ok(SHORT_PACKET_SIZE)
}

/// Encode a long packet: header, payload verbatim, then the payload checksum.
///
/// Returns the number of bytes written, `payload.len() + 6`.
pub fn encode_long(buffer: &mut [u8], channel: u8, data_type: DataType, payload: &[u8]) -> Result<usize, DsiError> {
    let channel = VirtualChannel::new(channel)?;
    let word_count = u16::try_from(payload.len()).map_err(|_| DsiError::PayloadTooLarge(payload.len()))?;
    let total = payload.len() + LONG_PACKET_OVERHEAD;
    ensure_capacity(buffer, total)?;

    let header = PacketHeader::new(channel, data_type, word_count.to_le_bytes());
    let (head, rest) = buffer.split_at_mut(SHORT_PACKET_SIZE);
    head.copy_from_slice(header.as_bytes());
    let (body, trailer) = rest.split_at_mut(payload.len());
    body.copy_from_slice(payload);
    trailer[..CHECKSUM_SIZE].copy_from_slice(&payload_checksum(payload).to_le_bytes());
    Ok(total)
}

/// A packet parsed off the wire.
///
/// Parsing checks the header ECC (repairing a single-bit error) and, for
/// long packets, the payload checksum. The stored header always carries
/// the ECC of its (repaired) contents.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPacket {
    Short {
        header: PacketHeader,
        ecc_status: EccStatus,
    },
    Long {
        header: PacketHeader,
        ecc_status: EccStatus,
        payload: Bytes,
    },
}

impl RawPacket {
    pub fn header(&self) -> &PacketHeader {
        match self {
            RawPacket::Short { header, .. } => header,
            RawPacket::Long { header, .. } => header,
        }
    }

    pub fn ecc_status(&self) -> EccStatus {
        match self {
            RawPacket::Short { ecc_status, .. } => *ecc_status,
            RawPacket::Long { ecc_status, .. } => *ecc_status,
        }
    }

    /// Whether the header needed repair on the way in.
    pub fn corrected(&self) -> bool {
        self.ecc_status().is_corrected()
    }

    pub fn data_type(&self) -> DataType {
        self.header().data_type()
    }

    pub fn virtual_channel(&self) -> VirtualChannel {
        self.header().virtual_channel()
    }

    pub fn is_long(&self) -> bool {
        matches!(self, RawPacket::Long { .. })
    }

    /// Data bytes of a short packet, or the payload of a long one.
    pub fn payload(&self) -> Bytes {
        match self {
            RawPacket::Short { header, .. } => Bytes::copy_from_slice(&header.data),
            RawPacket::Long { payload, .. } => payload.clone(),
        }
    }

    /// Number of wire bytes this packet occupies.
    pub fn wire_len(&self) -> usize {
        match self {
            RawPacket::Short { .. } => SHORT_PACKET_SIZE,
            RawPacket::Long { payload, .. } => payload.len() + LONG_PACKET_OVERHEAD,
        }
    }
}

impl TryFrom<Bytes> for RawPacket {
    type Error = DsiError;

    fn try_from(mut bytes: Bytes) -> Result<Self, Self::Error> {
        let available = bytes.len();
        if available < SHORT_PACKET_SIZE {
            return Err(DsiError::InsufficientData {
                expected: SHORT_PACKET_SIZE,
                actual: available,
            });
        }

        let received = PacketHeader::read_from_bytes(bytes.split_to(SHORT_PACKET_SIZE).as_ref()).map_err(|_| {
            DsiError::InsufficientData {
                expected: SHORT_PACKET_SIZE,
                actual: available,
            }
        })?;
        let (repaired, ecc_status) = correct_header(received.header_bytes(), received.ecc)?;
        let header = PacketHeader::from_header_bytes(repaired);

        if !header.data_type().is_long() {
            return Ok(RawPacket::Short { header, ecc_status });
        }

        let payload_len = header.word_count() as usize;
        if bytes.len() < payload_len + CHECKSUM_SIZE {
            return Err(DsiError::InsufficientData {
                expected: payload_len + LONG_PACKET_OVERHEAD,
                actual: available,
            });
        }
        let payload = bytes.split_to(payload_len);
        let received_checksum = bytes.get_u16_le();
        let checksum = payload_checksum(&payload);
        if received_checksum != checksum {
            return Err(DsiError::ChecksumMismatch {
                expected: checksum,
                actual: received_checksum,
            });
        }

        Ok(RawPacket::Long {
            header,
            ecc_status,
            payload,
        })
    }
}

impl From<RawPacket> for Bytes {
    fn from(packet: RawPacket) -> Self {
        match packet {
            RawPacket::Short { header, .. } => Bytes::copy_from_slice(header.as_bytes()),
            RawPacket::Long { header, payload, .. } => {
                let mut out = BytesMut::with_capacity(payload.len() + LONG_PACKET_OVERHEAD);
                out.put_slice(header.as_bytes());
                out.put_slice(&payload);
                out.put_u16_le(payload_checksum(&payload));
                out.freeze()
            }
        }
    }
}
