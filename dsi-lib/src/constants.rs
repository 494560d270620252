// Packet geometry for MIPI DSI

/// Data Identifier + two data/word-count bytes
pub const HEADER_SIZE: usize = 3;

/// ECC byte following the header
pub const ECC_SIZE: usize = 1;

/// A short packet is the header plus its ECC, nothing else
pub const SHORT_PACKET_SIZE: usize = HEADER_SIZE + ECC_SIZE;

/// Little-endian payload checksum trailing a long packet
pub const CHECKSUM_SIZE: usize = 2;

/// Bytes a long packet adds around its payload
pub const LONG_PACKET_OVERHEAD: usize = SHORT_PACKET_SIZE + CHECKSUM_SIZE;

/// Largest payload the 16-bit word count can describe
pub const MAX_LONG_PAYLOAD: usize = u16::MAX as usize;

/// Largest complete long packet
pub const MAX_PACKET_SIZE: usize = MAX_LONG_PAYLOAD + LONG_PACKET_OVERHEAD;

/// Highest virtual channel number (2-bit field)
pub const MAX_VIRTUAL_CHANNEL: u8 = 3;

/// Mask for the data type bits of the Data Identifier
pub const DATA_TYPE_MASK: u8 = 0x3F;

/// Seed of the payload checksum
pub const CHECKSUM_SEED: u16 = 0xFFFF;
