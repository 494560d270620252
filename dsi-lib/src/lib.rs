//! MIPI Display Serial Interface packet codec.
//!
//! Builds the 4-byte short packets and header + payload + checksum long
//! packets that carry DCS commands to a display panel, and parses them back.
//! Transmission itself is left to a [`device::Transport`].

pub mod checksum;
pub mod constants;
pub mod device;
pub mod dump;
pub mod ecc;
pub mod error;
pub mod message;
pub mod packet;

pub use device::{DsiHost, Transport};
pub use error::DsiError;
pub use message::DcsRequest;
pub use packet::{DataType, RawPacket, VirtualChannel, encode_long, encode_short};
