//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use dsi_lib::constants::*;
#[allow(unused_imports)]
pub use dsi_lib::ecc::EccStatus;
#[allow(unused_imports)]
pub use dsi_lib::error::DsiError;
#[allow(unused_imports)]
pub use dsi_lib::message::DcsRequest;
#[allow(unused_imports)]
pub use dsi_lib::packet::{DataType, PacketHeader, RawPacket, VirtualChannel, encode_long, encode_short};
#[allow(unused_imports)]
pub use dsi_lib::{DsiHost, Transport};
#[allow(unused_imports)]
pub use hex;

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// Route library logs to the test harness output
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Payload of the long-write vector from the panel bring-up sequence
#[allow(dead_code)]
pub const LONG_WRITE_PAYLOAD: [u8; 64] = [
    0xe9, 0x82, 0x10, 0x06, 0x05, 0xa2, 0x0a, 0xa5, 0x12, 0x31, 0x23, 0x37, 0x83, 0x04, 0xbc, 0x27, 0x38, 0x0c,
    0x00, 0x03, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x03, 0x00, 0x00, 0x00, 0x75, 0x75, 0x31, 0x88, 0x88, 0x88, 0x88,
    0x88, 0x88, 0x13, 0x88, 0x64, 0x64, 0x20, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x02, 0x88, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The complete long packet expected for [`LONG_WRITE_PAYLOAD`]
#[allow(dead_code)]
pub const LONG_WRITE_PACKET: &str = concat!(
    "39400025e9821006",
    "05a20aa512312337",
    "8304bc27380c0003",
    "0000000c00030000",
    "0075753188888888",
    "8888138864642088",
    "8888888888028800",
    "0000000000000000",
    "000000006503",
);

/// [`LONG_WRITE_PACKET`] as bytes
#[allow(dead_code)]
pub fn long_write_packet() -> Bytes {
    hex_to_bytes(LONG_WRITE_PACKET)
}

/// Transport double that records every packet it is handed.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Vec<(VirtualChannel, Vec<u8>)>,
    /// Accept at most this many bytes of each packet
    pub accept_limit: Option<usize>,
    /// Fail every packet after this many have been accepted
    pub fail_after: Option<usize>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packets(&self) -> Vec<Vec<u8>> {
        self.sent.iter().map(|(_, packet)| packet.clone()).collect()
    }
}

impl Transport for RecordingTransport {
    fn transmit(&mut self, channel: VirtualChannel, packet: &[u8]) -> Result<usize, DsiError> {
        if self.fail_after.is_some_and(|limit| self.sent.len() >= limit) {
            return Err(DsiError::Transport("link down".to_string()));
        }
        self.sent.push((channel, packet.to_vec()));
        Ok(self.accept_limit.map_or(packet.len(), |limit| limit.min(packet.len())))
    }
}
