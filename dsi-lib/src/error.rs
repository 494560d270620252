use thiserror::Error;

/// The primary error type for the `dsi-lib` codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DsiError {
    #[error("Invalid virtual channel {0}: must be 0..=3")]
    InvalidChannel(u8),

    #[error("Invalid short packet payload length {0}: must be 1 or 2")]
    InvalidLength(usize),

    #[error("Long packet payload of {0} bytes exceeds 65535")]
    PayloadTooLarge(usize),

    #[error("Buffer too small: packet needs {required} bytes, buffer holds {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },

    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Uncorrectable packet header (ECC syndrome {syndrome:#04x})")]
    UncorrectableHeader { syndrome: u8 },

    #[error("Payload checksum mismatch: computed {expected:#06x}, received {actual:#06x}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Short transfer: transport accepted {actual} of {expected} bytes")]
    ShortTransfer { expected: usize, actual: usize },
}

