//! Long packet payload checksum.
//!
//! CRC-16/CCITT in its reflected form: polynomial 0x1021 applied LSB first
//! through the reciprocal 0x8408, seeded with 0xFFFF, no final XOR. The
//! result is transmitted little-endian after the payload.

use crate::constants::CHECKSUM_SEED;

/// Reflected CRC-16/CCITT lookup table, built at compile time.
const CRC16_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0x8408;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Compute the checksum of a long packet payload.
pub fn payload_checksum(payload: &[u8]) -> u16 {
    payload.iter().fold(CHECKSUM_SEED, |crc, &byte| {
        (crc >> 8) ^ CRC16_TABLE[((crc ^ byte as u16) & 0xFF) as usize]
    })
}
