//! Header error-correcting code.
//!
//! The 24 header bits D0..D23 (byte 0 bit 0 is D0, byte 2 bit 7 is D23) are
//! protected by six parity bits P0..P5 as defined by the MIPI DSI
//! standard. P6 and P7 are always zero. The arrangement is a Hamming
//! code extended for double-error detection: every data bit has a distinct
//! syndrome with at least three bits set, so a single flipped bit anywhere
//! in the header or the ECC byte can be located and repaired.

use crate::constants::HEADER_SIZE;
use crate::error::DsiError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Data bits covered by each parity bit, P0 first.
const PARITY_MASKS: [u32; 6] = [
    0xF1_2CB7, // D0 D1 D2 D4 D5 D7 D10 D11 D13 D16 D20 D21 D22 D23
    0xF2_555B, // D0 D1 D3 D4 D6 D8 D10 D12 D14 D17 D20 D21 D22 D23
    0x74_9A6D, // D0 D2 D3 D5 D6 D9 D11 D12 D15 D18 D20 D21 D22
    0xB8_E38E, // D1 D2 D3 D7 D8 D9 D13 D14 D15 D19 D20 D21 D23
    0xDF_03F0, // D4..D9 D16..D20 D22 D23
    0xEF_FC00, // D10..D19 D21 D22 D23
];

/// Syndrome produced by a flip of each data bit.
const DATA_BIT_SYNDROMES: [u8; 24] = {
    let mut table = [0u8; 24];
    let mut bit = 0;
    while bit < 24 {
        let mut parity = 0;
        while parity < PARITY_MASKS.len() {
            if PARITY_MASKS[parity] & (1 << bit) != 0 {
                table[bit] |= 1 << parity;
            }
            parity += 1;
        }
        bit += 1;
    }
    table
};

/// Outcome of checking a received header against its ECC byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EccStatus {
    /// Header and ECC agree.
    Clean,
    /// Header bit `bit` (0..24) was flipped and has been repaired.
    CorrectedHeaderBit { bit: u8 },
    /// Bit `bit` of the ECC byte itself was damaged; the header is intact.
    CorrectedEccBit { bit: u8 },
}

impl EccStatus {
    pub fn is_corrected(&self) -> bool {
        !matches!(self, EccStatus::Clean)
    }
}

fn header_bits(header: [u8; HEADER_SIZE]) -> u32 {
    u32::from_le_bytes([header[0], header[1], header[2], 0])
}

/// Compute the ECC byte for a 3-byte packet header.
pub fn header_ecc(header: [u8; HEADER_SIZE]) -> u8 {
    let data = header_bits(header);
    PARITY_MASKS
        .iter()
        .enumerate()
        .fold(0u8, |ecc, (parity, mask)| {
            ecc | ((((data & mask).count_ones() & 1) as u8) << parity)
        })
}

/// XOR of the received ECC and the ECC recomputed over the received header.
pub fn syndrome(header: [u8; HEADER_SIZE], ecc: u8) -> u8 {
    header_ecc(header) ^ ecc
}

/// Check a received header and repair a single-bit error.
///
/// Returns the (possibly repaired) header. Errors with
/// [`DsiError::UncorrectableHeader`] when the syndrome matches no single
/// bit position, which means two or more bits were damaged.
pub fn correct_header(header: [u8; HEADER_SIZE], ecc: u8) -> Result<([u8; HEADER_SIZE], EccStatus), DsiError> {
    let syndrome = syndrome(header, ecc);
    if syndrome == 0 {
        return Ok((header, EccStatus::Clean));
    }
    if syndrome.is_power_of_two() {
        return Ok((
            header,
            EccStatus::CorrectedEccBit {
                bit: syndrome.trailing_zeros() as u8,
            },
        ));
    }

    let bit = DATA_BIT_SYNDROMES
        .iter()
        .position(|&s| s == syndrome)
        .ok_or(DsiError::UncorrectableHeader { syndrome })?;
    let repaired = (header_bits(header) ^ (1 << bit)).to_le_bytes();
    Ok((
        [repaired[0], repaired[1], repaired[2]],
        EccStatus::CorrectedHeaderBit { bit: bit as u8 },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecc_of_captured_headers() {
        assert_eq!(header_ecc([0x05, 0x11, 0x00]), 0x36);
        assert_eq!(header_ecc([0x15, 0xBC, 0x4E]), 0x35);
        assert_eq!(header_ecc([0x39, 0x40, 0x00]), 0x25);
    }

    #[test]
    fn test_ecc_of_zero_header() {
        assert_eq!(header_ecc([0x00, 0x00, 0x00]), 0x00);
    }

    #[test]
    fn test_ecc_top_bits_always_clear() {
        for header in [[0xFF, 0xFF, 0xFF], [0xC5, 0x11, 0x00], [0x39, 0xFF, 0xFF]] {
            assert_eq!(header_ecc(header) & 0xC0, 0, "header {:02x?}", header);
        }
    }

    #[test]
    fn test_single_data_bit_syndromes() {
        // Published syndrome table for D0..D23
        assert_eq!(
            DATA_BIT_SYNDROMES,
            [
                0x07, 0x0B, 0x0D, 0x0E, 0x13, 0x15, 0x16, 0x19, 0x1A, 0x1C, 0x23, 0x25, 0x26, 0x29, 0x2A, 0x2C,
                0x31, 0x32, 0x34, 0x38, 0x1F, 0x2F, 0x37, 0x3B,
            ]
        );
    }

    #[test]
    fn test_correct_clean_header() {
        let (header, status) = correct_header([0x15, 0xBC, 0x4E], 0x35).unwrap();
        assert_eq!(header, [0x15, 0xBC, 0x4E]);
        assert_eq!(status, EccStatus::Clean);
        assert!(!status.is_corrected());
    }

    #[test]
    fn test_correct_every_header_bit() {
        let original = [0x39, 0x40, 0x00];
        let ecc = header_ecc(original);
        for bit in 0..24u32 {
            let damaged = (header_bits(original) ^ (1 << bit)).to_le_bytes();
            let (header, status) = correct_header([damaged[0], damaged[1], damaged[2]], ecc).unwrap();
            assert_eq!(header, original, "bit {}", bit);
            assert_eq!(status, EccStatus::CorrectedHeaderBit { bit: bit as u8 });
        }
    }

    #[test]
    fn test_correct_ecc_bit() {
        let (header, status) = correct_header([0x05, 0x11, 0x00], 0x36 ^ 0x08).unwrap();
        assert_eq!(header, [0x05, 0x11, 0x00]);
        assert_eq!(status, EccStatus::CorrectedEccBit { bit: 3 });
    }

    #[test]
    fn test_double_bit_error_is_uncorrectable() {
        // D0 and D1 flipped: 0x07 ^ 0x0B = 0x0C, not a column and not a single bit
        let result = correct_header([0x05 ^ 0x03, 0x11, 0x00], 0x36);
        assert_eq!(result, Err(DsiError::UncorrectableHeader { syndrome: 0x0C }));
    }
}
