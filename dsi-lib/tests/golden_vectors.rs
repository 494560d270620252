//! Packets checked byte-for-byte against the panel bring-up captures

mod common;

use common::*;

#[test]
fn test_short_write_without_parameter() {
    let mut buffer = [0u8; 128];
    let len = encode_short(&mut buffer, 0, DataType::DcsShortWrite, &[0x11]).expect("Failed to encode");

    assert_eq!(len, 4);
    assert_eq!(&buffer[..len], &[0x05, 0x11, 0x00, 0x36]);
}

#[test]
fn test_short_write_with_parameter() {
    let mut buffer = [0u8; 128];
    let len = encode_short(&mut buffer, 0, DataType::DcsShortWriteParam, &[0xBC, 0x4E]).expect("Failed to encode");

    assert_eq!(len, 4);
    assert_eq!(&buffer[..len], &[0x15, 0xBC, 0x4E, 0x35]);
}

#[test]
fn test_long_write() {
    let mut buffer = [0u8; 128];
    let len = encode_long(&mut buffer, 0, DataType::DcsLongWrite, &LONG_WRITE_PAYLOAD).expect("Failed to encode");

    let expected = long_write_packet();
    assert_eq!(len, 70);
    assert_eq!(
        &buffer[..len],
        expected.as_ref(),
        "Encoded {:02x?}, expected {:02x?}",
        &buffer[..len],
        expected.as_ref()
    );
    assert_eq!(&buffer[..4], &[0x39, 0x40, 0x00, 0x25]);
    assert_eq!(&buffer[4..68], &LONG_WRITE_PAYLOAD[..]);
    assert_eq!(&buffer[68..70], &[0x65, 0x03]);
}

#[test]
fn test_long_write_empty_payload() {
    let mut buffer = [0u8; 6];
    let len = encode_long(&mut buffer, 0, DataType::DcsLongWrite, &[]).expect("Failed to encode");

    assert_eq!(len, 6);
    // Checksum of nothing is the untouched seed
    assert_eq!(buffer, [0x39, 0x00, 0x00, 0x0F, 0xFF, 0xFF]);
}

#[test]
fn test_dcs_dispatch_matches_direct_encoding() {
    let cases: [(&[u8], &str); 3] = [
        (&[0x11], "05110036"),
        (&[0xBC, 0x4E], "15bc4e35"),
        (&LONG_WRITE_PAYLOAD, LONG_WRITE_PACKET),
    ];

    for (command, expected) in cases {
        let packet = DcsRequest::from_command(command)
            .and_then(|request| request.to_bytes(0))
            .expect("Failed to encode");
        assert_eq!(packet, hex_to_bytes(expected), "command {:02x?}", command);
    }
}

#[test]
fn test_display_on() {
    let mut buffer = [0u8; 4];
    encode_short(&mut buffer, 0, DataType::DcsShortWrite, &[0x29]).unwrap();
    assert_eq!(buffer, [0x05, 0x29, 0x00, 0x1C]);
}

#[test]
fn test_set_max_return_packet_size() {
    let mut buffer = [0u8; 4];
    encode_short(&mut buffer, 0, DataType::SetMaxReturnPacketSize, &[0x01, 0x00]).unwrap();
    assert_eq!(buffer, [0x37, 0x01, 0x00, 0x1D]);
}

#[test]
fn test_channel_lands_in_top_bits() {
    let mut buffer = [0u8; 4];
    encode_short(&mut buffer, 3, DataType::DcsShortWrite, &[0x11]).unwrap();
    assert_eq!(buffer, [0xC5, 0x11, 0x00, 0x39]);

    let mut buffer = [0u8; 10];
    encode_long(&mut buffer, 1, DataType::DcsLongWrite, &[0xB9, 0xF1, 0x12, 0x83]).unwrap();
    assert_eq!(buffer, [0x79, 0x04, 0x00, 0x3A, 0xB9, 0xF1, 0x12, 0x83, 0x84, 0x5D]);
}
