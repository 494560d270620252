//! Hex dumps of packet buffers for logs.

/// Bytes shown per dump line
pub const BYTES_PER_LINE: usize = 8;

/// Render `data` as lowercase hex, space separated, eight bytes per line.
pub fn hex_dump(data: &[u8]) -> String {
    data.chunks(BYTES_PER_LINE).map(dump_line).collect::<Vec<_>>().join("\n")
}

fn dump_line(line: &[u8]) -> String {
    let encoded = hex::encode(line);
    let mut out = String::with_capacity(encoded.len() + line.len());
    for (index, digit) in encoded.chars().enumerate() {
        if index > 0 && index % 2 == 0 {
            out.push(' ');
        }
        out.push(digit);
    }
    out
}
