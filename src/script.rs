use crate::error::CliError;

/// Parse one line of hex bytes.
///
/// Tokens are separated by whitespace or commas and each carries at most one
/// `0x` prefix. A token of two or more digits is read as back-to-back byte
/// pairs (`b9f11283`) and must have an even digit count. A single-digit token
/// is one byte, so `0x5, 0x1` is `[0x05, 0x01]`.
pub fn parse_hex_line(text: &str, line: usize) -> Result<Vec<u8>, CliError> {
    let mut bytes = Vec::new();
    for token in text.split(|c: char| c.is_whitespace() || c == ',').filter(|token| !token.is_empty()) {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let decoded = match digits.len() {
            0 => Err(hex::FromHexError::InvalidStringLength),
            1 => hex::decode(format!("0{digits}")),
            _ => hex::decode(digits),
        };
        bytes.extend(decoded.map_err(|source| CliError::InvalidHex { line, source })?);
    }
    Ok(bytes)
}

/// Parse a command script: one DCS command per line, `#` starts a comment,
/// blank lines are skipped.
pub fn parse_script(text: &str) -> Result<Vec<Vec<u8>>, CliError> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let content = raw.split('#').next().unwrap_or("").trim();
            (!content.is_empty()).then_some((index + 1, content))
        })
        .map(|(line, content)| parse_hex_line(content, line))
        .collect()
}

/// Parse a byte given as decimal or `0x`-prefixed hex.
pub fn parse_byte(text: &str) -> Result<u8, CliError> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => text.parse::<u8>(),
    };
    parsed.map_err(|_| CliError::InvalidByte(text.to_string()))
}
