use crate::error::DecodeError;

// RFC4648 base32 alphabet, used without padding.
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn symbol_value(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'2'..=b'7' => Some(byte - b'2' + 26),
        _ => None,
    }
}

/// Unpadded lengths whose last partial block cannot hold a whole byte.
pub fn is_invalid_length(length: usize) -> bool {
    matches!(length % 8, 1 | 3 | 6)
}

/// Decodes unpadded RFC4648 base32.
///
/// Every symbol is checked before the length, so a bad character is always
/// reported as such. Bits left over in the final symbol are dropped without
/// being checked for zero.
pub fn decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let values = input
        .bytes()
        .enumerate()
        .map(|(position, byte)| {
            symbol_value(byte).ok_or(DecodeError::InvalidCharacter { position, byte })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if is_invalid_length(values.len()) {
        return Err(DecodeError::InvalidLength {
            length: values.len(),
        });
    }

    let mut result = Vec::with_capacity(values.len() * 5 / 8);
    let mut buffer = 0u64;
    let mut bits = 0;

    for value in values {
        buffer = (buffer << 5) | value as u64;
        bits += 5;

        if bits >= 8 {
            result.push((buffer >> (bits - 8)) as u8);
            bits -= 8;
            buffer &= (1 << bits) - 1;
        }
    }

    Ok(result)
}
