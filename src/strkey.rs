use data_encoding::BASE32_NOPAD;
use serde::Serialize;

use crate::error::DecodeError;

/// Version byte + two checksum bytes.
pub const MIN_DECODED_LEN: usize = 3;

/// A decoded strkey split into its three parts.
///
/// The binary layout is `version (1 byte) || payload || checksum (2 bytes)`,
/// with the checksum stored little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey<'a> {
    pub version: u8,
    pub payload: &'a [u8],
    pub checksum: u16,
}

impl DecodedKey<'_> {
    pub fn version_fields(&self) -> VersionFields {
        describe_version(self.version)
    }

    /// CRC16-XModem over `version || payload`.
    pub fn expected_checksum(&self) -> u16 {
        let crc = crc16_xmodem_update(0, &[self.version]);
        crc16_xmodem_update(crc, self.payload)
    }

    pub fn checksum_matches(&self) -> bool {
        self.checksum == self.expected_checksum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionFields {
    pub type_code: u8,
    pub flags: u8,
}

/// Which of the non-canonical lengths mod 8 the encoded input falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthCongruence {
    pub mod8_is_1: bool,
    pub mod8_is_3: bool,
    pub mod8_is_6: bool,
}

pub fn split_key(bytes: &[u8]) -> Result<DecodedKey<'_>, DecodeError> {
    if bytes.len() < MIN_DECODED_LEN {
        return Err(DecodeError::TooShort {
            length: bytes.len(),
        });
    }

    let (body, checksum) = bytes.split_at(bytes.len() - 2);
    Ok(DecodedKey {
        version: body[0],
        payload: &body[1..],
        checksum: u16::from_le_bytes([checksum[0], checksum[1]]),
    })
}

// The type code is not checked against any list of known key types.
pub fn describe_version(version: u8) -> VersionFields {
    VersionFields {
        type_code: version >> 3,
        flags: version & 0x07,
    }
}

pub fn length_congruence_report(input: &str) -> LengthCongruence {
    let remainder = input.len() % 8;
    LengthCongruence {
        mod8_is_1: remainder == 1,
        mod8_is_3: remainder == 3,
        mod8_is_6: remainder == 6,
    }
}

fn crc16_xmodem_update(mut crc: u16, bytes: &[u8]) -> u16 {
    for &byte in bytes {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

pub fn crc16_xmodem(bytes: &[u8]) -> u16 {
    crc16_xmodem_update(0, bytes)
}

/// Builds the strkey string for a version byte and payload, appending the
/// checksum.
pub fn encode_key(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + MIN_DECODED_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = crc16_xmodem(&data);
    data.extend_from_slice(&checksum.to_le_bytes());
    BASE32_NOPAD.encode(&data)
}
