use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("illegal base32 data at input byte {position} ({byte:#04x})")]
    InvalidCharacter { position: usize, byte: u8 },

    #[error("illegal base32 length {length}: {remainder} trailing symbols cannot form a whole byte", remainder = .length % 8)]
    InvalidLength { length: usize },

    #[error("decoded {length} bytes, a strkey needs at least 3 (version + checksum)")]
    TooShort { length: usize },
}
