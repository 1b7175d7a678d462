//! Byte ⇄ string codec for block values
//!
//! The host store only holds strings, while file content is opaque
//! binary. Each byte maps to the Unicode scalar of the same value
//! (U+0000..U+00FF), so every 256 byte values round-trip exactly.

use thiserror::Error;

/// Errors that can occur while decoding a stored block value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The string contains a character outside U+0000..U+00FF
    #[error("non-byte character U+{0:04X} in stored value")]
    NonByteChar(u32),
}

/// Encode raw bytes as a store string
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decode a store string back into raw bytes
///
/// Fails if the value was not produced by [`encode`] (any character
/// above U+00FF cannot represent a byte).
pub fn decode(value: &str) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::with_capacity(value.len());
    for ch in value.chars() {
        let code = ch as u32;
        if code > 0xFF {
            return Err(CodecError::NonByteChar(code));
        }
        bytes.push(code as u8);
    }
    Ok(bytes)
}
