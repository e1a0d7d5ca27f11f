//! Acquisition of an owned, read-only token stream from raw shader bytecode.

use thiserror::Error;

/// Hard cap on accepted bytecode size. Real SM2/SM3 programs are far smaller;
/// the cap bounds allocation on hostile input.
pub const MAX_SHADER_BYTECODE_BYTES: usize = 256 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("empty shader bytecode")]
    Empty,

    #[error("bytecode length {len} is not a multiple of 4")]
    UnalignedLength { len: usize },

    #[error("bytecode length {len} exceeds maximum {max} bytes")]
    BytecodeTooLarge { len: usize, max: usize },
}

/// An owned D3D9 shader bytecode stream, interpreted as little-endian 32-bit
/// tokens. Guaranteed non-empty: the first token is always present and is the
/// version token. The stream is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<u32>,
}

impl TokenStream {
    /// Build a stream from raw bytecode bytes (e.g. the contents of a `.cso`
    /// file). The byte length must be a non-zero multiple of 4 and within
    /// [`MAX_SHADER_BYTECODE_BYTES`].
    pub fn from_bytes(bytes: &[u8]) -> Result<TokenStream, StreamError> {
        if bytes.is_empty() {
            return Err(StreamError::Empty);
        }
        if bytes.len() > MAX_SHADER_BYTECODE_BYTES {
            return Err(StreamError::BytecodeTooLarge {
                len: bytes.len(),
                max: MAX_SHADER_BYTECODE_BYTES,
            });
        }
        if bytes.len() % 4 != 0 {
            return Err(StreamError::UnalignedLength { len: bytes.len() });
        }

        let mut tokens = Vec::with_capacity(bytes.len() / 4);
        for chunk in bytes.chunks_exact(4) {
            tokens.push(u32::from_le_bytes(chunk.try_into().expect("4-byte chunk")));
        }
        Ok(TokenStream { tokens })
    }

    /// Build a stream from already-decoded tokens.
    pub fn from_tokens(tokens: Vec<u32>) -> Result<TokenStream, StreamError> {
        if tokens.is_empty() {
            return Err(StreamError::Empty);
        }
        if tokens.len() > MAX_SHADER_BYTECODE_BYTES / 4 {
            return Err(StreamError::BytecodeTooLarge {
                len: tokens.len() * 4,
                max: MAX_SHADER_BYTECODE_BYTES,
            });
        }
        Ok(TokenStream { tokens })
    }

    pub fn tokens(&self) -> &[u32] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// The mandatory first token of the stream.
    pub fn version_token(&self) -> u32 {
        self.tokens[0]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rejects_empty_bytecode() {
        assert_eq!(TokenStream::from_bytes(&[]).unwrap_err(), StreamError::Empty);
        assert_eq!(
            TokenStream::from_tokens(Vec::new()).unwrap_err(),
            StreamError::Empty
        );
    }

    #[test]
    fn rejects_unaligned_length() {
        assert_eq!(
            TokenStream::from_bytes(&[0u8; 5]).unwrap_err(),
            StreamError::UnalignedLength { len: 5 }
        );
    }

    #[test]
    fn rejects_oversized_bytecode() {
        let bytes = vec![0u8; MAX_SHADER_BYTECODE_BYTES + 4];
        assert_eq!(
            TokenStream::from_bytes(&bytes).unwrap_err(),
            StreamError::BytecodeTooLarge {
                len: MAX_SHADER_BYTECODE_BYTES + 4,
                max: MAX_SHADER_BYTECODE_BYTES,
            }
        );
    }

    #[test]
    fn decodes_little_endian_tokens() {
        let stream = TokenStream::from_bytes(&[0x00, 0x03, 0xFE, 0xFF, 0xFF, 0xFF, 0x00, 0x00])
            .unwrap();
        assert_eq!(stream.tokens(), &[0xFFFE_0300, 0x0000_FFFF]);
        assert_eq!(stream.version_token(), 0xFFFE_0300);
        assert_eq!(stream.token_count(), 2);
    }
}
