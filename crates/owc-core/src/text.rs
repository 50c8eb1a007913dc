//! Byte-preserving source text
//!
//! Headers are byte sequences, not necessarily UTF-8. Every byte is mapped
//! to the char with the same code point (U+0000..=U+00FF), so lexing works
//! on `str` while `encode` gives back exactly the bytes that were read.

/// Map each byte to one char
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`decode`]. Chars above U+00FF never come out of `decode`
/// and are written as UTF-8.
pub fn encode(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match u8::try_from(c) {
            Ok(b) => bytes.push(b),
            Err(_) => bytes.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes()),
        }
    }
    bytes
}

/// Bring a command-line string into the decoded domain
pub fn from_utf8(text: &str) -> String {
    decode(text.as_bytes())
}
