//! UTF-8 helpers shared by the stock split strategies.
//!
//! Decoding never fails: a malformed or truncated sequence maps to
//! [`char::REPLACEMENT_CHARACTER`] with a width of one byte, so that every
//! malformed unit of the input is reported exactly once and a strategy always
//! makes forward progress.

/// The maximum number of bytes in the UTF-8 encoding of one scalar value.
pub const MAX_WIDTH: usize = 4;

/// Decodes the first scalar value of `bytes`.
///
/// Returns the decoded character and the number of bytes it occupies. Invalid
/// input yields `(U+FFFD, 1)`; an empty slice yields `(U+FFFD, 0)`.
///
/// ```rust
/// use streamscan::utf8::decode;
///
/// assert_eq!(decode("☹x".as_bytes()), ('☹', 3));
/// assert_eq!(decode(b"\x81x"), (char::REPLACEMENT_CHARACTER, 1));
/// assert_eq!(decode(b""), (char::REPLACEMENT_CHARACTER, 0));
/// ```
#[must_use]
#[inline]
pub fn decode(bytes: &[u8]) -> (char, usize) {
    match bstr::decode_utf8(bytes) {
        (Some(ch), width) => (ch, width),
        (None, 0) => (char::REPLACEMENT_CHARACTER, 0),
        (None, _) => (char::REPLACEMENT_CHARACTER, 1),
    }
}

/// Reports whether `bytes` begins with a complete encoding.
///
/// An invalid sequence counts as complete, since it decodes to a width-one
/// replacement character no matter what follows. Only a valid, truncated
/// prefix of a multi-byte sequence (or an empty slice) is incomplete.
///
/// ```rust
/// use streamscan::utf8::full_rune;
///
/// assert!(full_rune(b"a"));
/// assert!(!full_rune(b"\xE2\x98"));
/// assert!(full_rune(b"\xE2\x98\xB9"));
/// assert!(full_rune(b"\x81"));
/// ```
#[must_use]
pub fn full_rune(bytes: &[u8]) -> bool {
    let Some(&lead) = bytes.first() else {
        return false;
    };
    if lead < 0x80 {
        return true;
    }
    match bstr::decode_utf8(bytes) {
        (Some(_), _) => true,
        // The whole slice is a valid prefix cut short by the end of the data.
        (None, width) => !(is_lead(lead) && width == bytes.len() && width < MAX_WIDTH),
    }
}

/// Reports whether `ch` is white space according to the Unicode
/// `White_Space` property.
///
/// This covers the ASCII separators (`\t`, `\n`, `\v`, `\f`, `\r`, space)
/// as well as U+0085 (NEL), U+00A0 (NBSP) and the `Zs`, `Zl`, `Zp` separators.
#[must_use]
#[inline]
pub fn is_space(ch: char) -> bool {
    match ch {
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{85}' | '\u{A0}' => true,
        _ if ch.is_ascii() => false,
        _ => ch.is_whitespace(),
    }
}

#[inline]
fn is_lead(byte: u8) -> bool {
    (0xC2..=0xF4).contains(&byte)
}
