//! Text encodings for length-prefixed strings.

use std::fmt;
use std::str::FromStr;

use crate::error::{BitError, BitResult};

/// Encoding used to turn text into the bytes that follow a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextEncoding {
    /// 7-bit ASCII, one byte per character.
    Ascii,
    /// ISO/IEC 8859-1, one byte per character.
    Latin1,
    /// UTF-8.
    #[default]
    Utf8,
    /// UTF-16, little-endian code units.
    Utf16Le,
    /// UTF-16, big-endian code units.
    Utf16Be,
}

impl TextEncoding {
    /// Encodes `text` into bytes.
    pub fn encode(self, text: &str) -> BitResult<Vec<u8>> {
        match self {
            Self::Ascii => text
                .chars()
                .map(|c| u8::try_from(c).ok().filter(u8::is_ascii))
                .collect::<Option<Vec<u8>>>()
                .ok_or(BitError::InvalidText { encoding: self }),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c).ok())
                .collect::<Option<Vec<u8>>>()
                .ok_or(BitError::InvalidText { encoding: self }),
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        }
    }

    /// Decodes `bytes` into text, substituting anything the encoding
    /// cannot represent.
    ///
    /// ASCII bytes above 0x7F become `?`. Malformed UTF-8, unpaired UTF-16
    /// surrogates and a trailing odd UTF-16 byte become U+FFFD.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
                .collect(),
            Self::Latin1 => bytes.iter().copied().map(char::from).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16Le | Self::Utf16Be => {
                let pairs = bytes.chunks_exact(2);
                let odd = !pairs.remainder().is_empty();
                let units = pairs.map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == Self::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                let mut text: String = char::decode_utf16(units)
                    .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect();
                if odd {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            }
        }
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Latin1 => "latin1",
            Self::Utf8 => "utf8",
            Self::Utf16Le => "utf16le",
            Self::Utf16Be => "utf16be",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii => f.write_str("ASCII"),
            Self::Latin1 => f.write_str("Latin-1"),
            Self::Utf8 => f.write_str("UTF-8"),
            Self::Utf16Le => f.write_str("UTF-16LE"),
            Self::Utf16Be => f.write_str("UTF-16BE"),
        }
    }
}

/// Error returned when parsing an unknown encoding name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEncodingError {
    name: String,
}

impl fmt::Display for ParseEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized encoding '{}', expected ascii, latin1, utf8, utf16le, or utf16be",
            self.name
        )
    }
}

impl std::error::Error for ParseEncodingError {}

impl FromStr for TextEncoding {
    type Err = ParseEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf16le" | "utf-16le" => Ok(Self::Utf16Le),
            "utf16be" | "utf-16be" => Ok(Self::Utf16Be),
            _ => Err(ParseEncodingError {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_utf8() {
        assert_eq!(TextEncoding::default(), TextEncoding::Utf8);
    }

    #[test]
    fn ascii_encode() {
        assert_eq!(
            TextEncoding::Ascii.encode("data").unwrap(),
            vec![0x64, 0x61, 0x74, 0x61]
        );
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        let err = TextEncoding::Ascii.encode("café").unwrap_err();
        assert_eq!(
            err,
            BitError::InvalidText {
                encoding: TextEncoding::Ascii
            }
        );
        assert_eq!(TextEncoding::Ascii.decode(&[b'o', 0x80, b'k']), "o?k");
    }

    #[test]
    fn latin1_covers_high_bytes() {
        let bytes = TextEncoding::Latin1.encode("café").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(TextEncoding::Latin1.decode(&bytes), "café");
        assert!(TextEncoding::Latin1.encode("€").is_err());
    }

    #[test]
    fn utf8_byte_count_not_char_count() {
        let bytes = TextEncoding::Utf8.encode("é").unwrap();
        assert_eq!(bytes.len(), 2);
        assert_eq!(TextEncoding::Utf8.decode(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn utf16_both_orders() {
        assert_eq!(TextEncoding::Utf16Le.encode("A").unwrap(), vec![0x41, 0x00]);
        assert_eq!(TextEncoding::Utf16Be.encode("A").unwrap(), vec![0x00, 0x41]);

        let text = "héllo 𝄞";
        for encoding in [TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
            let bytes = encoding.encode(text).unwrap();
            assert_eq!(encoding.decode(&bytes), text);
        }
    }

    #[test]
    fn utf16_substitutes_odd_byte_and_lone_surrogate() {
        assert_eq!(TextEncoding::Utf16Le.decode(&[0x41, 0x00, 0x42]), "A\u{FFFD}");
        assert_eq!(
            TextEncoding::Utf16Be.decode(&[0xD8, 0x00, 0x00, 0x41]),
            "\u{FFFD}A"
        );
    }

    #[test]
    fn parse_names() {
        assert_eq!("ascii".parse::<TextEncoding>().unwrap(), TextEncoding::Ascii);
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!(
            "utf16be".parse::<TextEncoding>().unwrap(),
            TextEncoding::Utf16Be
        );
        let err = "ebcdic".parse::<TextEncoding>().unwrap_err();
        assert!(err.to_string().contains("ebcdic"));
    }

    #[test]
    fn name_roundtrips_through_parse() {
        for encoding in [
            TextEncoding::Ascii,
            TextEncoding::Latin1,
            TextEncoding::Utf8,
            TextEncoding::Utf16Le,
            TextEncoding::Utf16Be,
        ] {
            assert_eq!(encoding.name().parse::<TextEncoding>().unwrap(), encoding);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&TextEncoding::Utf16Le).unwrap();
        assert_eq!(json, "\"utf16le\"");
        let back: TextEncoding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TextEncoding::Utf16Le);
    }
}
