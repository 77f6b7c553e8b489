//! Structural format classifier.
//!
//! Rules are evaluated top to bottom on the trimmed input and the first
//! match wins:
//!
//! | rule | label | confidence |
//! |------|-------|------------|
//! | empty / whitespace | `none` | 0.0 |
//! | even-length hex digits | `hex` | 0.95 |
//! | strict padded Base64 | `base64` | 0.90 |
//! | padded Base32, any case | `base32` | 0.85 |
//! | contains a `%XX` escape | `url-encoded` | 0.80 |
//! | printable ratio > 0.9 | `plaintext` | ratio |
//! | printable ratio < 0.3 | `ciphertext` | 0.5 |
//! | otherwise | `unknown` | ratio |
//!
//! Hex is tested before Base64 because most hex strings are also made of
//! Base64 alphabet characters.

use crate::error::DecodrError;
use crate::schemes::encoding::{base32_decode, is_strict_base64};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub const HEX_CONFIDENCE: f64 = 0.95;
pub const BASE64_CONFIDENCE: f64 = 0.90;
pub const BASE32_CONFIDENCE: f64 = 0.85;
pub const URL_CONFIDENCE: f64 = 0.80;
pub const CIPHERTEXT_CONFIDENCE: f64 = 0.5;

const PLAINTEXT_RATIO: f64 = 0.9;
const CIPHERTEXT_RATIO: f64 = 0.3;

/// Wire format guessed for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatLabel {
    Hex,
    Base64,
    Base32,
    UrlEncoded,
    Plaintext,
    Ciphertext,
    Unknown,
    #[serde(rename = "none")]
    Empty,
}

impl FormatLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base64 => "base64",
            Self::Base32 => "base32",
            Self::UrlEncoded => "url-encoded",
            Self::Plaintext => "plaintext",
            Self::Ciphertext => "ciphertext",
            Self::Unknown => "unknown",
            Self::Empty => "none",
        }
    }
}

impl fmt::Display for FormatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FormatLabel {
    type Err = DecodrError;
    fn from_str(s: &str) -> Result<Self, DecodrError> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            "base32" => Ok(Self::Base32),
            "url-encoded" | "url" => Ok(Self::UrlEncoded),
            "plaintext" => Ok(Self::Plaintext),
            "ciphertext" => Ok(Self::Ciphertext),
            "unknown" => Ok(Self::Unknown),
            "none" => Ok(Self::Empty),
            _ => Err(DecodrError::UnknownFormat(s.to_string())),
        }
    }
}

/// Label plus confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: FormatLabel,
    pub confidence: f64,
}

impl Classification {
    fn new(label: FormatLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }
}

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]+$").expect("static regex"))
}

fn url_escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%[0-9A-Fa-f]{2}").expect("static regex"))
}

/// Fraction of bytes that are printable ASCII (32..=126) or tab/LF/CR.
/// Empty input has ratio 0.
pub fn printable_ratio(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let printable = bytes
        .iter()
        .filter(|&&b| matches!(b, 32..=126 | b'\t' | b'\n' | b'\r'))
        .count();
    printable as f64 / bytes.len() as f64
}

pub fn is_hex(text: &str) -> bool {
    text.len() % 2 == 0 && hex_pattern().is_match(text)
}

pub fn is_base64(text: &str) -> bool {
    is_strict_base64(text)
}

pub fn is_base32(text: &str) -> bool {
    base32_decode(text).is_some()
}

pub fn is_url_encoded(text: &str) -> bool {
    url_escape_pattern().is_match(text)
}

/// Classify `text` by the ordered rule table above
pub fn classify(text: &str) -> Classification {
    let data = text.trim();
    let result = if data.is_empty() {
        Classification::new(FormatLabel::Empty, 0.0)
    } else if is_hex(data) {
        Classification::new(FormatLabel::Hex, HEX_CONFIDENCE)
    } else if is_base64(data) {
        Classification::new(FormatLabel::Base64, BASE64_CONFIDENCE)
    } else if is_base32(data) {
        Classification::new(FormatLabel::Base32, BASE32_CONFIDENCE)
    } else if is_url_encoded(data) {
        Classification::new(FormatLabel::UrlEncoded, URL_CONFIDENCE)
    } else {
        let ratio = printable_ratio(data.as_bytes());
        if ratio > PLAINTEXT_RATIO {
            Classification::new(FormatLabel::Plaintext, ratio)
        } else if ratio < CIPHERTEXT_RATIO {
            Classification::new(FormatLabel::Ciphertext, CIPHERTEXT_CONFIDENCE)
        } else {
            Classification::new(FormatLabel::Unknown, ratio)
        }
    };
    tracing::debug!(label = %result.label, confidence = result.confidence, "classified input");
    result
}
