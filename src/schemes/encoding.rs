//! Byte/text encodings: Base64, Base32, hex, percent-encoding.
//!
//! All four treat the text as UTF-8 bytes on encode and require the decoded
//! bytes to be valid UTF-8 on decode.

use crate::error::SchemeError;
use crate::scheme::{Capability, Params, Scheme};
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

type SchemeResult = Result<String, SchemeError>;

/// Standard alphabet with canonical padding; non-zero trailing bits in the
/// last symbol are tolerated on decode.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn utf8(bytes: Vec<u8>) -> SchemeResult {
    String::from_utf8(bytes).map_err(|_| SchemeError::NotUtf8)
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Standard Base64 (RFC 4648 §4) with padding
pub struct Base64;

impl Scheme for Base64 {
    fn apply(&self, capability: Capability, text: &str, _params: &Params) -> SchemeResult {
        match capability {
            Capability::Encode => Ok(BASE64.encode(text.as_bytes())),
            Capability::Decode => {
                let mut data = strip_whitespace(text);
                let rem = data.len() % 4;
                if rem != 0 {
                    data.push_str(&"=".repeat(4 - rem));
                }
                let bytes = BASE64
                    .decode(data.as_bytes())
                    .map_err(|e| SchemeError::Malformed(format!("base64: {}", e)))?;
                utf8(bytes)
            }
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}

/// Strict Base64 check: canonical padding, length a multiple of 4
pub fn is_strict_base64(text: &str) -> bool {
    text.len() % 4 == 0 && BASE64.decode(text.as_bytes()).is_ok()
}

/// Base32 (RFC 4648 §6), case-insensitive on decode
pub struct Base32;

impl Scheme for Base32 {
    fn apply(&self, capability: Capability, text: &str, _params: &Params) -> SchemeResult {
        match capability {
            Capability::Encode => Ok(base32_encode(text.as_bytes())),
            Capability::Decode => {
                let mut data = strip_whitespace(text);
                if data.is_empty() {
                    return Ok(String::new());
                }
                let rem = data.len() % 8;
                if rem != 0 {
                    data.push_str(&"=".repeat(8 - rem));
                }
                let bytes = base32_decode(&data)
                    .ok_or_else(|| SchemeError::Malformed("base32: invalid input".into()))?;
                utf8(bytes)
            }
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}

/// Encode bytes as padded Base32
pub fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() + 4) / 5 * 8);
    let mut buffer: u64 = 0;
    let mut bits = 0u32;

    for &byte in data {
        buffer = (buffer << 8) | u64::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            let index = ((buffer >> bits) & 0x1f) as usize;
            out.push(BASE32_ALPHABET[index] as char);
        }
    }
    if bits > 0 {
        let index = ((buffer << (5 - bits)) & 0x1f) as usize;
        out.push(BASE32_ALPHABET[index] as char);
    }
    while out.len() % 8 != 0 {
        out.push('=');
    }
    out
}

/// Decode padded Base32. Length must be a multiple of 8 and padding may
/// only close the final group with 1, 3, 4 or 6 `=` characters.
pub fn base32_decode(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes.len() % 8 != 0 {
        return None;
    }

    let padding = bytes.iter().rev().take_while(|&&b| b == b'=').count();
    if !matches!(padding, 0 | 1 | 3 | 4 | 6) {
        return None;
    }
    let body = &bytes[..bytes.len() - padding];

    let mut out = Vec::with_capacity(body.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits = 0u32;
    for &b in body {
        let value = match b.to_ascii_uppercase() {
            c @ b'A'..=b'Z' => c - b'A',
            c @ b'2'..=b'7' => c - b'2' + 26,
            _ => return None,
        };
        buffer = (buffer << 5) | u64::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
        }
    }
    Some(out)
}

/// Lower-case hexadecimal
pub struct Hex;

impl Scheme for Hex {
    fn apply(&self, capability: Capability, text: &str, _params: &Params) -> SchemeResult {
        match capability {
            Capability::Encode => Ok(hex::encode(text.as_bytes())),
            Capability::Decode => {
                let bytes = hex::decode(strip_whitespace(text))
                    .map_err(|e| SchemeError::Malformed(format!("hex: {}", e)))?;
                utf8(bytes)
            }
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}

/// Percent-encoding; everything outside the RFC 3986 unreserved set is escaped
pub struct Url;

impl Scheme for Url {
    fn apply(&self, capability: Capability, text: &str, _params: &Params) -> SchemeResult {
        match capability {
            Capability::Encode => Ok(url_encode(text)),
            Capability::Decode => utf8(url_decode(text)?),
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}

fn url_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for &b in text.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

fn url_decode(text: &str) -> Result<Vec<u8>, SchemeError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes
                .get(i + 1..i + 3)
                .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
                .and_then(|pair| hex::decode(pair).ok())
                .map(|decoded| decoded[0])
                .ok_or_else(|| SchemeError::Malformed(format!("url: bad escape at byte {}", i)))?;
            out.push(escape);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scheme: &dyn Scheme, capability: Capability, text: &str) -> SchemeResult {
        scheme.apply(capability, text, &Params::new())
    }

    #[test]
    fn test_base64_known_value() {
        assert_eq!(run(&Base64, Capability::Encode, "Hello").unwrap(), "SGVsbG8=");
        assert_eq!(run(&Base64, Capability::Decode, "SGVsbG8=").unwrap(), "Hello");
    }

    #[test]
    fn test_base64_restores_missing_padding() {
        assert_eq!(run(&Base64, Capability::Decode, "SGVsbG8").unwrap(), "Hello");
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(matches!(
            run(&Base64, Capability::Decode, "!!!!"),
            Err(SchemeError::Malformed(_))
        ));
    }

    #[test]
    fn test_base64_tolerates_trailing_bits() {
        assert!(is_strict_base64("ab=="));
        assert_eq!(run(&Base64, Capability::Decode, "ab==").unwrap(), "i");
        assert_eq!(run(&Base64, Capability::Decode, "ab").unwrap(), "i");
    }

    #[test]
    fn test_strict_base64() {
        assert!(is_strict_base64("SGVsbG8="));
        assert!(!is_strict_base64("SGVsbG8"));
        assert!(!is_strict_base64("48656c6c6f"));
    }

    #[test]
    fn test_base32_rfc4648_vectors() {
        let vectors = [
            ("f", "MY======"),
            ("fo", "MZXQ===="),
            ("foo", "MZXW6==="),
            ("foob", "MZXW6YQ="),
            ("fooba", "MZXW6YTB"),
            ("foobar", "MZXW6YTBOI======"),
        ];
        for (plain, encoded) in vectors {
            assert_eq!(base32_encode(plain.as_bytes()), encoded);
            assert_eq!(base32_decode(encoded).unwrap(), plain.as_bytes());
        }
    }

    #[test]
    fn test_base32_decode_is_case_insensitive() {
        assert_eq!(run(&Base32, Capability::Decode, "mzxw6===").unwrap(), "foo");
        assert_eq!(run(&Base32, Capability::Decode, "MZXW6").unwrap(), "foo");
    }

    #[test]
    fn test_base32_strict_rejects() {
        assert!(base32_decode("HELLO").is_none());
        assert!(base32_decode("MZXW6=Y=").is_none());
        assert!(base32_decode("MZXW1===").is_none());
    }

    #[test]
    fn test_hex_scheme() {
        assert_eq!(run(&Hex, Capability::Encode, "Hello").unwrap(), "48656c6c6f");
        assert_eq!(run(&Hex, Capability::Decode, "48656C6C6F").unwrap(), "Hello");
        assert!(run(&Hex, Capability::Decode, "abc").is_err());
        assert_eq!(run(&Hex, Capability::Decode, "ff"), Err(SchemeError::NotUtf8));
    }

    #[test]
    fn test_url_scheme() {
        assert_eq!(run(&Url, Capability::Encode, "a b/c").unwrap(), "a%20b%2Fc");
        assert_eq!(run(&Url, Capability::Decode, "%48%65%6C%6C%6F").unwrap(), "Hello");
        assert!(run(&Url, Capability::Decode, "100%").is_err());
        assert!(run(&Url, Capability::Decode, "%zz").is_err());
    }

    #[test]
    fn test_url_escape_needs_two_hex_digits() {
        assert!(run(&Url, Capability::Decode, "%+1").is_err());
        assert!(run(&Url, Capability::Decode, "%-1").is_err());
        assert!(run(&Url, Capability::Decode, "%4").is_err());
        assert_eq!(run(&Url, Capability::Decode, "%4a%4A").unwrap(), "JJ");
    }

    #[test]
    fn test_encodings_reject_cipher_capabilities() {
        assert_eq!(
            run(&Hex, Capability::Encrypt, "x"),
            Err(SchemeError::NotSupported(Capability::Encrypt))
        );
    }
}
