//! XOR-family stream ciphers.
//!
//! Encryption takes UTF-8 text and emits lower-case hex; decryption takes
//! hex (whitespace ignored) and fails unless the recovered bytes are UTF-8.

use crate::error::SchemeError;
use crate::scheme::{Capability, KeySpace, Params, Scheme};

type SchemeResult = Result<String, SchemeError>;

fn from_hex(text: &str) -> Result<Vec<u8>, SchemeError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(compact).map_err(|_| SchemeError::Malformed("ciphertext must be hex-encoded".into()))
}

fn to_utf8(bytes: Vec<u8>) -> SchemeResult {
    String::from_utf8(bytes).map_err(|_| SchemeError::NotUtf8)
}

/// Run `transform` in the direction asked for by `capability`
fn hex_stream(
    capability: Capability,
    text: &str,
    transform: impl FnOnce(Vec<u8>) -> Vec<u8>,
) -> SchemeResult {
    match capability {
        Capability::Encrypt => Ok(hex::encode(transform(text.as_bytes().to_vec()))),
        Capability::Decrypt => to_utf8(transform(from_hex(text)?)),
        other => Err(SchemeError::NotSupported(other)),
    }
}

fn byte_key(params: &Params) -> Result<u8, SchemeError> {
    let raw = params.require("key")?.trim().to_lowercase();
    let parsed = match raw.strip_prefix("0x") {
        Some(hex_digits) => i64::from_str_radix(hex_digits, 16),
        None => raw.parse(),
    };
    parsed
        .ok()
        .and_then(|k| u8::try_from(k).ok())
        .ok_or_else(|| SchemeError::bad_param("key", "must be from 0 to 255"))
}

fn string_key(params: &Params) -> Result<Vec<u8>, SchemeError> {
    let key = params.require("key")?;
    if key.is_empty() {
        return Err(SchemeError::bad_param("key", "cannot be empty"));
    }
    Ok(key.as_bytes().to_vec())
}

/// Single-byte XOR
pub struct Xor;

impl Scheme for Xor {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        let key = byte_key(params)?;
        hex_stream(capability, text, |data| data.into_iter().map(|b| b ^ key).collect())
    }

    fn key_space(&self) -> Option<KeySpace> {
        Some(KeySpace::single("key", 0..256))
    }
}

/// Repeating-key XOR
pub struct RepeatingXor;

impl Scheme for RepeatingXor {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        let key = string_key(params)?;
        hex_stream(capability, text, |data| {
            data.iter()
                .zip(key.iter().cycle())
                .map(|(b, k)| b ^ k)
                .collect()
        })
    }
}

/// RC4 keystream XOR
pub struct Rc4;

impl Rc4 {
    fn keystream_xor(key: &[u8], data: Vec<u8>) -> Vec<u8> {
        let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }

        let (mut i, mut j) = (0u8, 0u8);
        data.into_iter()
            .map(|byte| {
                i = i.wrapping_add(1);
                j = j.wrapping_add(s[i as usize]);
                s.swap(i as usize, j as usize);
                let k = s[s[i as usize].wrapping_add(s[j as usize]) as usize];
                byte ^ k
            })
            .collect()
    }
}

impl Scheme for Rc4 {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        let key = string_key(params)?;
        hex_stream(capability, text, |data| Self::keystream_xor(&key, data))
    }
}
