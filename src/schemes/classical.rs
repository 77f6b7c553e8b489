//! Classical letter ciphers and the rail fence transposition.
//!
//! Letter ciphers only touch ASCII letters and keep their case; every
//! other character passes through unchanged. ROT47 rotates the printable
//! range 33..=126 instead. The rail fence permutes every character.

use crate::error::SchemeError;
use crate::scheme::{Capability, KeyAxis, KeySpace, Params, Scheme};

type SchemeResult = Result<String, SchemeError>;

/// Multiplicative keys coprime with 26, ascending
pub const AFFINE_MULTIPLIERS: [i64; 12] = [1, 3, 5, 7, 9, 11, 15, 17, 19, 21, 23, 25];

fn map_letters(text: &str, mut f: impl FnMut(i64) -> i64) -> String {
    text.chars()
        .map(|c| {
            let base = if c.is_ascii_lowercase() {
                b'a'
            } else if c.is_ascii_uppercase() {
                b'A'
            } else {
                return c;
            };
            let x = i64::from(c as u8 - base);
            (base + f(x).rem_euclid(26) as u8) as char
        })
        .collect()
}

fn shift_letters(text: &str, shift: i64) -> String {
    map_letters(text, |x| x + shift)
}

/// Key letters as shifts 0..26; non-letters in the key are ignored
fn key_shifts(key: &str) -> Result<Vec<i64>, SchemeError> {
    let shifts: Vec<i64> = key
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| i64::from(c.to_ascii_lowercase() as u8 - b'a'))
        .collect();
    if shifts.is_empty() {
        return Err(SchemeError::bad_param(
            "key",
            "must contain at least one letter",
        ));
    }
    Ok(shifts)
}

/// Caesar shift, default shift 3
pub struct Caesar;

impl Scheme for Caesar {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        let shift = params.int_or("shift", 3)?.rem_euclid(26);
        match capability {
            Capability::Encrypt => Ok(shift_letters(text, shift)),
            Capability::Decrypt => Ok(shift_letters(text, 26 - shift)),
            other => Err(SchemeError::NotSupported(other)),
        }
    }

    fn key_space(&self) -> Option<KeySpace> {
        Some(KeySpace::single("shift", 0..26))
    }
}

/// ROT13; its own inverse
pub struct Rot13;

impl Scheme for Rot13 {
    fn apply(&self, capability: Capability, text: &str, _params: &Params) -> SchemeResult {
        match capability {
            Capability::Encode | Capability::Decode => Ok(shift_letters(text, 13)),
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}

/// Atbash mirror, A <-> Z
pub struct Atbash;

impl Scheme for Atbash {
    fn apply(&self, capability: Capability, text: &str, _params: &Params) -> SchemeResult {
        match capability {
            Capability::Encode | Capability::Decode => Ok(map_letters(text, |x| 25 - x)),
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}

/// ROT47 over ASCII 33..=126
pub struct Rot47;

impl Scheme for Rot47 {
    fn apply(&self, capability: Capability, text: &str, _params: &Params) -> SchemeResult {
        match capability {
            Capability::Encode | Capability::Decode => Ok(text
                .chars()
                .map(|c| match c {
                    '!'..='~' => (b'!' + (c as u8 - b'!' + 47) % 94) as char,
                    _ => c,
                })
                .collect()),
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}

fn mod_inverse(a: i64) -> Option<i64> {
    let a = a.rem_euclid(26);
    (1..26).find(|x| (a * x) % 26 == 1)
}

/// Affine cipher E(x) = (a*x + b) mod 26, defaults a=5, b=8
pub struct Affine;

impl Scheme for Affine {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        let a = params.int_or("a", 5)?;
        let b = params.int_or("b", 8)?.rem_euclid(26);
        match capability {
            Capability::Encrypt => {
                let a = a.rem_euclid(26);
                Ok(map_letters(text, |x| a * x + b))
            }
            Capability::Decrypt => {
                let a_inv = mod_inverse(a).ok_or(SchemeError::NoInverse(a))?;
                Ok(map_letters(text, |y| a_inv * (y - b)))
            }
            other => Err(SchemeError::NotSupported(other)),
        }
    }

    fn key_space(&self) -> Option<KeySpace> {
        Some(KeySpace::new(vec![
            KeyAxis::new("a", AFFINE_MULTIPLIERS),
            KeyAxis::new("b", 0..26),
        ]))
    }
}

/// Vigenère; the key advances only on letters
pub struct Vigenere;

impl Scheme for Vigenere {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        let shifts = key_shifts(params.require("key")?)?;
        let sign = match capability {
            Capability::Encrypt => 1,
            Capability::Decrypt => -1,
            other => return Err(SchemeError::NotSupported(other)),
        };
        let mut j = 0;
        Ok(map_letters(text, |x| {
            let k = shifts[j % shifts.len()];
            j += 1;
            x + sign * k
        }))
    }
}

/// Beaufort, C = (K - P) mod 26; reciprocal
pub struct Beaufort;

impl Scheme for Beaufort {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        if !matches!(capability, Capability::Encrypt | Capability::Decrypt) {
            return Err(SchemeError::NotSupported(capability));
        }
        let shifts = key_shifts(params.require("key")?)?;
        let mut j = 0;
        Ok(map_letters(text, |x| {
            let k = shifts[j % shifts.len()];
            j += 1;
            k - x
        }))
    }
}

/// Rail fence zig-zag transposition, default 3 rails
pub struct RailFence;

impl RailFence {
    /// Source positions in ciphertext order
    fn order(len: usize, rails: usize) -> Vec<usize> {
        let mut rail_of = Vec::with_capacity(len);
        let mut rail = 0usize;
        let mut down = true;
        for _ in 0..len {
            rail_of.push(rail);
            if down {
                rail += 1;
                if rail == rails - 1 {
                    down = false;
                }
            } else {
                rail -= 1;
                if rail == 0 {
                    down = true;
                }
            }
        }
        let mut order: Vec<usize> = (0..len).collect();
        order.sort_by_key(|&i| rail_of[i]);
        order
    }
}

impl Scheme for RailFence {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> SchemeResult {
        let rails = params.int_or("rails", 3)?;
        if rails < 2 {
            return Err(SchemeError::bad_param("rails", "must be at least 2"));
        }
        let chars: Vec<char> = text.chars().collect();
        let order = Self::order(chars.len(), rails as usize);
        match capability {
            Capability::Encrypt => Ok(order.iter().map(|&i| chars[i]).collect()),
            Capability::Decrypt => {
                let mut plain = vec!['\0'; chars.len()];
                for (k, &i) in order.iter().enumerate() {
                    plain[i] = chars[k];
                }
                Ok(plain.into_iter().collect())
            }
            other => Err(SchemeError::NotSupported(other)),
        }
    }
}
