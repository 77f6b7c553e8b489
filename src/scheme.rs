use crate::error::{DecodrError, Result, SchemeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Operation a scheme may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Encode,
    Decode,
    Encrypt,
    Decrypt,
    Crack,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Encode,
        Capability::Decode,
        Capability::Encrypt,
        Capability::Decrypt,
        Capability::Crack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::Crack => "crack",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Encode => 1,
            Self::Decode => 1 << 1,
            Self::Encrypt => 1 << 2,
            Self::Decrypt => 1 << 3,
            Self::Crack => 1 << 4,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = DecodrError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "encode" => Ok(Self::Encode),
            "decode" => Ok(Self::Decode),
            "encrypt" => Ok(Self::Encrypt),
            "decrypt" => Ok(Self::Decrypt),
            "crack" => Ok(Self::Crack),
            _ => Err(DecodrError::UnknownCapability(s.to_string())),
        }
    }
}

/// Set of capabilities, iterated in `Capability::ALL` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub fn of(capabilities: &[Capability]) -> Self {
        Self(capabilities.iter().fold(0, |acc, c| acc | c.bit()))
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|c| c.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Named string parameters handed to a scheme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl ToString) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Required string parameter
    pub fn require(&self, name: &'static str) -> std::result::Result<&str, SchemeError> {
        self.get(name).ok_or(SchemeError::MissingParam(name))
    }

    /// Integer parameter, falling back to `default` when absent
    pub fn int_or(&self, name: &str, default: i64) -> std::result::Result<i64, SchemeError> {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| SchemeError::bad_param(name, format!("'{}' is not an integer", raw))),
        }
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// One candidate key from a key space: ordered `(parameter, value)` pairs.
///
/// Keys of the same scheme share parameter names, so the derived ordering
/// compares values lexicographically in axis order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key(Vec<(String, i64)>);

impl Key {
    pub fn new(parts: Vec<(String, i64)>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[(String, i64)] {
        &self.0
    }

    pub fn value(&self, name: &str) -> Option<i64> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn to_params(&self) -> Params {
        self.0.iter().map(|(n, v)| (n.as_str(), *v)).collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(n, v)| format!("{}={}", n, v)).collect();
        f.write_str(&parts.join(", "))
    }
}

/// One dimension of a key space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAxis {
    pub name: &'static str,
    pub values: Vec<i64>,
}

impl KeyAxis {
    pub fn new(name: &'static str, values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            name,
            values: values.into_iter().collect(),
        }
    }
}

/// Finite, ordered key space: cartesian product of its axes, first axis major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    axes: Vec<KeyAxis>,
}

impl KeySpace {
    pub fn new(axes: Vec<KeyAxis>) -> Self {
        Self { axes }
    }

    pub fn single(name: &'static str, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(vec![KeyAxis::new(name, values)])
    }

    pub fn axes(&self) -> &[KeyAxis] {
        &self.axes
    }

    /// Number of keys, or `None` if the product overflows `usize`
    pub fn size(&self) -> Option<usize> {
        if self.axes.is_empty() {
            return Some(0);
        }
        self.axes
            .iter()
            .try_fold(1usize, |acc, axis| acc.checked_mul(axis.values.len()))
    }

    /// All keys in enumeration order
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Vec<(String, i64)>> = vec![Vec::new()];
        if self.axes.is_empty() {
            return Vec::new();
        }
        for axis in &self.axes {
            let mut next = Vec::with_capacity(keys.len() * axis.values.len());
            for prefix in &keys {
                for &value in &axis.values {
                    let mut key = prefix.clone();
                    key.push((axis.name.to_string(), value));
                    next.push(key);
                }
            }
            keys = next;
        }
        keys.into_iter().map(Key::new).collect()
    }
}

/// Contract every registered transform implements.
///
/// `apply` is only called with capabilities listed in the scheme's
/// descriptor; implementations answer anything else with
/// [`SchemeError::NotSupported`].
pub trait Scheme: Send + Sync {
    fn apply(
        &self,
        capability: Capability,
        text: &str,
        params: &Params,
    ) -> std::result::Result<String, SchemeError>;

    /// Enumerable key space, present only for crack-capable schemes
    fn key_space(&self) -> Option<KeySpace> {
        None
    }
}
