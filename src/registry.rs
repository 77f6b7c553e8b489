//! Scheme catalogue.
//!
//! The registry is built once from a fixed table and never mutated
//! afterwards. Declaration order is significant: the ranker uses it as the
//! trial order and as the tie-break between equal scores.

use crate::classify::FormatLabel;
use crate::error::{DecodrError, Result};
use crate::scheme::{Capability, CapabilitySet, Scheme};
use crate::schemes::{
    Affine, Atbash, Base32, Base64, Beaufort, Caesar, Hash, Hex, RailFence, Rc4, RepeatingXor,
    Rot13, Rot47, Url, Vigenere, Xor,
};
use std::fmt;
use std::sync::OnceLock;

use crate::scheme::Capability::{Crack, Decode, Decrypt, Encode, Encrypt};

/// Immutable description of one registered scheme
pub struct SchemeDescriptor {
    pub id: &'static str,
    pub capabilities: CapabilitySet,
    /// Needs a caller-supplied secret to decrypt
    pub keyed: bool,
    /// Wire format this scheme consumes on decode/decrypt
    pub input_format: Option<FormatLabel>,
    pub implementation: Box<dyn Scheme>,
}

impl SchemeDescriptor {
    pub fn new(
        id: &'static str,
        capabilities: &[Capability],
        implementation: impl Scheme + 'static,
    ) -> Self {
        Self {
            id,
            capabilities: CapabilitySet::of(capabilities),
            keyed: false,
            input_format: None,
            implementation: Box::new(implementation),
        }
    }

    pub fn keyed(mut self) -> Self {
        self.keyed = true;
        self
    }

    pub fn reads(mut self, format: FormatLabel) -> Self {
        self.input_format = Some(format);
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// The keyless inverse direction, `decode` preferred over `decrypt`
    pub fn reverse_capability(&self) -> Option<Capability> {
        [Decode, Decrypt].into_iter().find(|c| self.supports(*c))
    }

    fn validate(&self) -> Result<()> {
        let inconsistent = |reason: &str| DecodrError::InconsistentScheme {
            scheme: self.id.to_string(),
            reason: reason.to_string(),
        };
        if self.capabilities.is_empty() {
            return Err(inconsistent("no capabilities"));
        }
        match (self.supports(Crack), self.implementation.key_space()) {
            (true, None) => Err(inconsistent("crack requires a key space")),
            (false, Some(_)) => Err(inconsistent("key space declared without crack")),
            (true, Some(space)) if space.size() == Some(0) => {
                Err(inconsistent("key space is empty"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for SchemeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeDescriptor")
            .field("id", &self.id)
            .field("capabilities", &self.capabilities)
            .field("keyed", &self.keyed)
            .field("input_format", &self.input_format)
            .finish_non_exhaustive()
    }
}

/// Read-only, ordered catalogue of schemes
#[derive(Debug)]
pub struct SchemeRegistry {
    schemes: Vec<SchemeDescriptor>,
}

/// Collects descriptors and validates them into a [`SchemeRegistry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemes: Vec<SchemeDescriptor>,
}

impl RegistryBuilder {
    pub fn register(mut self, descriptor: SchemeDescriptor) -> Result<Self> {
        if self.schemes.iter().any(|s| s.id == descriptor.id) {
            return Err(DecodrError::DuplicateScheme(descriptor.id.to_string()));
        }
        descriptor.validate()?;
        self.schemes.push(descriptor);
        Ok(self)
    }

    pub fn build(self) -> SchemeRegistry {
        SchemeRegistry {
            schemes: self.schemes,
        }
    }
}

impl SchemeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The built-in catalogue
    pub fn builtin() -> Result<Self> {
        let table = [
            SchemeDescriptor::new("base64", &[Encode, Decode], Base64).reads(FormatLabel::Base64),
            SchemeDescriptor::new("base32", &[Encode, Decode], Base32).reads(FormatLabel::Base32),
            SchemeDescriptor::new("hex", &[Encode, Decode], Hex).reads(FormatLabel::Hex),
            SchemeDescriptor::new("url", &[Encode, Decode], Url).reads(FormatLabel::UrlEncoded),
            SchemeDescriptor::new("caesar", &[Encrypt, Decrypt, Crack], Caesar)
                .keyed()
                .reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("atbash", &[Encode, Decode], Atbash).reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("affine", &[Encrypt, Decrypt, Crack], Affine)
                .keyed()
                .reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("rot13", &[Encode, Decode], Rot13).reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("rot47", &[Encode, Decode], Rot47).reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("vigenere", &[Encrypt, Decrypt], Vigenere)
                .keyed()
                .reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("beaufort", &[Encrypt, Decrypt], Beaufort)
                .keyed()
                .reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("railfence", &[Encrypt, Decrypt], RailFence)
                .keyed()
                .reads(FormatLabel::Plaintext),
            SchemeDescriptor::new("xor", &[Encrypt, Decrypt, Crack], Xor)
                .keyed()
                .reads(FormatLabel::Hex),
            SchemeDescriptor::new("repeating_xor", &[Encrypt, Decrypt], RepeatingXor)
                .keyed()
                .reads(FormatLabel::Hex),
            SchemeDescriptor::new("rc4", &[Encrypt, Decrypt], Rc4)
                .keyed()
                .reads(FormatLabel::Hex),
            SchemeDescriptor::new("hash", &[Encode], Hash),
        ];

        let mut builder = Self::builder();
        for descriptor in table {
            builder = builder.register(descriptor)?;
        }
        Ok(builder.build())
    }

    /// Process-wide built-in registry
    pub fn global() -> &'static SchemeRegistry {
        static GLOBAL: OnceLock<SchemeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::builtin().expect("built-in scheme table is valid"))
    }

    pub fn lookup(&self, id: &str) -> Result<&SchemeDescriptor> {
        self.schemes
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DecodrError::UnknownScheme(id.to_string()))
    }

    /// Descriptors in declaration order
    pub fn list(&self) -> &[SchemeDescriptor] {
        &self.schemes
    }

    /// Declaration index of `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.schemes.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
