//! Capability-checked routing from `(capability, scheme, text, params)` to
//! the scheme implementation.
//!
//! Errors are never retried or swallowed here. Collaborator failures come
//! back as [`DecodrError::InvalidInput`] with the scheme's message intact.

use crate::bruteforce::{BruteForcer, CrackResult};
use crate::error::{DecodrError, Result, SchemeError};
use crate::registry::{SchemeDescriptor, SchemeRegistry};
use crate::scheme::{Capability, Params};

pub struct Dispatcher<'a> {
    registry: &'a SchemeRegistry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a SchemeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a SchemeRegistry {
        self.registry
    }

    fn resolve(&self, capability: Capability, scheme_id: &str) -> Result<&'a SchemeDescriptor> {
        let descriptor = self.registry.lookup(scheme_id)?;
        if !descriptor.supports(capability) {
            return Err(DecodrError::UnsupportedCapability {
                scheme: descriptor.id.to_string(),
                capability,
            });
        }
        Ok(descriptor)
    }

    /// Resolve and run a direct transform, keeping a collaborator failure as
    /// the inner value. Only an unknown scheme or a missing capability fails
    /// the outer result.
    pub fn attempt(
        &self,
        capability: Capability,
        scheme_id: &str,
        text: &str,
        params: &Params,
    ) -> Result<std::result::Result<String, SchemeError>> {
        let descriptor = self.resolve(capability, scheme_id)?;
        Ok(descriptor.implementation.apply(capability, text, params))
    }

    /// Run `capability` of `scheme_id` on `text`.
    ///
    /// `crack` is accepted too and renders the brute-force listing as one
    /// `key: plaintext` line per successful key; use [`Dispatcher::crack`]
    /// for the typed results.
    pub fn invoke(
        &self,
        capability: Capability,
        scheme_id: &str,
        text: &str,
        params: &Params,
    ) -> Result<String> {
        if capability == Capability::Crack {
            self.resolve(capability, scheme_id)?;
            let lines: Vec<String> = self
                .crack(scheme_id, text)?
                .iter()
                .map(|r| format!("{}: {}", r.key, r.plaintext))
                .collect();
            return Ok(lines.join("\n"));
        }
        self.attempt(capability, scheme_id, text, params)?
            .map_err(|e| e.into_invalid_input(scheme_id))
    }

    pub fn encode(&self, scheme_id: &str, text: &str, params: &Params) -> Result<String> {
        self.invoke(Capability::Encode, scheme_id, text, params)
    }

    pub fn decode(&self, scheme_id: &str, text: &str, params: &Params) -> Result<String> {
        self.invoke(Capability::Decode, scheme_id, text, params)
    }

    pub fn encrypt(&self, scheme_id: &str, text: &str, params: &Params) -> Result<String> {
        self.invoke(Capability::Encrypt, scheme_id, text, params)
    }

    pub fn decrypt(&self, scheme_id: &str, text: &str, params: &Params) -> Result<String> {
        self.invoke(Capability::Decrypt, scheme_id, text, params)
    }

    /// Brute-force `scheme_id` with the default key-space limit
    pub fn crack(&self, scheme_id: &str, text: &str) -> Result<Vec<CrackResult>> {
        BruteForcer::new(self.registry).crack(scheme_id, text)
    }
}
