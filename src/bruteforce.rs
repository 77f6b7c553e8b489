//! Exhaustive key search for schemes with small, enumerable key spaces.
//!
//! Every key is one trial that yields its own result value. Failed trials
//! (bad inverse, undecodable bytes, ...) are expected and are dropped by
//! [`BruteForcer::crack`]; they never abort the search.

use crate::error::{DecodrError, Result, SchemeError};
use crate::registry::{SchemeDescriptor, SchemeRegistry};
use crate::scheme::{Capability, Key, KeySpace, Params};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Largest key space enumerated unless configured otherwise
pub const DEFAULT_MAX_KEY_SPACE: usize = 4096;

/// One transform trial and its outcome
#[derive(Debug, Clone)]
pub struct DecodeAttempt {
    pub scheme_id: &'static str,
    pub capability: Capability,
    pub params: Params,
    pub key: Option<Key>,
    pub outcome: std::result::Result<String, SchemeError>,
}

impl DecodeAttempt {
    pub fn output(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&SchemeError> {
        self.outcome.as_ref().err()
    }
}

/// A key that decrypted without error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrackResult {
    pub key: Key,
    pub plaintext: String,
}

pub struct BruteForcer<'a> {
    registry: &'a SchemeRegistry,
    max_key_space: usize,
    parallel: bool,
}

impl<'a> BruteForcer<'a> {
    pub fn new(registry: &'a SchemeRegistry) -> Self {
        Self {
            registry,
            max_key_space: DEFAULT_MAX_KEY_SPACE,
            parallel: false,
        }
    }

    pub fn with_limit(mut self, max_key_space: usize) -> Self {
        self.max_key_space = max_key_space;
        self
    }

    /// Shard trials across the rayon pool. Result order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn key_space(&self, scheme_id: &str) -> Result<(&'a SchemeDescriptor, KeySpace)> {
        let descriptor = self.registry.lookup(scheme_id)?;
        let unsupported = || DecodrError::UnsupportedCapability {
            scheme: descriptor.id.to_string(),
            capability: Capability::Crack,
        };
        if !descriptor.supports(Capability::Crack) {
            return Err(unsupported());
        }
        let space = descriptor.implementation.key_space().ok_or_else(unsupported)?;

        let size = space.size().unwrap_or(usize::MAX);
        if size > self.max_key_space {
            return Err(DecodrError::KeySpaceTooLarge {
                scheme: descriptor.id.to_string(),
                size,
                limit: self.max_key_space,
            });
        }
        Ok((descriptor, space))
    }

    /// Every trial, successful or not, in key-space order
    pub fn attempts(&self, scheme_id: &str, ciphertext: &str) -> Result<Vec<DecodeAttempt>> {
        let (descriptor, space) = self.key_space(scheme_id)?;
        let keys = space.keys();

        let trial = |key: &Key| {
            let params = key.to_params();
            let outcome = descriptor
                .implementation
                .apply(Capability::Decrypt, ciphertext, &params);
            if let Err(e) = &outcome {
                tracing::debug!(scheme = descriptor.id, key = %key, reason = %e, "key rejected");
            }
            DecodeAttempt {
                scheme_id: descriptor.id,
                capability: Capability::Decrypt,
                params,
                key: Some(key.clone()),
                outcome,
            }
        };

        let attempts: Vec<DecodeAttempt> = if self.parallel {
            keys.par_iter().map(trial).collect()
        } else {
            keys.iter().map(trial).collect()
        };
        Ok(attempts)
    }

    /// Successful `(key, plaintext)` pairs in key-space order
    pub fn crack(&self, scheme_id: &str, ciphertext: &str) -> Result<Vec<CrackResult>> {
        let attempts = self.attempts(scheme_id, ciphertext)?;
        let tried = attempts.len();
        let results: Vec<CrackResult> = attempts
            .into_iter()
            .filter_map(|attempt| match (attempt.key, attempt.outcome) {
                (Some(key), Ok(plaintext)) => Some(CrackResult { key, plaintext }),
                _ => None,
            })
            .collect();
        tracing::info!(
            scheme = scheme_id,
            tried,
            succeeded = results.len(),
            "brute force finished"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemeDescriptor;
    use crate::scheme::{KeyAxis, Scheme};

    /// Fails on odd keys, echoes the key otherwise
    struct EvenOnly;

    impl Scheme for EvenOnly {
        fn apply(
            &self,
            _capability: Capability,
            _text: &str,
            params: &Params,
        ) -> std::result::Result<String, SchemeError> {
            let k = params.int_or("k", 0)?;
            if k % 2 == 1 {
                Err(SchemeError::Malformed(format!("odd key {}", k)))
            } else {
                Ok(k.to_string())
            }
        }

        fn key_space(&self) -> Option<KeySpace> {
            Some(KeySpace::single("k", 0..10))
        }
    }

    struct AlwaysFails;

    impl Scheme for AlwaysFails {
        fn apply(
            &self,
            _capability: Capability,
            _text: &str,
            _params: &Params,
        ) -> std::result::Result<String, SchemeError> {
            Err(SchemeError::NotUtf8)
        }

        fn key_space(&self) -> Option<KeySpace> {
            Some(KeySpace::single("k", 0..3))
        }
    }

    struct Huge;

    impl Scheme for Huge {
        fn apply(
            &self,
            _capability: Capability,
            text: &str,
            _params: &Params,
        ) -> std::result::Result<String, SchemeError> {
            Ok(text.to_string())
        }

        fn key_space(&self) -> Option<KeySpace> {
            Some(KeySpace::new(vec![
                KeyAxis::new("x", 0..100),
                KeyAxis::new("y", 0..100),
            ]))
        }
    }

    fn test_registry() -> SchemeRegistry {
        use crate::scheme::Capability::{Crack, Decrypt};
        SchemeRegistry::builder()
            .register(SchemeDescriptor::new("even", &[Decrypt, Crack], EvenOnly))
            .unwrap()
            .register(SchemeDescriptor::new("fails", &[Decrypt, Crack], AlwaysFails))
            .unwrap()
            .register(SchemeDescriptor::new("huge", &[Decrypt, Crack], Huge))
            .unwrap()
            .build()
    }

    #[test]
    fn test_caesar_crack_returns_every_shift() {
        let registry = SchemeRegistry::global();
        let results = BruteForcer::new(registry).crack("caesar", "Khoor").unwrap();
        assert_eq!(results.len(), 26);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.key.value("shift"), Some(i as i64));
        }
        assert_eq!(results[3].plaintext, "Hello");
        assert_eq!(results[0].plaintext, "Khoor");
    }

    #[test]
    fn test_affine_crack_enumerates_312_keys() {
        let registry = SchemeRegistry::global();
        let results = BruteForcer::new(registry).crack("affine", "NESRIPCUZ").unwrap();
        assert_eq!(results.len(), 312);
        let hit = results
            .iter()
            .find(|r| r.key.value("a") == Some(5) && r.key.value("b") == Some(8))
            .unwrap();
        assert_eq!(hit.plaintext, "BUCHAREST");
        let mut sorted = results.clone();
        sorted.sort_by(|x, y| x.key.cmp(&y.key));
        assert_eq!(sorted, results);
    }

    #[test]
    fn test_xor_crack_skips_non_utf8_keys() {
        let registry = SchemeRegistry::global();
        let results = BruteForcer::new(registry).crack("xor", "ff").unwrap();
        assert_eq!(results.len(), 128);
        assert_eq!(results[0].key.value("key"), Some(0x80));
        assert_eq!(results[0].plaintext, "\u{7f}");
    }

    #[test]
    fn test_failed_keys_are_skipped_in_order() {
        let registry = test_registry();
        let results = BruteForcer::new(&registry).crack("even", "x").unwrap();
        let plaintexts: Vec<&str> = results.iter().map(|r| r.plaintext.as_str()).collect();
        assert_eq!(plaintexts, vec!["0", "2", "4", "6", "8"]);
    }

    #[test]
    fn test_attempts_keep_failures() {
        let registry = test_registry();
        let attempts = BruteForcer::new(&registry).attempts("even", "x").unwrap();
        assert_eq!(attempts.len(), 10);
        assert!(attempts[1].error().is_some());
        assert_eq!(attempts[2].output(), Some("2"));
    }

    #[test]
    fn test_all_keys_failing_is_empty_not_error() {
        let registry = test_registry();
        let results = BruteForcer::new(&registry).crack("fails", "x").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_key_space_too_large_rejected() {
        let registry = test_registry();
        let err = BruteForcer::new(&registry).crack("huge", "x").unwrap_err();
        assert!(matches!(
            err,
            DecodrError::KeySpaceTooLarge { size: 10_000, limit: DEFAULT_MAX_KEY_SPACE, .. }
        ));
        let ok = BruteForcer::new(&registry).with_limit(10_000).attempts("huge", "x");
        assert_eq!(ok.unwrap().len(), 10_000);
    }

    #[test]
    fn test_crack_requires_capability() {
        let registry = SchemeRegistry::global();
        let err = BruteForcer::new(registry).crack("vigenere", "x").unwrap_err();
        assert!(matches!(
            err,
            DecodrError::UnsupportedCapability { capability: Capability::Crack, .. }
        ));
        assert!(matches!(
            BruteForcer::new(registry).crack("nope", "x"),
            Err(DecodrError::UnknownScheme(_))
        ));
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let registry = SchemeRegistry::global();
        let sequential = BruteForcer::new(registry).crack("affine", "Ifmmp").unwrap();
        let parallel = BruteForcer::new(registry)
            .parallel(true)
            .crack("affine", "Ifmmp")
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}
