//! Convenience entry points over the built-in registry.

use crate::bruteforce::CrackResult;
use crate::classify::Classification;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::rank::{Candidate, CandidateRanker};
use crate::registry::SchemeRegistry;
use crate::scheme::Params;

/// Number of candidates `detect` returns when the caller has no preference
pub const DEFAULT_DETECT_LIMIT: usize = 5;

fn dispatcher() -> Dispatcher<'static> {
    Dispatcher::new(SchemeRegistry::global())
}

pub fn encode(scheme: &str, text: &str, params: &Params) -> Result<String> {
    dispatcher().encode(scheme, text, params)
}

pub fn decode(scheme: &str, text: &str, params: &Params) -> Result<String> {
    dispatcher().decode(scheme, text, params)
}

pub fn encrypt(scheme: &str, text: &str, params: &Params) -> Result<String> {
    dispatcher().encrypt(scheme, text, params)
}

pub fn decrypt(scheme: &str, text: &str, params: &Params) -> Result<String> {
    dispatcher().decrypt(scheme, text, params)
}

pub fn crack(scheme: &str, ciphertext: &str) -> Result<Vec<CrackResult>> {
    dispatcher().crack(scheme, ciphertext)
}

/// Ranked guesses with the default scoring configuration
pub fn detect(text: &str, limit: usize) -> Vec<Candidate> {
    CandidateRanker::new(SchemeRegistry::global()).detect(text, limit)
}

pub fn classify(text: &str) -> Classification {
    crate::classify::classify(text)
}
