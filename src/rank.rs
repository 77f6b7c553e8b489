//! Best-effort identification of opaque input.
//!
//! `detect` classifies the text once, runs every scheme that can be tried
//! without a caller secret (keyless decoders plus crack-capable ciphers),
//! scores each successful output and returns the top of the list.
//!
//! score = printable * printable_ratio(output) + format_prior * prior
//!
//! where `prior` is `consistent_prior` if the classifier label equals the
//! scheme's input format and `inconsistent_prior` otherwise.

use crate::bruteforce::{BruteForcer, DecodeAttempt, DEFAULT_MAX_KEY_SPACE};
use crate::classify::{classify, printable_ratio, Classification};
use crate::dispatch::Dispatcher;
use crate::error::{DecodrError, Result};
use crate::registry::{SchemeDescriptor, SchemeRegistry};
use crate::scheme::{Capability, Key, Params};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named, overridable scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub printable: f64,
    pub format_prior: f64,
    pub consistent_prior: f64,
    pub inconsistent_prior: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            printable: 0.6,
            format_prior: 0.4,
            consistent_prior: 1.0,
            inconsistent_prior: 0.5,
        }
    }
}

impl ScoreWeights {
    /// Weights must keep every score inside [0, 1]
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("printable", self.printable),
            ("format_prior", self.format_prior),
            ("consistent_prior", self.consistent_prior),
            ("inconsistent_prior", self.inconsistent_prior),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(DecodrError::InvalidConfig(format!(
                    "weight {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.consistent_prior > 1.0 || self.inconsistent_prior > 1.0 {
            return Err(DecodrError::InvalidConfig(
                "priors must not exceed 1.0".into(),
            ));
        }
        if self.printable + self.format_prior > 1.0 + 1e-9 {
            return Err(DecodrError::InvalidConfig(format!(
                "printable + format_prior must not exceed 1.0, got {}",
                self.printable + self.format_prior
            )));
        }
        Ok(())
    }

    pub fn score(&self, output: &str, consistent: bool) -> f64 {
        let prior = if consistent {
            self.consistent_prior
        } else {
            self.inconsistent_prior
        };
        let score = self.printable * printable_ratio(output.as_bytes()) + self.format_prior * prior;
        score.clamp(0.0, 1.0)
    }
}

/// Detection settings, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    pub weights: ScoreWeights,
    pub max_key_space: usize,
    pub parallel: bool,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            max_key_space: DEFAULT_MAX_KEY_SPACE,
            parallel: false,
        }
    }
}

impl RankerConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: RankerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }
}

/// One ranked guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    pub result: String,
    pub score: f64,
}

struct Scored {
    score: f64,
    order: usize,
    attempt: DecodeAttempt,
}

pub struct CandidateRanker<'a> {
    dispatcher: Dispatcher<'a>,
    config: RankerConfig,
}

impl<'a> CandidateRanker<'a> {
    pub fn new(registry: &'a SchemeRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry),
            config: RankerConfig::default(),
        }
    }

    pub fn with_config(registry: &'a SchemeRegistry, config: RankerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dispatcher: Dispatcher::new(registry),
            config,
        })
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    fn brute_forcer(&self) -> BruteForcer<'a> {
        BruteForcer::new(self.dispatcher.registry())
            .with_limit(self.config.max_key_space)
            .parallel(self.config.parallel)
    }

    /// Attempts for one trial scheme; an empty list if it is not a trial
    /// scheme or was rejected as a whole.
    fn trials(&self, descriptor: &SchemeDescriptor, text: &str) -> Vec<DecodeAttempt> {
        if descriptor.supports(Capability::Crack) {
            return match self.brute_forcer().attempts(descriptor.id, text) {
                Ok(attempts) => attempts,
                Err(e) => {
                    tracing::warn!(scheme = descriptor.id, error = %e, "skipping scheme");
                    Vec::new()
                }
            };
        }
        if descriptor.keyed {
            return Vec::new();
        }
        let Some(capability) = descriptor.reverse_capability() else {
            return Vec::new();
        };
        let params = Params::new();
        let outcome = match self
            .dispatcher
            .attempt(capability, descriptor.id, text, &params)
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(scheme = descriptor.id, error = %e, "skipping scheme");
                return Vec::new();
            }
        };
        if let Err(e) = &outcome {
            tracing::debug!(scheme = descriptor.id, reason = %e, "decode failed");
        }
        vec![DecodeAttempt {
            scheme_id: descriptor.id,
            capability,
            params,
            key: None,
            outcome,
        }]
    }

    /// Up to `limit` candidates, best first.
    ///
    /// Ties keep registration order, then ascending key. Schemes that fail
    /// simply contribute nothing, so the list may be empty.
    pub fn detect(&self, text: &str, limit: usize) -> Vec<Candidate> {
        let Classification { label, .. } = classify(text);
        let weights = &self.config.weights;

        let mut scored: Vec<Scored> = Vec::new();
        let mut tried = 0usize;
        for (order, descriptor) in self.dispatcher.registry().list().iter().enumerate() {
            let consistent = descriptor.input_format == Some(label);
            for attempt in self.trials(descriptor, text) {
                tried += 1;
                if let Some(output) = attempt.output() {
                    scored.push(Scored {
                        score: weights.score(output, consistent),
                        order,
                        attempt,
                    });
                }
            }
        }

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.order.cmp(&b.order))
                .then_with(|| a.attempt.key.cmp(&b.attempt.key))
        });
        scored.truncate(limit);

        tracing::info!(
            label = %label,
            tried,
            returned = scored.len(),
            "detection finished"
        );

        scored
            .into_iter()
            .filter_map(|s| {
                let scheme = s.attempt.scheme_id.to_string();
                let key = s.attempt.key;
                s.attempt.outcome.ok().map(|result| Candidate {
                    scheme,
                    key,
                    result,
                    score: s.score,
                })
            })
            .collect()
    }
}
