//! Decodr - encoding, classical cipher and hash toolkit
//!
//! Every transform is a named scheme in a fixed [`SchemeRegistry`] and
//! exposes a subset of five capabilities: encode, decode, encrypt, decrypt
//! and crack. On top of the registry sit:
//!
//! - **Dispatcher**: capability-checked routing of a request to a scheme
//! - **Classifier**: structural guess of the wire format of a string
//! - **BruteForcer**: exhaustive key search for small key spaces
//! - **CandidateRanker**: runs every keyless decoder and cracker over an
//!   opaque string and ranks the outputs
//!
//! ## Example
//!
//! ```
//! use decodr::Params;
//!
//! let shift = Params::new().with("shift", 3);
//! let ct = decodr::encrypt("caesar", "Hello", &shift).unwrap();
//! assert_eq!(ct, "Khoor");
//!
//! let guesses = decodr::detect("SGVsbG8gV29ybGQ=", 3);
//! assert_eq!(guesses[0].scheme, "base64");
//! assert_eq!(guesses[0].result, "Hello World");
//! ```

pub mod api;
pub mod bruteforce;
pub mod classify;
pub mod cli;
pub mod dispatch;
pub mod error;
pub mod rank;
pub mod registry;
pub mod scheme;
pub mod schemes;

pub use api::{
    classify, crack, decode, decrypt, detect, encode, encrypt, DEFAULT_DETECT_LIMIT,
};
pub use bruteforce::{BruteForcer, CrackResult, DecodeAttempt};
pub use classify::{Classification, FormatLabel};
pub use dispatch::Dispatcher;
pub use error::{DecodrError, Result, SchemeError};
pub use rank::{Candidate, CandidateRanker, RankerConfig, ScoreWeights};
pub use registry::{SchemeDescriptor, SchemeRegistry};
pub use scheme::{Capability, CapabilitySet, Key, KeySpace, Params, Scheme};
