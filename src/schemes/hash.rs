use crate::error::SchemeError;
use crate::scheme::{Capability, Params, Scheme};
use digest::Digest;
use sha2::{Sha256, Sha512};
use sha3::Sha3_256;

/// Digest algorithm options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
    Sha3_256,
    Blake3,
}

impl std::str::FromStr for HashAlgorithm {
    type Err = SchemeError;
    fn from_str(s: &str) -> Result<Self, SchemeError> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "sha3" | "sha3-256" => Ok(Self::Sha3_256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(SchemeError::bad_param(
                "algo",
                format!("unsupported hash algorithm: {}", s),
            )),
        }
    }
}

fn hex_digest<D: Digest>(data: &[u8]) -> String {
    hex::encode(D::digest(data))
}

/// Hex digest of the UTF-8 text. One-way: encode only.
pub struct Hash;

impl Scheme for Hash {
    fn apply(&self, capability: Capability, text: &str, params: &Params) -> Result<String, SchemeError> {
        if capability != Capability::Encode {
            return Err(SchemeError::NotSupported(capability));
        }
        let algorithm: HashAlgorithm = match params.get("algo") {
            Some(name) => name.parse()?,
            None => HashAlgorithm::default(),
        };
        let data = text.as_bytes();
        Ok(match algorithm {
            HashAlgorithm::Sha256 => hex_digest::<Sha256>(data),
            HashAlgorithm::Sha512 => hex_digest::<Sha512>(data),
            HashAlgorithm::Sha3_256 => hex_digest::<Sha3_256>(data),
            HashAlgorithm::Blake3 => blake3::hash(data).to_hex().to_string(),
        })
    }
}
