//! Fingerprints of serializable values.
//!
//! A fingerprint is a truncated SHA-256 of the value's JSON serialization. Two
//! resolutions of the same input produce the same fingerprint, which makes it a
//! cheap way to compare results across runs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::FINGERPRINT_LEN;

pub type HashError = serde_json::Error;

/// A 20-character lowercase hexadecimal digest, e.g. `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl std::fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn fingerprint(&self) -> Result<Fingerprint, HashError> {
    let serialized = serde_json::to_string(self)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let full = format!("{:x}", hasher.finalize());
    Ok(Fingerprint(full[..FINGERPRINT_LEN].to_string()))
  }
}
