use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

/// Fixed-size digest of a link's canonical string form
///
/// Used as the deduplication key instead of the raw string. Two links with
/// the same canonical string always share a fingerprint; SHA-256 collisions
/// are accepted as a theoretical risk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkFingerprint([u8; 32]);

impl LinkFingerprint {
    /// Fingerprints a canonical link string
    pub fn of(canonical: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Fingerprints an already canonicalized URL
    pub fn of_url(url: &Url) -> Self {
        Self::of(url.as_str())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the fingerprint as lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for LinkFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for LinkFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkFingerprint({})", &self.to_hex()[..12])
    }
}
