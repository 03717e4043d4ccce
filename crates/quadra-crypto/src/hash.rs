//! Blake3 hashing utilities.

use quadra_types::Hash;

/// Hash a sequence of parts under a domain tag.
///
/// Every part is length-prefixed so `["ab", "c"]` and `["a", "bc"]` never collide.
pub fn hash_with_domain(domain: &str, parts: &[&[u8]]) -> Hash {
    let mut hasher = IncrementalHasher::new();
    hasher.update_prefixed(domain.as_bytes());
    for part in parts {
        hasher.update_prefixed(part);
    }
    hasher.finalize()
}

/// Incremental hasher for streaming hash computation
pub struct IncrementalHasher {
    hasher: blake3::Hasher,
}

impl IncrementalHasher {
    pub fn new() -> Self {
        Self {
            hasher: blake3::Hasher::new(),
        }
    }

    /// Feed raw bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Feed bytes preceded by their length as a little-endian u32.
    pub fn update_prefixed(&mut self, data: &[u8]) {
        self.hasher.update(&(data.len() as u32).to_le_bytes());
        self.hasher.update(data);
    }

    pub fn finalize(self) -> Hash {
        Hash::from_bytes(*self.hasher.finalize().as_bytes())
    }
}

impl Default for IncrementalHasher {
    fn default() -> Self {
        Self::new()
    }
}
