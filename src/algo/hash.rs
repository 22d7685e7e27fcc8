//! Deterministic hashing for identifiers
//!
//! `std::hash` output is randomized per process, so identifiers derived from
//! user keys go through blake3 instead. The same key yields the same
//! [`StableId`](crate::id::StableId) in every process, which lets callers
//! persist identifiers between snapshots taken at different times.

/// Builder-style deterministic hasher backed by blake3.
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Feed raw bytes.
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        self.inner.update(data);
        self
    }

    /// Feed a string, length-prefixed so `("ab", "c")` and `("a", "bc")` differ.
    #[inline]
    pub fn update_str(self, s: &str) -> Self {
        self.update_usize(s.len()).update(s.as_bytes())
    }

    #[inline]
    pub fn update_u64(self, v: u64) -> Self {
        self.update(&v.to_le_bytes())
    }

    /// Feed a `usize`, widened to u64 so output does not depend on pointer width.
    #[inline]
    pub fn update_usize(self, v: usize) -> Self {
        self.update_u64(v as u64)
    }

    /// First 8 bytes of the blake3 digest, little-endian.
    #[inline]
    pub fn finish(self) -> u64 {
        let hash = self.inner.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}
