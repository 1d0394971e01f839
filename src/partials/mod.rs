//! The compressed key segment carried in every node header.
//!
//! Only the first [`MAX_PREFIX_LEN`] bytes of a prefix are stored explicitly. The logical
//! length may be larger, in which case the remaining bytes are recovered on demand from any
//! leaf below the node, since every leaf under a node shares that node's full prefix.

use std::cmp::min;
use std::fmt;

/// Number of prefix bytes stored inline in a node header.
pub const MAX_PREFIX_LEN: usize = 10;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Partial {
    data: [u8; MAX_PREFIX_LEN],
    len: usize,
}

impl Default for Partial {
    /// A freshly allocated header: zero-filled, with the logical length at its "not yet set"
    /// sentinel of `MAX_PREFIX_LEN`.
    fn default() -> Self {
        Self {
            data: [0; MAX_PREFIX_LEN],
            len: MAX_PREFIX_LEN,
        }
    }
}

impl Partial {
    pub fn empty() -> Self {
        Self {
            data: [0; MAX_PREFIX_LEN],
            len: 0,
        }
    }

    /// The `len` key bytes starting at `depth`. Bytes past `MAX_PREFIX_LEN` are not stored.
    pub fn from_key(key: &[u8], depth: usize, len: usize) -> Self {
        let mut data = [0; MAX_PREFIX_LEN];
        let stored = min(len, MAX_PREFIX_LEN);
        data[..stored].copy_from_slice(&key[depth..depth + stored]);
        Self { data, len }
    }

    /// Logical length, which may exceed what is stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of explicitly stored bytes.
    #[inline(always)]
    pub fn stored_len(&self) -> usize {
        min(self.len, MAX_PREFIX_LEN)
    }

    /// True when part of the prefix has to be recovered from a leaf.
    #[inline(always)]
    pub fn is_truncated(&self) -> bool {
        self.len > MAX_PREFIX_LEN
    }

    pub fn stored(&self) -> &[u8] {
        &self.data[..self.stored_len()]
    }

    #[inline(always)]
    pub fn at(&self, pos: usize) -> u8 {
        assert!(pos < self.stored_len());
        self.data[pos]
    }

    /// Number of stored bytes that agree with `key` from `depth` on. Stops at the end of the
    /// stored bytes or of the key, whichever comes first.
    pub fn check(&self, key: &[u8], depth: usize) -> usize {
        let rest = key.get(depth..).unwrap_or_default();
        self.stored()
            .iter()
            .zip(rest)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// The first `len` logical bytes. `len` must not exceed the current length.
    pub fn head(&self, len: usize) -> Self {
        debug_assert!(len <= self.len);
        let mut data = [0; MAX_PREFIX_LEN];
        let stored = min(len, MAX_PREFIX_LEN);
        data[..stored].copy_from_slice(&self.data[..stored]);
        Self { data, len }
    }

    /// Everything after the first `skip` bytes. Only valid for prefixes that are fully stored;
    /// truncated ones must be rebuilt from a leaf with [`Partial::from_key`].
    pub fn tail(&self, skip: usize) -> Self {
        debug_assert!(!self.is_truncated());
        debug_assert!(skip <= self.len);
        let mut data = [0; MAX_PREFIX_LEN];
        data[..self.len - skip].copy_from_slice(&self.data[skip..self.len]);
        Self {
            data,
            len: self.len - skip,
        }
    }

    /// Prefix for a node absorbing its only child: our bytes, the byte that selected the child,
    /// then the child's bytes. Whatever does not fit is dropped from the stored bytes but still
    /// counted in the length.
    pub fn joined(&self, key: u8, child: &Partial) -> Self {
        let mut data = self.data;
        let mut filled = self.len;
        if filled < MAX_PREFIX_LEN {
            data[filled] = key;
            filled += 1;
        }
        if filled < MAX_PREFIX_LEN {
            let sub = min(child.stored_len(), MAX_PREFIX_LEN - filled);
            data[filled..filled + sub].copy_from_slice(&child.data[..sub]);
        }
        Self {
            data,
            len: self.len + 1 + child.len,
        }
    }
}

impl AsRef<[u8]> for Partial {
    fn as_ref(&self) -> &[u8] {
        self.stored()
    }
}

impl fmt::Debug for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partial")
            .field("stored", &self.stored())
            .field("len", &self.len)
            .finish()
    }
}
