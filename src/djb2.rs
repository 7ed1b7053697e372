//! djb2 string hashing and bucket selection.

use core::hash::{BuildHasher, Hasher};
use core::num::NonZeroUsize;

/// Starting value of the djb2 accumulator.
pub const DJB2_SEED: usize = 5381;

/// djb2 over raw bytes: `h = h * 33 + c`, wrapping on the native word.
#[inline]
pub fn hash(bytes: &[u8]) -> usize {
    let mut h = Djb2Hasher::default();
    h.write(bytes);
    h.0
}

/// Bucket a hash value lands in for a table of `capacity` buckets.
#[inline]
pub fn bucket_index(hash: u64, capacity: NonZeroUsize) -> usize {
    (hash % capacity.get() as u64) as usize
}

/// Streaming djb2 state. Only `write` feeds the accumulator, so feeding the
/// bytes of a string directly reproduces [`hash`] exactly.
#[derive(Clone, Copy, Debug)]
pub struct Djb2Hasher(usize);

impl Default for Djb2Hasher {
    fn default() -> Self {
        Djb2Hasher(DJB2_SEED)
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &c in bytes {
            self.0 = (self.0 << 5).wrapping_add(self.0).wrapping_add(c as usize);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0 as u64
    }
}

/// Stateless builder for [`Djb2Hasher`]; the default hasher of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildDjb2;

impl BuildHasher for BuildDjb2 {
    type Hasher = Djb2Hasher;

    #[inline]
    fn build_hasher(&self) -> Djb2Hasher {
        Djb2Hasher::default()
    }
}
