//! ChainedTable: fixed bucket array with chains threaded through a slot arena.

use crate::djb2::{self, BuildDjb2};
use crate::error::{InvariantError, TableError};
use core::hash::{BuildHasher, Hasher};
use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicU64, Ordering};
use slotmap::{DefaultKey, SlotMap};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one table instance; handles carry it so they never resolve
/// against another table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct TableId(u64);

impl TableId {
    fn next() -> Self {
        TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable reference to a live entry. Resolves to `None` once the entry's
/// count has dropped to zero, even if its slot is later reused, and when
/// passed a table other than the one that issued it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle {
    table: TableId,
    key: DefaultKey,
}

impl Handle {
    fn entry<'a, S>(&self, table: &'a ChainedTable<S>) -> Option<&'a Entry> {
        if self.table != table.id {
            return None;
        }
        table.slots.get(self.key)
    }

    pub fn value<'a, S>(&self, table: &'a ChainedTable<S>) -> Option<&'a str> {
        self.entry(table).map(|e| e.value.as_str())
    }

    pub fn count<S>(&self, table: &ChainedTable<S>) -> Option<usize> {
        self.entry(table).map(|e| e.count)
    }

    pub fn bucket<S>(&self, table: &ChainedTable<S>) -> Option<usize> {
        self.entry(table).map(|e| e.bucket)
    }
}

#[derive(Debug)]
struct Entry {
    value: String,
    hash: u64,
    bucket: usize,
    count: usize,
    next: Option<DefaultKey>,
}

/// Result of walking a value's chain.
struct Probe {
    bucket: usize,
    hash: u64,
    // Predecessor of `found`, or the chain tail when nothing matched.
    prev: Option<DefaultKey>,
    found: Option<DefaultKey>,
}

/// Fixed-capacity string table with separate chaining and per-entry
/// occurrence counts.
///
/// Inserting an equal string twice bumps a counter instead of storing a
/// second copy; deleting decrements it and unlinks the entry at zero. The
/// bucket array never grows, so `load_factor` is informational only.
///
/// Entries live in a `SlotMap`; bucket heads and `next` links are its
/// generational keys, so unlinking never leaves a dangling pointer and a
/// released entry's handle cannot alias a newer one.
#[derive(Debug)]
pub struct ChainedTable<S = BuildDjb2> {
    id: TableId,
    hasher: S,
    capacity: NonZeroUsize,
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Entry>,
    total_insertions: usize,
    unique_keys: usize,
}

impl ChainedTable {
    /// Create a table with `capacity` buckets hashed by djb2.
    ///
    /// Fails with [`TableError::InvalidCapacity`] when `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        Self::with_hasher(capacity, BuildDjb2)
    }
}

/// Iterator over one bucket's chain, head first.
pub struct Chain<'a> {
    table: TableId,
    slots: &'a SlotMap<DefaultKey, Entry>,
    cur: Option<DefaultKey>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (Handle, &'a str, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let e = self
            .slots
            .get(k)
            .expect("chain links only point at live entries");
        self.cur = e.next;
        let handle = Handle {
            table: self.table,
            key: k,
        };
        Some((handle, e.value.as_str(), e.count))
    }
}

/// Iterator over every live entry: buckets in ascending order, then chain
/// order within a bucket.
pub struct Iter<'a> {
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    chain: Chain<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Handle, &'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.next() {
                return Some(item);
            }
            self.chain.cur = *self.buckets.next()?;
        }
    }
}

impl<S> ChainedTable<S>
where
    S: BuildHasher,
{
    /// Create a table with `capacity` buckets and a caller-chosen hasher.
    ///
    /// The hasher only ever sees the value's bytes through `Hasher::write`.
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(TableError::InvalidCapacity)?;
        Ok(Self {
            id: TableId::next(),
            hasher,
            capacity,
            buckets: vec![None; capacity.get()],
            slots: SlotMap::with_key(),
            total_insertions: 0,
            unique_keys: 0,
        })
    }

    fn make_hash(&self, value: &str) -> u64 {
        let mut h = self.hasher.build_hasher();
        h.write(value.as_bytes());
        h.finish()
    }

    fn probe(&self, value: &str) -> Probe {
        let hash = self.make_hash(value);
        let bucket = djb2::bucket_index(hash, self.capacity);
        let mut prev = None;
        let mut cur = self.buckets[bucket];
        while let Some(k) = cur {
            let e = &self.slots[k];
            if e.hash == hash && e.value == value {
                return Probe {
                    bucket,
                    hash,
                    prev,
                    found: Some(k),
                };
            }
            prev = Some(k);
            cur = e.next;
        }
        Probe {
            bucket,
            hash,
            prev,
            found: None,
        }
    }

    fn handle(&self, key: DefaultKey) -> Handle {
        Handle {
            table: self.id,
            key,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of insert calls ever made, duplicates included.
    pub fn total_insertions(&self) -> usize {
        self.total_insertions
    }

    /// Number of distinct values currently live.
    pub fn unique_keys(&self) -> usize {
        self.unique_keys
    }

    /// `total_insertions / capacity`. Never triggers a resize.
    pub fn load_factor(&self) -> f64 {
        self.total_insertions as f64 / self.capacity.get() as f64
    }

    pub fn len(&self) -> usize {
        self.unique_keys
    }

    pub fn is_empty(&self) -> bool {
        self.unique_keys == 0
    }

    /// Bucket `value` hashes to, whether or not it is present.
    pub fn bucket_of(&self, value: &str) -> usize {
        djb2::bucket_index(self.make_hash(value), self.capacity)
    }

    /// Record one occurrence of `value`.
    ///
    /// The first occurrence of a value in its bucket appends a new entry at
    /// the tail of the chain; later ones only bump that entry's count.
    pub fn insert(&mut self, value: &str) -> Handle {
        let probe = self.probe(value);
        self.total_insertions += 1;

        if let Some(k) = probe.found {
            self.slots[k].count += 1;
            return self.handle(k);
        }

        let k = self.slots.insert(Entry {
            value: value.to_owned(),
            hash: probe.hash,
            bucket: probe.bucket,
            count: 1,
            next: None,
        });
        match probe.prev {
            Some(tail) => self.slots[tail].next = Some(k),
            None => self.buckets[probe.bucket] = Some(k),
        }
        self.unique_keys += 1;
        self.handle(k)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.probe(value).found.is_some()
    }

    pub fn find(&self, value: &str) -> Option<Handle> {
        self.probe(value).found.map(|k| self.handle(k))
    }

    /// Live occurrences of `value`; zero when absent.
    pub fn count(&self, value: &str) -> usize {
        self.probe(value)
            .found
            .map(|k| self.slots[k].count)
            .unwrap_or(0)
    }

    /// Remove one occurrence of `value`.
    ///
    /// Returns `false` when the value is absent. When the count reaches
    /// zero the entry is unlinked and released; the rest of its chain stays
    /// in place.
    pub fn delete(&mut self, value: &str) -> bool {
        let probe = self.probe(value);
        let Some(k) = probe.found else {
            return false;
        };

        let entry = &mut self.slots[k];
        debug_assert!(entry.count > 0, "live entry with zero count");
        entry.count -= 1;
        if entry.count > 0 {
            return true;
        }

        let next = entry.next;
        match probe.prev {
            Some(p) => self.slots[p].next = next,
            None => self.buckets[probe.bucket] = next,
        }
        self.slots.remove(k);
        self.unique_keys -= 1;
        true
    }

    /// Chain of bucket `bucket`, head first. Empty when out of range.
    pub fn chain(&self, bucket: usize) -> Chain<'_> {
        Chain {
            table: self.id,
            slots: &self.slots,
            cur: self.buckets.get(bucket).copied().flatten(),
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Chain {
                table: self.id,
                slots: &self.slots,
                cur: None,
            },
        }
    }

    /// Audit the whole structure by walking every chain.
    ///
    /// Checks that each entry sits in the bucket its hash selects, that no
    /// chain holds a value twice, that counts are positive, and that the
    /// counters agree with what is reachable. Entries present in the arena
    /// but not on any chain are reported as leaked.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut reachable = 0usize;
        let mut occurrences = 0usize;

        for (i, &head) in self.buckets.iter().enumerate() {
            let mut seen: Vec<&str> = Vec::new();
            let mut cur = head;
            while let Some(k) = cur {
                let e = self.slots.get(k).ok_or_else(|| {
                    InvariantError::new(format!("bucket {i} links to a released entry"))
                })?;
                if e.bucket != i {
                    return Err(InvariantError::new(format!(
                        "{:?} recorded in bucket {} but chained from bucket {i}",
                        e.value, e.bucket
                    )));
                }
                if djb2::bucket_index(e.hash, self.capacity) != i {
                    return Err(InvariantError::new(format!(
                        "{:?} hashes outside bucket {i}",
                        e.value
                    )));
                }
                if e.count == 0 {
                    return Err(InvariantError::new(format!(
                        "{:?} is linked with a zero count",
                        e.value
                    )));
                }
                if seen.contains(&e.value.as_str()) {
                    return Err(InvariantError::new(format!(
                        "{:?} appears twice in bucket {i}",
                        e.value
                    )));
                }
                seen.push(&e.value);
                reachable += 1;
                occurrences += e.count;
                if reachable > self.slots.len() {
                    return Err(InvariantError::new(format!("cycle in bucket {i}")));
                }
                cur = e.next;
            }
        }

        if reachable != self.unique_keys {
            return Err(InvariantError::new(format!(
                "unique_keys is {} but {reachable} entries are reachable",
                self.unique_keys
            )));
        }
        if self.slots.len() != reachable {
            return Err(InvariantError::new(format!(
                "{} entries allocated but only {reachable} reachable",
                self.slots.len()
            )));
        }
        if occurrences > self.total_insertions {
            return Err(InvariantError::new(format!(
                "{occurrences} live occurrences exceed {} insertions",
                self.total_insertions
            )));
        }
        Ok(())
    }
}

impl<T, S> Extend<T> for ChainedTable<S>
where
    T: AsRef<str>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v.as_ref());
        }
    }
}
