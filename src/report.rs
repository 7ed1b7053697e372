//! Frequency ranking and plain-text listings over a `ChainedTable`.

use crate::chained_table::ChainedTable;
use core::fmt;
use core::hash::BuildHasher;

/// One row of a ranking: a value and its live occurrence count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ranked<'a> {
    pub value: &'a str,
    pub count: usize,
}

impl fmt::Display for Ranked<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.count, self.value)
    }
}

impl<S> ChainedTable<S>
where
    S: BuildHasher,
{
    /// Every live entry, most frequent first.
    ///
    /// Entries are snapshotted in traversal order (bucket ascending, then
    /// chain order) and stably sorted by descending count, so equal counts
    /// keep their traversal order. The result has exactly `unique_keys`
    /// rows.
    pub fn ranked_entries(&self) -> Vec<Ranked<'_>> {
        let mut rows = Vec::with_capacity(self.unique_keys());
        rows.extend(self.iter().map(|(_, value, count)| Ranked { value, count }));
        debug_assert_eq!(rows.len(), self.unique_keys());
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows
    }

    /// The first `n` rows of [`ranked_entries`](Self::ranked_entries).
    pub fn top_n(&self, n: usize) -> Vec<Ranked<'_>> {
        let mut rows = self.ranked_entries();
        rows.truncate(n);
        rows
    }
}

/// Bucket-by-bucket dump in the `printTable` layout: a header and blank
/// line, then one `idx count value` line per live entry.
impl<S> fmt::Display for ChainedTable<S>
where
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "idx {:>8} count\tval\n", ' ')?;
        for (h, value, count) in self.iter() {
            let idx = h.bucket(self).unwrap_or_default();
            writeln!(f, "{idx:>3} {count:>10}\t\t{value}")?;
        }
        Ok(())
    }
}
