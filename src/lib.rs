//! chained-table: a fixed-capacity, separately chained string table that
//! counts occurrences.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a word-frequency style multiset over strings with a bucket
//!   array that never grows, where every operation walks exactly one chain.
//! - Layers:
//!   - `djb2`: stateless leaf hashing (`hash`, `bucket_index`) plus a
//!     `BuildHasher` so the table can also be driven by a custom hasher.
//!   - `ChainedTable<S>`: bucket heads and per-bucket singly linked chains;
//!     insert/contains/delete and the table-owned counters.
//!   - `report`: read-only ranking (`ranked_entries`, `top_n`) and the
//!     plain-text listing, built from a snapshot of the chains.
//!
//! Constraints
//! - Single-threaded; no internal locking. Share a table by wrapping the
//!   whole thing in one exclusive lock.
//! - Capacity is fixed at construction; the load factor is reported but
//!   never acted on.
//! - Equal values never occupy two entries: a repeat insert bumps the
//!   existing entry's count, and a delete that brings it to zero unlinks
//!   and releases that entry.
//!
//! Storage
//! - Entries live in a `slotmap::SlotMap`. Bucket heads and `next` links
//!   are generational keys into it, so unlinking is a key rewrite and
//!   releasing the table drops every entry exactly once.
//! - Each entry caches its full hash and bucket index; chain scans compare
//!   the cached hash before the string.
//!
//! Ordering
//! - New values are appended at their chain's tail, and iteration walks
//!   buckets in ascending order. Rankings are stable over that order.
//!
//! Overflow semantics
//! - Occurrence counts are `usize`; exceeding `usize::MAX` insertions of
//!   one value is not supported.

mod chained_table;
#[cfg(test)]
mod chained_table_proptest;
pub mod djb2;
mod error;
mod report;

// Public surface
pub use chained_table::{Chain, ChainedTable, Handle, Iter};
pub use djb2::BuildDjb2;
pub use error::{InvariantError, TableError};
pub use report::Ranked;
