//! Ordered song queue with stable, never-reused positions.
//!
//! The queue is optimized for the two operations a shared listening session
//! hammers on: appending songs to the tail and removing songs from arbitrary
//! positions, both O(1). Every append is stamped with a monotonically
//! increasing [`Position`] that is never reassigned, so a removal request is
//! addressed by `(position, song)` and can be retried or resubmitted freely:
//! a pair that no longer matches a live entry is a no-op, not an error.

use std::collections::HashMap;
use std::fmt;

mod chain;

use chain::{Chain, Slot};

/// Position of an append event in the queue's history.
///
/// Assigned from a per-queue monotonic counter. Removal frees the underlying
/// storage but never the position: resubmitting a removal for a gone position
/// cannot touch whatever was appended since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u64);

impl Position {
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Position {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// FIFO queue of songs with batch append, idempotent batch removal, and
/// ordered enumeration.
///
/// Internally a doubly linked chain plus a position index mapping each
/// live position to its chain slot. The two are updated together: a song is
/// registered in the index the moment it is linked and unregistered the
/// moment it is unlinked, so `index.len() == chain.len()` always holds.
#[derive(Debug)]
pub struct Queue<T> {
    chain: Chain<T>,
    index: HashMap<Position, Slot>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            chain: Chain::default(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.len() == 0
    }

    /// Append one song to the tail, returning its assigned position. O(1).
    /// Accepts any song, including one already queued elsewhere.
    pub fn append(&mut self, song: T) -> Position {
        let (position, slot) = self.chain.push_back(song);
        self.index.insert(position, slot);
        debug_assert_eq!(self.index.len(), self.chain.len());
        position
    }

    /// Append each song in input order. An empty batch is a no-op.
    pub fn enqueue_many(&mut self, songs: impl IntoIterator<Item = T>) {
        for song in songs {
            self.append(song);
        }
    }

    /// Look up the song currently at `position`, if any.
    pub fn get(&self, position: Position) -> Option<&T> {
        let slot = *self.index.get(&position)?;
        Some(&self.chain.node(slot).song)
    }

    /// Iterate `(position, song)` pairs from oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.chain.iter())
    }
}

impl<T: PartialEq> Queue<T> {
    /// Remove the song at `position` if it is still there *and* is the song
    /// the caller thinks it is. O(1).
    ///
    /// Returns whether anything was removed. An absent position or a song
    /// mismatch leaves the queue untouched: stale removal requests must not
    /// delete whatever lives at that address now.
    pub fn remove(&mut self, position: Position, song: &T) -> bool {
        match self.index.get(&position) {
            Some(&slot) if self.chain.node(slot).song == *song => {
                self.index.remove(&position);
                self.chain.unlink(slot);
                debug_assert_eq!(self.index.len(), self.chain.len());
                true
            }
            _ => false,
        }
    }

    /// Apply a batch of removal requests, returning how many actually
    /// removed a song.
    ///
    /// Each pair is checked independently against the live queue, never
    /// against other pairs in the batch, so the outcome does not depend on
    /// iteration order and the whole batch is idempotent: submitting it
    /// twice, or padded with already-removed pairs, ends in the same state.
    pub fn dequeue_many(&mut self, pairs: impl IntoIterator<Item = (Position, T)>) -> usize {
        pairs
            .into_iter()
            .filter(|(position, song)| self.remove(*position, song))
            .count()
    }
}

impl<T: Clone> Queue<T> {
    /// Owned oldest-first copy of the queue contents.
    pub fn snapshot(&self) -> Vec<(Position, T)> {
        self.iter().map(|(p, song)| (p, song.clone())).collect()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, songs: I) {
        self.enqueue_many(songs);
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(songs: I) -> Self {
        let mut queue = Self::new();
        queue.enqueue_many(songs);
        queue
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = (Position, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T>(chain::Iter<'a, T>);

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Position, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}
