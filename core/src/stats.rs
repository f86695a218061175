//! Session-scoped cache of collection statistics.
//!
//! Collection frequencies and posting lists are fetched from the reader on first use and kept
//! for the lifetime of the cache. The index is read-only during a session, so entries are
//! never invalidated.

use crate::error::{Error, Result};
use crate::reader::{IndexReader, Posting};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Counters describing cache behavior and data-integrity observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub frequency_fetches: u64,
    pub posting_fetches: u64,
    pub cache_hits: u64,
    /// Terms whose reported collection frequency differed from the summed postings.
    pub frequency_disagreements: u64,
    pub zero_length_documents: u64,
}

#[derive(Default)]
struct CacheInner {
    frequencies: HashMap<String, u64>,
    postings: HashMap<String, Arc<[Posting]>>,
    counters: CacheStats,
}

pub struct CollectionStats<R> {
    reader: R,
    total_length: u64,
    verify: bool,
    inner: Mutex<CacheInner>,
}

impl<R: IndexReader> CollectionStats<R> {
    /// Fails with [`Error::EmptyCollection`] when the reader reports a total length of 0.
    pub fn new(reader: R, verify_collection_frequency: bool) -> Result<Self> {
        let total_length = reader.total_collection_length()?;
        if total_length == 0 {
            return Err(Error::EmptyCollection);
        }
        Ok(Self { reader, total_length, verify: verify_collection_frequency, inner: Mutex::new(CacheInner::default()) })
    }

    pub fn reader(&self) -> &R { &self.reader }

    pub fn total_length(&self) -> u64 { self.total_length }

    pub fn collection_frequency(&self, term: &str) -> Result<u64> {
        let mut inner = self.inner.lock();
        if let Some(&cf) = inner.frequencies.get(term) {
            inner.counters.cache_hits += 1;
            return Ok(cf);
        }
        let cf = self.reader.collection_frequency(term)?;
        inner.counters.frequency_fetches += 1;
        if cf == 0 {
            tracing::info!(term, "term not in collection");
        } else if self.verify {
            let postings = self.postings_locked(&mut inner, term)?;
            let observed: u64 = postings.iter().map(|p| p.tf as u64).sum();
            if observed != cf {
                inner.counters.frequency_disagreements += 1;
                tracing::warn!(term, reported = cf, observed, "collection frequency disagrees with postings");
            }
        }
        inner.frequencies.insert(term.to_string(), cf);
        Ok(cf)
    }

    pub fn postings(&self, term: &str) -> Result<Arc<[Posting]>> {
        let mut inner = self.inner.lock();
        self.postings_locked(&mut inner, term)
    }

    fn postings_locked(&self, inner: &mut CacheInner, term: &str) -> Result<Arc<[Posting]>> {
        if let Some(list) = inner.postings.get(term) {
            let list = Arc::clone(list);
            inner.counters.cache_hits += 1;
            return Ok(list);
        }
        let list: Arc<[Posting]> = self.reader.posting_list(term)?.into();
        inner.counters.posting_fetches += 1;
        if list.is_empty() {
            tracing::warn!(term, "empty posting list");
        }
        inner.postings.insert(term.to_string(), Arc::clone(&list));
        Ok(list)
    }

    pub(crate) fn record_zero_length(&self) {
        self.inner.lock().counters.zero_length_documents += 1;
    }

    pub fn counters(&self) -> CacheStats { self.inner.lock().counters }
}
