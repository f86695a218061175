use crate::DocId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: u32, // raw term frequency, >= 1
}

/// Read-only view of an inverted index.
///
/// Implementations are assumed immutable for the lifetime of a search session:
/// statistics fetched through this trait are cached and never invalidated.
pub trait IndexReader {
    /// Total occurrences of `term` across the collection; 0 if unseen.
    fn collection_frequency(&self, term: &str) -> Result<u64>;
    /// One posting per document containing `term`.
    fn posting_list(&self, term: &str) -> Result<Vec<Posting>>;
    /// Token count of a document.
    fn document_length(&self, doc_id: DocId) -> Result<u64>;
    /// External identifier (docno) of a document.
    fn document_external_id(&self, doc_id: DocId) -> Result<String>;
    /// Sum of all document lengths.
    fn total_collection_length(&self) -> Result<u64>;
}

impl<T: IndexReader + ?Sized> IndexReader for &T {
    fn collection_frequency(&self, term: &str) -> Result<u64> { (**self).collection_frequency(term) }
    fn posting_list(&self, term: &str) -> Result<Vec<Posting>> { (**self).posting_list(term) }
    fn document_length(&self, doc_id: DocId) -> Result<u64> { (**self).document_length(doc_id) }
    fn document_external_id(&self, doc_id: DocId) -> Result<String> { (**self).document_external_id(doc_id) }
    fn total_collection_length(&self) -> Result<u64> { (**self).total_collection_length() }
}

impl<T: IndexReader + ?Sized> IndexReader for Arc<T> {
    fn collection_frequency(&self, term: &str) -> Result<u64> { (**self).collection_frequency(term) }
    fn posting_list(&self, term: &str) -> Result<Vec<Posting>> { (**self).posting_list(term) }
    fn document_length(&self, doc_id: DocId) -> Result<u64> { (**self).document_length(doc_id) }
    fn document_external_id(&self, doc_id: DocId) -> Result<String> { (**self).document_external_id(doc_id) }
    fn total_collection_length(&self) -> Result<u64> { (**self).total_collection_length() }
}
