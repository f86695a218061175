use crate::tokenizer::{analyze, split_query};
use crate::DocId;
use serde::{Deserialize, Serialize};

/// Bag of query terms. Order is kept for display only; scoring treats it as a multiset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub terms: Vec<String>,
}

impl Query {
    /// Whitespace tokenization with terms kept verbatim.
    pub fn parse(text: &str) -> Self {
        Self { terms: split_query(text) }
    }

    /// Run the same analysis as [`crate::MemoryIndex::add_text`].
    pub fn analyzed(text: &str) -> Self {
        Self { terms: analyze(text) }
    }

    pub fn from_terms<S: Into<String>, I: IntoIterator<Item = S>>(terms: I) -> Self {
        Self { terms: terms.into_iter().map(Into::into).collect() }
    }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Distinct terms in first-seen order.
    pub fn distinct_terms(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.terms.iter().map(String::as_str).filter(|t| seen.insert(*t)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub docno: String,
    pub score: f64,
}
