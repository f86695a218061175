//! Dirichlet-smoothed query likelihood.
//!
//! For a document of length `|D|` and prior `mu`:
//!
//! ```text
//! p(t|D) = |D|/(|D|+mu) * tf(t,D)/|D|  +  mu/(|D|+mu) * cf(t)/|C|
//! ```
//!
//! and the query score is the product of `p(t|D)` over query terms.

use crate::error::{Error, Result};
use crate::DocId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TermContribution {
    pub term: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirichletScorer {
    pub mu: f64,
    /// Skip terms with collection frequency 0 rather than multiplying by 0.
    pub ignore_unseen_terms: bool,
}

impl Default for DirichletScorer {
    fn default() -> Self {
        Self { mu: 2000.0, ignore_unseen_terms: true }
    }
}

impl DirichletScorer {
    pub fn new(mu: f64, ignore_unseen_terms: bool) -> Self {
        Self { mu, ignore_unseen_terms }
    }

    /// Smoothed `p(t|D)`. `doc_len` must be non-zero.
    pub fn term_probability(&self, tf: u64, doc_len: u64, cf: u64, collection_len: u64) -> f64 {
        let doc_len = doc_len as f64;
        let adj_len = doc_len + self.mu;
        let doc_weight = doc_len / adj_len;
        let background_weight = self.mu / adj_len;
        doc_weight * (tf as f64 / doc_len) + background_weight * (cf as f64 / collection_len as f64)
    }

    /// Per-term probabilities for one document, in query order.
    ///
    /// Terms skipped by the unseen-term policy do not appear in the output.
    pub fn contributions<F>(
        &self,
        terms: &[String],
        doc_id: DocId,
        term_freqs: &HashMap<String, u32>,
        doc_len: u64,
        collection_len: u64,
        mut collection_frequency: F,
    ) -> Result<Vec<TermContribution>>
    where
        F: FnMut(&str) -> Result<u64>,
    {
        if doc_len == 0 {
            return Err(Error::ZeroLengthDocument { doc_id });
        }
        let mut out = Vec::with_capacity(terms.len());
        for term in terms {
            let cf = collection_frequency(term)?;
            if cf == 0 && self.ignore_unseen_terms {
                continue;
            }
            let tf = term_freqs.get(term).copied().unwrap_or(0) as u64;
            out.push(TermContribution { term: term.clone(), probability: self.term_probability(tf, doc_len, cf, collection_len) });
        }
        Ok(out)
    }

    /// Product of the per-term probabilities, clamped at 0.
    pub fn score<F>(
        &self,
        terms: &[String],
        doc_id: DocId,
        term_freqs: &HashMap<String, u32>,
        doc_len: u64,
        collection_len: u64,
        collection_frequency: F,
    ) -> Result<f64>
    where
        F: FnMut(&str) -> Result<u64>,
    {
        let contributions = self.contributions(terms, doc_id, term_freqs, doc_len, collection_len, collection_frequency)?;
        Ok(product(contributions.iter().map(|c| c.probability)))
    }
}

pub(crate) fn product<I: IntoIterator<Item = f64>>(probabilities: I) -> f64 {
    probabilities.into_iter().fold(1.0, |acc, p| acc * p).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_cf(term: &str) -> Result<u64> {
        Ok(if term == "cat" { 3 } else { 0 })
    }

    fn tf(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(t, f)| (t.to_string(), *f)).collect()
    }

    #[test]
    fn matches_hand_computed_value() {
        let s = DirichletScorer::default();
        let terms = vec!["cat".to_string()];
        let got = s.score(&terms, 1, &tf(&[("cat", 2)]), 10, 35, cat_cf).unwrap();
        let expected = (10.0 / 2010.0) * (2.0 / 10.0) + (2000.0 / 2010.0) * (3.0 / 35.0);
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_term_uses_background() {
        let s = DirichletScorer::default();
        let terms = vec!["cat".to_string()];
        let got = s.score(&terms, 2, &HashMap::new(), 20, 35, cat_cf).unwrap();
        let expected = (2000.0 / 2020.0) * (3.0 / 35.0);
        assert!(got > 0.0);
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn unseen_term_is_skipped() {
        let s = DirichletScorer::default();
        let terms = vec!["cat".to_string(), "unicorn".to_string()];
        let contribs = s.contributions(&terms, 1, &tf(&[("cat", 2)]), 10, 35, cat_cf).unwrap();
        assert_eq!(contribs.len(), 1);
        assert_eq!(contribs[0].term, "cat");
        let only_cat = s.score(&terms[..1], 1, &tf(&[("cat", 2)]), 10, 35, cat_cf).unwrap();
        let both = s.score(&terms, 1, &tf(&[("cat", 2)]), 10, 35, cat_cf).unwrap();
        assert_eq!(only_cat, both);
    }

    #[test]
    fn unseen_term_zeroes_score_when_not_ignored() {
        let s = DirichletScorer::new(2000.0, false);
        let terms = vec!["cat".to_string(), "unicorn".to_string()];
        let score = s.score(&terms, 1, &tf(&[("cat", 2)]), 10, 35, cat_cf).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn zero_length_document_is_an_error() {
        let s = DirichletScorer::default();
        let terms = vec!["cat".to_string()];
        let err = s.score(&terms, 4, &HashMap::new(), 0, 35, cat_cf).unwrap_err();
        assert!(matches!(err, Error::ZeroLengthDocument { doc_id: 4 }));
    }

    #[test]
    fn no_recognized_terms_scores_one() {
        let s = DirichletScorer::default();
        let terms = vec!["unicorn".to_string()];
        assert_eq!(s.score(&terms, 1, &HashMap::new(), 10, 35, cat_cf).unwrap(), 1.0);
    }
}
