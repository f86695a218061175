use crate::config::{validate_mu, RetrievalConfig, ZeroLengthPolicy};
use crate::error::{Error, Result};
use crate::query::{Query, ScoredDocument};
use crate::reader::IndexReader;
use crate::scorer::DirichletScorer;
use crate::stats::CollectionStats;
use crate::DocId;
use std::collections::{BTreeMap, HashMap};

/// A document sharing at least one term with the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub doc_id: DocId,
    pub docno: String,
    /// True token count from the index, not the sum of `term_freqs`.
    pub length: u64,
    /// Frequencies of the query terms only; absent means 0.
    pub term_freqs: HashMap<String, u32>,
}

pub type CandidateSet = BTreeMap<DocId, Candidate>;

/// Query-likelihood retrieval over an [`IndexReader`].
///
/// Owns its statistics cache, so each model instance is one search session.
pub struct QueryLikelihoodModel<R> {
    stats: CollectionStats<R>,
    scorer: DirichletScorer,
    zero_length_policy: ZeroLengthPolicy,
}

impl<R: IndexReader> QueryLikelihoodModel<R> {
    pub fn new(reader: R) -> Result<Self> {
        Self::with_config(reader, &RetrievalConfig::default())
    }

    pub fn with_config(reader: R, config: &RetrievalConfig) -> Result<Self> {
        validate_mu(config.mu)?;
        Ok(Self {
            stats: CollectionStats::new(reader, config.verify_collection_frequency)?,
            scorer: DirichletScorer::new(config.mu, config.ignore_unseen_terms),
            zero_length_policy: config.zero_length_policy,
        })
    }

    pub fn stats(&self) -> &CollectionStats<R> { &self.stats }

    pub fn scorer(&self) -> &DirichletScorer { &self.scorer }

    /// Rank documents for `query`, best first, at most `top_n` of them.
    pub fn retrieve(&self, query: &Query, top_n: usize) -> Result<Vec<ScoredDocument>> {
        if query.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }
        let candidates = self.candidates(query)?;
        self.rank_candidates(query, &candidates, top_n)
    }

    /// Merge the postings of every seen query term into per-document frequency maps.
    pub fn candidates(&self, query: &Query) -> Result<CandidateSet> {
        let mut merged: BTreeMap<DocId, HashMap<String, u32>> = BTreeMap::new();
        for term in query.distinct_terms() {
            if self.stats.collection_frequency(term)? == 0 {
                continue;
            }
            for p in self.stats.postings(term)?.iter().filter(|p| p.tf > 0) {
                merged.entry(p.doc_id).or_default().insert(term.to_string(), p.tf);
            }
        }

        let reader = self.stats.reader();
        let mut candidates = CandidateSet::new();
        for (doc_id, term_freqs) in merged {
            let length = reader.document_length(doc_id)?;
            if length == 0 {
                match self.zero_length_policy {
                    ZeroLengthPolicy::Fail => return Err(Error::ZeroLengthDocument { doc_id }),
                    ZeroLengthPolicy::Exclude => {
                        self.stats.record_zero_length();
                        tracing::warn!(doc_id, "document in posting list has zero length; excluded");
                        continue;
                    }
                }
            }
            let docno = reader.document_external_id(doc_id)?;
            candidates.insert(doc_id, Candidate { doc_id, docno, length, term_freqs });
        }
        tracing::debug!(terms = query.terms.len(), candidates = candidates.len(), "collected candidates");
        Ok(candidates)
    }

    /// Score every candidate with the smoothed likelihood and keep the best `top_n`.
    pub fn rank_candidates(&self, query: &Query, candidates: &CandidateSet, top_n: usize) -> Result<Vec<ScoredDocument>> {
        let total = self.stats.total_length();
        let mut results = Vec::with_capacity(candidates.len());
        for c in candidates.values() {
            let score = self.scorer.score(&query.terms, c.doc_id, &c.term_freqs, c.length, total, |t| {
                self.stats.collection_frequency(t)
            })?;
            results.push(ScoredDocument { doc_id: c.doc_id, docno: c.docno.clone(), score });
        }
        Ok(rank(results, top_n))
    }
}

/// Sort by score descending, ties by ascending doc id, then truncate.
pub(crate) fn rank(mut results: Vec<ScoredDocument>, top_n: usize) -> Vec<ScoredDocument> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id)));
    results.truncate(top_n);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryIndex;

    fn cats() -> MemoryIndex {
        let mut idx = MemoryIndex::new();
        let mut d0 = vec!["cat"; 2];
        d0.extend(["x"; 8]);
        idx.add_document("d0", &d0);
        idx.add_document("d1", &["y"; 20]);
        let mut d2 = vec!["cat"];
        d2.extend(["z"; 4]);
        idx.add_document("d2", &d2);
        idx
    }

    #[test]
    fn scores_match_dirichlet_formula() {
        let model = QueryLikelihoodModel::new(cats()).unwrap();
        let hits = model.retrieve(&Query::parse("cat"), 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].docno, "d0");
        let l1 = 10.0 / 2010.0;
        let l2 = 2000.0 / 2010.0;
        let expected = l1 * (2.0 / 10.0) + l2 * (3.0 / 35.0);
        assert!((hits[0].score - expected).abs() < 1e-9);
        assert_eq!(hits[1].docno, "d2");
    }

    #[test]
    fn candidates_hold_only_query_terms() {
        let model = QueryLikelihoodModel::new(cats()).unwrap();
        let set = model.candidates(&Query::parse("cat cat unicorn")).unwrap();
        assert_eq!(set.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(set[&0].length, 10);
        assert_eq!(set[&0].term_freqs.len(), 1);
        assert_eq!(set[&0].term_freqs["cat"], 2);
    }

    #[test]
    fn ties_break_by_doc_id() {
        let mut idx = MemoryIndex::new();
        idx.add_document("b", &["cat", "dog"]);
        idx.add_document("a", &["dog", "cat"]);
        let model = QueryLikelihoodModel::new(idx).unwrap();
        let hits = model.retrieve(&Query::parse("cat"), 10).unwrap();
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn truncates_to_top_n() {
        let model = QueryLikelihoodModel::new(cats()).unwrap();
        let hits = model.retrieve(&Query::parse("cat"), 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(model.retrieve(&Query::parse("cat"), 0).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_mu() {
        let config = RetrievalConfig { mu: -3.0, ..RetrievalConfig::default() };
        assert!(matches!(QueryLikelihoodModel::with_config(cats(), &config), Err(Error::InvalidParameter(_))));
    }
}
