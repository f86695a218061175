//! Pseudo-relevance feedback.
//!
//! A query runs in two phases. FEEDBACK takes the top `k` documents of a first-pass
//! query-likelihood ranking, concatenates their query-term frequencies into one pseudo-document
//! and smooths it against the collection. RESCORE then ranks every candidate by
//!
//! ```text
//! score(D) = prod_t ( alpha * p(t|D) + (1 - alpha) * p(t|F) )
//! ```
//!
//! where `p(t|F)` is the feedback probability (0 for terms outside the feedback model).

use crate::config::{validate_alpha, SearchConfig};
use crate::error::Result;
use crate::query::{Query, ScoredDocument};
use crate::reader::IndexReader;
use crate::retrieval::{rank, CandidateSet, QueryLikelihoodModel};
use crate::scorer::{product, DirichletScorer};
use crate::stats::CollectionStats;
use std::collections::HashMap;

/// Term distribution estimated from the feedback documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackModel {
    pub probabilities: HashMap<String, f64>,
    /// Sum of the true lengths of the feedback documents.
    pub length: u64,
    /// Number of feedback documents that contributed.
    pub documents: usize,
}

impl FeedbackModel {
    pub fn probability(&self, term: &str) -> f64 {
        self.probabilities.get(term).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool { self.probabilities.is_empty() }

    fn build<R: IndexReader>(
        feedback_docs: &[ScoredDocument],
        candidates: &CandidateSet,
        stats: &CollectionStats<R>,
        scorer: &DirichletScorer,
    ) -> Result<Self> {
        let mut aggregate: HashMap<String, u64> = HashMap::new();
        let mut model = FeedbackModel::default();
        for doc in feedback_docs {
            let Some(candidate) = candidates.get(&doc.doc_id) else {
                tracing::warn!(doc_id = doc.doc_id, "feedback document missing from candidate set; skipped");
                continue;
            };
            for (term, &tf) in &candidate.term_freqs {
                *aggregate.entry(term.clone()).or_insert(0) += tf as u64;
            }
            model.length += candidate.length;
            model.documents += 1;
        }
        if model.length == 0 {
            return Ok(model);
        }

        let total = stats.total_length();
        for (term, tf) in aggregate {
            let cf = stats.collection_frequency(&term)?;
            if cf == 0 {
                continue;
            }
            let p = scorer.term_probability(tf, model.length, cf, total);
            model.probabilities.insert(term, p);
        }
        Ok(model)
    }
}

/// Query likelihood with a feedback model interpolated into every term probability.
pub struct PseudoFeedbackModel<R> {
    base: QueryLikelihoodModel<R>,
    config: SearchConfig,
}

impl<R: IndexReader> PseudoFeedbackModel<R> {
    pub fn new(reader: R) -> Result<Self> {
        Self::with_config(reader, SearchConfig::default())
    }

    pub fn with_config(reader: R, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let base = QueryLikelihoodModel::with_config(reader, &config.retrieval)?;
        Ok(Self { base, config })
    }

    pub fn base(&self) -> &QueryLikelihoodModel<R> { &self.base }

    pub fn config(&self) -> &SearchConfig { &self.config }

    /// First-pass ranking without feedback.
    pub fn retrieve(&self, query: &Query, top_n: usize) -> Result<Vec<ScoredDocument>> {
        self.base.retrieve(query, top_n)
    }

    /// Feedback retrieval with the configured `top_n`, `top_k` and `alpha`.
    pub fn search(&self, query: &Query) -> Result<Vec<ScoredDocument>> {
        let SearchConfig { retrieval, feedback } = &self.config;
        self.retrieve_with_feedback(query, retrieval.top_n, feedback.top_k, feedback.alpha)
    }

    /// Run only the FEEDBACK phase and return its distribution.
    pub fn feedback_model(&self, query: &Query, top_k: usize) -> Result<FeedbackModel> {
        if query.is_empty() {
            return Ok(FeedbackModel::default());
        }
        let candidates = self.base.candidates(query)?;
        self.feedback_phase(query, &candidates, top_k)
    }

    pub fn retrieve_with_feedback(
        &self,
        query: &Query,
        top_n: usize,
        top_k: usize,
        alpha: f64,
    ) -> Result<Vec<ScoredDocument>> {
        validate_alpha(alpha)?;
        if query.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }
        let candidates = self.base.candidates(query)?;
        let feedback = self.feedback_phase(query, &candidates, top_k)?;
        self.rescore(query, &candidates, &feedback, top_n, alpha)
    }

    fn feedback_phase(&self, query: &Query, candidates: &CandidateSet, top_k: usize) -> Result<FeedbackModel> {
        let feedback_docs = self.base.rank_candidates(query, candidates, top_k)?;
        let model = FeedbackModel::build(&feedback_docs, candidates, self.base.stats(), self.base.scorer())?;
        tracing::debug!(
            documents = model.documents,
            length = model.length,
            terms = model.probabilities.len(),
            "built feedback model"
        );
        Ok(model)
    }

    fn rescore(
        &self,
        query: &Query,
        candidates: &CandidateSet,
        feedback: &FeedbackModel,
        top_n: usize,
        alpha: f64,
    ) -> Result<Vec<ScoredDocument>> {
        let stats = self.base.stats();
        let total = stats.total_length();
        let mut results = Vec::with_capacity(candidates.len());
        for c in candidates.values() {
            let contributions = self.base.scorer().contributions(
                &query.terms,
                c.doc_id,
                &c.term_freqs,
                c.length,
                total,
                |t| stats.collection_frequency(t),
            )?;
            let score = product(
                contributions
                    .iter()
                    .map(|tc| alpha * tc.probability + (1.0 - alpha) * feedback.probability(&tc.term)),
            );
            results.push(ScoredDocument { doc_id: c.doc_id, docno: c.docno.clone(), score });
        }
        Ok(rank(results, top_n))
    }
}
