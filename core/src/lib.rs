//! Query-likelihood retrieval with Dirichlet smoothing and pseudo-relevance feedback.
//!
//! The index itself is external: anything implementing [`IndexReader`] can be searched.
//! [`MemoryIndex`] is an in-memory reader useful for tests and small collections.

pub mod config;
pub mod error;
pub mod feedback;
pub mod index;
pub mod query;
pub mod reader;
pub mod retrieval;
pub mod scorer;
pub mod stats;
pub mod tokenizer;

pub use config::{FeedbackConfig, RetrievalConfig, SearchConfig, ZeroLengthPolicy};
pub use error::{Error, Result};
pub use feedback::{FeedbackModel, PseudoFeedbackModel};
pub use index::{DocMeta, MemoryIndex};
pub use query::{Query, ScoredDocument};
pub use reader::{IndexReader, Posting};
pub use retrieval::{Candidate, CandidateSet, QueryLikelihoodModel};
pub use scorer::{DirichletScorer, TermContribution};
pub use stats::{CacheStats, CollectionStats};

pub type TermId = u32;
pub type DocId = u32;
