use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// What to do with a candidate document whose index length is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroLengthPolicy {
    /// Drop the document from the candidate set and keep going.
    #[default]
    Exclude,
    /// Fail the query with [`Error::ZeroLengthDocument`].
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Dirichlet prior.
    pub mu: f64,
    /// Query terms with collection frequency 0 contribute nothing instead of a zero factor.
    pub ignore_unseen_terms: bool,
    /// Compare the reported collection frequency with the summed posting list.
    pub verify_collection_frequency: bool,
    pub zero_length_policy: ZeroLengthPolicy,
    pub top_n: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            mu: 2000.0,
            ignore_unseen_terms: true,
            verify_collection_frequency: true,
            zero_length_policy: ZeroLengthPolicy::Exclude,
            top_n: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Number of first-pass documents folded into the feedback model.
    pub top_k: usize,
    /// Weight on the original document likelihood; `1 - alpha` goes to the feedback model.
    pub alpha: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { top_k: 10, alpha: 0.5 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub retrieval: RetrievalConfig,
    pub feedback: FeedbackConfig,
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut f = File::open(path)?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        Self::from_json_str(&buf)
    }

    pub fn validate(&self) -> Result<()> {
        validate_mu(self.retrieval.mu)?;
        validate_alpha(self.feedback.alpha)
    }
}

pub(crate) fn validate_mu(mu: f64) -> Result<()> {
    if !mu.is_finite() || mu < 0.0 {
        return Err(Error::InvalidParameter(format!("mu must be finite and >= 0, got {mu}")));
    }
    Ok(())
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidParameter(format!("alpha must be in [0, 1], got {alpha}")));
    }
    Ok(())
}
