use crate::reader::{IndexReader, Posting};
use crate::tokenizer::analyze;
use crate::{DocId, TermId};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub external_id: String,
    pub length: u64,
}

/// In-memory inverted index holding raw term frequencies.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryIndex {
    pub dictionary: HashMap<String, TermId>,
    pub cf: Vec<u64>,
    pub postings: HashMap<TermId, Vec<Posting>>, // postings sorted by doc_id
    pub docs: Vec<DocMeta>,                      // indexed by doc_id
    pub total_length: u64,
}

impl MemoryIndex {
    pub fn new() -> Self { Self::default() }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    /// Add a pre-tokenized document. Ids are assigned in insertion order starting at 0.
    pub fn add_document<S: AsRef<str>>(&mut self, docno: &str, terms: &[S]) -> DocId {
        let doc_id = self.docs.len() as DocId;
        let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
        for term in terms {
            let next = self.dictionary.len() as TermId;
            let tid = *self.dictionary.entry(term.as_ref().to_string()).or_insert(next);
            if self.cf.len() <= tid as usize { self.cf.resize(tid as usize + 1, 0); }
            self.cf[tid as usize] += 1;
            *tf_counts.entry(tid).or_insert(0) += 1;
        }
        for (tid, tf) in tf_counts {
            // doc ids only grow, so pushing keeps each list sorted
            self.postings.entry(tid).or_default().push(Posting { doc_id, tf });
        }
        self.docs.push(DocMeta { external_id: docno.to_string(), length: terms.len() as u64 });
        self.total_length += terms.len() as u64;
        doc_id
    }

    /// Analyze `text` (normalize, drop stopwords, stem) and add it.
    pub fn add_text(&mut self, docno: &str, text: &str) -> DocId {
        let terms = analyze(text);
        self.add_document(docno, &terms)
    }

    fn doc(&self, doc_id: DocId) -> Result<&DocMeta> {
        self.docs.get(doc_id as usize).ok_or_else(|| anyhow!("unknown document id {doc_id}"))
    }
}

impl IndexReader for MemoryIndex {
    fn collection_frequency(&self, term: &str) -> Result<u64> {
        Ok(self.dictionary.get(term).and_then(|&tid| self.cf.get(tid as usize)).copied().unwrap_or(0))
    }

    fn posting_list(&self, term: &str) -> Result<Vec<Posting>> {
        Ok(self
            .dictionary
            .get(term)
            .and_then(|tid| self.postings.get(tid))
            .cloned()
            .unwrap_or_default())
    }

    fn document_length(&self, doc_id: DocId) -> Result<u64> { Ok(self.doc(doc_id)?.length) }

    fn document_external_id(&self, doc_id: DocId) -> Result<String> { Ok(self.doc(doc_id)?.external_id.clone()) }

    fn total_collection_length(&self) -> Result<u64> { Ok(self.total_length) }
}
