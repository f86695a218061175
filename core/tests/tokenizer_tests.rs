use relfeed_core::tokenizer::{analyze, split_query};
use relfeed_core::Query;

#[test]
fn it_normalizes_and_stems() {
    let words = analyze("Running RUN! The ﬁsh menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // NFKC folds the "ﬁ" ligature
    assert!(words.contains(&"fish".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn query_parse_is_plain_whitespace() {
    let q = Query::parse("The  Cats\tran");
    assert_eq!(q.terms, vec!["The", "Cats", "ran"]);
    assert!(Query::parse("").is_empty());
    assert_eq!(split_query("a\nb"), vec!["a", "b"]);
}
