use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::parser::DocumentParser;

pub type Token = String;
pub type DocId = String;

/// Id recorded for field content that shows up before any `DOCID` line.
///
/// Such postings are noise, but they are kept so the build never drops or
/// rejects input.
pub const UNSET_DOC_ID: &str = "-1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexStats {
    pub num_terms: usize,
    /// Real documents only; [`UNSET_DOC_ID`] is not counted.
    pub num_docs: usize,
    pub num_postings: usize,
    /// Terms with a posting under [`UNSET_DOC_ID`].
    pub unset_terms: usize,
}

/// Token -> set of documents containing it. Only ever grows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: HashMap<Token, HashSet<DocId>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, token: &str, doc_id: &str) {
        match self.postings.get_mut(token) {
            Some(docs) => {
                if !docs.contains(doc_id) {
                    docs.insert(doc_id.to_string());
                }
            }
            None => {
                self.postings.insert(token.to_string(), HashSet::from([doc_id.to_string()]));
            }
        }
    }

    /// Borrowed posting set, `None` for tokens never indexed.
    pub fn postings(&self, token: &str) -> Option<&HashSet<DocId>> {
        self.postings.get(token)
    }

    /// Owned posting set; unknown tokens give an empty set.
    pub fn lookup(&self, token: &str) -> HashSet<DocId> {
        self.postings(token).cloned().unwrap_or_default()
    }

    /// Union another shard into this one.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (token, docs) in other.postings {
            self.postings.entry(token).or_default().extend(docs);
        }
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    /// Distinct document ids across all postings, leaving out [`UNSET_DOC_ID`].
    pub fn num_docs(&self) -> usize {
        self.postings
            .values()
            .flatten()
            .filter(|doc| doc.as_str() != UNSET_DOC_ID)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn unset_terms(&self) -> usize {
        self.postings.values().filter(|docs| docs.contains(UNSET_DOC_ID)).count()
    }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_terms: self.num_terms(),
            num_docs: self.num_docs(),
            num_postings: self.postings.values().map(HashSet::len).sum(),
            unset_terms: self.unset_terms(),
        }
    }
}

/// Build an index from the lines of several document files.
///
/// Every file is parsed with fresh parser state, so a file that starts with
/// field content files it under [`UNSET_DOC_ID`] rather than the previous
/// file's last document.
pub fn build_index<F, L>(lines_per_file: F) -> InvertedIndex
where
    F: IntoIterator,
    F::Item: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut index = InvertedIndex::new();
    for lines in lines_per_file {
        let mut parser = DocumentParser::new(&mut index);
        for line in lines {
            parser.feed_line(line.as_ref());
        }
        parser.finish();
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(ids: &[&str]) -> HashSet<DocId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lookup_known_and_unknown() {
        let mut index = InvertedIndex::new();
        index.insert("cat", "D1");
        index.insert("dog", "D1");
        index.insert("dog", "D2");
        index.insert("bird", "D2");
        assert_eq!(index.lookup("dog"), set(&["D1", "D2"]));
        assert_eq!(index.lookup("cat"), set(&["D1"]));
        assert!(index.lookup("fish").is_empty());
        assert!(index.postings("fish").is_none());
    }

    #[test]
    fn insert_is_idempotent() {
        let mut index = InvertedIndex::new();
        index.insert("a", "1");
        let before = index.clone();
        index.insert("a", "1");
        assert_eq!(index, before);
        assert_eq!(index.stats(), IndexStats { num_terms: 1, num_docs: 1, num_postings: 1, unset_terms: 0 });
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let pairs = [("a", "1"), ("b", "2"), ("a", "2"), ("c", "1"), ("a", "1")];
        let mut forward = InvertedIndex::new();
        for (t, d) in pairs {
            forward.insert(t, d);
        }
        let mut backward = InvertedIndex::new();
        for (t, d) in pairs.iter().rev() {
            backward.insert(t, d);
        }
        assert_eq!(forward, backward);
    }

    proptest! {
        #[test]
        fn any_insertion_order_builds_the_same_index(
            (pairs, shuffled) in proptest::collection::vec(("[a-d]{0,2}", "D[0-4]"), 0..40)
                .prop_flat_map(|pairs| (Just(pairs.clone()), Just(pairs).prop_shuffle()))
        ) {
            let mut first = InvertedIndex::new();
            for (t, d) in &pairs {
                first.insert(t, d);
            }
            let mut second = InvertedIndex::new();
            for (t, d) in &shuffled {
                second.insert(t, d);
            }
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn sentinel_is_not_a_document() {
        let mut index = InvertedIndex::new();
        index.insert("early", UNSET_DOC_ID);
        index.insert("early", "A");
        index.insert("late", "A");
        let stats = index.stats();
        assert_eq!(stats.num_docs, 1);
        assert_eq!(stats.unset_terms, 1);
        assert_eq!(stats.num_postings, 3);
        assert_eq!(index.postings("late").map(HashSet::len), Some(1));
    }

    #[test]
    fn merge_matches_single_build() {
        let mut left = InvertedIndex::new();
        left.insert("a", "1");
        left.insert("b", "1");
        let mut right = InvertedIndex::new();
        right.insert("a", "2");
        right.insert("c", "2");

        let mut whole = InvertedIndex::new();
        for (t, d) in [("a", "1"), ("b", "1"), ("a", "2"), ("c", "2")] {
            whole.insert(t, d);
        }

        let mut merged = left.clone();
        merged.merge(right.clone());
        assert_eq!(merged, whole);
        right.merge(left);
        assert_eq!(right, whole);
        assert_eq!(whole.num_docs(), 2);
        assert_eq!(whole.num_terms(), 3);
    }

    #[test]
    fn build_resets_doc_id_per_file() {
        let first = vec!["<DOCID>A</DOCID>", "<TEXT>", "alpha", "</TEXT>"];
        let second = vec!["<TEXT>", "beta", "</TEXT>"];
        let index = build_index(vec![first, second]);
        assert_eq!(index.lookup("alpha"), set(&["A"]));
        assert_eq!(index.lookup("beta"), set(&[UNSET_DOC_ID]));
    }
}
