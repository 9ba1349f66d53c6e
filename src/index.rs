//! Structural-key index shared by every domain
//!
//! Building is an explicit two-phase lifecycle: rows are pushed into an
//! [`IndexBuilder`], and [`IndexBuilder::finish`] runs the post-processing
//! (deduplication, overlay, permanent exclusion, compound detection) and
//! returns an immutable [`CategoryIndex`]. Nothing is built lazily.

use crate::cache::{CacheStats, LookupCache, Words};
use crate::encoder::{self, LetterBuckets, StructuralKey};
use crate::entry::{CategoryTag, Entry};
use crate::error::QueryError;
use crate::labels::Overlay;
use crate::query::QueryFilters;
use crate::service::Domain;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::fmt;

/// Minimum length of each half of a glued compound
pub const MIN_COMPOUND_PART: usize = 3;

/// A domain record stored in a [`CategoryIndex`]
pub trait Record: Clone + fmt::Debug + Send + Sync + Serialize + 'static {
    const DOMAIN: Domain;
    /// Categories removed after the overlay has been applied
    const EXCLUDED: &'static [CategoryTag];

    /// Domain-specific query filters
    type Filter: Default + Clone + fmt::Debug + Send + Sync;

    fn entry(&self) -> &Entry;

    fn entry_mut(&mut self) -> &mut Entry;

    /// Whether the record passes the domain filters
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Ranking score; higher sorts first
    fn popularity(&self) -> u64;

    #[inline]
    fn text(&self) -> &str {
        &self.entry().text
    }

    #[inline]
    fn key(&self) -> StructuralKey {
        self.entry().key
    }
}

/// Counters collected while loading and building one index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Data rows seen (comments and blank lines excluded)
    pub rows_read: usize,
    /// Rows that could not be parsed
    pub malformed: usize,
    /// Rows whose text has no vowel
    pub no_vowels: usize,
    /// Rows rejected by domain rules (characters, multi-word, frequency)
    pub filtered: usize,
    pub duplicates: usize,
    /// Entries that received an external label
    pub labeled: usize,
    /// Entries removed by the permanent category exclusion
    pub excluded: usize,
    pub indexed: usize,
    pub buckets: usize,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries in {} buckets ({} rows, {} malformed, {} without vowels, \
             {} filtered, {} duplicates, {} labeled, {} excluded)",
            self.indexed,
            self.buckets,
            self.rows_read,
            self.malformed,
            self.no_vowels,
            self.filtered,
            self.duplicates,
            self.labeled,
            self.excluded
        )
    }
}

/// Accumulates records before the index is finalized
#[derive(Debug)]
pub struct IndexBuilder<R> {
    letter_buckets: LetterBuckets,
    cache_capacity: usize,
    records: Vec<R>,
    report: BuildReport,
}

impl<R: Record> IndexBuilder<R> {
    pub fn new(letter_buckets: LetterBuckets, cache_capacity: usize) -> Self {
        Self {
            letter_buckets,
            cache_capacity,
            records: Vec::new(),
            report: BuildReport::default(),
        }
    }

    /// Append a record; order of insertion is preserved within buckets
    pub fn insert(&mut self, record: R) {
        self.records.push(record);
    }

    /// Counters for loaders to fill in
    pub fn report_mut(&mut self) -> &mut BuildReport {
        &mut self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finalize the index.
    ///
    /// Steps run strictly in this order: group by key and drop duplicate
    /// texts (first wins), merge the overlay, drop excluded categories,
    /// then flag compounds against the deduplicated vocabulary.
    pub fn finish(self, overlay: &Overlay) -> CategoryIndex<R> {
        let mut report = self.report;

        let mut index: FxHashMap<StructuralKey, Vec<R>> = FxHashMap::default();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        for record in self.records {
            if !seen.insert(record.text().to_string()) {
                report.duplicates += 1;
                continue;
            }
            index.entry(record.key()).or_default().push(record);
        }

        let vocabulary: FxHashSet<String> = seen.iter().map(|t| encoder::clean(t)).collect();

        for records in index.values_mut() {
            for record in records.iter_mut() {
                if overlay.apply(record.entry_mut()) {
                    report.labeled += 1;
                }
            }
            let before = records.len();
            records.retain(|r| !R::EXCLUDED.contains(&r.entry().category));
            report.excluded += before - records.len();

            for record in records.iter_mut() {
                let entry = record.entry_mut();
                entry.compound |= is_compound_in(&entry.text, &vocabulary);
            }
        }
        index.retain(|_, records| !records.is_empty());

        report.indexed = index.values().map(Vec::len).sum();
        report.buckets = index.len();
        log::info!("Built {} index: {report}", R::DOMAIN);

        CategoryIndex {
            letter_buckets: self.letter_buckets,
            index,
            vocabulary,
            cache: LookupCache::new(self.cache_capacity),
            report,
        }
    }
}

/// Whether `word` has an internal separator or splits into two vocabulary
/// words of at least [`MIN_COMPOUND_PART`] letters each.
///
/// This is an approximation: coincidental splits like "carpet" into
/// "car" + "pet" are also reported.
pub fn is_compound_in(word: &str, vocabulary: &FxHashSet<String>) -> bool {
    if word.trim().chars().any(encoder::is_separator) {
        return true;
    }
    let letters = encoder::clean(word);
    let chars = letters.chars().count();
    if chars < 2 * MIN_COMPOUND_PART {
        return false;
    }
    letters
        .char_indices()
        .skip(MIN_COMPOUND_PART)
        .take(chars - 2 * MIN_COMPOUND_PART + 1)
        .any(|(split, _)| {
            let (head, tail) = letters.split_at(split);
            vocabulary.contains(head) && vocabulary.contains(tail)
        })
}

/// Immutable index of one domain
#[derive(Debug)]
pub struct CategoryIndex<R> {
    letter_buckets: LetterBuckets,
    index: FxHashMap<StructuralKey, Vec<R>>,
    vocabulary: FxHashSet<String>,
    cache: LookupCache,
    report: BuildReport,
}

impl<R: Record> CategoryIndex<R> {
    /// Records stored under `key`, in insertion order
    pub fn bucket(&self, key: &StructuralKey) -> &[R] {
        self.index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact lookup; an unknown key yields an empty list
    pub fn lookup(&self, length: usize, first_letter: char, v1: usize, v2: usize) -> Words {
        let key = StructuralKey::new(length, first_letter, v1, v2);
        self.cache.get_or_insert_with(key, || {
            self.bucket(&key)
                .iter()
                .map(|r| r.text().to_string())
                .collect()
        })
    }

    /// Records under every letter of `bucket`, filtered.
    ///
    /// Letters are visited alphabetically and texts deduplicated, so J/U
    /// words show up once even though those letters sit in two buckets.
    pub fn query_category(
        &self,
        length: usize,
        bucket: u8,
        v1: usize,
        v2: usize,
        filters: &QueryFilters<R::Filter>,
    ) -> Result<Vec<R>, QueryError> {
        if !LetterBuckets::is_valid_bucket(bucket) {
            return Err(QueryError::InvalidBucket(bucket));
        }
        let plan = filters.compile()?;

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut candidates: Vec<&R> = self
            .letter_buckets
            .letters(bucket)
            .flat_map(|letter| self.bucket(&StructuralKey::new(length, letter, v1, v2)))
            .filter(|r| seen.insert(r.text()))
            .collect();

        plan.apply(&self.letter_buckets, &mut candidates);
        Ok(candidates.into_iter().cloned().collect())
    }

    /// Records under a single first letter, filtered
    pub fn query_letter(
        &self,
        length: usize,
        first_letter: char,
        v1: usize,
        v2: usize,
        filters: &QueryFilters<R::Filter>,
    ) -> Result<Vec<R>, QueryError> {
        let plan = filters.compile()?;
        let key = StructuralKey::new(length, first_letter, v1, v2);
        let mut candidates: Vec<&R> = self.bucket(&key).iter().collect();
        plan.apply(&self.letter_buckets, &mut candidates);
        Ok(candidates.into_iter().cloned().collect())
    }

    /// Compound test against this index's vocabulary
    pub fn is_compound(&self, word: &str) -> bool {
        is_compound_in(word, &self.vocabulary)
    }

    /// Whether `word` was seen in the dataset (before exclusion)
    pub fn in_vocabulary(&self, word: &str) -> bool {
        self.vocabulary.contains(&encoder::clean(word))
    }

    pub fn letter_buckets(&self) -> &LetterBuckets {
        &self.letter_buckets
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// All records, grouped by key in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.index.values().flatten()
    }

    pub fn keys(&self) -> impl Iterator<Item = &StructuralKey> {
        self.index.keys()
    }

    pub fn len(&self) -> usize {
        self.report.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.report.indexed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{LabelOrigin, ThingLabel};
    use crate::labels::{FlagTable, LabelTable};
    use proptest::prelude::*;

    #[derive(Debug, Clone, Serialize)]
    struct Word {
        #[serde(flatten)]
        entry: Entry,
    }

    impl Record for Word {
        const DOMAIN: Domain = Domain::Nouns;
        const EXCLUDED: &'static [CategoryTag] = &[CategoryTag::Person, CategoryTag::Abstract];
        type Filter = ();

        fn entry(&self) -> &Entry {
            &self.entry
        }

        fn entry_mut(&mut self) -> &mut Entry {
            &mut self.entry
        }

        fn matches(&self, _: &()) -> bool {
            true
        }

        fn popularity(&self) -> u64 {
            0
        }
    }

    fn word(text: &str) -> Word {
        Word {
            entry: Entry::new(text).unwrap(),
        }
    }

    fn build(words: &[&str], overlay: &Overlay) -> CategoryIndex<Word> {
        let mut builder = IndexBuilder::new(LetterBuckets::default(), 16);
        for w in words {
            builder.insert(word(w));
        }
        builder.finish(overlay)
    }

    fn texts(records: &[Word]) -> Vec<&str> {
        records.iter().map(|r| r.text()).collect()
    }

    #[test]
    fn test_lookup_apple() {
        let index = build(&["apple", "ample", "apple", "angle"], &Overlay::default());
        assert_eq!(&*index.lookup(5, 'a', 1, 5), &["apple", "ample", "angle"]);
        assert_eq!(&*index.lookup(5, 'A', 1, 5), &["apple", "ample", "angle"]);
        assert!(index.lookup(9, 'z', 1, 2).is_empty());
        assert_eq!(index.report().duplicates, 1);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_lookup_is_cached() {
        let index = build(&["apple"], &Overlay::default());
        index.lookup(5, 'a', 1, 5);
        index.lookup(5, 'a', 1, 5);
        let stats = index.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_query_category_includes_apple() {
        let index = build(&["apple", "chair", "table"], &Overlay::default());
        let found = index
            .query_category(5, 1, 1, 5, &QueryFilters::default())
            .unwrap();
        assert_eq!(texts(&found), vec!["apple"]);
    }

    #[test]
    fn test_invalid_bucket_is_error() {
        let index = build(&["apple"], &Overlay::default());
        for bucket in [0, 4, 255] {
            assert!(matches!(
                index.query_category(5, bucket, 1, 5, &QueryFilters::default()),
                Err(QueryError::InvalidBucket(b)) if b == bucket
            ));
        }
    }

    #[test]
    fn test_overlapping_letters_deduplicated() {
        // J sits in buckets 2 and 3; C only in 2, B only in 3
        let index = build(&["jumbo", "cable", "bugle", "judge"], &Overlay::default());
        let two = index
            .query_category(5, 2, 2, 5, &QueryFilters::default())
            .unwrap();
        let three = index
            .query_category(5, 3, 2, 5, &QueryFilters::default())
            .unwrap();
        assert_eq!(texts(&two), vec!["cable", "jumbo", "judge"]);
        assert_eq!(texts(&three), vec!["bugle", "jumbo", "judge"]);
    }

    #[test]
    fn test_positional_filter() {
        let index = build(&["chairs", "chaise", "cheese"], &Overlay::default());
        let filters = QueryFilters {
            positional: Some("5S".into()),
            ..QueryFilters::default()
        };
        let found = index.query_category(6, 2, 3, 4, &filters).unwrap();
        assert_eq!(texts(&found), vec!["chaise", "cheese"]);

        let bad = QueryFilters {
            positional: Some("five-s".into()),
            ..QueryFilters::default()
        };
        assert!(matches!(
            index.query_category(6, 2, 3, 4, &bad),
            Err(QueryError::MalformedConstraint(_))
        ));
    }

    #[test]
    fn test_overlay_runs_before_exclusion() {
        let overlay = Overlay {
            labels: LabelTable::from_rows([
                (
                    "freedom".to_string(),
                    ThingLabel {
                        category: Some(CategoryTag::Abstract),
                        ..ThingLabel::default()
                    },
                ),
                (
                    "basket".to_string(),
                    ThingLabel {
                        origin: Some(LabelOrigin::ManMade),
                        ..ThingLabel::default()
                    },
                ),
            ]),
            holdable: FlagTable::from_words(["basket"]),
            ..Overlay::default()
        };
        let index = build(&["freedom", "basket", "garden"], &overlay);
        assert!(index.iter().all(|r| r.text() != "freedom"));
        assert_eq!(index.report().excluded, 1);
        assert_eq!(index.report().labeled, 2);

        let basket = index.iter().find(|r| r.text() == "basket").unwrap();
        assert!(basket.entry.manmade && basket.entry.holdable);
        assert!(index.in_vocabulary("freedom"));
    }

    #[test]
    fn test_glued_compounds() {
        let index = build(
            &["snow", "ball", "snowball", "carpet", "ice cream", "pumpkin"],
            &Overlay::default(),
        );
        assert!(index.is_compound("snowball"));
        assert!(index.is_compound("ice cream"));
        assert!(!index.is_compound("pumpkin"));
        assert!(!index.is_compound("carpet"));

        let snowball = index.iter().find(|r| r.text() == "snowball").unwrap();
        assert!(snowball.entry.compound);

        let filters = QueryFilters {
            compound: Some(false),
            ..QueryFilters::default()
        };
        let found = index.query_category(8, 2, 3, 6, &filters).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_short_parts_not_compound() {
        let vocab: FxHashSet<String> = ["ab", "cdef", "abc", "def"]
            .into_iter()
            .map(String::from)
            .collect();
        assert!(is_compound_in("abcdef", &vocab));
        assert!(!is_compound_in("abcdefg", &vocab));
        assert!(!is_compound_in("abcde", &vocab));
    }

    proptest! {
        #[test]
        fn prop_keys_and_buckets_are_well_formed(words in prop::collection::vec("[a-z]{1,9}", 1..60)) {
            let refs: Vec<&str> = words.iter().map(String::as_str).collect();
            let mut builder = IndexBuilder::new(LetterBuckets::default(), 0);
            for w in &refs {
                if let Some(entry) = Entry::new(*w) {
                    builder.insert(Word { entry });
                }
            }
            let index = builder.finish(&Overlay::default());

            for key in index.keys() {
                prop_assert!(key.v2 == 0 || key.v1 < key.v2);
                let records = index.bucket(key);
                let unique: FxHashSet<&str> = records.iter().map(|r| r.text()).collect();
                prop_assert_eq!(unique.len(), records.len());
                prop_assert!(records.iter().all(|r| r.key() == *key));
            }
        }

        #[test]
        fn prop_query_is_deterministic(
            words in prop::collection::vec("[a-z]{3,6}", 1..80),
            bucket in 1u8..=3,
        ) {
            let refs: Vec<&str> = words.iter().map(String::as_str).collect();
            let mut builder = IndexBuilder::new(LetterBuckets::default(), 8);
            for w in &refs {
                if let Some(entry) = Entry::new(*w) {
                    builder.insert(Word { entry });
                }
            }
            let index = builder.finish(&Overlay::default());
            for key in index.keys().copied().collect::<Vec<_>>() {
                let a = index.query_category(key.length, bucket, key.v1, key.v2, &QueryFilters::default()).unwrap();
                let b = index.query_category(key.length, bucket, key.v1, key.v2, &QueryFilters::default()).unwrap();
                prop_assert_eq!(texts(&a), texts(&b));
                let unique: FxHashSet<&str> = a.iter().map(|r| r.text()).collect();
                prop_assert_eq!(unique.len(), a.len());
                let letters = index.letter_buckets();
                prop_assert!(a.iter().all(|r| letters.contains(bucket, r.key().first_letter)));
            }
        }
    }

    #[test]
    fn test_buckets_cover_alphabet() {
        let buckets = LetterBuckets::default();
        let mut covered: Vec<char> = (1..=3).flat_map(|b| buckets.letters(b)).collect();
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered.len(), 26);
        for overlap in ['j', 'u'] {
            assert!(buckets.contains(2, overlap) && buckets.contains(3, overlap));
        }
    }
}
