//! Common-noun domain
//!
//! Subjects come from a question/answer corpus: keyword rows are always
//! kept, sampled rows only once they recur. Every noun is run through the
//! [`Classifier`]; persons, abstract concepts and places are removed after
//! the label overlay.

use crate::classifier::Classifier;
use crate::config::{Config, NounConfig};
use crate::dataset::{self, NounRow};
use crate::encoder::LetterBuckets;
use crate::entry::{CategoryTag, Entry};
use crate::error::BuildError;
use crate::index::{BuildReport, CategoryIndex, IndexBuilder, Record};
use crate::labels::Overlay;
use crate::service::Domain;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::Path;

pub type NounIndex = CategoryIndex<NounRecord>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NounRecord {
    #[serde(flatten)]
    pub entry: Entry,
    /// Occurrences in the dataset
    pub count: u32,
    pub keyword: bool,
}

impl Record for NounRecord {
    const DOMAIN: Domain = Domain::Nouns;
    const EXCLUDED: &'static [CategoryTag] =
        &[CategoryTag::Person, CategoryTag::Abstract, CategoryTag::Place];
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
        u64::from(self.count)
    }
}

/// Aggregate rows per subject and push the retained ones into a builder.
///
/// Subjects keep the order in which they were first seen.
pub fn builder_from_rows(
    rows: impl IntoIterator<Item = NounRow>,
    settings: &NounConfig,
    classifier: &Classifier,
    letter_buckets: LetterBuckets,
    cache_capacity: usize,
    mut report: BuildReport,
) -> IndexBuilder<NounRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: FxHashMap<String, (u32, bool)> = FxHashMap::default();
    for row in rows {
        let tally = tallies.entry(row.subject).or_insert_with_key(|subject| {
            order.push(subject.clone());
            (0, false)
        });
        tally.0 = tally.0.saturating_add(1);
        tally.1 |= row.keyword;
    }

    let mut builder = IndexBuilder::new(letter_buckets, cache_capacity);
    for subject in order {
        let Some(&(count, keyword)) = tallies.get(&subject) else {
            continue;
        };
        if !keyword && count < settings.min_sample_count {
            report.filtered += 1;
            continue;
        }
        let Some(entry) = Entry::new(subject) else {
            report.no_vowels += 1;
            continue;
        };
        let (category, manmade) = classifier.classify(&entry.text);
        let mut entry = entry.with_category(category, manmade);
        entry.common = count >= settings.common_min_count;
        builder.insert(NounRecord {
            entry,
            count,
            keyword,
        });
    }
    *builder.report_mut() = report;
    builder
}

/// Build the noun index from the file at `path`
pub fn build_from_file(
    path: &Path,
    config: &Config,
    letter_buckets: LetterBuckets,
    classifier: &Classifier,
) -> Result<NounIndex, BuildError> {
    let mut report = BuildReport::default();
    let rows = dataset::read_nouns(path, &mut report).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let overlay = Overlay::load(config, &config.nouns.side);
    let builder = builder_from_rows(
        rows,
        &config.nouns,
        classifier,
        letter_buckets,
        config.cache_capacity,
        report,
    );
    Ok(builder.finish(&overlay))
}

/// Build the noun index if a dataset is configured
pub fn build(
    config: &Config,
    letter_buckets: LetterBuckets,
    classifier: &Classifier,
) -> Result<Option<NounIndex>, BuildError> {
    config
        .dataset(Domain::Nouns)
        .map(|path| build_from_file(&path, config, letter_buckets, classifier))
        .transpose()
}
