//! Post-filters for category queries
//!
//! A [`QueryFilters`] value holds every optional filter as the caller sent
//! it. [`QueryFilters::compile`] validates it up front into a
//! [`FilterPlan`], so a bad constraint string or bucket id is reported
//! before any candidate is looked at. The plan then runs the filters in a
//! fixed order; an absent filter is no constraint.

use crate::constraint::{LetterSet, PositionalConstraint};
use crate::encoder::{self, LetterBuckets};
use crate::entry::{CategoryTag, Entry};
use crate::error::QueryError;
use crate::index::Record;

/// First letters selected by the `mtsfw` toggle
pub const MTSFW: &[char] = &['m', 't', 's', 'f', 'w'];

/// Optional filters of a category query.
///
/// `F` carries the domain-specific part (gender for names, region for
/// places, nothing for nouns).
#[derive(Debug, Clone, Default)]
pub struct QueryFilters<F> {
    /// `<position><letter>`, e.g. `"5S"`
    pub positional: Option<String>,
    /// `true`: more than two vowels; `false`: two or fewer
    pub more_vowels: Option<bool>,
    pub holdable: Option<bool>,
    pub compound: Option<bool>,
    pub common: Option<bool>,
    /// Bucket the last letter must belong to
    pub last_category: Option<u8>,
    /// Letters the word must all contain
    pub must_letters: Option<String>,
    pub rhyme: Option<bool>,
    /// `true`: first letter in M/T/S/F/W; `false`: not
    pub mtsfw: Option<bool>,
    pub manmade: Option<bool>,
    /// Keep only these categories; empty keeps all
    pub categories: Vec<CategoryTag>,
    pub domain: F,
}

impl<F> QueryFilters<F> {
    /// Validate caller input and produce an executable plan
    pub fn compile(&self) -> Result<FilterPlan<'_, F>, QueryError> {
        let positional = self
            .positional
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PositionalConstraint::parse)
            .transpose()?;

        if let Some(bucket) = self.last_category {
            if !LetterBuckets::is_valid_bucket(bucket) {
                return Err(QueryError::InvalidBucket(bucket));
            }
        }

        let must_letters = self
            .must_letters
            .as_deref()
            .map(LetterSet::parse)
            .filter(|set| !set.is_empty());

        Ok(FilterPlan {
            filters: self,
            positional,
            must_letters,
        })
    }
}

/// Validated filters, ready to run
#[derive(Debug)]
pub struct FilterPlan<'a, F> {
    filters: &'a QueryFilters<F>,
    positional: Option<PositionalConstraint>,
    must_letters: Option<LetterSet>,
}

#[inline]
fn keep(wanted: Option<bool>, actual: bool) -> bool {
    wanted.is_none_or(|w| w == actual)
}

impl<F> FilterPlan<'_, F> {
    /// Apply every filter, in order, to `candidates`
    pub fn apply<R>(&self, buckets: &LetterBuckets, candidates: &mut Vec<&R>)
    where
        R: Record<Filter = F>,
    {
        candidates.retain(|r| {
            self.matches_entry(buckets, r.entry()) && r.matches(&self.filters.domain)
        });
    }

    /// Whether a single entry passes the shared filters. Checks run in a
    /// fixed order and stop at the first failure.
    pub fn matches_entry(&self, buckets: &LetterBuckets, entry: &Entry) -> bool {
        let f = self.filters;
        let text = entry.text.as_str();
        self.positional.is_none_or(|c| c.matches(text))
            && f.more_vowels
                .is_none_or(|more| (encoder::vowel_count(text) > 2) == more)
            && keep(f.holdable, entry.holdable)
            && keep(f.compound, entry.compound)
            && keep(f.common, entry.common)
            && f.last_category.is_none_or(|bucket| {
                encoder::last_letter(text).is_some_and(|c| buckets.contains(bucket, c))
            })
            && self.must_letters.is_none_or(|set| set.matches(text))
            && keep(f.rhyme, entry.rhyme)
            && f.mtsfw.is_none_or(|want| {
                encoder::first_letter(text).is_some_and(|c| MTSFW.contains(&c)) == want
            })
            && keep(f.manmade, entry.manmade)
            && (f.categories.is_empty() || f.categories.contains(&entry.category))
    }
}
