//! Structural encoding of words
//!
//! Every indexed entry is partitioned by its [`StructuralKey`]: letter
//! count, first letter, and the 1-based positions of its first two vowels.
//! Positions are always counted over the *cleaned* form of a word, i.e.
//! with space and hyphen separators removed, so that `char_at` and the
//! vowel positions agree on what "position 5" means.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letters counted as vowels (case-insensitive)
pub const VOWELS: &[u8] = b"aeiouy";

/// Characters treated as word separators and ignored for positions
pub const SEPARATORS: &[char] = &[' ', '-'];

/// Number of first-letter buckets
pub const BUCKET_COUNT: u8 = 3;

#[inline]
pub fn is_vowel(c: char) -> bool {
    c.is_ascii() && VOWELS.contains(&(c.to_ascii_lowercase() as u8))
}

#[inline]
pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Lowercased word with separators removed
pub fn clean(word: &str) -> String {
    word.chars()
        .filter(|c| !is_separator(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// 1-based vowel positions in `word`, ignoring separators
pub fn vowel_positions(word: &str) -> impl Iterator<Item = usize> + '_ {
    word.chars()
        .filter(|c| !is_separator(*c))
        .enumerate()
        .filter(|(_, c)| is_vowel(*c))
        .map(|(i, _)| i + 1)
}

/// Number of vowels in `word`
pub fn vowel_count(word: &str) -> usize {
    vowel_positions(word).count()
}

/// Character at 1-based `pos`, ignoring separators.
///
/// Returns `None` when `pos` is 0 or past the end, so positional filters
/// simply fail for short words.
pub fn char_at(word: &str, pos: usize) -> Option<char> {
    if pos == 0 {
        return None;
    }
    word.chars()
        .filter(|c| !is_separator(*c))
        .nth(pos - 1)
        .map(|c| c.to_ascii_lowercase())
}

/// First letter, ignoring separators
pub fn first_letter(word: &str) -> Option<char> {
    char_at(word, 1)
}

/// Last letter, ignoring separators
pub fn last_letter(word: &str) -> Option<char> {
    word.chars()
        .rev()
        .find(|c| !is_separator(*c))
        .map(|c| c.to_ascii_lowercase())
}

/// Primary partition of the index: (length, first letter, v1, v2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructuralKey {
    /// Letter count, separators excluded
    pub length: usize,
    /// Lowercase first letter
    pub first_letter: char,
    /// Position of the first vowel (1-based)
    pub v1: usize,
    /// Position of the second vowel, or 0 for single-vowel words
    pub v2: usize,
}

impl StructuralKey {
    pub fn new(length: usize, first_letter: char, v1: usize, v2: usize) -> Self {
        Self {
            length,
            first_letter: first_letter.to_ascii_lowercase(),
            v1,
            v2,
        }
    }

    /// Compute the key for `word`; `None` when it has no vowels.
    pub fn of(word: &str) -> Option<Self> {
        let mut vowels = vowel_positions(word);
        let v1 = vowels.next()?;
        let v2 = vowels.next().unwrap_or(0);
        let length = word.chars().filter(|c| !is_separator(*c)).count();
        let first = first_letter(word)?;
        Some(Self::new(length, first, v1, v2))
    }
}

impl fmt::Display for StructuralKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, '{}', {}, {})",
            self.length, self.first_letter, self.v1, self.v2
        )
    }
}

/// Set of bucket ids a letter belongs to (bit `n` = bucket `n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketSet(u8);

impl BucketSet {
    pub fn contains(self, bucket: u8) -> bool {
        (1..=BUCKET_COUNT).contains(&bucket) && self.0 & (1 << bucket) != 0
    }

    /// Add `bucket`; ids outside `1..=BUCKET_COUNT` are ignored
    pub fn insert(&mut self, bucket: u8) {
        if (1..=BUCKET_COUNT).contains(&bucket) {
            self.0 |= 1 << bucket;
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=BUCKET_COUNT).filter(move |b| self.contains(*b))
    }
}

/// First-letter bucket table.
///
/// Buckets overlap: J and U belong to buckets 2 and 3, so a
/// query for either bucket includes words starting with those letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterBuckets {
    table: [BucketSet; 26],
}

impl LetterBuckets {
    /// Build a table from `(bucket, letters)` pairs
    pub fn from_groups<'a>(groups: impl IntoIterator<Item = (u8, &'a str)>) -> Self {
        let mut table = [BucketSet::default(); 26];
        for (bucket, letters) in groups {
            for c in letters.chars().filter(char::is_ascii_alphabetic) {
                table[(c.to_ascii_lowercase() as u8 - b'a') as usize].insert(bucket);
            }
        }
        Self { table }
    }

    /// Buckets containing `letter` (empty for non-letters)
    pub fn buckets_of(&self, letter: char) -> BucketSet {
        if letter.is_ascii_alphabetic() {
            self.table[(letter.to_ascii_lowercase() as u8 - b'a') as usize]
        } else {
            BucketSet::default()
        }
    }

    pub fn contains(&self, bucket: u8, letter: char) -> bool {
        self.buckets_of(letter).contains(bucket)
    }

    pub fn is_valid_bucket(bucket: u8) -> bool {
        (1..=BUCKET_COUNT).contains(&bucket)
    }

    /// Letters of `bucket` in alphabetical order
    pub fn letters(&self, bucket: u8) -> impl Iterator<Item = char> + '_ {
        (b'a'..=b'z')
            .map(char::from)
            .filter(move |c| self.contains(bucket, *c))
    }
}

impl Default for LetterBuckets {
    fn default() -> Self {
        Self::from_groups([
            (1, "AEIFHKLMNTVWXYZ"),
            (2, "CGOJQSU"),
            (3, "BDPRJU"),
        ])
    }
}
