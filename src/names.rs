//! First-name domain

use crate::config::{Config, NameConfig};
use crate::dataset::{self, NameRow};
use crate::encoder::LetterBuckets;
use crate::entry::{CategoryTag, Entry};
use crate::error::BuildError;
use crate::index::{BuildReport, CategoryIndex, IndexBuilder, Record};
use crate::labels::{NicknameTable, Overlay, load_optional};
use crate::service::Domain;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub type NameIndex = CategoryIndex<NameRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
    #[serde(rename = "u")]
    Unisex,
}

impl Gender {
    /// Dataset code; anything but `m`/`f` is unisex
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "m" => Gender::Male,
            "f" => Gender::Female,
            _ => Gender::Unisex,
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "u" | "unisex" => Ok(Gender::Unisex),
            _ => Err(s.to_string()),
        }
    }
}

/// Nickname status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NicknameFilter {
    /// Has at least one nickname
    Nickname,
    /// Has two or more nicknames
    Multiple,
    /// Has no nickname entry
    None,
}

impl FromStr for NicknameFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nickname" => Ok(NicknameFilter::Nickname),
            "multiple" => Ok(NicknameFilter::Multiple),
            "none" => Ok(NicknameFilter::None),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    pub gender: Option<Gender>,
    /// Upper-case two-letter code
    pub origin: Option<String>,
    pub nickname: Option<NicknameFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameRecord {
    #[serde(flatten)]
    pub entry: Entry,
    pub gender: Gender,
    pub origin: Option<String>,
    /// 0 = unranked
    pub rank_us: u32,
    /// 0 = unranked
    pub rank_world: u32,
    pub has_nickname: bool,
    pub nick_count: usize,
}

impl NameRecord {
    /// Best non-zero rank across both tables
    pub fn best_rank(&self) -> Option<u32> {
        [self.rank_us, self.rank_world]
            .into_iter()
            .filter(|&r| r > 0)
            .min()
    }
}

impl Record for NameRecord {
    const DOMAIN: Domain = Domain::Names;
    const EXCLUDED: &'static [CategoryTag] = &[];
    type Filter = NameFilter;

    fn entry(&self) -> &Entry {
        &self.entry
    }

    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }

    fn matches(&self, filter: &NameFilter) -> bool {
        if filter.gender.is_some_and(|g| g != self.gender) {
            return false;
        }
        if let Some(origin) = &filter.origin {
            if self.origin.as_deref() != Some(origin.as_str()) {
                return false;
            }
        }
        match filter.nickname {
            Some(NicknameFilter::Nickname) => self.has_nickname,
            Some(NicknameFilter::Multiple) => self.nick_count >= 2,
            Some(NicknameFilter::None) => !self.has_nickname,
            None => true,
        }
    }

    fn popularity(&self) -> u64 {
        self.best_rank()
            .map_or(0, |rank| u64::from(u32::MAX - rank) + 1)
    }
}

/// Names are single words of letters only
fn acceptable_name(name: &str) -> bool {
    name.chars().all(char::is_alphabetic)
}

/// Turn raw rows into a builder, applying the name rules
pub fn builder_from_rows(
    rows: impl IntoIterator<Item = NameRow>,
    settings: &NameConfig,
    nicknames: &NicknameTable,
    letter_buckets: LetterBuckets,
    cache_capacity: usize,
    mut report: BuildReport,
) -> IndexBuilder<NameRecord> {
    let ranked = |rank: u32| (1..=settings.common_max_rank).contains(&rank);

    let mut builder = IndexBuilder::new(letter_buckets, cache_capacity);
    for row in rows {
        if !acceptable_name(&row.name) {
            report.filtered += 1;
            continue;
        }
        let Some(mut entry) = Entry::new(row.name) else {
            report.no_vowels += 1;
            continue;
        };
        entry.common = ranked(row.rank_us) || ranked(row.rank_world);

        let origin = row.origin.trim().to_ascii_uppercase();
        let has_nickname = nicknames.has_nickname(&entry.text);
        let nick_count = nicknames.nickname_count(&entry.text);
        builder.insert(NameRecord {
            entry,
            gender: Gender::from_code(&row.gender),
            origin: (origin.len() == 2 && origin.chars().all(|c| c.is_ascii_alphabetic()))
                .then_some(origin),
            rank_us: row.rank_us,
            rank_world: row.rank_world,
            has_nickname,
            nick_count,
        });
    }
    *builder.report_mut() = report;
    builder
}

pub fn build_from_file(
    path: &Path,
    config: &Config,
    letter_buckets: LetterBuckets,
) -> Result<NameIndex, BuildError> {
    let mut report = BuildReport::default();
    let rows = dataset::read_names(path, &mut report).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let nicknames = load_optional(
        config,
        config.names.nicknames.as_deref(),
        "nickname",
        NicknameTable::load,
    );
    let overlay = Overlay::load(config, &config.names.side);
    let builder = builder_from_rows(
        rows,
        &config.names,
        &nicknames,
        letter_buckets,
        config.cache_capacity,
        report,
    );
    Ok(builder.finish(&overlay))
}

/// Build the first-name index if a dataset is configured
pub fn build(config: &Config, letter_buckets: LetterBuckets) -> Result<Option<NameIndex>, BuildError> {
    config
        .dataset(Domain::Names)
        .map(|path| build_from_file(&path, config, letter_buckets))
        .transpose()
}
