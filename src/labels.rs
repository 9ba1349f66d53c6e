//! Side tables produced out-of-band and merged onto built indexes
//!
//! Every table is optional: a missing or unreadable file logs a warning
//! and behaves as an empty table, so the corresponding flags stay false.

use crate::config::{Config, SideFiles};
use crate::entry::{CategoryTag, Entry, LabelOrigin, LabelSize, ThingLabel};
use crate::io::{field_str, for_each_record, open, parse_flag, split_fields};
use rustc_hash::{FxHashMap, FxHashSet};
use std::io;
use std::path::Path;

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Set of words flagged in a `word<TAB>flag` file
#[derive(Debug, Clone, Default)]
pub struct FlagTable(FxHashSet<String>);

impl FlagTable {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(words.into_iter().map(|w| normalize(w.as_ref())).collect())
    }

    /// Load flags; a missing flag column counts as set
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut words = FxHashSet::default();
        for_each_record(open(path)?, |_, line| {
            let fields = split_fields(line);
            let Some(word) = field_str(fields[0]) else {
                return;
            };
            if fields.get(1).is_none_or(|flag| parse_flag(flag)) {
                words.insert(normalize(word));
            }
        })?;
        Ok(Self(words))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `word<TAB>origin<TAB>size<TAB>category` rows
#[derive(Debug, Clone, Default)]
pub struct LabelTable(FxHashMap<String, ThingLabel>);

impl LabelTable {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, ThingLabel)>,
    {
        Self(rows.into_iter().map(|(w, l)| (normalize(&w), l)).collect())
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let mut labels: FxHashMap<String, ThingLabel> = FxHashMap::default();
        let mut unknown: FxHashSet<String> = FxHashSet::default();
        let mut malformed = 0usize;

        for_each_record(open(path)?, |line_num, line| {
            let fields = split_fields(line);
            let (Some(word), true) = (field_str(fields[0]), fields.len() >= 4) else {
                malformed += 1;
                log::debug!("{}:{line_num}: malformed label row", path.display());
                return;
            };
            let mut field = |i: usize, parsed: bool| {
                if !parsed {
                    if let Some(value) = field_str(fields[i]).filter(|v| !v.is_empty()) {
                        if unknown.insert(value.to_string()) {
                            log::warn!("{}: unknown label value {value:?}", path.display());
                        }
                    }
                }
            };

            let origin = field_str(fields[1]).and_then(LabelOrigin::parse);
            field(1, origin.is_some());
            let size = field_str(fields[2]).and_then(LabelSize::parse);
            field(2, size.is_some());
            let category = field_str(fields[3]).and_then(CategoryTag::from_label);
            field(3, category.is_some());

            labels.insert(
                normalize(word),
                ThingLabel {
                    origin,
                    size,
                    category,
                },
            );
        })?;

        if malformed > 0 {
            log::warn!("{}: skipped {malformed} malformed label rows", path.display());
        }
        Ok(Self(labels))
    }

    pub fn get(&self, word: &str) -> Option<&ThingLabel> {
        self.0.get(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `formal<TAB>nick1,nick2,...` rows
#[derive(Debug, Clone, Default)]
pub struct NicknameTable(FxHashMap<String, Vec<String>>);

impl NicknameTable {
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: AsRef<str>,
    {
        Self(
            rows.into_iter()
                .map(|(formal, nicks)| {
                    let nicks = nicks.iter().map(|n| normalize(n.as_ref())).collect();
                    (normalize(formal.as_ref()), nicks)
                })
                .collect(),
        )
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let mut table: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for_each_record(open(path)?, |_, line| {
            let fields = split_fields(line);
            let Some(formal) = field_str(fields[0]).filter(|f| !f.is_empty()) else {
                return;
            };
            let nicks: Vec<String> = fields
                .get(1)
                .and_then(|f| field_str(f))
                .map(|list| {
                    list.split(',')
                        .map(normalize)
                        .filter(|n| !n.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            table.insert(normalize(formal), nicks);
        })?;
        Ok(Self(table))
    }

    /// Whether `name` appears as a formal name
    pub fn has_nickname(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn nickname_count(&self, name: &str) -> usize {
        self.0.get(name).map_or(0, Vec::len)
    }

    pub fn nicknames(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Load an optional table, degrading to empty on any failure
pub fn load_optional<T, F>(config: &Config, path: Option<&Path>, what: &str, load: F) -> T
where
    T: Default,
    F: FnOnce(&Path) -> io::Result<T>,
{
    let Some(path) = path else {
        return T::default();
    };
    let path = config.resolve(path);
    if !path.is_file() {
        log::warn!("{what} table {} not found, flags default to false", path.display());
        return T::default();
    }
    match load(&path) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("Failed to read {what} table {}: {e}", path.display());
            T::default()
        }
    }
}

/// Attributes merged onto entries after deduplication
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub holdable: FlagTable,
    pub rhyme: FlagTable,
    pub compound: FlagTable,
    pub labels: LabelTable,
}

impl Overlay {
    /// Load the side tables named in `side`
    pub fn load(config: &Config, side: &SideFiles) -> Self {
        Self {
            holdable: load_optional(config, side.holdable.as_deref(), "holdable", FlagTable::load),
            rhyme: load_optional(config, side.rhyme.as_deref(), "rhyme", FlagTable::load),
            compound: load_optional(config, side.compound.as_deref(), "compound", FlagTable::load),
            labels: load_optional(config, side.labels.as_deref(), "label", LabelTable::load),
        }
    }

    /// Merge side-table attributes into `entry`. Returns true when an
    /// external label was applied.
    pub fn apply(&self, entry: &mut Entry) -> bool {
        let letters = entry.letters();
        let flagged = |table: &FlagTable, text: &str| table.contains(text) || table.contains(&letters);

        let holdable = flagged(&self.holdable, &entry.text);
        let rhyme = flagged(&self.rhyme, &entry.text);
        let compound = flagged(&self.compound, &entry.text);
        entry.holdable |= holdable;
        entry.rhyme |= rhyme;
        entry.compound |= compound;

        let label = self
            .labels
            .get(&entry.text)
            .or_else(|| self.labels.get(&letters))
            .copied();
        match label {
            Some(label) => {
                entry.apply_label(&label);
                true
            }
            None => false,
        }
    }
}
