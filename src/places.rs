//! Country and city domain

use crate::config::{Config, PlaceConfig};
use crate::dataset::{self, PlaceRow};
use crate::encoder::LetterBuckets;
use crate::entry::{CategoryTag, Entry};
use crate::error::BuildError;
use crate::index::{BuildReport, CategoryIndex, IndexBuilder, Record};
use crate::labels::Overlay;
use crate::service::Domain;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub type PlaceIndex = CategoryIndex<PlaceRecord>;

/// Countries players are expected to know
const COMMON_COUNTRIES: &[&str] = &[
    "usa", "china", "russia", "india", "brazil", "canada", "australia", "japan", "germany",
    "france", "italy", "spain", "mexico", "argentina", "egypt", "turkey", "iran", "poland",
    "ukraine", "nigeria", "ethiopia", "kenya", "ghana", "morocco", "algeria", "libya", "sudan",
    "chad", "england", "scotland", "wales", "ireland", "norway", "sweden", "denmark", "finland",
    "belgium", "netherlands", "switzerland", "austria", "portugal", "greece", "hungary",
    "romania", "croatia", "serbia", "bulgaria", "israel", "jordan", "lebanon", "kuwait",
    "qatar", "thailand", "vietnam", "malaysia", "singapore", "philippines", "indonesia",
    "pakistan", "bangladesh", "myanmar", "cambodia", "laos", "nepal", "tibet", "mongolia",
    "kazakhstan", "peru", "chile", "venezuela", "colombia", "ecuador", "bolivia", "paraguay",
    "uruguay", "cuba", "jamaica", "haiti", "panama", "nicaragua", "guatemala", "honduras",
    "tunisia", "zimbabwe", "botswana", "zambia", "tanzania", "uganda", "rwanda", "madagascar",
    "mali", "niger", "somalia", "yemen", "afghanistan", "uzbekistan", "georgia", "armenia",
    "azerbaijan", "cyprus",
];

/// Globally recognized cities, whatever their population
const COMMON_CITIES: &[&str] = &[
    "tokyo", "beijing", "delhi", "shanghai", "mumbai", "dhaka", "karachi", "istanbul", "moscow",
    "london", "paris", "madrid", "barcelona", "rome", "berlin", "vienna", "amsterdam",
    "stockholm", "oslo", "copenhagen", "warsaw", "prague", "budapest", "athens", "dublin",
    "lisbon", "zurich", "chicago", "houston", "phoenix", "philadelphia", "dallas", "austin",
    "columbus", "charlotte", "indianapolis", "seattle", "denver", "washington", "boston",
    "nashville", "baltimore", "portland", "detroit", "memphis", "cairo", "lagos", "kinshasa",
    "luanda", "johannesburg", "casablanca", "nairobi", "kampala", "khartoum", "algiers",
    "tunis", "tehran", "baghdad", "riyadh", "doha", "dubai", "muscat", "kabul", "islamabad",
    "lahore", "kolkata", "chennai", "bangalore", "hyderabad", "bangkok", "jakarta", "manila",
    "singapore", "hanoi", "saigon", "yangon", "seoul", "busan", "taipei", "macau", "sydney",
    "melbourne", "perth", "brisbane", "adelaide", "auckland", "wellington", "toronto",
    "vancouver", "montreal", "calgary", "ottawa", "quebec", "guadalajara", "monterrey",
    "bogota", "medellin", "caracas", "lima", "quito", "santiago", "valparaiso", "montevideo",
    "asuncion", "brasilia", "salvador", "fortaleza", "recife", "manaus",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Country,
    City,
}

impl FromStr for PlaceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" => Ok(PlaceType::Country),
            "city" => Ok(PlaceType::City),
            _ => Err(s.to_string()),
        }
    }
}

/// Continent code
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    AF,
    AS,
    EU,
    NA,
    OC,
    SA,
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AF" => Ok(Region::AF),
            "AS" => Ok(Region::AS),
            "EU" => Ok(Region::EU),
            "NA" => Ok(Region::NA),
            "OC" => Ok(Region::OC),
            "SA" => Ok(Region::SA),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceFilter {
    pub place_type: Option<PlaceType>,
    pub region: Option<Region>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRecord {
    #[serde(flatten)]
    pub entry: Entry,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    pub region: Option<Region>,
    pub population: u64,
}

impl Record for PlaceRecord {
    const DOMAIN: Domain = Domain::Places;
    const EXCLUDED: &'static [CategoryTag] = &[];
    type Filter = PlaceFilter;

    fn entry(&self) -> &Entry {
        &self.entry
    }

    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }

    fn matches(&self, filter: &PlaceFilter) -> bool {
        filter.place_type.is_none_or(|t| t == self.place_type)
            && filter.region.is_none_or(|r| Some(r) == self.region)
    }

    fn popularity(&self) -> u64 {
        self.population
    }
}

fn is_common(name: &str, place_type: PlaceType, population: u64, settings: &PlaceConfig) -> bool {
    match place_type {
        PlaceType::Country => COMMON_COUNTRIES.contains(&name),
        PlaceType::City => {
            COMMON_CITIES.contains(&name) || population >= settings.common_min_population
        }
    }
}

/// Turn raw rows into a builder, applying the place rules
pub fn builder_from_rows(
    rows: impl IntoIterator<Item = PlaceRow>,
    settings: &PlaceConfig,
    letter_buckets: LetterBuckets,
    cache_capacity: usize,
    mut report: BuildReport,
) -> IndexBuilder<PlaceRecord> {
    let mut builder = IndexBuilder::new(letter_buckets, cache_capacity);
    for row in rows {
        let Ok(place_type) = row.place_type.parse::<PlaceType>() else {
            report.malformed += 1;
            log::debug!("unknown place type {:?} for {}", row.place_type, row.name);
            continue;
        };
        // Hyphens are allowed, spaces and punctuation are not
        let single_word = row.name.chars().all(|c| c.is_alphabetic() || c == '-');
        if !single_word || (place_type == PlaceType::City && row.population == 0) {
            report.filtered += 1;
            continue;
        }
        let common = is_common(&row.name, place_type, row.population, settings);
        let Some(mut entry) = Entry::new(row.name) else {
            report.no_vowels += 1;
            continue;
        };
        entry.common = common;
        entry.category = CategoryTag::Place;
        builder.insert(PlaceRecord {
            entry,
            place_type,
            region: row.region.parse().ok(),
            population: row.population,
        });
    }
    *builder.report_mut() = report;
    builder
}

pub fn build_from_file(
    path: &Path,
    config: &Config,
    letter_buckets: LetterBuckets,
) -> Result<PlaceIndex, BuildError> {
    let mut report = BuildReport::default();
    let rows = dataset::read_places(path, &mut report).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let overlay = Overlay::load(config, &config.places.side);
    let builder = builder_from_rows(
        rows,
        &config.places,
        letter_buckets,
        config.cache_capacity,
        report,
    );
    Ok(builder.finish(&overlay))
}

/// Build the place index if a dataset is configured
pub fn build(config: &Config, letter_buckets: LetterBuckets) -> Result<Option<PlaceIndex>, BuildError> {
    config
        .dataset(Domain::Places)
        .map(|path| build_from_file(&path, config, letter_buckets))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryFilters;

    fn row(name: &str, place_type: &str, region: &str, population: u64) -> PlaceRow {
        PlaceRow {
            name: name.into(),
            place_type: place_type.into(),
            region: region.into(),
            population,
        }
    }

    fn sample() -> PlaceIndex {
        builder_from_rows(
            [
                row("paris", "city", "EU", 2_148_000),
                row("perth", "city", "OC", 900_000),
                row("peru", "country", "SA", 33_000_000),
                row("pavia", "city", "EU", 71_000),
                row("new york", "city", "NA", 8_000_000),
                row("ghost", "city", "EU", 0),
                row("atlantis", "island", "EU", 1),
                row("guinea-bissau", "country", "AF", 2_000_000),
            ],
            &PlaceConfig::default(),
            LetterBuckets::default(),
            0,
            BuildReport::default(),
        )
        .finish(&Overlay::default())
    }

    fn get<'a>(index: &'a PlaceIndex, name: &str) -> &'a PlaceRecord {
        index.iter().find(|r| r.entry.text == name).unwrap()
    }

    #[test]
    fn test_row_rules() {
        let index = sample();
        assert_eq!(index.len(), 5);
        assert_eq!(index.report().filtered, 2);
        assert_eq!(index.report().malformed, 1);

        assert!(get(&index, "paris").entry.common);
        assert!(get(&index, "perth").entry.common);
        assert!(get(&index, "peru").entry.common);
        assert!(!get(&index, "pavia").entry.common);
        assert!(!get(&index, "guinea-bissau").entry.common);
        assert!(get(&index, "guinea-bissau").entry.compound);
    }

    #[test]
    fn test_domain_filters() {
        let index = sample();
        // paris and pavia are both (5, 'p', 2, 4)
        let all = index
            .query_category(5, 3, 2, 4, &QueryFilters::default())
            .unwrap();
        assert_eq!(all.len(), 2);

        let filters = QueryFilters {
            common: Some(true),
            domain: PlaceFilter {
                place_type: Some(PlaceType::City),
                region: Some(Region::EU),
            },
            ..QueryFilters::default()
        };
        let found = index.query_category(5, 3, 2, 4, &filters).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entry.text, "paris");

        let filters = QueryFilters {
            domain: PlaceFilter {
                region: Some(Region::SA),
                ..PlaceFilter::default()
            },
            ..QueryFilters::default()
        };
        assert!(index.query_category(5, 3, 2, 4, &filters).unwrap().is_empty());
    }

    #[test]
    fn test_parse_region_and_type() {
        assert_eq!("eu".parse::<Region>(), Ok(Region::EU));
        assert!("XX".parse::<Region>().is_err());
        assert_eq!("City".parse::<PlaceType>(), Ok(PlaceType::City));
    }
}
