//! Query service over the three domain indexes
//!
//! [`QueryService::spawn`] checks that every configured dataset exists,
//! then builds the indexes on a background thread. Until the build
//! finishes every query fails with the retryable [`QueryError::NotReady`];
//! the finished [`Indexes`] are published once and never change.

use crate::cache::Words;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::encoder::LetterBuckets;
use crate::entry::{CategoryTag, Entry};
use crate::error::{BuildError, QueryError};
use crate::index::{BuildReport, CategoryIndex, Record};
use crate::names::{self, Gender, NameFilter, NameIndex, NameRecord, NicknameFilter};
use crate::nouns::{self, NounIndex, NounRecord};
use crate::places::{self, PlaceFilter, PlaceIndex, PlaceRecord, PlaceType, Region};
use crate::query::QueryFilters;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle, ScopedJoinHandle};
use std::time::Instant;

/// Entity domain of an index
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    Nouns,
    Names,
    Places,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Nouns, Domain::Names, Domain::Places];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Nouns => "nouns",
            Domain::Names => "names",
            Domain::Places => "places",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nouns" | "noun" | "words" => Ok(Domain::Nouns),
            "names" | "name" => Ok(Domain::Names),
            "places" | "place" => Ok(Domain::Places),
            _ => Err(s.to_string()),
        }
    }
}

/// A category query as sent by the HTTP layer.
///
/// Exactly one of `letter` (exact mode) or `category` (bucket mode)
/// selects the first letters. String filters that are empty count as
/// absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    pub domain: Domain,
    pub length: usize,
    pub letter: Option<char>,
    pub category: Option<u8>,
    pub v1: usize,
    pub v2: usize,
    #[serde(alias = "random_constraint")]
    pub positional: Option<String>,
    pub more_vowels: Option<bool>,
    pub holdable: Option<bool>,
    pub compound: Option<bool>,
    pub common: Option<bool>,
    pub last_category: Option<u8>,
    pub must_letters: Option<String>,
    pub rhyme: Option<bool>,
    #[serde(alias = "ms")]
    pub mtsfw: Option<bool>,
    pub manmade: Option<bool>,
    pub categories: Vec<String>,
    pub gender: Option<String>,
    pub origin: Option<String>,
    pub nickname: Option<String>,
    pub place_type: Option<String>,
    pub region: Option<String>,
    /// Truncate results after sorting; counts cover every match
    pub limit: Option<usize>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_filter<T: FromStr>(filter: &'static str, value: &Option<String>) -> Result<Option<T>, QueryError> {
    present(value)
        .map(|v| {
            v.parse().map_err(|_| QueryError::InvalidFilterValue {
                filter,
                value: v.to_string(),
            })
        })
        .transpose()
}

impl QueryRequest {
    /// Fail on domain filters that do not belong to `self.domain`
    fn check_supported(&self) -> Result<(), QueryError> {
        let domain_filters = [
            ("gender", &self.gender),
            ("origin", &self.origin),
            ("nickname", &self.nickname),
            ("place_type", &self.place_type),
            ("region", &self.region),
        ];
        let unsupported = match self.domain {
            Domain::Nouns => &domain_filters[..],
            Domain::Names => &domain_filters[3..],
            Domain::Places => &domain_filters[..3],
        };
        match unsupported.iter().find(|(_, value)| present(value).is_some()) {
            Some(&(filter, _)) => Err(QueryError::UnsupportedFilter {
                filter,
                domain: self.domain,
            }),
            None => Ok(()),
        }
    }

    /// Shared filters with the domain part `domain`
    pub fn filters<F>(&self, domain: F) -> Result<QueryFilters<F>, QueryError> {
        let categories = self
            .categories
            .iter()
            .map(|c| {
                c.parse::<CategoryTag>()
                    .map_err(|value| QueryError::InvalidFilterValue {
                        filter: "categories",
                        value,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryFilters {
            positional: self.positional.clone(),
            more_vowels: self.more_vowels,
            holdable: self.holdable,
            compound: self.compound,
            common: self.common,
            last_category: self.last_category,
            must_letters: self.must_letters.clone(),
            rhyme: self.rhyme,
            mtsfw: self.mtsfw,
            manmade: self.manmade,
            categories,
            domain,
        })
    }

    pub fn name_filter(&self) -> Result<NameFilter, QueryError> {
        let origin = present(&self.origin)
            .map(|o| {
                let code = o.to_ascii_uppercase();
                if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                    Ok(code)
                } else {
                    Err(QueryError::InvalidFilterValue {
                        filter: "origin",
                        value: o.to_string(),
                    })
                }
            })
            .transpose()?;
        Ok(NameFilter {
            gender: parse_filter::<Gender>("gender", &self.gender)?,
            origin,
            nickname: parse_filter::<NicknameFilter>("nickname", &self.nickname)?,
        })
    }

    pub fn place_filter(&self) -> Result<PlaceFilter, QueryError> {
        Ok(PlaceFilter {
            place_type: parse_filter::<PlaceType>("place_type", &self.place_type)?,
            region: parse_filter::<Region>("region", &self.region)?,
        })
    }
}

/// One result row; serializes as the bare domain record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Candidate {
    Noun(NounRecord),
    Name(NameRecord),
    Place(PlaceRecord),
}

impl Candidate {
    pub fn entry(&self) -> &Entry {
        match self {
            Candidate::Noun(r) => r.entry(),
            Candidate::Name(r) => r.entry(),
            Candidate::Place(r) => r.entry(),
        }
    }

    pub fn text(&self) -> &str {
        &self.entry().text
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResponse {
    /// Matches by popularity, then alphabetically
    pub results: Vec<Candidate>,
    /// Number of matches per category
    pub by_category: BTreeMap<CategoryTag, usize>,
}

impl QueryResponse {
    fn from_records<R: Record>(
        mut records: Vec<R>,
        wrap: fn(R) -> Candidate,
        limit: Option<usize>,
    ) -> Self {
        records.sort_by(|a, b| {
            b.popularity()
                .cmp(&a.popularity())
                .then_with(|| a.text().cmp(b.text()))
        });
        let mut by_category = BTreeMap::new();
        for record in &records {
            *by_category.entry(record.entry().category).or_insert(0) += 1;
        }
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Self {
            results: records.into_iter().map(wrap).collect(),
            by_category,
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.results.iter().map(Candidate::text).collect()
    }
}

fn run<R: Record>(
    index: &CategoryIndex<R>,
    request: &QueryRequest,
    filters: QueryFilters<R::Filter>,
) -> Result<Vec<R>, QueryError> {
    match (request.letter, request.category) {
        (Some(letter), None) => {
            index.query_letter(request.length, letter, request.v1, request.v2, &filters)
        }
        (None, Some(bucket)) => {
            index.query_category(request.length, bucket, request.v1, request.v2, &filters)
        }
        (Some(letter), Some(_)) => Err(QueryError::InvalidFilterValue {
            filter: "letter",
            value: format!("{letter} (letter and category are exclusive)"),
        }),
        (None, None) => Err(QueryError::InvalidFilterValue {
            filter: "category",
            value: "missing".to_string(),
        }),
    }
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T, BuildError>>) -> Result<T, BuildError> {
    handle.join().map_err(|_| BuildError::WorkerPanicked)?
}

/// The built indexes of every configured domain
#[derive(Debug)]
pub struct Indexes {
    pub nouns: Option<NounIndex>,
    pub names: Option<NameIndex>,
    pub places: Option<PlaceIndex>,
}

impl Indexes {
    /// Build every configured domain, one scoped thread per domain
    pub fn build(config: &Config) -> Result<Self, BuildError> {
        let letter_buckets = LetterBuckets::default();
        let classifier = Classifier::default();

        thread::scope(|scope| {
            let nouns = scope.spawn(|| nouns::build(config, letter_buckets.clone(), &classifier));
            let names = scope.spawn(|| names::build(config, letter_buckets.clone()));
            let places = scope.spawn(|| places::build(config, letter_buckets.clone()));
            Ok(Self {
                nouns: join(nouns)?,
                names: join(names)?,
                places: join(places)?,
            })
        })
    }

    fn nouns(&self) -> Result<&NounIndex, QueryError> {
        self.nouns
            .as_ref()
            .ok_or(QueryError::DomainUnavailable(Domain::Nouns))
    }

    fn names(&self) -> Result<&NameIndex, QueryError> {
        self.names
            .as_ref()
            .ok_or(QueryError::DomainUnavailable(Domain::Names))
    }

    fn places(&self) -> Result<&PlaceIndex, QueryError> {
        self.places
            .as_ref()
            .ok_or(QueryError::DomainUnavailable(Domain::Places))
    }

    /// Exact lookup in one domain
    pub fn lookup(
        &self,
        domain: Domain,
        length: usize,
        first_letter: char,
        v1: usize,
        v2: usize,
    ) -> Result<Words, QueryError> {
        Ok(match domain {
            Domain::Nouns => self.nouns()?.lookup(length, first_letter, v1, v2),
            Domain::Names => self.names()?.lookup(length, first_letter, v1, v2),
            Domain::Places => self.places()?.lookup(length, first_letter, v1, v2),
        })
    }

    /// Validate `request`, filter, and rank the matches
    pub fn query(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        request.check_supported()?;
        match request.domain {
            Domain::Nouns => {
                let filters = request.filters(())?;
                let records = run(self.nouns()?, request, filters)?;
                Ok(QueryResponse::from_records(records, Candidate::Noun, request.limit))
            }
            Domain::Names => {
                let filters = request.filters(request.name_filter()?)?;
                let records = run(self.names()?, request, filters)?;
                Ok(QueryResponse::from_records(records, Candidate::Name, request.limit))
            }
            Domain::Places => {
                let filters = request.filters(request.place_filter()?)?;
                let records = run(self.places()?, request, filters)?;
                Ok(QueryResponse::from_records(records, Candidate::Place, request.limit))
            }
        }
    }

    /// Build reports of the domains that were built
    pub fn reports(&self) -> Vec<(Domain, BuildReport)> {
        let mut reports = Vec::new();
        if let Some(index) = &self.nouns {
            reports.push((Domain::Nouns, *index.report()));
        }
        if let Some(index) = &self.names {
            reports.push((Domain::Names, *index.report()));
        }
        if let Some(index) = &self.places {
            reports.push((Domain::Places, *index.report()));
        }
        reports
    }

    /// Letter bucket tables of the built domains, which must all agree
    pub fn letter_buckets(&self) -> Vec<&LetterBuckets> {
        let mut tables = Vec::new();
        if let Some(index) = &self.nouns {
            tables.push(index.letter_buckets());
        }
        if let Some(index) = &self.names {
            tables.push(index.letter_buckets());
        }
        if let Some(index) = &self.places {
            tables.push(index.letter_buckets());
        }
        tables
    }
}

/// Observable build state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum Status {
    Building,
    Ready,
    Failed(String),
}

/// Thread-safe front end shared by request handlers
#[derive(Debug)]
pub struct QueryService {
    indexes: OnceCell<Result<Indexes, String>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl QueryService {
    /// Validate datasets, then build on a background thread
    pub fn spawn(config: Config) -> Result<Arc<Self>, BuildError> {
        config.check_datasets()?;

        let service = Arc::new(Self {
            indexes: OnceCell::new(),
            worker: Mutex::new(None),
        });
        let target = Arc::clone(&service);
        let handle = thread::Builder::new()
            .name("wordhelper-build".to_string())
            .spawn(move || {
                let started = Instant::now();
                let built = panic::catch_unwind(AssertUnwindSafe(|| Indexes::build(&config)))
                    .unwrap_or(Err(BuildError::WorkerPanicked));
                let result = built.map_err(|e| {
                    log::error!("Index build failed: {e}");
                    e.to_string()
                });
                if result.is_ok() {
                    log::info!("Indexes ready in {:.2?}", started.elapsed());
                }
                let _ = target.indexes.set(result);
            })
            .map_err(BuildError::Spawn)?;

        *service.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(service)
    }

    /// Service over indexes that are already built
    pub fn ready(indexes: Indexes) -> Self {
        Self {
            indexes: OnceCell::with_value(Ok(indexes)),
            worker: Mutex::new(None),
        }
    }

    fn worker_died(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(JoinHandle::is_finished)
            && self.indexes.get().is_none()
    }

    pub fn status(&self) -> Status {
        match self.indexes.get() {
            Some(Ok(_)) => Status::Ready,
            Some(Err(e)) => Status::Failed(e.clone()),
            None if self.worker_died() => Status::Failed(BuildError::WorkerPanicked.to_string()),
            None => Status::Building,
        }
    }

    /// The built indexes, or why they are not available
    pub fn indexes(&self) -> Result<&Indexes, QueryError> {
        match self.indexes.get() {
            Some(Ok(indexes)) => Ok(indexes),
            Some(Err(e)) => Err(QueryError::BuildFailed(e.clone())),
            None if self.worker_died() => {
                Err(QueryError::BuildFailed(BuildError::WorkerPanicked.to_string()))
            }
            None => Err(QueryError::NotReady),
        }
    }

    /// Block until the background build has published its result.
    ///
    /// Any number of callers may wait at once; all of them return once the
    /// build succeeds or fails.
    pub fn wait(&self) -> Result<&Indexes, QueryError> {
        match self.indexes.wait() {
            Ok(indexes) => Ok(indexes),
            Err(e) => Err(QueryError::BuildFailed(e.clone())),
        }
    }

    pub fn lookup(
        &self,
        domain: Domain,
        length: usize,
        first_letter: char,
        v1: usize,
        v2: usize,
    ) -> Result<Words, QueryError> {
        self.indexes()?.lookup(domain, length, first_letter, v1, v2)
    }

    pub fn query(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        self.indexes()?.query(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let nouns = [
            ("apple", "keyword"),
            ("ample", "keyword"),
            ("apple", "sampled"),
            ("apple", "sampled"),
            ("teacher", "keyword"),
            ("toaster", "keyword"),
            ("chairs", "keyword"),
            ("glass", "keyword"),
            ("snow", "keyword"),
            ("ball", "keyword"),
            ("snowball", "keyword"),
        ]
        .iter()
        .map(|(s, src)| format!("{{\"subject\": \"{s}\", \"source\": \"{src}\"}}\n"))
        .collect::<String>();
        write(dir.path(), "nouns.jsonl", &nouns);
        write(
            dir.path(),
            "names.tsv",
            "john\tm\tUS\t1\t20\nmary\tf\tUS\t1\t50\nmaria\tf\tES\t5\t10\nmoxy\tf\tUS\t0\t0\n",
        );
        write(
            dir.path(),
            "places.tsv",
            "paris\tcity\tEU\t2148000\npavia\tcity\tEU\t71000\nperu\tcountry\tSA\t33000000\n",
        );
        write(dir.path(), "holdable.tsv", "glass\t1\napple\t1\n");

        let mut config = Config::empty();
        config.data_dir = dir.path().to_path_buf();
        config.cache_capacity = 32;
        config.nouns.dataset = Some("nouns.jsonl".into());
        config.nouns.side.holdable = Some("holdable.tsv".into());
        config.names.dataset = Some("names.tsv".into());
        config.places.dataset = Some("places.tsv".into());
        (dir, config)
    }

    fn service() -> (tempfile::TempDir, Arc<QueryService>) {
        let (dir, config) = fixture();
        let service = QueryService::spawn(config).unwrap();
        service.wait().unwrap();
        (dir, service)
    }

    fn nouns_request(length: usize, category: u8, v1: usize, v2: usize) -> QueryRequest {
        QueryRequest {
            domain: Domain::Nouns,
            length,
            category: Some(category),
            v1,
            v2,
            ..QueryRequest::default()
        }
    }

    #[test]
    fn test_apple_by_category_sorted_by_count() {
        let (_dir, service) = service();
        assert_eq!(service.status(), Status::Ready);
        let response = service.query(&nouns_request(5, 1, 1, 5)).unwrap();
        assert_eq!(response.texts(), vec!["apple", "ample"]);
        assert_eq!(response.by_category.get(&CategoryTag::FoodPlant), Some(&1));
        assert_eq!(response.by_category.values().sum::<usize>(), 2);
    }

    #[test]
    fn test_exact_lookup_and_letter_mode() {
        let (_dir, service) = service();
        let words = service.lookup(Domain::Nouns, 5, 'a', 1, 5).unwrap();
        assert_eq!(&*words, &["apple", "ample"]);

        let request = QueryRequest {
            letter: Some('a'),
            holdable: Some(true),
            ..nouns_request(5, 1, 1, 5)
        };
        let request = QueryRequest {
            category: None,
            ..request
        };
        assert_eq!(service.query(&request).unwrap().texts(), vec!["apple"]);
    }

    #[test]
    fn test_positional_and_errors() {
        let (_dir, service) = service();
        // chairs is (6, 'c', 3, 4); its 5th letter is 'r'
        let request = QueryRequest {
            positional: Some("5S".into()),
            ..nouns_request(6, 2, 3, 4)
        };
        assert!(service.query(&request).unwrap().results.is_empty());

        let err = service.query(&nouns_request(5, 4, 1, 5)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidBucket(4)));
        assert!(!err.is_retryable());

        let request = QueryRequest {
            positional: Some("5".into()),
            ..nouns_request(6, 2, 3, 4)
        };
        assert!(matches!(
            service.query(&request),
            Err(QueryError::MalformedConstraint(_))
        ));
    }

    #[test]
    fn test_person_excluded_and_compound() {
        let (_dir, service) = service();
        let response = service.query(&nouns_request(7, 1, 2, 3)).unwrap();
        assert_eq!(response.texts(), vec!["toaster"]);

        let request = QueryRequest {
            compound: Some(true),
            ..nouns_request(8, 2, 3, 6)
        };
        assert_eq!(service.query(&request).unwrap().texts(), vec!["snowball"]);
    }

    #[test]
    fn test_name_queries() {
        let (_dir, service) = service();
        let request = QueryRequest {
            domain: Domain::Names,
            length: 4,
            category: Some(1),
            v1: 2,
            v2: 4,
            common: Some(false),
            ..QueryRequest::default()
        };
        // moxy is unranked, so not common
        assert_eq!(service.query(&request).unwrap().texts(), vec!["moxy"]);

        let request = QueryRequest {
            gender: Some("f".into()),
            origin: Some("us".into()),
            common: None,
            ..request
        };
        assert_eq!(service.query(&request).unwrap().texts(), vec!["mary", "moxy"]);

        let request = QueryRequest {
            gender: Some("robot".into()),
            ..request
        };
        assert!(matches!(
            service.query(&request),
            Err(QueryError::InvalidFilterValue { filter: "gender", .. })
        ));
    }

    #[test]
    fn test_place_queries_rank_by_population() {
        let (_dir, service) = service();
        let request = QueryRequest {
            domain: Domain::Places,
            length: 5,
            category: Some(3),
            v1: 2,
            v2: 4,
            region: Some("eu".into()),
            ..QueryRequest::default()
        };
        let response = service.query(&request).unwrap();
        assert_eq!(response.texts(), vec!["paris", "pavia"]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["results"][0]["word"], "paris");
        assert_eq!(json["results"][0]["type"], "city");
        assert_eq!(json["by_category"]["place"], 2);
    }

    #[test]
    fn test_unsupported_filter() {
        let (_dir, service) = service();
        let request = QueryRequest {
            gender: Some("m".into()),
            ..nouns_request(5, 1, 1, 5)
        };
        assert!(matches!(
            service.query(&request),
            Err(QueryError::UnsupportedFilter {
                filter: "gender",
                domain: Domain::Nouns
            })
        ));

        let request = QueryRequest {
            domain: Domain::Places,
            nickname: Some("none".into()),
            ..nouns_request(5, 1, 1, 5)
        };
        assert!(matches!(
            service.query(&request),
            Err(QueryError::UnsupportedFilter { filter: "nickname", .. })
        ));
    }

    #[test]
    fn test_missing_dataset_fails_fast() {
        let (dir, mut config) = fixture();
        config.places.dataset = Some(dir.path().join("nope.tsv"));
        assert!(matches!(
            QueryService::spawn(config),
            Err(BuildError::MissingDataset {
                domain: Domain::Places,
                ..
            })
        ));
    }

    #[test]
    fn test_unconfigured_domain_unavailable() {
        let (_dir, mut config) = fixture();
        config.places.dataset = None;
        let service = QueryService::ready(Indexes::build(&config).unwrap());
        assert!(matches!(
            service.lookup(Domain::Places, 5, 'p', 2, 4),
            Err(QueryError::DomainUnavailable(Domain::Places))
        ));
        assert_eq!(service.indexes().unwrap().reports().len(), 2);
    }

    #[test]
    fn test_concurrent_waiters_block_until_built() {
        let dir = tempfile::tempdir().unwrap();
        // Enough rows that the build is still running when the waiters arrive
        let nouns: String = (0..200_000u32)
            .map(|i| {
                let subject: String = format!("{i:06}")
                    .bytes()
                    .map(|d| char::from(b"aeiouybcdf"[usize::from(d - b'0')]))
                    .collect();
                format!("{{\"subject\": \"{subject}\", \"source\": \"keyword\"}}\n")
            })
            .collect();
        write(dir.path(), "nouns.jsonl", &nouns);
        let mut config = Config::empty();
        config.data_dir = dir.path().to_path_buf();
        config.nouns.dataset = Some("nouns.jsonl".into());

        let service = QueryService::spawn(config).unwrap();
        let results: Vec<_> = thread::scope(|scope| {
            let waiters: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| service.wait().map(|i| i.reports().len())))
                .collect();
            waiters.into_iter().map(|w| w.join().unwrap()).collect()
        });
        for result in results {
            assert_eq!(result.unwrap(), 1);
        }
        assert_eq!(service.status(), Status::Ready);
    }

    #[test]
    fn test_not_ready_is_retryable() {
        let service = QueryService {
            indexes: OnceCell::new(),
            worker: Mutex::new(None),
        };
        assert_eq!(service.status(), Status::Building);
        let err = service.query(&nouns_request(5, 1, 1, 5)).unwrap_err();
        assert!(matches!(err, QueryError::NotReady));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_letter_buckets_consistent_across_domains() {
        let (_dir, service) = service();
        let tables = service.indexes().unwrap().letter_buckets();
        assert_eq!(tables.len(), 3);
        assert!(tables.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_request_from_json() {
        let request: QueryRequest = serde_json::from_str(
            r#"{"domain": "names", "length": 4, "category": 1, "v1": 2, "v2": 4,
                "random_constraint": "2A", "ms": true, "categories": []}"#,
        )
        .unwrap();
        assert_eq!(request.domain, Domain::Names);
        assert_eq!(request.positional.as_deref(), Some("2A"));
        assert_eq!(request.mtsfw, Some(true));
    }
}
