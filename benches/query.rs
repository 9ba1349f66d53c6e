use divan::{Bencher, black_box};
use wordhelper::classifier::Classifier;
use wordhelper::config::NounConfig;
use wordhelper::dataset::NounRow;
use wordhelper::labels::Overlay;
use wordhelper::nouns::{self, NounIndex};
use wordhelper::{BuildReport, LetterBuckets, QueryFilters};

fn main() {
    divan::main();
}

const WORDS: &[&str] = &[
    "apple", "ample", "angle", "table", "cable", "bugle", "jumbo", "judge", "chaise", "cheese",
    "hammer", "candle", "kettle", "toaster", "snowball", "pumpkin", "carpet", "ladder", "mitten",
    "pillow", "bottle", "basket", "rocket", "tomato", "banana", "guitar", "violin", "wallet",
];

fn index(cache_capacity: usize) -> NounIndex {
    // Suffixed copies spread the words over many keys
    let rows = (0..200).flat_map(|i| {
        WORDS.iter().map(move |w| NounRow {
            subject: if i == 0 {
                w.to_string()
            } else {
                format!("{w}{}", ["s", "er", "ing", "y", "ed"][i % 5].repeat(1 + i / 50))
            },
            keyword: true,
        })
    });
    nouns::builder_from_rows(
        rows,
        &NounConfig::default(),
        &Classifier::default(),
        LetterBuckets::default(),
        cache_capacity,
        BuildReport::default(),
    )
    .finish(&Overlay::default())
}

#[divan::bench]
fn lookup_cold(bencher: Bencher) {
    let index = index(0);
    bencher.bench_local(|| black_box(index.lookup(black_box(5), 'a', 1, 5)));
}

#[divan::bench]
fn lookup_cached(bencher: Bencher) {
    let index = index(1024);
    bencher.bench_local(|| black_box(index.lookup(black_box(5), 'a', 1, 5)));
}

#[divan::bench(args = [1, 2, 3])]
fn query_category(bencher: Bencher, bucket: u8) {
    let index = index(0);
    let filters = QueryFilters::default();
    bencher.bench_local(|| black_box(index.query_category(6, bucket, 2, 5, &filters)));
}

#[divan::bench]
fn query_filtered(bencher: Bencher) {
    let index = index(0);
    let filters = QueryFilters {
        positional: Some("2A".to_string()),
        more_vowels: Some(false),
        manmade: Some(true),
        ..QueryFilters::default()
    };
    bencher.bench_local(|| black_box(index.query_category(6, 1, 2, 5, &filters)));
}
