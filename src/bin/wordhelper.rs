//! Command-line front end.
//!
//! Exact-letter mode:  wordhelper <domain> <len> <letter> <v1> [v2]
//! Category mode:      wordhelper <domain> <len> <1|2|3> <v1> [v2] [pos] [y|n]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wordhelper::{Config, Domain, QueryRequest, QueryService};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_CONFIG: &str = "wordhelper.toml";

const USAGE: &str = "Usage:
  Exact-letter:   wordhelper [--config <path>] <nouns|names|places> <len> <letter> <v1> [v2]
  Category mode:  wordhelper [--config <path>] <nouns|names|places> <len> <1|2|3> <v1> [v2] [pos] [y|n]
    pos  → e.g. 5S  (position+letter)
    y/n  → y = more than two vowels";

fn parse<T: std::str::FromStr>(what: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {what}: {value:?}"))
}

/// Split `--config <path>` off the positional arguments
fn split_config(args: Vec<String>) -> Result<(Option<PathBuf>, Vec<String>), String> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().ok_or("--config needs a path")?;
            config = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--config=") {
            config = Some(PathBuf::from(path));
        } else {
            positional.push(arg);
        }
    }
    Ok((config, positional))
}

fn parse_request(args: &[String]) -> Result<QueryRequest, String> {
    if args.len() < 4 {
        return Err(USAGE.to_string());
    }
    let mut request = QueryRequest {
        domain: parse::<Domain>("domain", &args[0])?,
        length: parse("length", &args[1])?,
        v1: parse("first vowel position", &args[3])?,
        ..QueryRequest::default()
    };

    let mut rest = &args[4..];
    if let Some(v2) = rest.first().filter(|a| a.bytes().all(|b| b.is_ascii_digit())) {
        request.v2 = parse("second vowel position", v2)?;
        rest = &rest[1..];
    }

    let selector = &args[2];
    if selector.bytes().all(|b| b.is_ascii_digit()) {
        request.category = Some(parse("category", selector)?);
        request.positional = rest.first().cloned();
        request.more_vowels = match rest.get(1).map(|f| f.to_ascii_lowercase()).as_deref() {
            Some("y") => Some(true),
            Some("n") => Some(false),
            _ => None,
        };
    } else {
        let mut chars = selector.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => request.letter = Some(letter),
            _ => return Err(format!("invalid first letter: {selector:?}")),
        }
    }
    Ok(request)
}

fn load_config(path: Option<PathBuf>) -> Result<Config, String> {
    let path = path.or_else(|| {
        let default = Path::new(DEFAULT_CONFIG);
        default.is_file().then(|| default.to_path_buf())
    });
    match path {
        Some(path) => Config::load(&path).map_err(|e| e.to_string()),
        None => Ok(Config::default()),
    }
}

fn run() -> Result<(), String> {
    let (config_path, args) = split_config(std::env::args().skip(1).collect())?;
    let request = parse_request(&args)?;
    let config = load_config(config_path)?;

    let service = QueryService::spawn(config).map_err(|e| e.to_string())?;
    service.wait().map_err(|e| e.to_string())?;
    let response = service.query(&request).map_err(|e| e.to_string())?;

    if response.results.is_empty() {
        println!("<no matches>");
    } else {
        println!("{}", response.texts().join("\n"));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
