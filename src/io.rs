//! Byte-level helpers for reading flat data files
//!
//! Datasets and side tables are line oriented. Lines are handled as raw
//! bytes and only decoded once a field is needed, so a stray invalid UTF-8
//! row is skipped instead of aborting the whole file.

use atoi::FromRadix10Checked;
use bstr::ByteSlice;
use bstr::io::BufReadExt;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Open a data file, transparently decompressing `.gz` files
pub fn open(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    let gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if gzipped {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Call `f` with (1-based line number, line) for every non-blank line that
/// is not a `#` comment. Line terminators are stripped.
pub fn for_each_record<R, F>(mut reader: R, mut f: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(usize, &[u8]),
{
    let mut line_num = 0;
    reader.for_byte_line(|line| {
        line_num += 1;
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with(b"#") {
            f(line_num, line);
        }
        Ok(true)
    })
}

/// Split a line on tabs
pub fn split_fields(line: &[u8]) -> Vec<&[u8]> {
    let mut fields = Vec::with_capacity(5);
    let mut start = 0;
    for tab in memchr::memchr_iter(b'\t', line) {
        fields.push(&line[start..tab]);
        start = tab + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// Decode a field as trimmed UTF-8
#[inline]
pub fn field_str(bytes: &[u8]) -> Option<&str> {
    bytes.trim().to_str().ok()
}

/// Parse an unsigned decimal field; rejects signs, junk and overflow
#[inline]
pub fn parse_number<T: FromRadix10Checked>(bytes: &[u8]) -> Option<T> {
    let bytes = bytes.trim();
    if bytes.is_empty() {
        return None;
    }
    match T::from_radix_10_checked(bytes) {
        (Some(n), used) if used == bytes.len() => Some(n),
        _ => None,
    }
}

/// Interpret a flag column (`1`, `true`, `y`, `yes`)
pub fn parse_flag(bytes: &[u8]) -> bool {
    matches!(
        bytes.trim().to_ascii_lowercase().as_slice(),
        b"1" | b"true" | b"y" | b"yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields(b"a\tb\tc"), vec![&b"a"[..], b"b", b"c"]);
        assert_eq!(split_fields(b"a"), vec![&b"a"[..]]);
        assert_eq!(split_fields(b"a\t\t"), vec![&b"a"[..], b"", b""]);
    }

    #[test]
    fn test_for_each_record_skips_comments_and_blanks() {
        let text = "# header\nfirst\n\n  \nsecond\r\n#x\nthird";
        let mut seen = Vec::new();
        for_each_record(Cursor::new(text), |n, line| {
            seen.push((n, line.to_str().unwrap().to_string()));
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                (2, "first".to_string()),
                (5, "second".to_string()),
                (7, "third".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u32>(b"42"), Some(42));
        assert_eq!(parse_number::<u32>(b" 7 "), Some(7));
        assert_eq!(parse_number::<u32>(b"0"), Some(0));
        assert_eq!(parse_number::<u32>(b""), None);
        assert_eq!(parse_number::<u32>(b"12a"), None);
        assert_eq!(parse_number::<u32>(b"-3"), None);
        assert_eq!(parse_number::<u8>(b"300"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(b"1"));
        assert!(parse_flag(b"True"));
        assert!(parse_flag(b"y"));
        assert!(!parse_flag(b"0"));
        assert!(!parse_flag(b""));
    }

    #[test]
    fn test_open_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.tsv.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(b"apple\t1\nbanana\t0\n").unwrap();
        enc.finish().unwrap();

        let mut lines = Vec::new();
        for_each_record(open(&path).unwrap(), |_, line| lines.push(line.to_vec())).unwrap();
        assert_eq!(lines, vec![b"apple\t1".to_vec(), b"banana\t0".to_vec()]);
    }
}
