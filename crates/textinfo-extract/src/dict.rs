//! User dictionary bootstrap
//!
//! The dictionary file uses jieba's user-dict format, one `word weight tag`
//! row per line. A missing file is created with a handful of sample rows so
//! a fresh deployment starts with usable entries; the file is read exactly
//! once, at extractor construction.
//!
//! jieba-rs keeps the stock tag for words it already knows, so the tags read
//! here also go into a word→tag override table that the classifier consults
//! ahead of the segmenter's own tag.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use jieba_rs::Jieba;

use textinfo_core::{Result, TextInfoError};

/// Rows written into a freshly created dictionary file
pub const SAMPLE_ENTRIES: [&str; 3] = ["阿里巴巴 10 nt", "腾讯 10 nt", "新冠病毒 10 nz"];

/// Create the dictionary file with the sample entries when it is missing
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    let mut file = File::create(path).map_err(|e| {
        TextInfoError::Dictionary(format!("failed to create {}: {e}", path.display()))
    })?;
    file.write_all(SAMPLE_ENTRIES.join("\n").as_bytes())
        .map_err(|e| {
            TextInfoError::Dictionary(format!("failed to write {}: {e}", path.display()))
        })?;

    tracing::info!(path = %path.display(), "created user dictionary with sample entries");
    Ok(())
}

/// Load the dictionary rows at `path` into `jieba` and return the word→tag
/// override table
///
/// Words jieba does not know yet are added with the row's weight and tag.
/// Words it does know keep their stock frequency (adding them again would
/// reset it); their row tag still lands in the override table so it wins at
/// classification time.
pub fn load_into(jieba: &mut Jieba, path: &Path) -> Result<HashMap<String, String>> {
    let file = File::open(path).map_err(|e| {
        TextInfoError::Dictionary(format!("failed to open {}: {e}", path.display()))
    })?;

    let mut overrides = HashMap::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| {
            TextInfoError::Dictionary(format!("failed to read {}: {e}", path.display()))
        })?;

        let Some(row) = parse_row(&line) else {
            continue;
        };

        if !jieba.has_word(row.word) {
            jieba.add_word(row.word, row.freq, row.tag);
        }
        if let Some(tag) = row.tag {
            overrides.insert(row.word.to_string(), tag.to_string());
        }
    }

    tracing::debug!(path = %path.display(), entries = overrides.len(), "user dictionary loaded");
    Ok(overrides)
}

struct Row<'a> {
    word: &'a str,
    freq: Option<usize>,
    tag: Option<&'a str>,
}

/// Split a `word [weight] [tag]` row; the weight column is optional, as in
/// jieba's own user-dict format
fn parse_row(line: &str) -> Option<Row<'_>> {
    let mut columns = line.split_whitespace();
    let word = columns.next()?;

    let (freq, tag) = match columns.next() {
        Some(column) => match column.parse() {
            Ok(freq) => (Some(freq), columns.next()),
            Err(_) => (None, Some(column)),
        },
        None => (None, None),
    };

    Some(Row { word, freq, tag })
}
