use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use fs_err as fs;
use lyrics_clean::Normalizer;

use crate::record::{CleanedLyric, RawLyric};

/// Cleaned lyrics to leave out of the corpus, one per line.
///
/// A missing or unreadable file is not an error, nothing is excluded then.
pub fn load_exclude_list(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        log::warn!("No exclude list found at {}", path.display());
        return Ok(HashSet::new());
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Ignoring exclude list: {e}");
            return Ok(HashSet::new());
        }
    };

    let exclude = content
        .lines()
        .map(String::from)
        .collect::<HashSet<_>>();
    log::info!("Loaded {} excluded lyrics", exclude.len());
    Ok(exclude)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanStats {
    pub kept: usize,
    /// No lyric container in the raw block
    pub absent: usize,
    pub empty: usize,
    pub excluded: usize,
}

pub fn clean_records(
    records: Vec<RawLyric>,
    normalizer: &Normalizer,
    exclude: &HashSet<String>,
) -> (Vec<CleanedLyric>, CleanStats) {
    let mut stats = CleanStats::default();
    let mut cleaned = Vec::with_capacity(records.len());

    for record in records {
        let text = match record.song_lyrics.as_deref().and_then(|raw| normalizer.normalize(raw)) {
            Some(text) => text,
            None => {
                stats.absent += 1;
                continue;
            }
        };

        if text.is_empty() {
            stats.empty += 1;
        } else if exclude.contains(&text) {
            stats.excluded += 1;
        } else {
            stats.kept += 1;
            cleaned.push(CleanedLyric::new(record, text));
        }
    }

    log::info!(
        "Kept {} lyrics, dropped {} without container, {} empty, {} excluded",
        stats.kept,
        stats.absent,
        stats.empty,
        stats.excluded
    );
    (cleaned, stats)
}
