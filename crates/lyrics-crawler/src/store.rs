use std::collections::HashSet;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Sender};
use fs_err as fs;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::record::{RawLyric, Song};

const SONG_LIST: &str = "song_urls.jsonl";
const COMBINED: &str = "lyrics_combined.jsonl";

/// Directory keeping the song list and the raw lyrics of every run, so that
/// an interrupted scrape can be resumed.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn song_list_path(&self) -> PathBuf {
        self.dir.join(SONG_LIST)
    }

    pub fn combined_path(&self) -> PathBuf {
        self.dir.join(COMBINED)
    }

    /// A fresh file for the raw lyrics of the current run.
    pub fn new_run_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S%.3f");
        self.dir.join(format!("lyrics_{stamp}.jsonl"))
    }

    pub fn load_songs(&self) -> Result<Option<Vec<Song>>> {
        let path = self.song_list_path();
        if !path.exists() {
            return Ok(None);
        }
        read_jsonl(&path).map(Some)
    }

    pub fn save_songs(&self, songs: &[Song]) -> Result<()> {
        write_jsonl(&self.song_list_path(), songs)
    }

    /// Every raw lyric file, the combined one included, sorted by name.
    pub fn lyric_files(&self) -> Result<Vec<PathBuf>> {
        let dir = self
            .dir
            .to_str()
            .ok_or_else(|| anyhow!("Non UTF-8 store path: {}", self.dir.display()))?;
        let pattern = format!("{}/lyrics*.jsonl", glob::Pattern::escape(dir));

        let mut files = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
        files.sort();
        Ok(files)
    }

    pub fn previously_scraped(&self) -> Result<HashSet<String>> {
        let mut urls = HashSet::new();
        for path in self.lyric_files()? {
            let lyrics: Vec<RawLyric> = read_jsonl(&path)?;
            urls.extend(lyrics.into_iter().map(|lyric| lyric.song_url));
        }
        Ok(urls)
    }

    /// Merges every raw lyric file into the combined file.
    ///
    /// Records sharing a `song_url` are kept once (first file wins) and
    /// records without a lyric block are dropped.
    pub fn combine(&self) -> Result<Vec<RawLyric>> {
        let mut seen = HashSet::new();
        let mut combined = vec![];

        for path in self.lyric_files()? {
            let lyrics: Vec<RawLyric> = read_jsonl(&path)?;
            for lyric in lyrics {
                if lyric.song_lyrics.is_some() && seen.insert(lyric.song_url.clone()) {
                    combined.push(lyric);
                }
            }
        }

        let path = self.combined_path();
        write_jsonl(&path, &combined)?;
        log::info!("Wrote {} combined lyrics to {}", combined.len(), path.display());

        Ok(combined)
    }
}

pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(fs::File::open(path)?);

    let mut records = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("Invalid record at {}:{}", path.display(), i + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// One JSON object per line, non-ASCII characters written as is.
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut out = BufWriter::new(fs::File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Appends raw lyrics to a run file from a dedicated thread.
pub struct LyricWriter {
    path: PathBuf,
    tx_lyric: Sender<RawLyric>,
    writer: thread::JoinHandle<Result<usize>>,
}

impl LyricWriter {
    /// The file is flushed every `checkpoint_every` records.
    pub fn spawn(path: PathBuf, checkpoint_every: usize) -> Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let (tx_lyric, rx_lyric) = unbounded::<RawLyric>();

        let writer = thread::Builder::new()
            .name(String::from("lyric-writer"))
            .spawn(move || -> Result<usize> {
                let mut out = BufWriter::new(file);
                let mut written = 0;
                for lyric in rx_lyric {
                    serde_json::to_writer(&mut out, &lyric)?;
                    out.write_all(b"\n")?;
                    written += 1;
                    if checkpoint_every > 0 && written % checkpoint_every == 0 {
                        out.flush()?;
                        log::info!("Checkpoint, {written} lyrics written");
                    }
                }
                out.flush()?;
                Ok(written)
            })?;

        Ok(Self {
            path,
            tx_lyric,
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sender(&self) -> &Sender<RawLyric> {
        &self.tx_lyric
    }

    /// Waits for every sent record to be written, returns how many were.
    pub fn finish(self) -> Result<usize> {
        let Self {
            path,
            tx_lyric,
            writer,
        } = self;
        drop(tx_lyric);

        let written = writer
            .join()
            .map_err(|_| anyhow!("Lyric writer thread panicked"))??;
        log::info!("Wrote {written} lyrics to {}", path.display());
        Ok(written)
    }
}
