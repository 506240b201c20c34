mod clean;
mod config;
mod crawler;
mod pipeline;
mod record;
mod site;
mod store;

pub use clean::{clean_records, load_exclude_list, CleanStats};
pub use config::{CrawlerConfig, OnError, SiteSelectors};
pub use crawler::{
    decode, download, harvest_artists, harvest_lyrics, harvest_songs, resolve, HarvestStats,
};
pub use pipeline::{crawl_site, RunOptions};
pub use record::{Artist, CleanedLyric, RawLyric, Song};
pub use site::{extract_lyric_block, parse_artists, parse_songs};
pub use store::{read_jsonl, write_jsonl, LyricWriter, Store};

pub use anyhow;
pub use lyrics_clean;
