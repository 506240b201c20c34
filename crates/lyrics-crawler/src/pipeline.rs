use anyhow::{anyhow, Result};
use lyrics_clean::Normalizer;

use crate::clean::{clean_records, load_exclude_list, CleanStats};
use crate::config::CrawlerConfig;
use crate::crawler::{harvest_artists, harvest_lyrics, harvest_songs};
use crate::store::{write_jsonl, LyricWriter, Store};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Reuse the stored song list and skip already scraped songs
    pub resume: bool,
    /// Only combine and clean what previous runs scraped
    pub combine_only: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            resume: true,
            combine_only: false,
        }
    }
}

/// Scrapes lyrics into the store, then writes the cleaned corpus to
/// `config.output_file`.
pub async fn crawl_site(config: &CrawlerConfig, opts: RunOptions) -> Result<CleanStats> {
    let store = Store::open(&config.store_dir)?;
    let normalizer = Normalizer::new(&config.cleaner)?;

    if !opts.combine_only {
        scrape(config, &store, opts.resume).await?;
    }

    let records = store.combine()?;
    let exclude = load_exclude_list(&config.exclude_list)?;
    let (cleaned, stats) = clean_records(records, &normalizer, &exclude);

    write_jsonl(&config.output_file, &cleaned)?;
    log::info!(
        "Wrote {} cleaned lyrics to {}",
        cleaned.len(),
        config.output_file.display()
    );

    Ok(stats)
}

async fn scrape(config: &CrawlerConfig, store: &Store, resume: bool) -> Result<()> {
    let songs = match store.load_songs()? {
        Some(songs) if resume => {
            log::info!(
                "Using previously harvested song list {}",
                store.song_list_path().display()
            );
            songs
        }
        _ => {
            log::info!("Harvesting new song list");
            let artists = harvest_artists(config).await?;
            let songs = harvest_songs(config, &artists).await?;
            store.save_songs(&songs)?;
            log::info!("Saved song list to {}", store.song_list_path().display());
            songs
        }
    };
    log::info!("Song list contains {} songs", songs.len());

    let ignore = store.previously_scraped()?;
    if ignore.is_empty() {
        log::info!("No previously scraped lyrics, starting from scratch");
    } else {
        log::info!("Found {} previously scraped URLs", ignore.len());
    }

    let writer = LyricWriter::spawn(store.new_run_path(), config.checkpoint_every)?;
    let harvested = harvest_lyrics(config, songs, &ignore, writer.sender()).await;
    let written = writer.finish()?;
    let stats = harvested?;

    if stats.interrupted {
        return Err(anyhow!(
            "Interrupted after {written} lyrics, run again to resume"
        ));
    }

    Ok(())
}
