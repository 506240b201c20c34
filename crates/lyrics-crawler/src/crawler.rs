use std::collections::HashSet;
use std::future::Future;

use anyhow::{anyhow, Error, Result};
use crossbeam_channel::Sender;
use futures::{future, stream, StreamExt, TryStreamExt};
use lazy_static::lazy_static;
use reqwest::header::USER_AGENT;
use reqwest::Url;

use crate::config::{CrawlerConfig, OnError};
use crate::record::{Artist, RawLyric, Song};
use crate::site::{extract_lyric_block, parse_artists, parse_songs};

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
}

pub async fn download(config: &CrawlerConfig, url: &str) -> Result<Vec<u8>> {
    let resp = HTTP_CLI
        .get(url)
        .header(USER_AGENT, &config.user_agent)
        .send()
        .await?
        .error_for_status()?;

    Ok(resp.bytes().await?.to_vec())
}

pub fn decode(url: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| anyhow!("Failed to decode {url} got: {e}"))
}

/// Absolute URL of a link found on the site.
pub fn resolve(base_url: &str, link: &str) -> Result<String> {
    let url = Url::parse(base_url)
        .and_then(|base| base.join(link))
        .map_err(|e| anyhow!("Invalid link {link:?} from {base_url} got: {e}"))?;
    Ok(url.into())
}

/// Resolves, downloads and decodes `link`, `None` when the page is skipped.
///
/// An invalid link is handled like a failed download.
async fn fetch_page(config: &CrawlerConfig, link: &str) -> Result<Option<String>> {
    let url = match resolve(&config.base_url, link) {
        Ok(url) => url,
        Err(e) => match config.on_dl_error {
            OnError::SkipAndLog => {
                log::warn!("Skipping link: {e}");
                return Ok(None);
            }
            OnError::Fail => return Err(e),
        },
    };
    let url = url.as_str();

    let bytes = match download(config, url).await {
        Ok(bytes) => bytes,
        Err(e) => match config.on_dl_error {
            OnError::SkipAndLog => {
                log::warn!("Skipping URL: {url} got: {e}");
                return Ok(None);
            }
            OnError::Fail => return Err(anyhow!("Couldn't download {url} got: {e}")),
        },
    };

    match decode(url, bytes) {
        Ok(page) => Ok(Some(page)),
        Err(e) => match config.on_decode_error {
            OnError::SkipAndLog => {
                log::warn!("Skipping page: {e}");
                Ok(None)
            }
            OnError::Fail => Err(e),
        },
    }
}

fn until_err<T, E>(
    err: &mut &mut Result<(), E>,
    item: Result<T, E>,
) -> impl Future<Output = Option<T>> {
    match item {
        Ok(item) => future::ready(Some(item)),
        Err(e) => {
            **err = Err(e);
            future::ready(None)
        }
    }
}

pub async fn harvest_artists(config: &CrawlerConfig) -> Result<Vec<Artist>> {
    let mut artists = vec![];

    for url in &config.start_urls {
        if let Some(page) = fetch_page(config, url).await? {
            let found = parse_artists(&page, &config.selectors);
            if found.is_empty() {
                log::warn!("No artist found on {url}");
            }
            artists.extend(found);
        }
    }

    log::info!("Found {} artists", artists.len());
    Ok(artists)
}

pub async fn harvest_songs(config: &CrawlerConfig, artists: &[Artist]) -> Result<Vec<Song>> {
    let pages = stream::iter(artists)
        .map(|artist| async move {
            let page = fetch_page(config, &artist.link_url).await?;
            Ok::<_, Error>((artist, page))
        })
        .buffered(config.concurrent_downloads.max(1))
        .try_collect::<Vec<_>>()
        .await?;

    let songs = pages
        .into_iter()
        .filter_map(|(artist, page)| page.map(|page| (artist, page)))
        .flat_map(|(artist, page)| parse_songs(&page, artist, &config.selectors))
        .collect::<Vec<_>>();

    log::info!("Found {} songs", songs.len());
    Ok(songs)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HarvestStats {
    /// Records sent, with or without a lyric block
    pub scraped: usize,
    /// Songs without a lyric block
    pub missing: usize,
    /// Songs in the ignore set
    pub ignored: usize,
    /// Songs whose link was invalid or whose page couldn't be downloaded or
    /// decoded
    pub failed: usize,
    pub interrupted: bool,
}

/// Downloads the page of every song not in `ignore` and sends its raw lyric
/// record to `tx_lyric`.
///
/// Stops early, without error, on SIGINT.
pub async fn harvest_lyrics(
    config: &CrawlerConfig,
    songs: Vec<Song>,
    ignore: &HashSet<String>,
    tx_lyric: &Sender<RawLyric>,
) -> Result<HarvestStats> {
    let total = songs.len();
    let pending = songs
        .into_iter()
        .enumerate()
        .filter(|(_, song)| !ignore.contains(&song.song_url))
        .collect::<Vec<_>>();

    let mut stats = HarvestStats {
        ignored: total - pending.len(),
        ..Default::default()
    };
    if stats.ignored > 0 {
        log::info!("Ignoring {} previously scraped songs", stats.ignored);
    }

    let mut err = Ok::<(), Error>(());

    let interrupted = {
        let sigint = async {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted, stopping downloads");
            } else {
                future::pending::<()>().await;
            }
        };

        let pages = stream::iter(pending)
            .map(|(index, song)| async move {
                if config.progress_every > 0 && index % config.progress_every == 0 {
                    log::info!("Scraping song {index}/{total}");
                }
                let page = fetch_page(config, &song.song_url).await?;
                Ok::<_, Error>((song, page))
            })
            .buffer_unordered(config.concurrent_downloads.max(1))
            .scan(&mut err, until_err)
            .take_until(sigint);
        futures::pin_mut!(pages);

        while let Some((song, page)) = pages.next().await {
            let page = match page {
                Some(page) => page,
                None => {
                    stats.failed += 1;
                    continue;
                }
            };

            let song_lyrics = extract_lyric_block(&page, &config.selectors);
            if song_lyrics.is_none() {
                log::debug!("No lyric block for {}", song.song_url);
                stats.missing += 1;
            }

            tx_lyric
                .send(RawLyric::new(song, song_lyrics))
                .map_err(|e| anyhow!("Couldn't send lyric: {e}"))?;
            stats.scraped += 1;
        }

        pages.is_stopped()
    };

    err?;
    stats.interrupted = interrupted;

    log::info!(
        "Scraped {} songs ({} without lyrics, {} failed)",
        stats.scraped,
        stats.missing,
        stats.failed
    );
    Ok(stats)
}
