use std::path::PathBuf;

use lyrics_clean::{CleanerConfig, ContainerSelector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Listing pages of popular artists
    #[serde(default = "default_start_urls")]
    pub start_urls: Vec<String>,

    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,

    /// Number of lyric records between two flushes of the run file
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,

    #[serde(default = "default_progress_every")]
    pub progress_every: usize,

    #[serde(default = "default_on_dl_error")]
    pub on_dl_error: OnError,

    #[serde(default = "default_on_decode_error")]
    pub on_decode_error: OnError,

    #[serde(default)]
    pub selectors: SiteSelectors,

    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default = "default_exclude_list")]
    pub exclude_list: PathBuf,

    #[serde(default)]
    pub cleaner: CleanerConfig,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            base_url: default_base_url(),
            start_urls: default_start_urls(),
            concurrent_downloads: default_concurrent_downloads(),
            checkpoint_every: default_checkpoint_every(),
            progress_every: default_progress_every(),
            on_dl_error: default_on_dl_error(),
            on_decode_error: default_on_decode_error(),
            selectors: SiteSelectors::default(),
            store_dir: default_store_dir(),
            output_file: default_output_file(),
            exclude_list: default_exclude_list(),
            cleaner: CleanerConfig::default(),
        }
    }
}

fn default_user_agent() -> String {
    String::from(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/80.0.3987.132 Safari/537.36",
    )
}

fn default_base_url() -> String {
    String::from("https://mojim.com/")
}

fn default_start_urls() -> Vec<String> {
    // male, female and group artists
    ["cnza2.htm", "cnzb2.htm", "cnzc2.htm"]
        .iter()
        .map(|page| format!("https://mojim.com/{page}"))
        .collect()
}

fn default_concurrent_downloads() -> usize {
    4
}

fn default_checkpoint_every() -> usize {
    1_000
}

fn default_progress_every() -> usize {
    100
}

fn default_on_dl_error() -> OnError {
    OnError::SkipAndLog
}

fn default_on_decode_error() -> OnError {
    OnError::SkipAndLog
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("scraped")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("top_song_lyrics_cleaned_cn.jsonl")
}

fn default_exclude_list() -> PathBuf {
    PathBuf::from("exclude_list.txt")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}

/// Elements holding the links and lyrics on each kind of page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSelectors {
    #[serde(default = "default_artist_list")]
    pub artist_list: ContainerSelector,

    #[serde(default = "default_song_box")]
    pub song_box: ContainerSelector,

    #[serde(default = "default_lyric_block")]
    pub lyric_block: ContainerSelector,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            artist_list: default_artist_list(),
            song_box: default_song_box(),
            lyric_block: default_lyric_block(),
        }
    }
}

fn default_artist_list() -> ContainerSelector {
    ContainerSelector::new("ul", "s_listA")
}

fn default_song_box() -> ContainerSelector {
    ContainerSelector::new("span", "hc3")
}

fn default_lyric_block() -> ContainerSelector {
    ContainerSelector::new("div", "fsZ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides() {
        let conf: CrawlerConfig = serde_yaml::from_str(
            r#"
concurrentDownloads: 16
onDlError: fail
startUrls:
  - https://mojim.com/cnza1.htm
selectors:
  lyricBlock:
    tag: div
    class: lyrics
cleaner:
  container:
    tag: p
    class: body
"#,
        )
        .unwrap();

        assert_eq!(16, conf.concurrent_downloads);
        assert_eq!(OnError::Fail, conf.on_dl_error);
        assert_eq!(OnError::SkipAndLog, conf.on_decode_error);
        assert_eq!(vec!["https://mojim.com/cnza1.htm"], conf.start_urls);
        assert_eq!(ContainerSelector::new("div", "lyrics"), conf.selectors.lyric_block);
        assert_eq!(default_song_box(), conf.selectors.song_box);
        assert_eq!(ContainerSelector::new("p", "body"), conf.cleaner.container);
        assert_eq!(default_checkpoint_every(), conf.checkpoint_every);
    }

    #[test]
    fn default_start_urls_are_absolute() {
        for url in CrawlerConfig::default().start_urls {
            assert!(url.starts_with("https://mojim.com/cn"), "{url}");
        }
    }
}
