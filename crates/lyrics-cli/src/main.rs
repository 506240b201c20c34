use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use lyrics_crawler::lyrics_clean::Normalizer;
use lyrics_crawler::{crawl_site, extract_lyric_block, CrawlerConfig, OnError, RunOptions};
use tokio::runtime;

/// Mojim lyrics scraper
#[derive(Debug, Parser)]
#[command(name = "lyrics", version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[command(name = "scrape")]
    Scrape(ScrapeArgs),
    #[command(name = "clean")]
    Clean(CleanArgs),
    #[command(hide = true)]
    Completion,
}

/// Scrape artists, songs and lyrics then write the cleaned corpus
#[derive(Debug, clap::Args)]
pub struct ScrapeArgs {
    /// Optional yaml configuration file
    #[arg(env = "LYRICS_CONFIG", long)]
    pub config: Option<PathBuf>,
    /// Harvest a new song list instead of reusing the stored one
    #[arg(long)]
    pub fresh: bool,
    /// Skip scraping, only combine and clean previously scraped lyrics
    #[arg(long)]
    pub combine_only: bool,
    /// Override the directory keeping the song list and raw lyrics
    #[arg(long)]
    pub store_dir: Option<PathBuf>,
    /// Override the path of the cleaned lyrics jsonl file
    #[arg(long, short)]
    pub output_file: Option<PathBuf>,
    /// Override the path of the excluded lyrics file
    #[arg(long)]
    pub exclude_list: Option<PathBuf>,
    /// Override crawler's user agent
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Override crawler's maximum concurrent page downloads
    #[arg(long)]
    pub concurrent_downloads: Option<usize>,
    /// Override crawler's download error handling strategy
    #[arg(value_enum, long)]
    pub on_dl_error: Option<OnError>,
    /// Override crawler's decoding error handling strategy
    #[arg(value_enum, long)]
    pub on_decode_error: Option<OnError>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CrawlerConfig> {
    match path {
        Some(path) => Ok(serde_yaml::from_reader(File::open(path)?)?),
        None => Ok(CrawlerConfig::default()),
    }
}

impl TryFrom<&ScrapeArgs> for CrawlerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &ScrapeArgs) -> Result<Self, Self::Error> {
        let mut conf = load_config(args.config.as_deref())?;
        if let Some(store_dir) = &args.store_dir {
            conf.store_dir = store_dir.clone();
        }
        if let Some(output_file) = &args.output_file {
            conf.output_file = output_file.clone();
        }
        if let Some(exclude_list) = &args.exclude_list {
            conf.exclude_list = exclude_list.clone();
        }
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(concurrent_downloads) = args.concurrent_downloads {
            conf.concurrent_downloads = concurrent_downloads;
        }
        if let Some(on_dl_error) = args.on_dl_error {
            conf.on_dl_error = on_dl_error;
        }
        if let Some(on_decode_error) = args.on_decode_error {
            conf.on_decode_error = on_decode_error;
        }
        Ok(conf)
    }
}

pub fn scrape(args: ScrapeArgs) -> anyhow::Result<()> {
    let conf = (&args).try_into()?;
    let opts = RunOptions {
        resume: !args.fresh,
        combine_only: args.combine_only,
    };
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(crawl_site(&conf, opts))?;
    Ok(())
}

/// Clean the lyrics of a single page and print them to stdout
#[derive(Debug, clap::Args)]
#[command(group = clap::ArgGroup::new("page").required(true))]
pub struct CleanArgs {
    /// Optional yaml configuration file
    #[arg(env = "LYRICS_CONFIG", long)]
    pub config: Option<PathBuf>,
    /// A local html page or lyric block
    #[arg(group = "page", long)]
    pub file: Option<PathBuf>,
    /// A distant html page
    #[arg(group = "page", long)]
    pub url: Option<String>,
    /// Custom user agent to download the page
    #[arg(long, conflicts_with = "file")]
    pub ua: Option<String>,
}

pub fn clean(args: CleanArgs) -> anyhow::Result<()> {
    let conf = load_config(args.config.as_deref())?;

    let page = if let Some(url) = args.url {
        let client = reqwest::blocking::ClientBuilder::new()
            .user_agent(args.ua.unwrap_or(conf.user_agent))
            .build()?;
        client.get(&url).send()?.error_for_status()?.text()?
    } else if let Some(path) = args.file {
        fs::read_to_string(&path)?
    } else {
        anyhow::bail!("Missing `url` or `file`");
    };

    let block = extract_lyric_block(&page, &conf.selectors).unwrap_or(page);
    let normalizer = Normalizer::new(&conf.cleaner)?;
    match normalizer.normalize(&block) {
        Some(lyrics) => {
            println!("{lyrics}");
            Ok(())
        }
        None => anyhow::bail!(
            "No lyrics found, missing {}.{} element",
            conf.cleaner.container.tag,
            conf.cleaner.container.class
        ),
    }
}

fn init_logs(filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Scrape(args) => {
            if !args.quiet {
                init_logs("lyrics_crawler=info,lyrics_clean=warn");
            }
            scrape(args)
        }
        SubCommand::Clean(args) => {
            init_logs("lyrics_clean=warn");
            clean(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "lyrics", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let conf_file = dir.path().join("lyrics.yaml");
        fs::write(
            &conf_file,
            "concurrentDownloads: 2\nuserAgent: from-file\nonDlError: fail\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "lyrics",
            "scrape",
            "--config",
            conf_file.to_str().unwrap(),
            "--concurrent-downloads",
            "8",
            "--on-decode-error",
            "fail",
            "--store-dir",
            "cache",
            "--fresh",
        ])
        .unwrap();

        let args = match args.cmd {
            SubCommand::Scrape(args) => args,
            cmd => panic!("Unexpected command {cmd:?}"),
        };
        assert!(args.fresh);
        assert!(!args.combine_only);

        let conf = CrawlerConfig::try_from(&args).unwrap();
        assert_eq!(8, conf.concurrent_downloads);
        assert_eq!("from-file", conf.user_agent);
        assert_eq!(OnError::Fail, conf.on_dl_error);
        assert_eq!(OnError::Fail, conf.on_decode_error);
        assert_eq!(PathBuf::from("cache"), conf.store_dir);
    }

    #[test]
    fn clean_requires_a_page() {
        assert!(Args::try_parse_from(["lyrics", "clean"]).is_err());
        assert!(Args::try_parse_from(["lyrics", "clean", "--file", "a.html"]).is_ok());
        assert!(Args::try_parse_from(["lyrics", "clean", "--file", "a", "--url", "b"]).is_err());
    }

    #[test]
    fn clean_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(
            &page,
            r#"<div class="fsZ"><dd class="fsZx3">作词：张三<br/>第一句歌词</dd></div>"#,
        )
        .unwrap();

        let args = CleanArgs {
            config: None,
            file: Some(page),
            url: None,
            ua: None,
        };
        assert!(clean(args).is_ok());
    }

    #[test]
    fn clean_without_lyrics_fails() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<div>no lyrics here</div>").unwrap();

        let args = CleanArgs {
            config: None,
            file: Some(page),
            url: None,
            ua: None,
        };
        assert!(clean(args).is_err());
    }
}
