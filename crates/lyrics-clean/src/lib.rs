//! Turns the lyric block of a scraped page into plain text.
//!
//! ```
//! let raw = r#"<dd class="fsZx3">作词：张三<br/>第一句歌词<br/>----<br/>第二句歌词</dd>"#;
//! assert_eq!(Some("第一句歌词\n第二句歌词".to_string()), lyrics_clean::normalize(raw));
//! ```

mod config;
mod normalizer;

pub use config::{CleanerConfig, ContainerSelector, Substitution};
pub use normalizer::{normalize, Normalizer};
