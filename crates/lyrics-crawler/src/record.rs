use serde::{Deserialize, Serialize};

/// An entry of an artist listing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Artist {
    pub link_title: Option<String>,
    pub link_url: String,
    pub artist_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Song {
    pub artist_name: String,
    pub artist_url: String,
    pub song_url: String,
    pub song_name: String,
}

/// A song with the untouched HTML of its lyric block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawLyric {
    pub artist_name: String,
    pub artist_url: String,
    pub song_url: String,
    pub song_name: String,
    pub song_lyrics: Option<String>,
}

impl RawLyric {
    pub fn new(song: Song, song_lyrics: Option<String>) -> Self {
        let Song {
            artist_name,
            artist_url,
            song_url,
            song_name,
        } = song;
        Self {
            artist_name,
            artist_url,
            song_url,
            song_name,
            song_lyrics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CleanedLyric {
    pub artist_name: String,
    pub artist_url: String,
    pub song_url: String,
    pub song_name: String,
    pub cleaned_lyrics: String,
}

impl CleanedLyric {
    pub fn new(raw: RawLyric, cleaned_lyrics: String) -> Self {
        Self {
            artist_name: raw.artist_name,
            artist_url: raw.artist_url,
            song_url: raw.song_url,
            song_name: raw.song_name,
            cleaned_lyrics,
        }
    }
}
