use lyrics_clean::ContainerSelector;
use select::document::Document;
use select::predicate::{Class, Name, Predicate};

use crate::config::SiteSelectors;
use crate::record::{Artist, Song};

fn matching(sel: &ContainerSelector) -> impl Predicate + '_ {
    Name(sel.tag.as_str()).and(Class(sel.class.as_str()))
}

/// Artists of a listing page, the first link of every item of the list.
pub fn parse_artists(page: &str, selectors: &SiteSelectors) -> Vec<Artist> {
    let document = Document::from(page);

    let list = match document.find(matching(&selectors.artist_list)).next() {
        Some(list) => list,
        None => return vec![],
    };

    list.children()
        .filter(|item| item.name().is_some())
        .filter_map(|item| item.children().find(|link| link.name().is_some()))
        .filter_map(|link| {
            let link_url = link.attr("href")?;
            Some(Artist {
                link_title: link.attr("title").map(String::from),
                link_url: link_url.to_string(),
                artist_name: link.text().trim().to_string(),
            })
        })
        .collect()
}

pub fn parse_songs(page: &str, artist: &Artist, selectors: &SiteSelectors) -> Vec<Song> {
    let document = Document::from(page);

    document
        .find(matching(&selectors.song_box).descendant(Name("a")))
        .filter_map(|link| {
            let song_url = link.attr("href")?;
            Some(Song {
                artist_name: artist.artist_name.clone(),
                artist_url: artist.link_url.clone(),
                song_url: song_url.to_string(),
                song_name: link.text().trim().to_string(),
            })
        })
        .collect()
}

/// Serialized HTML of the lyric block, container element included.
pub fn extract_lyric_block(page: &str, selectors: &SiteSelectors) -> Option<String> {
    let document = Document::from(page);
    let block = document.find(matching(&selectors.lyric_block)).next()?;
    Some(block.html())
}
