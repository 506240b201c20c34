use anyhow::{anyhow, bail, Result};
use lazy_static::lazy_static;
use regex::Regex;
use select::document::Document;
use select::node::Node;
use select::predicate::{Class, Name, Predicate};

use crate::config::{CleanerConfig, ContainerSelector, Substitution};

lazy_static! {
    static ref DEFAULT_NORMALIZER: Normalizer = Normalizer::new(&CleanerConfig::default())
        .expect("Default cleaner config is valid");
    static ref MANY_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Normalizes `raw` with the default Mojim rules.
///
/// Returns `None` when `raw` has no `dd.fsZx3` lyric container.
pub fn normalize(raw: &str) -> Option<String> {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Compiled form of a [`CleanerConfig`].
///
/// Turning a raw lyric fragment into plain text goes through these steps, in
/// this order:
///
/// 1. parse the fragment and locate the container element
/// 2. join the serialized children of the container with `\n`
/// 3. apply the literal substitutions
/// 4. remove the boilerplate line pair
/// 5. trim every line
/// 6. drop every line matching one of the line patterns
/// 7. collapse `\n\n` into `\n`, then runs of 3 or more `\n` into `\n\n`
/// 8. trim the whole text
///
/// Steps 3 to 8 are exposed on their own as [`Normalizer::clean_text`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    container: ContainerSelector,
    substitutions: Vec<Substitution>,
    boilerplate: Option<Regex>,
    drop_lines: Vec<Regex>,
}

impl Normalizer {
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        if config.container.tag.is_empty() || config.container.class.is_empty() {
            bail!("Invalid container selector: {:?}", config.container);
        }
        if let Some(sub) = config.substitutions.iter().find(|sub| sub.from.is_empty()) {
            bail!("Invalid substitution, nothing to replace with {:?}", sub.to);
        }

        let boilerplate = config
            .boilerplate
            .as_deref()
            .map(compile)
            .transpose()?;

        let drop_lines = config
            .drop_lines
            .iter()
            .map(|pattern| compile(pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            container: ContainerSelector {
                tag: config.container.tag.to_ascii_lowercase(),
                class: config.container.class.clone(),
            },
            substitutions: config.substitutions.clone(),
            boilerplate,
            drop_lines,
        })
    }

    pub fn normalize(&self, raw: &str) -> Option<String> {
        self.container_text(raw).map(|text| self.clean_text(&text))
    }

    /// Serialized children of the first container element, one per line.
    ///
    /// Text nodes contribute their text as is, elements are re-serialized as
    /// HTML so that inline markup is still visible to the line patterns.
    pub fn container_text(&self, raw: &str) -> Option<String> {
        let document = Document::from(raw);
        let predicate =
            Name(self.container.tag.as_str()).and(Class(self.container.class.as_str()));

        let container = match document.find(predicate).next() {
            Some(container) => container,
            None => {
                log::debug!(
                    "No {}.{} element found",
                    self.container.tag,
                    self.container.class
                );
                return None;
            }
        };

        let children = container.children().map(serialize).collect::<Vec<_>>();
        Some(children.join("\n"))
    }

    /// Steps 3 to 8 on already extracted text.
    ///
    /// Removals are repeated until nothing else goes away, since dropping a
    /// line can bring the two halves of a boilerplate pair together. Cleaning
    /// the output again leaves it unchanged.
    pub fn clean_text(&self, text: &str) -> String {
        let mut text = text.to_string();
        loop {
            let next = self.strip(&text);
            if next.len() < text.len() {
                text = next;
            } else {
                text = next;
                break;
            }
        }

        let text = text.replace("\n\n", "\n");
        let text = MANY_NEWLINES.replace_all(&text, "\n\n");

        text.trim().to_string()
    }

    fn strip(&self, text: &str) -> String {
        let text = self
            .substitutions
            .iter()
            .fold(text.to_string(), |text, sub| text.replace(&sub.from, &sub.to));

        let text = match &self.boilerplate {
            Some(re) => re.replace_all(&text, "").into_owned(),
            None => text,
        };

        text.split('\n')
            .map(str::trim)
            .filter(|line| !self.drop_lines.iter().any(|re| re.is_match(line)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| anyhow!("Invalid pattern {pattern:?} got: {e}"))
}

fn serialize(node: Node) -> String {
    if let Some(text) = node.as_text() {
        text.to_string()
    } else if let Some(comment) = node.as_comment() {
        comment.to_string()
    } else {
        node.html()
    }
}
