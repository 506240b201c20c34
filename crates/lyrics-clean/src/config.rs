use serde::{Deserialize, Serialize};

/// Tag and class pair identifying an element, e.g. `dd.fsZx3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSelector {
    pub tag: String,
    pub class: String,
}

impl ContainerSelector {
    pub fn new(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class: class.to_string(),
        }
    }
}

impl Default for ContainerSelector {
    fn default() -> Self {
        Self::new("dd", "fsZx3")
    }
}

/// A literal, global replacement applied before any pattern rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl Substitution {
    pub fn remove(from: &str) -> Self {
        Self::replace(from, "")
    }

    pub fn replace(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanerConfig {
    #[serde(default)]
    pub container: ContainerSelector,

    #[serde(default = "default_substitutions")]
    pub substitutions: Vec<Substitution>,

    #[serde(default = "default_boilerplate")]
    pub boilerplate: Option<String>,

    /// Line patterns, a line matching any of them is dropped
    #[serde(default = "default_drop_lines")]
    pub drop_lines: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            container: ContainerSelector::default(),
            substitutions: default_substitutions(),
            boilerplate: default_boilerplate(),
            drop_lines: default_drop_lines(),
        }
    }
}

fn default_substitutions() -> Vec<Substitution> {
    vec![
        Substitution::remove("<br/>"),
        Substitution::remove("<br>"),
        Substitution::remove("#"),
        Substitution::remove("*"),
        Substitution::replace("\u{3000}", " "),
        Substitution::remove("＃"),
        Substitution::remove("＊"),
    ]
}

fn default_boilerplate() -> Option<String> {
    Some(String::from(r"(?m)^更.+\n.+</a>$"))
}

fn default_drop_lines() -> Vec<String> {
    vec![
        // credits: 作词：..., 作曲:..., 编曲：...
        String::from(r"[:：]"),
        // separators, including empty lines
        String::from(r"^-*$"),
        String::from(r"<[A-Za-z]+>"),
    ]
}
