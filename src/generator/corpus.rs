use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/corpora/"]
struct CorpusAssets;

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("unknown corpus `{0}`")]
    UnknownCorpus(String),

    #[error("failed to read corpus file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus `{name}` is not valid corpus JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusKind {
    Words,
    Sentences,
}

/// A user word list referenced from the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCorpus {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub sentences: bool,
}

#[derive(Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub kind: CorpusKind,
    entries: Vec<String>,
}

#[derive(Deserialize)]
struct CorpusFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: Option<CorpusKind>,
    #[serde(alias = "Words", alias = "words")]
    entries: Vec<String>,
}

/// Collapses whitespace runs to single spaces so the target text never
/// holds tabs or newlines.
fn normalize_entry(raw: &str) -> Option<String> {
    let entry = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!entry.is_empty()).then_some(entry)
}

impl Corpus {
    pub fn new(name: impl Into<String>, kind: CorpusKind, entries: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            kind,
            entries: entries
                .into_iter()
                .filter_map(|e| normalize_entry(&e))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn from_json(name: &str, content: &str) -> Result<CorpusFile, CorpusError> {
        serde_json::from_str(content).map_err(|source| CorpusError::Parse {
            name: name.to_string(),
            source,
        })
    }

    /// Loads a local list: JSON `{"entries": [...]}` when the file ends in
    /// `.json`, otherwise one entry per line.
    pub fn load_local(local: &LocalCorpus) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(&local.path).map_err(|source| CorpusError::Io {
            path: local.path.clone(),
            source,
        })?;
        let kind = if local.sentences {
            CorpusKind::Sentences
        } else {
            CorpusKind::Words
        };

        let entries = if is_json(&local.path) {
            Self::from_json(&local.name, &content)?.entries
        } else {
            content.lines().map(str::to_string).collect()
        };
        Ok(Self::new(local.name.clone(), kind, entries))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Every corpus the app knows about, bundled ones first.
#[derive(Clone, Debug, Default)]
pub struct CorpusRegistry {
    corpora: Vec<Corpus>,
}

impl CorpusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedded() -> Result<Self, CorpusError> {
        let mut registry = Self::new();
        let mut files: Vec<_> = CorpusAssets::iter().collect();
        files.sort();
        for file in files {
            let Some(asset) = CorpusAssets::get(&file) else {
                continue;
            };
            let content = String::from_utf8_lossy(&asset.data);
            let parsed = Corpus::from_json(&file, &content)?;
            let name = parsed
                .name
                .unwrap_or_else(|| file.trim_end_matches(".json").to_string());
            let kind = parsed.kind.unwrap_or(CorpusKind::Words);
            let corpus = Corpus::new(name, kind, parsed.entries);
            tracing::debug!(corpus = %corpus.name, entries = corpus.len(), "loaded bundled corpus");
            registry.insert(corpus);
        }
        Ok(registry)
    }

    /// Loads user lists, skipping (and logging) files that fail to load so one
    /// broken path does not hide the rest.
    pub fn load_local(&mut self, locals: &[LocalCorpus]) -> Vec<CorpusError> {
        let mut errors = Vec::new();
        for local in locals {
            match Corpus::load_local(local) {
                Ok(corpus) => {
                    tracing::debug!(corpus = %corpus.name, entries = corpus.len(), "loaded local corpus");
                    self.insert(corpus);
                }
                Err(err) => {
                    tracing::warn!(%err, "skipping local corpus");
                    errors.push(err);
                }
            }
        }
        errors
    }

    /// Adds a corpus, replacing any existing one with the same name.
    pub fn insert(&mut self, corpus: Corpus) {
        match self.corpora.iter_mut().find(|c| c.name == corpus.name) {
            Some(existing) => *existing = corpus,
            None => self.corpora.push(corpus),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Corpus, CorpusError> {
        self.corpora
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CorpusError::UnknownCorpus(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Corpus> {
        self.corpora.iter()
    }

    /// Names of corpora of `kind` (any kind when `None`), in registry order.
    pub fn names(&self, kind: Option<CorpusKind>) -> Vec<String> {
        self.corpora
            .iter()
            .filter(|c| kind.is_none_or(|k| c.kind == k))
            .map(|c| c.name.clone())
            .collect()
    }
}
