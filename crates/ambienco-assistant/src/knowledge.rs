use crate::matcher::{find_best_match, MatchResult};
use ambienco_core::{AmbiencoError, AmbiencoResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One record of the assistant's knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Match tokens, compared case-insensitively by substring containment.
    pub keywords: Vec<String>,
    /// Display/analytics label. Has no effect on matching.
    pub category: String,
    /// Returned verbatim when this entry wins.
    pub response: String,
    /// Suggested next questions, shown after the response.
    #[serde(default, alias = "followUp", alias = "follow_up")]
    pub follow_ups: Vec<String>,
}

impl KnowledgeEntry {
    /// Creates an entry without follow-ups.
    pub fn new<I, S>(keywords: I, category: impl Into<String>, response: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            category: category.into(),
            response: response.into(),
            follow_ups: Vec::new(),
        }
    }

    /// Attaches follow-up suggestions.
    pub fn with_follow_ups<I, S>(mut self, follow_ups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.follow_ups = follow_ups.into_iter().map(Into::into).collect();
        self
    }

    fn validate(&self, index: usize) -> AmbiencoResult<()> {
        if self.keywords.is_empty() {
            return Err(AmbiencoError::Validation(format!(
                "entry {index} ({}) has no keywords",
                self.category
            )));
        }
        if let Some(pos) = self.keywords.iter().position(String::is_empty) {
            return Err(AmbiencoError::Validation(format!(
                "entry {index} ({}) has an empty keyword at position {pos}",
                self.category
            )));
        }
        if self.response.is_empty() {
            return Err(AmbiencoError::Validation(format!(
                "entry {index} ({}) has an empty response",
                self.category
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CorpusFile {
    #[serde(default)]
    entries: Vec<KnowledgeEntry>,
}

/// The ordered, immutable knowledge base searched by the assistant.
///
/// Order only matters as the tie-break: among entries with the same best
/// score, the earliest wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<KnowledgeEntry>,
}

impl Corpus {
    /// Build a corpus, rejecting entries without keywords, with an empty
    /// keyword, or with an empty response.
    pub fn new(entries: Vec<KnowledgeEntry>) -> AmbiencoResult<Self> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate(index)?;
        }
        Ok(Self { entries })
    }

    /// The retailer's lighting knowledge base.
    pub fn builtin() -> Self {
        Self {
            entries: crate::builtin::lighting_entries(),
        }
    }

    /// Parse `[[entries]]` tables from TOML.
    pub fn from_toml_str(source: &str) -> AmbiencoResult<Self> {
        let file: CorpusFile = toml::from_str(source)
            .map_err(|e| AmbiencoError::Config(format!("Invalid corpus TOML: {e}")))?;
        Self::new(file.entries)
    }

    /// Parse a JSON array of entries.
    pub fn from_json_str(source: &str) -> AmbiencoResult<Self> {
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(source)?;
        Self::new(entries)
    }

    /// Load a corpus file. `.json` files are read as a JSON array, anything
    /// else as TOML.
    pub fn load(path: &Path) -> AmbiencoResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            AmbiencoError::Config(format!("Failed to read corpus '{}': {e}", path.display()))
        })?;
        let corpus = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source)?,
            _ => Self::from_toml_str(&source)?,
        };
        info!(path = %path.display(), entries = corpus.len(), "Corpus loaded");
        Ok(corpus)
    }

    /// Entries in corpus order.
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the corpus has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match `query` against this corpus. See [`find_best_match`].
    pub fn best_match(&self, query: &str) -> MatchResult<'_> {
        find_best_match(query, &self.entries)
    }
}
