use crate::knowledge::KnowledgeEntry;

/// Outcome of matching a question against a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// The highest-scoring entry (first in corpus order on ties).
    Matched(&'a KnowledgeEntry),
    /// Every entry scored zero.
    NoMatch,
}

impl<'a> MatchResult<'a> {
    /// The matched entry, if any.
    pub fn entry(&self) -> Option<&'a KnowledgeEntry> {
        match self {
            MatchResult::Matched(entry) => Some(entry),
            MatchResult::NoMatch => None,
        }
    }

    /// Returns `true` for [`MatchResult::Matched`].
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }
}

/// Number of the entry's keywords contained in `normalized_query`.
///
/// `normalized_query` must already be lower-cased. Each keyword counts at
/// most once, however often it occurs in the query.
pub fn score(entry: &KnowledgeEntry, normalized_query: &str) -> usize {
    entry
        .keywords
        .iter()
        .filter(|keyword| normalized_query.contains(keyword.to_lowercase().as_str()))
        .count()
}

/// Pick the entry whose keywords best cover `query`.
///
/// The query is lower-cased and compared by plain substring containment: no
/// trimming, punctuation stripping or stemming. An entry only replaces the
/// running best when its score is strictly greater, so ties go to the
/// earliest entry. A best score of zero (empty corpus, empty query, no
/// keyword present) is [`MatchResult::NoMatch`].
pub fn find_best_match<'a>(query: &str, entries: &'a [KnowledgeEntry]) -> MatchResult<'a> {
    let normalized = query.to_lowercase();
    let mut best: Option<&'a KnowledgeEntry> = None;
    let mut highest = 0;

    for entry in entries {
        let entry_score = score(entry, &normalized);
        if entry_score > highest {
            highest = entry_score;
            best = Some(entry);
        }
    }

    match best {
        Some(entry) => MatchResult::Matched(entry),
        None => MatchResult::NoMatch,
    }
}
