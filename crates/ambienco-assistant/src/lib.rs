//! Rule-based lighting assistant.
//!
//! Picks a canned answer from a fixed knowledge base by counting how many of
//! an entry's keywords occur in the visitor's question, and applies the
//! widget's reply policy on top (default answer, follow-up suggestions,
//! pacing).
//!
//! # Main types
//!
//! - [`KnowledgeEntry`]: One keywords/category/response/follow-ups record.
//! - [`Corpus`]: The immutable, ordered knowledge base.
//! - [`MatchResult`]: Outcome of [`find_best_match`]: an entry or `NoMatch`.
//! - [`Assistant`]: Reply service used by the gateway and the CLI.
//! - [`AssistantReply`]: What the visitor sees for one question.

/// Reply policy built on top of the matcher.
pub mod assistant;
/// The retailer's default knowledge base.
pub mod builtin;
/// Knowledge entries and corpus loading.
pub mod knowledge;
/// Keyword scoring and best-entry selection.
pub mod matcher;

pub use assistant::{format_follow_ups, Assistant, AssistantReply, Pacing};
pub use knowledge::{Corpus, KnowledgeEntry};
pub use matcher::{find_best_match, score, MatchResult};
