use crate::builtin::{DEFAULT_RESPONSE, GREETING, QUICK_QUESTIONS};
use crate::knowledge::Corpus;
use crate::matcher::MatchResult;
use ambienco_core::{AmbiencoError, AmbiencoResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// What the visitor sees in answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// The matched entry's response, or the default answer.
    pub response: String,
    /// Whether a knowledge entry matched.
    pub matched: bool,
    /// Category of the matched entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Follow-up suggestions, delivered after the response.
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

impl AssistantReply {
    /// The secondary follow-up message, if there is anything to suggest.
    pub fn follow_up_message(&self) -> Option<String> {
        if self.follow_ups.is_empty() {
            None
        } else {
            Some(format_follow_ups(&self.follow_ups))
        }
    }
}

/// Render follow-up suggestions as one bulleted message.
pub fn format_follow_ups(follow_ups: &[String]) -> String {
    let bullets: Vec<String> = follow_ups.iter().map(|q| format!("• {q}")).collect();
    format!("You might also be interested in:\n{}", bullets.join("\n"))
}

/// Artificial delays the chat front end applies before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    /// Minimum delay before the response.
    pub response_delay: Duration,
    /// Upper bound of the random extra delay added to `response_delay`.
    pub response_jitter: Duration,
    /// Delay between the response and the follow-up message.
    pub follow_up_delay: Duration,
}

impl Pacing {
    /// No delays at all.
    pub fn immediate() -> Self {
        Self::default()
    }

    /// Base delay plus a uniformly random share of the jitter.
    pub fn next_response_delay(&self) -> Duration {
        let jitter_ms = self.response_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.response_delay;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.response_delay + Duration::from_millis(extra)
    }
}

/// Stateless reply service over a shared, read-only corpus.
///
/// Cheap to clone; clones share the corpus.
#[derive(Debug, Clone)]
pub struct Assistant {
    corpus: Arc<Corpus>,
    default_response: String,
    quick_questions: Vec<String>,
}

impl Assistant {
    /// Assistant over `corpus` with the stock default answer.
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus: Arc::new(corpus),
            default_response: DEFAULT_RESPONSE.to_string(),
            quick_questions: QUICK_QUESTIONS.iter().map(|q| (*q).to_string()).collect(),
        }
    }

    /// Assistant over the built-in lighting knowledge base.
    pub fn builtin() -> Self {
        Self::new(Corpus::builtin())
    }

    /// Replace the answer given when nothing matches. The answer must not be
    /// blank.
    pub fn with_default_response(mut self, response: impl Into<String>) -> AmbiencoResult<Self> {
        let response = response.into();
        if response.trim().is_empty() {
            return Err(AmbiencoError::Assistant(
                "default response must not be blank".to_string(),
            ));
        }
        self.default_response = response;
        Ok(self)
    }

    /// The knowledge base.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The answer given when nothing matches.
    pub fn default_response(&self) -> &str {
        &self.default_response
    }

    /// Opening message of a chat session.
    pub fn greeting(&self) -> &'static str {
        GREETING
    }

    /// Suggested opening questions.
    pub fn quick_questions(&self) -> &[String] {
        &self.quick_questions
    }

    /// Answer one question. Never fails: unmatched questions get the default
    /// answer and no follow-ups.
    pub fn reply(&self, question: &str) -> AssistantReply {
        match self.corpus.best_match(question) {
            MatchResult::Matched(entry) => {
                debug!(category = %entry.category, "Knowledge entry matched");
                AssistantReply {
                    response: entry.response.clone(),
                    matched: true,
                    category: Some(entry.category.clone()),
                    follow_ups: entry.follow_ups.clone(),
                }
            }
            MatchResult::NoMatch => {
                debug!("No knowledge entry matched, using default response");
                AssistantReply {
                    response: self.default_response.clone(),
                    matched: false,
                    category: None,
                    follow_ups: Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeEntry;

    #[test]
    fn test_unmatched_gets_default() {
        let assistant = Assistant::builtin();
        let reply = assistant.reply("do you sell sofas");
        assert!(!reply.matched);
        assert_eq!(reply.response, DEFAULT_RESPONSE);
        assert!(reply.category.is_none());
        assert!(reply.follow_up_message().is_none());
    }

    #[test]
    fn test_custom_default_response() {
        let assistant = Assistant::new(Corpus::default())
            .with_default_response("Call us.")
            .unwrap();
        assert_eq!(assistant.reply("anything").response, "Call us.");
    }

    #[test]
    fn test_blank_default_response_rejected() {
        for blank in ["", "   ", "\n\t"] {
            let err = Assistant::builtin()
                .with_default_response(blank)
                .unwrap_err();
            assert!(matches!(err, AmbiencoError::Assistant(_)));
        }
    }

    #[test]
    fn test_matched_reply_carries_follow_ups() {
        let corpus = Corpus::new(vec![KnowledgeEntry::new(["led"], "LED", "R1")
            .with_follow_ups(["Strips?", "Prices?"])])
        .unwrap();
        let reply = Assistant::new(corpus).reply("LED please");
        assert!(reply.matched);
        assert_eq!(reply.category.as_deref(), Some("LED"));
        assert_eq!(
            reply.follow_up_message().unwrap(),
            "You might also be interested in:\n• Strips?\n• Prices?"
        );
    }

    #[test]
    fn test_pacing_bounds() {
        let pacing = Pacing {
            response_delay: Duration::from_millis(100),
            response_jitter: Duration::from_millis(50),
            follow_up_delay: Duration::ZERO,
        };
        for _ in 0..20 {
            let d = pacing.next_response_delay();
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(150));
        }
        assert_eq!(Pacing::immediate().next_response_delay(), Duration::ZERO);
    }
}
