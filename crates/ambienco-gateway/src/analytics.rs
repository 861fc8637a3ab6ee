use ambienco_core::Conversation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// How many questions `common_questions` lists.
pub const TOP_QUESTIONS: usize = 10;

/// A question and how often visitors asked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCount {
    /// Lower-cased question text.
    pub question: String,
    /// Number of times asked across all transcripts.
    pub count: usize,
}

/// Conversations started on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// UTC date.
    pub date: NaiveDate,
    /// Conversations created that day.
    pub count: usize,
}

/// Aggregate view over stored chat transcripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnalytics {
    /// Number of transcripts.
    pub total_conversations: usize,
    /// Turns across all transcripts.
    pub total_messages: usize,
    /// Most frequent questions, highest count first, ties by text.
    pub common_questions: Vec<QuestionCount>,
    /// Conversations per UTC date, oldest first.
    pub daily_stats: Vec<DailyCount>,
}

/// Summarize `conversations`.
pub fn summarize(conversations: &[Conversation]) -> ChatAnalytics {
    let mut questions: HashMap<String, usize> = HashMap::new();
    let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut total_messages = 0;

    for conversation in conversations {
        total_messages += conversation.message_count();
        *daily.entry(conversation.created_at.date_naive()).or_default() += 1;
        for question in conversation.user_questions() {
            *questions.entry(question.to_lowercase()).or_default() += 1;
        }
    }

    let mut common_questions: Vec<QuestionCount> = questions
        .into_iter()
        .map(|(question, count)| QuestionCount { question, count })
        .collect();
    common_questions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.question.cmp(&b.question)));
    common_questions.truncate(TOP_QUESTIONS);

    ChatAnalytics {
        total_conversations: conversations.len(),
        total_messages,
        common_questions,
        daily_stats: daily
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ambienco_core::ChatMessage;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn conversation(day: u32, questions: &[&str]) -> Conversation {
        let mut c = Conversation::new(Uuid::new_v4());
        c.created_at = Utc.with_ymd_and_hms(2026, 3, day, 23, 30, 0).unwrap();
        for q in questions {
            c.push(ChatMessage::user(*q));
            c.push(ChatMessage::assistant("answer"));
        }
        c
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize(&[]), ChatAnalytics::default());
    }

    #[test]
    fn test_totals_and_daily_order() {
        let stats = summarize(&[
            conversation(5, &["a", "b"]),
            conversation(2, &["a"]),
            conversation(5, &[]),
        ]);
        assert_eq!(stats.total_conversations, 3);
        assert_eq!(stats.total_messages, 6);
        let days: Vec<(u32, usize)> = stats
            .daily_stats
            .iter()
            .map(|d| (chrono::Datelike::day(&d.date), d.count))
            .collect();
        assert_eq!(days, vec![(2, 1), (5, 2)]);
    }

    #[test]
    fn test_questions_case_folded_and_ranked() {
        let stats = summarize(&[
            conversation(1, &["What is LED?", "Dimming"]),
            conversation(1, &["what is led?", "Cost"]),
        ]);
        let ranked: Vec<(&str, usize)> = stats
            .common_questions
            .iter()
            .map(|q| (q.question.as_str(), q.count))
            .collect();
        assert_eq!(ranked, vec![("what is led?", 2), ("cost", 1), ("dimming", 1)]);
    }

    #[test]
    fn test_top_questions_truncated() {
        let questions: Vec<String> = (0..15).map(|i| format!("q{i:02}")).collect();
        let refs: Vec<&str> = questions.iter().map(String::as_str).collect();
        let stats = summarize(&[conversation(1, &refs)]);
        assert_eq!(stats.common_questions.len(), TOP_QUESTIONS);
        assert_eq!(stats.common_questions[0].question, "q00");
    }
}
