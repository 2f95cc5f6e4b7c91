//! Quiz question bank for the Warm-up Challenge
//!
//! Questions are grouped by category and tagged with difficulty. Answers
//! are evaluated with length plus category-specific keyword heuristics;
//! categories carry their own keyword lists.

use serde::{Deserialize, Serialize};

/// Question category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizCategory {
    Openers,
    ObjectionHandling,
    Tonality,
    Qualification,
    Closing,
}

impl QuizCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizCategory::Openers => "openers",
            QuizCategory::ObjectionHandling => "objection_handling",
            QuizCategory::Tonality => "tonality",
            QuizCategory::Qualification => "qualification",
            QuizCategory::Closing => "closing",
        }
    }
}

/// Difficulty tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One quiz question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub category: QuizCategory,
    pub difficulty: Difficulty,
    /// The prompt read to the trainee
    pub prompt: String,
    /// Keywords that a good answer for this question tends to contain
    pub keywords: Vec<String>,
}

/// The full question bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizBank {
    questions: Vec<QuizQuestion>,
}

impl QuizBank {
    pub fn builtin() -> Self {
        let q = |id: &str, category, difficulty, prompt: &str, keywords: &[&str]| QuizQuestion {
            id: id.to_string(),
            category,
            difficulty,
            prompt: prompt.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            questions: vec![
                q(
                    "op-1",
                    QuizCategory::Openers,
                    Difficulty::Easy,
                    "The prospect picks up and says 'Hello?'. Deliver your opener.",
                    &["calling", "reason", "quick", "busy", "blue"],
                ),
                q(
                    "op-2",
                    QuizCategory::Openers,
                    Difficulty::Medium,
                    "Open a call to a CFO who has never heard of your company.",
                    &["calling", "reason", "finance", "brief", "minute"],
                ),
                q(
                    "op-3",
                    QuizCategory::Openers,
                    Difficulty::Hard,
                    "The prospect answers mid-meeting and sounds rushed. Open anyway.",
                    &["quick", "brief", "bad time", "call back", "seconds"],
                ),
                q(
                    "op-4",
                    QuizCategory::Openers,
                    Difficulty::Easy,
                    "Give an opener that names the reason for your call in one sentence.",
                    &["reason", "calling", "because"],
                ),
                q(
                    "ob-1",
                    QuizCategory::ObjectionHandling,
                    Difficulty::Easy,
                    "The prospect says 'We already have a vendor for that.' Respond.",
                    &["fair", "understand", "curious", "different", "switch"],
                ),
                q(
                    "ob-2",
                    QuizCategory::ObjectionHandling,
                    Difficulty::Medium,
                    "The prospect says 'Just send me an email.' Keep the call alive.",
                    &["happy to", "email", "quick", "before", "question"],
                ),
                q(
                    "ob-3",
                    QuizCategory::ObjectionHandling,
                    Difficulty::Medium,
                    "The prospect says 'We have no budget this quarter.' Respond.",
                    &["understand", "budget", "timing", "next", "planning"],
                ),
                q(
                    "ob-4",
                    QuizCategory::ObjectionHandling,
                    Difficulty::Hard,
                    "The prospect says 'We tried this before and it failed.' Respond.",
                    &["hear you", "happened", "different", "what went", "since then"],
                ),
                q(
                    "ob-5",
                    QuizCategory::ObjectionHandling,
                    Difficulty::Hard,
                    "The prospect snaps 'How did you get this number?'. De-escalate.",
                    &["fair", "understand", "research", "honest", "apolog"],
                ),
                q(
                    "to-1",
                    QuizCategory::Tonality,
                    Difficulty::Easy,
                    "Rephrase 'You should buy our product' the way you'd say it on a call.",
                    &["might", "could", "worth", "open to", "curious"],
                ),
                q(
                    "to-2",
                    QuizCategory::Tonality,
                    Difficulty::Medium,
                    "Deliver a one-line pitch that sounds casual, not scripted.",
                    &["we help", "basically", "honestly", "so you"],
                ),
                q(
                    "to-3",
                    QuizCategory::Tonality,
                    Difficulty::Medium,
                    "The prospect sounds bored. Re-engage them in one sentence.",
                    &["fair", "honest", "different", "question", "ask you"],
                ),
                q(
                    "qu-1",
                    QuizCategory::Qualification,
                    Difficulty::Easy,
                    "Ask one open question to learn how they handle this today.",
                    &["how", "what", "currently", "today", "process"],
                ),
                q(
                    "qu-2",
                    QuizCategory::Qualification,
                    Difficulty::Medium,
                    "Find out who the decision maker is without sounding pushy.",
                    &["who", "involved", "decision", "usually", "team"],
                ),
                q(
                    "qu-3",
                    QuizCategory::Qualification,
                    Difficulty::Hard,
                    "The prospect is friendly but vague. Pin down their actual pain point.",
                    &["specifically", "example", "biggest", "challenge", "what"],
                ),
                q(
                    "cl-1",
                    QuizCategory::Closing,
                    Difficulty::Easy,
                    "Ask for a follow-up meeting in one low-pressure sentence.",
                    &["open to", "worth", "minutes", "calendar", "next week"],
                ),
                q(
                    "cl-2",
                    QuizCategory::Closing,
                    Difficulty::Medium,
                    "The prospect says 'Maybe, I'll think about it.' Lock in a next step.",
                    &["sense", "tell you what", "tuesday", "specific", "follow up"],
                ),
                q(
                    "cl-3",
                    QuizCategory::Closing,
                    Difficulty::Hard,
                    "Summarize the call and close for a meeting in two sentences.",
                    &["mentioned", "sounds like", "worth", "meeting", "open to"],
                ),
                q(
                    "op-5",
                    QuizCategory::Openers,
                    Difficulty::Medium,
                    "Open with an empathy statement acknowledging the cold call.",
                    &["out of the blue", "know you", "busy", "random", "brief"],
                ),
                q(
                    "ob-6",
                    QuizCategory::ObjectionHandling,
                    Difficulty::Easy,
                    "The prospect says 'I'm not interested.' Respond without arguing.",
                    &["fair", "understand", "before", "one question", "curious"],
                ),
                q(
                    "to-4",
                    QuizCategory::Tonality,
                    Difficulty::Easy,
                    "Say 'I'm calling about your invoicing process' so it sounds human.",
                    &["honestly", "basically", "quick", "i'm", "wanted to"],
                ),
                q(
                    "to-5",
                    QuizCategory::Tonality,
                    Difficulty::Hard,
                    "The prospect mocks your pitch. Stay warm without getting defensive.",
                    &["fair", "laugh", "honest", "give me", "deserved"],
                ),
                q(
                    "qu-4",
                    QuizCategory::Qualification,
                    Difficulty::Medium,
                    "Ask about their timeline without pressuring them.",
                    &["when", "timeline", "roughly", "thinking", "priority"],
                ),
                q(
                    "qu-5",
                    QuizCategory::Qualification,
                    Difficulty::Hard,
                    "Uncover the cost of their current approach in one question.",
                    &["how much", "time", "cost", "spend", "impact"],
                ),
                q(
                    "cl-4",
                    QuizCategory::Closing,
                    Difficulty::Medium,
                    "Offer two concrete meeting slots instead of 'sometime next week'.",
                    &["tuesday", "thursday", "morning", "afternoon", "works"],
                ),
                q(
                    "cl-5",
                    QuizCategory::Closing,
                    Difficulty::Hard,
                    "The call went well but they won't commit. Create a small next step.",
                    &["small", "send", "fifteen", "no pressure", "worth"],
                ),
                q(
                    "op-6",
                    QuizCategory::Openers,
                    Difficulty::Hard,
                    "Open a second call to someone who brushed you off last month.",
                    &["spoke", "last time", "back", "since", "promised"],
                ),
                q(
                    "ob-7",
                    QuizCategory::ObjectionHandling,
                    Difficulty::Medium,
                    "The prospect says 'You're the fifth caller today.' Stand out.",
                    &["fair", "fifth", "different", "honest", "thirty seconds"],
                ),
            ],
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn by_category(&self, category: QuizCategory) -> Vec<&QuizQuestion> {
        self.questions
            .iter()
            .filter(|q| q.category == category)
            .collect()
    }
}

impl Default for QuizBank {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_has_all_categories() {
        let bank = QuizBank::builtin();
        for cat in [
            QuizCategory::Openers,
            QuizCategory::ObjectionHandling,
            QuizCategory::Tonality,
            QuizCategory::Qualification,
            QuizCategory::Closing,
        ] {
            assert!(!bank.by_category(cat).is_empty(), "{:?} empty", cat);
        }
    }

    #[test]
    fn test_every_question_has_keywords() {
        for q in QuizBank::builtin().questions() {
            assert!(!q.keywords.is_empty(), "{} has no keywords", q.id);
            assert!(!q.prompt.is_empty());
        }
    }

    #[test]
    fn test_bank_covers_a_full_quiz_run() {
        // A run draws 25 distinct questions
        assert!(QuizBank::builtin().len() >= 25);
    }

    #[test]
    fn test_difficulty_spread() {
        let bank = QuizBank::builtin();
        assert!(bank.questions().iter().any(|q| q.difficulty == Difficulty::Easy));
        assert!(bank.questions().iter().any(|q| q.difficulty == Difficulty::Hard));
    }
}
