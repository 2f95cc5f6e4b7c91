//! Call transcript types
//!
//! A transcript is an append-only sequence of timestamped entries. Entries
//! are never reordered or removed; re-reading yields the exact order in
//! which they were appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who spoke a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The trainee making the simulated cold call
    User,
    /// The AI-voiced prospect on the other end
    Prospect,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Prospect => "prospect",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single transcript entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Speaker of this entry
    pub speaker: Speaker,
    /// What was said
    pub text: String,
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
    /// Stage the call was in when this was said (snake_case label)
    pub stage: String,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
            stage: stage.into(),
        }
    }

    pub fn user(text: impl Into<String>, stage: impl Into<String>) -> Self {
        Self::new(Speaker::User, text, stage)
    }

    pub fn prospect(text: impl Into<String>, stage: impl Into<String>) -> Self {
        Self::new(Speaker::Prospect, text, stage)
    }

    /// Word count of the entry text
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Append-only conversation transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries cannot be modified or removed afterwards.
    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last `n` entries, oldest first
    pub fn tail(&self, n: usize) -> &[TranscriptEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Entries spoken by the user only
    pub fn user_entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter().filter(|e| e.speaker == Speaker::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut t = Transcript::new();
        t.append(TranscriptEntry::user("hi there", "phone_pickup"));
        t.append(TranscriptEntry::prospect("who is this?", "phone_pickup"));
        t.append(TranscriptEntry::user("it's me", "opener_evaluation"));

        let texts: Vec<&str> = t.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["hi there", "who is this?", "it's me"]);
    }

    #[test]
    fn test_tail() {
        let mut t = Transcript::new();
        for i in 0..5 {
            t.append(TranscriptEntry::user(format!("line {}", i), "mini_pitch"));
        }
        let tail = t.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text, "line 3");
        assert_eq!(tail[1].text, "line 4");
    }

    #[test]
    fn test_user_entries_filter() {
        let mut t = Transcript::new();
        t.append(TranscriptEntry::user("a", "s"));
        t.append(TranscriptEntry::prospect("b", "s"));
        t.append(TranscriptEntry::user("c", "s"));
        assert_eq!(t.user_entries().count(), 2);
    }
}
