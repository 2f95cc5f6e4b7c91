//! Prospect dialogue responder
//!
//! Produces the prospect's next line for a cue the session computed.
//! Objection and outcome cues go through the text oracle first, under a
//! timeout, and fall back to canned pools; farewells, impatience and
//! silence reactions are always canned. One responder lives for one mode
//! run, so the no-repeat objection bookkeeping spans every call in that
//! run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;

use calltrainer_config::{CannedLines, GreetingTone};
use calltrainer_core::{RngSource, RubricLabel, TextGenerator, TranscriptEntry};
use calltrainer_llm::ProspectPromptBuilder;

use crate::persona::Persona;

/// Leading "Sam:" style speaker tags the oracle sometimes emits
static SPEAKER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z .]{1,24}:\s*").expect("speaker tag regex must compile"));

/// Stage directions like *sighs*
static STAGE_DIRECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*[^*]*\*").expect("stage direction regex must compile"));

const MAX_REPLY_CHARS: usize = 220;

/// What kind of line the prospect should produce next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProspectCue {
    /// Raise a fresh objection at the caller
    Objection,
    /// React to the caller's last utterance given how it scored
    Outcome { label: RubricLabel, passed: bool },
    /// End the call
    Farewell { annoyed: bool },
    /// Short silence from the caller
    Impatience,
    /// Long silence from the caller
    SilenceHangup,
}

/// Oracle-first prospect voice with canned fallback
pub struct DialogueResponder {
    generator: Option<Arc<dyn TextGenerator>>,
    lines: Arc<CannedLines>,
    rng: Arc<dyn RngSource>,
    used_objections: Mutex<HashSet<usize>>,
    timeout: Duration,
}

impl DialogueResponder {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        lines: Arc<CannedLines>,
        rng: Arc<dyn RngSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            lines,
            rng,
            used_objections: Mutex::new(HashSet::new()),
            timeout,
        }
    }

    /// Canned-only responder
    pub fn canned(lines: Arc<CannedLines>, rng: Arc<dyn RngSource>) -> Self {
        Self::new(None, lines, rng, Duration::from_secs(3))
    }

    /// Opening line when the prospect picks up. Never goes through the
    /// oracle: the greeting sets the call's tone deterministically.
    pub fn greeting(&self, tone: GreetingTone) -> String {
        self.pick(self.lines.greeting(tone))
    }

    /// Produce the prospect's next line for a cue
    pub async fn respond(
        &self,
        cue: &ProspectCue,
        persona: &Persona,
        utterance: Option<&str>,
        history: &[TranscriptEntry],
    ) -> String {
        match cue {
            ProspectCue::Farewell { annoyed } => self.pick(self.lines.farewell(*annoyed)),
            ProspectCue::Impatience => self.pick(self.lines.impatience_pool()),
            ProspectCue::SilenceHangup => self.pick(self.lines.silence_hangup_pool()),
            ProspectCue::Objection | ProspectCue::Outcome { .. } => {
                if let Some(text) = self.oracle_reply(cue, persona, utterance, history).await {
                    text
                } else {
                    self.canned_reply(cue)
                }
            }
        }
    }

    async fn oracle_reply(
        &self,
        cue: &ProspectCue,
        persona: &Persona,
        utterance: Option<&str>,
        history: &[TranscriptEntry],
    ) -> Option<String> {
        let generator = self.generator.as_ref()?;

        let mut builder = ProspectPromptBuilder::new()
            .with_persona(&persona.name, &persona.style)
            .with_stage_guidance(Self::guidance(cue))
            .with_history(history);
        if let Some(text) = utterance {
            builder = builder.user_message(text);
        }
        let request = builder.build();

        match tokio::time::timeout(self.timeout, generator.generate(&request)).await {
            Ok(Ok(raw)) => {
                let cleaned = clean_reply(&raw);
                if cleaned.is_empty() {
                    tracing::warn!("oracle reply empty after cleaning, using canned line");
                    None
                } else {
                    Some(cleaned)
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "oracle dialogue failed, using canned line");
                None
            }
            Err(_) => {
                tracing::warn!("oracle dialogue timed out, using canned line");
                None
            }
        }
    }

    fn guidance(cue: &ProspectCue) -> &'static str {
        match cue {
            ProspectCue::Objection => {
                "Push back with one realistic objection a busy professional \
                 would raise on a cold call. Do not agree to anything yet."
            }
            ProspectCue::Outcome { passed: true, .. } => {
                "The caller handled that moment well. Warm up slightly and let \
                 the conversation continue, but stay a little guarded."
            }
            ProspectCue::Outcome { passed: false, .. } => {
                "The caller fumbled that moment. Show mild irritation or \
                 confusion, but give them one more chance."
            }
            // Canned-only cues never reach the oracle
            _ => "",
        }
    }

    fn canned_reply(&self, cue: &ProspectCue) -> String {
        match cue {
            ProspectCue::Objection => self.next_objection(),
            ProspectCue::Outcome { label, passed } => {
                self.pick(self.lines.reply_pool(*label, *passed))
            }
            ProspectCue::Farewell { annoyed } => self.pick(self.lines.farewell(*annoyed)),
            ProspectCue::Impatience => self.pick(self.lines.impatience_pool()),
            ProspectCue::SilenceHangup => self.pick(self.lines.silence_hangup_pool()),
        }
    }

    /// Next unused objection; the used set resets once the pool is spent
    fn next_objection(&self) -> String {
        let pool = self.lines.objection_pool();
        let mut used = self.used_objections.lock();
        if used.len() >= pool.len() {
            used.clear();
        }
        let available: Vec<usize> = (0..pool.len()).filter(|i| !used.contains(i)).collect();
        let idx = available[self.rng.pick_index(available.len())];
        used.insert(idx);
        pool[idx].clone()
    }

    fn pick(&self, pool: &[String]) -> String {
        pool[self.rng.pick_index(pool.len())].clone()
    }
}

/// Normalize a raw oracle reply into one or two spoken sentences
fn clean_reply(raw: &str) -> String {
    let mut text = STAGE_DIRECTION.replace_all(raw.trim(), "").to_string();
    text = SPEAKER_TAG.replace(&text, "").to_string();
    let trimmed = text.trim().trim_matches('"').trim();

    // Keep at most two sentences
    let mut out = String::new();
    let mut sentences = 0;
    for ch in trimmed.chars() {
        out.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            sentences += 1;
            if sentences == 2 {
                break;
            }
        }
        if out.len() >= MAX_REPLY_CHARS {
            break;
        }
    }
    out.trim().to_string()
}
