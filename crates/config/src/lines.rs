//! Canned prospect lines
//!
//! Fallback dialogue used when the text generation oracle is unavailable,
//! plus the fixed greetings, farewells and impatience lines that never go
//! through the oracle.

use serde::{Deserialize, Serialize};

use calltrainer_core::RubricLabel;

/// Greeting tone, escalated by PowerHour difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingTone {
    Friendly,
    Neutral,
    Gruff,
}

/// Table of canned prospect lines keyed by rubric label and outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedLines {
    greetings_friendly: Vec<String>,
    greetings_neutral: Vec<String>,
    greetings_gruff: Vec<String>,
    opener_passed: Vec<String>,
    opener_failed: Vec<String>,
    /// Objection pool; a mode run never repeats one until exhausted
    objections: Vec<String>,
    objection_passed: Vec<String>,
    objection_failed: Vec<String>,
    pitch_passed: Vec<String>,
    pitch_failed: Vec<String>,
    discovery_passed: Vec<String>,
    discovery_failed: Vec<String>,
    extended_passed: Vec<String>,
    extended_failed: Vec<String>,
    farewells_polite: Vec<String>,
    farewells_annoyed: Vec<String>,
    impatience: Vec<String>,
    silence_hangup: Vec<String>,
}

impl CannedLines {
    pub fn builtin() -> Self {
        Self {
            greetings_friendly: strings(&[
                "Hello, this is Sam.",
                "Hi there, Sam speaking.",
                "Good morning, you've reached Sam.",
            ]),
            greetings_neutral: strings(&["Hello?", "Yeah, this is Sam.", "Sam here."]),
            greetings_gruff: strings(&[
                "What is it? I'm in the middle of something.",
                "Yeah? Make it quick.",
                "This better be important.",
            ]),
            opener_passed: strings(&[
                "Alright, you've got thirty seconds. Go ahead.",
                "Okay... I'm listening. What's this about?",
                "Sure, go on then.",
            ]),
            opener_failed: strings(&[
                "Sorry, who is this again?",
                "I don't really have time for this.",
                "Is this a sales call?",
            ]),
            objections: strings(&[
                "We're already working with someone for that.",
                "Honestly, this isn't a good time.",
                "We don't have budget for anything new right now.",
                "Can you just send me an email?",
                "I'm not the right person for this.",
                "We tried something like this before and it didn't work.",
            ]),
            objection_passed: strings(&[
                "Hm, fair point. What exactly do you do differently?",
                "Okay, I'll give you that. Go on.",
                "Alright, you've got my attention for a minute.",
            ]),
            objection_failed: strings(&[
                "You're not really hearing what I said.",
                "Right, well, like I said, we're covered.",
                "Look, I already told you it's not a fit.",
            ]),
            pitch_passed: strings(&[
                "Interesting. How would that work for a team our size?",
                "Okay, that's not the worst thing I've heard today.",
                "And you've done this for companies like ours?",
            ]),
            pitch_failed: strings(&[
                "That sounds like every other pitch I get.",
                "I'm not following. What is it you actually do?",
                "You lost me halfway through that.",
            ]),
            discovery_passed: strings(&[
                "Well, since you ask, our current setup is a bit clunky.",
                "Honestly? It's mostly spreadsheets and hope.",
                "We handle that in-house, but it eats a lot of time.",
            ]),
            discovery_failed: strings(&[
                "That's kind of a personal question for a cold call.",
                "Why do you need to know that?",
                "I'd rather not get into details.",
            ]),
            extended_passed: strings(&[
                "You know, you're easier to talk to than most reps.",
                "That's a fair way to put it. What would next steps look like?",
                "Okay, say I'm curious. What would you need from me?",
            ]),
            extended_failed: strings(&[
                "I think we're going in circles here.",
                "I've got a meeting coming up, so...",
                "Let's wrap this up.",
            ]),
            farewells_polite: strings(&[
                "Look, I appreciate the call, but I have to run. Bye.",
                "Thanks, but this isn't for us. Take care.",
            ]),
            farewells_annoyed: strings(&[
                "Yeah, I'm going to stop you right there. Don't call again.",
                "Not interested. *click*",
                "I'm hanging up now.",
            ]),
            impatience: strings(&[
                "Hello? You still there?",
                "...anything else, or?",
                "I don't have all day here.",
            ]),
            silence_hangup: strings(&[
                "Okay, I guess we're done here. Bye.",
                "Right. Hanging up now.",
            ]),
        }
    }

    pub fn greeting(&self, tone: GreetingTone) -> &[String] {
        match tone {
            GreetingTone::Friendly => &self.greetings_friendly,
            GreetingTone::Neutral => &self.greetings_neutral,
            GreetingTone::Gruff => &self.greetings_gruff,
        }
    }

    /// Canned replies for a rubric outcome
    pub fn reply_pool(&self, label: RubricLabel, passed: bool) -> &[String] {
        match (label, passed) {
            (RubricLabel::Opener, true) => &self.opener_passed,
            (RubricLabel::Opener, false) => &self.opener_failed,
            (RubricLabel::Objection, true) => &self.objection_passed,
            (RubricLabel::Objection, false) => &self.objection_failed,
            (RubricLabel::MiniPitch, true) => &self.pitch_passed,
            (RubricLabel::MiniPitch, false) => &self.pitch_failed,
            (RubricLabel::Discovery, true) => &self.discovery_passed,
            (RubricLabel::Discovery, false) => &self.discovery_failed,
            (RubricLabel::Extended, true) => &self.extended_passed,
            (RubricLabel::Extended, false) => &self.extended_failed,
        }
    }

    /// Objections raised by the prospect (early objection stage)
    pub fn objection_pool(&self) -> &[String] {
        &self.objections
    }

    pub fn farewell(&self, annoyed: bool) -> &[String] {
        if annoyed {
            &self.farewells_annoyed
        } else {
            &self.farewells_polite
        }
    }

    pub fn impatience_pool(&self) -> &[String] {
        &self.impatience
    }

    pub fn silence_hangup_pool(&self) -> &[String] {
        &self.silence_hangup
    }
}

impl Default for CannedLines {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pools_nonempty() {
        let lines = CannedLines::builtin();
        for label in [
            RubricLabel::Opener,
            RubricLabel::Objection,
            RubricLabel::MiniPitch,
            RubricLabel::Discovery,
            RubricLabel::Extended,
        ] {
            assert!(!lines.reply_pool(label, true).is_empty());
            assert!(!lines.reply_pool(label, false).is_empty());
        }
        assert!(!lines.objection_pool().is_empty());
        assert!(!lines.impatience_pool().is_empty());
        assert!(!lines.farewell(true).is_empty());
        assert!(!lines.farewell(false).is_empty());
    }

    #[test]
    fn test_objection_pool_size_supports_no_repeat() {
        // Needs enough distinct objections to cover a typical call's
        // objection stages without immediate repeats
        assert!(CannedLines::builtin().objection_pool().len() >= 4);
    }
}
