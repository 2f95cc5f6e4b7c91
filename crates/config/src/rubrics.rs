//! Rubric tables
//!
//! Each rubric label carries 3-4 independently checkable criteria and an
//! integer pass threshold. The `CriterionCheck` variants double as the
//! deterministic fallback heuristics: when the NLU oracle is unavailable
//! the same criteria descriptions are checked with keyword/shape rules
//! against the lowercased utterance.
//!
//! Fallback thresholds are deliberately a touch more lenient than the
//! oracle's observed behavior, since substring checks are an
//! approximation.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use calltrainer_core::RubricLabel;

use crate::ConfigError;

/// Deterministic check backing a criterion on the fallback path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CriterionCheck {
    /// Utterance contains at least one contraction ("i'm", "don't", ...)
    Contractions,
    /// Utterance contains one of the given phrases
    PhraseAny { phrases: Vec<String> },
    /// Utterance contains none of the given phrases
    PhraseAbsent { phrases: Vec<String> },
    /// Utterance ends with a question mark
    EndsWithQuestion,
    /// Utterance asks an open question (interrogative word + question mark)
    OpenQuestion,
    /// Utterance has at least this many words
    MinWords { count: usize },
    /// Utterance has at most this many words
    MaxWords { count: usize },
}

/// One checkable criterion of a rubric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionSpec {
    /// Stable id used in `RubricResult::criteria_met`
    pub id: String,
    /// Human-readable description, also embedded in oracle prompts
    pub description: String,
    /// Deterministic fallback check
    pub check: CriterionCheck,
}

impl CriterionSpec {
    fn new(id: &str, description: &str, check: CriterionCheck) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            check,
        }
    }
}

/// A stage rubric: criteria plus pass threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricSpec {
    pub label: RubricLabel,
    pub criteria: Vec<CriterionSpec>,
    /// Criteria required to pass (e.g. 3 of 4)
    pub threshold: usize,
}

/// The full rubric table plus shared phrase lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricSet {
    rubrics: HashMap<RubricLabel, RubricSpec>,
    /// Contractions used by the casual-tone check
    pub contractions: Vec<String>,
    /// Empathy phrases shared across rubrics
    pub empathy_phrases: Vec<String>,
}

impl RubricSet {
    /// Built-in rubric table
    pub fn builtin() -> Self {
        let mut rubrics = HashMap::new();

        rubrics.insert(
            RubricLabel::Opener,
            RubricSpec {
                label: RubricLabel::Opener,
                threshold: 3,
                criteria: vec![
                    CriterionSpec::new(
                        "clear_purpose",
                        "States clearly why they are calling",
                        CriterionCheck::PhraseAny {
                            phrases: strings(&[
                                "reason i'm calling",
                                "reason for my call",
                                "calling about",
                                "calling from",
                                "calling because",
                                "quick call",
                                "the reason",
                            ]),
                        },
                    ),
                    CriterionSpec::new(
                        "casual_tone",
                        "Sounds casual and human, using contractions",
                        CriterionCheck::Contractions,
                    ),
                    CriterionSpec::new(
                        "empathy",
                        "Acknowledges the interruption with an empathy phrase",
                        CriterionCheck::PhraseAny {
                            phrases: strings(&[
                                "out of the blue",
                                "out of nowhere",
                                "weren't expecting",
                                "know you're busy",
                                "know this is random",
                                "caught you",
                                "i'll be brief",
                                "i'll be quick",
                            ]),
                        },
                    ),
                    CriterionSpec::new(
                        "soft_question",
                        "Ends with a soft permission-style question",
                        CriterionCheck::EndsWithQuestion,
                    ),
                ],
            },
        );

        rubrics.insert(
            RubricLabel::Objection,
            RubricSpec {
                label: RubricLabel::Objection,
                threshold: 2,
                criteria: vec![
                    CriterionSpec::new(
                        "acknowledge",
                        "Acknowledges and validates the concern",
                        CriterionCheck::PhraseAny {
                            phrases: strings(&[
                                "fair enough",
                                "that's fair",
                                "totally fair",
                                "i get that",
                                "i hear you",
                                "i understand",
                                "makes sense",
                                "good question",
                            ]),
                        },
                    ),
                    CriterionSpec::new(
                        "no_arguing",
                        "Does not argue with or contradict the prospect",
                        CriterionCheck::PhraseAbsent {
                            phrases: strings(&[
                                "you're wrong",
                                "no, you",
                                "actually you",
                                "you have to",
                                "you need to listen",
                            ]),
                        },
                    ),
                    CriterionSpec::new(
                        "redirect",
                        "Redirects with a question instead of pitching harder",
                        CriterionCheck::EndsWithQuestion,
                    ),
                ],
            },
        );

        rubrics.insert(
            RubricLabel::MiniPitch,
            RubricSpec {
                label: RubricLabel::MiniPitch,
                threshold: 3,
                criteria: vec![
                    CriterionSpec::new(
                        "concise",
                        "Keeps the pitch short enough for a phone call",
                        CriterionCheck::MaxWords { count: 60 },
                    ),
                    CriterionSpec::new(
                        "outcome_language",
                        "Talks about outcomes, not features",
                        CriterionCheck::PhraseAny {
                            phrases: strings(&[
                                "we help",
                                "helps",
                                "so you can",
                                "save",
                                "saving",
                                "without",
                                "more",
                                "grow",
                                "increase",
                                "reduce",
                            ]),
                        },
                    ),
                    CriterionSpec::new(
                        "social_proof",
                        "References similar companies or customers",
                        CriterionCheck::PhraseAny {
                            phrases: strings(&[
                                "companies like",
                                "teams like",
                                "people like",
                                "others in",
                                "clients",
                                "customers",
                                "folks in your",
                            ]),
                        },
                    ),
                    CriterionSpec::new(
                        "check_in",
                        "Ends with a check-in question",
                        CriterionCheck::EndsWithQuestion,
                    ),
                ],
            },
        );

        rubrics.insert(
            RubricLabel::Discovery,
            RubricSpec {
                label: RubricLabel::Discovery,
                threshold: 2,
                criteria: vec![
                    CriterionSpec::new(
                        "open_question",
                        "Asks an open question",
                        CriterionCheck::OpenQuestion,
                    ),
                    CriterionSpec::new(
                        "prospect_focused",
                        "Focuses on the prospect's current situation",
                        CriterionCheck::PhraseAny {
                            phrases: strings(&[
                                "currently",
                                "right now",
                                "today",
                                "at the moment",
                                "your team",
                                "your process",
                                "you guys",
                                "how are you",
                                "how do you",
                            ]),
                        },
                    ),
                    CriterionSpec::new(
                        "no_pitching",
                        "Does not slip back into pitching",
                        CriterionCheck::PhraseAbsent {
                            phrases: strings(&[
                                "buy",
                                "purchase",
                                "sign up",
                                "discount",
                                "pricing",
                            ]),
                        },
                    ),
                ],
            },
        );

        rubrics.insert(
            RubricLabel::Extended,
            RubricSpec {
                label: RubricLabel::Extended,
                threshold: 2,
                criteria: vec![
                    CriterionSpec::new(
                        "substantive",
                        "Keeps the conversation substantive",
                        CriterionCheck::MinWords { count: 8 },
                    ),
                    CriterionSpec::new(
                        "keeps_dialogue",
                        "Keeps the dialogue going with a question",
                        CriterionCheck::EndsWithQuestion,
                    ),
                    CriterionSpec::new(
                        "listens",
                        "Responds to what the prospect actually said",
                        CriterionCheck::PhraseAny {
                            phrases: strings(&[
                                "you mentioned",
                                "you said",
                                "sounds like",
                                "it seems",
                                "i hear you",
                                "makes sense",
                            ]),
                        },
                    ),
                ],
            },
        );

        Self {
            rubrics,
            contractions: strings(&[
                "i'm", "i've", "i'll", "don't", "can't", "won't", "it's", "that's", "we're",
                "we've", "you're", "you've", "isn't", "there's", "let's", "didn't", "wasn't",
                "here's", "what's", "who's",
            ]),
            empathy_phrases: strings(&[
                "i know",
                "i understand",
                "i get it",
                "i hear you",
                "totally fair",
                "fair enough",
                "makes sense",
                "appreciate",
            ]),
        }
    }

    /// Load a rubric table override from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Look up the rubric for a label
    pub fn rubric(&self, label: RubricLabel) -> &RubricSpec {
        self.rubrics
            .get(&label)
            .unwrap_or_else(|| panic!("rubric table missing label {}", label))
    }

    pub fn labels(&self) -> impl Iterator<Item = RubricLabel> + '_ {
        self.rubrics.keys().copied()
    }
}

impl Default for RubricSet {
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
    fn test_builtin_covers_all_labels() {
        let set = RubricSet::builtin();
        for label in [
            RubricLabel::Opener,
            RubricLabel::Objection,
            RubricLabel::MiniPitch,
            RubricLabel::Discovery,
            RubricLabel::Extended,
        ] {
            let rubric = set.rubric(label);
            assert!(
                (3..=4).contains(&rubric.criteria.len()),
                "{} should have 3-4 criteria",
                label
            );
            assert!(rubric.threshold <= rubric.criteria.len());
            assert!(rubric.threshold >= 1);
        }
    }

    #[test]
    fn test_opener_is_three_of_four() {
        let set = RubricSet::builtin();
        let opener = set.rubric(RubricLabel::Opener);
        assert_eq!(opener.criteria.len(), 4);
        assert_eq!(opener.threshold, 3);
    }

    #[test]
    fn test_yaml_round_trip() {
        let set = RubricSet::builtin();
        let yaml = serde_yaml::to_string(&set).unwrap();
        let parsed: RubricSet = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            parsed.rubric(RubricLabel::Objection).threshold,
            set.rubric(RubricLabel::Objection).threshold
        );
    }
}
