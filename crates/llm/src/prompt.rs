//! Prompt construction
//!
//! Builds the prospect roleplay prompt and the rubric evaluation prompt.
//! The prospect prompt keeps responses short and phone-call shaped; the
//! evaluation prompt demands a strict JSON verdict so the response can be
//! parsed mechanically.

use calltrainer_config::RubricSpec;
use calltrainer_core::{
    ChatMessage, GenerationRequest, Speaker, TranscriptEntry,
};

/// Builder for the prospect's next-line prompt
pub struct ProspectPromptBuilder {
    persona_name: String,
    persona_style: String,
    stage_guidance: String,
    history: Vec<ChatMessage>,
    user_message: Option<String>,
}

impl ProspectPromptBuilder {
    pub fn new() -> Self {
        Self {
            persona_name: "Sam".to_string(),
            persona_style: String::new(),
            stage_guidance: String::new(),
            history: Vec::new(),
            user_message: None,
        }
    }

    /// Set the prospect persona (name plus style guidance text)
    pub fn with_persona(mut self, name: &str, style: &str) -> Self {
        self.persona_name = name.to_string();
        self.persona_style = style.to_string();
        self
    }

    /// Set stage-specific behavior guidance
    pub fn with_stage_guidance(mut self, guidance: &str) -> Self {
        self.stage_guidance = guidance.to_string();
        self
    }

    /// Add conversation history. The trainee maps to the user role, the
    /// prospect to the assistant role.
    pub fn with_history(mut self, history: &[TranscriptEntry]) -> Self {
        self.history = history
            .iter()
            .map(|e| match e.speaker {
                Speaker::User => ChatMessage::user(e.text.clone()),
                Speaker::Prospect => ChatMessage::assistant(e.text.clone()),
            })
            .collect();
        self
    }

    /// The current trainee utterance
    pub fn user_message(mut self, message: &str) -> Self {
        self.user_message = Some(message.to_string());
        self
    }

    /// Build the final request
    pub fn build(self) -> GenerationRequest {
        let mut system = format!(
            r#"You are {name}, a busy professional who just picked up a cold call from a salesperson in training.

## How to behave
{style}

## Current moment in the call
{guidance}

## Response format
Respond as {name} would speak on the phone: one or two short sentences, no markdown, no stage directions, no quotation marks. Never break character or mention that this is a roleplay."#,
            name = self.persona_name,
            style = if self.persona_style.is_empty() {
                "Skeptical but not rude. You did not ask for this call."
            } else {
                &self.persona_style
            },
            guidance = self.stage_guidance,
        );

        if self.history.is_empty() {
            system.push_str("\n\nThe phone just rang and you answered.");
        }

        let mut messages = vec![ChatMessage::system(system)];
        messages.extend(self.history);
        if let Some(user) = self.user_message {
            messages.push(ChatMessage::user(user));
        }

        GenerationRequest::new(messages)
            .with_max_tokens(96)
            .with_temperature(0.8)
    }
}

impl Default for ProspectPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the evaluation request for one utterance against a rubric
pub fn evaluation_request(
    rubric: &RubricSpec,
    utterance: &str,
    history: &[TranscriptEntry],
) -> GenerationRequest {
    let criteria_list = rubric
        .criteria
        .iter()
        .map(|c| format!("- \"{}\": {}", c.id, c.description))
        .collect::<Vec<_>>()
        .join("\n");

    let context = if history.is_empty() {
        String::new()
    } else {
        let recent = history
            .iter()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|e| format!("{}: {}", e.speaker, e.text))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\n## Recent conversation\n{}\n", recent)
    };

    let system = format!(
        r#"You grade cold-call training utterances against a fixed rubric.

## Rubric: {label}
{criteria}
{context}
## Output format
Reply with ONLY a JSON object, no prose: {{"criteria_met": ["<id>", ...]}}
Include a criterion id exactly when the utterance satisfies it."#,
        label = rubric.label,
        criteria = criteria_list,
        context = context,
    );

    let messages = vec![
        ChatMessage::system(system),
        ChatMessage::user(format!("Utterance to grade: \"{}\"", utterance)),
    ];

    GenerationRequest::new(messages)
        .with_max_tokens(128)
        .with_temperature(0.0)
}
