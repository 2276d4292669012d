//! Typed view of a `generateContent` response.
//!
//! Every nesting level is optional on the wire. Missing levels deserialize to
//! empty values so that traversal never has to deal with a partial structure.

use serde::Deserialize;

/// Top-level response from the model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    /// Alternative responses, possibly empty.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt itself (set when the prompt was blocked).
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One alternative response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when generation stopped early.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped (`STOP`, `IMAGE_SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Ordered content parts of a candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    /// Parts in the order the model produced them.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single response part.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Inline binary payload.
    #[serde(default)]
    pub inline_data: Option<InlineData>,
    /// Text payload.
    #[serde(default)]
    pub text: Option<String>,
}

/// Base64 payload with its media type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Media type; some responses omit it.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Base64 data.
    #[serde(default)]
    pub data: String,
}

/// Prompt-level feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Human-readable explanation of the block.
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

/// What a [`Part`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind<'a> {
    /// An image payload.
    Image(&'a InlineData),
    /// A text payload.
    Text(&'a str),
    /// Anything else (function calls, thoughts, unknown fields).
    Other,
}

impl Part {
    /// Classifies this part. Inline data takes precedence over text.
    pub fn kind(&self) -> PartKind<'_> {
        match (&self.inline_data, &self.text) {
            (Some(inline), _) => PartKind::Image(inline),
            (None, Some(text)) => PartKind::Text(text),
            (None, None) => PartKind::Other,
        }
    }
}

impl ModelResponse {
    /// Returns the first image part of the first candidate.
    ///
    /// Later parts and other candidates are ignored.
    pub fn first_image(&self) -> Option<&InlineData> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        content.parts.iter().find_map(|part| match part.kind() {
            PartKind::Image(inline) => Some(inline),
            _ => None,
        })
    }

    /// Returns the first candidate's text parts, joined with newlines.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts
            .iter()
            .filter_map(|part| match part.kind() {
                PartKind::Text(text) => Some(text),
                _ => None,
            })
            .collect();
        (!texts.is_empty()).then(|| texts.join("\n"))
    }

    /// Returns the block message if the prompt was rejected.
    pub fn block_message(&self) -> Option<String> {
        let feedback = self.prompt_feedback.as_ref()?;
        let reason = feedback.block_reason.as_ref()?;
        Some(
            feedback
                .block_reason_message
                .clone()
                .unwrap_or_else(|| format!("Prompt blocked: {}", reason)),
        )
    }

    /// Returns the first candidate's finish reason.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}
