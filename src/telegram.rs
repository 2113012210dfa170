//! Telegram export parsing and message-text normalization.
//!
//! A Telegram desktop export (`result.json`) is a single JSON document with
//! a `chats.list` array. Message text is heterogeneous: either a plain
//! string or an ordered list of string and annotated-span parts (bold,
//! links, mentions). [`MessageText::plain_text`] flattens that union once;
//! nothing downstream re-inspects it.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::Path;

/// Top-level export document.
///
/// A missing `chats` key degrades to an empty list; a build over it
/// reports zero chats rather than failing.
#[derive(Debug, Deserialize, Default)]
pub struct ChatExport {
    #[serde(default)]
    pub chats: ChatCollection,
}

#[derive(Debug, Deserialize, Default)]
pub struct ChatCollection {
    #[serde(default)]
    pub list: Vec<Chat>,
}

/// One conversation/thread from the export.
#[derive(Debug, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

impl Chat {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Chat")
    }

    pub fn display_id(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => "N/A".to_string(),
        }
    }
}

/// One raw message as exported. Only ordinary messages carry useful text;
/// service entries (joins, pins, calls) have a different `type`.
#[derive(Debug, Deserialize)]
pub struct RawMessage {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub text: Option<MessageText>,
}

impl RawMessage {
    pub fn is_ordinary(&self) -> bool {
        self.kind == "message"
    }

    /// Normalized text; empty for absent or unrecognized shapes.
    pub fn plain_text(&self) -> String {
        match &self.text {
            Some(text) => text.plain_text(),
            None => String::new(),
        }
    }

    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or("Unknown")
    }
}

/// The string-or-parts union used by Telegram for formatted text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageText {
    Plain(String),
    Parts(Vec<TextPart>),
    /// Anything else (numbers, objects without a known shape).
    Other(serde_json::Value),
}

impl MessageText {
    /// Flatten to a single string.
    ///
    /// Plain strings pass through unchanged. Part lists concatenate their
    /// string elements and the `text` value of annotated spans, in order;
    /// annotation metadata is discarded. Unrecognized shapes yield an
    /// empty string — the empty-text filter drops the message later.
    pub fn plain_text(&self) -> String {
        match self {
            MessageText::Plain(s) => s.clone(),
            MessageText::Parts(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TextPart::Plain(s) => out.push_str(s),
                        TextPart::Span { text } => out.push_str(text),
                        TextPart::Other(_) => {}
                    }
                }
                out
            }
            MessageText::Other(_) => String::new(),
        }
    }
}

/// One element of a formatted-text part list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextPart {
    Plain(String),
    /// An annotated span (`{"type": "bold", "text": "..."}` and friends);
    /// only the `text` value survives normalization.
    Span { text: String },
    Other(serde_json::Value),
}

/// Read and parse an export file.
pub fn load_export(path: &Path) -> Result<ChatExport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read export file: {}", path.display()))?;
    let export: ChatExport = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse export file: {}", path.display()))?;
    Ok(export)
}

/// Format an ISO-like export timestamp (`2025-09-06T16:21:35`) at minute
/// precision. Unparseable input falls back to the raw string unchanged —
/// a bad date never fails a build.
pub fn format_timestamp(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
