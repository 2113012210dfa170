//! Knowledge-base document assembly and section re-detection.
//!
//! The assembler flattens an export into a single markdown-ish document:
//! one `## Chat:` header per surviving chat followed by blockquoted
//! messages, chats separated by a horizontal rule. The section parser is
//! the inverse boundary detector used by the chunker — it recognizes
//! chats purely by the header-line marker, with no other markup.

use crate::models::{BuildStats, NormalizedMessage};
use crate::telegram::{format_timestamp, Chat, ChatExport};

/// Marker prefix that opens a chat section. The section parser keys on
/// this exact prefix, so the assembler and parser must agree on it.
pub const CHAT_HEADER_MARKER: &str = "## Chat: ";

/// Separator line emitted between chats.
const CHAT_SEPARATOR: &str = "---";

/// One re-detected chat section: the header line (stripped) and the raw
/// body text accumulated until the next header.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: String,
    pub body: String,
}

/// Filter and normalize one chat's messages.
///
/// Keeps ordinary messages only, flattens their text, and drops any whose
/// stripped text is empty. An empty return means the chat is skipped
/// entirely — no header is emitted for it.
pub fn surviving_messages(chat: &Chat) -> Vec<NormalizedMessage> {
    chat.messages
        .iter()
        .filter(|msg| msg.is_ordinary())
        .filter_map(|msg| {
            let text = msg.plain_text();
            if text.trim().is_empty() {
                return None;
            }
            Some(NormalizedMessage {
                sender: msg.sender().to_string(),
                date: format_timestamp(&msg.date),
                text,
            })
        })
        .collect()
}

/// Render the header line for a chat.
pub fn chat_header(chat: &Chat) -> String {
    format!(
        "{}{} (ID: {})",
        CHAT_HEADER_MARKER,
        chat.display_name(),
        chat.display_id()
    )
}

/// Assemble the full knowledge-base document from an export.
///
/// `source_label` names the export file in the document preamble. Chats
/// with no messages, or none surviving the filters, are skipped without a
/// header. Returns the document plus chat/message counters for reporting.
pub fn assemble(export: &ChatExport, source_label: &str) -> (String, BuildStats) {
    let mut out = String::new();
    let mut stats = BuildStats::default();

    out.push_str("# Knowledge Base\n\n");
    out.push_str(&format!(
        "Generated on: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Source: {}\n\n", source_label));

    for chat in &export.chats.list {
        if chat.messages.is_empty() {
            continue;
        }

        let messages = surviving_messages(chat);
        if messages.is_empty() {
            continue;
        }

        stats.chats += 1;
        stats.messages += messages.len();

        out.push_str(&chat_header(chat));
        out.push_str("\n\n");

        for msg in &messages {
            // Blockquotes keep messages visually separate; interior
            // newlines stay inside the quote.
            out.push_str(&format!("> **{}** ({}):  \n", msg.sender, msg.date));
            let quoted = msg.text.replace('\n', "\n> ");
            out.push_str(&format!("> {}\n\n", quoted));
        }

        out.push_str(CHAT_SEPARATOR);
        out.push_str("\n\n");
    }

    (out, stats)
}

/// Re-detect chat sections in an assembled document.
///
/// Boundaries are recognized solely by the [`CHAT_HEADER_MARKER`] line
/// prefix. Text before the first header (the document preamble) belongs
/// to no section and is ignored.
pub fn sections(document: &str) -> Vec<Section> {
    let mut result: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;

    for line in document.lines() {
        if line.starts_with(CHAT_HEADER_MARKER) {
            if let Some(section) = current.take() {
                result.push(section);
            }
            current = Some(Section {
                header: line.trim().to_string(),
                body: String::new(),
            });
        } else if let Some(section) = current.as_mut() {
            section.body.push_str(line);
            section.body.push('\n');
        }
    }

    if let Some(section) = current {
        result.push(section);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::ChatExport;

    fn export_from_json(json: &str) -> ChatExport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn assemble_emits_header_and_blockquotes() {
        let export = export_from_json(
            r#"{"chats":{"list":[{"id":42,"name":"Support","messages":[
                {"type":"message","from":"Alice","date":"2025-09-06T16:21:35","text":"hello"}
            ]}]}}"#,
        );
        let (doc, stats) = assemble(&export, "result.json");
        assert!(doc.contains("## Chat: Support (ID: 42)"));
        assert!(doc.contains("> **Alice** (2025-09-06 16:21):  \n> hello\n"));
        assert!(doc.contains("---\n"));
        assert_eq!(stats.chats, 1);
        assert_eq!(stats.messages, 1);
    }

    #[test]
    fn multiline_text_stays_inside_blockquote() {
        let export = export_from_json(
            r#"{"chats":{"list":[{"id":1,"name":"A","messages":[
                {"type":"message","from":"Bob","date":"x","text":"line one\nline two"}
            ]}]}}"#,
        );
        let (doc, _) = assemble(&export, "result.json");
        assert!(doc.contains("> line one\n> line two\n"));
    }

    #[test]
    fn service_messages_are_excluded() {
        let export = export_from_json(
            r#"{"chats":{"list":[{"id":1,"name":"A","messages":[
                {"type":"service","from":"Bob","date":"x","text":"pinned a message"},
                {"type":"message","from":"Bob","date":"x","text":"real text"}
            ]}]}}"#,
        );
        let (doc, stats) = assemble(&export, "result.json");
        assert!(!doc.contains("pinned a message"));
        assert!(doc.contains("real text"));
        assert_eq!(stats.messages, 1);
    }

    #[test]
    fn chat_with_only_empty_texts_is_skipped_entirely() {
        let export = export_from_json(
            r#"{"chats":{"list":[{"id":7,"name":"Stickers","messages":[
                {"type":"message","from":"Bob","date":"x","text":""},
                {"type":"message","from":"Bob","date":"x","text":"   "}
            ]}]}}"#,
        );
        let (doc, stats) = assemble(&export, "result.json");
        assert!(!doc.contains("Stickers"));
        assert_eq!(stats.chats, 0);
        assert_eq!(stats.messages, 0);
    }

    #[test]
    fn chat_without_messages_is_skipped() {
        let export =
            export_from_json(r#"{"chats":{"list":[{"id":7,"name":"Empty","messages":[]}]}}"#);
        let (doc, stats) = assemble(&export, "result.json");
        assert!(!doc.contains("Empty"));
        assert_eq!(stats.chats, 0);
    }

    #[test]
    fn sections_roundtrip_from_assembled_document() {
        let export = export_from_json(
            r#"{"chats":{"list":[
                {"id":1,"name":"First","messages":[{"type":"message","from":"A","date":"x","text":"one"}]},
                {"id":2,"name":"Second","messages":[{"type":"message","from":"B","date":"x","text":"two"}]}
            ]}}"#,
        );
        let (doc, _) = assemble(&export, "result.json");
        let secs = sections(&doc);
        assert_eq!(secs.len(), 2);
        assert_eq!(secs[0].header, "## Chat: First (ID: 1)");
        assert_eq!(secs[1].header, "## Chat: Second (ID: 2)");
        assert!(secs[0].body.contains("one"));
        assert!(secs[1].body.contains("two"));
    }

    #[test]
    fn preamble_before_first_header_is_ignored() {
        let doc = "# Knowledge Base\n\nSource: x\n\n## Chat: A (ID: 1)\n\nbody\n";
        let secs = sections(doc);
        assert_eq!(secs.len(), 1);
        assert!(!secs[0].body.contains("Knowledge Base"));
        assert!(secs[0].body.contains("body"));
    }

    #[test]
    fn document_without_headers_yields_no_sections() {
        assert!(sections("just some text\nwith lines\n").is_empty());
    }
}
