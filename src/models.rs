//! Core data types that flow through the pipeline.

use serde::{Deserialize, Serialize};

/// A message after text normalization and timestamp formatting.
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    pub sender: String,
    pub date: String,
    pub text: String,
}

/// A bounded slice of one chat's assembled text, prefixed with the chat
/// header so a match on any chunk is self-describing.
///
/// `content` always starts with `source` as a verbatim prefix line.
/// Serialized corpus records round-trip all three fields unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Sequence-assigned id, unique within a build (`chunk_0`, `chunk_1`, …).
    pub id: String,
    /// The chat header line this chunk was cut from.
    pub source: String,
    /// Header line + newline + body slice.
    pub content: String,
}

/// A scored retrieval result pointing into the corpus.
#[derive(Debug, Clone)]
pub struct Hit {
    pub score: f64,
    /// Index of the matching chunk in the corpus.
    pub index: usize,
}

/// Counters reported after a build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStats {
    /// Chats that survived filtering and were written to the document.
    pub chats: usize,
    /// Messages kept across all surviving chats.
    pub messages: usize,
}
