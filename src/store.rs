//! Corpus persistence.
//!
//! The corpus is a flat JSON array of chunk records — the chunker's
//! output and the retriever's input. Saves go through a sibling temp
//! file and an atomic rename so a failed build never leaves a
//! half-written corpus behind. A missing corpus at load time is not an
//! error: retrieval just runs against an empty list.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Chunk;

/// Write the corpus, replacing any existing file atomically.
pub fn save(path: &Path, chunks: &[Chunk]) -> Result<()> {
    let json = serde_json::to_string_pretty(chunks)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json)
        .with_context(|| format!("Failed to write corpus file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move corpus into place: {}", path.display()))?;

    Ok(())
}

/// Load the corpus. A missing file yields an empty corpus; a present but
/// unparseable file is an error.
pub fn load(path: &Path) -> Result<Vec<Chunk>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    let chunks: Vec<Chunk> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?;
    Ok(chunks)
}
