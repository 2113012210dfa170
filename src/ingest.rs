//! Build pipeline orchestration.
//!
//! `recall build` runs the full flow: export → normalized messages →
//! assembled document → chunk corpus. The document and corpus files are
//! written through temp-file renames, so an aborted build never leaves a
//! half-written artifact behind.

use anyhow::{Context, Result};
use std::path::Path;

use crate::chunk::split_document;
use crate::config::Config;
use crate::document::assemble;
use crate::store;
use crate::telegram::load_export;

pub fn run_build(config: &Config, dry_run: bool) -> Result<()> {
    let export = load_export(&config.paths.export)?;
    println!(
        "Loaded {} chats from {}",
        export.chats.list.len(),
        config.paths.export.display()
    );

    let source_label = config.paths.export.display().to_string();
    let (document, stats) = assemble(&export, &source_label);
    let chunks = split_document(&document, &config.chunking);

    if dry_run {
        println!("build (dry-run)");
        println!("  chats kept: {}", stats.chats);
        println!("  messages kept: {}", stats.messages);
        println!("  chunks: {}", chunks.len());
        return Ok(());
    }

    write_atomic(&config.paths.document, &document)?;
    store::save(&config.paths.corpus, &chunks)?;

    println!("build");
    println!("  chats kept: {}", stats.chats);
    println!("  messages kept: {}", stats.messages);
    println!("  document: {}", config.paths.document.display());
    println!("  chunks written: {}", chunks.len());
    println!("  corpus: {}", config.paths.corpus.display());
    println!("ok");

    Ok(())
}

/// Write a text file through a sibling temp file and rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)
        .with_context(|| format!("Failed to write file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move file into place: {}", path.display()))?;
    Ok(())
}
