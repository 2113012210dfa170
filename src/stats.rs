//! Corpus status overview.
//!
//! A quick summary of what's indexed: where the corpus lives, how big it
//! is, how many chunks it holds, and a per-chat breakdown. Used by
//! `recall stats` to confirm a build worked before querying.

use anyhow::Result;

use crate::config::Config;
use crate::store;

/// Run the stats command: load the corpus and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let corpus = store::load(&config.paths.corpus)?;

    let corpus_size = std::fs::metadata(&config.paths.corpus)
        .map(|m| m.len())
        .unwrap_or(0);
    let document_size = std::fs::metadata(&config.paths.document)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("chat-recall — Corpus Stats");
    println!("==========================");
    println!();
    println!("  Corpus:      {}", config.paths.corpus.display());
    println!("  Size:        {}", format_bytes(corpus_size));
    println!("  Document:    {}", config.paths.document.display());
    println!("  Size:        {}", format_bytes(document_size));
    println!();
    println!("  Chunks:      {}", corpus.len());

    if corpus.is_empty() {
        println!();
        println!("  Corpus is empty. Run `recall build` first.");
        return Ok(());
    }

    // Per-chat breakdown, in corpus (emission) order.
    let mut sources: Vec<(String, usize)> = Vec::new();
    for chunk in &corpus {
        match sources.iter_mut().find(|(s, _)| *s == chunk.source) {
            Some((_, count)) => *count += 1,
            None => sources.push((chunk.source.clone(), 1)),
        }
    }

    println!("  Chats:       {}", sources.len());
    println!();
    println!("  By chat:");
    println!("  {:<56} {:>6}", "SOURCE", "CHUNKS");
    println!("  {}", "-".repeat(64));
    for (source, count) in &sources {
        println!("  {:<56} {:>6}", source, count);
    }
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
