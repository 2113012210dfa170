//! Keyword-overlap retrieval over the chunk corpus.
//!
//! Scoring is deliberately simple: each distinct query word found in a
//! chunk contributes a flat base score plus a small per-occurrence bonus.
//! Presence dominates, repetition nudges. Chunks matching no query word
//! are excluded outright, and ties keep corpus order (the sort is
//! stable), so identical runs produce identical rankings.

use anyhow::Result;
use std::collections::HashSet;

use crate::config::{Config, RetrievalConfig};
use crate::models::{Chunk, Hit};
use crate::store;

/// Score the corpus against a query and return the ranked top `top_k`.
pub fn search(corpus: &[Chunk], query: &str, cfg: &RetrievalConfig) -> Vec<Hit> {
    search_with_limit(corpus, query, cfg, cfg.top_k)
}

/// [`search`] with an explicit result cap (CLI `--limit` override).
pub fn search_with_limit(
    corpus: &[Chunk],
    query: &str,
    cfg: &RetrievalConfig,
    top_k: usize,
) -> Vec<Hit> {
    let query_lower = query.to_lowercase();
    let words: HashSet<&str> = query_lower.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<Hit> = Vec::new();
    for (index, chunk) in corpus.iter().enumerate() {
        let content_lower = chunk.content.to_lowercase();

        let mut score = 0.0;
        for word in &words {
            let count = content_lower.matches(word).count();
            if count > 0 {
                score += cfg.score_base + cfg.score_per_occurrence * count as f64;
            }
        }

        if score > 0.0 {
            hits.push(Hit { score, index });
        }
    }

    // Stable sort: equal scores stay in corpus order.
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(top_k);
    hits
}

/// A short single-line preview of a chunk's content.
pub fn preview(chunk: &Chunk, max_bytes: usize) -> String {
    let flat = chunk.content.replace('\n', " ");
    let cut = crate::chunk::snap_to_char_boundary(&flat, max_bytes);
    if cut < flat.len() {
        format!("{}…", &flat[..cut])
    } else {
        flat
    }
}

/// Run the `search` command: load the corpus, rank, print.
pub fn run_search(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    let corpus = store::load(&config.paths.corpus)?;
    if corpus.is_empty() {
        println!(
            "Corpus is empty (nothing loaded from {}). Run `recall build` first.",
            config.paths.corpus.display()
        );
        return Ok(());
    }

    let top_k = limit.unwrap_or(config.retrieval.top_k);
    let hits = search_with_limit(&corpus, query, &config.retrieval, top_k);

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("{} result{}:", hits.len(), if hits.len() == 1 { "" } else { "s" });
    for (rank, hit) in hits.iter().enumerate() {
        let chunk = &corpus[hit.index];
        println!("{:>3}. [{:.2}] {} ({})", rank + 1, hit.score, chunk.source, chunk.id);
        println!("     {}", preview(chunk, 160));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: usize, content: &str) -> Chunk {
        Chunk {
            id: format!("chunk_{}", id),
            source: "## Chat: Test (ID: 1)".to_string(),
            content: content.to_string(),
        }
    }

    fn cfg() -> RetrievalConfig {
        RetrievalConfig::default()
    }

    #[test]
    fn scores_match_base_plus_occurrence_bonus() {
        // "refund" x3 + "policy" x1 => (1 + 0.3) + (1 + 0.1) = 2.4
        // "refund" x1            => 1 + 0.1 = 1.1
        let corpus = vec![
            chunk(0, "refund refund refund policy"),
            chunk(1, "refund only here"),
        ];
        let hits = search(&corpus, "refund policy", &cfg());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 0);
        assert!((hits[0].score - 2.4).abs() < 1e-9);
        assert_eq!(hits[1].index, 1);
        assert!((hits[1].score - 1.1).abs() < 1e-9);
    }

    #[test]
    fn zero_score_chunks_are_excluded() {
        let corpus = vec![chunk(0, "nothing relevant here"), chunk(1, "refund info")];
        let hits = search(&corpus, "refund", &cfg());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);
    }

    #[test]
    fn extra_occurrence_never_decreases_score() {
        let base = vec![chunk(0, "refund once")];
        let more = vec![chunk(0, "refund once refund twice")];
        let s1 = search(&base, "refund", &cfg())[0].score;
        let s2 = search(&more, "refund", &cfg())[0].score;
        assert!(s2 >= s1);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let corpus = vec![
            chunk(0, "refund a"),
            chunk(1, "refund b"),
            chunk(2, "refund c"),
        ];
        let hits = search(&corpus, "refund", &cfg());
        let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let corpus = vec![chunk(0, "REFUND Policy details")];
        let hits = search(&corpus, "refund POLICY", &cfg());
        assert_eq!(hits.len(), 1);
        assert!((hits[0].score - 2.2).abs() < 1e-9);
    }

    #[test]
    fn duplicate_query_words_collapse() {
        let corpus = vec![chunk(0, "refund here")];
        let once = search(&corpus, "refund", &cfg())[0].score;
        let twice = search(&corpus, "refund refund", &cfg())[0].score;
        assert!((once - twice).abs() < 1e-9);
    }

    #[test]
    fn results_truncate_to_top_k() {
        let corpus: Vec<Chunk> = (0..10).map(|i| chunk(i, "refund text")).collect();
        let hits = search(&corpus, "refund", &cfg());
        assert_eq!(hits.len(), 3);

        let hits = search_with_limit(&corpus, "refund", &cfg(), 5);
        assert_eq!(hits.len(), 5);
    }

    #[test]
    fn empty_query_returns_nothing() {
        let corpus = vec![chunk(0, "anything")];
        assert!(search(&corpus, "", &cfg()).is_empty());
        assert!(search(&corpus, "   ", &cfg()).is_empty());
    }

    #[test]
    fn header_text_is_searchable() {
        // Content carries the chat header as its first line, so chat
        // names match too.
        let corpus = vec![chunk(0, "## Chat: Billing (ID: 9)\nunrelated body")];
        let hits = search(&corpus, "billing", &cfg());
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let c = chunk(0, "héllo wörld this is a longer line of text");
        let p = preview(&c, 10);
        assert!(p.ends_with('…'));
        assert!(p.len() <= 10 + '…'.len_utf8());
    }
}
