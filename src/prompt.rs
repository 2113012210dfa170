//! Prompt and context assembly for the query boundary.
//!
//! No model is ever called here. `render_prompt` produces the exact
//! string a downstream assistant would receive: a fixed template with
//! the best-matching chunk truncated to a configured budget and the
//! user's question embedded verbatim. `assemble_context` builds the
//! wider multi-chunk context block used for prompt injection, respecting
//! a per-chunk preview length and an overall character budget.

use anyhow::Result;

use crate::chunk::snap_to_char_boundary;
use crate::config::{Config, PromptConfig};
use crate::models::{Chunk, Hit};
use crate::search::{self, preview};
use crate::store;

/// A chunk that made it into an assembled context, for reporting.
#[derive(Debug, Clone)]
pub struct UsedChunk {
    pub id: String,
    pub source: String,
    pub score: f64,
}

/// The result of multi-chunk context assembly.
#[derive(Debug, Clone, Default)]
pub struct ContextBundle {
    pub context: String,
    pub used: Vec<UsedChunk>,
}

impl ContextBundle {
    pub fn is_used(&self) -> bool {
        !self.context.is_empty()
    }
}

/// Truncate to at most `budget` bytes on a char boundary.
fn truncate(text: &str, budget: usize) -> &str {
    &text[..snap_to_char_boundary(text, budget)]
}

/// Render the fixed prompt template around the top chunk's content.
///
/// The content is cut to `context_budget` and always followed by the
/// literal `... [truncated]` marker; the query appears verbatim.
pub fn render_prompt(top_content: &str, query: &str, context_budget: usize) -> String {
    format!(
        "SYSTEM: You are a helpful support assistant.\n\
         CONTEXT:\n\
         {}... [truncated]\n\
         \n\
         USER QUESTION: {}\n\
         \n\
         INSTRUCTION: Answer the user question using ONLY the context above.\n",
        truncate(top_content, context_budget),
        query
    )
}

/// Assemble a context block from ranked hits.
///
/// Each hit contributes a `--- From: <source> ---` banner plus a bounded
/// preview of its content. Assembly stops before the first addition that
/// would push the block past `max_context_chars`; already-added chunks
/// stay. The final block is trimmed.
pub fn assemble_context(corpus: &[Chunk], hits: &[Hit], cfg: &PromptConfig) -> ContextBundle {
    let mut context = String::new();
    let mut used = Vec::new();

    for hit in hits {
        let chunk = &corpus[hit.index];
        let addition = format!(
            "\n--- From: {} ---\n{}\n",
            chunk.source,
            truncate(&chunk.content, cfg.snippet_chars)
        );

        if context.len() + addition.len() > cfg.max_context_chars {
            break;
        }

        context.push_str(&addition);
        used.push(UsedChunk {
            id: chunk.id.clone(),
            source: chunk.source.clone(),
            score: hit.score,
        });
    }

    ContextBundle {
        context: context.trim().to_string(),
        used,
    }
}

/// Run the `ask` command: best-match summary plus the rendered prompt.
pub fn run_ask(config: &Config, query: &str) -> Result<()> {
    let corpus = store::load(&config.paths.corpus)?;
    if corpus.is_empty() {
        println!(
            "Corpus is empty (nothing loaded from {}). Run `recall build` first.",
            config.paths.corpus.display()
        );
        return Ok(());
    }

    let hits = search::search(&corpus, query, &config.retrieval);
    if hits.is_empty() {
        println!("No relevant info found.");
        return Ok(());
    }

    let top = &corpus[hits[0].index];
    println!("[Best Match] (Score: {:.2})", hits[0].score);
    println!("Source: {}", top.source);
    println!("Content Preview: {}", preview(top, 200));
    println!();
    println!("{}", "=".repeat(40));
    println!(" WHAT THE AI WILL SEE (The Prompt) ");
    println!("{}", "=".repeat(40));
    println!(
        "{}",
        render_prompt(&top.content, query, config.prompt.context_budget)
    );

    Ok(())
}

/// Run the `context` command: assembled multi-chunk context block.
pub fn run_context(config: &Config, query: &str, max_chars: Option<usize>) -> Result<()> {
    let corpus = store::load(&config.paths.corpus)?;
    if corpus.is_empty() {
        println!(
            "Corpus is empty (nothing loaded from {}). Run `recall build` first.",
            config.paths.corpus.display()
        );
        return Ok(());
    }

    let hits = search::search(&corpus, query, &config.retrieval);
    let mut prompt_cfg = config.prompt.clone();
    if let Some(max) = max_chars {
        prompt_cfg.max_context_chars = max;
    }

    let bundle = assemble_context(&corpus, &hits, &prompt_cfg);
    if !bundle.is_used() {
        println!("No relevant info found.");
        return Ok(());
    }

    println!("{}", bundle.context);
    println!();
    println!("used chunks:");
    for used in &bundle.used {
        println!("  {} [{:.2}] {}", used.id, used.score, used.source);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalConfig;

    fn chunk(id: usize, source: &str, content: &str) -> Chunk {
        Chunk {
            id: format!("chunk_{}", id),
            source: source.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn prompt_embeds_truncated_content_and_query() {
        let content = "x".repeat(50);
        let prompt = render_prompt(&content, "what is the refund policy?", 10);
        assert!(prompt.contains("CONTEXT:\nxxxxxxxxxx... [truncated]\n"));
        assert!(prompt.contains("USER QUESTION: what is the refund policy?\n"));
        assert!(prompt.starts_with("SYSTEM: You are a helpful support assistant.\n"));
        assert!(prompt.ends_with("ONLY the context above.\n"));
    }

    #[test]
    fn truncation_marker_is_always_present() {
        let prompt = render_prompt("short", "q", 1000);
        assert!(prompt.contains("short... [truncated]"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let content = "☃☃☃☃";
        let prompt = render_prompt(content, "q", 4);
        // 4 bytes falls inside the second snowman; only the first survives.
        assert!(prompt.contains("CONTEXT:\n☃... [truncated]"));
    }

    #[test]
    fn context_assembly_stops_at_budget() {
        let corpus = vec![
            chunk(0, "## Chat: A (ID: 1)", &"a".repeat(400)),
            chunk(1, "## Chat: B (ID: 2)", &"b".repeat(400)),
            chunk(2, "## Chat: C (ID: 3)", &"c".repeat(400)),
        ];
        let hits: Vec<Hit> = (0..3).map(|index| Hit { score: 1.1, index }).collect();
        let cfg = PromptConfig {
            context_budget: 1000,
            snippet_chars: 400,
            max_context_chars: 900,
        };

        let bundle = assemble_context(&corpus, &hits, &cfg);
        // Each addition is ~425 bytes; the third would cross 900.
        assert_eq!(bundle.used.len(), 2);
        assert!(bundle.context.contains("--- From: ## Chat: A (ID: 1) ---"));
        assert!(bundle.context.contains("--- From: ## Chat: B (ID: 2) ---"));
        assert!(!bundle.context.contains("## Chat: C"));
        assert!(bundle.context.len() <= 900);
    }

    #[test]
    fn snippets_are_bounded_per_chunk() {
        let corpus = vec![chunk(0, "## Chat: A (ID: 1)", &"a".repeat(2000))];
        let hits = vec![Hit { score: 1.1, index: 0 }];
        let cfg = PromptConfig {
            context_budget: 1000,
            snippet_chars: 100,
            max_context_chars: 2000,
        };
        let bundle = assemble_context(&corpus, &hits, &cfg);
        assert!(bundle.is_used());
        assert!(!bundle.context.contains(&"a".repeat(101)));
        assert!(bundle.context.contains(&"a".repeat(100)));
    }

    #[test]
    fn no_hits_means_unused_bundle() {
        let bundle = assemble_context(&[], &[], &PromptConfig::default());
        assert!(!bundle.is_used());
        assert!(bundle.used.is_empty());
    }

    #[test]
    fn context_order_follows_ranking() {
        let corpus = vec![
            chunk(0, "## Chat: Low (ID: 1)", "refund"),
            chunk(1, "## Chat: High (ID: 2)", "refund refund refund"),
        ];
        let hits = search::search(&corpus, "refund", &RetrievalConfig::default());
        let bundle = assemble_context(&corpus, &hits, &PromptConfig::default());
        let high = bundle.context.find("High").unwrap();
        let low = bundle.context.find("Low").unwrap();
        assert!(high < low);
    }
}
