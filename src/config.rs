use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Raw chat export produced by the messenger's export tool.
    #[serde(default = "default_export")]
    pub export: PathBuf,
    /// Assembled knowledge-base document.
    #[serde(default = "default_document")]
    pub document: PathBuf,
    /// Serialized chunk corpus searched at query time.
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,
}

fn default_export() -> PathBuf {
    PathBuf::from("result.json")
}
fn default_document() -> PathBuf {
    PathBuf::from("knowledge_base.md")
}
fn default_corpus() -> PathBuf {
    PathBuf::from("rag_chunks.json")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            export: default_export(),
            document: default_document(),
            corpus: default_corpus(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Target maximum chunk body length in bytes.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Trailing bytes of one chunk re-read at the start of the next.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_limit() -> usize {
    1500
}
fn default_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            overlap: default_overlap(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Number of results returned by a search.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Flat score for a query word present anywhere in a chunk.
    #[serde(default = "default_score_base")]
    pub score_base: f64,
    /// Additional score per occurrence of a present query word.
    #[serde(default = "default_score_per_occurrence")]
    pub score_per_occurrence: f64,
}

fn default_top_k() -> usize {
    3
}
fn default_score_base() -> f64 {
    1.0
}
fn default_score_per_occurrence() -> f64 {
    0.1
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            score_base: default_score_base(),
            score_per_occurrence: default_score_per_occurrence(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PromptConfig {
    /// Byte budget for the top chunk embedded in the prompt template.
    #[serde(default = "default_context_budget")]
    pub context_budget: usize,
    /// Per-chunk preview length when assembling a multi-chunk context.
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
    /// Overall budget for the assembled multi-chunk context.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

fn default_context_budget() -> usize {
    1000
}
fn default_snippet_chars() -> usize {
    800
}
fn default_max_context_chars() -> usize {
    2000
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            context_budget: default_context_budget(),
            snippet_chars: default_snippet_chars(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

/// Load and validate configuration from a TOML file.
///
/// A missing file yields the built-in defaults, so the tool works out of
/// the box next to a `result.json` export. A present but malformed file
/// is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.chunking.limit == 0 {
        anyhow::bail!("chunking.limit must be > 0");
    }

    // The chunker's termination guard would still stop the loop, but a
    // window that can never advance past the overlap is a misconfiguration.
    if config.chunking.overlap >= config.chunking.limit {
        anyhow::bail!(
            "chunking.overlap ({}) must be smaller than chunking.limit ({})",
            config.chunking.overlap,
            config.chunking.limit
        );
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if config.prompt.context_budget == 0 {
        anyhow::bail!("prompt.context_budget must be > 0");
    }

    if config.prompt.max_context_chars == 0 {
        anyhow::bail!("prompt.max_context_chars must be > 0");
    }

    Ok(())
}
