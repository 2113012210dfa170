//! # chat-recall
//!
//! Turn a messenger chat export into a searchable knowledge base.
//!
//! The pipeline is a one-way flow: a raw export is parsed, message text
//! is normalized out of its formatting union, chats are flattened into a
//! single headed document, the document is cut into bounded overlapping
//! chunks, and ad-hoc queries are answered against the chunk corpus with
//! a keyword-overlap scorer. No model is ever called — the final step
//! assembles the prompt a model would receive.
//!
//! ```text
//! result.json ──▶ normalize ──▶ knowledge_base.md ──▶ chunker ──▶ rag_chunks.json
//!                                                                      │
//!                                                    search / ask ◀────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`telegram`] | Export parsing and message-text normalization |
//! | [`document`] | Knowledge-base assembly and section re-detection |
//! | [`chunk`] | Size/overlap-bounded chunking |
//! | [`store`] | Corpus persistence (atomic save, lenient load) |
//! | [`search`] | Keyword-overlap retrieval |
//! | [`prompt`] | Context assembly and prompt rendering |
//! | [`ingest`] | `recall build` orchestration |
//! | [`stats`] | Corpus status report |

pub mod chunk;
pub mod config;
pub mod document;
pub mod ingest;
pub mod models;
pub mod prompt;
pub mod search;
pub mod stats;
pub mod store;
pub mod telegram;
