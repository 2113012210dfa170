//! Size/overlap-bounded chunker with newline-aware boundaries.
//!
//! Each chat section's body is cut into windows of at most `limit` bytes.
//! When a window ends mid-body, the cut is pulled back to the nearest
//! newline — but only if that newline sits past the midpoint of the
//! window, so a nearby boundary never produces a degenerate sliver. The
//! cursor then re-reads the last `overlap` bytes of the emitted slice,
//! preserving context across the split.
//!
//! The loop's termination guard is load-bearing: a stripped slice no
//! longer than `overlap` stops iteration immediately, otherwise the
//! cursor could stall or regress and spin forever. It is checked on
//! every iteration, whatever the configuration says.

use crate::config::ChunkingConfig;
use crate::document::{sections, Section};
use crate::models::Chunk;

/// Chunk an entire assembled document.
///
/// Sections are re-detected by header marker, then chunked in document
/// order. Ids are assigned sequentially across the whole run
/// (`chunk_0`, `chunk_1`, …), so emission order is reproducible.
pub fn split_document(document: &str, cfg: &ChunkingConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for Section { header, body } in sections(document) {
        split_section(&header, &body, cfg, &mut chunks);
    }
    chunks
}

/// Chunk one section body, appending to `out`.
///
/// A stripped body within `limit` becomes a single chunk (empty bodies
/// produce nothing). Larger bodies go through the sliding-window loop.
/// Every emitted chunk's content is the header line, a newline, then the
/// stripped slice — a match on any chunk names its chat.
pub fn split_section(header: &str, body: &str, cfg: &ChunkingConfig, out: &mut Vec<Chunk>) {
    let body = body.trim();

    if body.len() <= cfg.limit {
        if !body.is_empty() {
            push_chunk(out, header, body);
        }
        return;
    }

    let len = body.len();
    let mut start = 0usize;

    while start < len {
        let mut end = snap_to_char_boundary(body, (start + cfg.limit).min(len));

        // Prefer a newline boundary when one exists past the window
        // midpoint; a final window keeps its natural end.
        if end < len {
            let window = &body[start..end];
            if let Some(pos) = window.rfind('\n') {
                if pos as f64 > cfg.limit as f64 * 0.5 {
                    end = start + pos;
                }
            }
        }

        let piece = body[start..end].trim();
        if !piece.is_empty() {
            push_chunk(out, header, piece);
        }

        // Termination guard (unconditional). Covers all-whitespace
        // slices too, where advancing by `piece.len() - overlap` would
        // move the cursor backwards.
        if piece.len() <= cfg.overlap {
            break;
        }

        // The next window re-reads the slice's last `overlap` bytes. A
        // small advance can land inside a multibyte char; snapping
        // forward keeps the cursor strictly increasing, where snapping
        // back could return it to the window it just emitted.
        start += piece.len() - cfg.overlap;
        while start < len && !body.is_char_boundary(start) {
            start += 1;
        }
    }
}

fn push_chunk(out: &mut Vec<Chunk>, header: &str, piece: &str) {
    out.push(Chunk {
        id: format!("chunk_{}", out.len()),
        source: header.to_string(),
        content: format!("{}\n{}", header, piece),
    });
}

/// Snap a byte index back to the nearest valid UTF-8 char boundary.
pub(crate) fn snap_to_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
