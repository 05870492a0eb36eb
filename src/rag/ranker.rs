//! Exact cosine-similarity ranking
//!
//! The corpus is tens to low hundreds of chunks per request, so ranking is a
//! full linear scan against the question vector. No index structure, no
//! approximation.

use tracing::debug;

use crate::rag::Chunk;
use crate::rag::ScoredChunk;

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude or the dimensions
/// disagree, rather than failing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

/// Score every chunk against the question vector and keep the top `k`.
///
/// The sort is stable and descending, so chunks with exactly equal scores
/// keep their original document order. Returns fewer than `k` results when
/// fewer chunks exist.
pub fn rank(
    query: &[f32],
    chunks: Vec<Chunk>,
    embeddings: &[Vec<f32>],
    k: usize,
) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = chunks
        .into_iter()
        .zip(embeddings.iter())
        .map(|(chunk, embedding)| ScoredChunk {
            score: cosine_similarity(query, embedding),
            chunk,
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);

    debug!("Ranked {} chunks, kept top {}", embeddings.len(), scored.len());

    scored
}
