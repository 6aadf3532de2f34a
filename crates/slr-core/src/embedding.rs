//! Text embedding
//!
//! The screening agents consume fixed-length dense vectors. The `Embedder`
//! trait is the seam to a real sentence-encoder collaborator; the in-process
//! `HashingEmbedder` is a deterministic stand-in built on signed feature
//! hashing, so training runs and tests are reproducible without a model
//! download.

/// Embedding dimension used for search and abstract-stage states
pub const ABSTRACT_EMBED_DIM: usize = 384;

/// Embedding dimension used for full-text-stage states
pub const FULLTEXT_EMBED_DIM: usize = 768;

/// Maps arbitrary text to a fixed-length dense vector.
///
/// Implementations must be deterministic for a given snapshot and must
/// return a valid zero-information vector for the empty string, never an
/// error.
pub trait Embedder: Send + Sync {
    /// Output dimensionality; constant for the lifetime of the embedder
    fn dim(&self) -> usize;

    /// Embed `text` into a `dim()`-length vector
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Deterministic bag-of-words embedder using signed feature hashing.
///
/// Tokens are lowercased alphanumeric runs; each token adds ±1 to one
/// bucket and the result is L2-normalized. Empty or token-free text maps to
/// the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embedder for the 384-dim search/abstract state space
    pub fn for_abstracts() -> Self {
        Self::new(ABSTRACT_EMBED_DIM)
    }

    /// Embedder for the 768-dim full-text state space
    pub fn for_full_text() -> Self {
        Self::new(FULLTEXT_EMBED_DIM)
    }
}

// FNV-1a; std's default hasher is randomly seeded per process, which would
// break the determinism contract.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];

        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 1 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

/// Cosine similarity between two vectors; 0.0 when either has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
