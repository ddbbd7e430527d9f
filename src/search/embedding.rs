//! Harmonic token projection embedder
//!
//! Deterministic and training-free: every token is read as a base-2^16
//! integer, reduced modulo a fixed set of primes, and each residue is placed
//! on the unit circle. Token vectors are mean-pooled and L2 normalized.
//! Good enough to rank by shared vocabulary; it carries no semantics.

use std::f64::consts::TAU;

pub const EMBEDDING_DIM: usize = 384;

const NUM_MODULI: usize = EMBEDDING_DIM / 2;

/// Tokens longer than this are truncated (in code points)
const MAX_TOKEN_CHARS: usize = 64;

pub struct Embedder {
    moduli: Vec<u64>,
}

impl Embedder {
    pub fn new() -> Self {
        Self {
            moduli: first_primes(NUM_MODULI),
        }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut sum = vec![0.0f64; EMBEDDING_DIM];
        if tokens.is_empty() {
            return vec![0.0; EMBEDDING_DIM];
        }

        for token in &tokens {
            let n = token_value(token);
            for (i, &m) in self.moduli.iter().enumerate() {
                let theta = TAU * (n % m) as f64 / m as f64;
                sum[2 * i] += theta.sin();
                sum[2 * i + 1] += theta.cos();
            }
        }

        // mean pooling cancels out under normalization
        let norm = sum.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            return vec![0.0; EMBEDDING_DIM];
        }
        sum.iter().map(|x| (x / norm) as f32).collect()
    }
}

impl Default for Embedder {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

fn token_value(token: &str) -> u64 {
    token
        .chars()
        .take(MAX_TOKEN_CHARS)
        .fold(0u64, |n, c| n.wrapping_mul(1 << 16).wrapping_add(c as u64))
}

fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// Cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
