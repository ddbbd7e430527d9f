//! Recursive character text splitter
//!
//! Tries paragraph breaks first, then line breaks, then spaces, then single
//! characters, merging small pieces back together up to `chunk_size` with
//! `chunk_overlap` characters carried between neighbouring chunks.

use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (separator, remaining) = pick_separator(text, separators);

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut small = Vec::new();

        for piece in pieces {
            if char_len(&piece) < self.config.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge(&small, separator));
                small.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge(&small, separator));
        }

        chunks
    }

    /// Greedily join pieces into chunks, keeping a tail of at most
    /// `chunk_overlap` characters as the head of the next chunk.
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            let joined_len = |total: usize, window: &VecDeque<&str>| {
                total + len + if window.is_empty() { 0 } else { sep_len }
            };

            if joined_len(total, &window) > self.config.chunk_size && !window.is_empty() {
                push_joined(&mut chunks, &window, separator);

                while total > self.config.chunk_overlap
                    || (total > 0 && joined_len(total, &window) > self.config.chunk_size)
                {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    total -= char_len(front) + if window.is_empty() { 0 } else { sep_len };
                }
            }

            total += len + if window.is_empty() { 0 } else { sep_len };
            window.push_back(piece.as_str());
        }

        push_joined(&mut chunks, &window, separator);
        chunks
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(SplitterConfig::default())
    }
}

fn pick_separator<'a, 'b>(text: &str, separators: &'b [&'a str]) -> (&'a str, &'b [&'a str]) {
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() || text.contains(sep) {
            return (*sep, &separators[i + 1..]);
        }
    }
    ("", &[])
}

fn push_joined(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
