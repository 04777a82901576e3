use std::fs;

use serde::Deserialize;

/// Black-box FAQ capability: always answers with a string. The "no
/// answer" sentinel is a valid answer, not an error.
pub trait FaqProvider: Send + Sync {
    fn lookup(&self, query: &str) -> String;
}

pub const NO_ANSWER: &str = "Sorry, I couldn't find an answer in the FAQ.";

const TOP_K: usize = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    pub title: String,
    pub text: String,
}

/// Keyword/substring scoring over a flat list of FAQ entries. A
/// vector-search implementation could replace this behind the same
/// trait.
pub struct KeywordFaq {
    texts: Vec<String>,
}

impl KeywordFaq {
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        let texts = entries
            .into_iter()
            .map(|e| format!("{}\n\n{}", e.title, e.text).trim().to_string())
            .collect();
        Self { texts }
    }

    /// Missing or malformed data degrades to an empty knowledge base;
    /// every lookup then returns the sentinel.
    pub fn from_file(path: &str) -> Self {
        let entries = fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Vec<FaqEntry>>(&raw).ok())
            .unwrap_or_else(|| {
                tracing::warn!(path, "FAQ data not loadable, starting with empty FAQ");
                Vec::new()
            });
        Self::from_entries(entries)
    }
}

impl FaqProvider for KeywordFaq {
    fn lookup(&self, query: &str) -> String {
        let q = query.to_lowercase();

        let mut scored: Vec<(usize, &String)> = Vec::new();
        for text in &self.texts {
            let lowered = text.to_lowercase();
            let mut score = 0;
            for token in q.split_whitespace() {
                if lowered.contains(token) {
                    score += 1;
                }
            }
            if lowered.contains(&q) {
                score += 2;
            }
            if score > 0 {
                scored.push((score, text));
            }
        }

        if scored.is_empty() {
            return NO_ANSWER.to_string();
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .iter()
            .take(TOP_K)
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
