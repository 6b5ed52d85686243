use std::fmt;

pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Word count and reading time for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingEstimate {
    pub words: usize,
    pub minutes: usize,
}

impl ReadingEstimate {
    /// Count whitespace-separated words. Reading time rounds up and is never below one minute.
    pub fn with_rate(text: &str, words_per_minute: usize) -> Self {
        let words = text.split_whitespace().count();
        let minutes = words.div_ceil(words_per_minute.max(1)).max(1);
        Self { words, minutes }
    }
}

impl fmt::Display for ReadingEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} words • {} min read", self.words, self.minutes)
    }
}

pub fn estimate(text: &str) -> ReadingEstimate {
    ReadingEstimate::with_rate(text, DEFAULT_WORDS_PER_MINUTE)
}
