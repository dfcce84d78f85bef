//! Post content formatting.
//!
//! Post content is plain text with two bits of markup: a fenced code block
//! (```` ```lang ... ``` ````) and inline code spans (`` `code` ``). Only the
//! first fenced block is lifted out; anything after it stays in the prose.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// First fenced block: optional language tag, newline, lazily matched body.
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(\w+)?\n([\s\S]*?)```").expect("code block pattern is valid")
});

/// A backtick pair with at least one non-backtick character between.
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("inline code pattern is valid"));

/// Language label shown when a code block has no tag.
pub const DEFAULT_LANGUAGE: &str = "text";

/// A run of prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    /// Literal text.
    Text(String),
    /// Inline code, without the surrounding backticks.
    Code(String),
}

/// The extracted fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Language tag from the opening fence, if any.
    pub language: Option<String>,
    /// Block body, trimmed.
    pub code: String,
}

impl CodeBlock {
    /// Language tag, or [`DEFAULT_LANGUAGE`] when the fence had none.
    #[must_use]
    pub fn language_label(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// Post content split for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedContent {
    /// Prose with inline code marked.
    pub prose: Vec<Segment>,
    /// The first fenced code block, if present.
    pub code: Option<CodeBlock>,
}

impl FormattedContent {
    /// Parse raw post content.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let Some(caps) = CODE_BLOCK.captures(content) else {
            return Self {
                prose: split_inline(content),
                code: None,
            };
        };

        let fence = caps.get(0).map_or(0..0, |m| m.range());
        let mut prose = String::with_capacity(content.len());
        prose.push_str(&content[..fence.start]);
        prose.push_str(&content[fence.end..]);

        let code = CodeBlock {
            language: caps.get(1).map(|m| m.as_str().to_string()),
            code: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        };

        Self {
            prose: split_inline(prose.trim()),
            code: Some(code),
        }
    }

    /// Prose text with inline code backticks restored.
    #[must_use]
    pub fn prose_text(&self) -> String {
        self.prose
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.clone(),
                Segment::Code(code) => format!("`{code}`"),
            })
            .collect()
    }
}

/// Split prose into text and inline code segments. Empty text runs are dropped.
fn split_inline(prose: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in INLINE_CODE.find_iter(prose) {
        if m.start() > last {
            segments.push(Segment::Text(prose[last..m.start()].to_string()));
        }
        let inner = &m.as_str()[1..m.as_str().len() - 1];
        segments.push(Segment::Code(inner.to_string()));
        last = m.end();
    }

    if last < prose.len() {
        segments.push(Segment::Text(prose[last..].to_string()));
    }

    segments
}
