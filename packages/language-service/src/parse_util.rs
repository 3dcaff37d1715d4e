//! Span Utilities
//!
//! Offset arithmetic shared by the template AST, the HTML AST and the
//! expression AST. All spans inside a parsed template are template-relative;
//! only the template span itself is document-relative.

use serde::{Deserialize, Serialize};

/// Half-open range of source offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `self` lies entirely inside `other`.
    pub fn is_within(&self, other: &Span) -> bool {
        self.start >= other.start && self.end <= other.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Anything that occupies a region of the template source.
pub trait Spanned {
    fn source_span(&self) -> Span;
}

/// Inclusive containment: the offset right after the last character of a
/// span is inside it.
pub fn in_span(position: usize, span: Option<Span>) -> bool {
    match span {
        Some(span) => position >= span.start && position <= span.end,
        None => false,
    }
}

/// Half-open containment.
pub fn in_span_exclusive(position: usize, span: Option<Span>) -> bool {
    match span {
        Some(span) => position >= span.start && position < span.end,
        None => false,
    }
}

/// Shifts a span from a nested coordinate space into its parent.
pub fn offset_span(span: Span, amount: usize) -> Span {
    Span::new(span.start + amount, span.end + amount)
}

/// `span` is strictly narrower than `other` and contained in it.
pub fn is_narrower(span: Span, other: Span) -> bool {
    span.is_within(&other) && span.len() < other.len()
}
