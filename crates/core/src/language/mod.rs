pub mod builtin;
pub mod classify;
pub mod comment;
pub mod keyword;
pub mod profile;
pub mod quote;

pub use classify::{LineClassifier, LineWeight, count_tag_opens};
pub use comment::{CommentStripper, CommentTally};
pub use keyword::{CmplxKeywordEntry, ComplexityCounts, ComplexityTally, KeywordTally};
pub use profile::{
    BlockDelimiter, CommentSyntax, ComplexityKeywords, EmbeddedRegion, LanguageProfile, LslocRule,
    TagOpenRule,
};
pub use quote::QuotePreprocessor;

/// 行頭のバイトオーダーマーク (U+FEFF) を取り除く
#[must_use]
pub fn strip_bom(line: &str) -> &str {
    line.strip_prefix('\u{feff}').unwrap_or(line)
}
