#![cfg_attr(not(test), no_std)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

extern crate alloc;

pub mod language;

pub use language::{
    BlockDelimiter, CmplxKeywordEntry, CommentStripper, CommentSyntax, CommentTally,
    ComplexityCounts, ComplexityKeywords, ComplexityTally, EmbeddedRegion, KeywordTally,
    LanguageProfile, LineClassifier, LineWeight, LslocRule, QuotePreprocessor, TagOpenRule,
};
