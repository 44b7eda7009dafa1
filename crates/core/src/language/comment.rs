//! コメント除去ステートマシン
//!
//! 1行ずつコメント部分を取り除き、空行・全体コメント行・埋め込みコメント行を集計します。
//! ブロックコメントの「まだ内側にいる」状態は行をまたいで保持され、
//! [`CommentStripper::reset`] でユニットごとに初期化されます。

use alloc::string::String;
use alloc::vec::Vec;

use super::profile::{BlockDelimiter, LanguageProfile};

/// コメント関連の集計値
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommentTally {
    /// 空行
    pub blank: usize,
    /// 行全体がコメントだった行
    pub whole: usize,
    /// コードと同じ行にあるコメント
    pub embedded: usize,
}

/// コメント除去器
///
/// 閉じられないブロックコメントはエラーにせず、ファイル末尾までコメントとして扱います。
#[derive(Debug, Clone)]
pub struct CommentStripper {
    line_markers: Vec<String>,
    blocks: Vec<BlockDelimiter>,
    nested: bool,
    quotes: Vec<char>,
    /// 現在開いているブロックのインデックス
    open_block: Option<usize>,
    depth: usize,
    tally: CommentTally,
}

impl CommentStripper {
    /// プロファイルからコメント除去器を作成
    ///
    /// 大文字小文字を区別しない言語では、行と同じくデリミタも小文字化します。
    /// 空のマーカーやデリミタは無視します。
    #[must_use]
    pub fn new(profile: &LanguageProfile) -> Self {
        let syntax = &profile.comments;
        let line_markers = syntax
            .line
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| profile.fold_case(m))
            .collect();
        let blocks = syntax
            .block
            .iter()
            .filter(|b| !b.open.is_empty() && !b.close.is_empty())
            .map(|b| BlockDelimiter {
                open: profile.fold_case(&b.open),
                close: profile.fold_case(&b.close),
            })
            .collect();
        let quotes = if syntax.quote_aware {
            profile.quotes.clone()
        } else {
            Vec::new()
        };

        Self {
            line_markers,
            blocks,
            nested: syntax.nested,
            quotes,
            open_block: None,
            depth: 0,
            tally: CommentTally::default(),
        }
    }

    /// 持ち越し状態と集計値をクリアする
    pub fn reset(&mut self) {
        self.open_block = None;
        self.depth = 0;
        self.tally = CommentTally::default();
    }

    #[must_use]
    pub const fn tally(&self) -> CommentTally {
        self.tally
    }

    #[must_use]
    pub const fn is_in_block_comment(&self) -> bool {
        self.open_block.is_some()
    }

    /// トリム済みの1行からコメントを取り除いて返す
    pub fn strip(&mut self, line: &str) -> String {
        if line.is_empty() {
            self.tally.blank += 1;
            return String::new();
        }

        let mut code = String::with_capacity(line.len());
        let mut saw_comment = false;
        let mut in_quote: Option<char> = None;
        let mut rest = line;

        while let Some(c) = rest.chars().next() {
            if let Some(idx) = self.open_block {
                saw_comment = true;
                let block = &self.blocks[idx];
                if self.nested && rest.starts_with(block.open.as_str()) {
                    self.depth += 1;
                    rest = &rest[block.open.len()..];
                } else if rest.starts_with(block.close.as_str()) {
                    rest = &rest[block.close.len()..];
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        self.open_block = None;
                    }
                } else {
                    rest = &rest[c.len_utf8()..];
                }
                continue;
            }

            if let Some(q) = in_quote {
                code.push(c);
                if c == q {
                    in_quote = None;
                }
                rest = &rest[c.len_utf8()..];
                continue;
            }

            if self.quotes.contains(&c) {
                in_quote = Some(c);
                code.push(c);
                rest = &rest[c.len_utf8()..];
                continue;
            }

            if self.line_markers.iter().any(|m| rest.starts_with(m.as_str())) {
                saw_comment = true;
                break;
            }

            if let Some(idx) = self.blocks.iter().position(|b| rest.starts_with(b.open.as_str())) {
                saw_comment = true;
                self.open_block = Some(idx);
                self.depth = 1;
                rest = &rest[self.blocks[idx].open.len()..];
                continue;
            }

            code.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if saw_comment {
            if code.trim().is_empty() {
                self.tally.whole += 1;
            } else {
                self.tally.embedded += 1;
            }
        }

        code
    }
}
