//! 論理行 (LSLOC) の判定
//!
//! 前処理済みの行が何個の論理単位を持つかを、言語ファミリーごとの規則で判定します。

use super::profile::{LslocRule, TagOpenRule};

/// 1行あたりの寄与
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineWeight {
    /// 物理行 (0 or 1)
    pub physical: usize,
    /// 論理行の数
    pub logical: usize,
}

/// 行末にあるとき文が次の行へ続くとみなす文字
const CONTINUATION_CHARS: &[char] = &[
    ',', '+', '-', '*', '/', '=', '&', '|', '(', '[', '.', '?', ':', '<', '>', '!',
];

/// 行分類器
///
/// `Statement` 規則は文が行をまたぐため状態を持ちます。
#[derive(Debug, Clone)]
pub struct LineClassifier {
    rule: LslocRule,
    statement: StatementState,
}

/// 行をまたぐ文の状態
#[derive(Debug, Clone, Copy, Default)]
struct StatementState {
    pending: bool,
    paren_depth: usize,
}

impl LineClassifier {
    #[must_use]
    pub const fn new(rule: LslocRule) -> Self {
        Self {
            rule,
            statement: StatementState {
                pending: false,
                paren_depth: 0,
            },
        }
    }

    pub fn reset(&mut self) {
        self.statement = StatementState::default();
    }

    /// 未完了の文を持ち越しているか
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.statement.pending
    }

    /// 行を分類する
    pub fn classify(&mut self, line: &str) -> LineWeight {
        let line = line.trim();
        if line.is_empty() {
            return LineWeight::default();
        }

        let logical = match &self.rule {
            LslocRule::Markup { tag_open } => count_tag_opens(line, *tag_open),
            LslocRule::Statement {
                terminators,
                block_open,
            } => self.statement.count(line, terminators, block_open),
            LslocRule::Physical => 1,
        };

        LineWeight {
            physical: 1,
            logical,
        }
    }

    /// ファイル末尾で未完了の文を1つの論理行として確定させる
    pub fn finish(&mut self) -> usize {
        let flushed = usize::from(self.statement.pending);
        self.reset();
        flushed
    }
}

impl StatementState {
    fn count(&mut self, line: &str, terminators: &str, block_open: &str) -> usize {
        let mut count = 0;

        for c in line.chars() {
            match c {
                '(' => {
                    self.paren_depth += 1;
                    self.pending = true;
                }
                ')' => self.paren_depth = self.paren_depth.saturating_sub(1),
                _ if self.paren_depth == 0 && terminators.contains(c) => {
                    count += 1;
                    self.pending = false;
                }
                _ if block_open.contains(c) => {
                    count += 1;
                    self.pending = false;
                }
                '}' | ']' => {}
                _ if c.is_whitespace() => {}
                _ => self.pending = true,
            }
        }

        // 継続を示さない行末で文を確定 (セミコロン省略の JS など)
        if self.pending && self.paren_depth == 0 {
            let ends_open = line.ends_with(CONTINUATION_CHARS);
            if !ends_open {
                count += 1;
                self.pending = false;
            }
        }

        count
    }
}

/// タグ開始 `<` の数を数える
///
/// 閉じタグは開始タグとして二重に数えない。
#[must_use]
pub fn count_tag_opens(line: &str, rule: TagOpenRule) -> usize {
    match rule {
        TagOpenRule::NeutralizeCloseTags => line.replace("</", " ").matches('<').count(),
        TagOpenRule::SkipSlashFollowing => {
            let bytes = line.as_bytes();
            bytes
                .iter()
                .enumerate()
                .filter(|&(i, &b)| b == b'<' && bytes.get(i + 1) != Some(&b'/'))
                .count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn markup(rule: TagOpenRule) -> LineClassifier {
        LineClassifier::new(LslocRule::Markup { tag_open: rule })
    }

    fn statement() -> LineClassifier {
        LineClassifier::new(LslocRule::Statement {
            terminators: ";".to_string(),
            block_open: "{".to_string(),
        })
    }

    #[test]
    fn test_nested_tags_both_dialects() {
        for rule in [TagOpenRule::NeutralizeCloseTags, TagOpenRule::SkipSlashFollowing] {
            let mut c = markup(rule);
            assert_eq!(
                c.classify("<a><b></b></a>"),
                LineWeight {
                    physical: 1,
                    logical: 2
                }
            );
        }
    }

    #[test]
    fn test_text_without_tags_is_physical_only() {
        let mut c = markup(TagOpenRule::NeutralizeCloseTags);
        assert_eq!(
            c.classify("plain text"),
            LineWeight {
                physical: 1,
                logical: 0
            }
        );
        assert_eq!(c.classify("   "), LineWeight::default());
    }

    #[test]
    fn test_close_tag_only_line() {
        let mut c = markup(TagOpenRule::SkipSlashFollowing);
        assert_eq!(c.classify("</html>").logical, 0);
    }

    #[test]
    fn test_statement_terminators_and_blocks() {
        let mut c = statement();
        assert_eq!(c.classify("function f(a, b) {").logical, 1);
        assert_eq!(c.classify("var x = 1; var y = 2;").logical, 2);
        assert_eq!(c.classify("}").logical, 0);
    }

    #[test]
    fn test_for_header_semicolons_not_counted() {
        let mut c = statement();
        assert_eq!(c.classify("for (i = 0; i < n; i++) {").logical, 1);
    }

    #[test]
    fn test_statement_without_semicolon_ends_at_line() {
        let mut c = statement();
        assert_eq!(c.classify("x = 1").logical, 1);
        assert_eq!(c.classify("y = a +").logical, 0);
        assert_eq!(c.classify("b").logical, 1);
    }

    #[test]
    fn test_finish_flushes_pending_statement() {
        let mut c = statement();
        assert_eq!(c.classify("call(a,").logical, 0);
        assert!(c.is_pending());
        assert_eq!(c.finish(), 1);
        assert!(!c.is_pending());
        assert_eq!(c.finish(), 0);
    }

    #[test]
    fn test_physical_rule() {
        let mut c = LineClassifier::new(LslocRule::Physical);
        assert_eq!(c.classify("anything").logical, 1);
    }
}
