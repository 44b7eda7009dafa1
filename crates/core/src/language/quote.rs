//! 引用符の前処理
//!
//! キーワードの誤カウントを防ぐための行変換群です。適用順は固定で、
//! 呼び出し側 (カウンタパイプライン) は次の順序を守る必要があります。
//!
//! 1. [`QuotePreprocessor::remove_escapes`] - エスケープされた引用符を削除
//! 2. [`QuotePreprocessor::collapse_empty`] - 空リテラル `""` を畳む
//! 3. (コメント除去)
//! 4. [`QuotePreprocessor::strip_paths`] - マークアップのみ、パス/URI を削除
//! 5. (LSLOC 判定)
//! 6. [`QuotePreprocessor::strip_contents`] - 引用符の中身を削除 (デリミタは残す)

use alloc::string::String;
use alloc::vec::Vec;

use super::profile::LanguageProfile;

const URI_SCHEMES: [&str; 2] = ["://", "mailto:"];

/// 引用符まわりの行変換
#[derive(Debug, Clone)]
pub struct QuotePreprocessor {
    quotes: Vec<char>,
    escapes: Vec<String>,
}

impl QuotePreprocessor {
    #[must_use]
    pub fn new(profile: &LanguageProfile) -> Self {
        Self {
            quotes: profile.quotes.clone(),
            escapes: profile.escapes.clone(),
        }
    }

    /// エスケープシーケンスを削除する
    #[must_use]
    pub fn remove_escapes(&self, line: &str) -> String {
        let mut out = String::from(line);
        for esc in self.escapes.iter().filter(|e| !e.is_empty()) {
            if out.contains(esc.as_str()) {
                out = out.replace(esc.as_str(), "");
            }
        }
        out
    }

    /// 隣接した引用符の組 (空リテラル) を削除する
    #[must_use]
    pub fn collapse_empty(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            if self.quotes.contains(&c) && chars.peek() == Some(&c) {
                chars.next();
                continue;
            }
            out.push(c);
        }
        out
    }

    /// 引用符で囲まれた中身を削除する (デリミタは残す)
    ///
    /// 閉じられていない引用符以降はそのまま残します。
    #[must_use]
    pub fn strip_contents(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(pos) = rest.find(|c: char| self.quotes.contains(&c)) {
            let Some(q) = rest[pos..].chars().next() else {
                break;
            };
            let body_start = pos + q.len_utf8();
            match rest[body_start..].find(q) {
                Some(close) => {
                    out.push_str(&rest[..body_start]);
                    out.push(q);
                    rest = &rest[body_start + close + q.len_utf8()..];
                }
                None => break,
            }
        }

        out.push_str(rest);
        out
    }

    /// ファイルパスや URI に見えるトークンを削除する
    ///
    /// トークンは空白・引用符・`<>=()` で区切られた連続文字列です。
    /// `://` を含むか、パス区切りと `.` の両方を含むものをパスとみなします。
    #[must_use]
    pub fn strip_paths(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut token_start: Option<usize> = None;

        for (i, c) in line.char_indices() {
            if self.is_path_separator(c) {
                if let Some(start) = token_start.take() {
                    push_unless_path(&mut out, &line[start..i]);
                }
                out.push(c);
            } else if token_start.is_none() {
                token_start = Some(i);
            }
        }
        if let Some(start) = token_start {
            push_unless_path(&mut out, &line[start..]);
        }
        out
    }

    fn is_path_separator(&self, c: char) -> bool {
        c.is_whitespace() || matches!(c, '<' | '>' | '=' | '(' | ')') || self.quotes.contains(&c)
    }
}

fn push_unless_path(out: &mut String, token: &str) {
    if !looks_like_path(token) {
        out.push_str(token);
    }
}

fn looks_like_path(token: &str) -> bool {
    if URI_SCHEMES.iter().any(|s| token.contains(s)) {
        return true;
    }
    let has_separator = token.contains('/') || token.contains('\\');
    has_separator && token.contains('.') && token.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::builtin;

    fn js() -> QuotePreprocessor {
        QuotePreprocessor::new(&builtin::javascript())
    }

    #[test]
    fn test_remove_escaped_quotes() {
        let q = js();
        assert_eq!(q.remove_escapes(r#"s = "say \"hi\"";"#), r#"s = "say hi";"#);
    }

    #[test]
    fn test_escaped_backslash_before_quote() {
        let q = js();
        // `\\` が先に消えるので、閉じ引用符は生き残る
        assert_eq!(q.remove_escapes(r#"p = "c:\\";"#), r#"p = "c:";"#);
    }

    #[test]
    fn test_collapse_empty_literal() {
        let q = js();
        assert_eq!(q.collapse_empty(r#"a = "" + '';"#), "a =  + ;");
    }

    #[test]
    fn test_strip_contents_keeps_delimiters() {
        let q = js();
        assert_eq!(q.strip_contents(r#"x = "if while" + 'for';"#), r#"x = "" + '';"#);
    }

    #[test]
    fn test_strip_contents_unterminated() {
        let q = js();
        assert_eq!(q.strip_contents(r#"a "b" c "d"#), r#"a "" c "d"#);
    }

    #[test]
    fn test_strip_paths_removes_uri_and_relative_paths() {
        let q = QuotePreprocessor::new(&builtin::html());
        assert_eq!(
            q.strip_paths(r#"<a href="http://example.com/x">"#),
            r#"<a href="">"#
        );
        assert_eq!(
            q.strip_paths(r#"<img src="../img/logo.png">"#),
            r#"<img src="">"#
        );
    }

    #[test]
    fn test_strip_paths_keeps_close_tags() {
        let q = QuotePreprocessor::new(&builtin::html());
        assert_eq!(q.strip_paths("<b>x</b> 1.5"), "<b>x</b> 1.5");
    }
}
