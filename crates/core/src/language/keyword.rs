//! キーワード集計
//!
//! 境界付きの完全一致でキーワードを数えます。一致した部分は作業用コピーから
//! 消してから次のキーワードを調べるため、重なり合うキーワード (`if` と `ifdef`、
//! `==` と `===` など) が同じテキストを二重に数えることはありません。
//! 長いキーワードから順に照合します。
//!
//! カテゴリをまたいで同じ作業用コピーを [`KeywordTally::consume`] に渡すと、
//! 先のカテゴリで一致したテキストは後のカテゴリでは数えられません。

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::profile::ComplexityKeywords;

/// キーワードと累計カウント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmplxKeywordEntry {
    pub keyword: String,
    pub count: usize,
}

/// 文字クラス。同じクラスの文字が隣接していればトークンの途中とみなす
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Operator,
    Other,
}

fn classify_char(c: char, word_chars: &str) -> CharClass {
    if c.is_alphanumeric() || c == '_' || c == '$' || word_chars.contains(c) {
        CharClass::Word
    } else if "=<>!&|+-*/%^~?:".contains(c) {
        CharClass::Operator
    } else {
        CharClass::Other
    }
}

/// 1カテゴリ分のキーワード集計
#[derive(Debug, Clone, Default)]
pub struct KeywordTally {
    entries: Vec<CmplxKeywordEntry>,
    /// 照合順 (長い順) の entries インデックス
    order: Vec<usize>,
    /// 英数字以外で識別子の一部とみなす文字 (CSS の `-` など)
    word_chars: String,
}

impl KeywordTally {
    /// キーワード一覧から集計器を作成
    ///
    /// 大文字小文字を区別しない言語では、キーワードを小文字化して保持します
    /// (行はパイプライン側で小文字化済み)。
    #[must_use]
    pub fn new<S: AsRef<str>>(keywords: &[S], case_sensitive: bool) -> Self {
        let mut entries: Vec<CmplxKeywordEntry> = Vec::with_capacity(keywords.len());
        for kw in keywords {
            let kw = kw.as_ref();
            if kw.is_empty() {
                continue;
            }
            let keyword = if case_sensitive {
                String::from(kw)
            } else {
                kw.to_lowercase()
            };
            if entries.iter().all(|e| e.keyword != keyword) {
                entries.push(CmplxKeywordEntry { keyword, count: 0 });
            }
        }

        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|&a, &b| entries[b].keyword.len().cmp(&entries[a].keyword.len()));

        Self {
            entries,
            order,
            word_chars: String::new(),
        }
    }

    /// 識別子に含まれる追加の文字を指定する
    #[must_use]
    pub fn with_word_chars(mut self, word_chars: &str) -> Self {
        self.word_chars = String::from(word_chars);
        self
    }

    /// 1行を集計し、この行で一致した数を返す
    pub fn tally(&mut self, line: &str) -> usize {
        let mut scratch = String::from(line);
        self.consume(&mut scratch)
    }

    /// 作業用コピーを集計し、一致した部分を空白に置き換える
    pub fn consume(&mut self, scratch: &mut String) -> usize {
        if self.entries.is_empty() || scratch.is_empty() {
            return 0;
        }

        let mut hits = 0;
        for &idx in &self.order {
            let entry = &mut self.entries[idx];
            let (found, rest) = consume_matches(scratch, &entry.keyword, &self.word_chars);
            if found > 0 {
                entry.count += found;
                hits += found;
                *scratch = rest;
            }
        }

        hits
    }

    /// カウントを 0 に戻す
    pub fn reset(&mut self) {
        for e in &mut self.entries {
            e.count = 0;
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CmplxKeywordEntry] {
        &self.entries
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// キーワード -> カウントのマップに変換
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, usize> {
        self.entries
            .iter()
            .map(|e| (e.keyword.clone(), e.count))
            .collect()
    }
}

/// `keyword` の境界付き出現をすべて空白に置き換え、件数と置換後の文字列を返す
fn consume_matches(haystack: &str, keyword: &str, word_chars: &str) -> (usize, String) {
    let (Some(first), Some(last)) = (keyword.chars().next(), keyword.chars().next_back()) else {
        return (0, String::new());
    };
    let head_class = classify_char(first, word_chars);
    let tail_class = classify_char(last, word_chars);

    let mut found = 0;
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    let mut search_from = 0;

    while let Some(offset) = haystack[search_from..].find(keyword) {
        let start = search_from + offset;
        let end = start + keyword.len();

        let before_ok = head_class == CharClass::Other
            || haystack[..start]
                .chars()
                .next_back()
                .is_none_or(|c| classify_char(c, word_chars) != head_class);
        let after_ok = tail_class == CharClass::Other
            || haystack[end..]
                .chars()
                .next()
                .is_none_or(|c| classify_char(c, word_chars) != tail_class);

        if before_ok && after_ok {
            found += 1;
            out.push_str(&haystack[cursor..start]);
            out.push(' ');
            cursor = end;
            search_from = end;
        } else {
            search_from = start + first.len_utf8();
        }
    }

    out.push_str(&haystack[cursor..]);
    (found, out)
}

/// 複雑度カテゴリ別の集計値
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityCounts {
    pub calc: usize,
    pub cond: usize,
    pub logic: usize,
    pub preproc: usize,
    pub assign: usize,
    pub pointer: usize,
}

/// 複雑度キーワードの集計 (全カテゴリ)
#[derive(Debug, Clone, Default)]
pub struct ComplexityTally {
    calc: KeywordTally,
    cond: KeywordTally,
    logic: KeywordTally,
    preproc: KeywordTally,
    assign: KeywordTally,
    pointer: KeywordTally,
}

impl ComplexityTally {
    #[must_use]
    pub fn new(keywords: &ComplexityKeywords, case_sensitive: bool) -> Self {
        Self {
            calc: KeywordTally::new(keywords.calc.as_slice(), case_sensitive),
            cond: KeywordTally::new(keywords.cond.as_slice(), case_sensitive),
            logic: KeywordTally::new(keywords.logic.as_slice(), case_sensitive),
            preproc: KeywordTally::new(keywords.preproc.as_slice(), case_sensitive),
            assign: KeywordTally::new(keywords.assign.as_slice(), case_sensitive),
            pointer: KeywordTally::new(keywords.pointer.as_slice(), case_sensitive),
        }
    }

    #[must_use]
    pub fn with_word_chars(self, word_chars: &str) -> Self {
        Self {
            calc: self.calc.with_word_chars(word_chars),
            cond: self.cond.with_word_chars(word_chars),
            logic: self.logic.with_word_chars(word_chars),
            preproc: self.preproc.with_word_chars(word_chars),
            assign: self.assign.with_word_chars(word_chars),
            pointer: self.pointer.with_word_chars(word_chars),
        }
    }

    /// 1行を集計する。カテゴリ間でも同じ演算子を二重に数えない
    pub fn tally(&mut self, line: &str) {
        let mut scratch = String::from(line);
        self.preproc.consume(&mut scratch);
        self.logic.consume(&mut scratch);
        self.assign.consume(&mut scratch);
        self.calc.consume(&mut scratch);
        self.cond.consume(&mut scratch);
        self.pointer.consume(&mut scratch);
    }

    #[must_use]
    pub fn counts(&self) -> ComplexityCounts {
        ComplexityCounts {
            calc: self.calc.total(),
            cond: self.cond.total(),
            logic: self.logic.total(),
            preproc: self.preproc.total(),
            assign: self.assign.total(),
            pointer: self.pointer.total(),
        }
    }
}
