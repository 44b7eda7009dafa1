//! 言語プロファイル定義
//!
//! 大文字小文字の区別、コメント構文、キーワード表、LSLOC 判定規則など、
//! 1つの言語を数えるために必要な設定をまとめます。
//! プロファイルは計測中に変更されることはなく、同じ言語のユニット間で共有されます。

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// ブロックコメントの開始/終了デリミタ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDelimiter {
    pub open: String,
    pub close: String,
}

impl BlockDelimiter {
    #[must_use]
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
        }
    }
}

/// コメント構文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentSyntax {
    /// 行コメントの開始記号 (`//`, `#` など)
    pub line: Vec<String>,
    /// ブロックコメント
    pub block: Vec<BlockDelimiter>,
    /// ブロックコメントのネストを許すか
    pub nested: bool,
    /// 文字列リテラル内のコメント記号を無視するか
    ///
    /// マークアップではテキスト中の `'` が文字列扱いされると
    /// 後続の `<!--` を見落とすため、無効にします。
    pub quote_aware: bool,
}

impl Default for CommentSyntax {
    fn default() -> Self {
        Self {
            line: Vec::new(),
            block: Vec::new(),
            nested: false,
            quote_aware: true,
        }
    }
}

/// マークアップ方言ごとのタグ開始の数え方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagOpenRule {
    /// `</` を区切り文字に置き換えてから、残った `<` をすべて数える
    NeutralizeCloseTags,
    /// 置換せずに、直後が `/` でない `<` だけを数える
    SkipSlashFollowing,
}

/// 論理行 (LSLOC) の判定規則
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LslocRule {
    /// タグ開始の出現数 = 論理行数
    Markup { tag_open: TagOpenRule },
    /// 文終端とブロック開始で論理行を数える (スクリプト/スタイル系)
    Statement {
        terminators: String,
        block_open: String,
    },
    /// 空でない物理行 1 行 = 論理行 1
    #[default]
    Physical,
}

/// 複雑度キーワードのカテゴリ別リスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityKeywords {
    pub calc: Vec<String>,
    pub cond: Vec<String>,
    pub logic: Vec<String>,
    pub preproc: Vec<String>,
    pub assign: Vec<String>,
    pub pointer: Vec<String>,
}

/// 別言語が埋め込まれる領域 (`<script>` など)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedRegion {
    /// 開始タグの先頭 (`<script`)。タグ本体は次の `>` で終わる
    pub open: String,
    /// 終了マーカー (`</script>`)
    pub close: String,
    /// 領域内を数えるプロファイル名
    pub language: String,
}

impl EmbeddedRegion {
    #[must_use]
    pub fn new(open: &str, close: &str, language: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            language: language.to_string(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_quotes() -> Vec<char> {
    vec!['"', '\'']
}

/// 言語プロファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProfile {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub comments: CommentSyntax,
    #[serde(default = "default_quotes")]
    pub quotes: Vec<char>,
    /// エスケープされた引用符などの削除対象シーケンス (適用順)
    #[serde(default)]
    pub escapes: Vec<String>,
    #[serde(default)]
    pub exec_keywords: Vec<String>,
    #[serde(default)]
    pub data_keywords: Vec<String>,
    #[serde(default)]
    pub complexity: ComplexityKeywords,
    /// 英数字と `_` `$` 以外で識別子に含まれる文字 (CSS の `-` など)
    ///
    /// キーワードがこれらの文字で続く長い識別子の一部として一致しないようにします。
    #[serde(default)]
    pub word_chars: String,
    #[serde(default)]
    pub lsloc: LslocRule,
    /// ファイルパス/URI リテラルを事前に削除するか (マークアップ向け)
    #[serde(default)]
    pub strip_paths: bool,
    #[serde(default)]
    pub embedded: Vec<EmbeddedRegion>,
}

impl LanguageProfile {
    /// 最小構成のプロファイルを作成 (コメントなし、物理行 = 論理行)
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: String::new(),
            case_sensitive: true,
            extensions: Vec::new(),
            comments: CommentSyntax::default(),
            quotes: default_quotes(),
            escapes: Vec::new(),
            exec_keywords: Vec::new(),
            data_keywords: Vec::new(),
            complexity: ComplexityKeywords::default(),
            word_chars: String::new(),
            lsloc: LslocRule::Physical,
            strip_paths: false,
            embedded: Vec::new(),
        }
    }

    /// 大文字小文字を区別しない言語向けに行を正規化する
    #[must_use]
    pub fn fold_case(&self, line: &str) -> String {
        if self.case_sensitive {
            line.to_string()
        } else {
            line.to_lowercase()
        }
    }

    /// 埋め込み領域を持つかどうか
    #[must_use]
    pub fn has_embedded_regions(&self) -> bool {
        !self.embedded.is_empty()
    }

    /// 空のデリミタやマーカーを検出する
    ///
    /// 空の開始記号はどの位置にも一致してしまうため、外部から読み込んだ
    /// プロファイルは使用前に検査します。
    ///
    /// # Errors
    /// 問題のある項目の説明を返します。
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.comments.line.iter().any(String::is_empty) {
            return Err("empty line comment marker");
        }
        if self
            .comments
            .block
            .iter()
            .any(|b| b.open.is_empty() || b.close.is_empty())
        {
            return Err("empty block comment delimiter");
        }
        if self
            .embedded
            .iter()
            .any(|r| r.open.is_empty() || r.close.is_empty())
        {
            return Err("empty embedded region marker");
        }
        if self.escapes.iter().any(String::is_empty) {
            return Err("empty escape sequence");
        }
        Ok(())
    }

    /// 拡張子がこのプロファイルに属するか (大文字小文字は無視)
    #[must_use]
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
