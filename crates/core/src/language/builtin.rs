//! 組み込みプロファイル
//!
//! 外部設定が無くても動くように、マークアップ (HTML/XML) と、
//! HTML に埋め込まれるスクリプト/スタイル (JavaScript/CSS) を用意しています。

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use super::profile::{
    BlockDelimiter, CommentSyntax, ComplexityKeywords, EmbeddedRegion, LanguageProfile, LslocRule,
    TagOpenRule,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn markup_comments() -> CommentSyntax {
    CommentSyntax {
        line: Vec::new(),
        block: vec![BlockDelimiter::new("<!--", "-->")],
        nested: false,
        quote_aware: false,
    }
}

fn c_family_comments(line: bool) -> CommentSyntax {
    CommentSyntax {
        line: if line { strings(&["//"]) } else { Vec::new() },
        block: vec![BlockDelimiter::new("/*", "*/")],
        nested: false,
        quote_aware: true,
    }
}

fn statement_rule() -> LslocRule {
    LslocRule::Statement {
        terminators: ";".to_string(),
        block_open: "{".to_string(),
    }
}

/// すべての組み込みプロファイル
#[must_use]
pub fn all() -> Vec<LanguageProfile> {
    vec![html(), xml(), javascript(), css(), plain()]
}

/// HTML: `<script>` を JavaScript、`<style>` を CSS として切り出す
#[must_use]
pub fn html() -> LanguageProfile {
    LanguageProfile {
        name: "html".to_string(),
        version: "HTML5".to_string(),
        case_sensitive: false,
        extensions: strings(&["html", "htm", "shtml"]),
        comments: markup_comments(),
        quotes: vec!['"', '\''],
        escapes: Vec::new(),
        exec_keywords: strings(&[
            "<a", "<body", "<br", "<button", "<div", "<form", "<h1", "<h2", "<h3", "<h4", "<h5",
            "<h6", "<head", "<html", "<img", "<input", "<label", "<li", "<ol", "<option", "<p",
            "<script", "<select", "<span", "<style", "<table", "<tbody", "<td", "<textarea",
            "<th", "<thead", "<tr", "<ul",
        ]),
        data_keywords: strings(&["<!doctype", "<base", "<link", "<meta", "<title"]),
        complexity: ComplexityKeywords::default(),
        word_chars: "-".to_string(),
        lsloc: LslocRule::Markup {
            tag_open: TagOpenRule::NeutralizeCloseTags,
        },
        strip_paths: true,
        embedded: vec![
            EmbeddedRegion::new("<script", "</script>", "javascript"),
            EmbeddedRegion::new("<style", "</style>", "css"),
        ],
    }
}

/// XML: 閉じタグの置換を行わない方言
#[must_use]
pub fn xml() -> LanguageProfile {
    LanguageProfile {
        name: "xml".to_string(),
        version: "XML 1.0".to_string(),
        case_sensitive: true,
        extensions: strings(&["xml", "xsd", "xsl", "xslt", "svg", "xhtml"]),
        comments: markup_comments(),
        quotes: vec!['"', '\''],
        escapes: Vec::new(),
        exec_keywords: Vec::new(),
        data_keywords: strings(&["<?xml", "<!DOCTYPE", "<![CDATA["]),
        complexity: ComplexityKeywords::default(),
        word_chars: String::new(),
        lsloc: LslocRule::Markup {
            tag_open: TagOpenRule::SkipSlashFollowing,
        },
        strip_paths: true,
        embedded: Vec::new(),
    }
}

#[must_use]
pub fn javascript() -> LanguageProfile {
    LanguageProfile {
        name: "javascript".to_string(),
        version: "ECMAScript 2023".to_string(),
        case_sensitive: true,
        extensions: strings(&["js", "mjs", "cjs"]),
        comments: c_family_comments(true),
        quotes: vec!['"', '\'', '`'],
        escapes: strings(&["\\\\", "\\\"", "\\'", "\\`"]),
        exec_keywords: strings(&[
            "async", "await", "break", "case", "catch", "class", "continue", "debugger", "default",
            "delete", "do", "else", "export", "extends", "finally", "for", "function", "if",
            "import", "in", "instanceof", "new", "return", "super", "switch", "this", "throw",
            "try", "typeof", "void", "while", "with", "yield",
        ]),
        data_keywords: strings(&["const", "false", "let", "null", "true", "undefined", "var"]),
        complexity: ComplexityKeywords {
            calc: strings(&["+", "-", "*", "/", "%", "**", "++", "--"]),
            cond: strings(&["if", "else", "for", "while", "do", "switch", "case", "catch", "?"]),
            logic: strings(&[
                "&&", "||", "!", "==", "===", "!=", "!==", "<", ">", "<=", ">=", "??",
            ]),
            preproc: Vec::new(),
            assign: strings(&["=", "+=", "-=", "*=", "/=", "%=", "&&=", "||=", "??="]),
            pointer: Vec::new(),
        },
        word_chars: String::new(),
        lsloc: statement_rule(),
        strip_paths: false,
        embedded: Vec::new(),
    }
}

#[must_use]
pub fn css() -> LanguageProfile {
    LanguageProfile {
        name: "css".to_string(),
        version: "CSS3".to_string(),
        case_sensitive: false,
        extensions: strings(&["css"]),
        comments: c_family_comments(false),
        quotes: vec!['"', '\''],
        escapes: strings(&["\\\"", "\\'"]),
        exec_keywords: strings(&[
            "@font-face",
            "@import",
            "@keyframes",
            "@media",
            "@supports",
            "!important",
        ]),
        data_keywords: strings(&[
            "background", "border", "color", "content", "display", "font", "height", "margin",
            "padding", "position", "width",
        ]),
        complexity: ComplexityKeywords::default(),
        word_chars: "-".to_string(),
        lsloc: statement_rule(),
        strip_paths: false,
        embedded: Vec::new(),
    }
}

/// コメント構文を持たないテキスト
#[must_use]
pub fn plain() -> LanguageProfile {
    let mut p = LanguageProfile::new("plain");
    p.extensions = strings(&["txt"]);
    p
}
