//! Embedded-language extraction.
//!
//! Finds regions of another language inside a host (`<script>`/`<style>` in
//! HTML), appends one synthetic unit per region and keeps a copy of the host
//! text with those regions cut out. Regions inside host comments are ignored.

use std::borrow::Cow;
use std::sync::Arc;

use polyloc_core::LanguageProfile;

use crate::config::ExtractionLimits;
use crate::error::{EngineError, Result};
use crate::registry::ProfileRegistry;
use crate::unit::{SourceUnit, UnitArena, UnitId, UnitSource};

/// A region found in the host text. Offsets are byte offsets into the host.
#[derive(Debug)]
struct Region {
    /// Span removed from the host (between the open tag and the close marker).
    start: usize,
    end: usize,
    /// Span copied to the extract (`start..end` minus the dangling tag lines).
    body_start: usize,
    body_end: usize,
    profile: Arc<LanguageProfile>,
}

pub struct EmbeddedLanguageSplitter<'a> {
    registry: &'a ProfileRegistry,
    limits: ExtractionLimits,
}

impl<'a> EmbeddedLanguageSplitter<'a> {
    #[must_use]
    pub const fn new(registry: &'a ProfileRegistry, limits: ExtractionLimits) -> Self {
        Self { registry, limits }
    }

    /// Split the unit at `index` into host text plus embedded extracts.
    ///
    /// Returns `Ok(true)` when the extraction limit was reached. Nothing is
    /// appended in that case and the caller counts the host as-is. Units that
    /// are themselves extracts are never split again.
    ///
    /// # Errors
    ///
    /// Returns an error only if `index` does not name a unit in `units`.
    pub fn handle_embedded_code(
        &self,
        units: &mut UnitArena,
        index: UnitId,
        text: &str,
    ) -> Result<bool> {
        let unit = units
            .get(index)
            .ok_or_else(|| EngineError::Config(format!("no unit at {index}")))?;
        if !unit.is_top_level() || !unit.profile.has_embedded_regions() {
            return Ok(false);
        }

        let host_name = unit.name.clone();
        let host_profile = Arc::clone(&unit.profile);

        let Some(regions) = self.find_regions(&host_profile, text) else {
            log::warn!(
                "{host_name}: embedded region limit reached, counting as a single {} file",
                host_profile.name
            );
            return Ok(true);
        };
        if regions.is_empty() {
            return Ok(false);
        }

        let host_text = mask_regions(text, &regions);
        for (n, region) in regions.iter().enumerate() {
            let name = format!("{host_name}#{}.{}", n + 1, region.profile.name);
            let body = text[region.body_start..region.body_end].to_string();
            log::debug!("{name}: extracted {} bytes", body.len());
            let child = SourceUnit::new(
                name,
                UnitSource::Embedded(body),
                Arc::clone(&region.profile),
            );
            units.push_embedded(index, child)?;
        }

        if let Some(host) = units.get_mut(index) {
            host.has_embedded_code = true;
            host.host_text = Some(host_text);
        }
        Ok(false)
    }

    /// Locate embedded regions. `None` means a limit was exceeded.
    fn find_regions(&self, profile: &LanguageProfile, text: &str) -> Option<Vec<Region>> {
        let fold = |s: &str| -> String {
            if profile.case_sensitive {
                s.to_string()
            } else {
                s.to_ascii_lowercase()
            }
        };
        // ASCII folding keeps byte offsets identical to `text`.
        let haystack: Cow<'_, str> = if profile.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_ascii_lowercase())
        };
        let comments: Vec<(String, String)> = profile
            .comments
            .block
            .iter()
            .filter(|b| !b.open.is_empty() && !b.close.is_empty())
            .map(|b| (fold(&b.open), fold(&b.close)))
            .collect();
        let markers: Vec<(String, String, &str)> = profile
            .embedded
            .iter()
            .filter(|r| !r.open.is_empty() && !r.close.is_empty())
            .map(|r| (fold(&r.open), fold(&r.close), r.language.as_str()))
            .collect();

        let mut regions = Vec::new();
        let mut pos = 0;

        while pos < haystack.len() {
            let rest = &haystack[pos..];

            if let Some((open, close)) = comments.iter().find(|(open, _)| rest.starts_with(open.as_str())) {
                pos = rest[open.len()..]
                    .find(close.as_str())
                    .map_or(haystack.len(), |i| pos + open.len() + i + close.len());
                continue;
            }

            let Some((open, close, language)) = markers
                .iter()
                .find(|(open, _, _)| starts_with_tag(rest, open))
            else {
                pos += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            };

            let Some(tag_len) = rest.find('>') else {
                break;
            };
            let content_start = pos + tag_len + 1;
            if haystack[..content_start].ends_with("/>") {
                pos = content_start;
                continue;
            }
            let content_end = haystack[content_start..]
                .find(close.as_str())
                .map_or(haystack.len(), |i| content_start + i);
            pos = (content_end + close.len()).min(haystack.len());

            let Some(region_profile) = self.registry.by_name(language) else {
                log::warn!("{open}: no profile named '{language}', region left in host");
                continue;
            };

            let (body_start, body_end) = trim_body(text, content_start, content_end);
            if text[body_start..body_end].trim().is_empty() {
                continue;
            }
            if body_end - body_start > self.limits.max_region_bytes
                || regions.len() >= self.limits.max_regions
            {
                return None;
            }

            regions.push(Region {
                start: content_start,
                end: content_end,
                body_start,
                body_end,
                profile: region_profile,
            });
        }

        Some(regions)
    }
}

/// `rest` starts with `open` followed by the end of the tag name.
fn starts_with_tag(rest: &str, open: &str) -> bool {
    rest.starts_with(open)
        && rest[open.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_' || c == ':'))
}

/// Drop the remainder of the open-tag line and the indentation before the
/// close marker when they hold nothing but whitespace.
fn trim_body(text: &str, start: usize, end: usize) -> (usize, usize) {
    let mut body_start = start;
    if let Some(nl) = text[start..end].find('\n')
        && text[start..start + nl].trim().is_empty()
    {
        body_start = start + nl + 1;
    }

    let mut body_end = end;
    let seg = &text[body_start..end];
    if let Some(nl) = seg.rfind('\n')
        && seg[nl + 1..].trim().is_empty()
    {
        body_end = body_start + nl + 1;
    }
    (body_start, body_end)
}

/// Host text with every region removed. Lines that held nothing but region
/// text disappear entirely; lines shared with host markup keep the host part.
fn mask_regions(text: &str, regions: &[Region]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let line_end = line_start + line.len();
        let content = line.trim_end_matches(['\n', '\r']);
        let content_end = line_start + content.len();

        let mut kept = String::new();
        let mut cursor = line_start;
        let mut touched = false;
        for region in regions
            .iter()
            .filter(|r| r.start < line_end && r.end > line_start)
        {
            touched = true;
            let s = region.start.max(line_start);
            let e = region.end.min(content_end);
            if cursor < s && s <= content_end {
                kept.push_str(&text[cursor..s]);
            }
            cursor = cursor.max(e);
        }
        if cursor < content_end {
            kept.push_str(&text[cursor..content_end]);
        }

        if !(touched && kept.trim().is_empty()) {
            out.push_str(&kept);
            out.push('\n');
        }
        line_start = line_end;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn host_arena(text_name: &str) -> (UnitArena, UnitId, ProfileRegistry) {
        let registry = ProfileRegistry::builtin();
        let mut arena = UnitArena::new();
        let html = registry.by_name("html").unwrap();
        let id = arena.push_top_level(SourceUnit::new(
            text_name,
            UnitSource::File(PathBuf::from(text_name)),
            html,
        ));
        (arena, id, registry)
    }

    #[test]
    fn test_script_block_is_extracted() {
        let text = "<html>\n<script type=\"text/javascript\">\nvar a = 1;\nf(a);\n</script>\n</html>\n";
        let (mut arena, host, registry) = host_arena("page.html");
        let splitter = EmbeddedLanguageSplitter::new(&registry, ExtractionLimits::default());

        assert!(!splitter.handle_embedded_code(&mut arena, host, text).unwrap());
        assert_eq!(arena.len(), 2);

        let child = arena.get(arena.id_at(1).unwrap()).unwrap();
        assert_eq!(child.embedded_of, Some(host));
        assert_eq!(child.profile.name, "javascript");
        assert_eq!(child.name, "page.html#1.javascript");
        match &child.source {
            UnitSource::Embedded(body) => assert_eq!(body, "var a = 1;\nf(a);\n"),
            UnitSource::File(_) => panic!("extract must be in memory"),
        }

        let host_unit = arena.get(host).unwrap();
        assert!(host_unit.has_embedded_code);
        assert_eq!(
            host_unit.host_text(),
            Some("<html>\n<script type=\"text/javascript\">\n</script>\n</html>\n")
        );
    }

    #[test]
    fn test_single_line_region_and_case_insensitive_tags() {
        let text = "<STYLE>p { color: red; }</STYLE>\n";
        let (mut arena, host, registry) = host_arena("a.html");
        let splitter = EmbeddedLanguageSplitter::new(&registry, ExtractionLimits::default());
        splitter.handle_embedded_code(&mut arena, host, text).unwrap();

        let child = arena.get(arena.id_at(1).unwrap()).unwrap();
        assert_eq!(child.profile.name, "css");
        assert!(matches!(&child.source, UnitSource::Embedded(b) if b == "p { color: red; }"));
        assert_eq!(arena.get(host).unwrap().host_text(), Some("<STYLE></STYLE>\n"));
    }

    #[test]
    fn test_external_script_and_commented_script_are_not_regions() {
        let text = "<script src=\"app.js\"></script>\n<!-- <script>x()</script> -->\n";
        let (mut arena, host, registry) = host_arena("a.html");
        let splitter = EmbeddedLanguageSplitter::new(&registry, ExtractionLimits::default());
        assert!(!splitter.handle_embedded_code(&mut arena, host, text).unwrap());
        assert_eq!(arena.len(), 1);
        assert!(!arena.get(host).unwrap().has_embedded_code);
    }

    #[test]
    fn test_limit_reached_appends_nothing() {
        let text = "<script>a();</script>\n<script>b();</script>\n";
        let (mut arena, host, registry) = host_arena("a.html");
        let limits = ExtractionLimits {
            max_regions: 1,
            ..ExtractionLimits::default()
        };
        let splitter = EmbeddedLanguageSplitter::new(&registry, limits);
        assert!(splitter.handle_embedded_code(&mut arena, host, text).unwrap());
        assert_eq!(arena.len(), 1);
        assert!(!arena.get(host).unwrap().has_embedded_code);
    }

    #[test]
    fn test_extracts_are_never_split_again() {
        let (mut arena, host, registry) = host_arena("a.html");
        let html = registry.by_name("html").unwrap();
        let child = arena
            .push_embedded(
                host,
                SourceUnit::new("nested", UnitSource::Embedded(String::new()), html),
            )
            .unwrap();
        let splitter = EmbeddedLanguageSplitter::new(&registry, ExtractionLimits::default());
        assert!(
            !splitter
                .handle_embedded_code(&mut arena, child, "<script>x();</script>")
                .unwrap()
        );
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_unterminated_region_runs_to_end() {
        let text = "<p>\n<script>\nrun();\n";
        let (mut arena, host, registry) = host_arena("a.html");
        let splitter = EmbeddedLanguageSplitter::new(&registry, ExtractionLimits::default());
        splitter.handle_embedded_code(&mut arena, host, text).unwrap();
        let child = arena.get(arena.id_at(1).unwrap()).unwrap();
        assert!(matches!(&child.source, UnitSource::Embedded(b) if b == "run();\n"));
        assert_eq!(arena.get(host).unwrap().host_text(), Some("<p>\n<script>\n"));
    }
}
