//! Baseline-diff artifacts.
//!
//! Every logical line counted for an embedding root is appended to one side
//! file named after that root, as `<delim><weight><delim><line>`. The file is
//! opened in append mode and never truncated, so extracts of the same root
//! keep adding to the artifact their host started.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

const ARTIFACT_SUFFIX: &str = ".diff.txt";

/// Render one artifact record, line terminator included.
#[must_use]
pub fn format_record(delimiter: char, weight: usize, line: &str) -> String {
    format!("{delimiter}{weight}{delimiter}{line}\n")
}

/// Split a record (without its terminator) back into weight and line text.
#[must_use]
pub fn parse_record(delimiter: char, record: &str) -> Option<(usize, &str)> {
    let rest = record.strip_prefix(delimiter)?;
    let (weight, line) = rest.split_once(delimiter)?;
    Some((weight.parse().ok()?, line))
}

/// Artifact file name for a root unit name.
#[must_use]
pub fn artifact_name(root_name: &str) -> String {
    let mut name: String = root_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    name.push_str(ARTIFACT_SUFFIX);
    name
}

#[derive(Debug)]
struct OpenArtifact {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Append-only writer for the current unit's artifact.
///
/// The file is opened on the first record and released by [`close`]. After a
/// write failure the exporter stays silent until closed; counting is not
/// affected.
///
/// [`close`]: DiffExporter::close
#[derive(Debug)]
pub struct DiffExporter {
    dir: PathBuf,
    delimiter: char,
    open: Option<OpenArtifact>,
    failed: bool,
}

impl DiffExporter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            dir: dir.into(),
            delimiter,
            open: None,
            failed: false,
        }
    }

    #[must_use]
    pub fn artifact_path(&self, root_name: &str) -> PathBuf {
        self.dir.join(artifact_name(root_name))
    }

    /// Append one record to the artifact of `root_name`.
    ///
    /// # Errors
    ///
    /// `ArtifactWrite` when the artifact cannot be created or written. Only the
    /// first failure for a unit is returned; later records are dropped.
    pub fn append(&mut self, root_name: &str, weight: usize, line: &str) -> Result<()> {
        if self.failed {
            return Ok(());
        }
        let record = format_record(self.delimiter, weight, line);

        let path = self.artifact_path(root_name);
        if self.open.as_ref().is_some_and(|o| o.path != path) {
            self.close()?;
        }
        let artifact = match self.open.take() {
            Some(artifact) => artifact,
            None => match open_artifact(&path) {
                Ok(writer) => OpenArtifact { path, writer },
                Err(source) => {
                    self.failed = true;
                    return Err(EngineError::ArtifactWrite { path, source });
                }
            },
        };
        let artifact = self.open.insert(artifact);

        if let Err(source) = artifact.writer.write_all(record.as_bytes()) {
            let path = artifact.path.clone();
            self.failed = true;
            return Err(EngineError::ArtifactWrite { path, source });
        }
        Ok(())
    }

    /// Flush and release the open artifact, if any.
    ///
    /// # Errors
    ///
    /// `ResourceClose` when buffered records cannot be flushed.
    pub fn close(&mut self) -> Result<()> {
        self.failed = false;
        let Some(OpenArtifact { path, writer }) = self.open.take() else {
            return Ok(());
        };
        writer
            .into_inner()
            .map(drop)
            .map_err(|e| EngineError::ResourceClose {
                path,
                source: e.into_error(),
            })
    }
}

fn open_artifact(path: &Path) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_record_format_and_parse() {
        let record = format_record('\t', 2, "<a><b>");
        assert_eq!(record, "\t2\t<a><b>\n");
        assert_eq!(parse_record('\t', record.trim_end_matches('\n')), Some((2, "<a><b>")));
        assert_eq!(parse_record('|', "|1|a|b"), Some((1, "a|b")));
        assert_eq!(parse_record('\t', "no delimiter"), None);
    }

    #[test]
    fn test_artifact_name_is_flat() {
        assert_eq!(artifact_name("site/a:b\\c.html"), "site_a_b_c.html.diff.txt");
    }

    #[test]
    fn test_append_accumulates_across_writers() {
        let dir = tempdir().unwrap();
        let mut first = DiffExporter::new(dir.path(), '\t');
        first.append("page.html", 1, "<html>").unwrap();
        first.close().unwrap();

        let mut second = DiffExporter::new(dir.path(), '\t');
        second.append("page.html", 1, "var a = 1;").unwrap();
        second.close().unwrap();

        let text = fs::read_to_string(first.artifact_path("page.html")).unwrap();
        assert_eq!(text, "\t1\t<html>\n\t1\tvar a = 1;\n");
    }

    #[test]
    fn test_write_failure_is_reported_once() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let mut exporter = DiffExporter::new(blocker.join("out"), '\t');
        assert!(matches!(
            exporter.append("a.html", 1, "<a>"),
            Err(EngineError::ArtifactWrite { .. })
        ));
        assert!(exporter.append("a.html", 1, "<b>").is_ok());
        assert!(exporter.close().is_ok());
    }
}
