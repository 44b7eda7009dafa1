use ignore::WalkBuilder;
use std::path::PathBuf;

/// Expand the command-line roots into a list of files.
///
/// Directories are walked with gitignore rules applied and entries sorted by
/// name; anything else is passed through unchanged so the engine can report
/// it if it cannot be opened.
#[must_use]
pub fn collect_files(roots: &[PathBuf], hidden: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for root in roots {
        if !root.is_dir() {
            files.push(root.clone());
            continue;
        }

        let walker = WalkBuilder::new(root)
            .hidden(!hidden)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(err) => log::warn!("{err}"),
            }
        }
    }

    log::debug!("collected {} files", files.len());
    files
}
