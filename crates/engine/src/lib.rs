// crates/engine/src/lib.rs
use std::path::{Path, PathBuf};

pub mod config;
pub mod diff_export;
pub mod duplicate;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod source;
pub mod splitter;
pub mod unit;

use crate::config::RuntimeParameters;
use crate::duplicate::DuplicateGroup;
use crate::pipeline::{CounterPipeline, UnitError};
use crate::registry::ProfileRegistry;
use crate::unit::{SourceUnit, UnitArena, UnitSource};

/// Outcome of one counting run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Every unit, top-level files first, extracts appended after their hosts.
    pub units: UnitArena,
    /// Failures scoped to single units. None of them stopped the run.
    pub errors: Vec<UnitError>,
    /// Inputs with no matching language profile.
    pub skipped: Vec<PathBuf>,
}

impl RunReport {
    /// Top-level units sharing identical checksum sequences.
    #[must_use]
    pub fn duplicates(&self) -> Vec<DuplicateGroup> {
        duplicate::find_duplicates(&self.units)
    }
}

/// Count every file in `paths`.
///
/// Each path whose extension resolves to a profile becomes a top-level unit;
/// the rest are listed in `RunReport::skipped`. Units are counted one at a
/// time in input order. Per-file failures are collected in
/// `RunReport::errors` and never abort the batch.
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    registry: &ProfileRegistry,
    params: &RuntimeParameters,
) -> RunReport {
    let mut report = RunReport::default();

    for path in paths {
        let path = path.as_ref();
        let Some(profile) = registry.for_path(path) else {
            log::debug!("{}: no language profile, skipped", path.display());
            report.skipped.push(path.to_path_buf());
            continue;
        };
        report.units.push_top_level(SourceUnit::new(
            path.display().to_string(),
            UnitSource::File(path.to_path_buf()),
            profile,
        ));
    }

    report.errors = CounterPipeline::new(registry, params).process_all(&mut report.units);
    report
}
