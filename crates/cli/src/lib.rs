// crates/cli/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod args;
pub mod error;
pub mod filesystem;
pub mod logger;
pub mod options;
pub mod parsers;
pub mod presentation;

use std::path::PathBuf;

use polyloc_engine::RunReport;
use polyloc_engine::config::{RuntimeParameters, RuntimeParametersBuilder};
use polyloc_engine::registry::ProfileRegistry;

use crate::args::Args;
use crate::error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the profile registry from the built-ins, `--profiles` and `--map-ext`.
///
/// # Errors
/// Returns an error if the profile file cannot be loaded or an extension is
/// mapped to an unknown language.
pub fn build_registry(args: &Args) -> Result<ProfileRegistry> {
    let mut registry = ProfileRegistry::builtin();
    if let Some(path) = &args.profiles {
        let loaded = registry.load_json(path)?;
        log::info!("loaded {loaded} profiles from {}", path.display());
    }
    for (ext, language) in &args.map_ext {
        registry.map_extension(ext, language)?;
    }
    Ok(registry)
}

/// # Errors
/// Returns an error if the parameters are inconsistent.
pub fn build_params(args: &Args) -> Result<RuntimeParameters> {
    RuntimeParametersBuilder::default()
        .diff_code(args.diff_dir.is_some())
        .diff_dir(args.diff_dir.clone().unwrap_or_else(|| PathBuf::from(".")))
        .search_for_dups(args.dups)
        .count_complexity_metrics(args.complexity)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

/// Run a full count for the parsed arguments.
///
/// Per-file failures end up in the report; only setup problems are errors.
///
/// # Errors
/// Returns an error if the registry or parameters cannot be built.
pub fn execute(args: &Args) -> Result<RunReport> {
    let registry = build_registry(args)?;
    let params = build_params(args)?;
    let files = filesystem::collect_files(&args.paths, args.hidden);
    Ok(polyloc_engine::run(&files, &registry, &params))
}
