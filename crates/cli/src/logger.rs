//! stderr logging through `env_logger`.
//!
//! Records from this workspace print at the selected level. Dependencies
//! (the directory walker in particular) are limited to warnings and errors.
//! `RUST_LOG` directives are applied on top.

use std::io::Write;

use env_logger::{Builder, Env, Target};
use log::{Level, LevelFilter};

const WORKSPACE_TARGETS: &[&str] = &["polyloc_core", "polyloc_engine", "polyloc_cli", "polyloc"];

const fn tag(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warn",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

/// Logger configured for `level`, not yet installed.
#[must_use]
pub fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(level.min(LevelFilter::Warn));
    for target in WORKSPACE_TARGETS {
        builder.filter_module(target, level);
    }
    builder
        .parse_env(Env::default())
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "[{}] {}", tag(record.level()), record.args()));
    builder
}

/// Install the logger. Later calls are ignored.
pub fn init(level: LevelFilter) {
    let _ = builder(level).try_init();
}
