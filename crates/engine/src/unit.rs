//! Source units and the append-only arena that owns them.
//!
//! Embedded extracts refer to their host by [`UnitId`], never by reference, so
//! host and child never form an ownership cycle. Units are only ever appended;
//! an id stays valid for the whole run.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use hashbrown::HashMap;
use polyloc_core::{ComplexityCounts, LanguageProfile};
use serde::Serialize;

use crate::error::{EngineError, Result};

/// Stable index of a unit inside a [`UnitArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UnitId(usize);

impl UnitId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a unit's text comes from.
#[derive(Debug, Clone)]
pub enum UnitSource {
    File(PathBuf),
    /// Text carved out of a host by the splitter.
    Embedded(String),
}

/// Lifecycle of one unit. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitState {
    Uncounted,
    EmbeddedCheckPending,
    SplitOrKeep,
    Counting,
    Finalized,
}

/// Aggregate metrics, written once when the unit is finalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitMetrics {
    pub total_lines: usize,
    pub blank_lines: usize,
    pub whole_comments: usize,
    pub embedded_comments: usize,
    pub psloc: usize,
    pub lsloc: usize,
    pub exec_physical: usize,
    pub exec_logical: usize,
    pub data_physical: usize,
    pub data_logical: usize,
    pub exec_keywords: HashMap<String, usize>,
    pub data_keywords: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityCounts>,
    pub language_version: String,
}

#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// File path or synthetic name.
    pub name: String,
    pub source: UnitSource,
    pub profile: Arc<LanguageProfile>,
    pub embedded_of: Option<UnitId>,
    pub has_embedded_code: bool,
    /// Set by the caller when the identity is already known to be unique;
    /// such units contribute no duplicate checksums.
    pub unique_file_name: bool,
    pub line_checksums: Vec<u64>,
    /// Host text with embedded regions removed, set by the splitter.
    pub(crate) host_text: Option<String>,
    state: UnitState,
    metrics: Option<UnitMetrics>,
}

impl SourceUnit {
    #[must_use]
    pub fn new(name: impl Into<String>, source: UnitSource, profile: Arc<LanguageProfile>) -> Self {
        Self {
            name: name.into(),
            source,
            profile,
            embedded_of: None,
            has_embedded_code: false,
            unique_file_name: false,
            line_checksums: Vec::new(),
            host_text: None,
            state: UnitState::Uncounted,
            metrics: None,
        }
    }

    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.embedded_of.is_none()
    }

    #[must_use]
    pub const fn is_counted(&self) -> bool {
        self.metrics.is_some()
    }

    #[must_use]
    pub const fn state(&self) -> UnitState {
        self.state
    }

    #[must_use]
    pub const fn metrics(&self) -> Option<&UnitMetrics> {
        self.metrics.as_ref()
    }

    /// Host text with embedded regions removed, if the unit was split.
    #[must_use]
    pub fn host_text(&self) -> Option<&str> {
        self.host_text.as_deref()
    }

    pub(crate) fn advance(&mut self, next: UnitState) {
        debug_assert!(next >= self.state, "unit state moved backwards");
        if next > self.state {
            log::debug!("{}: {:?} -> {:?}", self.name, self.state, next);
            self.state = next;
        }
    }

    /// Store the final metrics. Returns `false` if the unit was already finalized.
    pub(crate) fn finalize(&mut self, metrics: UnitMetrics) -> bool {
        if self.metrics.is_some() {
            return false;
        }
        self.metrics = Some(metrics);
        self.state = UnitState::Finalized;
        true
    }
}

/// Append-only collection of units for one run.
#[derive(Debug, Clone, Default)]
pub struct UnitArena {
    units: Vec<SourceUnit>,
}

impl UnitArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a host (top-level) unit.
    pub fn push_top_level(&mut self, mut unit: SourceUnit) -> UnitId {
        unit.embedded_of = None;
        let id = UnitId(self.units.len());
        self.units.push(unit);
        id
    }

    /// Append an extract of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` does not name a unit already in the arena.
    pub fn push_embedded(&mut self, parent: UnitId, mut unit: SourceUnit) -> Result<UnitId> {
        if parent.0 >= self.units.len() {
            return Err(EngineError::Config(format!(
                "embedded unit '{}' refers to missing parent {parent}",
                unit.name
            )));
        }
        unit.embedded_of = Some(parent);
        let id = UnitId(self.units.len());
        self.units.push(unit);
        Ok(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&SourceUnit> {
        self.units.get(id.0)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut SourceUnit> {
        self.units.get_mut(id.0)
    }

    /// Id of the unit at `index`, if any.
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<UnitId> {
        (index < self.units.len()).then_some(UnitId(index))
    }

    /// Follow `embedded_of` back to the top-level unit.
    #[must_use]
    pub fn root_of(&self, id: UnitId) -> UnitId {
        let mut current = id;
        while let Some(parent) = self.get(current).and_then(|u| u.embedded_of) {
            current = parent;
        }
        current
    }

    /// Direct extracts of `parent`, in creation order.
    pub fn children_of(&self, parent: UnitId) -> impl Iterator<Item = (UnitId, &SourceUnit)> {
        self.iter().filter(move |(_, u)| u.embedded_of == Some(parent))
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &SourceUnit)> {
        self.units.iter().enumerate().map(|(i, u)| (UnitId(i), u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyloc_core::language::builtin;

    fn unit(name: &str) -> SourceUnit {
        SourceUnit::new(
            name,
            UnitSource::Embedded(String::new()),
            Arc::new(builtin::plain()),
        )
    }

    #[test]
    fn test_ids_are_stable_and_sequential() {
        let mut arena = UnitArena::new();
        let a = arena.push_top_level(unit("a"));
        let b = arena.push_top_level(unit("b"));
        let c = arena.push_embedded(a, unit("a#1")).unwrap();
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert_eq!(arena.get(c).unwrap().embedded_of, Some(a));
        assert_eq!(arena.root_of(c), a);
        assert_eq!(arena.root_of(b), b);
        assert_eq!(arena.children_of(a).count(), 1);
    }

    #[test]
    fn test_embedded_requires_existing_parent() {
        let mut arena = UnitArena::new();
        let dangling = UnitId(5);
        assert!(arena.push_embedded(dangling, unit("x")).is_err());
        assert!(arena.is_empty());
    }

    #[test]
    fn test_finalize_is_write_once() {
        let mut u = unit("a");
        assert!(!u.is_counted());
        assert!(u.finalize(UnitMetrics {
            psloc: 3,
            ..UnitMetrics::default()
        }));
        assert!(!u.finalize(UnitMetrics::default()));
        assert_eq!(u.metrics().unwrap().psloc, 3);
        assert_eq!(u.state(), UnitState::Finalized);
    }
}
