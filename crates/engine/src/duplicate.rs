//! Per-line fingerprints for duplicate-code detection.
//!
//! Checksums accumulate on the embedding root so a page and its scripts form a
//! single sequence. No deduplication happens here; [`find_duplicates`] is a
//! minimal consumer that groups identical sequences.

use hashbrown::HashMap;
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::unit::{UnitArena, UnitId};

/// Stable fingerprint of one cleaned logical line.
#[must_use]
pub fn line_checksum(line: &str) -> u64 {
    xxh3_64(line.as_bytes())
}

/// The unit whose checksum sequence receives lines counted for `id`.
///
/// `None` when the embedding root is flagged `unique_file_name`.
#[must_use]
pub fn checksum_owner(units: &UnitArena, id: UnitId) -> Option<UnitId> {
    let root = units.root_of(id);
    let unit = units.get(root)?;
    (!unit.unique_file_name).then_some(root)
}

/// Top-level units sharing one checksum sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub units: Vec<UnitId>,
    /// Length of the shared sequence.
    pub lines: usize,
}

/// Group top-level units whose non-empty checksum sequences are identical.
///
/// Groups are ordered by their first member; members keep arena order.
#[must_use]
pub fn find_duplicates(units: &UnitArena) -> Vec<DuplicateGroup> {
    let mut slots: HashMap<&[u64], usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (id, unit) in units.iter() {
        if !unit.is_top_level() || unit.line_checksums.is_empty() {
            continue;
        }
        let key = unit.line_checksums.as_slice();
        match slots.get(key) {
            Some(&slot) => groups[slot].units.push(id),
            None => {
                slots.insert(key, groups.len());
                groups.push(DuplicateGroup {
                    units: vec![id],
                    lines: key.len(),
                });
            }
        }
    }

    groups.retain(|g| g.units.len() > 1);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{SourceUnit, UnitSource};
    use polyloc_core::language::builtin;
    use std::sync::Arc;

    fn unit(name: &str, checksums: &[&str]) -> SourceUnit {
        let mut u = SourceUnit::new(
            name,
            UnitSource::Embedded(String::new()),
            Arc::new(builtin::plain()),
        );
        u.line_checksums = checksums.iter().map(|l| line_checksum(l)).collect();
        u
    }

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(line_checksum("var a = 1;"), line_checksum("var a = 1;"));
        assert_ne!(line_checksum("var a = 1;"), line_checksum("var a = 2;"));
    }

    #[test]
    fn test_owner_is_root_unless_unique() {
        let mut arena = UnitArena::new();
        let host = arena.push_top_level(unit("a.html", &[]));
        let child = arena.push_embedded(host, unit("a.html#1", &[])).unwrap();
        assert_eq!(checksum_owner(&arena, child), Some(host));
        assert_eq!(checksum_owner(&arena, host), Some(host));

        arena.get_mut(host).unwrap().unique_file_name = true;
        assert_eq!(checksum_owner(&arena, child), None);
        assert_eq!(checksum_owner(&arena, host), None);
    }

    #[test]
    fn test_find_duplicates_groups_identical_sequences() {
        let mut arena = UnitArena::new();
        let a = arena.push_top_level(unit("a", &["x", "y"]));
        arena.push_top_level(unit("b", &["x"]));
        let c = arena.push_top_level(unit("c", &["x", "y"]));
        arena.push_top_level(unit("d", &[]));
        arena.push_top_level(unit("e", &[]));

        let groups = find_duplicates(&arena);
        assert_eq!(
            groups,
            vec![DuplicateGroup {
                units: vec![a, c],
                lines: 2
            }]
        );
    }
}
