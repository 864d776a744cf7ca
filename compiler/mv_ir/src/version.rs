//! Structural modification counters.

use rustc_hash::FxHashMap;

use crate::NodeId;

/// Modification counters for a project snapshot.
///
/// `project` advances on every structural change anywhere; each file also
/// keeps its own counter. Caches store the [`DependencyToken`] they were
/// computed under and treat any difference as stale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructureVersions {
    project: u64,
    files: FxHashMap<NodeId, u64>,
}

impl StructureVersions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn project(&self) -> u64 {
        self.project
    }

    #[inline]
    pub fn file(&self, file: NodeId) -> u64 {
        self.files.get(&file).copied().unwrap_or(0)
    }

    /// Record a change in `file`; the project counter advances too.
    pub fn bump_file(&mut self, file: NodeId) {
        *self.files.entry(file).or_insert(0) += 1;
        self.project += 1;
    }

    /// Record a change outside any file, e.g. new address assignments.
    pub fn bump_project(&mut self) {
        self.project += 1;
    }

    pub fn token(&self, file: Option<NodeId>) -> DependencyToken {
        DependencyToken {
            local: file.map_or(0, |f| self.file(f)),
            project: self.project,
        }
    }
}

/// Cache validity key: the containing file's counter and the project counter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DependencyToken {
    pub local: u64,
    pub project: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_bump_advances_both_counters() {
        let file = NodeId::new(3);
        let other = NodeId::new(9);
        let mut versions = StructureVersions::new();
        let before = versions.token(Some(file));

        versions.bump_file(file);

        let after = versions.token(Some(file));
        assert_ne!(before, after);
        assert_eq!(after.local, 1);
        assert_eq!(versions.token(Some(other)).local, 0);
        assert_eq!(versions.token(Some(other)).project, 1);
    }

    #[test]
    fn project_bump_leaves_files_alone() {
        let file = NodeId::new(0);
        let mut versions = StructureVersions::new();
        versions.bump_project();
        assert_eq!(versions.token(Some(file)), DependencyToken { local: 0, project: 1 });
    }
}
