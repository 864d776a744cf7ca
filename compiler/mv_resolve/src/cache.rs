//! Concurrent memo of path resolutions.

use std::sync::Arc;

use dashmap::DashMap;

use mv_ir::{DependencyToken, NodeId, Project};

use crate::ResolvedPath;

struct CachedPaths {
    token: DependencyToken,
    paths: Arc<[ResolvedPath]>,
}

/// Resolution results per path node.
///
/// Each entry remembers the [`DependencyToken`] it was computed under; a
/// lookup under a different token misses. Independent keys can be read and
/// written from many threads at once.
#[derive(Default)]
pub struct ResolveCache {
    entries: DashMap<NodeId, CachedPaths>,
}

impl ResolveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: NodeId, token: DependencyToken) -> Option<Arc<[ResolvedPath]>> {
        let entry = self.entries.get(&path)?;
        (entry.token == token).then(|| Arc::clone(&entry.paths))
    }

    pub fn insert(&self, path: NodeId, token: DependencyToken, paths: Arc<[ResolvedPath]>) {
        self.entries.insert(path, CachedPaths { token, paths });
    }

    /// Drop entries computed under an outdated token for `project`.
    pub fn invalidate_stale(&self, project: &Project) {
        self.entries
            .retain(|&path, cached| cached.token == project.dependency_token(path));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
