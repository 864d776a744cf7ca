//! Query facade over resolution and inference.
//!
//! [`TypeckDb`] answers the questions an editor asks of a project snapshot:
//! what a path refers to, which scopes are visible from a node and how an
//! owner is typed. Resolution results are memoized in a
//! [`ResolveCache`], inference results in an [`InferenceCache`]; both are
//! safe to share between threads.

use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;

use mv_ir::ast::NodeKind;
use mv_ir::{NodeId, Project};
use mv_resolve::{scope_chain, ResolveCache, ResolvedPath, Resolver, Scope};
use mv_stack::{CancellationFlag, Cancelled};

use crate::config::InferConfig;
use crate::infer::{infer_owner, InferenceResult};

struct CachedInference {
    version: u64,
    result: Arc<InferenceResult>,
}

/// Inference results per `(owner, msl)`.
///
/// Entries remember the project version they were computed at; after a
/// version bump every entry is stale and misses. Only completed runs are
/// stored.
#[derive(Default)]
pub struct InferenceCache {
    entries: DashMap<(NodeId, bool), CachedInference>,
}

impl InferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, owner: NodeId, msl: bool, version: u64) -> Option<Arc<InferenceResult>> {
        let entry = self.entries.get(&(owner, msl))?;
        (entry.version == version).then(|| Arc::clone(&entry.result))
    }

    fn insert(&self, owner: NodeId, msl: bool, version: u64, result: Arc<InferenceResult>) {
        self.entries
            .insert((owner, msl), CachedInference { version, result });
    }

    /// Drop entries computed before the current version of `project`.
    pub fn invalidate_stale(&self, project: &Project) {
        let version = project.versions().project();
        self.entries.retain(|_, cached| cached.version == version);
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

/// Resolution and inference queries against one project snapshot.
#[derive(Copy, Clone)]
pub struct TypeckDb<'a> {
    project: &'a Project,
    resolve_cache: &'a ResolveCache,
    inference_cache: &'a InferenceCache,
    config: InferConfig,
    cancel: Option<&'a CancellationFlag>,
}

impl<'a> TypeckDb<'a> {
    /// Configured by [`InferConfig::from_env`] until
    /// [`with_config`](Self::with_config) says otherwise.
    pub fn new(
        project: &'a Project,
        resolve_cache: &'a ResolveCache,
        inference_cache: &'a InferenceCache,
    ) -> Self {
        TypeckDb {
            project,
            resolve_cache,
            inference_cache,
            config: InferConfig::from_env(),
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: InferConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, flag: &'a CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[inline]
    pub fn project(&self) -> &'a Project {
        self.project
    }

    fn resolver(&self) -> Resolver<'a> {
        let resolver = Resolver::new(self.project).with_cache(self.resolve_cache);
        match self.cancel {
            Some(flag) => resolver.with_cancellation(flag),
            None => resolver,
        }
    }

    /// Every declaration `path` may refer to.
    pub fn resolve_path(&self, path: NodeId) -> Result<Vec<ResolvedPath>, Cancelled> {
        self.resolver().resolve(path)
    }

    pub fn scope_chain(&self, element: NodeId) -> Vec<Scope> {
        scope_chain(self.project, element)
    }

    /// Inference result for `owner`, computed on a cache miss.
    ///
    /// Item specs and schemas are always typed as specification code.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn inference(&self, owner: NodeId, msl: bool) -> Result<Arc<InferenceResult>, Cancelled> {
        let msl = msl
            || matches!(
                self.project.tree().kind(owner),
                NodeKind::ItemSpec(_) | NodeKind::Schema(_)
            );
        let version = self.project.versions().project();
        if let Some(result) = self.inference_cache.get(owner, msl, version) {
            tracing::debug!("inference cache hit");
            return Ok(result);
        }
        tracing::debug!("inference cache miss");
        let result = Arc::new(infer_owner(
            self.resolver(),
            self.cancel,
            owner,
            msl,
            self.config,
        )?);
        self.inference_cache
            .insert(owner, msl, version, Arc::clone(&result));
        Ok(result)
    }

    /// Inference result of the owner enclosing `element`.
    pub fn inference_for(
        &self,
        element: NodeId,
        msl: bool,
    ) -> Result<Option<Arc<InferenceResult>>, Cancelled> {
        match self.project.tree().inference_owner(element) {
            Some(owner) => self.inference(owner, msl).map(Some),
            None => Ok(None),
        }
    }

    /// Infer `owners` in parallel. Fails if any run was cancelled.
    #[tracing::instrument(level = "debug", skip_all, fields(count = owners.len()))]
    pub fn infer_all(
        &self,
        owners: &[NodeId],
        msl: bool,
    ) -> Result<Vec<Arc<InferenceResult>>, Cancelled> {
        owners
            .par_iter()
            .map(|&owner| self.inference(owner, msl))
            .collect()
    }

    /// Every inference owner in the project, in tree order.
    pub fn owners(&self) -> Vec<NodeId> {
        let tree = self.project.tree();
        tree.files()
            .iter()
            .flat_map(|&file| tree.descendants(file))
            .filter(|&node| {
                matches!(
                    tree.kind(node),
                    NodeKind::Function(_)
                        | NodeKind::ItemSpec(_)
                        | NodeKind::Schema(_)
                        | NodeKind::Const(_)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
