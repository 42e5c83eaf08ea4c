use crate::scene::NodeId;
use std::collections::HashMap;

/// State scoped to one merge invocation. The destroyed-name table and the
/// path cache live exactly as long as the batch, so nothing leaks between
/// builds.
#[derive(Debug, Default)]
pub(crate) struct MergeContext {
    /// Leaf→root name chain of every node destroyed during the batch,
    /// recorded just before destruction while the chain is still walkable.
    destroyed: HashMap<NodeId, Vec<String>>,
    /// Memoized child-by-name path lookups below the avatar root. Misses are
    /// cached too.
    path_cache: HashMap<Vec<String>, Option<NodeId>>,
}

impl MergeContext {
    pub(crate) fn new() -> MergeContext {
        MergeContext::default()
    }

    pub(crate) fn record_destroyed(&mut self, id: NodeId, chain: Vec<String>) {
        self.destroyed.insert(id, chain);
    }

    pub(crate) fn destroyed_chain(&self, id: NodeId) -> Option<&[String]> {
        self.destroyed.get(&id).map(|c| c.as_slice())
    }

    pub(crate) fn cached_path(&self, path: &[String]) -> Option<Option<NodeId>> {
        self.path_cache.get(path).copied()
    }

    pub(crate) fn cache_path(&mut self, path: Vec<String>, hit: Option<NodeId>) {
        self.path_cache.insert(path, hit);
    }
}
