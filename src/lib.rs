//! # bktree
//!
//! A BK-tree: a metric tree for approximate-match lookup over byte strings
//! under any integer distance that obeys the triangle inequality.
//!
//! Based on "Some approaches to best-match file searching"
//! (CACM 1973, Burkhard and Keller)
//!
//! ## Example
//!
//! ```rust
//! use bktree::BkTree;
//!
//! // Any `Fn(&[u8], &[u8]) -> u64` works as the metric.
//! let hamming = |a: &[u8], b: &[u8]| {
//!     let diff = a.iter().zip(b).filter(|(x, y)| x != y).count();
//!     (diff + a.len().abs_diff(b.len())) as u64
//! };
//!
//! let mut tree = BkTree::new(hamming);
//! tree.add(b"book");
//! tree.add(b"back");
//! tree.add(b"cook");
//!
//! let mut hits = tree.find(b"bock", 1);
//! hits.sort();
//! assert_eq!(hits, vec![&b"back"[..], b"book"]);
//! assert_eq!(tree.find(b"book", 0), vec![&b"book"[..]]);
//! ```

mod arena;
pub mod error;
pub mod metric;
mod persist;

pub use error::{BkTreeError, Result};
pub use metric::Metric;

use std::path::Path;

use tracing::debug;

use arena::{NodeArena, ROOT};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a [`BkTree`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Write snapshots to a temporary sibling file and rename it over the
    /// target, so an interrupted save never leaves a truncated file behind.
    pub atomic_writes: bool,
    /// fsync the snapshot before it is renamed into place.
    pub sync_on_save: bool,
    /// Initial node capacity hint.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            atomic_writes: true,
            sync_on_save: false,
            initial_capacity: 0,
        }
    }
}

// =============================================================================
// BkTree
// =============================================================================

/// A BK-tree over byte strings.
///
/// Every node's children are keyed by their exact distance to that node, one
/// child per distance. Items that land on an occupied distance are pushed down
/// into that child, so nothing is ever overwritten and duplicates are kept.
///
/// The tree tracks whether it holds changes that have not been persisted with
/// [`save_to_file`](Self::save_to_file).
pub struct BkTree<M> {
    metric: M,
    nodes: NodeArena,
    dirty: bool,
    config: Config,
}

impl<M: Metric> BkTree<M> {
    pub fn new(metric: M) -> Self {
        Self::with_config(metric, Config::default())
    }

    pub fn with_config(metric: M, config: Config) -> Self {
        Self {
            metric,
            nodes: NodeArena::with_capacity(config.initial_capacity),
            dirty: false,
            config,
        }
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of stored items, duplicates included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree was modified since it was last saved or loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Inserts `item`.
    ///
    /// Descends from the root, at each node following the child keyed by the
    /// item's distance to that node, until that key is free.
    pub fn add(&mut self, item: impl AsRef<[u8]>) {
        let item = item.as_ref();
        self.dirty = true;

        if self.nodes.is_empty() {
            self.nodes.alloc_root(item.to_vec());
            return;
        }

        let mut cur = ROOT;
        loop {
            let d = self.metric.distance(&self.nodes.get(cur).payload, item);
            match self.nodes.child(cur, d) {
                Some(next) => cur = next,
                None => {
                    self.nodes.alloc_child(cur, d, item.to_vec());
                    return;
                }
            }
        }
    }

    /// Returns every stored item within `radius` of `query`, in pre-order of
    /// the visited nodes.
    pub fn find(&self, query: impl AsRef<[u8]>, radius: u64) -> Vec<&[u8]> {
        self.find_with_distance(query, radius)
            .into_iter()
            .map(|(item, _)| item)
            .collect()
    }

    /// Like [`find`](Self::find), paired with each item's distance to `query`.
    pub fn find_with_distance(&self, query: impl AsRef<[u8]>, radius: u64) -> Vec<(&[u8], u64)> {
        let query = query.as_ref();
        let mut out = Vec::new();
        if self.nodes.is_empty() {
            return out;
        }

        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id);
            let l = self.metric.distance(&node.payload, query);
            if l <= radius {
                out.push((node.payload.as_slice(), l));
            }

            // Triangle inequality: a match under key `i` needs |i - l| <= radius.
            let lo = l.saturating_sub(radius);
            let hi = l.saturating_add(radius);
            stack.extend(node.children.range(lo..=hi).rev().map(|(_, &c)| c));
        }
        out
    }

    /// All stored items in pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.nodes.preorder(),
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Encodes the whole tree as a snapshot blob, or `None` if it is empty.
    ///
    /// Does not touch the dirty flag: only a confirmed write to disk counts as
    /// persisted.
    pub fn to_bytes(&self) -> Result<Option<Vec<u8>>> {
        if self.nodes.is_empty() {
            return Ok(None);
        }
        persist::encode(&self.nodes).map(Some)
    }

    /// Replaces the tree's contents with the snapshot in `bytes`.
    ///
    /// On error the tree is left unchanged.
    pub fn from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.nodes = persist::decode(bytes)?;
        self.dirty = false;
        Ok(())
    }

    /// Writes a snapshot of the tree to `path`.
    ///
    /// Returns `Ok(false)` without touching `path` if the tree is empty, and
    /// `Ok(true)` once the snapshot is written, at which point the tree is
    /// clean. On error the dirty flag is left as it was.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let Some(bytes) = self.to_bytes()? else {
            debug!(path = %path.display(), "tree is empty, nothing saved");
            return Ok(false);
        };

        persist::write_snapshot(path, &bytes, self.config.atomic_writes, self.config.sync_on_save)?;
        self.dirty = false;
        debug!(path = %path.display(), nodes = self.nodes.len(), bytes = bytes.len(), "saved snapshot");
        Ok(true)
    }

    /// Replaces the tree's contents with the snapshot stored at `path`.
    ///
    /// On error (missing file, I/O failure, malformed snapshot) the tree is
    /// left unchanged.
    pub fn read_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.nodes = persist::read_snapshot(path.as_ref())?;
        self.dirty = false;
        Ok(())
    }
}

impl<M: Clone> Clone for BkTree<M> {
    fn clone(&self) -> Self {
        Self {
            metric: self.metric.clone(),
            nodes: self.nodes.clone(),
            dirty: self.dirty,
            config: self.config.clone(),
        }
    }
}

impl<M: Metric> std::fmt::Debug for BkTree<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(String::from_utf8_lossy))
            .finish()
    }
}

impl<'a, M: Metric> IntoIterator for &'a BkTree<M> {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    inner: arena::Preorder<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, node)| node.payload.as_slice())
    }
}

#[cfg(test)]
mod test_support;
