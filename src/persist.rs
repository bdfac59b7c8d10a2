//! Snapshot encoding and whole-file I/O.
//!
//! A snapshot is the recursive record `{ payload, children: distance -> record }`
//! flattened into a list: record `0` is the root and each child is referenced
//! by its position in the list. Children always come after their parent, so
//! neither encoding nor decoding needs to recurse, however deep the tree.
//!
//! ```text
//! [ { payload: b"abc", children: [(1, 1), (3, 2)] },   // root
//!   { payload: b"abd", children: [] },
//!   { payload: b"xyz", children: [] } ]
//! ```
//!
//! The list is serialized with bincode (fixed-width integers, no trailing
//! bytes allowed).

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arena::{Node, NodeArena, ROOT};
use crate::error::{BkTreeError, Result};

#[derive(Serialize)]
struct RecordRef<'a> {
    payload: &'a [u8],
    children: Vec<(u64, u64)>,
}

#[derive(Deserialize)]
struct Record {
    payload: Vec<u8>,
    children: Vec<(u64, u64)>,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

pub(crate) fn encode(arena: &NodeArena) -> Result<Vec<u8>> {
    let records: Vec<RecordRef<'_>> = arena
        .nodes()
        .iter()
        .map(|node| RecordRef {
            payload: &node.payload,
            children: node
                .children
                .iter()
                .map(|(&d, &c)| (d, c as u64))
                .collect(),
        })
        .collect();
    codec().serialize(&records).map_err(BkTreeError::Encode)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<NodeArena> {
    let records: Vec<Record> = codec().deserialize(bytes).map_err(BkTreeError::Decode)?;
    if records.is_empty() {
        return Err(BkTreeError::Malformed("snapshot has no root".into()));
    }

    let n = records.len();
    let mut referenced = vec![false; n];
    let mut nodes = Vec::with_capacity(n);
    for (parent, record) in records.into_iter().enumerate() {
        let mut children = BTreeMap::new();
        for (distance, child) in record.children {
            let child = usize::try_from(child)
                .ok()
                .filter(|&c| c < n)
                .ok_or_else(|| {
                    BkTreeError::Malformed(format!("node {parent}: child index {child} out of range"))
                })?;
            if child <= parent {
                return Err(BkTreeError::Malformed(format!(
                    "node {parent}: child {child} does not follow its parent"
                )));
            }
            if std::mem::replace(&mut referenced[child], true) {
                return Err(BkTreeError::Malformed(format!(
                    "node {child} has more than one parent"
                )));
            }
            if children.insert(distance, child).is_some() {
                return Err(BkTreeError::Malformed(format!(
                    "node {parent}: duplicate child distance {distance}"
                )));
            }
        }
        nodes.push(Node {
            payload: record.payload,
            children,
        });
    }

    // Each non-root node has exactly one parent with a smaller index, so an
    // unreferenced one would be a second root.
    if let Some(orphan) = (0..n).find(|&id| id != ROOT && !referenced[id]) {
        return Err(BkTreeError::Malformed(format!("node {orphan} is unreachable")));
    }

    Ok(NodeArena::from_nodes(nodes))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("bktree")));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(path: &Path, bytes: &[u8], sync: bool) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// Writes `bytes` to `path`. With `atomic`, the bytes go to a sibling
/// temporary file first and are renamed into place, so the target is either
/// the previous file or the complete new one.
pub(crate) fn write_snapshot(path: &Path, bytes: &[u8], atomic: bool, sync: bool) -> Result<()> {
    if !atomic {
        write_file(path, bytes, sync)?;
        return Ok(());
    }

    let tmp = temp_path(path);
    let res = write_file(&tmp, bytes, sync).and_then(|()| fs::rename(&tmp, path));
    if let Err(err) = res {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), error = %cleanup, "failed to remove temporary snapshot");
            }
        }
        return Err(err.into());
    }
    Ok(())
}

pub(crate) fn read_snapshot(path: &Path) -> Result<NodeArena> {
    let bytes = fs::read(path)?;
    let arena = decode(&bytes)?;
    debug!(path = %path.display(), nodes = arena.len(), bytes = bytes.len(), "loaded snapshot");
    Ok(arena)
}
