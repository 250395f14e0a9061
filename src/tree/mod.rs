pub mod aggregate;
pub mod arena;
pub mod extensions;

use compact_str::CompactString;

use self::arena::{FileNode, FileTree};
use crate::fetch::types::RawEntry;

/// Name given to the synthetic root node. The listing describes the
/// contents of the MFS root directory.
pub const ROOT_NAME: &str = "/";

/// Build a FileTree from the flat listing returned by the node.
///
/// Entries with `Size == 0` are dropped before construction: the treemap
/// cannot allocate visible area to zero weight. An empty (or fully
/// filtered) listing yields a root with no children, which is a valid,
/// renderable state rather than an error.
///
/// The listing is one level deep, so every surviving entry becomes a leaf
/// directly under the root. The arena supports deeper trees, so a future
/// nested listing only needs to add children below these nodes.
pub fn build_tree(entries: &[RawEntry]) -> FileTree {
    let mut tree = FileTree::new(ROOT_NAME);

    let mut dropped = 0usize;
    for entry in entries {
        if entry.size == 0 {
            dropped += 1;
            continue;
        }

        let ext_id = tree.intern_extension(extensions::extension_of(&entry.name));
        let node = FileNode {
            name: CompactString::new(&entry.name),
            hash: CompactString::new(&entry.hash),
            size: entry.size,
            extension_id: ext_id,
            parent: None,
            first_child: None,
            next_sibling: None,
            depth: 0, // set by add_child
        };
        tree.add_child(tree.root, node);
    }

    aggregate::aggregate_sizes(&mut tree);
    aggregate::sort_children_by_size(&mut tree);

    tracing::info!(
        "Tree built: {} leaves from {} entries ({} zero-size dropped), total {} bytes",
        tree.len() - 1,
        entries.len(),
        dropped,
        tree.get(tree.root).size
    );

    tree
}
