use super::arena::{FileTree, NodeId};

/// Compute aggregated sizes for all internal nodes (bottom-up).
/// After this, a node with children has `size` equal to the sum of all
/// descendant leaf sizes.
pub fn aggregate_sizes(tree: &mut FileTree) {
    // Process nodes in reverse order (children before parents) since
    // children always have higher indices than their parents in our arena.
    // This is guaranteed by the add_child insertion order.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        if tree.nodes[i].first_child.is_none() {
            continue;
        }

        let mut total: u64 = 0;
        let mut child = tree.nodes[i].first_child;
        while let Some(child_id) = child {
            total += tree.nodes[child_id.index()].size;
            child = tree.nodes[child_id.index()].next_sibling;
        }
        tree.nodes[i].size = total;
    }
}

/// Sort children of each node by size (descending).
/// The squarified layout algorithm expects children sorted by size.
/// This re-links the sibling list without moving nodes in the arena.
pub fn sort_children_by_size(tree: &mut FileTree) {
    let len = tree.nodes.len();
    for i in 0..len {
        if tree.nodes[i].first_child.is_none() {
            continue;
        }

        let mut children: Vec<NodeId> = Vec::new();
        let mut child = tree.nodes[i].first_child;
        while let Some(child_id) = child {
            children.push(child_id);
            child = tree.nodes[child_id.index()].next_sibling;
        }

        // Stable sort keeps arena order for equal sizes, so repeated builds
        // from the same listing produce the same sibling order.
        children.sort_by(|a, b| {
            tree.nodes[b.index()]
                .size
                .cmp(&tree.nodes[a.index()].size)
        });

        tree.nodes[i].first_child = Some(children[0]);
        for w in children.windows(2) {
            tree.nodes[w[0].index()].next_sibling = Some(w[1]);
        }
        if let Some(last) = children.last() {
            tree.nodes[last.index()].next_sibling = None;
        }
    }
}
