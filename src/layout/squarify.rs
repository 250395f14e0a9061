use crate::tree::arena::{FileTree, NodeId};
use std::collections::HashMap;

/// A positioned rectangle in the treemap layout, in viewport pixel
/// coordinates. Invariant: `x1 >= x0` and `y1 >= y0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub node: NodeId,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub depth: u16,
}

impl LayoutRect {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Cosmetic inset on the trailing edges, used to draw a visual gap
    /// between tiles. Does not participate in the area accounting; a gap
    /// of zero returns the tile unchanged (seamless tiling).
    pub fn inset(&self, gap: f32) -> LayoutRect {
        LayoutRect {
            x1: (self.x1 - gap).max(self.x0),
            y1: (self.y1 - gap).max(self.y0),
            ..*self
        }
    }
}

/// The full layout result (rects + fast lookup).
#[derive(Debug)]
pub struct Layout {
    /// Root rect first, then one rect per laid-out node in traversal order.
    pub rects: Vec<LayoutRect>,
    /// node → index into `rects`
    pub node_to_rect: HashMap<NodeId, usize>,
}

impl Layout {
    /// Leaf tiles only (the rectangles the renderer draws). The root's
    /// bounding rect is never a tile, even when it has no children.
    pub fn leaves<'a>(&'a self, tree: &'a FileTree) -> impl Iterator<Item = &'a LayoutRect> {
        self.rects
            .iter()
            .filter(move |r| r.depth > 0 && tree.get(r.node).is_leaf())
    }
}

/// Fixed margin around the tiled interior, in pixels. Tiles never enter
/// the margin.
#[derive(Debug, Clone, Copy)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margin {
    pub const fn uniform(px: f32) -> Self {
        Self {
            top: px,
            bottom: px,
            left: px,
            right: px,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Margin::uniform(10.0)
    }
}

/// Configuration for treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Margin between the viewport edge and the tiled interior
    pub margin: Margin,
    /// Cosmetic gap between tiles, applied on each tile's trailing edges
    /// at draw time via [`LayoutRect::inset`]
    pub gap: f32,
    /// Maximum recursion depth (safety; the flat listing only produces 1)
    pub max_depth: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            gap: 0.0,
            max_depth: 32,
        }
    }
}

/// Compute the treemap layout for a tree inside a `width × height` viewport.
///
/// The interior rectangle (viewport shrunk by the margin) is subdivided
/// among the root's children proportionally to weight, recursively for any
/// deeper children. Leaf tiles exactly cover the interior with no overlaps;
/// the configured gap is purely cosmetic and never perturbs the split.
///
/// Callers must not invoke this until a real viewport size is known; with a
/// degenerate (zero) size the function still returns a valid layout whose
/// rects are all zero-area rather than failing.
pub fn compute_layout(
    tree: &FileTree,
    root: NodeId,
    viewport_w: f32,
    viewport_h: f32,
    config: &LayoutConfig,
) -> Layout {
    let mut rects = Vec::with_capacity(tree.len());
    let mut node_to_rect = HashMap::with_capacity(tree.len());

    let margin = config.margin;
    let inner_x = margin.left.min(viewport_w.max(0.0));
    let inner_y = margin.top.min(viewport_h.max(0.0));
    let inner_w = (viewport_w - margin.left - margin.right).max(0.0);
    let inner_h = (viewport_h - margin.top - margin.bottom).max(0.0);

    let root_rect = LayoutRect {
        node: root,
        x0: inner_x,
        y0: inner_y,
        x1: inner_x + inner_w,
        y1: inner_y + inner_h,
        depth: 0,
    };

    rects.push(root_rect);
    node_to_rect.insert(root, 0);

    if !tree.get(root).is_leaf() {
        layout_children(
            tree,
            root,
            inner_x as f64,
            inner_y as f64,
            inner_w as f64,
            inner_h as f64,
            0,
            config,
            &mut rects,
            &mut node_to_rect,
        );
    }

    Layout { rects, node_to_rect }
}

/// Recursively lay out the children of `parent` inside the given rectangle.
#[allow(clippy::too_many_arguments)]
fn layout_children(
    tree: &FileTree,
    parent: NodeId,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    depth: u16,
    config: &LayoutConfig,
    rects: &mut Vec<LayoutRect>,
    node_to_rect: &mut HashMap<NodeId, usize>,
) {
    if depth >= config.max_depth {
        return;
    }

    let parent_weight = tree.get(parent).weight_kib();
    if parent_weight <= 0.0 {
        tracing::debug!(
            "Skipping layout below '{}': zero aggregate weight at depth {}",
            tree.get(parent).name,
            depth
        );
        return;
    }

    // Size-descending order is what the squarified row selection expects.
    // The tree builder already sorts siblings, but sorting here keeps the
    // layout a pure function of the tree regardless of how it was built.
    let mut children: Vec<NodeId> = tree.children(parent).collect();
    children.sort_by_key(|&id| std::cmp::Reverse(tree.get(id).size));

    if children.is_empty() {
        return;
    }

    let total_area = w * h;
    let areas: Vec<f64> = children
        .iter()
        .map(|&id| (tree.get(id).weight_kib() / parent_weight) * total_area)
        .collect();

    let positioned = squarify(&areas, x, y, w, h);

    for (&child_id, pos) in children.iter().zip(&positioned) {
        let child_depth = depth + 1;

        let x0 = pos.x as f32;
        let y0 = pos.y as f32;
        let rect = LayoutRect {
            node: child_id,
            x0,
            y0,
            x1: ((pos.x + pos.w) as f32).max(x0),
            y1: ((pos.y + pos.h) as f32).max(y0),
            depth: child_depth,
        };

        let idx = rects.len();
        rects.push(rect);
        node_to_rect.insert(child_id, idx);

        if !tree.get(child_id).is_leaf() {
            layout_children(
                tree,
                child_id,
                pos.x,
                pos.y,
                pos.w,
                pos.h,
                child_depth,
                config,
                rects,
                node_to_rect,
            );
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Positioned {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

/// Squarified subdivision of a rectangle into the given areas.
///
/// Produces exactly one output per input area, in input order. Input areas
/// must sum to the rectangle's area and should be sorted descending (the
/// row-selection quality depends on it; correctness does not). Rows and
/// columns are chosen to keep each rectangle's worst aspect ratio as close
/// to square as possible instead of slicing strictly along one axis.
fn squarify(areas: &[f64], mut x: f64, mut y: f64, mut w: f64, mut h: f64) -> Vec<Positioned> {
    let mut result = Vec::with_capacity(areas.len());
    let mut next = 0; // index of the first not-yet-placed area

    while next < areas.len() {
        let remaining = &areas[next..];

        // Degenerate space: emit zero-area rects so the output stays 1:1
        // with the input.
        if w <= 1e-9 || h <= 1e-9 {
            for _ in remaining {
                result.push(Positioned { x, y, w: 0.0, h: 0.0 });
            }
            break;
        }

        let horizontal = w >= h;
        let short = if horizontal { h } else { w };
        let long = if horizontal { w } else { h };

        // Grow the row while the worst aspect ratio keeps improving.
        let mut best_score = f64::INFINITY;
        let mut best_k = 1;
        let mut row_sum = 0.0;

        for k in 1..=remaining.len().min(20) {
            let sum: f64 = remaining[0..k].iter().sum();
            let score = worst_aspect_ratio(&remaining[0..k], sum, short);
            if score < best_score {
                best_score = score;
                best_k = k;
                row_sum = sum;
            } else if k > 3 {
                break; // diminishing returns
            }
        }

        // A horizontal row's thickness consumes height and is computed
        // against the available width; a vertical column, vice versa.
        let thickness = row_sum / long.max(1e-12);

        let mut offset = 0.0;
        for &area in &remaining[0..best_k] {
            let length = if thickness > 1e-12 { area / thickness } else { 0.0 };

            let pos = if horizontal {
                Positioned {
                    x: x + offset,
                    y,
                    w: length,
                    h: thickness,
                }
            } else {
                Positioned {
                    x,
                    y: y + offset,
                    w: thickness,
                    h: length,
                }
            };
            result.push(pos);
            offset += length;
        }

        // Shrink remaining space
        if horizontal {
            y += thickness;
            h = (h - thickness).max(0.0);
        } else {
            x += thickness;
            w = (w - thickness).max(0.0);
        }

        next += best_k;
    }

    result
}

/// Worst (most elongated) aspect ratio a row would have if laid out along
/// a side of the given length. Lower is better; 1.0 is a perfect square.
fn worst_aspect_ratio(row: &[f64], sum: f64, side: f64) -> f64 {
    if row.is_empty() || sum <= 0.0 || side <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    let max_r = row.iter().copied().fold(0.0, f64::max);
    let min_r = row.iter().copied().fold(f64::INFINITY, f64::min);
    let a = (side_sq * max_r) / sum_sq;
    let b = sum_sq / (side_sq * min_r);
    a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::types::RawEntry;
    use crate::tree::build_tree;

    fn entry(name: &str, size: u64) -> RawEntry {
        RawEntry {
            hash: String::new(),
            name: name.to_string(),
            size,
            entry_type: 0,
        }
    }

    fn leaf_rects(tree: &crate::tree::arena::FileTree, layout: &Layout) -> Vec<LayoutRect> {
        layout.leaves(tree).copied().collect()
    }

    const W: f32 = 640.0;
    const H: f32 = 480.0;

    #[test]
    fn single_leaf_fills_interior_regardless_of_weight() {
        for size in [1u64, 768_403, u32::MAX as u64] {
            let tree = build_tree(&[entry("only", size)]);
            let config = LayoutConfig::default();
            let layout = compute_layout(&tree, tree.root, W, H, &config);
            let leaves = leaf_rects(&tree, &layout);
            assert_eq!(leaves.len(), 1);
            let r = leaves[0];
            assert!((r.x0 - 10.0).abs() < 1e-4);
            assert!((r.y0 - 10.0).abs() < 1e-4);
            assert!((r.x1 - (W - 10.0)).abs() < 1e-4);
            assert!((r.y1 - (H - 10.0)).abs() < 1e-4);
        }
    }

    #[test]
    fn leaf_tiles_exactly_cover_interior() {
        let tree = build_tree(&[
            entry("a", 400_000),
            entry("b", 300_000),
            entry("c", 200_000),
            entry("d", 100_000),
            entry("e", 50_000),
        ]);
        let config = LayoutConfig::default();
        let layout = compute_layout(&tree, tree.root, W, H, &config);

        let interior = (W - 20.0) as f64 * (H - 20.0) as f64;
        let covered: f64 = leaf_rects(&tree, &layout)
            .iter()
            .map(|r| r.area() as f64)
            .sum();
        assert!(
            (covered - interior).abs() / interior < 1e-4,
            "covered {covered} vs interior {interior}"
        );
    }

    #[test]
    fn sibling_tiles_do_not_overlap() {
        let tree = build_tree(&[
            entry("a", 500_000),
            entry("b", 250_000),
            entry("c", 125_000),
            entry("d", 60_000),
            entry("e", 30_000),
            entry("f", 15_000),
        ]);
        let config = LayoutConfig::default();
        let layout = compute_layout(&tree, tree.root, W, H, &config);
        let leaves = leaf_rects(&tree, &layout);

        for (i, a) in leaves.iter().enumerate() {
            for b in &leaves[i + 1..] {
                let overlap_w = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
                let overlap_h = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
                let overlap = overlap_w as f64 * overlap_h as f64;
                assert!(overlap < 1.0, "tiles overlap by {overlap}px²");
            }
        }
    }

    #[test]
    fn areas_proportional_to_weights() {
        let tree = build_tree(&[entry("a", 600_000), entry("b", 300_000), entry("c", 100_000)]);
        let config = LayoutConfig::default();
        let layout = compute_layout(&tree, tree.root, W, H, &config);

        let by_name: Vec<(String, f64)> = layout
            .leaves(&tree)
            .map(|r| (tree.get(r.node).name.to_string(), r.area() as f64))
            .collect();

        let area = |n: &str| by_name.iter().find(|(name, _)| name == n).unwrap().1;
        assert!((area("a") / area("b") - 2.0).abs() < 0.01);
        assert!((area("b") / area("c") - 3.0).abs() < 0.01);
    }

    #[test]
    fn tiles_respect_margin() {
        let config = LayoutConfig {
            margin: Margin {
                top: 5.0,
                bottom: 15.0,
                left: 10.0,
                right: 20.0,
            },
            ..LayoutConfig::default()
        };
        let tree = build_tree(&[
            entry("a", 100_000),
            entry("b", 90_000),
            entry("c", 80_000),
            entry("d", 10_000),
        ]);
        let layout = compute_layout(&tree, tree.root, W, H, &config);

        for r in layout.leaves(&tree) {
            assert!(r.x0 >= 10.0 - 1e-3 && r.x1 <= W - 20.0 + 1e-3);
            assert!(r.y0 >= 5.0 - 1e-3 && r.y1 <= H - 15.0 + 1e-3);
        }
    }

    #[test]
    fn repeat_layout_is_bit_identical() {
        let tree = build_tree(&[
            entry("a", 123_456),
            entry("b", 654_321),
            entry("c", 111_111),
            entry("d", 222_222),
        ]);
        let config = LayoutConfig::default();
        let first = compute_layout(&tree, tree.root, W, H, &config);
        let second = compute_layout(&tree, tree.root, W, H, &config);

        assert_eq!(first.rects.len(), second.rects.len());
        for (a, b) in first.rects.iter().zip(&second.rects) {
            assert_eq!(a.x0.to_bits(), b.x0.to_bits());
            assert_eq!(a.y0.to_bits(), b.y0.to_bits());
            assert_eq!(a.x1.to_bits(), b.x1.to_bits());
            assert_eq!(a.y1.to_bits(), b.y1.to_bits());
        }
    }

    #[test]
    fn empty_tree_yields_root_rect_and_no_tiles() {
        let tree = build_tree(&[]);
        let config = LayoutConfig::default();
        let layout = compute_layout(&tree, tree.root, W, H, &config);
        assert_eq!(layout.rects.len(), 1);
        assert_eq!(layout.leaves(&tree).count(), 0);
        let r = layout.rects[0];
        assert!(r.x1 >= r.x0 && r.y1 >= r.y0);
    }

    #[test]
    fn zero_viewport_produces_valid_degenerate_rects() {
        let tree = build_tree(&[entry("a", 1000), entry("b", 2000)]);
        let config = LayoutConfig::default();
        let layout = compute_layout(&tree, tree.root, 0.0, 0.0, &config);
        for r in &layout.rects {
            assert!(r.x1 >= r.x0 && r.y1 >= r.y0);
        }
    }

    #[test]
    fn gap_inset_is_cosmetic_and_trailing_only() {
        let r = LayoutRect {
            node: NodeId(1),
            x0: 10.0,
            y0: 20.0,
            x1: 110.0,
            y1: 70.0,
            depth: 1,
        };
        assert_eq!(r.inset(0.0), r);
        let g = r.inset(2.0);
        assert_eq!((g.x0, g.y0), (10.0, 20.0));
        assert_eq!((g.x1, g.y1), (108.0, 68.0));
        // Never inverts a tiny tile
        let tiny = LayoutRect {
            node: NodeId(1),
            x0: 10.0,
            y0: 20.0,
            x1: 11.0,
            y1: 21.0,
            depth: 1,
        };
        let t = tiny.inset(5.0);
        assert!(t.x1 >= t.x0 && t.y1 >= t.y0);
    }

    #[test]
    fn squarify_preserves_input_order_and_count() {
        let areas = [400.0, 300.0, 200.0, 100.0];
        let rects = squarify(&areas, 0.0, 0.0, 50.0, 20.0);
        assert_eq!(rects.len(), areas.len());
        let total_in: f64 = areas.iter().sum();
        let total_out: f64 = rects.iter().map(|r| r.w * r.h).sum();
        assert!((total_in - total_out).abs() < 1e-6);
        for (area, rect) in areas.iter().zip(&rects) {
            assert!((rect.w * rect.h - area).abs() < 1e-6);
        }
    }

    #[test]
    fn squarify_single_item_fills_rect_without_axis_swap() {
        let rects = squarify(&[1920.0 * 1080.0], 0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(rects.len(), 1);
        let r = rects[0];
        assert!((r.w - 1920.0).abs() < 1e-6);
        assert!((r.h - 1080.0).abs() < 1e-6);
    }
}
