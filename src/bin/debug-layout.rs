/// Diagnostic tool to verify the fetch → tree → layout pipeline
use mfsview_rs::fetch;
use mfsview_rs::layout::{compute_layout, LayoutConfig};
use mfsview_rs::tree;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mfsview_rs=debug".parse()?),
        )
        .init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| fetch::DEFAULT_ENDPOINT.to_string());

    println!("=== DIAGNOSTIC: Fetch → Tree → Layout Pipeline ===");
    println!("Endpoint: {endpoint}");

    // Fetch
    let entries = fetch::fetch_listing(&endpoint)?;
    println!("\n[1] Fetch completed: {} entries", entries.len());

    // Build tree
    let tree = tree::build_tree(&entries);
    println!("\n[2] Tree built: {} nodes", tree.len());

    let root_node = tree.get(tree.root);
    println!(
        "    Root: '{}' ({:.2} KiB across {} leaves)",
        root_node.name,
        root_node.weight_kib(),
        tree.children(tree.root).count()
    );

    println!("\n[3] Top 10 leaves by size:");
    for (i, child_id) in tree.children(tree.root).take(10).enumerate() {
        let child = tree.get(child_id);
        println!(
            "    [{}] '{}' - {:.2} KiB (ext='{}', hash={})",
            i,
            child.name,
            child.weight_kib(),
            tree.extension(child_id),
            child.hash
        );
    }

    // Compute layout
    let config = LayoutConfig::default();
    let layout = compute_layout(&tree, tree.root, 1920.0, 1080.0, &config);
    println!("\n[4] Layout computed: {} rectangles", layout.rects.len());

    println!("\n[5] Leaf tiles:");
    for (i, rect) in layout.leaves(&tree).take(10).enumerate() {
        let node = tree.get(rect.node);
        println!(
            "    [{}] '{}' - {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1})",
            i,
            node.name,
            rect.width(),
            rect.height(),
            rect.area(),
            rect.x0,
            rect.y0
        );
    }

    // Coverage check: leaf tiles must exactly fill the margin-inset interior.
    println!("\n[6] Coverage check:");
    let margin = &config.margin;
    let interior_area =
        (1920.0 - margin.left - margin.right) as f64 * (1080.0 - margin.top - margin.bottom) as f64;
    let covered: f64 = layout.leaves(&tree).map(|r| r.area() as f64).sum();

    println!("    Total tile area: {covered:.0}px²");
    println!("    Interior area:   {interior_area:.0}px²");
    if interior_area > 0.0 {
        println!("    Coverage: {:.2}%", covered / interior_area * 100.0);
    }

    Ok(())
}
