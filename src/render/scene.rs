use std::sync::Arc;

use vello::kurbo::{Affine, Rect, Stroke};
use vello::peniko::{Blob, Fill, Image, ImageFormat};
use vello::Scene;

use super::colors::{tile_color, TILE_STROKE};
use super::text::{RenderedLine, TextRenderer};
use crate::layout::Layout;
use crate::tree::arena::FileTree;

/// Label placement, anchored from each tile's top-left corner.
/// `y_offset` is the text baseline, matching the reference UI.
#[derive(Debug, Clone, Copy)]
pub struct LabelStyle {
    pub x_offset: f32,
    pub y_offset: f32,
    pub font_px: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            x_offset: 5.0,
            y_offset: 20.0,
            font_px: 12.0,
        }
    }
}

/// Build the vello scene for the current layout: one filled, outlined
/// rectangle per leaf tile, then a label pass on top.
pub fn build_scene(
    scene: &mut Scene,
    tree: &FileTree,
    layout: &Layout,
    gap: f32,
    labels: &LabelStyle,
    text: &mut TextRenderer,
) {
    scene.reset();

    for rect in layout.leaves(tree) {
        let tile = rect.inset(gap);
        if tile.area() <= 0.0 {
            continue;
        }
        let shape = Rect::new(
            tile.x0 as f64,
            tile.y0 as f64,
            tile.x1 as f64,
            tile.y1 as f64,
        );
        let fill = tile_color(tree.extension(rect.node));
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            fill.to_peniko(),
            None,
            &shape,
        );
        scene.stroke(
            &Stroke::new(1.0),
            Affine::IDENTITY,
            TILE_STROKE.to_peniko(),
            None,
            &shape,
        );
    }

    // Label pass, drawn after all tiles so no tile covers a neighbor's text.
    if !text.has_font() {
        return;
    }
    for rect in layout.leaves(tree) {
        let tile = rect.inset(gap);
        if tile.height() < labels.y_offset {
            continue;
        }
        let max_text_w = tile.width() - labels.x_offset * 2.0;
        let label = truncate_label(&tree.get(rect.node).name, max_text_w, labels.font_px);
        if label.is_empty() {
            continue;
        }

        if let Some(line) = text.render_line(&label, labels.font_px, Some(max_text_w)) {
            let tx = tile.x0 + labels.x_offset;
            let ty = tile.y0 + labels.y_offset - labels.font_px;
            draw_line(scene, line, tx, ty);
        }
    }
}

/// Draw a rasterized line of text glyph by glyph.
fn draw_line(scene: &mut Scene, line: RenderedLine, x: f32, y: f32) {
    for glyph in line.glyphs {
        if glyph.bitmap.is_empty() {
            continue;
        }
        let glyph_image = Image::new(
            Blob::new(Arc::new(glyph.bitmap)),
            ImageFormat::Rgba8,
            glyph.width as u32,
            glyph.height as u32,
        );
        let transform = Affine::translate((x as f64 + glyph.x as f64, y as f64 + glyph.y as f64));
        scene.draw_image(&glyph_image, transform);
    }
}

/// Cut a name down to what fits the tile, with a "..." suffix when
/// truncated. Width estimate is approximate; fontdue wrapping is the
/// backstop for the actual glyph run.
fn truncate_label(name: &str, max_width: f32, font_px: f32) -> String {
    let approx_char_w = (font_px * 0.58).max(1.0);
    let max_chars = (max_width / approx_char_w) as usize;
    if max_chars < 3 {
        return String::new();
    }
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    if max_chars <= 3 {
        return "...".to_string();
    }
    let truncated: String = name.chars().take(max_chars - 3).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::truncate_label;

    #[test]
    fn short_names_pass_through() {
        assert_eq!(truncate_label("a.png", 200.0, 12.0), "a.png");
    }

    #[test]
    fn long_names_get_ellipsis() {
        let label = truncate_label("a-very-long-file-name.tar.gz", 60.0, 12.0);
        assert!(label.ends_with("..."));
        assert!(label.chars().count() <= 10);
    }

    #[test]
    fn tiny_tiles_get_no_label() {
        assert_eq!(truncate_label("name.png", 10.0, 12.0), "");
    }
}
