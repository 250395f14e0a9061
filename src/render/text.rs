use std::path::PathBuf;

use anyhow::{anyhow, Result};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use fontdue::Font;

/// Rasterizes tile labels with a single default font.
pub struct TextRenderer {
    font: Option<Font>,
    layout: Layout,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            font: None,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Try the usual system font locations. Without a font, labels are
    /// simply not drawn; tiles still render.
    pub fn load_system_font(&mut self) -> Result<()> {
        let mut candidates: Vec<PathBuf> = vec![
            PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"),
            PathBuf::from("/System/Library/Fonts/Helvetica.ttc"),
        ];
        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
        }

        for path in candidates {
            let Ok(font_data) = std::fs::read(&path) else {
                continue;
            };
            if let Ok(font) = Font::from_bytes(font_data, fontdue::FontSettings::default()) {
                tracing::info!("Loaded label font from {}", path.display());
                self.font = Some(font);
                return Ok(());
            }
        }

        Err(anyhow!("unable to load a system font from known locations"))
    }

    /// Rasterize one line of white text at the given pixel size, wrapped
    /// to `max_width` if provided. Returns None when no font is loaded or
    /// the text produces no visible glyphs.
    pub fn render_line(
        &mut self,
        text: &str,
        font_px: f32,
        max_width: Option<f32>,
    ) -> Option<RenderedLine> {
        let font = self.font.as_ref()?;

        self.layout.reset(&LayoutSettings {
            max_width,
            ..Default::default()
        });
        self.layout.append(&[font], &TextStyle::new(text, font_px, 0));

        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for glyph in self.layout.glyphs() {
            let (metrics, bitmap) = font.rasterize_config(GlyphRasterConfig {
                glyph_index: glyph.key.glyph_index,
                px: font_px,
                font_hash: 0,
            });

            // Grayscale coverage → white RGBA
            let mut rgba = Vec::with_capacity(bitmap.len() * 4);
            for &coverage in &bitmap {
                rgba.extend_from_slice(&[255, 255, 255, coverage]);
            }

            width = width.max(glyph.x + metrics.width as f32);
            height = height.max(glyph.y + metrics.height as f32);
            glyphs.push(RasterGlyph {
                x: glyph.x,
                y: glyph.y,
                width: metrics.width,
                height: metrics.height,
                bitmap: rgba,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(RenderedLine {
            glyphs,
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        })
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RenderedLine {
    pub glyphs: Vec<RasterGlyph>,
    pub width: u32,
    pub height: u32,
}

pub struct RasterGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    /// RGBA pixels, white with coverage alpha
    pub bitmap: Vec<u8>,
}
