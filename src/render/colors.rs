use vello::peniko::Color;

use crate::tree::extensions::{categorize_extension, FileCategory};

/// Our color representation, independent of the render backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Convert to vello's peniko Color.
    pub fn to_peniko(self) -> Color {
        Color::new([self.r, self.g, self.b, self.a])
    }
}

/// Tile outline color.
pub const TILE_STROKE: AppColor = AppColor::new(0.0, 0.0, 0.0);

/// Tile fill per file category: warm tan for images, palevioletred for
/// documents, slateblue for everything else.
pub fn category_color(category: FileCategory) -> AppColor {
    match category {
        FileCategory::Image => AppColor::from_rgb8(0xBE, 0x8C, 0x63),
        FileCategory::Document => AppColor::from_rgb8(219, 112, 147),
        FileCategory::Other => AppColor::from_rgb8(106, 90, 205),
    }
}

/// Fill color for a tile, from its entry's extension.
pub fn tile_color(ext: &str) -> AppColor {
    category_color(categorize_extension(ext))
}
