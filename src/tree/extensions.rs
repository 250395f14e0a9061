/// File type categories for tile colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Images: jpg, jpeg, png
    Image,
    /// Documents: pdf
    Document,
    /// Everything else, including names without an extension
    Other,
}

/// Classify a file extension into a category.
pub fn categorize_extension(ext: &str) -> FileCategory {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "png" => FileCategory::Image,
        "pdf" => FileCategory::Document,
        _ => FileCategory::Other,
    }
}

/// The extension of an entry name: the suffix after the last '.', or ""
/// when the name has no dot.
pub fn extension_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}
