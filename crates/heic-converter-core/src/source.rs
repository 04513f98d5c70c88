//! Source files and output filename rules.

use crate::settings::TargetFormat;

/// Extension expected on every source file (compared case-insensitively).
pub const SOURCE_EXTENSION: &str = "heic";

/// Display name of the source container format, used in failure reasons.
pub const SOURCE_FORMAT_NAME: &str = "HEIC";

/// A file submitted for conversion. The pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Whether the name carries the source extension.
    pub fn has_source_extension(&self) -> bool {
        has_source_extension(&self.name)
    }
}

/// Case-insensitive check for a trailing `.heic`.
pub fn has_source_extension(name: &str) -> bool {
    source_stem(name).is_some()
}

/// Name without the trailing source extension, if it has one.
fn source_stem(name: &str) -> Option<&str> {
    let dot = name.len().checked_sub(SOURCE_EXTENSION.len() + 1)?;
    if !name.is_char_boundary(dot) {
        return None;
    }
    let (stem, ext) = name.split_at(dot);
    (ext.as_bytes()[0] == b'.' && ext[1..].eq_ignore_ascii_case(SOURCE_EXTENSION)).then_some(stem)
}

/// Filename offered on export: the source extension is swapped for the target
/// one, or the target extension is appended when there is nothing to swap.
///
/// `IMG_0001.HEIC` becomes `IMG_0001.jpg`; `notes` becomes `notes.jpg`.
pub fn derive_output_name(name: &str, target: TargetFormat) -> String {
    let stem = source_stem(name).unwrap_or(name);
    format!("{}.{}", stem, target.extension())
}
