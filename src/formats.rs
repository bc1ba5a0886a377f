use std::path::Path;

use crate::error::Error;
use crate::model::DocumentTree;
use crate::transcode::FormatConfig;

/// A supported input format: its layout parameters plus the parser that
/// turns a file into the source tree.
pub struct Format {
    pub extension: &'static str,
    pub config: FormatConfig,
    pub parse: fn(&Path) -> Result<DocumentTree, Error>,
}

// A4 portrait with the asymmetric margins word-processing output uses: a
// generous top for the repeated header and a deep bottom band reserved for
// the page footer.
const DOCX: Format = Format {
    extension: "docx",
    config: FormatConfig {
        name: "docx",
        page_width: 595.0,
        page_height: 842.0,
        margin_top: 72.0,
        margin_right: 36.0,
        margin_bottom: 90.0,
        margin_left: 36.0,
        default_font_size: 11.0,
    },
    parse: crate::docx::parse,
};

const FORMATS: &[Format] = &[DOCX];

pub fn supported_extensions() -> Vec<&'static str> {
    FORMATS.iter().map(|f| f.extension).collect()
}

/// Pick the format for a path by its extension (case-insensitive). Unknown
/// or missing extensions are rejected before any file I/O happens.
pub fn lookup(path: &Path) -> Result<&'static Format, Error> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    FORMATS
        .iter()
        .find(|f| f.extension == extension)
        .ok_or_else(|| Error::UnsupportedFormat {
            extension,
            supported: supported_extensions(),
        })
}
