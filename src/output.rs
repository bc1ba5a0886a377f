use crate::model::{Alignment, ImageFormat};

/// Output text-run descriptor produced by the RichTextFormatter.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<[u8; 3]>,
}

#[derive(Clone)]
pub struct TextBlock {
    pub spans: Vec<StyledRun>,
    pub alignment: Alignment,
    pub space_before: f32,
    pub space_after: f32,
    pub indent_left: f32,
}

#[derive(Clone)]
pub struct CellBlock {
    pub spans: Vec<StyledRun>,
    pub background: Option<[u8; 3]>,
    pub alignment: Alignment,
}

#[derive(Clone)]
pub struct TableBlock {
    /// Authoritative column count, taken from the source table's first row.
    pub columns: usize,
    pub rows: Vec<Vec<CellBlock>>,
}

#[derive(Clone)]
pub struct PlacedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    /// Display size in points, already scaled to fit placement bounds.
    pub width: f32,
    pub height: f32,
    pub caption: Option<String>,
}

#[derive(Clone)]
pub struct ImageBlock {
    /// One slot per source image; `None` marks an image that failed to
    /// extract and is rendered as an empty cell.
    pub slots: Vec<Option<PlacedImage>>,
    pub grid: bool,
}

#[derive(Clone)]
pub enum OutputBlock {
    Text(TextBlock),
    Table(TableBlock),
    Images(ImageBlock),
    /// Horizontal rule across the content width (header separator).
    Rule,
    /// Vertical whitespace in points.
    Gap(f32),
    PageBreak,
}

/// One laid-out page: the blocks assigned to it plus the deferred footer
/// slot. `footer_text` stays `None` during the shadow pass.
pub struct OutputPage {
    pub blocks: Vec<OutputBlock>,
    pub page_index: usize,
    pub footer_text: Option<String>,
}

pub struct RenderedDocument {
    pub pages: Vec<OutputPage>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
