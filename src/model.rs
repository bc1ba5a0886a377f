#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

#[derive(Clone, Debug)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub file_name: Option<String>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font_size: Option<f32>,
    /// Raw color value as found in the source (hex digits or "auto").
    /// Interpretation is the formatter's job so bad values degrade locally.
    pub color: Option<String>,
    pub image: Option<EmbeddedImage>,
}

#[derive(Debug)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Option<Alignment>,
    /// Style hint from the source (e.g. "Heading1"), for heading detection.
    pub style_name: Option<String>,
    /// Plain text fallback for paragraphs whose content is not carried by runs.
    pub raw_text: String,
}

impl Paragraph {
    pub fn text(&self) -> String {
        if self.runs.is_empty() {
            self.raw_text.clone()
        } else {
            self.runs.iter().map(|r| r.text.as_str()).collect()
        }
    }

    pub fn has_images(&self) -> bool {
        self.runs.iter().any(|r| r.image.is_some())
    }

    pub fn images(&self) -> Vec<&EmbeddedImage> {
        self.runs.iter().filter_map(|r| r.image.as_ref()).collect()
    }
}

#[derive(Debug)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    /// Raw shading attributes from the source (w:shd color / fill).
    pub shading_color: Option<String>,
    pub shading_fill: Option<String>,
}

#[derive(Debug)]
pub enum BlockElement {
    Paragraph(Paragraph),
    Table(Table),
}

/// Immutable source document tree, built once per conversion by the
/// document model provider.
#[derive(Debug)]
pub struct DocumentTree {
    pub blocks: Vec<BlockElement>,
    pub headers: Vec<Paragraph>,
    pub footers: Vec<Paragraph>,
}
