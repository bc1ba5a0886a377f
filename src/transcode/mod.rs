pub mod format;
pub mod heading;
pub mod image;
pub mod table;

use crate::model::{Alignment, BlockElement, DocumentTree, Paragraph};
use crate::output::{OutputBlock, StyledRun, TextBlock};

use heading::Classification;

/// Per-format transcoder configuration, selected once by the dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct FormatConfig {
    pub name: &'static str,
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub default_font_size: f32,
}

impl FormatConfig {
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }
}

const HEADING1_SIZE: f32 = 18.0;
const HEADING2_SIZE: f32 = 15.0;
const HEADING_SPACE_BEFORE: f32 = 15.0;
const HEADING_SPACE_AFTER: f32 = 10.0;
const BODY_SPACE_AFTER: f32 = 6.0;
const LIST_INDENT: f32 = 18.0;
const TABLE_GAP_BEFORE: f32 = 10.0;
const TABLE_GAP_AFTER: f32 = 15.0;
const HEADER_FONT_SIZE: f32 = 10.0;
const HEADER_SPACE_AFTER: f32 = 20.0;

/// List-item text: a bullet glyph, a digit followed by ". ", or a letter
/// followed by ") ".
fn is_list_item(text: &str) -> bool {
    let trimmed = text.trim_start();
    if trimmed.starts_with('•') || trimmed.starts_with('◦') {
        return true;
    }
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(d), Some('.'), Some(' ')) if d.is_ascii_digit() => true,
        (Some(l), Some(')'), Some(' ')) if l.is_alphabetic() => true,
        _ => false,
    }
}

fn paragraph_block(para: &Paragraph, classification: Classification, cfg: &FormatConfig) -> TextBlock {
    let mut spans = format::styled_spans(para, cfg.default_font_size);

    let (space_before, space_after, indent_left) = match classification {
        Classification::Heading(level) => {
            // Headings override run styling: the level drives the size and
            // the whole line is emphasized.
            let size = match level {
                1 => HEADING1_SIZE,
                2 => HEADING2_SIZE,
                _ => cfg.default_font_size,
            };
            for span in &mut spans {
                span.font_size = size;
                span.bold = true;
            }
            (HEADING_SPACE_BEFORE, HEADING_SPACE_AFTER, 0.0)
        }
        Classification::Body => {
            let indent = if is_list_item(&para.text()) {
                LIST_INDENT
            } else {
                0.0
            };
            (0.0, BODY_SPACE_AFTER, indent)
        }
    };

    TextBlock {
        spans,
        alignment: para.alignment.unwrap_or(Alignment::Left),
        space_before,
        space_after,
        indent_left,
    }
}

fn header_block(para: &Paragraph, cfg: &FormatConfig) -> Option<TextBlock> {
    if para.text().trim().is_empty() {
        return None;
    }
    let spans: Vec<StyledRun> = format::styled_spans(para, HEADER_FONT_SIZE)
        .into_iter()
        .map(|mut s| {
            s.font_size = HEADER_FONT_SIZE;
            s
        })
        .collect();
    Some(TextBlock {
        spans,
        alignment: Alignment::Center,
        space_before: 0.0,
        space_after: HEADER_SPACE_AFTER,
        indent_left: 0.0,
    })
}

/// Walk the document tree in source order and emit the output-block flow.
///
/// Header/footer paragraphs are emitted once, before the body, centered and
/// separated from it by a single rule; per-page repetition is the page
/// sink's business, not the body walk's.
pub fn transcode(doc: &DocumentTree, cfg: &FormatConfig) -> Vec<OutputBlock> {
    let mut flow: Vec<OutputBlock> = Vec::new();

    let mut emitted_hf = false;
    for para in doc.headers.iter().chain(doc.footers.iter()) {
        if let Some(block) = header_block(para, cfg) {
            flow.push(OutputBlock::Text(block));
            emitted_hf = true;
        }
    }
    if emitted_hf {
        flow.push(OutputBlock::Rule);
        flow.push(OutputBlock::Gap(10.0));
    }

    let mut is_first = true;
    for element in &doc.blocks {
        match element {
            BlockElement::Paragraph(para) => {
                if para.has_images() {
                    // Image paragraphs bypass heading and margin formatting
                    // entirely; any text before the first image comes out as
                    // a plain block of its own.
                    let first_image_run = para
                        .runs
                        .iter()
                        .position(|r| r.image.is_some())
                        .unwrap_or(0);
                    let leading: Vec<StyledRun> = para.runs[..first_image_run]
                        .iter()
                        .filter(|r| !r.text.trim().is_empty())
                        .map(|r| format::style_run(r, cfg.default_font_size))
                        .collect();
                    if !leading.is_empty() {
                        flow.push(OutputBlock::Text(TextBlock {
                            spans: leading,
                            alignment: para.alignment.unwrap_or(Alignment::Left),
                            space_before: 0.0,
                            space_after: BODY_SPACE_AFTER,
                            indent_left: 0.0,
                        }));
                    }
                    let block = image::place(&para.images(), cfg.content_width());
                    if !block.slots.is_empty() {
                        flow.push(OutputBlock::Images(block));
                    }
                    is_first = false;
                    continue;
                }

                // A blank paragraph emits nothing but still counts as seen:
                // a heading after it is not the first body element.
                if para.text().trim().is_empty() {
                    is_first = false;
                    continue;
                }

                let classification = heading::classify(para);
                if heading::page_break_before(para, classification, is_first) {
                    log::debug!("page break before: {:?}", para.text());
                    flow.push(OutputBlock::PageBreak);
                }
                flow.push(OutputBlock::Text(paragraph_block(para, classification, cfg)));
                is_first = false;
            }
            BlockElement::Table(src) => {
                if !is_first {
                    flow.push(OutputBlock::Gap(TABLE_GAP_BEFORE));
                }
                flow.push(OutputBlock::Table(table::render(src, cfg.default_font_size)));
                flow.push(OutputBlock::Gap(TABLE_GAP_AFTER));
                is_first = false;
            }
        }
    }

    flow
}
