pub mod metrics;

use std::path::Path;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::model::{Alignment, ImageFormat};
use crate::output::{
    CellBlock, ImageBlock, OutputBlock, OutputPage, RenderedDocument, StyledRun, TableBlock,
    TextBlock,
};
use crate::sink::PageSink;
use crate::transcode::FormatConfig;

use metrics::{space_width, text_width, to_winansi_bytes};

const LINE_RATIO: f32 = 1.2;
const ASCENDER_RATIO: f32 = 0.75;
const CELL_PADDING: f32 = 6.0;
const CELL_BORDER_WIDTH: f32 = 0.5;
const RULE_HEIGHT: f32 = 2.0;
const IMAGE_COLUMN_GAP: f32 = 10.0;
const IMAGE_TRAILING_GAP: f32 = 6.0;
const CAPTION_FONT_SIZE: f32 = 8.0;
const CAPTION_GAP: f32 = 3.0;
const FOOTER_FONT_SIZE: f32 = 9.0;
const FOOTER_BASELINE_Y: f32 = 20.0;

/// Built-in page sink: paginates the output-block flow and writes a PDF
/// using the base-14 Helvetica family.
pub struct PdfSink {
    config: FormatConfig,
}

impl PdfSink {
    pub fn new(config: &FormatConfig) -> Self {
        Self { config: *config }
    }
}

impl PageSink for PdfSink {
    fn render(
        &mut self,
        flow: &[OutputBlock],
        footer: &dyn Fn(usize) -> String,
        path: &Path,
    ) -> Result<usize, Error> {
        let mut rendered = paginate_flow(flow, &self.config);
        for page in &mut rendered.pages {
            let text = footer(page.page_index);
            if !text.is_empty() {
                page.footer_text = Some(text);
            }
        }
        let bytes = write_pdf(&rendered, &self.config);
        std::fs::write(path, &bytes)
            .map_err(|e| Error::Sink(format!("{}: {e}", path.display())))?;
        Ok(rendered.page_count())
    }
}

// ---------------------------------------------------------------------------
// Line building

struct Chunk {
    text: String,
    x_offset: f32,
    width: f32,
    font_size: f32,
    bold: bool,
    italic: bool,
    underline: bool,
    color: Option<[u8; 3]>,
}

struct LayoutLine {
    chunks: Vec<Chunk>,
    total_width: f32,
}

fn finish_line(chunks: &mut Vec<Chunk>) -> LayoutLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    LayoutLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

/// Wrap spans into lines. Cross-span contiguous text stays contiguous: no
/// space is inserted between spans unless the preceding text ended with
/// whitespace or the new span starts with whitespace ("bold" + ", " must
/// come out as "bold," rather than "bold ,").
fn build_lines(spans: &[StyledRun], max_width: f32) -> Vec<LayoutLine> {
    let mut lines: Vec<LayoutLine> = Vec::new();
    let mut current: Vec<Chunk> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut prev_ended_ws = false;
    let mut prev_space_w: f32 = 0.0;

    for span in spans {
        let space_w = space_width(span.font_size, span.bold);
        let starts_ws = span.text.starts_with(char::is_whitespace);

        for (i, word) in span.text.split_whitespace().enumerate() {
            let ww = text_width(word, span.font_size, span.bold);

            let need_space = !current.is_empty() && (i > 0 || starts_ws || prev_ended_ws);
            let effective_space_w = if i > 0 || starts_ws {
                space_w
            } else {
                prev_space_w
            };
            let proposed_x = if need_space {
                current_x + effective_space_w
            } else {
                current_x
            };

            if !current.is_empty() && proposed_x + ww > max_width {
                lines.push(finish_line(&mut current));
                current_x = 0.0;
            } else {
                current_x = proposed_x;
            }

            current.push(Chunk {
                text: word.to_string(),
                x_offset: current_x,
                width: ww,
                font_size: span.font_size,
                bold: span.bold,
                italic: span.italic,
                underline: span.underline,
                color: span.color,
            });
            current_x += ww;
        }

        prev_ended_ws = span.text.ends_with(char::is_whitespace);
        prev_space_w = space_w;
    }

    if !current.is_empty() {
        lines.push(finish_line(&mut current));
    }
    lines
}

/// Rebuild spans from laid-out lines so a split paragraph can continue on
/// the next page as an ordinary text block. Re-wrapping the rebuilt spans
/// at the same width reproduces the same line breaks.
fn lines_to_spans(lines: &[LayoutLine]) -> Vec<StyledRun> {
    let mut spans = Vec::new();
    for (li, line) in lines.iter().enumerate() {
        for (ci, chunk) in line.chunks.iter().enumerate() {
            let mut text = chunk.text.clone();
            if ci + 1 < line.chunks.len() || li + 1 < lines.len() {
                text.push(' ');
            }
            spans.push(StyledRun {
                text,
                font_size: chunk.font_size,
                bold: chunk.bold,
                italic: chunk.italic,
                underline: chunk.underline,
                color: chunk.color,
            });
        }
    }
    spans
}

// ---------------------------------------------------------------------------
// Measurement

fn spans_line_height(spans: &[StyledRun], default_font_size: f32) -> f32 {
    let max_size = spans
        .iter()
        .map(|s| s.font_size)
        .fold(default_font_size, f32::max);
    max_size * LINE_RATIO
}

fn cell_text_width(cfg: &FormatConfig, columns: usize) -> f32 {
    let cols = columns.max(1) as f32;
    (cfg.content_width() / cols - 2.0 * CELL_PADDING).max(1.0)
}

fn row_height(row: &[CellBlock], cfg: &FormatConfig, columns: usize) -> f32 {
    let text_w = cell_text_width(cfg, columns);
    let mut max_h: f32 = 0.0;
    for cell in row.iter().take(columns.max(1)) {
        let line_h = spans_line_height(&cell.spans, cfg.default_font_size);
        let lines = build_lines(&cell.spans, text_w);
        let h = 2.0 * CELL_PADDING + lines.len().max(1) as f32 * line_h;
        max_h = max_h.max(h);
    }
    max_h
}

fn image_block_height(block: &ImageBlock) -> f32 {
    let mut max_h: f32 = 0.0;
    for slot in block.slots.iter().flatten() {
        let mut h = slot.height;
        if slot.caption.is_some() {
            h += CAPTION_GAP + CAPTION_FONT_SIZE * LINE_RATIO;
        }
        max_h = max_h.max(h);
    }
    max_h + IMAGE_TRAILING_GAP
}

// ---------------------------------------------------------------------------
// Pagination

struct PageAssembler {
    pages: Vec<OutputPage>,
    current: Vec<OutputBlock>,
    used: f32,
    avail: f32,
}

impl PageAssembler {
    fn new(avail: f32) -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            used: 0.0,
            avail,
        }
    }

    fn at_page_top(&self) -> bool {
        self.used == 0.0
    }

    fn close_page(&mut self) {
        let index = self.pages.len() + 1;
        self.pages.push(OutputPage {
            blocks: std::mem::take(&mut self.current),
            page_index: index,
            footer_text: None,
        });
        self.used = 0.0;
    }

    fn push(&mut self, block: OutputBlock, height: f32) {
        self.current.push(block);
        self.used += height;
    }

    /// Place an atomic block, breaking to a fresh page when it does not fit
    /// and the page already has content.
    fn place_atomic(&mut self, block: OutputBlock, height: f32) {
        if !self.at_page_top() && self.used + height > self.avail {
            self.close_page();
        }
        self.push(block, height);
    }

    fn remaining(&self) -> f32 {
        self.avail - self.used
    }
}

/// Assign the flow's blocks to pages. Deterministic: rendering the same
/// flow twice always produces structurally identical pages, which is what
/// keeps the shadow pass's page count valid for the final pass.
///
/// Text blocks taller than the remaining space split at line granularity,
/// tables at row granularity; image blocks are atomic. An empty flow still
/// produces a single empty page.
pub fn paginate_flow(flow: &[OutputBlock], cfg: &FormatConfig) -> RenderedDocument {
    let mut asm = PageAssembler::new(cfg.content_height());

    for block in flow {
        match block {
            OutputBlock::PageBreak => {
                if !asm.at_page_top() || !asm.current.is_empty() {
                    asm.close_page();
                }
            }
            OutputBlock::Gap(h) => {
                // Whitespace at the top of a page carries no information.
                if !asm.at_page_top() {
                    asm.push(OutputBlock::Gap(*h), *h);
                }
            }
            OutputBlock::Rule => {
                asm.place_atomic(OutputBlock::Rule, RULE_HEIGHT);
            }
            OutputBlock::Text(tb) => place_text(&mut asm, tb, cfg),
            OutputBlock::Table(tbl) => place_table(&mut asm, tbl, cfg),
            OutputBlock::Images(ib) => {
                let h = image_block_height(ib);
                asm.place_atomic(OutputBlock::Images(ib.clone()), h);
            }
        }
    }

    if !asm.current.is_empty() || asm.pages.is_empty() {
        asm.close_page();
    }

    RenderedDocument { pages: asm.pages }
}

fn place_text(asm: &mut PageAssembler, tb: &TextBlock, cfg: &FormatConfig) {
    let wrap_width = (cfg.content_width() - tb.indent_left).max(1.0);
    let lines = build_lines(&tb.spans, wrap_width);
    let line_h = spans_line_height(&tb.spans, cfg.default_font_size);
    let total_h = tb.space_before + lines.len() as f32 * line_h + tb.space_after;

    if asm.used + total_h <= asm.avail {
        asm.push(OutputBlock::Text(tb.clone()), total_h);
        return;
    }
    if total_h <= asm.avail {
        asm.close_page();
        asm.push(OutputBlock::Text(tb.clone()), total_h);
        return;
    }

    // Paragraph taller than a full page: split at line granularity.
    let mut remaining = &lines[..];
    let mut first = true;
    while !remaining.is_empty() {
        let lead = if first { tb.space_before } else { 0.0 };
        let mut fit = ((asm.remaining() - lead) / line_h).floor() as usize;
        if fit == 0 {
            asm.close_page();
            fit = (((asm.avail - lead) / line_h).floor() as usize).max(1);
        }
        let take = fit.min(remaining.len());
        let last = take == remaining.len();
        asm.push(
            OutputBlock::Text(TextBlock {
                spans: lines_to_spans(&remaining[..take]),
                alignment: tb.alignment,
                space_before: lead,
                space_after: if last { tb.space_after } else { 0.0 },
                indent_left: tb.indent_left,
            }),
            lead + take as f32 * line_h + if last { tb.space_after } else { 0.0 },
        );
        remaining = &remaining[take..];
        first = false;
    }
}

fn place_table(asm: &mut PageAssembler, tbl: &TableBlock, cfg: &FormatConfig) {
    let mut pending: Vec<Vec<CellBlock>> = Vec::new();
    let mut pending_h: f32 = 0.0;

    let flush = |asm: &mut PageAssembler, rows: &mut Vec<Vec<CellBlock>>, h: &mut f32| {
        if !rows.is_empty() {
            asm.push(
                OutputBlock::Table(TableBlock {
                    columns: tbl.columns,
                    rows: std::mem::take(rows),
                }),
                *h,
            );
            *h = 0.0;
        }
    };

    for row in &tbl.rows {
        let h = row_height(row, cfg, tbl.columns);
        if asm.used + pending_h + h > asm.avail && !(asm.at_page_top() && pending.is_empty()) {
            flush(asm, &mut pending, &mut pending_h);
            asm.close_page();
        }
        pending.push(row.clone());
        pending_h += h;
    }
    flush(asm, &mut pending, &mut pending_h);
}

// ---------------------------------------------------------------------------
// Drawing

fn font_label(bold: bool, italic: bool) -> &'static str {
    match (bold, italic) {
        (false, false) => "F1",
        (true, false) => "F2",
        (false, true) => "F3",
        (true, true) => "F4",
    }
}

#[derive(Default)]
struct TextState {
    font: &'static str,
    size: f32,
    color: Option<[u8; 3]>,
    color_set: bool,
}

fn set_color(content: &mut Content, state: &mut TextState, color: Option<[u8; 3]>) {
    if state.color_set && state.color == color {
        return;
    }
    match color {
        Some([r, g, b]) => {
            content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
        }
        None => content.set_fill_gray(0.0),
    };
    state.color = color;
    state.color_set = true;
}

fn set_font(content: &mut Content, state: &mut TextState, bold: bool, italic: bool, size: f32) {
    let label = font_label(bold, italic);
    if state.font != label || state.size != size {
        content.set_font(Name(label.as_bytes()), size);
        state.font = label;
        state.size = size;
    }
}

/// Draw one wrapped line with its baseline at `baseline_y`, applying the
/// block alignment within `[x_left, x_left + width]`.
fn draw_line(
    content: &mut Content,
    state: &mut TextState,
    line: &LayoutLine,
    alignment: Alignment,
    x_left: f32,
    width: f32,
    baseline_y: f32,
) {
    if line.chunks.is_empty() {
        return;
    }
    let start_x = match alignment {
        Alignment::Center => x_left + (width - line.total_width).max(0.0) / 2.0,
        Alignment::Right => x_left + (width - line.total_width).max(0.0),
        Alignment::Left => x_left,
    };

    let mut underlines: Vec<(f32, f32, f32, f32, Option<[u8; 3]>)> = Vec::new();

    content.begin_text();
    let mut td_x = 0.0_f32;
    let mut td_y = 0.0_f32;
    for chunk in &line.chunks {
        let x = start_x + chunk.x_offset;
        set_color(content, state, chunk.color);
        set_font(content, state, chunk.bold, chunk.italic, chunk.font_size);
        content.next_line(x - td_x, baseline_y - td_y);
        td_x = x;
        td_y = baseline_y;
        content.show(Str(&to_winansi_bytes(&chunk.text)));

        if chunk.underline {
            let thickness = (chunk.font_size * 0.05).max(0.5);
            underlines.push((x, chunk.width, thickness, chunk.font_size, chunk.color));
        }
    }
    content.end_text();

    for (x, w, thickness, font_size, color) in underlines {
        set_color(content, state, color);
        let y = baseline_y - font_size * 0.12 - thickness;
        content.rect(x, y, w, thickness).fill_nonzero();
    }
}

fn draw_text_block(
    content: &mut Content,
    state: &mut TextState,
    tb: &TextBlock,
    cfg: &FormatConfig,
    slot_top: &mut f32,
) {
    let wrap_width = (cfg.content_width() - tb.indent_left).max(1.0);
    let lines = build_lines(&tb.spans, wrap_width);
    let line_h = spans_line_height(&tb.spans, cfg.default_font_size);
    let ascent = line_h / LINE_RATIO * ASCENDER_RATIO;

    *slot_top -= tb.space_before;
    for line in &lines {
        draw_line(
            content,
            state,
            line,
            tb.alignment,
            cfg.margin_left + tb.indent_left,
            wrap_width,
            *slot_top - ascent,
        );
        *slot_top -= line_h;
    }
    *slot_top -= tb.space_after;
}

fn draw_table_block(
    content: &mut Content,
    state: &mut TextState,
    tbl: &TableBlock,
    cfg: &FormatConfig,
    slot_top: &mut f32,
) {
    let cols = tbl.columns.max(1) as f32;
    let cell_w = cfg.content_width() / cols;
    let text_w = cell_text_width(cfg, tbl.columns);

    for row in &tbl.rows {
        let row_h = row_height(row, cfg, tbl.columns);
        let row_top = *slot_top;
        let row_bottom = row_top - row_h;

        // The first row's column count is authoritative; overflow cells in a
        // ragged row would otherwise paint past the right content edge.
        for (ci, cell) in row.iter().take(tbl.columns.max(1)).enumerate() {
            let cell_x = cfg.margin_left + ci as f32 * cell_w;

            if let Some([r, g, b]) = cell.background {
                content.save_state();
                content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                content.rect(cell_x, row_bottom, cell_w, row_h);
                content.fill_nonzero();
                content.restore_state();
                state.color_set = false;
            }

            content.save_state();
            content.set_line_width(CELL_BORDER_WIDTH);
            content.rect(cell_x, row_bottom, cell_w, row_h);
            content.stroke();
            content.restore_state();

            let line_h = spans_line_height(&cell.spans, cfg.default_font_size);
            let ascent = line_h / LINE_RATIO * ASCENDER_RATIO;
            let mut baseline = row_top - CELL_PADDING - ascent;
            for line in build_lines(&cell.spans, text_w) {
                draw_line(
                    content,
                    state,
                    &line,
                    cell.alignment,
                    cell_x + CELL_PADDING,
                    text_w,
                    baseline,
                );
                baseline -= line_h;
            }
        }

        *slot_top = row_bottom;
    }
}

fn draw_image_block(
    content: &mut Content,
    state: &mut TextState,
    block: &ImageBlock,
    slot_names: &[Option<String>],
    cfg: &FormatConfig,
    slot_top: &mut f32,
) {
    let placed_widths: Vec<f32> = block
        .slots
        .iter()
        .map(|s| s.as_ref().map_or(0.0, |p| p.width))
        .collect();
    let total_w: f32 = placed_widths.iter().sum::<f32>()
        + IMAGE_COLUMN_GAP * placed_widths.len().saturating_sub(1) as f32;
    let mut x = cfg.margin_left + (cfg.content_width() - total_w).max(0.0) / 2.0;

    let block_h = image_block_height(block);

    for (slot, name) in block.slots.iter().zip(slot_names) {
        let Some(placed) = slot else {
            // A failed image keeps an (empty) grid cell so its neighbors
            // stay where the source put them.
            x += IMAGE_COLUMN_GAP;
            continue;
        };
        if let Some(name) = name {
            let y_bottom = *slot_top - placed.height;
            content.save_state();
            content.transform([placed.width, 0.0, 0.0, placed.height, x, y_bottom]);
            content.x_object(Name(name.as_bytes()));
            content.restore_state();
        }
        if let Some(caption) = &placed.caption {
            let cap_w = text_width(caption, CAPTION_FONT_SIZE, false);
            let cap_x = x + (placed.width - cap_w).max(0.0) / 2.0;
            let cap_y = *slot_top - placed.height - CAPTION_GAP - CAPTION_FONT_SIZE;
            set_color(content, state, None);
            set_font(content, state, false, true, CAPTION_FONT_SIZE);
            content.begin_text();
            content.next_line(cap_x, cap_y);
            content.show(Str(&to_winansi_bytes(caption)));
            content.end_text();
        }
        x += placed.width + IMAGE_COLUMN_GAP;
    }

    *slot_top -= block_h;
}

fn draw_rule(content: &mut Content, cfg: &FormatConfig, slot_top: &mut f32) {
    content.save_state();
    content.set_line_width(1.0);
    content.move_to(cfg.margin_left, *slot_top - 1.0);
    content.line_to(cfg.page_width - cfg.margin_right, *slot_top - 1.0);
    content.stroke();
    content.restore_state();
    *slot_top -= RULE_HEIGHT;
}

fn draw_footer(content: &mut Content, state: &mut TextState, text: &str, cfg: &FormatConfig) {
    let w = text_width(text, FOOTER_FONT_SIZE, false);
    let x = cfg.page_width / 2.0 - w / 2.0;
    set_color(content, state, None);
    set_font(content, state, false, false, FOOTER_FONT_SIZE);
    content.begin_text();
    content.next_line(x, FOOTER_BASELINE_Y);
    content.show(Str(&to_winansi_bytes(text)));
    content.end_text();
}

// ---------------------------------------------------------------------------
// PDF assembly

fn write_pdf(rendered: &RenderedDocument, cfg: &FormatConfig) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_ref = 0;
    let mut alloc = || {
        next_ref += 1;
        Ref::new(next_ref)
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Base-14 Helvetica family, WinAnsi-encoded. No embedding needed.
    let font_faces: [(&str, &[u8]); 4] = [
        ("F1", b"Helvetica"),
        ("F2", b"Helvetica-Bold"),
        ("F3", b"Helvetica-Oblique"),
        ("F4", b"Helvetica-BoldOblique"),
    ];
    let font_refs: Vec<(&str, Ref)> = font_faces
        .iter()
        .map(|(label, base)| {
            let id = alloc();
            pdf.type1_font(id)
                .base_font(Name(base))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (*label, id)
        })
        .collect();

    // Embed images up front; slot names follow document order so drawing
    // can walk the same order.
    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    let mut slot_names: Vec<Option<String>> = Vec::new();
    for page in &rendered.pages {
        for block in &page.blocks {
            if let OutputBlock::Images(ib) = block {
                for slot in &ib.slots {
                    let name = slot
                        .as_ref()
                        .and_then(|p| embed_image(p, &mut pdf, &mut alloc, &mut image_xobjects));
                    slot_names.push(name);
                }
            }
        }
    }

    let mut contents: Vec<Content> = Vec::new();
    let mut slot_cursor = 0usize;
    for page in &rendered.pages {
        let mut content = Content::new();
        let mut state = TextState::default();
        let mut slot_top = cfg.page_height - cfg.margin_top;

        for block in &page.blocks {
            match block {
                OutputBlock::Text(tb) => {
                    draw_text_block(&mut content, &mut state, tb, cfg, &mut slot_top)
                }
                OutputBlock::Table(tbl) => {
                    draw_table_block(&mut content, &mut state, tbl, cfg, &mut slot_top)
                }
                OutputBlock::Images(ib) => {
                    let names = &slot_names[slot_cursor..slot_cursor + ib.slots.len()];
                    slot_cursor += ib.slots.len();
                    draw_image_block(&mut content, &mut state, ib, names, cfg, &mut slot_top);
                }
                OutputBlock::Rule => draw_rule(&mut content, cfg, &mut slot_top),
                OutputBlock::Gap(h) => slot_top -= h,
                OutputBlock::PageBreak => {}
            }
        }

        if let Some(text) = &page.footer_text {
            draw_footer(&mut content, &mut state, text, cfg);
        }

        contents.push(content);
    }

    let n = contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, cfg.page_width, cfg.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (label, font_ref) in &font_refs {
                fonts.pair(Name(label.as_bytes()), *font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    pdf.finish()
}

/// Write one image XObject. JPEG data passes through with DctDecode; PNG is
/// decoded and recompressed, with alpha split into an SMask. Returns the
/// resource name, or `None` when the payload cannot be decoded; the slot
/// then renders empty, which is a warning rather than a failure.
fn embed_image(
    placed: &crate::output::PlacedImage,
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    image_xobjects: &mut Vec<(String, Ref)>,
) -> Option<String> {
    let pdf_name = format!("Im{}", image_xobjects.len() + 1);

    match placed.format {
        ImageFormat::Jpeg => {
            let (w, h) = match jpeg_dimensions(&placed.data) {
                Some(dims) => dims,
                None => {
                    log::warn!("undecodable JPEG payload; leaving image slot empty");
                    return None;
                }
            };
            let xobj_ref = alloc();
            let mut xobj = pdf.image_xobject(xobj_ref, &placed.data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            drop(xobj);
            image_xobjects.push((pdf_name.clone(), xobj_ref));
            Some(pdf_name)
        }
        ImageFormat::Png => {
            let cursor = std::io::Cursor::new(&placed.data);
            let reader = image::ImageReader::with_format(
                std::io::BufReader::new(cursor),
                image::ImageFormat::Png,
            );
            let decoded = match reader.decode() {
                Ok(d) => d,
                Err(e) => {
                    log::warn!("undecodable PNG payload ({e}); leaving image slot empty");
                    return None;
                }
            };
            let rgba: image::RgbaImage = decoded.to_rgba8();
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha =
                    miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let xobj_ref = alloc();
            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
            drop(xobj);
            image_xobjects.push((pdf_name.clone(), xobj_ref));
            Some(pdf_name)
        }
    }
}

/// Pull pixel dimensions out of a JPEG SOF marker.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        if marker == 0xD9 {
            break;
        }
        let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if (marker == 0xC0 || marker == 0xC1 || marker == 0xC2) && i + 9 < data.len() {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }
        i += 2 + len;
    }
    None
}
